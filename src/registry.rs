//! Owns the set of supervised children, keyed by name.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ProcessConfig;
use crate::error::Error;
use crate::signal::{SignalSender, UnixSignalSender};
use crate::supervisor::{Info, ProcessSupervisor};
use crate::user::{UnixUserResolver, UserResolver};

/// Registry of named [`ProcessSupervisor`]s.
///
/// Holds no opinion on `auto_start`: adding a process never starts it, callers
/// drive lifecycle explicitly via the returned supervisor or the registry's
/// bulk operations.
pub struct ProcessRegistry {
    procs: RwLock<HashMap<String, Arc<ProcessSupervisor>>>,
    signal_sender: Arc<dyn SignalSender>,
    user_resolver: Arc<dyn UserResolver>,
}

impl ProcessRegistry {
    pub fn new() -> Arc<Self> {
        Self::with_capabilities(Arc::new(UnixSignalSender), Arc::new(UnixUserResolver))
    }

    pub fn with_capabilities(
        signal_sender: Arc<dyn SignalSender>,
        user_resolver: Arc<dyn UserResolver>,
    ) -> Arc<Self> {
        Arc::new(ProcessRegistry {
            procs: RwLock::new(HashMap::new()),
            signal_sender,
            user_resolver,
        })
    }

    /// Registers a new supervisor under `name`. Fails if the name is taken.
    pub async fn new_process(
        self: &Arc<Self>,
        name: impl Into<String>,
        config: ProcessConfig,
    ) -> Result<Arc<ProcessSupervisor>, Error> {
        let name = name.into();
        let mut procs = self.procs.write().await;
        if procs.contains_key(&name) {
            return Err(Error::NameExists { name });
        }
        let sup = ProcessSupervisor::with_capabilities(
            name.clone(),
            config,
            Arc::clone(&self.signal_sender),
            Arc::clone(&self.user_resolver),
        );
        sup.set_registry(self);
        procs.insert(name, Arc::clone(&sup));
        Ok(sup)
    }

    /// Inserts an already-constructed supervisor, e.g. one produced by
    /// [`ProcessSupervisor::clone_fresh`] during a reload. Unconditional
    /// overwrite: a supervisor already registered under the same name is
    /// replaced, not rejected.
    pub async fn add(self: &Arc<Self>, sup: Arc<ProcessSupervisor>) {
        let mut procs = self.procs.write().await;
        sup.set_registry(self);
        procs.insert(sup.name().to_string(), sup);
    }

    pub async fn get(&self, name: &str) -> Option<Arc<ProcessSupervisor>> {
        self.procs.read().await.get(name).cloned()
    }

    /// Removes `name` from the registry without stopping it; callers that
    /// want a clean shutdown should `stop` first.
    pub async fn remove(&self, name: &str) -> Result<Arc<ProcessSupervisor>, Error> {
        let mut procs = self.procs.write().await;
        match procs.remove(name) {
            Some(sup) => {
                sup.clear_registry();
                Ok(sup)
            }
            None => Err(Error::NotFound {
                name: name.to_string(),
            }),
        }
    }

    pub async fn names(&self) -> Vec<String> {
        self.procs.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.procs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.procs.read().await.is_empty()
    }

    /// Runs `f` against every registered supervisor, fanned out concurrently.
    pub async fn for_each<F, Fut>(&self, f: F)
    where
        F: Fn(Arc<ProcessSupervisor>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let sups: Vec<_> = self.procs.read().await.values().cloned().collect();
        let tasks: Vec<_> = sups
            .into_iter()
            .map(|sup| tokio::spawn(f(sup)))
            .collect();
        futures::future::join_all(tasks).await;
    }

    /// Starts every registered process, waiting for each attempt's readiness
    /// decision before returning.
    pub async fn start_all(&self) {
        self.for_each(|sup| async move {
            sup.start(true).await;
        })
        .await;
    }

    /// Stops every registered process, waiting for each to finish its
    /// shutdown escalation before returning.
    pub async fn stop_all(&self) {
        self.for_each(|sup| async move {
            sup.stop(true).await;
        })
        .await;
    }

    /// Snapshots `Info` for every registered process.
    pub async fn info(&self) -> Vec<Info> {
        crate::supervisor::infos_of(&*self.procs.read().await).await
    }

    /// Replaces a running process in place with a fresh clone of itself:
    /// `p_new = p.clone_fresh()`, starts the clone, stops the original, then
    /// swaps the clone in under `name`.
    ///
    /// Order matters: the clone is started *before* the old one is stopped
    /// and swapped in, so a concurrent `get(name)` always resolves to a live
    /// supervisor — either the outgoing one mid-shutdown or the incoming one.
    pub async fn graceful_reload(
        self: &Arc<Self>,
        name: &str,
        wait: bool,
    ) -> Result<Arc<ProcessSupervisor>, Error> {
        let old = self
            .get(name)
            .await
            .ok_or_else(|| Error::NotFound { name: name.to_string() })?;

        let fresh = old.clone_fresh();

        fresh.start(wait).await;
        old.stop(wait).await;

        old.clear_registry();
        self.add(Arc::clone(&fresh)).await;

        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessConfig;

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let registry = ProcessRegistry::new();
        registry
            .new_process("svc", ProcessConfig::builder("/bin/true").build())
            .await
            .unwrap();
        let err = registry
            .new_process("svc", ProcessConfig::builder("/bin/true").build())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NameExists { .. }));
    }

    #[tokio::test]
    async fn remove_missing_is_not_found() {
        let registry = ProcessRegistry::new();
        let err = registry.remove("ghost").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn get_after_add_round_trips() {
        let registry = ProcessRegistry::new();
        let sup = registry
            .new_process("svc", ProcessConfig::builder("/bin/true").build())
            .await
            .unwrap();
        let fetched = registry.get("svc").await.unwrap();
        assert_eq!(fetched.name(), sup.name());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn graceful_reload_swaps_in_a_clone_of_the_original() {
        let registry = ProcessRegistry::new();
        let original = registry
            .new_process("svc", ProcessConfig::builder("/bin/echo").build())
            .await
            .unwrap();

        let reloaded = registry.graceful_reload("svc", false).await.unwrap();

        assert_ne!(reloaded.instance_id(), original.instance_id());
        let fetched = registry.get("svc").await.unwrap();
        assert_eq!(fetched.instance_id(), reloaded.instance_id());
    }

    #[tokio::test]
    async fn add_overwrites_an_existing_entry() {
        let registry = ProcessRegistry::new();
        let first = registry
            .new_process("svc", ProcessConfig::builder("/bin/true").build())
            .await
            .unwrap();
        let second = ProcessSupervisor::new("svc", ProcessConfig::builder("/bin/false").build());

        registry.add(Arc::clone(&second)).await;

        assert_eq!(registry.len().await, 1);
        let fetched = registry.get("svc").await.unwrap();
        assert_eq!(fetched.instance_id(), second.instance_id());
        assert_ne!(fetched.instance_id(), first.instance_id());
    }
}

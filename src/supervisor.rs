//! The per-child lifecycle state machine.
//!
//! A [`ProcessSupervisor`] owns one OS child at a time. It runs a **starter
//! loop** that spawns the child, classifies "started successfully" via a grace
//! window, reaps the child asynchronously, and decides whether to restart; and,
//! on [`ProcessSupervisor::stop`], a **shutdown escalator** that walks the
//! configured stop signals with bounded waits before finally sending `SIGKILL`.

use std::collections::HashMap;
use std::io;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex, Weak};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use nix::sys::signal::Signal;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::{Notify, RwLock};
use tokio::time::sleep;

use crate::config::{AutoRestart, ProcessConfig};
use crate::error::Error;
use crate::registry::ProcessRegistry;
use crate::signal::{parse_signal_name, SignalSender, UnixSignalSender};
use crate::sink::{create_sink, LogSink};
use crate::state::ProcessState;
use crate::user::{UserResolver, UnixUserResolver};

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Point-in-time snapshot of a supervisor's observable state.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Info {
    pub name: String,
    pub state_name: String,
    pub pid: u32,
    pub start: i64,
    pub stop: i64,
    pub now: i64,
    pub exit_status: Option<i32>,
    pub stdout_logfile: String,
    pub stderr_logfile: String,
    pub description: String,
}

struct Inner {
    state: ProcessState,
    pid: u32,
    start_time: i64,
    stop_time: i64,
    last_exit_status: Option<i32>,
    stdout_sink: Option<Arc<StdMutex<Box<dyn LogSink>>>>,
    stderr_sink: Option<Arc<StdMutex<Box<dyn LogSink>>>>,
    stdin: Option<tokio::process::ChildStdin>,
}

impl Default for Inner {
    fn default() -> Self {
        Inner {
            state: ProcessState::Stopped,
            pid: 0,
            start_time: 0,
            stop_time: 0,
            last_exit_status: None,
            stdout_sink: None,
            stderr_sink: None,
            stdin: None,
        }
    }
}

/// The per-child lifecycle state machine. Owns one OS child at a time.
pub struct ProcessSupervisor {
    name: String,
    config: ProcessConfig,
    signal_sender: Arc<dyn SignalSender>,
    user_resolver: Arc<dyn UserResolver>,
    inner: RwLock<Inner>,
    starting: AtomicBool,
    stop_by_user: AtomicBool,
    retry_count: AtomicI32,
    start_notify: Notify,
    /// Non-owning back-reference to the registry this supervisor lives in,
    /// valid only while it remains registered; cleared by `Registry::remove`.
    registry: StdMutex<Option<Weak<ProcessRegistry>>>,
    /// Monotonic tag bumped by `clone_fresh`/`new`, not meaningful on its own;
    /// exists purely so tests can assert identity changed across a reload.
    instance_id: AtomicU32,
}

static NEXT_INSTANCE_ID: AtomicU32 = AtomicU32::new(1);

impl ProcessSupervisor {
    pub fn new(name: impl Into<String>, config: ProcessConfig) -> Arc<Self> {
        Self::with_capabilities(
            name,
            config,
            Arc::new(UnixSignalSender),
            Arc::new(UnixUserResolver),
        )
    }

    pub fn with_capabilities(
        name: impl Into<String>,
        config: ProcessConfig,
        signal_sender: Arc<dyn SignalSender>,
        user_resolver: Arc<dyn UserResolver>,
    ) -> Arc<Self> {
        Arc::new(ProcessSupervisor {
            name: name.into(),
            config,
            signal_sender,
            user_resolver,
            inner: RwLock::new(Inner::default()),
            starting: AtomicBool::new(false),
            stop_by_user: AtomicBool::new(false),
            retry_count: AtomicI32::new(0),
            start_notify: Notify::new(),
            registry: StdMutex::new(None),
            instance_id: AtomicU32::new(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    pub fn instance_id(&self) -> u32 {
        self.instance_id.load(Ordering::Relaxed)
    }

    pub(crate) fn set_registry(&self, registry: &Arc<ProcessRegistry>) {
        *self.registry.lock().unwrap() = Some(Arc::downgrade(registry));
    }

    pub(crate) fn clear_registry(&self) {
        *self.registry.lock().unwrap() = None;
    }

    pub fn registry(&self) -> Option<Arc<ProcessRegistry>> {
        self.registry.lock().unwrap().as_ref().and_then(Weak::upgrade)
    }

    pub async fn is_running(&self) -> bool {
        self.inner.read().await.state.is_exist()
    }

    pub fn is_starting(&self) -> bool {
        self.starting.load(Ordering::Relaxed)
    }

    /// Returns a fresh supervisor with the same config (env/extension maps
    /// deep-copied via `ProcessConfig::clone`), `state = Stopped`, zero
    /// timestamps, and a fresh retry counter.
    pub fn clone_fresh(&self) -> Arc<Self> {
        Self::with_capabilities(
            self.name.clone(),
            self.config.clone(),
            Arc::clone(&self.signal_sender),
            Arc::clone(&self.user_resolver),
        )
    }

    // ---- start -------------------------------------------------------

    /// Idempotent with respect to a currently-starting supervisor. Dispatches
    /// a background starter loop; if `wait`, blocks until the current spawn
    /// attempt's readiness decision is made (not until the child exits, and
    /// not across restarts).
    pub async fn start(self: &Arc<Self>, wait: bool) {
        if self.starting.swap(true, Ordering::SeqCst) {
            log::info!(proc = self.name.as_str(); "start requested but already starting, ignoring");
            return;
        }
        self.stop_by_user.store(false, Ordering::SeqCst);
        log::info!(proc = self.name.as_str(); "attempting to start process");

        let sup = Arc::clone(self);
        tokio::spawn(async move {
            sup.run_restart_supervision().await;
            sup.starting.store(false, Ordering::SeqCst);
        });

        if wait {
            self.start_notify.notified().await;
        }
    }

    /// The outer restart-decision loop (§4.1.1 step 4): runs one process
    /// lifecycle, then decides whether policy calls for another.
    async fn run_restart_supervision(self: &Arc<Self>) {
        loop {
            self.run_one_lifecycle().await;

            if self.stop_by_user.load(Ordering::SeqCst) {
                log::info!(proc = self.name.as_str(); "stopped by user, not restarting");
                break;
            }
            if !self.is_auto_restart().await {
                log::info!(proc = self.name.as_str(); "auto-restart disabled for this exit, not restarting");
                break;
            }
            let start_time = self.inner.read().await.start_time;
            if unix_now() - start_time < 2 {
                sleep(Duration::from_secs(3)).await;
            }
            log::info!(proc = self.name.as_str(); "auto-restarting process");
        }
    }

    async fn is_auto_restart(&self) -> bool {
        match self.config.auto_restart {
            AutoRestart::False => false,
            AutoRestart::True => true,
            AutoRestart::Unexpected => {
                let inner = self.inner.read().await;
                match inner.last_exit_status {
                    Some(code) => !self.config.expected_exit_codes.contains(&code),
                    None => false,
                }
            }
        }
    }

    /// One full attempt to get the child up and reaped (§4.1.1 steps 1-3):
    /// spawn-retry loop within the start-retry budget, then the single
    /// successful run through to exit.
    async fn run_one_lifecycle(self: &Arc<Self>) {
        {
            let inner = self.inner.read().await;
            if inner.state.is_exist() {
                log::info!(proc = self.name.as_str(); "already running, not starting again");
                self.start_notify.notify_one();
                return;
            }
        }

        {
            let mut inner = self.inner.write().await;
            inner.start_time = unix_now();
        }
        self.retry_count.store(0, Ordering::SeqCst);

        while !self.stop_by_user.load(Ordering::SeqCst) {
            let retry = self.retry_count.load(Ordering::SeqCst);
            if self.config.restart_pause > 0 && retry != 0 {
                log::info!(proc = self.name.as_str(); "pausing before retry for {} seconds", self.config.restart_pause);
                sleep(Duration::from_secs(self.config.restart_pause)).await;
            }

            let grace_deadline = Instant::now() + Duration::from_secs(self.config.start_secs);
            {
                let mut inner = self.inner.write().await;
                inner.state = ProcessState::Starting;
            }
            self.retry_count.fetch_add(1, Ordering::SeqCst);

            if let Some(user) = self.config.user.clone() {
                if let Err(e) = self.user_resolver.resolve(&user) {
                    self.declare_fatal(format!("{e}")).await;
                    break;
                }
            }
            if let Err(e) = self.prepare_sinks().await {
                self.declare_fatal(format!("failed to prepare log sinks: {e}")).await;
                break;
            }

            match self.spawn_child().await {
                Err(spawn_err) => {
                    let retry_now = self.retry_count.load(Ordering::SeqCst);
                    if retry_now >= self.config.start_retries as i32 {
                        self.declare_fatal(format!("{}", Error::Spawn(spawn_err))).await;
                        break;
                    }
                    log::info!(proc = self.name.as_str(); "spawn failed, retrying: {}", spawn_err);
                    let mut inner = self.inner.write().await;
                    inner.state = ProcessState::Suspend;
                    continue;
                }
                Ok((mut child, io_tasks)) => {
                    let pid = child.id().unwrap_or(0);
                    {
                        let mut inner = self.inner.write().await;
                        inner.pid = pid;
                        if let Some(s) = &inner.stdout_sink {
                            s.lock().unwrap().set_pid(pid);
                        }
                        if let Some(s) = &inner.stderr_sink {
                            s.lock().unwrap().set_pid(pid);
                        }
                    }

                    let monitor_exited = Arc::new(AtomicBool::new(false));
                    let program_exited = Arc::new(AtomicBool::new(false));

                    if self.config.start_secs == 0 {
                        let mut inner = self.inner.write().await;
                        inner.state = ProcessState::Running;
                        drop(inner);
                        log::info!(proc = self.name.as_str(), pid = pid; "process started");
                        monitor_exited.store(true, Ordering::SeqCst);
                        self.start_notify.notify_one();
                    } else {
                        let sup = Arc::clone(self);
                        let monitor_exited = Arc::clone(&monitor_exited);
                        let program_exited = Arc::clone(&program_exited);
                        tokio::spawn(async move {
                            sup.readiness_watcher(grace_deadline, monitor_exited, program_exited)
                                .await;
                        });
                    }

                    let wait_result = child.wait().await;
                    program_exited.store(true, Ordering::SeqCst);
                    while !monitor_exited.load(Ordering::SeqCst) {
                        sleep(Duration::from_millis(10)).await;
                    }
                    for task in io_tasks {
                        let _ = task.await;
                    }

                    let mut inner = self.inner.write().await;
                    inner.stop_time = unix_now();
                    if let Some(s) = inner.stdout_sink.take() {
                        let _ = s.lock().unwrap().close();
                    }
                    if let Some(s) = inner.stderr_sink.take() {
                        let _ = s.lock().unwrap().close();
                    }
                    inner.stdin = None;
                    inner.pid = 0;
                    inner.last_exit_status = match &wait_result {
                        Ok(status) => status.code(),
                        Err(_) => None,
                    };

                    if inner.state == ProcessState::Running {
                        inner.state = ProcessState::Exited;
                        let code = inner.last_exit_status;
                        drop(inner);
                        log::info!(proc = self.name.as_str(); "process exited with status {:?}", code);
                        break;
                    } else {
                        inner.state = ProcessState::Suspend;
                        let retry_now = self.retry_count.load(Ordering::SeqCst);
                        drop(inner);
                        if retry_now >= self.config.start_retries as i32 {
                            self.declare_fatal(
                                "exceeded max start retries while exiting during the grace window"
                                    .to_string(),
                            )
                            .await;
                            break;
                        }
                        continue;
                    }
                }
            }
        }
    }

    async fn readiness_watcher(
        self: Arc<Self>,
        deadline: Instant,
        monitor_exited: Arc<AtomicBool>,
        program_exited: Arc<AtomicBool>,
    ) {
        while Instant::now() < deadline && !program_exited.load(Ordering::SeqCst) {
            sleep(Duration::from_millis(100)).await;
        }
        if !program_exited.load(Ordering::SeqCst) {
            let mut inner = self.inner.write().await;
            if inner.state == ProcessState::Starting {
                inner.state = ProcessState::Running;
                drop(inner);
                log::info!(proc = self.name.as_str(); "process started successfully");
            }
        }
        monitor_exited.store(true, Ordering::SeqCst);
        self.start_notify.notify_one();
    }

    async fn declare_fatal(&self, reason: String) {
        log::error!(proc = self.name.as_str(); "process failed to start: {}", reason);
        let mut inner = self.inner.write().await;
        inner.state = ProcessState::Fatal;
        drop(inner);
        self.start_notify.notify_one();
    }

    async fn prepare_sinks(&self) -> io::Result<()> {
        let stdout_sink: Arc<StdMutex<Box<dyn LogSink>>> = Arc::new(StdMutex::new(create_sink(
            &self.name,
            self.config.stdout_logfile(),
            self.config.stdout_logfile_max_bytes,
            self.config.stdout_logfile_backups,
        )));
        let stderr_sink = if self.config.redirect_stderr {
            Arc::clone(&stdout_sink)
        } else {
            Arc::new(StdMutex::new(create_sink(
                &self.name,
                self.config.stderr_logfile(),
                self.config.stderr_logfile_max_bytes,
                self.config.stderr_logfile_backups,
            )))
        };

        let mut inner = self.inner.write().await;
        inner.stdout_sink = Some(stdout_sink);
        inner.stderr_sink = Some(stderr_sink);
        Ok(())
    }

    async fn spawn_child(
        &self,
    ) -> io::Result<(tokio::process::Child, Vec<tokio::task::JoinHandle<()>>)> {
        let argv = self.config.argv();
        let mut cmd = Command::new(&argv[0]);
        if argv.len() > 1 {
            cmd.args(&argv[1..]);
        }
        cmd.env_clear();
        cmd.envs(std::env::vars());
        cmd.envs(self.config.env.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(cwd) = &self.config.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        // Establish a fresh process group so group-targeted signals
        // (stop_as_group/kill_as_group) reach children the supervised
        // process itself spawns.
        unsafe {
            cmd.pre_exec(|| {
                if libc::setpgid(0, 0) != 0 {
                    return Err(io::Error::last_os_error());
                }
                Ok(())
            });
        }

        if let Some(user) = self.config.user.clone() {
            let resolved = self
                .user_resolver
                .resolve(&user)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            unsafe {
                cmd.pre_exec(move || {
                    nix::unistd::setgid(resolved.gid)
                        .map_err(|e| io::Error::from_raw_os_error(e as i32))?;
                    nix::unistd::setuid(resolved.uid)
                        .map_err(|e| io::Error::from_raw_os_error(e as i32))?;
                    Ok(())
                });
            }
        }

        let mut child = cmd.spawn()?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdin = child.stdin.take();

        let mut tasks = Vec::new();
        {
            let inner = self.inner.read().await;
            if let (Some(out), Some(sink)) = (stdout, inner.stdout_sink.clone()) {
                tasks.push(tokio::spawn(copy_to_sink(out, sink)));
            }
            if let Some(err) = stderr {
                let sink = if self.config.redirect_stderr {
                    inner.stdout_sink.clone()
                } else {
                    inner.stderr_sink.clone()
                };
                if let Some(sink) = sink {
                    tasks.push(tokio::spawn(copy_to_sink(err, sink)));
                }
            }
        }

        {
            let mut inner = self.inner.write().await;
            inner.stdin = stdin;
        }

        Ok((child, tasks))
    }

    // ---- stop --------------------------------------------------------

    /// Marks `stop_by_user`, then (unless the child isn't running) runs the
    /// shutdown escalator. If `wait`, blocks until the escalator declares
    /// the child stopped.
    pub async fn stop(self: &Arc<Self>, wait: bool) {
        self.stop_by_user.store(true, Ordering::SeqCst);

        let running = self.inner.read().await.state.is_exist();
        if !running {
            log::info!(proc = self.name.as_str(); "not running, nothing to stop");
            return;
        }
        log::info!(proc = self.name.as_str(); "stopping process");

        let sup = Arc::clone(self);
        let handle = tokio::spawn(async move {
            sup.run_escalator().await;
        });

        if wait {
            let _ = handle.await;
        }
    }

    async fn run_escalator(&self) {
        if self.config.stop_as_group && !self.config.kill_as_group {
            log::warn!(proc = self.name.as_str(); "stop_as_group is set without kill_as_group; kill will only target the leader");
        }

        let mut stopped = false;
        for sig_name in &self.config.stop_signal {
            if stopped {
                break;
            }
            let sig = match parse_signal_name(sig_name) {
                Ok(s) => s,
                Err(e) => {
                    log::warn!(proc = self.name.as_str(); "skipping unrecognized stop signal: {}", e);
                    continue;
                }
            };

            let pid = self.inner.read().await.pid;
            if pid != 0 {
                log::info!(proc = self.name.as_str(), pid = pid; "sending stop signal {}", sig_name);
                let _ = self.signal_sender.kill(pid, sig, self.config.stop_as_group);
            }

            let deadline = Instant::now() + Duration::from_secs(self.config.stop_wait_secs);
            while Instant::now() < deadline {
                if !self.inner.read().await.state.is_exist() {
                    stopped = true;
                    break;
                }
                sleep(Duration::from_millis(10)).await;
            }
        }

        if !stopped {
            log::warn!(proc = self.name.as_str(); "forcing kill after stop signals were ignored");
            let pid = self.inner.read().await.pid;
            if pid != 0 {
                let _ = self
                    .signal_sender
                    .kill(pid, Signal::SIGKILL, self.config.kill_as_group);
            }
            let deadline = Instant::now() + Duration::from_secs(self.config.kill_wait_secs);
            while Instant::now() < deadline {
                if !self.inner.read().await.state.is_exist() {
                    break;
                }
                sleep(Duration::from_millis(10)).await;
            }
        }
    }

    // ---- signal / info -------------------------------------------------

    /// Forwards `sig` to the live child (or its process group). Fails with
    /// `Error::NotRunning` if no child is live.
    pub async fn signal(&self, sig_name: &str, to_group: bool) -> Result<(), Error> {
        let sig = parse_signal_name(sig_name)?;
        let inner = self.inner.read().await;
        if !inner.state.is_exist() {
            return Err(Error::NotRunning {
                name: self.name.clone(),
            });
        }
        let pid = inner.pid;
        drop(inner);
        self.signal_sender.kill(pid, sig, to_group).map_err(Error::Io)
    }

    /// Writes to the child's stdin, if a child is currently live.
    pub async fn write_stdin(&self, data: &[u8]) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        let mut inner = self.inner.write().await;
        match inner.stdin.as_mut() {
            Some(stdin) => stdin.write_all(data).await,
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "no live stdin")),
        }
    }

    pub async fn info(&self) -> Info {
        let inner = self.inner.read().await;
        let now = unix_now();
        Info {
            name: self.name.clone(),
            state_name: inner.state.as_str().to_string(),
            pid: if inner.state.is_failure() { 0 } else { inner.pid },
            start: inner.start_time,
            stop: inner.stop_time,
            now,
            exit_status: inner.last_exit_status,
            stdout_logfile: self.config.stdout_logfile().to_string(),
            stderr_logfile: self.config.stderr_logfile().to_string(),
            description: describe(&inner, now),
        }
    }
}

fn describe(inner: &Inner, now: i64) -> String {
    if inner.state == ProcessState::Running {
        let seconds = (now - inner.start_time).max(0);
        let minutes = seconds / 60;
        let hours = minutes / 60;
        let days = hours / 24;
        if days > 0 {
            format!(
                "pid {}, uptime {} days, {}:{:02}:{:02}",
                inner.pid,
                days,
                hours % 24,
                minutes % 60,
                seconds % 60
            )
        } else {
            format!(
                "pid {}, uptime {}:{:02}:{:02}",
                inner.pid,
                hours % 24,
                minutes % 60,
                seconds % 60
            )
        }
    } else if inner.state != ProcessState::Stopped {
        format!("stopped at {}", inner.stop_time)
    } else {
        String::new()
    }
}

async fn copy_to_sink<R>(mut reader: R, sink: Arc<StdMutex<Box<dyn LogSink>>>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let mut sink = sink.lock().unwrap();
                let _ = sink.write(&buf[..n]);
            }
        }
    }
}

/// Extension trait purely so `HashMap`-backed callers (the registry) can build
/// an `Info` list without reaching into supervisor internals.
pub(crate) async fn infos_of(sups: &HashMap<String, Arc<ProcessSupervisor>>) -> Vec<Info> {
    let mut out = Vec::with_capacity(sups.len());
    for sup in sups.values() {
        out.push(sup.info().await);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessConfig;

    #[tokio::test]
    async fn one_shot_command_runs_to_completion() {
        let cfg = ProcessConfig::builder("/bin/echo")
            .args(["/bin/echo", "bin"])
            .auto_restart(AutoRestart::False)
            .start_secs(0)
            .build();
        let sup = ProcessSupervisor::new("echo-test", cfg);
        sup.start(true).await;

        // Give the starter loop a moment to reap the short-lived child.
        for _ in 0..200 {
            if sup.info().await.state_name == "Exited" {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }

        let info = sup.info().await;
        assert_eq!(info.state_name, "Exited");
        assert_eq!(info.exit_status, Some(0));
    }

    #[tokio::test]
    async fn fatal_after_exhausting_retries() {
        let cfg = ProcessConfig::builder("/no/such/executable-xyz")
            .start_retries(3)
            .restart_pause(0)
            .build();
        let sup = ProcessSupervisor::new("missing-exe", cfg);
        sup.start(true).await;

        assert_eq!(sup.info().await.state_name, "Fatal");
        assert_eq!(sup.retry_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn signal_against_stopped_process_is_not_running() {
        let cfg = ProcessConfig::builder("/bin/true").build();
        let sup = ProcessSupervisor::new("never-started", cfg);
        let res = sup.signal("TERM", false).await;
        assert!(matches!(res, Err(Error::NotRunning { .. })));
    }

    #[tokio::test]
    async fn stop_before_start_is_a_no_op() {
        let cfg = ProcessConfig::builder("/bin/sleep").args(["sleep", "30"]).build();
        let sup = ProcessSupervisor::new("never-started-2", cfg);
        sup.stop(true).await;
        assert_eq!(sup.info().await.state_name, "Stopped");
    }

    #[tokio::test]
    async fn grace_window_promotes_to_running() {
        let cfg = ProcessConfig::builder("/bin/sleep")
            .args(["sleep", "5"])
            .start_secs(1)
            .auto_restart(AutoRestart::True)
            .build();
        let sup = ProcessSupervisor::new("sleeper", cfg);
        sup.start(true).await;

        let info = sup.info().await;
        assert_eq!(info.state_name, "Running");
        assert!(info.pid > 0);
        assert!(info.description.starts_with("pid "));

        sup.stop(true).await;
    }

    #[tokio::test]
    async fn clone_fresh_resets_runtime_state() {
        let cfg = ProcessConfig::builder("/bin/echo").build();
        let sup = ProcessSupervisor::new("clonee", cfg);
        sup.start(true).await;
        sleep(Duration::from_millis(50)).await;

        let clone = sup.clone_fresh();
        assert_eq!(clone.info().await.state_name, "Stopped");
        assert_ne!(clone.instance_id(), sup.instance_id());
    }
}

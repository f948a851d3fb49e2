//! User lookup for running a child as a different (typically unprivileged) user.

use crate::error::Error;
use nix::unistd::{Gid, Uid};

/// The uid/gid pair to apply to a child before `execve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedUser {
    pub uid: Uid,
    pub gid: Gid,
}

/// Abstracts "look up a user by name and return the uid/gid to run as".
pub trait UserResolver: Send + Sync {
    fn resolve(&self, user: &str) -> Result<ResolvedUser, Error>;
}

/// Default Unix implementation, backed by `nix::unistd::User::from_name`
/// (a thin wrapper over `getpwnam`).
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixUserResolver;

impl UserResolver for UnixUserResolver {
    fn resolve(&self, user: &str) -> Result<ResolvedUser, Error> {
        match nix::unistd::User::from_name(user) {
            Ok(Some(u)) => Ok(ResolvedUser {
                uid: u.uid,
                gid: u.gid,
            }),
            Ok(None) => Err(Error::UserResolve {
                user: user.to_string(),
                reason: "no such user".to_string(),
            }),
            Err(errno) => Err(Error::UserResolve {
                user: user.to_string(),
                reason: errno.to_string(),
            }),
        }
    }
}

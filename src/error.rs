//! Typed errors returned by the public API.
//!
//! The state machine itself never panics on child misbehavior: transient spawn
//! errors cycle through the retry policy and terminal failures are encoded in
//! `ProcessState::Fatal` and surfaced via `Info`, not thrown. These variants cover
//! the programmer-facing errors — duplicate names, missing lookups, operating on
//! a child that isn't live, and the handful of fatal conditions that can end an
//! attempt early.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("process `{name}` already exists")]
    NameExists { name: String },

    #[error("process `{name}` not found")]
    NotFound { name: String },

    #[error("process `{name}` is not running")]
    NotRunning { name: String },

    #[error("failed to spawn process: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to resolve user `{user}`: {reason}")]
    UserResolve { user: String, reason: String },

    #[error("bad log read arguments: offset={offset} length={length}")]
    BadLogArgs { offset: i64, length: i64 },

    #[error("unrecognized signal name `{0}`")]
    BadSignalName(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

//! In-process supervision for child processes.
//!
//! A [`ProcessSupervisor`] owns one child's lifecycle: spawn, grace-window
//! readiness classification, auto-restart policy, signal-escalation shutdown,
//! and rotating log capture. A [`ProcessRegistry`] owns a named set of them.
//!
//! Platform-specific capabilities ([`SignalSender`], [`UserResolver`]) are
//! abstracted behind traits with Unix defaults so the core state machine stays
//! testable without a real process tree where possible, and so callers can
//! substitute their own sandboxed implementations.

pub mod config;
pub mod error;
pub mod registry;
pub mod signal;
pub mod sink;
pub mod state;
pub mod supervisor;
pub mod user;

pub use config::{AutoRestart, ProcessConfig, ProcessConfigBuilder};
pub use error::Error;
pub use registry::ProcessRegistry;
pub use signal::{SignalSender, UnixSignalSender};
pub use sink::LogSink;
pub use state::ProcessState;
pub use supervisor::{Info, ProcessSupervisor};
pub use user::{ResolvedUser, UnixUserResolver, UserResolver};

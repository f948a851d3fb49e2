//! Signal-name parsing and OS-level "send signal, optionally to process group".

use crate::error::Error;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// Parses a signal name such as `"TERM"`, `"SIGTERM"`, or `"KILL"` into a
/// [`Signal`]. Case-insensitive; the `SIG` prefix is optional.
pub fn parse_signal_name(name: &str) -> Result<Signal, Error> {
    let trimmed = name.trim();
    let upper = trimmed.to_uppercase();
    let canonical = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{upper}")
    };
    canonical
        .parse::<Signal>()
        .map_err(|_| Error::BadSignalName(name.to_string()))
}

/// Abstracts sending a signal to a live child, optionally fanned out to its
/// process group (the group leader is established at spawn time via
/// `setpgid`).
pub trait SignalSender: Send + Sync {
    fn kill(&self, pid: u32, signal: Signal, to_group: bool) -> std::io::Result<()>;
}

/// Default Unix implementation, backed by `nix::sys::signal::kill`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixSignalSender;

impl SignalSender for UnixSignalSender {
    fn kill(&self, pid: u32, signal: Signal, to_group: bool) -> std::io::Result<()> {
        let target = if to_group {
            Pid::from_raw(-(pid as i32))
        } else {
            Pid::from_raw(pid as i32)
        };
        signal::kill(target, signal).map_err(|errno| std::io::Error::from_raw_os_error(errno as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_name() {
        assert_eq!(parse_signal_name("TERM").unwrap(), Signal::SIGTERM);
    }

    #[test]
    fn parses_full_name_case_insensitive() {
        assert_eq!(parse_signal_name("sigkill").unwrap(), Signal::SIGKILL);
    }

    #[test]
    fn rejects_unknown_name() {
        assert!(parse_signal_name("NOTASIGNAL").is_err());
    }
}

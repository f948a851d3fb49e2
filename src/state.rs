//! The per-child lifecycle state and its derived predicate sets.

use std::fmt;

/// Lifecycle state of a single supervised child.
///
/// `Exist` and `Failure` are not separate variants but predicate sets over this
/// enum (see [`ProcessState::is_exist`] / [`ProcessState::is_failure`]) — a plain
/// enum reads better here than a bitmask, and `matches!` keeps the predicates
/// one-liners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProcessState {
    Stopped,
    Starting,
    Running,
    Suspend,
    Stopping,
    Exited,
    Fatal,
    Unknown,
}

impl ProcessState {
    /// True when an OS child exists right now (live handle, reap in flight).
    pub fn is_exist(self) -> bool {
        matches!(
            self,
            ProcessState::Running | ProcessState::Starting | ProcessState::Stopping
        )
    }

    /// True when no live OS child backs this supervisor.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            ProcessState::Stopped
                | ProcessState::Fatal
                | ProcessState::Unknown
                | ProcessState::Exited
                | ProcessState::Suspend
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessState::Stopped => "Stopped",
            ProcessState::Starting => "Starting",
            ProcessState::Running => "Running",
            ProcessState::Suspend => "Suspend",
            ProcessState::Stopping => "Stopping",
            ProcessState::Exited => "Exited",
            ProcessState::Fatal => "Fatal",
            ProcessState::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ProcessState {
    fn default() -> Self {
        ProcessState::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exist_and_failure_partition_all_states() {
        let all = [
            ProcessState::Stopped,
            ProcessState::Starting,
            ProcessState::Running,
            ProcessState::Suspend,
            ProcessState::Stopping,
            ProcessState::Exited,
            ProcessState::Fatal,
            ProcessState::Unknown,
        ];
        for s in all {
            assert_ne!(s.is_exist(), s.is_failure(), "state {s} must be exactly one of Exist/Failure");
        }
    }

    #[test]
    fn running_starting_stopping_are_exist() {
        assert!(ProcessState::Running.is_exist());
        assert!(ProcessState::Starting.is_exist());
        assert!(ProcessState::Stopping.is_exist());
    }

    #[test]
    fn default_state_is_stopped() {
        assert_eq!(ProcessState::default(), ProcessState::Stopped);
    }
}

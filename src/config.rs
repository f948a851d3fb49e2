//! Immutable-by-convention configuration for a single supervised child.

use std::collections::HashMap;
use std::path::PathBuf;

/// Auto-restart policy: whether a terminated child should be respawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AutoRestart {
    /// Never restart.
    False,
    /// Always restart.
    True,
    /// Restart only when the exit code is not in `expected_exit_codes`.
    Unexpected,
}

impl Default for AutoRestart {
    fn default() -> Self {
        AutoRestart::True
    }
}

/// Configuration for a single child process.
///
/// Constructed with [`ProcessConfigBuilder`]; once built, treat it as a value
/// that supervisors clone rather than mutate in place.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProcessConfig {
    pub path: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub cwd: Option<PathBuf>,
    pub user: Option<String>,

    pub auto_start: bool,
    pub start_secs: u64,
    pub auto_restart: AutoRestart,
    pub expected_exit_codes: Vec<i32>,
    pub start_retries: u32,
    pub restart_pause: u64,

    pub stdout_logfile: String,
    pub stdout_logfile_max_bytes: u64,
    pub stdout_logfile_backups: u32,
    pub redirect_stderr: bool,
    pub stderr_logfile: String,
    pub stderr_logfile_max_bytes: u64,
    pub stderr_logfile_backups: u32,

    pub stop_as_group: bool,
    pub kill_as_group: bool,
    pub stop_signal: Vec<String>,
    pub stop_wait_secs: u64,
    pub kill_wait_secs: u64,

    pub priority: i32,
    pub restart_when_binary_changed: bool,

    /// Extra file descriptors to inherit into the child, identified by a
    /// caller-chosen label (actual FD wiring is platform code, not modeled here).
    pub extra_files: Vec<String>,

    /// Opaque caller-tagged extension bag.
    pub extend: HashMap<String, String>,
}

impl ProcessConfig {
    pub fn builder(path: impl Into<String>) -> ProcessConfigBuilder {
        ProcessConfigBuilder::new(path)
    }

    /// Resolved argv, with `args[0]` defaulting to `path` when unset.
    pub fn argv(&self) -> Vec<String> {
        if self.args.is_empty() {
            vec![self.path.clone()]
        } else {
            self.args.clone()
        }
    }

    /// The stdout sink descriptor string this process will be resolved against.
    pub fn stdout_logfile(&self) -> &str {
        &self.stdout_logfile
    }

    /// The stderr sink descriptor string this process will be resolved against.
    ///
    /// Reads only `stderr_logfile` — a known bug in the system this crate is
    /// descended from falls back to the stdout path here under some conditions;
    /// that bug is deliberately not replicated.
    pub fn stderr_logfile(&self) -> &str {
        &self.stderr_logfile
    }
}

/// Builds a [`ProcessConfig`], mirroring the `Option`-function configuration
/// style of the system this crate generalizes, translated into idiomatic
/// consuming builder methods.
#[derive(Debug, Clone)]
pub struct ProcessConfigBuilder {
    cfg: ProcessConfig,
}

impl ProcessConfigBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        ProcessConfigBuilder {
            cfg: ProcessConfig {
                path,
                args: Vec::new(),
                env: HashMap::new(),
                cwd: None,
                user: None,
                auto_start: true,
                start_secs: 1,
                auto_restart: AutoRestart::True,
                expected_exit_codes: vec![0, 2],
                start_retries: 3,
                restart_pause: 0,
                stdout_logfile: String::new(),
                stdout_logfile_max_bytes: 50 * 1024 * 1024,
                stdout_logfile_backups: 10,
                redirect_stderr: false,
                stderr_logfile: String::new(),
                stderr_logfile_max_bytes: 50 * 1024 * 1024,
                stderr_logfile_backups: 10,
                stop_as_group: false,
                kill_as_group: false,
                stop_signal: vec!["TERM".to_string()],
                stop_wait_secs: 10,
                kill_wait_secs: 2,
                priority: 999,
                restart_when_binary_changed: false,
                extra_files: Vec::new(),
                extend: HashMap::new(),
            },
        }
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cfg.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cfg.env.insert(key.into(), value.into());
        self
    }

    pub fn envs(mut self, envs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.cfg.env.extend(envs);
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.cwd = Some(dir.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.cfg.user = Some(user.into());
        self
    }

    pub fn auto_start(mut self, on: bool) -> Self {
        self.cfg.auto_start = on;
        self
    }

    pub fn start_secs(mut self, secs: u64) -> Self {
        self.cfg.start_secs = secs;
        self
    }

    pub fn auto_restart(mut self, mode: AutoRestart) -> Self {
        self.cfg.auto_restart = mode;
        self
    }

    pub fn expected_exit_codes(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.cfg.expected_exit_codes = codes.into_iter().collect();
        self
    }

    pub fn start_retries(mut self, n: u32) -> Self {
        self.cfg.start_retries = n;
        self
    }

    pub fn restart_pause(mut self, secs: u64) -> Self {
        self.cfg.restart_pause = secs;
        self
    }

    pub fn stdout_logfile(mut self, file: impl Into<String>, max_bytes: &str) -> Self {
        self.cfg.stdout_logfile = file.into();
        self.cfg.stdout_logfile_max_bytes = parse_byte_size(max_bytes, 50 * 1024 * 1024);
        self
    }

    pub fn stdout_logfile_backups(mut self, n: u32) -> Self {
        self.cfg.stdout_logfile_backups = n;
        self
    }

    pub fn redirect_stderr(mut self, on: bool) -> Self {
        self.cfg.redirect_stderr = on;
        self
    }

    pub fn stderr_logfile(mut self, file: impl Into<String>, max_bytes: &str) -> Self {
        self.cfg.stderr_logfile = file.into();
        self.cfg.stderr_logfile_max_bytes = parse_byte_size(max_bytes, 50 * 1024 * 1024);
        self
    }

    pub fn stderr_logfile_backups(mut self, n: u32) -> Self {
        self.cfg.stderr_logfile_backups = n;
        self
    }

    pub fn stop_as_group(mut self, on: bool) -> Self {
        self.cfg.stop_as_group = on;
        self
    }

    pub fn kill_as_group(mut self, on: bool) -> Self {
        self.cfg.kill_as_group = on;
        self
    }

    pub fn stop_signal(mut self, sigs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cfg.stop_signal = sigs.into_iter().map(Into::into).collect();
        self
    }

    pub fn stop_wait_secs(mut self, secs: u64) -> Self {
        self.cfg.stop_wait_secs = secs;
        self
    }

    pub fn kill_wait_secs(mut self, secs: u64) -> Self {
        self.cfg.kill_wait_secs = secs;
        self
    }

    pub fn priority(mut self, pri: i32) -> Self {
        self.cfg.priority = pri;
        self
    }

    pub fn restart_when_binary_changed(mut self, on: bool) -> Self {
        self.cfg.restart_when_binary_changed = on;
        self
    }

    pub fn extra_files(mut self, files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cfg.extra_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn extend(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cfg.extend.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> ProcessConfig {
        self.cfg
    }
}

/// Parses a byte-size string like `"50MB"`, `"10KB"`, `"1GB"`, or a bare integer
/// (interpreted as bytes). Unrecognized suffixes fall back to `default`.
pub fn parse_byte_size(s: &str, default: u64) -> u64 {
    let s = s.trim();
    if s.is_empty() {
        return default;
    }
    if let Ok(n) = s.parse::<u64>() {
        return n;
    }
    let upper = s.to_uppercase();
    let (digits, mult) = if let Some(d) = upper.strip_suffix("GB") {
        (d, 1024 * 1024 * 1024)
    } else if let Some(d) = upper.strip_suffix("MB") {
        (d, 1024 * 1024)
    } else if let Some(d) = upper.strip_suffix("KB") {
        (d, 1024)
    } else if let Some(d) = upper.strip_suffix('B') {
        (d, 1)
    } else {
        return default;
    };
    digits
        .trim()
        .parse::<u64>()
        .map(|n| n * mult)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_spec() {
        let cfg = ProcessConfig::builder("/bin/true").build();
        assert_eq!(cfg.start_secs, 1);
        assert_eq!(cfg.start_retries, 3);
        assert_eq!(cfg.restart_pause, 0);
        assert_eq!(cfg.expected_exit_codes, vec![0, 2]);
        assert_eq!(cfg.stop_wait_secs, 10);
        assert_eq!(cfg.kill_wait_secs, 2);
        assert_eq!(cfg.priority, 999);
        assert_eq!(cfg.stdout_logfile_max_bytes, 50 * 1024 * 1024);
        assert_eq!(cfg.stdout_logfile_backups, 10);
        assert!(matches!(cfg.auto_restart, AutoRestart::True));
    }

    #[test]
    fn argv_defaults_to_path() {
        let cfg = ProcessConfig::builder("/usr/bin/ls").build();
        assert_eq!(cfg.argv(), vec!["/usr/bin/ls".to_string()]);
    }

    #[test]
    fn argv_uses_explicit_args() {
        let cfg = ProcessConfig::builder("/usr/bin/ls")
            .args(["ls", "-la"])
            .build();
        assert_eq!(cfg.argv(), vec!["ls".to_string(), "-la".to_string()]);
    }

    #[test]
    fn byte_size_parsing() {
        assert_eq!(parse_byte_size("50MB", 0), 50 * 1024 * 1024);
        assert_eq!(parse_byte_size("10KB", 0), 10 * 1024);
        assert_eq!(parse_byte_size("1GB", 0), 1024 * 1024 * 1024);
        assert_eq!(parse_byte_size("100", 0), 100);
        assert_eq!(parse_byte_size("", 42), 42);
        assert_eq!(parse_byte_size("garbage", 42), 42);
    }

    #[test]
    fn stderr_logfile_never_falls_back_to_stdout_path() {
        let cfg = ProcessConfig::builder("/bin/true")
            .stdout_logfile("/tmp/out.log", "1MB")
            .build();
        assert_eq!(cfg.stderr_logfile(), "");
    }
}

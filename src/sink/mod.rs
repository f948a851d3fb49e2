//! Output targets for a child's captured stdout/stderr.
//!
//! The supervisor depends only on the [`LogSink`] trait; concrete variants are
//! rotating file, stdout/stderr pass-through, local/remote syslog, null, and a
//! composite that fans writes to all members while delegating reads to the
//! first.

mod composite;
mod file;
mod null;
mod stream;
mod syslog;

pub use composite::CompositeSink;
pub use file::FileSink;
pub use null::NullSink;
pub use stream::StdStreamSink;
pub use syslog::{RemoteSyslogSink, SyslogSink};

use crate::error::Error;
use std::io;

/// Abstract output target for a child's captured stdout/stderr.
pub trait LogSink: Send {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
    fn close(&mut self) -> io::Result<()>;
    fn set_pid(&mut self, pid: u32);
    fn read_log(&self, offset: i64, length: i64) -> Result<String, Error>;
    fn read_tail_log(&self, offset: i64, length: i64) -> Result<(String, i64, bool), Error>;
    fn clear_cur_log_file(&mut self) -> io::Result<()>;
    fn clear_all_log_files(&mut self) -> io::Result<()>;
}

/// Resolves a sink descriptor string (see module docs for the grammar) into a
/// concrete [`LogSink`].
///
/// - `/dev/stdout`, `/dev/stderr` → pass-through.
/// - `/dev/null` or empty → discard.
/// - `syslog` → local syslog.
/// - `syslog @ proto:host:port` → remote syslog.
/// - comma-separated list → composite, first member canonical for reads.
/// - anything else → rotating file.
pub fn create_sink(program_name: &str, descriptor: &str, max_bytes: u64, backups: u32) -> Box<dyn LogSink> {
    let names: Vec<&str> = descriptor.split(',').map(str::trim).collect();
    if names.len() <= 1 {
        create_single_sink(program_name, descriptor.trim(), max_bytes, backups)
    } else {
        let sinks = names
            .into_iter()
            .map(|n| create_single_sink(program_name, n, max_bytes, backups))
            .collect();
        Box::new(CompositeSink::new(sinks))
    }
}

fn create_single_sink(program_name: &str, descriptor: &str, max_bytes: u64, backups: u32) -> Box<dyn LogSink> {
    match descriptor {
        "/dev/stdout" => Box::new(StdStreamSink::stdout()),
        "/dev/stderr" => Box::new(StdStreamSink::stderr()),
        "/dev/null" | "" => Box::new(NullSink::default()),
        "syslog" => Box::new(SyslogSink::new(program_name)),
        d if d.starts_with("syslog") && d.contains('@') => {
            let mut parts = d.splitn(2, '@');
            let _ = parts.next();
            let remote = parts.next().unwrap_or("").trim();
            Box::new(RemoteSyslogSink::new(program_name, remote))
        }
        d => Box::new(FileSink::new(d, max_bytes, backups)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_descriptor_is_null() {
        let mut sink = create_sink("proc", "", 1024, 1);
        assert_eq!(sink.write(b"hi").unwrap(), 2);
    }

    #[test]
    fn comma_list_is_composite() {
        let sink = create_sink("proc", "/dev/null,/dev/stdout", 1024, 1);
        // just check it builds without panicking; behavior covered in composite tests
        drop(sink);
    }
}

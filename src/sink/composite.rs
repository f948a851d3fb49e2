use super::LogSink;
use crate::error::Error;
use std::io;
use std::sync::Mutex;

/// Fans writes out to every member sink while delegating reads/tail/clear to
/// the first (canonical) member.
pub struct CompositeSink {
    lock: Mutex<()>,
    sinks: Vec<Box<dyn LogSink>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Box<dyn LogSink>>) -> Self {
        CompositeSink {
            lock: Mutex::new(()),
            sinks,
        }
    }
}

impl LogSink for CompositeSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _guard = self.lock.lock().unwrap();
        let mut result = Ok(buf.len());
        for (i, sink) in self.sinks.iter_mut().enumerate() {
            let r = sink.write(buf);
            if i == 0 {
                result = r;
            }
        }
        result
    }

    fn close(&mut self) -> io::Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut result = Ok(());
        for (i, sink) in self.sinks.iter_mut().enumerate() {
            let r = sink.close();
            if i == 0 {
                result = r;
            }
        }
        result
    }

    fn set_pid(&mut self, pid: u32) {
        let _guard = self.lock.lock().unwrap();
        for sink in self.sinks.iter_mut() {
            sink.set_pid(pid);
        }
    }

    fn read_log(&self, offset: i64, length: i64) -> Result<String, Error> {
        self.sinks[0].read_log(offset, length)
    }

    fn read_tail_log(&self, offset: i64, length: i64) -> Result<(String, i64, bool), Error> {
        self.sinks[0].read_tail_log(offset, length)
    }

    fn clear_cur_log_file(&mut self) -> io::Result<()> {
        self.sinks[0].clear_cur_log_file()
    }

    fn clear_all_log_files(&mut self) -> io::Result<()> {
        self.sinks[0].clear_all_log_files()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{FileSink, NullSink};
    use tempfile::tempdir;

    #[test]
    fn write_goes_to_all_members() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("composite.log");
        let file_sink = FileSink::new(path.to_str().unwrap(), 10 * 1024, 3);
        let mut composite = CompositeSink::new(vec![Box::new(file_sink), Box::new(NullSink)]);

        composite.write(b"hello").unwrap();
        composite.close().unwrap();

        assert_eq!(composite.read_log(0, 0).unwrap(), "hello");
    }
}

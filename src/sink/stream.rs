use super::LogSink;
use crate::error::Error;
use std::io::{self, Write};

/// Pass-through sink writing to the host's own stdout or stderr.
pub struct StdStreamSink {
    target: StreamTarget,
}

enum StreamTarget {
    Stdout,
    Stderr,
}

impl StdStreamSink {
    pub fn stdout() -> Self {
        StdStreamSink {
            target: StreamTarget::Stdout,
        }
    }

    pub fn stderr() -> Self {
        StdStreamSink {
            target: StreamTarget::Stderr,
        }
    }
}

impl LogSink for StdStreamSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.target {
            StreamTarget::Stdout => io::stdout().write(buf),
            StreamTarget::Stderr => io::stderr().write(buf),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn set_pid(&mut self, _pid: u32) {}

    fn read_log(&self, _offset: i64, _length: i64) -> Result<String, Error> {
        Ok(String::new())
    }

    fn read_tail_log(&self, offset: i64, _length: i64) -> Result<(String, i64, bool), Error> {
        Ok((String::new(), offset, true))
    }

    fn clear_cur_log_file(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn clear_all_log_files(&mut self) -> io::Result<()> {
        Ok(())
    }
}

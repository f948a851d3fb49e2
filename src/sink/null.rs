use super::LogSink;
use crate::error::Error;
use std::io;

/// Discards everything written to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
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

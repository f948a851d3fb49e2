use super::LogSink;
use crate::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Rotating file sink.
///
/// When written bytes push the file's size past `max_bytes`, the existing
/// backups shift up by one (`name.(i)` → `name.(i+1)` for `i = backups-1 .. 1`),
/// the current file becomes `name.1`, and a fresh file is opened.
pub struct FileSink {
    name: String,
    max_bytes: u64,
    backups: u32,
    file_size: u64,
    file: Option<File>,
}

impl FileSink {
    pub fn new(name: &str, max_bytes: u64, backups: u32) -> Self {
        let mut sink = FileSink {
            name: name.to_string(),
            max_bytes: max_bytes.max(1),
            backups,
            file_size: 0,
            file: None,
        };
        let _ = sink.open_file(false);
        sink
    }

    fn backup_files(&self) {
        for i in (1..self.backups).rev() {
            let src = format!("{}.{}", self.name, i);
            let dest = format!("{}.{}", self.name, i + 1);
            if fs::metadata(&src).is_ok() {
                let _ = fs::rename(&src, &dest);
            }
        }
        let dest = format!("{}.1", self.name);
        let _ = fs::rename(&self.name, &dest);
    }

    fn open_file(&mut self, trunc: bool) -> io::Result<()> {
        if let Some(f) = self.file.take() {
            drop(f);
        }
        let existing_len = fs::metadata(&self.name).map(|m| m.len()).ok();
        if trunc || existing_len.is_none() {
            self.file = Some(File::create(&self.name)?);
            self.file_size = 0;
        } else {
            self.file_size = existing_len.unwrap_or(0);
            self.file = Some(OpenOptions::new().read(true).write(true).append(true).open(&self.name)?);
        }
        Ok(())
    }

    fn read_file(&self) -> io::Result<(File, u64)> {
        let f = File::open(&self.name)?;
        let len = f.metadata()?.len();
        Ok((f, len))
    }
}

impl LogSink for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file not open"))?;
        let n = file.write(buf)?;
        self.file_size += n as u64;

        if self.file_size >= self.max_bytes {
            if let Ok(meta) = fs::metadata(&self.name) {
                self.file_size = meta.len();
            }
        }
        if self.file_size >= self.max_bytes {
            self.close()?;
            self.backup_files();
            self.open_file(true)?;
        }
        Ok(n)
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(f) = self.file.take() {
            drop(f);
        }
        Ok(())
    }

    fn set_pid(&mut self, _pid: u32) {}

    fn read_log(&self, offset: i64, length: i64) -> Result<String, Error> {
        if offset < 0 && length != 0 {
            return Err(Error::BadLogArgs { offset, length });
        }
        if offset >= 0 && length < 0 {
            return Err(Error::BadLogArgs { offset, length });
        }

        let (mut f, file_len) = self.read_file()?;
        let file_len = file_len as i64;

        let (offset, length) = if offset < 0 {
            let mut off = file_len + offset;
            if off < 0 {
                off = 0;
            }
            (off, file_len - off)
        } else if length == 0 {
            if offset > file_len {
                return Ok(String::new());
            }
            (offset, file_len - offset)
        } else {
            if offset >= file_len {
                return Ok(String::new());
            }
            let len = if offset + length > file_len {
                file_len - offset
            } else {
                length
            };
            (offset, len)
        };

        let mut buf = vec![0u8; length.max(0) as usize];
        f.seek(SeekFrom::Start(offset as u64))?;
        let n = f.read(&mut buf)?;
        buf.truncate(n);
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn read_tail_log(&self, offset: i64, length: i64) -> Result<(String, i64, bool), Error> {
        if offset < 0 {
            return Err(Error::BadLogArgs { offset, length });
        }
        if length < 0 {
            return Err(Error::BadLogArgs { offset, length });
        }

        let (mut f, file_len) = self.read_file()?;
        let file_len = file_len as i64;

        if offset >= file_len {
            return Ok((String::new(), file_len, true));
        }

        let length = if offset + length > file_len {
            file_len - offset
        } else {
            length
        };

        let mut buf = vec![0u8; length.max(0) as usize];
        f.seek(SeekFrom::Start(offset as u64))?;
        let n = f.read(&mut buf)?;
        buf.truncate(n);
        Ok((String::from_utf8_lossy(&buf).into_owned(), offset + n as i64, false))
    }

    fn clear_cur_log_file(&mut self) -> io::Result<()> {
        self.open_file(true)
    }

    fn clear_all_log_files(&mut self) -> io::Result<()> {
        for i in (1..=self.backups).rev() {
            let backup = format!("{}.{}", self.name, i);
            if fs::metadata(&backup).is_ok() {
                fs::remove_file(&backup)?;
            }
        }
        self.open_file(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_are_appended_and_readable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        let path_str = path.to_str().unwrap();

        let mut sink = FileSink::new(path_str, 10 * 1024, 3);
        sink.write(b"hello ").unwrap();
        sink.write(b"world").unwrap();
        sink.close().unwrap();

        let content = sink.read_log(0, 0).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn negative_offset_reads_from_tail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        let mut sink = FileSink::new(path.to_str().unwrap(), 10 * 1024, 3);
        sink.write(b"0123456789").unwrap();
        sink.close().unwrap();

        let content = sink.read_log(-4, 0).unwrap();
        assert_eq!(content, "6789");
    }

    #[test]
    fn bad_log_args_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        let sink = FileSink::new(path.to_str().unwrap(), 10 * 1024, 3);
        assert!(sink.read_log(-1, 5).is_err());
        assert!(sink.read_log(1, -5).is_err());
    }

    #[test]
    fn read_tail_log_reports_done_at_eof() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        let mut sink = FileSink::new(path.to_str().unwrap(), 10 * 1024, 3);
        sink.write(b"abc").unwrap();
        sink.close().unwrap();

        let (data, new_offset, done) = sink.read_tail_log(0, 100).unwrap();
        assert_eq!(data, "abc");
        assert_eq!(new_offset, 3);
        assert!(!done);

        let (data, new_offset, done) = sink.read_tail_log(3, 100).unwrap();
        assert_eq!(data, "");
        assert_eq!(new_offset, 3);
        assert!(done);
    }

    #[test]
    fn rotates_when_threshold_exceeded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rot.log");
        let path_str = path.to_str().unwrap().to_string();

        // Small threshold: every write bigger than 5 bytes rotates immediately.
        let mut sink = FileSink::new(&path_str, 5, 2);
        for chunk in ["aaaaa", "bbbbb", "ccccc"] {
            sink.write(chunk.as_bytes()).unwrap();
        }
        sink.close().unwrap();

        // Primary file holds the most recent chunk only.
        assert!(fs::metadata(&path_str).unwrap().len() <= 5);
        // At most `backups` rotated files exist.
        let rotated: Vec<_> = (1..=2)
            .filter(|i| fs::metadata(format!("{path_str}.{i}")).is_ok())
            .collect();
        assert!(rotated.len() <= 2);
    }
}

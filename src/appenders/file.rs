//! File appender implementation

use crate::core::{Appender, LogRecord, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Appends lines to a file.
///
/// Every line is flushed as soon as it is written unless
/// [`with_auto_flush(false)`](Self::with_auto_flush) is used. With the `file`
/// feature, [`with_file_lock`](Self::with_file_lock) additionally takes an
/// advisory exclusive lock around each write so several processes can share
/// one log file without splicing lines.
pub struct FileAppender {
    #[cfg_attr(not(feature = "file"), allow(dead_code))]
    path: PathBuf,
    writer: BufWriter<File>,
    auto_flush: bool,
    #[cfg(feature = "file")]
    file_lock: bool,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            auto_flush: true,
            #[cfg(feature = "file")]
            file_lock: false,
        })
    }

    #[must_use]
    pub fn with_auto_flush(mut self, auto_flush: bool) -> Self {
        self.auto_flush = auto_flush;
        self
    }

    /// Hold an exclusive advisory lock on the file while writing each line
    #[cfg(feature = "file")]
    #[must_use]
    pub fn with_file_lock(mut self, file_lock: bool) -> Self {
        self.file_lock = file_lock;
        self
    }

    #[cfg(feature = "file")]
    fn write_locked(&mut self, bytes: &[u8]) -> Result<()> {
        use fs2::FileExt;

        let path = self.path.display().to_string();
        let writer = &mut self.writer;

        FileExt::lock_exclusive(writer.get_ref())
            .map_err(|_| LoggerError::file_lock(path.clone()))?;
        let result = writer.write_all(bytes).and_then(|()| writer.flush());
        let unlock = FileExt::unlock(writer.get_ref());

        result?;
        unlock.map_err(|_| LoggerError::file_lock(path))
    }
}

impl Appender for FileAppender {
    fn append(&mut self, record: &LogRecord<'_>) -> Result<()> {
        let mut output = record.to_string();
        output.push('\n');

        #[cfg(feature = "file")]
        if self.file_lock {
            return self.write_locked(output.as_bytes());
        }

        self.writer.write_all(output.as_bytes())?;
        if self.auto_flush {
            self.writer.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

//! Appender trait for the line sink

use super::{error::Result, log_record::LogRecord};

/// Destination for rendered log lines.
///
/// `append` writes exactly one line, newline included. The logger calls it
/// only while holding its backend lock, so implementations need no locking
/// of their own.
pub trait Appender: Send {
    fn append(&mut self, record: &LogRecord<'_>) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

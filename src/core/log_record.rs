//! One log line, captured and rendered inside a single `emit` call

use super::timestamp::Timestamp;
use std::fmt;

/// Everything that goes into one output line.
///
/// Records borrow the call site and are never kept beyond the `emit` call
/// that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord<'a> {
    pub timestamp: Option<Timestamp>,
    pub thread: String,
    pub file: &'a str,
    pub line: u32,
    pub message: String,
}

impl LogRecord<'_> {
    /// The `(file:line)` field
    pub fn call_site(&self) -> String {
        format!("({}:{})", self.file, self.line)
    }
}

/// Plain text layout: `<timestamp> <thread> (<file>:<line>) <message>`.
///
/// The timestamp field and its separator are left out when no time is
/// available. No trailing newline.
impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref timestamp) = self.timestamp {
            write!(f, "{} ", timestamp)?;
        }
        write!(
            f,
            "{} ({}:{}) {}",
            self.thread, self.file, self.line, self.message
        )
    }
}

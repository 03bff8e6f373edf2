//! Console appender implementation

use crate::core::{Appender, LogRecord, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Writes each line to stdout.
///
/// With the `console` feature, the timestamp, thread and call-site fields can
/// be dimmed so the message stands out.
pub struct ConsoleAppender {
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    /// Dim the metadata fields (requires the `console` feature; ignored
    /// otherwise)
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn format_line(&self, record: &LogRecord<'_>) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            let prefix = match record.timestamp {
                Some(ref timestamp) => format!("{} {}", timestamp, record.thread),
                None => record.thread.clone(),
            };
            return format!(
                "{} {} {}",
                prefix.dimmed(),
                record.call_site().cyan(),
                record.message
            );
        }

        record.to_string()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &LogRecord<'_>) -> Result<()> {
        let mut line = self.format_line(record);
        line.push('\n');

        // one write call per line
        std::io::stdout().lock().write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

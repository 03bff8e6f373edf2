//! In-memory appender

use crate::core::{Appender, LogRecord, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps every line in memory.
///
/// Clones share the same buffer, so a host can keep one clone for inspection
/// and hand the other to the logger.
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines written so far, without trailing newlines
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, record: &LogRecord<'_>) -> Result<()> {
        self.lines.lock().push(record.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let inspector = MemoryAppender::new();
        let mut writer = inspector.clone();

        writer
            .append(&LogRecord {
                timestamp: None,
                thread: "main".to_string(),
                file: "m.c",
                line: 1,
                message: "hi".to_string(),
            })
            .unwrap();

        assert_eq!(inspector.lines(), vec!["main (m.c:1) hi"]);
        assert_eq!(inspector.len(), 1);

        inspector.clear();
        assert!(writer.is_empty());
    }
}

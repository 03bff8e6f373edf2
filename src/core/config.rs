//! Logger configuration
//!
//! A [`LoggerConfig`] captures every platform choice that used to be baked in
//! at compile time: which clock feeds the timestamp, how threads are labelled
//! and whether messages go through a bounded scratch buffer. Configurations
//! can be written by hand, taken from the [`hosted`](LoggerConfig::hosted) and
//! [`rtos`](LoggerConfig::rtos) presets, or loaded from JSON.
//!
//! # Example
//!
//! ```
//! use rt_line_logger::{LoggerConfig, TimeConfig};
//!
//! let config = LoggerConfig::from_json_str(
//!     r#"{ "enabled": true, "time": { "kind": "tick", "hz": 100 }, "max_message_len": 128 }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.time, TimeConfig::Tick { hz: 100 });
//! assert_eq!(config.max_message_len, Some(128));
//! ```

use super::error::{LoggerError, Result};
use super::message_buffer::{MessageBuffer, TRUNCATION_MARKER};
use super::thread_label::{ThreadLabeler, ThreadName, ThreadNumber};
use super::timestamp::{NoClock, TickCounter, TimeSource, WallClock, DEFAULT_TICK_HZ};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scratch buffer size used by the RTOS preset
pub const RTOS_CONSOLE_BUF_LEN: usize = 128;

/// Which clock feeds the timestamp field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeConfig {
    /// Local calendar time, `MM-DD HH:MM:SS.mmm`
    #[default]
    WallClock,
    /// Kernel tick counter running at `hz`
    Tick { hz: u32 },
    /// No timestamp field at all
    Disabled,
}

impl TimeConfig {
    pub fn time_source(&self) -> Box<dyn TimeSource> {
        match *self {
            TimeConfig::WallClock => Box::new(WallClock),
            TimeConfig::Tick { hz } => Box::new(TickCounter::new(hz)),
            TimeConfig::Disabled => Box::new(NoClock),
        }
    }
}

/// How the thread field is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadLabelConfig {
    /// Thread name, falling back to `tid:<n>`
    Name,
    /// Always `tid:<n>`
    #[default]
    Number,
}

impl ThreadLabelConfig {
    pub fn thread_labeler(&self) -> Box<dyn ThreadLabeler> {
        match self {
            ThreadLabelConfig::Name => Box::new(ThreadName),
            ThreadLabelConfig::Number => Box::new(ThreadNumber),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Whether `initialize` turns emission on
    pub enabled: bool,
    /// Print the start-up banner on stdout during `initialize`
    pub banner: bool,
    pub time: TimeConfig,
    pub thread_label: ThreadLabelConfig,
    /// Bound on the rendered message in bytes; `None` means growable
    pub max_message_len: Option<usize>,
    /// Escape `\n`, `\r` and `\t` in messages
    pub sanitize: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::hosted()
    }
}

impl LoggerConfig {
    /// General-purpose OS: calendar time, numbered threads, growable buffer
    #[must_use]
    pub fn hosted() -> Self {
        Self {
            enabled: true,
            banner: true,
            time: TimeConfig::WallClock,
            thread_label: ThreadLabelConfig::Number,
            max_message_len: None,
            sanitize: true,
        }
    }

    /// Real-time kernel: tick time, named tasks, bounded scratch buffer
    #[must_use]
    pub fn rtos() -> Self {
        Self {
            enabled: true,
            banner: true,
            time: TimeConfig::Tick {
                hz: DEFAULT_TICK_HZ,
            },
            thread_label: ThreadLabelConfig::Name,
            max_message_len: Some(RTOS_CONSOLE_BUF_LEN),
            sanitize: true,
        }
    }

    /// Parse and validate a JSON configuration. Missing fields take the
    /// [`hosted`](Self::hosted) defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                path.display().to_string(),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if let TimeConfig::Tick { hz: 0 } = self.time {
            return Err(LoggerError::config("time", "tick rate must be non-zero"));
        }
        if let Some(limit) = self.max_message_len {
            if limit < TRUNCATION_MARKER.len() {
                return Err(LoggerError::config(
                    "max_message_len",
                    format!(
                        "buffer length {} cannot hold the truncation marker {:?}",
                        limit, TRUNCATION_MARKER
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Fresh scratch buffer for one message
    pub(crate) fn message_buffer(&self) -> MessageBuffer {
        let buffer = match self.max_message_len {
            Some(limit) => MessageBuffer::bounded(limit),
            None => MessageBuffer::unbounded(),
        };
        buffer.with_sanitize(self.sanitize)
    }
}

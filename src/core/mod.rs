//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod log_record;
pub mod logger;
pub mod message_buffer;
pub mod metrics;
pub mod rtos;
pub mod state;
pub mod sync;
pub mod thread_label;
pub mod timestamp;

pub use appender::Appender;
pub use config::{LoggerConfig, ThreadLabelConfig, TimeConfig, RTOS_CONSOLE_BUF_LEN};
pub use error::{LoggerError, Result};
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder};
pub use message_buffer::{escape_line_breaks, MessageBuffer, RenderedMessage, TRUNCATION_MARKER};
pub use metrics::LoggerMetrics;
pub use rtos::{set_task_priority, task_priority, KernelMutex, RtosMutex};
pub use state::LoggerState;
pub use sync::{LockGuard, NativeMutex, SyncBackend};
pub use thread_label::{thread_number, ThreadLabeler, ThreadName, ThreadNumber};
pub use timestamp::{NoClock, TickCounter, TimeSource, Timestamp, WallClock};

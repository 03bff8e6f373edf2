//! # RT Line Logger
//!
//! A small, thread-safe, line-oriented logger for hosted and real-time
//! targets.
//!
//! ## Features
//!
//! - **One line per call**: each emit writes one complete line tagged with a
//!   timestamp, the calling thread and the call site; concurrent lines never
//!   interleave
//! - **Pluggable locking**: a native mutex or an RTOS-style priority mutex,
//!   chosen when the logger is built
//! - **Near-zero cost when disabled**: a disabled logger never allocates a
//!   lock and `emit` is a single atomic load
//! - **Bounded formatting**: optional fixed-size message buffer with explicit
//!   truncation

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender};
    pub use crate::core::{
        Appender, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        LoggerState, NativeMutex, Result, RtosMutex, SyncBackend, ThreadLabelConfig,
        ThreadLabeler, TimeConfig, TimeSource, Timestamp,
    };
}

pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender};
pub use crate::core::{
    Appender, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    LoggerState, NativeMutex, Result, RtosMutex, SyncBackend, ThreadLabelConfig, ThreadLabeler,
    TimeConfig, TimeSource, Timestamp,
};

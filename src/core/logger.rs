//! Main logger implementation
//!
//! A [`Logger`] is an explicit lifecycle object. It is built once, then
//! [`initialize`](Logger::initialize)d with an enabled flag, shared by
//! reference (usually behind an `Arc`) with every thread that logs, and
//! finally [`shutdown`](Logger::shutdown). Each [`emit`](Logger::emit)
//! produces at most one line and lines from concurrent callers never
//! interleave.
//!
//! ```
//! use rt_line_logger::prelude::*;
//! use rt_line_logger::emit;
//!
//! let sink = MemoryAppender::new();
//! let logger = Logger::builder()
//!     .banner(false)
//!     .appender(sink.clone())
//!     .build();
//!
//! logger.initialize(true).unwrap();
//! emit!(logger, "x={}", 5);
//! logger.shutdown().unwrap();
//!
//! assert_eq!(sink.lines().len(), 1);
//! assert!(sink.lines()[0].ends_with(" x=5"));
//! ```

use super::{
    appender::Appender,
    config::{LoggerConfig, TimeConfig},
    error::{LoggerError, Result},
    log_record::LogRecord,
    message_buffer::{escape_line_breaks, ESCAPED},
    metrics::LoggerMetrics,
    rtos::RtosMutex,
    state::{AtomicState, LoggerState},
    sync::{LockGuard, NativeMutex, SyncBackend},
    thread_label::ThreadLabeler,
    timestamp::TimeSource,
};
use crate::appenders::ConsoleAppender;
use parking_lot::RwLock;
use std::any::Any;
use std::borrow::Cow;
use std::cell::UnsafeCell;
use std::fmt;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

pub struct Logger<B: SyncBackend = NativeMutex> {
    state: AtomicState,
    backend: B,
    /// Backend handle for the current initialized lifetime. Emitters hold
    /// the read side while they use the handle; `initialize` and `shutdown`
    /// take the write side to create or destroy it.
    lock: RwLock<Option<B::Handle>>,
    /// Only touched while holding the backend lock, or the write side of
    /// `lock` when no handle exists.
    appender: UnsafeCell<Box<dyn Appender>>,
    time_source: Box<dyn TimeSource>,
    thread_labeler: Box<dyn ThreadLabeler>,
    config: LoggerConfig,
    metrics: LoggerMetrics,
}

// SAFETY: the appender is the only field without its own synchronization.
// It is accessed either under the backend lock, whose exclusivity is
// guaranteed by the `SyncBackend` contract, or under the write side of the
// lifecycle lock, which excludes every emitter.
unsafe impl<B: SyncBackend> Sync for Logger<B> {}

impl Logger<NativeMutex> {
    /// Builder for a hosted logger using the native mutex backend
    ///
    /// # Example
    /// ```
    /// use rt_line_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .banner(false)
    ///     .appender(MemoryAppender::new())
    ///     .build();
    /// assert_eq!(logger.state(), LoggerState::Uninitialized);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder<NativeMutex> {
        LoggerBuilder::new()
    }
}

impl Logger<RtosMutex> {
    /// Builder for an RTOS logger: kernel mutex, tick time, bounded buffer
    #[must_use]
    pub fn rtos_builder() -> LoggerBuilder<RtosMutex> {
        LoggerBuilder::new()
            .backend(RtosMutex)
            .config(LoggerConfig::rtos())
    }
}

impl<B: SyncBackend> Logger<B> {
    /// Enter the active state.
    ///
    /// When `enabled` is true the backend primitive is created; otherwise
    /// nothing is allocated and every `emit` returns immediately. Must be
    /// paired with one [`shutdown`](Self::shutdown): initializing an already
    /// initialized logger fails with [`LoggerError::AlreadyInitialized`] and
    /// changes nothing.
    pub fn initialize(&self, enabled: bool) -> Result<()> {
        let mut slot = self.lock.write();
        if self.state.load().is_initialized() {
            return Err(LoggerError::AlreadyInitialized);
        }

        if enabled {
            *slot = Some(self.backend.create()?);
        }
        self.state.store(LoggerState::active(enabled));

        if self.config.banner {
            // a closed stdout must not fail initialization
            let _ = writeln!(
                io::stdout().lock(),
                "{} v{} initialized (logging {}, backend {})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                if enabled { "enabled" } else { "disabled" },
                self.backend.name()
            );
        }
        Ok(())
    }

    /// Write one line tagged with time, thread and call site.
    ///
    /// Returns immediately unless the logger is initialized and enabled.
    /// Metadata is captured and the message rendered before the backend lock
    /// is taken; only the write itself happens under the lock. Failures of
    /// the sink are reported on stderr and counted, never returned.
    pub fn emit(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        if !self.state.load().is_enabled() {
            return;
        }

        let rendered = self.config.message_buffer().render(args);
        let mut thread = self.thread_labeler.current_label();
        let file = if self.config.sanitize {
            if thread.contains(ESCAPED) {
                thread = escape_line_breaks(&thread).into_owned();
            }
            escape_line_breaks(file)
        } else {
            Cow::Borrowed(file)
        };
        let record = LogRecord {
            timestamp: self.time_source.now(),
            thread,
            file: &file,
            line,
            message: rendered.text,
        };

        let slot = self.lock.read();
        // shut down between the state check and here
        let Some(handle) = slot.as_ref() else {
            return;
        };

        let _guard = LockGuard::acquire(&self.backend, handle);
        // SAFETY: the backend lock is held for the lifetime of `_guard`.
        let appender = unsafe { &mut **self.appender.get() };
        if self.append(appender, &record) && rendered.truncated {
            self.metrics.record_truncated();
        }
    }

    /// Leave the active state, destroying the backend primitive if one was
    /// created.
    ///
    /// Waits for emitters currently writing to finish. Calling it on a logger
    /// that is not initialized is a no-op. A primitive that cannot be
    /// destroyed is reported as [`LoggerError::SyncPrimitive`]; the logger is
    /// uninitialized either way.
    pub fn shutdown(&self) -> Result<()> {
        let mut slot = self.lock.write();
        if !self.state.load().is_initialized() {
            return Ok(());
        }
        self.state.store(LoggerState::Uninitialized);

        // SAFETY: the write side of the lifecycle lock excludes all emitters.
        let appender = unsafe { &mut *self.appender.get() };
        if let Err(e) = appender.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        match slot.take() {
            Some(handle) => self.backend.destroy(handle),
            None => Ok(()),
        }
    }

    /// Flush the sink.
    ///
    /// Only an enabled logger can have unflushed output: `shutdown` flushes
    /// before dropping the primitive, so this is a no-op otherwise.
    pub fn flush(&self) -> Result<()> {
        let slot = self.lock.read();
        let Some(handle) = slot.as_ref() else {
            return Ok(());
        };

        let _guard = LockGuard::acquire(&self.backend, handle);
        // SAFETY: the backend lock is held for the lifetime of `_guard`.
        let appender = unsafe { &mut *self.appender.get() };
        appender.flush()
    }

    #[inline]
    pub fn state(&self) -> LoggerState {
        self.state.load()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.state.load().is_enabled()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Get the logger metrics
    ///
    /// ```
    /// use rt_line_logger::prelude::*;
    ///
    /// let logger = Logger::builder().banner(false).appender(MemoryAppender::new()).build();
    /// assert_eq!(logger.metrics().total_logged(), 0);
    /// assert_eq!(logger.metrics().drop_rate(), 0.0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Write one record with panic isolation, returning whether it succeeded.
    fn append(&self, appender: &mut dyn Appender, record: &LogRecord<'_>) -> bool {
        let result = panic::catch_unwind(AssertUnwindSafe(|| appender.append(record)));

        match result {
            Ok(Ok(())) => {
                self.metrics.record_logged();
                true
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                self.metrics.record_dropped();
                false
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked: {}. Line dropped.",
                    appender.name(),
                    panic_message(panic_info.as_ref())
                );
                self.metrics.record_dropped();
                false
            }
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl<B: SyncBackend> Drop for Logger<B> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            eprintln!("[LOGGER ERROR] Shutdown during drop failed: {}", e);
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger dropped with {} lost lines (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing a [`Logger`] with a fluent API
///
/// Unset collaborators are derived from the configuration: the time source
/// from [`LoggerConfig::time`], the thread labeler from
/// [`LoggerConfig::thread_label`], and the sink defaults to a
/// [`ConsoleAppender`].
///
/// # Example
/// ```
/// use rt_line_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .config(LoggerConfig::hosted())
///     .time(TimeConfig::Tick { hz: 100 })
///     .banner(false)
///     .appender(MemoryAppender::new())
///     .init()
///     .unwrap();
///
/// assert!(logger.is_enabled());
/// ```
pub struct LoggerBuilder<B: SyncBackend = NativeMutex> {
    config: LoggerConfig,
    backend: B,
    appender: Option<Box<dyn Appender>>,
    time_source: Option<Box<dyn TimeSource>>,
    thread_labeler: Option<Box<dyn ThreadLabeler>>,
}

impl LoggerBuilder<NativeMutex> {
    /// Create a new builder with hosted defaults
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::hosted(),
            backend: NativeMutex,
            appender: None,
            time_source: None,
            thread_labeler: None,
        }
    }
}

impl Default for LoggerBuilder<NativeMutex> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SyncBackend> LoggerBuilder<B> {
    /// Swap the synchronization backend
    #[must_use = "builder methods return a new value"]
    pub fn backend<C: SyncBackend>(self, backend: C) -> LoggerBuilder<C> {
        LoggerBuilder {
            config: self.config,
            backend,
            appender: self.appender,
            time_source: self.time_source,
            thread_labeler: self.thread_labeler,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Enabled flag used by [`init`](Self::init)
    #[must_use = "builder methods return a new value"]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn banner(mut self, banner: bool) -> Self {
        self.config.banner = banner;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time(mut self, time: TimeConfig) -> Self {
        self.config.time = time;
        self
    }

    /// Bound rendered messages to `max_len` bytes, truncating with a marker
    #[must_use = "builder methods return a new value"]
    pub fn max_message_len(mut self, max_len: usize) -> Self {
        self.config.max_message_len = Some(max_len);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sanitize(mut self, sanitize: bool) -> Self {
        self.config.sanitize = sanitize;
        self
    }

    /// Set the output sink
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    /// Override the time source chosen by the configuration
    #[must_use = "builder methods return a new value"]
    pub fn time_source<T: TimeSource + 'static>(mut self, time_source: T) -> Self {
        self.time_source = Some(Box::new(time_source));
        self
    }

    /// Override the thread labeler chosen by the configuration
    #[must_use = "builder methods return a new value"]
    pub fn thread_labeler<T: ThreadLabeler + 'static>(mut self, labeler: T) -> Self {
        self.thread_labeler = Some(Box::new(labeler));
        self
    }

    /// Build an uninitialized logger
    pub fn build(self) -> Logger<B> {
        let time_source = self
            .time_source
            .unwrap_or_else(|| self.config.time.time_source());
        let thread_labeler = self
            .thread_labeler
            .unwrap_or_else(|| self.config.thread_label.thread_labeler());
        let appender = self
            .appender
            .unwrap_or_else(|| Box::new(ConsoleAppender::new()));

        Logger {
            state: AtomicState::new(),
            backend: self.backend,
            lock: RwLock::new(None),
            appender: UnsafeCell::new(appender),
            time_source,
            thread_labeler,
            config: self.config,
            metrics: LoggerMetrics::new(),
        }
    }

    /// Validate the configuration, build, and initialize with
    /// [`LoggerConfig::enabled`]
    pub fn init(self) -> Result<Logger<B>> {
        self.config.validate()?;
        let enabled = self.config.enabled;
        let logger = self.build();
        logger.initialize(enabled)?;
        Ok(logger)
    }
}

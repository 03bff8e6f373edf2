//! Logging macro that captures the call site.
//!
//! # Examples
//!
//! ```
//! use rt_line_logger::prelude::*;
//! use rt_line_logger::emit;
//!
//! let logger = Logger::builder()
//!     .banner(false)
//!     .appender(MemoryAppender::new())
//!     .init()
//!     .unwrap();
//!
//! emit!(logger, "Server started");
//!
//! let port = 8080;
//! emit!(logger, "Server listening on port {}", port);
//! ```

/// Emit one line through `$logger`, tagged with the current `file!()` and
/// `line!()`.
///
/// Works with anything that derefs to a [`Logger`](crate::Logger), such as
/// `&Logger` or `Arc<Logger>`.
///
/// # Examples
///
/// ```
/// # use rt_line_logger::prelude::*;
/// # let logger = Logger::builder().banner(false).appender(MemoryAppender::new()).init().unwrap();
/// use rt_line_logger::emit;
/// emit!(logger, "Simple message");
/// emit!(logger, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! emit {
    ($logger:expr, $($arg:tt)+) => {
        $logger.emit(::core::file!(), ::core::line!(), ::core::format_args!($($arg)+))
    };
}

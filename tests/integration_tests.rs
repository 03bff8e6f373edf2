//! Integration tests for the logger lifecycle
//!
//! These tests verify:
//! - No primitive is created while disabled
//! - Emits before initialize and after shutdown are silent
//! - The two-thread call-site scenario
//! - Shutdown waits for a write already in progress
//! - Primitive failures surface from initialize / shutdown
//! - File output and JSON configuration end to end

use rt_line_logger::core::sync::SyncBackend;
use rt_line_logger::core::LogRecord;
use rt_line_logger::emit;
use rt_line_logger::prelude::*;
use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

#[derive(Default)]
struct Counts {
    created: AtomicUsize,
    destroyed: AtomicUsize,
    acquired: AtomicUsize,
}

/// Native mutex that counts every lifecycle call
#[derive(Clone, Default)]
struct CountingBackend {
    counts: Arc<Counts>,
    fail_create: bool,
    fail_destroy: bool,
}

impl CountingBackend {
    fn created(&self) -> usize {
        self.counts.created.load(Ordering::SeqCst)
    }

    fn destroyed(&self) -> usize {
        self.counts.destroyed.load(Ordering::SeqCst)
    }

    fn acquired(&self) -> usize {
        self.counts.acquired.load(Ordering::SeqCst)
    }
}

// SAFETY: delegates locking to `NativeMutex`.
unsafe impl SyncBackend for CountingBackend {
    type Handle = <NativeMutex as SyncBackend>::Handle;

    fn create(&self) -> Result<Self::Handle> {
        if self.fail_create {
            return Err(LoggerError::sync_primitive(self.name(), "create", "out of kernel objects"));
        }
        self.counts.created.fetch_add(1, Ordering::SeqCst);
        NativeMutex.create()
    }

    fn acquire(&self, handle: &Self::Handle) {
        self.counts.acquired.fetch_add(1, Ordering::SeqCst);
        NativeMutex.acquire(handle);
    }

    unsafe fn release(&self, handle: &Self::Handle) {
        unsafe { NativeMutex.release(handle) }
    }

    fn destroy(&self, handle: Self::Handle) -> Result<()> {
        self.counts.destroyed.fetch_add(1, Ordering::SeqCst);
        if self.fail_destroy {
            return Err(LoggerError::sync_primitive(self.name(), "destroy", "object busy"));
        }
        NativeMutex.destroy(handle)
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn counting_logger(
    backend: &CountingBackend,
    sink: &MemoryAppender,
) -> Logger<CountingBackend> {
    Logger::builder()
        .banner(false)
        .appender(sink.clone())
        .backend(backend.clone())
        .build()
}

#[test]
fn test_disabled_creates_no_primitive() {
    let backend = CountingBackend::default();
    let sink = MemoryAppender::new();
    let logger = counting_logger(&backend, &sink);

    logger.initialize(false).expect("initialize failed");
    for i in 0..100 {
        logger.emit("a.c", 1, format_args!("hidden {}", i));
    }
    logger.shutdown().expect("shutdown failed");

    assert!(sink.is_empty());
    assert_eq!(backend.created(), 0);
    assert_eq!(backend.acquired(), 0);
    assert_eq!(backend.destroyed(), 0);
}

#[test]
fn test_disabled_scenario_hidden() {
    let sink = MemoryAppender::new();
    let logger = Logger::builder()
        .banner(false)
        .appender(sink.clone())
        .build();

    logger.initialize(false).expect("initialize failed");
    logger.emit("a.c", 1, format_args!("hidden"));

    assert!(sink.is_empty());
}

#[test]
fn test_emit_before_initialize_is_silent() {
    let backend = CountingBackend::default();
    let sink = MemoryAppender::new();
    let logger = counting_logger(&backend, &sink);

    logger.emit("a.c", 1, format_args!("too early"));

    assert!(sink.is_empty());
    assert_eq!(backend.created(), 0);
    assert_eq!(backend.acquired(), 0);
}

#[test]
fn test_emit_after_shutdown_is_silent() {
    let backend = CountingBackend::default();
    let sink = MemoryAppender::new();
    let logger = counting_logger(&backend, &sink);

    logger.initialize(true).expect("initialize failed");
    logger.emit("a.c", 1, format_args!("before"));
    logger.shutdown().expect("shutdown failed");

    let acquired = backend.acquired();
    logger.emit("a.c", 2, format_args!("after"));
    logger.emit("a.c", 3, format_args!("after"));

    assert_eq!(sink.len(), 1);
    assert_eq!(backend.created(), 1);
    assert_eq!(backend.destroyed(), 1);
    assert_eq!(backend.acquired(), acquired, "destroyed primitive was used");
}

#[test]
fn test_two_thread_scenario() {
    let backend = CountingBackend::default();
    let sink = MemoryAppender::new();
    let logger = Arc::new(counting_logger(&backend, &sink));
    logger.initialize(true).expect("initialize failed");

    let barrier = Arc::new(Barrier::new(2));
    let thread_a = {
        let logger = Arc::clone(&logger);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            logger.emit("a.c", 10, format_args!("x={}", 5));
        })
    };
    let thread_b = {
        let logger = Arc::clone(&logger);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            logger.emit("b.c", 20, format_args!("y"));
        })
    };
    thread_a.join().expect("thread A panicked");
    thread_b.join().expect("thread B panicked");

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    let a = lines.iter().find(|l| l.contains("(a.c:10)")).expect("a.c line");
    let b = lines.iter().find(|l| l.contains("(b.c:20)")).expect("b.c line");
    assert!(a.ends_with("(a.c:10) x=5"), "mangled line: {}", a);
    assert!(b.ends_with("(b.c:20) y"), "mangled line: {}", b);

    logger.shutdown().expect("shutdown failed");
    assert_eq!(backend.destroyed(), 1);

    logger.emit("a.c", 11, format_args!("silent"));
    assert_eq!(sink.len(), 2);
}

/// Holds each write until the test lets it through
struct GatedAppender {
    entered: Arc<Barrier>,
    release: Arc<Barrier>,
    inner: MemoryAppender,
}

impl Appender for GatedAppender {
    fn append(&mut self, record: &LogRecord<'_>) -> Result<()> {
        self.entered.wait();
        self.release.wait();
        self.inner.append(record)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "gated"
    }
}

#[test]
fn test_shutdown_waits_for_in_flight_emit() {
    let backend = CountingBackend::default();
    let sink = MemoryAppender::new();
    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));
    let logger = Arc::new(
        Logger::builder()
            .banner(false)
            .appender(GatedAppender {
                entered: Arc::clone(&entered),
                release: Arc::clone(&release),
                inner: sink.clone(),
            })
            .backend(backend.clone())
            .build(),
    );
    logger.initialize(true).expect("initialize failed");

    let emitter = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || logger.emit("a.c", 1, format_args!("in flight")))
    };
    entered.wait();

    let shutdown_done = Arc::new(AtomicBool::new(false));
    let stopper = {
        let logger = Arc::clone(&logger);
        let sink = sink.clone();
        let shutdown_done = Arc::clone(&shutdown_done);
        thread::spawn(move || {
            logger.shutdown().expect("shutdown failed");
            shutdown_done.store(true, Ordering::SeqCst);
            sink.len()
        })
    };

    thread::sleep(std::time::Duration::from_millis(50));
    assert!(!shutdown_done.load(Ordering::SeqCst), "shutdown did not wait");
    assert_eq!(backend.destroyed(), 0);

    release.wait();
    emitter.join().expect("emitter panicked");
    let lines_at_shutdown = stopper.join().expect("shutdown thread panicked");

    assert_eq!(lines_at_shutdown, 1, "shutdown returned before the line landed");
    assert_eq!(backend.destroyed(), 1);
    assert_eq!(logger.state(), LoggerState::Uninitialized);
}

#[test]
fn test_reinitialize_after_shutdown_creates_new_primitive() {
    let backend = CountingBackend::default();
    let sink = MemoryAppender::new();
    let logger = counting_logger(&backend, &sink);

    logger.initialize(true).expect("first initialize failed");
    logger.shutdown().expect("first shutdown failed");
    logger.initialize(true).expect("second initialize failed");
    logger.emit("a.c", 1, format_args!("again"));
    logger.shutdown().expect("second shutdown failed");

    assert_eq!(backend.created(), 2);
    assert_eq!(backend.destroyed(), 2);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_double_initialize_does_not_leak() {
    let backend = CountingBackend::default();
    let sink = MemoryAppender::new();
    let logger = counting_logger(&backend, &sink);

    logger.initialize(true).expect("initialize failed");
    let err = logger.initialize(true).unwrap_err();

    assert!(matches!(err, LoggerError::AlreadyInitialized));
    assert_eq!(backend.created(), 1);
}

#[test]
fn test_create_failure_is_fatal() {
    let backend = CountingBackend {
        fail_create: true,
        ..CountingBackend::default()
    };
    let sink = MemoryAppender::new();
    let logger = counting_logger(&backend, &sink);

    let err = logger.initialize(true).unwrap_err();
    assert!(matches!(err, LoggerError::SyncPrimitive { .. }));
    assert_eq!(logger.state(), LoggerState::Uninitialized);

    logger.emit("a.c", 1, format_args!("unsynchronized?"));
    assert!(sink.is_empty());
}

#[test]
fn test_destroy_failure_is_reported() {
    let backend = CountingBackend {
        fail_destroy: true,
        ..CountingBackend::default()
    };
    let sink = MemoryAppender::new();
    let logger = counting_logger(&backend, &sink);

    logger.initialize(true).expect("initialize failed");
    let err = logger.shutdown().unwrap_err();

    assert!(err.to_string().contains("object busy"));
    assert_eq!(logger.state(), LoggerState::Uninitialized);
    logger.shutdown().expect("second shutdown should be a no-op");
}

#[test]
fn test_drop_shuts_down() {
    let backend = CountingBackend::default();
    let sink = MemoryAppender::new();

    {
        let logger = counting_logger(&backend, &sink);
        logger.initialize(true).expect("initialize failed");
        emit!(logger, "about to drop");
    }

    assert_eq!(backend.destroyed(), 1);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let logger = Logger::builder()
        .banner(false)
        .time(TimeConfig::Tick { hz: 100 })
        .appender(FileAppender::new(&log_file).expect("Failed to create appender"))
        .init()
        .expect("init failed");

    for i in 0..10 {
        logger.emit("main.c", 100 + i, format_args!("item {}", i));
    }
    logger.shutdown().expect("shutdown failed");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 10);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.starts_with("tick: "), "missing tick field: {}", line);
        assert!(line.contains(&format!("(main.c:{})", 100 + i)));
        assert!(line.ends_with(&format!("item {}", i)));
    }
}

#[test]
fn test_log_injection_prevention() {
    let sink = MemoryAppender::new();
    let logger = Logger::builder()
        .banner(false)
        .appender(sink.clone())
        .init()
        .expect("init failed");

    let malicious = "User login\ntick: 0000000001 tid:1 (fake.c:1) injected";
    emit!(logger, "{}", malicious);

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("User login\\ntick"));
}

#[test]
fn test_json_configuration() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("logger.json");
    fs::write(
        &config_file,
        r#"{
            "enabled": true,
            "banner": false,
            "time": { "kind": "disabled" },
            "thread_label": "number",
            "max_message_len": 16
        }"#,
    )
    .expect("Failed to write config");

    let sink = MemoryAppender::new();
    let logger = Logger::builder()
        .config(LoggerConfig::from_json_file(&config_file).expect("bad config"))
        .appender(sink.clone())
        .init()
        .expect("init failed");

    logger.emit("cfg.c", 7, format_args!("a message that is rather long"));

    let lines = sink.lines();
    assert!(lines[0].starts_with("tid:"), "unexpected time field: {}", lines[0]);
    assert!(lines[0].ends_with("(cfg.c:7) a message tha..."));
    assert_eq!(logger.metrics().truncated_count(), 1);
}

#[test]
fn test_config_enabled_false_via_init() {
    let sink = MemoryAppender::new();
    let logger = Logger::builder()
        .config(LoggerConfig {
            enabled: false,
            banner: false,
            ..LoggerConfig::hosted()
        })
        .appender(sink.clone())
        .init()
        .expect("init failed");

    assert_eq!(logger.state(), LoggerState::DisabledActive);
    emit!(logger, "hidden");
    assert!(sink.is_empty());
}

//! Thread identity for the thread field of each line

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_NUMBER: AtomicU64 = AtomicU64::new(1);

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_NUMBER: u64 = NEXT_THREAD_NUMBER.fetch_add(1, Ordering::Relaxed);
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Process-unique number of the calling thread, assigned on first use.
///
/// Numbers start at 1 and are never reused.
pub fn thread_number() -> u64 {
    THREAD_NUMBER.with(|n| *n)
}

/// Get cached thread name, computing and caching it on first access
fn thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Supplies the thread field for each log line.
pub trait ThreadLabeler: Send + Sync {
    /// Short human-readable label for the calling thread.
    fn current_label(&self) -> String;
}

/// Labels threads by their configured name, `tid:<n>` for unnamed threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadName;

impl ThreadLabeler for ThreadName {
    fn current_label(&self) -> String {
        match thread_name() {
            Some(name) => name,
            None => format!("tid:{}", thread_number()),
        }
    }
}

/// Labels threads by number only: `tid:<n>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadNumber;

impl ThreadLabeler for ThreadNumber {
    fn current_label(&self) -> String {
        format!("tid:{}", thread_number())
    }
}

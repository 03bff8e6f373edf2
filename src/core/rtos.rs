//! Kernel-style mutex for real-time targets
//!
//! Mirrors the semantics of an RTOS mutex created with priority queuing:
//! when the holder releases, the waiting task with the most urgent priority
//! is granted next (lower number = more urgent), FIFO among equal priorities.
//! Waiting is unbounded. Task priority is a per-thread attribute set with
//! [`set_task_priority`].

use super::error::{LoggerError, Result};
use super::sync::SyncBackend;
use parking_lot::{Condvar, Mutex};
use std::cell::Cell;
use std::thread::{self, ThreadId};

/// Priority assigned to threads that never called [`set_task_priority`].
pub const DEFAULT_TASK_PRIORITY: u8 = 16;

thread_local! {
    static TASK_PRIORITY: Cell<u8> = const { Cell::new(DEFAULT_TASK_PRIORITY) };
}

/// Set the scheduling priority of the calling thread as seen by [`RtosMutex`].
pub fn set_task_priority(priority: u8) {
    TASK_PRIORITY.with(|p| p.set(priority));
}

/// Priority of the calling thread.
pub fn task_priority() -> u8 {
    TASK_PRIORITY.with(Cell::get)
}

#[derive(Debug, Clone, Copy)]
struct Waiter {
    ticket: u64,
    priority: u8,
}

#[derive(Debug, Default)]
struct KernelMutexState {
    owner: Option<ThreadId>,
    next_ticket: u64,
    waiters: Vec<Waiter>,
}

impl KernelMutexState {
    fn next_in_line(&self) -> Option<u64> {
        self.waiters
            .iter()
            .min_by_key(|w| (w.priority, w.ticket))
            .map(|w| w.ticket)
    }
}

/// Handle created by [`RtosMutex`].
#[derive(Debug, Default)]
pub struct KernelMutex {
    state: Mutex<KernelMutexState>,
    granted: Condvar,
}

impl KernelMutex {
    /// Number of tasks currently blocked waiting for this mutex
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Whether some task currently holds this mutex
    pub fn is_held(&self) -> bool {
        self.state.lock().owner.is_some()
    }
}

/// RTOS mutex backend with priority-ordered, wait-forever acquisition.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtosMutex;

// SAFETY: ownership is tracked explicitly and a new owner is only installed
// while `owner` is `None`.
unsafe impl SyncBackend for RtosMutex {
    type Handle = KernelMutex;

    fn create(&self) -> Result<Self::Handle> {
        Ok(KernelMutex::default())
    }

    fn acquire(&self, handle: &Self::Handle) {
        let me = thread::current().id();
        let mut state = handle.state.lock();
        debug_assert_ne!(state.owner, Some(me), "RtosMutex is not recursive");

        if state.owner.is_none() && state.waiters.is_empty() {
            state.owner = Some(me);
            return;
        }

        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.waiters.push(Waiter {
            ticket,
            priority: task_priority(),
        });

        loop {
            if state.owner.is_none() && state.next_in_line() == Some(ticket) {
                state.waiters.retain(|w| w.ticket != ticket);
                state.owner = Some(me);
                return;
            }
            handle.granted.wait(&mut state);
        }
    }

    unsafe fn release(&self, handle: &Self::Handle) {
        let mut state = handle.state.lock();
        debug_assert_eq!(state.owner, Some(thread::current().id()));
        state.owner = None;
        let has_waiters = !state.waiters.is_empty();
        drop(state);

        if has_waiters {
            handle.granted.notify_all();
        }
    }

    fn destroy(&self, handle: Self::Handle) -> Result<()> {
        let state = handle.state.lock();
        if state.owner.is_some() || !state.waiters.is_empty() {
            return Err(LoggerError::sync_primitive(
                self.name(),
                "destroy",
                format!(
                    "mutex is still held ({} task(s) waiting)",
                    state.waiters.len()
                ),
            ));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rtos-mutex"
    }
}

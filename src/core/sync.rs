//! Synchronization backends that serialize log output
//!
//! A backend is a small capability over one mutual-exclusion primitive:
//! `create`, `acquire`, `release` and `destroy`. The logger owns exactly one
//! handle per initialized lifetime and holds it for the duration of a single
//! line write. Which backend is used is decided when the logger is built:
//!
//! - [`NativeMutex`]: a `parking_lot` raw mutex, for hosted targets.
//! - [`RtosMutex`](super::rtos::RtosMutex): a kernel-style mutex granting
//!   waiters in task-priority order.
//!
//! Tests plug in their own backend (for example one that counts creations).

use super::error::{LoggerError, Result};
use parking_lot::lock_api::RawMutex as _;
use std::marker::PhantomData;

/// Mutual-exclusion capability used by the [`Logger`](super::Logger).
///
/// # Safety
///
/// Implementations must provide real mutual exclusion: once `acquire(h)`
/// returns on one thread, no other call to `acquire(h)` may return until the
/// matching `release(h)`. `acquire` must not succeed re-entrantly on the
/// thread that already holds the handle. The logger relies on this to hand
/// out exclusive access to its sink.
pub unsafe trait SyncBackend: Send + Sync {
    /// The primitive created by this backend.
    type Handle: Send + Sync;

    /// Create a new, unlocked primitive.
    fn create(&self) -> Result<Self::Handle>;

    /// Block until the calling thread holds `handle`. There is no timeout.
    fn acquire(&self, handle: &Self::Handle);

    /// Release `handle`.
    ///
    /// # Safety
    ///
    /// The calling thread must currently hold `handle` through `acquire`.
    unsafe fn release(&self, handle: &Self::Handle);

    /// Tear down a primitive. Fails if it is still held.
    fn destroy(&self, handle: Self::Handle) -> Result<()>;

    /// Short backend name used in diagnostics
    fn name(&self) -> &str;
}

/// RAII guard that releases the backend lock when dropped.
///
/// The guard is `!Send`: a primitive must be released by the
/// thread that acquired it.
pub struct LockGuard<'a, B: SyncBackend> {
    backend: &'a B,
    handle: &'a B::Handle,
    _not_send: PhantomData<*const ()>,
}

impl<'a, B: SyncBackend> LockGuard<'a, B> {
    /// Acquire `handle`, blocking the calling thread until it is granted.
    pub fn acquire(backend: &'a B, handle: &'a B::Handle) -> Self {
        backend.acquire(handle);
        Self {
            backend,
            handle,
            _not_send: PhantomData,
        }
    }
}

impl<B: SyncBackend> Drop for LockGuard<'_, B> {
    fn drop(&mut self) {
        // SAFETY: the guard only exists between a successful `acquire` on
        // this thread and this release.
        unsafe { self.backend.release(self.handle) }
    }
}

/// Native thread mutex backed by [`parking_lot::RawMutex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeMutex;

// SAFETY: `parking_lot::RawMutex` is a non-recursive mutex.
unsafe impl SyncBackend for NativeMutex {
    type Handle = parking_lot::RawMutex;

    fn create(&self) -> Result<Self::Handle> {
        Ok(parking_lot::RawMutex::INIT)
    }

    #[inline]
    fn acquire(&self, handle: &Self::Handle) {
        handle.lock();
    }

    #[inline]
    unsafe fn release(&self, handle: &Self::Handle) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { handle.unlock() }
    }

    fn destroy(&self, handle: Self::Handle) -> Result<()> {
        if handle.is_locked() {
            return Err(LoggerError::sync_primitive(
                self.name(),
                "destroy",
                "mutex is still held",
            ));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "native-mutex"
    }
}

//! Lifecycle state of a logger instance

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state.
///
/// `initialized` is any state other than `Uninitialized`; `enabled` is only
/// `EnabledActive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LoggerState {
    Uninitialized = 0,
    EnabledActive = 1,
    DisabledActive = 2,
}

impl LoggerState {
    /// State entered by `initialize(enabled)`
    pub fn active(enabled: bool) -> Self {
        if enabled {
            LoggerState::EnabledActive
        } else {
            LoggerState::DisabledActive
        }
    }

    pub fn is_initialized(self) -> bool {
        self != LoggerState::Uninitialized
    }

    pub fn is_enabled(self) -> bool {
        self == LoggerState::EnabledActive
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => LoggerState::EnabledActive,
            2 => LoggerState::DisabledActive,
            _ => LoggerState::Uninitialized,
        }
    }
}

/// Atomic cell read by every `emit` without taking a lock
#[derive(Debug)]
pub(crate) struct AtomicState(AtomicU8);

impl AtomicState {
    pub(crate) const fn new() -> Self {
        Self(AtomicU8::new(LoggerState::Uninitialized as u8))
    }

    #[inline]
    pub(crate) fn load(&self) -> LoggerState {
        LoggerState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, state: LoggerState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

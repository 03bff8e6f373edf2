//! Time sources for the timestamp field
//!
//! Hosted targets have a calendar clock; many RTOS targets only have a tick
//! counter. Both are exposed through [`TimeSource`], which is queried once per
//! emitted line. A source that cannot produce a valid time returns `None` and
//! the timestamp field is simply left out of that line.

use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Calendar layout: `MM-DD HH:MM:SS.mmm`
pub const CALENDAR_FORMAT: &str = "%m-%d %H:%M:%S%.3f";

/// Default tick rate for [`TickCounter`]
pub const DEFAULT_TICK_HZ: u32 = 1000;

/// A point in time as seen by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Local calendar time
    Calendar(DateTime<Local>),
    /// Kernel ticks since start-up
    Tick(u64),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Calendar(at) => write!(f, "{}", at.format(CALENDAR_FORMAT)),
            Timestamp::Tick(tick) => write!(f, "tick: {:010}", tick),
        }
    }
}

/// Supplies the timestamp for each log line.
pub trait TimeSource: Send + Sync {
    /// Current time, or `None` if the platform cannot provide a valid one.
    fn now(&self) -> Option<Timestamp>;
}

/// Local calendar clock.
///
/// Returns `None` while the system clock reads earlier than the Unix epoch,
/// which is what an unset RTC typically looks like on embedded boards.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn now(&self) -> Option<Timestamp> {
        let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        let secs = i64::try_from(since_epoch.as_secs()).ok()?;
        let utc = DateTime::<Utc>::from_timestamp(secs, since_epoch.subsec_nanos())?;
        Some(Timestamp::Calendar(utc.with_timezone(&Local)))
    }
}

/// Monotonic tick counter running at a fixed rate from its creation.
#[derive(Debug, Clone, Copy)]
pub struct TickCounter {
    start: Instant,
    hz: u32,
}

impl TickCounter {
    /// Counter ticking `hz` times per second. A rate of zero is clamped to 1.
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self {
            start: Instant::now(),
            hz: hz.max(1),
        }
    }

    /// Ticks per second
    pub fn hz(&self) -> u32 {
        self.hz
    }

    /// Ticks elapsed since the counter was created
    pub fn ticks(&self) -> u64 {
        let micros = self.start.elapsed().as_micros();
        let ticks = micros.saturating_mul(u128::from(self.hz)) / 1_000_000;
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_HZ)
    }
}

impl TimeSource for TickCounter {
    fn now(&self) -> Option<Timestamp> {
        Some(Timestamp::Tick(self.ticks()))
    }
}

/// Time source for platforms without any clock; the field is always omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClock;

impl TimeSource for NoClock {
    fn now(&self) -> Option<Timestamp> {
        None
    }
}

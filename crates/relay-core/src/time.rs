//! Wall clock used to stamp donation records.
//!
//! Records carry the relay's processing time, never the provider's event
//! time. Handlers read it through [`Clock`] so tests can pin it.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Source of wall-clock time for record timestamps.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current wall-clock time.
    fn now_system(&self) -> SystemTime;

    /// Current wall-clock time as whole unix seconds.
    ///
    /// Times before the epoch clamp to zero.
    fn unix_timestamp(&self) -> u64 {
        self.now_system().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_secs())
    }
}

/// Operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl RealClock {
    /// Creates a system clock handle.
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now_system(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually driven clock for tests.
///
/// Time only moves when [`TestClock::advance`] is called. Clones share the
/// same reading, so a test can keep a handle after passing one to the
/// application state.
#[derive(Debug, Clone)]
pub struct TestClock {
    unix_nanos: Arc<AtomicU64>,
}

impl TestClock {
    /// Creates a clock frozen at the current system time.
    pub fn new() -> Self {
        Self::with_start_time(SystemTime::now())
    }

    /// Creates a clock frozen at `start`. Pre-epoch times read as the epoch.
    pub fn with_start_time(start: SystemTime) -> Self {
        let since_epoch = start.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self { unix_nanos: Arc::new(AtomicU64::new(saturating_nanos(since_epoch))) }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.unix_nanos.fetch_add(saturating_nanos(duration), Ordering::AcqRel);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now_system(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_nanos(self.unix_nanos.load(Ordering::Acquire))
    }
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

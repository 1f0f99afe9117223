//! Wall-clock abstraction.
//!
//! Cache freshness and entry ages are computed against a [`Clock`] so that
//! tests can age entries deterministically instead of sleeping.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Create a shared clock frozen at the current system time.
    pub fn shared_now() -> Arc<Self> {
        Arc::new(Self::new(Utc::now()))
    }

    /// Move the clock forward.
    pub fn advance(&self, by: std::time::Duration) {
        let Ok(delta) = ChronoDuration::from_std(by) else {
            return;
        };
        let mut now = self.now.lock();
        *now = now.checked_add_signed(delta).unwrap_or(*now);
    }

    /// Jump to an absolute time.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Elapsed time between `earlier` and `later`, clamped at zero.
///
/// Entries stamped in the future (clock skew between writers) count as
/// brand new rather than producing a negative age.
pub fn age_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> std::time::Duration {
    later
        .signed_duration_since(earlier)
        .to_std()
        .unwrap_or(std::time::Duration::ZERO)
}

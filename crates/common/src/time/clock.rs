//! Wall-clock abstraction for testability
//!
//! Business rules such as "not in the past" depend on the current time.
//! Reading it through [`Clock`] lets production code use the system clock
//! while tests pin time to a fixed instant.
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use intake_common::time::{Clock, MockClock};
//!
//! let start = Utc.with_ymd_and_hms(2024, 6, 5, 8, 0, 0).unwrap();
//! let clock = MockClock::at(start);
//!
//! clock.advance(Duration::hours(2));
//! assert_eq!(clock.now(), start + Duration::hours(2));
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current time in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the UNIX epoch.
    fn millis_since_epoch(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Real system clock. Use this in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Settable clock for deterministic tests.
///
/// Clones share the same underlying instant, so a test can keep a handle
/// and move time while the code under test holds another.
#[derive(Debug, Clone)]
pub struct MockClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Clock frozen at `instant`.
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { current: Arc::new(Mutex::new(instant)) }
    }

    /// Move the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock() = instant;
    }

    /// Move the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }
}

impl Default for MockClock {
    /// Frozen at the moment of construction.
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

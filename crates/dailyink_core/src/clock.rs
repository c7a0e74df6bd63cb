//! Injectable time source.
//!
//! # Responsibility
//! - Give the store and statistics code one place to ask "what day is it"
//!   and "what time is it", so tests can pin both.
//!
//! # Invariants
//! - `today()` is a local calendar date; `now_ms()` is Unix epoch milliseconds.

use chrono::{Local, NaiveDate, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Time capability consumed by the journal store and repositories.
pub trait Clock: Send + Sync {
    /// Current local calendar day.
    fn today(&self) -> NaiveDate;
    /// Current wall-clock time in epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// Clock backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clock for tests and replay.
///
/// Every `now_ms()` call advances the instant by one millisecond so that
/// consecutive writes receive strictly increasing timestamps.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
    now_ms: AtomicI64,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now_ms: i64) -> Self {
        Self {
            today: Mutex::new(today),
            now_ms: AtomicI64::new(now_ms),
        }
    }

    /// Moves the calendar to another day, keeping the millisecond counter.
    pub fn set_today(&self, today: NaiveDate) {
        if let Ok(mut guard) = self.today.lock() {
            *guard = today;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.today.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn now_ms(&self) -> i64 {
        self.now_ms.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_is_monotonic() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 1_000);
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(second > first);
    }

    #[test]
    fn fixed_clock_day_can_be_moved() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 0);
        clock.set_today(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }
}

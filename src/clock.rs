//! Injectable calendar clock.
//!
//! The schedule search anchors at "tomorrow", and the squad scorer looks at
//! the next 30 days. Both read today's date through this trait instead of
//! the ambient wall clock, so searches are deterministic under test.

use chrono::{Local, NaiveDate};

/// Source of the current calendar date.
pub trait Clock {
    /// Today's date.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock dates in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a fixed date, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

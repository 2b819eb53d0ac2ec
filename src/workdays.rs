//! Monday–Friday calendar arithmetic.
//!
//! Working days are Monday through Friday; Saturday and Sunday are always
//! excluded. No holiday calendar is modeled.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Whether a date is a working day (Monday–Friday).
#[inline]
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// All working days in `[start, end]`, in order.
///
/// Returns an empty list when `end < start`.
pub fn working_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut date = start;
    while date <= end {
        if is_working_day(date) {
            days.push(date);
        }
        date = next_day(date);
    }
    days
}

/// Number of working days in `[start, end]`.
pub fn working_day_count(start: NaiveDate, end: NaiveDate) -> usize {
    let mut count = 0;
    let mut date = start;
    while date <= end {
        if is_working_day(date) {
            count += 1;
        }
        date = next_day(date);
    }
    count
}

/// Moves `n` working days from `date`, stepping over weekends.
///
/// Negative `n` moves backwards. The starting date itself is not counted.
pub fn add_working_days(date: NaiveDate, n: i64) -> NaiveDate {
    let mut remaining = n.unsigned_abs();
    let mut current = date;
    while remaining > 0 {
        current = if n >= 0 {
            next_day(current)
        } else {
            prev_day(current)
        };
        if is_working_day(current) {
            remaining -= 1;
        }
    }
    current
}

/// The first working day at or after `date`.
pub fn next_working_day_or_same(date: NaiveDate) -> NaiveDate {
    let mut current = date;
    while !is_working_day(current) {
        current = next_day(current);
    }
    current
}

/// The Monday of the week containing `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Days::new(offset as u64)
}

#[inline]
fn next_day(date: NaiveDate) -> NaiveDate {
    date + Days::new(1)
}

#[inline]
fn prev_day(date: NaiveDate) -> NaiveDate {
    date - Days::new(1)
}

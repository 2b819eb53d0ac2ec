//! Allocation row model.
//!
//! An allocation is a day-level fact: this project consumes this many hours
//! of this squad on this date, tagged with an hour type. At most one row
//! exists per (project, squad, date, hour-type). Rows are created only by
//! the allocation engine and always replaced wholesale, never patched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of work an allocation's hours represent.
///
/// Development and on-site hours are additive on the same day — they are
/// distinct rows that jointly count against the squad's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HourType {
    /// Development effort (phases 1 and 2).
    Development,
    /// On-site UAT support.
    Uat,
    /// On-site go-live support.
    GoLive,
    /// Other on-site work.
    Onsite,
}

impl fmt::Display for HourType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HourType::Development => write!(f, "Development"),
            HourType::Uat => write!(f, "UAT"),
            HourType::GoLive => write!(f, "GoLive"),
            HourType::Onsite => write!(f, "Onsite"),
        }
    }
}

/// A day-level hour assignment of a project to a squad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocated project.
    pub project_id: String,
    /// Squad whose capacity is consumed.
    pub squad_id: String,
    /// The day the hours fall on.
    pub date: NaiveDate,
    /// Kind of work.
    pub hour_type: HourType,
    /// Hours consumed.
    pub hours: f64,
}

impl Allocation {
    /// Creates an allocation row.
    pub fn new(
        project_id: impl Into<String>,
        squad_id: impl Into<String>,
        date: NaiveDate,
        hour_type: HourType,
        hours: f64,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            squad_id: squad_id.into(),
            date,
            hour_type,
            hours,
        }
    }

    /// Whether this row carries development hours.
    #[inline]
    pub fn is_development(&self) -> bool {
        self.hour_type == HourType::Development
    }
}

//! On-site schedule model.
//!
//! An on-site schedule belongs to a project and declares a week of customer
//! site presence: the week's date span, how many engineers travel, and the
//! total hours that week consumes. It drives the on-site phase of the
//! allocation pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::HourType;

/// Classification of an on-site week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnsiteType {
    /// User Acceptance Testing support.
    Uat,
    /// Go-live support.
    GoLive,
    /// Other on-site presence.
    Onsite,
}

impl fmt::Display for OnsiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnsiteType::Uat => write!(f, "UAT"),
            OnsiteType::GoLive => write!(f, "GoLive"),
            OnsiteType::Onsite => write!(f, "Onsite"),
        }
    }
}

impl From<OnsiteType> for HourType {
    fn from(value: OnsiteType) -> Self {
        match value {
            OnsiteType::Uat => HourType::Uat,
            OnsiteType::GoLive => HourType::GoLive,
            OnsiteType::Onsite => HourType::Onsite,
        }
    }
}

/// A declared week of on-site work for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnsiteSchedule {
    /// Owning project.
    pub project_id: String,
    /// First day of the declared week.
    pub start_date: NaiveDate,
    /// Last day of the declared week.
    pub end_date: NaiveDate,
    /// Engineers on site that week.
    pub engineer_count: u32,
    /// Total hours consumed across the week.
    pub total_hours: f64,
    /// What kind of on-site week this is.
    pub onsite_type: OnsiteType,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl OnsiteSchedule {
    /// Creates a one-engineer on-site week.
    pub fn new(
        project_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        onsite_type: OnsiteType,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            start_date,
            end_date,
            engineer_count: 1,
            total_hours: 0.0,
            onsite_type,
            notes: None,
        }
    }

    /// Sets the engineer count.
    pub fn with_engineers(mut self, count: u32) -> Self {
        self.engineer_count = count;
        self
    }

    /// Sets the week's total hours.
    pub fn with_total_hours(mut self, hours: f64) -> Self {
        self.total_hours = hours;
        self
    }

    /// Sets free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

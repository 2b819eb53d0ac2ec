//! Project model.
//!
//! A project carries its effort estimates, a scheduling buffer, and an
//! ordered sequence of milestone dates (start, code-complete, CRP, UAT,
//! go-live), each optional until scheduled. Date-ordering invariants are
//! enforced by [`crate::validation::validate_milestones`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default scheduling buffer applied to raw estimated hours.
pub const DEFAULT_BUFFER_PERCENTAGE: f64 = 20.0;

/// A project to be scheduled onto a squad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: String,
    /// Human-readable name or project number.
    pub name: String,
    /// Estimated development hours (unbuffered).
    pub estimated_dev_hours: f64,
    /// Estimated on-site hours.
    pub estimated_onsite_hours: f64,
    /// Safety-margin percentage applied before scheduling (default 20).
    pub buffer_percentage: f64,
    /// Development start milestone.
    pub start_date: Option<NaiveDate>,
    /// Completion of the bulk development phase.
    pub code_complete_date: Option<NaiveDate>,
    /// Code Ready for Production milestone.
    pub crp_date: Option<NaiveDate>,
    /// User Acceptance Testing milestone.
    pub uat_date: Option<NaiveDate>,
    /// Production go-live milestone.
    pub go_live_date: Option<NaiveDate>,
}

impl Project {
    /// Creates a project with the default buffer and no milestone dates.
    pub fn new(id: impl Into<String>, estimated_dev_hours: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            estimated_dev_hours,
            estimated_onsite_hours: 0.0,
            buffer_percentage: DEFAULT_BUFFER_PERCENTAGE,
            start_date: None,
            code_complete_date: None,
            crp_date: None,
            uat_date: None,
            go_live_date: None,
        }
    }

    /// Sets the project name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the estimated on-site hours.
    pub fn with_onsite_hours(mut self, hours: f64) -> Self {
        self.estimated_onsite_hours = hours;
        self
    }

    /// Sets the buffer percentage.
    pub fn with_buffer(mut self, percentage: f64) -> Self {
        self.buffer_percentage = percentage;
        self
    }

    /// Sets the start milestone.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the code-complete milestone.
    pub fn with_code_complete_date(mut self, date: NaiveDate) -> Self {
        self.code_complete_date = Some(date);
        self
    }

    /// Sets the CRP milestone.
    pub fn with_crp_date(mut self, date: NaiveDate) -> Self {
        self.crp_date = Some(date);
        self
    }

    /// Sets the UAT milestone.
    pub fn with_uat_date(mut self, date: NaiveDate) -> Self {
        self.uat_date = Some(date);
        self
    }

    /// Sets the go-live milestone.
    pub fn with_go_live_date(mut self, date: NaiveDate) -> Self {
        self.go_live_date = Some(date);
        self
    }

    /// Estimated hours inflated by the given buffer percentage.
    pub fn buffered_hours(&self, buffer_percentage: f64) -> f64 {
        self.estimated_dev_hours * (1.0 + buffer_percentage / 100.0)
    }

    /// Resolves the effective buffer: an explicit override wins, the
    /// project's own buffer is next, and an unset/zero buffer falls back to
    /// the 20% default.
    pub fn resolve_buffer(&self, override_percentage: Option<f64>) -> f64 {
        let buffer = override_percentage.unwrap_or(self.buffer_percentage);
        if buffer <= 0.0 {
            DEFAULT_BUFFER_PERCENTAGE
        } else {
            buffer
        }
    }
}

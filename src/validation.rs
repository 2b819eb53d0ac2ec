//! Milestone date-ordering validation.
//!
//! Checked before any scheduling attempt. The required orderings, applied
//! only between dates that are actually set:
//!
//! - start < CRP < UAT < go-live
//! - start < code-complete < UAT
//!
//! Code-complete and CRP are deliberately unordered relative to each other:
//! a project may polish past CRP or reach CRP before the bulk build ends.

use crate::models::Project;

/// Validation outcome: all detected ordering violations, or none.
pub type MilestoneResult = Result<(), Vec<MilestoneError>>;

/// A single milestone-ordering violation.
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneError {
    /// Which ordering rule was violated.
    pub kind: MilestoneErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of milestone-ordering violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneErrorKind {
    /// Start must precede CRP.
    StartNotBeforeCrp,
    /// CRP must precede UAT.
    CrpNotBeforeUat,
    /// UAT must precede go-live.
    UatNotBeforeGoLive,
    /// Start must precede code-complete.
    StartNotBeforeCodeComplete,
    /// Code-complete must precede UAT.
    CodeCompleteNotBeforeUat,
}

impl MilestoneError {
    fn new(kind: MilestoneErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the milestone orderings of a project.
///
/// Only pairs where both dates are set are checked; partially scheduled
/// projects pass. Returns every violation found.
pub fn validate_milestones(project: &Project) -> MilestoneResult {
    let mut errors = Vec::new();

    if let (Some(start), Some(crp)) = (project.start_date, project.crp_date) {
        if start >= crp {
            errors.push(MilestoneError::new(
                MilestoneErrorKind::StartNotBeforeCrp,
                format!("start date {start} must be before CRP date {crp}"),
            ));
        }
    }

    if let (Some(crp), Some(uat)) = (project.crp_date, project.uat_date) {
        if crp >= uat {
            errors.push(MilestoneError::new(
                MilestoneErrorKind::CrpNotBeforeUat,
                format!("CRP date {crp} must be before UAT date {uat}"),
            ));
        }
    }

    if let (Some(uat), Some(go_live)) = (project.uat_date, project.go_live_date) {
        if uat >= go_live {
            errors.push(MilestoneError::new(
                MilestoneErrorKind::UatNotBeforeGoLive,
                format!("UAT date {uat} must be before go-live date {go_live}"),
            ));
        }
    }

    if let (Some(start), Some(cc)) = (project.start_date, project.code_complete_date) {
        if start >= cc {
            errors.push(MilestoneError::new(
                MilestoneErrorKind::StartNotBeforeCodeComplete,
                format!("start date {start} must be before code-complete date {cc}"),
            ));
        }
    }

    if let (Some(cc), Some(uat)) = (project.code_complete_date, project.uat_date) {
        if cc >= uat {
            errors.push(MilestoneError::new(
                MilestoneErrorKind::CodeCompleteNotBeforeUat,
                format!("code-complete date {cc} must be before UAT date {uat}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Joins validation errors into a single descriptive reason.
pub fn describe_errors(errors: &[MilestoneError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

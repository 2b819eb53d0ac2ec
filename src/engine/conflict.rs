//! Non-blocking conflict checks.
//!
//! Runs three checks over a prospective booking window and reports findings
//! without vetoing anything: capacity overload (projected utilization above
//! 100%), high utilization (80–100%), and other projects' on-site weeks
//! starting within seven days of the proposed window. Callers decide
//! whether a flagged plan still goes ahead.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SchedulerError;
use crate::models::OnsiteSchedule;
use crate::store::ScheduleStore;
use crate::workdays;

use super::suggestion::ScheduleSuggestion;

const OVERLOAD_THRESHOLD_PCT: f64 = 100.0;
const HIGH_UTILIZATION_PCT: f64 = 80.0;
const ONSITE_PROXIMITY_DAYS: u64 = 7;

/// What a conflict is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Projected utilization above 100% on one or more working days.
    CapacityOverload,
    /// Projected utilization between 80% and 100% on one or more days.
    HighUtilization,
    /// Another project's on-site week starts within seven days of the
    /// proposed window.
    OnsiteOverlap,
}

/// How serious a conflict is. None of them block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Critical,
}

/// A single finding from a conflict check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub severity: Severity,
    /// Short description.
    pub message: String,
    /// Supporting detail.
    pub details: String,
    /// First affected day, for capacity findings.
    pub conflict_date: Option<NaiveDate>,
    /// Monday of the other project's on-site week, for overlap findings.
    pub conflict_week_start: Option<NaiveDate>,
    /// Peak projected utilization percentage, for capacity findings.
    pub projected_utilization_pct: Option<f64>,
    /// Other projects involved.
    pub conflicting_projects: Vec<String>,
}

impl Conflict {
    /// One finding covering every overloaded day in the window.
    fn capacity_overload(days: &[(NaiveDate, f64)], projects: Vec<String>) -> Self {
        let first = days[0].0;
        let last = days[days.len() - 1].0;
        let peak = days.iter().map(|(_, u)| *u).fold(f64::MIN, f64::max);
        Self {
            kind: ConflictKind::CapacityOverload,
            severity: Severity::Critical,
            message: format!("Squad capacity exceeded on {} day(s)", days.len()),
            details: format!("{first} to {last}, peak projected utilization {peak:.1}%"),
            conflict_date: Some(first),
            conflict_week_start: None,
            projected_utilization_pct: Some(peak),
            conflicting_projects: projects,
        }
    }

    /// One finding covering every day in the 80–100% band.
    fn high_utilization(days: &[(NaiveDate, f64)], projects: Vec<String>) -> Self {
        let first = days[0].0;
        let peak = days.iter().map(|(_, u)| *u).fold(f64::MIN, f64::max);
        Self {
            kind: ConflictKind::HighUtilization,
            severity: Severity::Warning,
            message: format!("High squad utilization on {} day(s)", days.len()),
            details: format!("Peak projected utilization {peak:.1}%"),
            conflict_date: Some(first),
            conflict_week_start: None,
            projected_utilization_pct: Some(peak),
            conflicting_projects: projects,
        }
    }

    fn onsite_overlap(other: &OnsiteSchedule) -> Self {
        Self {
            kind: ConflictKind::OnsiteOverlap,
            severity: Severity::Warning,
            message: format!(
                "Project {}'s {} on-site week starts {}",
                other.project_id, other.onsite_type, other.start_date
            ),
            details: format!(
                "Within {ONSITE_PROXIMITY_DAYS} days of the proposed window"
            ),
            conflict_date: None,
            conflict_week_start: Some(workdays::monday_of_week(other.start_date)),
            projected_utilization_pct: None,
            conflicting_projects: vec![other.project_id.clone()],
        }
    }
}

/// Aggregated findings of a check run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResult {
    pub has_conflicts: bool,
    /// Set whenever anything was found; the caller should confirm before
    /// committing.
    pub requires_confirmation: bool,
    pub conflicts: Vec<Conflict>,
    pub summary_message: String,
}

impl ConflictCheckResult {
    fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        let critical = conflicts
            .iter()
            .filter(|c| c.severity == Severity::Critical)
            .count();
        let warnings = conflicts.len() - critical;
        let summary_message = if conflicts.is_empty() {
            "No conflicts detected".to_string()
        } else {
            format!(
                "{} conflict(s) found: {critical} critical, {warnings} warning(s)",
                conflicts.len()
            )
        };
        Self {
            has_conflicts: !conflicts.is_empty(),
            requires_confirmation: !conflicts.is_empty(),
            conflicts,
            summary_message,
        }
    }

    fn clean() -> Self {
        Self::from_conflicts(Vec::new())
    }
}

/// Advisory checks over a prospective booking. Stateless.
pub struct ConflictDetector;

impl ConflictDetector {
    /// Checks a booking of `estimated_hours` spread evenly over the working
    /// days of `[start, end]` on a squad: projected daily utilization, and
    /// other squad projects' on-site weeks starting near the window.
    pub fn check_allocation(
        store: &impl ScheduleStore,
        project_id: &str,
        squad_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        estimated_hours: f64,
    ) -> Result<ConflictCheckResult, SchedulerError> {
        let squad = store
            .squad(squad_id)
            .ok_or_else(|| SchedulerError::SquadNotFound(squad_id.to_string()))?;

        let mut conflicts = capacity_conflicts(
            store,
            project_id,
            squad_id,
            squad.daily_capacity(),
            start,
            end,
            estimated_hours,
        );
        conflicts.extend(onsite_overlaps(
            &other_onsite_schedules(store, project_id, squad_id),
            &[(start, end)],
        ));

        Ok(ConflictCheckResult::from_conflicts(conflicts))
    }

    /// Checks a search result before it is accepted: the development window
    /// against squad capacity, and the development window plus the derived
    /// UAT and go-live weeks against other projects' on-site visits. An
    /// infeasible suggestion has nothing to check.
    pub fn check_suggestion(
        store: &impl ScheduleStore,
        project_id: &str,
        squad_id: &str,
        suggestion: &ScheduleSuggestion,
    ) -> Result<ConflictCheckResult, SchedulerError> {
        let (Some(start), Some(dev_complete)) =
            (suggestion.suggested_start_date, suggestion.dev_complete_date)
        else {
            return Ok(ConflictCheckResult::clean());
        };
        let squad = store
            .squad(squad_id)
            .ok_or_else(|| SchedulerError::SquadNotFound(squad_id.to_string()))?;

        let mut conflicts = capacity_conflicts(
            store,
            project_id,
            squad_id,
            squad.daily_capacity(),
            start,
            dev_complete,
            suggestion.total_hours,
        );

        let mut windows = vec![(start, dev_complete)];
        for milestone in [suggestion.uat_date, suggestion.go_live_date].into_iter().flatten() {
            let week_start = workdays::monday_of_week(milestone);
            windows.push((week_start, workdays::add_working_days(week_start, 4)));
        }
        conflicts.extend(onsite_overlaps(
            &other_onsite_schedules(store, project_id, squad_id),
            &windows,
        ));

        Ok(ConflictCheckResult::from_conflicts(conflicts))
    }
}

/// Utilization findings for an even spread of `estimated_hours` over the
/// window's working days: at most one overload finding and one
/// high-utilization finding, each covering all affected days.
fn capacity_conflicts(
    store: &impl ScheduleStore,
    project_id: &str,
    squad_id: &str,
    daily_capacity: f64,
    start: NaiveDate,
    end: NaiveDate,
    estimated_hours: f64,
) -> Vec<Conflict> {
    let days = workdays::working_days_between(start, end);
    if days.is_empty() || daily_capacity <= 0.0 {
        return Vec::new();
    }
    let avg_daily = estimated_hours / days.len() as f64;

    let mut allocated: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut other_projects: Vec<String> = Vec::new();
    for row in store.allocations_in_range(squad_id, start, end) {
        *allocated.entry(row.date).or_insert(0.0) += row.hours;
        if row.project_id != project_id && !other_projects.contains(&row.project_id) {
            other_projects.push(row.project_id.clone());
        }
    }

    let mut overloaded: Vec<(NaiveDate, f64)> = Vec::new();
    let mut high: Vec<(NaiveDate, f64)> = Vec::new();
    for day in days {
        let projected = allocated.get(&day).copied().unwrap_or(0.0) + avg_daily;
        let utilization = projected / daily_capacity * 100.0;
        if utilization > OVERLOAD_THRESHOLD_PCT + 1e-9 {
            overloaded.push((day, utilization));
        } else if utilization >= HIGH_UTILIZATION_PCT {
            high.push((day, utilization));
        }
    }

    let mut conflicts = Vec::new();
    if !overloaded.is_empty() {
        conflicts.push(Conflict::capacity_overload(&overloaded, other_projects.clone()));
    }
    if !high.is_empty() {
        conflicts.push(Conflict::high_utilization(&high, other_projects));
    }
    conflicts
}

/// On-site schedules of every other project with allocations on the squad.
fn other_onsite_schedules(
    store: &impl ScheduleStore,
    project_id: &str,
    squad_id: &str,
) -> Vec<OnsiteSchedule> {
    store
        .project_ids_for_squad(squad_id)
        .into_iter()
        .filter(|id| id != project_id)
        .flat_map(|id| store.onsite_schedules(&id))
        .collect()
}

/// One finding per other-project on-site week whose start date falls within
/// seven days of any of the given windows.
fn onsite_overlaps(
    others: &[OnsiteSchedule],
    windows: &[(NaiveDate, NaiveDate)],
) -> Vec<Conflict> {
    let pad = Days::new(ONSITE_PROXIMITY_DAYS);
    others
        .iter()
        .filter(|other| {
            windows
                .iter()
                .any(|(start, end)| other.start_date >= *start - pad && other.start_date <= *end + pad)
        })
        .map(Conflict::onsite_overlap)
        .collect()
}

//! Allocation impact preview.
//!
//! Runs the same phase math as the allocation pipeline without writing
//! anything, and aggregates the prospective hours into a week-by-week table
//! of current vs. prospective load so a caller can inspect the impact
//! before committing. Unlike the pipeline, a day over capacity does not
//! abort the preview — the affected weeks are flagged instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SchedulerError;
use crate::store::ScheduleStore;
use crate::validation;
use crate::workdays;

use super::allocation::AllocationEngine;

/// One calendar week of the preview table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyCapacityPreview {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Friday of the week.
    pub week_end: NaiveDate,
    /// Squad capacity summed over the week's working days in range.
    pub total_capacity: f64,
    /// Development hours already committed this week.
    pub current_dev_hours: f64,
    /// On-site hours already committed this week.
    pub current_onsite_hours: f64,
    /// Development hours the new plan would add.
    pub preview_dev_hours: f64,
    /// On-site hours the new plan would add.
    pub preview_onsite_hours: f64,
    /// Committed utilization percentage.
    pub current_utilization_pct: f64,
    /// Utilization percentage with the new plan included.
    pub preview_utilization_pct: f64,
    /// Whether the combined load exceeds the week's capacity.
    pub would_exceed_capacity: bool,
}

/// Week-by-week impact of a prospective allocation. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPreview {
    /// Overall verdict: no week exceeds capacity.
    pub can_allocate: bool,
    /// Human-readable verdict.
    pub message: String,
    /// Weeks in range, in order.
    pub weeks: Vec<WeeklyCapacityPreview>,
}

impl AllocationPreview {
    fn infeasible(message: impl Into<String>) -> Self {
        Self {
            can_allocate: false,
            message: message.into(),
            weeks: Vec::new(),
        }
    }
}

impl AllocationEngine {
    /// Previews the project's plan on a squad without writing.
    ///
    /// Requires the project's start and CRP dates to be set; code-complete
    /// and UAT fall back to CRP as in the allocation pipeline.
    pub fn preview(
        store: &impl ScheduleStore,
        project_id: &str,
        squad_id: &str,
    ) -> Result<AllocationPreview, SchedulerError> {
        let project = store
            .project(project_id)
            .ok_or_else(|| SchedulerError::ProjectNotFound(project_id.to_string()))?;
        let squad = store
            .squad(squad_id)
            .ok_or_else(|| SchedulerError::SquadNotFound(squad_id.to_string()))?;

        if let Err(errors) = validation::validate_milestones(&project) {
            return Err(SchedulerError::InvalidMilestones(validation::describe_errors(
                &errors,
            )));
        }

        let Some(start) = project.start_date else {
            return Ok(AllocationPreview::infeasible("project has no start date"));
        };
        let Some(crp) = project.crp_date else {
            return Ok(AllocationPreview::infeasible("project has no CRP date"));
        };
        let code_complete = project.code_complete_date.unwrap_or(crp);
        let uat = project.uat_date.unwrap_or(crp);

        // Prospective per-day hours: the pipeline's phase math, no aborts.
        let phase1_days = workdays::working_days_between(start, code_complete);
        let phase2_days = workdays::working_days_between(crp, uat);
        if phase1_days.is_empty() {
            return Ok(AllocationPreview::infeasible(
                "no working days between start and code-complete",
            ));
        }
        if phase2_days.is_empty() {
            return Ok(AllocationPreview::infeasible(
                "no working days between CRP and UAT",
            ));
        }

        let mut prospective_dev: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let per_day = project.estimated_dev_hours * 0.9 / phase1_days.len() as f64;
        for day in &phase1_days {
            *prospective_dev.entry(*day).or_insert(0.0) += per_day;
        }
        let per_day = project.estimated_dev_hours * 0.1 / phase2_days.len() as f64;
        for day in &phase2_days {
            *prospective_dev.entry(*day).or_insert(0.0) += per_day;
        }

        let onsite = store.onsite_schedules(project_id);
        let mut prospective_onsite: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for schedule in &onsite {
            let days = workdays::working_days_between(schedule.start_date, schedule.end_date);
            if days.is_empty() {
                continue;
            }
            let per_day = schedule.total_hours / days.len() as f64;
            for day in days {
                *prospective_onsite.entry(day).or_insert(0.0) += per_day;
            }
        }

        // Range: development window through go-live, stretched to cover the
        // latest on-site week.
        let mut end = project.go_live_date.unwrap_or(uat);
        if let Some(latest) = onsite.iter().map(|s| s.end_date).max() {
            end = end.max(latest);
        }

        let mut current_by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
        for row in store.allocations_in_range(squad_id, start, end) {
            let entry = current_by_date.entry(row.date).or_insert((0.0, 0.0));
            if row.is_development() {
                entry.0 += row.hours;
            } else {
                entry.1 += row.hours;
            }
        }

        let daily_capacity = squad.daily_capacity();
        let mut weeks: BTreeMap<NaiveDate, WeeklyCapacityPreview> = BTreeMap::new();
        for day in workdays::working_days_between(start, end) {
            let week_start = workdays::monday_of_week(day);
            let week = weeks.entry(week_start).or_insert_with(|| WeeklyCapacityPreview {
                week_start,
                week_end: workdays::add_working_days(week_start, 4),
                total_capacity: 0.0,
                current_dev_hours: 0.0,
                current_onsite_hours: 0.0,
                preview_dev_hours: 0.0,
                preview_onsite_hours: 0.0,
                current_utilization_pct: 0.0,
                preview_utilization_pct: 0.0,
                would_exceed_capacity: false,
            });
            week.total_capacity += daily_capacity;
            if let Some((dev, onsite)) = current_by_date.get(&day) {
                week.current_dev_hours += dev;
                week.current_onsite_hours += onsite;
            }
            week.preview_dev_hours += prospective_dev.get(&day).copied().unwrap_or(0.0);
            week.preview_onsite_hours += prospective_onsite.get(&day).copied().unwrap_or(0.0);
        }

        let mut can_allocate = true;
        let mut weeks: Vec<WeeklyCapacityPreview> = weeks.into_values().collect();
        for week in &mut weeks {
            let current = week.current_dev_hours + week.current_onsite_hours;
            let combined = current + week.preview_dev_hours + week.preview_onsite_hours;
            if week.total_capacity > 0.0 {
                week.current_utilization_pct = current / week.total_capacity * 100.0;
                week.preview_utilization_pct = combined / week.total_capacity * 100.0;
            }
            week.would_exceed_capacity = combined > week.total_capacity + 1e-9;
            if week.would_exceed_capacity {
                can_allocate = false;
            }
        }

        Ok(AllocationPreview {
            can_allocate,
            message: if can_allocate {
                "Project can be allocated".to_string()
            } else {
                "Allocation would exceed squad capacity".to_string()
            },
            weeks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocation, HourType, OnsiteSchedule, OnsiteType, Project, Squad, TeamMember};
    use crate::store::MemoryStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fixture() -> MemoryStore {
        let mut store = MemoryStore::new();
        let mut squad = Squad::new("alpha");
        for i in 0..5 {
            squad = squad.with_member(TeamMember::new(format!("m{i}"), 8.0));
        }
        store.insert_squad(squad); // 40h/day, 200h/week
        store.insert_project(
            Project::new("P-100", 100.0)
                .with_start_date(d(2025, 3, 3))
                .with_code_complete_date(d(2025, 3, 14))
                .with_crp_date(d(2025, 3, 17))
                .with_uat_date(d(2025, 3, 21)),
        );
        store
    }

    #[test]
    fn test_preview_weekly_table() {
        let store = fixture();
        let preview = AllocationEngine::preview(&store, "P-100", "alpha").unwrap();

        assert!(preview.can_allocate);
        assert_eq!(preview.weeks.len(), 3); // Mar 3, Mar 10, Mar 17
        let first = &preview.weeks[0];
        assert_eq!(first.week_start, d(2025, 3, 3));
        assert_eq!(first.week_end, d(2025, 3, 7));
        assert!((first.total_capacity - 200.0).abs() < 1e-9);
        // Phase 1 runs at 9h/day: 45h in the first week.
        assert!((first.preview_dev_hours - 45.0).abs() < 1e-6);
        assert!((first.preview_utilization_pct - 22.5).abs() < 1e-6);
        assert!(!first.would_exceed_capacity);

        // Polish week: 10h over 5 days.
        let last = &preview.weeks[2];
        assert!((last.preview_dev_hours - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_preview_counts_existing_load() {
        let mut store = fixture();
        store
            .insert_allocations(vec![Allocation::new(
                "P-other",
                "alpha",
                d(2025, 3, 4),
                HourType::Development,
                30.0,
            )])
            .unwrap();

        let preview = AllocationEngine::preview(&store, "P-100", "alpha").unwrap();
        let first = &preview.weeks[0];
        assert!((first.current_dev_hours - 30.0).abs() < 1e-9);
        assert!((first.current_utilization_pct - 15.0).abs() < 1e-6);
        assert!((first.preview_utilization_pct - 37.5).abs() < 1e-6);
    }

    #[test]
    fn test_preview_flags_exceeding_week() {
        let mut store = fixture();
        // Fill the first week to 90% so the 45h prospective load overflows.
        let rows: Vec<Allocation> = workdays::working_days_between(d(2025, 3, 3), d(2025, 3, 7))
            .into_iter()
            .map(|day| Allocation::new("P-other", "alpha", day, HourType::Development, 36.0))
            .collect();
        store.insert_allocations(rows).unwrap();

        let preview = AllocationEngine::preview(&store, "P-100", "alpha").unwrap();
        assert!(!preview.can_allocate);
        assert!(preview.weeks[0].would_exceed_capacity);
        assert!(!preview.weeks[1].would_exceed_capacity);
        assert_eq!(preview.message, "Allocation would exceed squad capacity");
    }

    #[test]
    fn test_preview_includes_onsite_week() {
        let mut store = fixture();
        store.insert_onsite(
            OnsiteSchedule::new("P-100", d(2025, 3, 24), d(2025, 3, 28), OnsiteType::GoLive)
                .with_total_hours(40.0),
        );

        let preview = AllocationEngine::preview(&store, "P-100", "alpha").unwrap();
        // Range stretches past UAT to cover the on-site week.
        assert_eq!(preview.weeks.len(), 4);
        let onsite_week = &preview.weeks[3];
        assert_eq!(onsite_week.week_start, d(2025, 3, 24));
        assert!((onsite_week.preview_onsite_hours - 40.0).abs() < 1e-6);
        assert!((onsite_week.preview_dev_hours - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_preview_requires_milestones() {
        let mut store = fixture();
        store.insert_project(Project::new("P-bare", 50.0));

        let preview = AllocationEngine::preview(&store, "P-bare", "alpha").unwrap();
        assert!(!preview.can_allocate);
        assert_eq!(preview.message, "project has no start date");
        assert!(preview.weeks.is_empty());
    }
}

//! Day-level allocation pipeline.
//!
//! Carves a project's estimated development effort into day-by-day hour
//! rows bounded by squad capacity, in three phases sharing one staging
//! list:
//!
//! 1. **Bulk development** — 90% of hours, evenly over the working days
//!    from start to code-complete (CRP when code-complete is unset).
//! 2. **Polish development** — the remaining 10%, evenly from CRP to UAT
//!    (CRP when UAT is unset). Capacity checks see phase 1's staged hours.
//! 3. **On-site** — each declared on-site week spread over its working
//!    days, additive to same-day development hours, checked against
//!    persisted plus all staged hours.
//!
//! Any failed day rejects the whole plan: the staged rows are discarded and
//! nothing new is written. The project's previous rows are cleared
//! unconditionally before staging begins, so a rejected plan leaves the
//! project with zero rows — the operation is all-or-nothing for the new
//! plan but does not restore the old one.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::capacity::CapacityProvider;
use crate::error::SchedulerError;
use crate::models::{Allocation, HourType, OnsiteSchedule, Project};
use crate::store::ScheduleStore;
use crate::validation;
use crate::workdays;

/// Tolerance for capacity comparisons, so an exact-fit day passes despite
/// accumulated floating-point error.
const CAPACITY_EPSILON: f64 = 1e-9;

/// Result of an allocation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationOutcome {
    /// The full plan was validated and persisted in one transaction.
    Committed {
        /// Distinct days the plan touches.
        days: usize,
        /// Total hours across all rows.
        total_hours: f64,
    },
    /// Some day failed its capacity check, or a phase had no working days.
    /// Nothing new was written.
    Rejected {
        /// Why the plan was rejected.
        reason: String,
    },
}

impl AllocationOutcome {
    /// Whether the plan was persisted.
    pub fn is_committed(&self) -> bool {
        matches!(self, AllocationOutcome::Committed { .. })
    }
}

/// In-memory staging list for a plan under validation.
///
/// Rows sharing (date, hour-type) merge by summing hours, preserving the
/// at-most-one-row-per-key invariant even when phase windows overlap.
struct StagedPlan {
    project_id: String,
    squad_id: String,
    rows: BTreeMap<(NaiveDate, HourType), f64>,
}

impl StagedPlan {
    fn new(project_id: &str, squad_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            squad_id: squad_id.to_string(),
            rows: BTreeMap::new(),
        }
    }

    fn stage(&mut self, date: NaiveDate, hour_type: HourType, hours: f64) {
        *self.rows.entry((date, hour_type)).or_insert(0.0) += hours;
    }

    /// Staged hours on a date, across all hour types.
    fn hours_on(&self, date: NaiveDate) -> f64 {
        self.rows
            .iter()
            .filter(|((d, _), _)| *d == date)
            .map(|(_, h)| *h)
            .sum()
    }

    fn day_count(&self) -> usize {
        let mut days: Vec<NaiveDate> = self.rows.keys().map(|(d, _)| *d).collect();
        days.dedup();
        days.len()
    }

    fn total_hours(&self) -> f64 {
        self.rows.values().sum()
    }

    fn into_rows(self) -> Vec<Allocation> {
        let project_id = self.project_id;
        let squad_id = self.squad_id;
        self.rows
            .into_iter()
            .map(|((date, hour_type), hours)| {
                Allocation::new(&project_id, &squad_id, date, hour_type, hours)
            })
            .collect()
    }
}

/// The allocation engine: the only writer of allocation rows.
pub struct AllocationEngine;

impl AllocationEngine {
    /// Plans and commits a project's day-level hour rows on a squad.
    ///
    /// The project's existing rows are cleared first, unconditionally.
    /// The new plan is staged phase by phase and persisted as a single
    /// transaction only if every day passes its capacity check; a rejected
    /// plan writes nothing, leaving the project with zero rows.
    pub fn allocate(
        store: &mut impl ScheduleStore,
        project_id: &str,
        squad_id: &str,
        start_date: NaiveDate,
        crp_date: NaiveDate,
        total_dev_hours: f64,
    ) -> Result<AllocationOutcome, SchedulerError> {
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

        let onsite = store.onsite_schedules(project_id);

        // Old plan is cleared before validation; a rejected new plan leaves
        // zero rows rather than restoring the old ones.
        store.clear_allocations(project_id, None)?;

        let daily_capacity = squad.daily_capacity();
        match Self::stage_plan(
            &*store,
            &project,
            squad_id,
            daily_capacity,
            start_date,
            crp_date,
            total_dev_hours,
            &onsite,
        ) {
            Ok(plan) => {
                let days = plan.day_count();
                let total_hours = plan.total_hours();
                store.insert_allocations(plan.into_rows())?;
                debug!(project = project_id, squad = squad_id, days, total_hours, "plan committed");
                Ok(AllocationOutcome::Committed { days, total_hours })
            }
            Err(reason) => {
                debug!(project = project_id, squad = squad_id, %reason, "plan rejected");
                Ok(AllocationOutcome::Rejected { reason })
            }
        }
    }

    /// Re-plans a project from a new start date, re-deriving the hour total
    /// from the stored estimate and keeping the stored CRP date.
    ///
    /// Idempotent: repeating with identical arguments yields an identical
    /// allocation set.
    pub fn reallocate(
        store: &mut impl ScheduleStore,
        project_id: &str,
        squad_id: &str,
        new_start_date: NaiveDate,
    ) -> Result<AllocationOutcome, SchedulerError> {
        let project = store
            .project(project_id)
            .ok_or_else(|| SchedulerError::ProjectNotFound(project_id.to_string()))?;

        let Some(crp_date) = project.crp_date else {
            return Ok(AllocationOutcome::Rejected {
                reason: "project has no CRP date".to_string(),
            });
        };

        Self::allocate(
            store,
            project_id,
            squad_id,
            new_start_date,
            crp_date,
            project.estimated_dev_hours,
        )
    }

    /// Deletes a project's allocation rows wholesale, optionally scoped to
    /// one squad. Returns the number of rows removed.
    pub fn remove_allocations(
        store: &mut impl ScheduleStore,
        project_id: &str,
        squad_id: Option<&str>,
    ) -> Result<usize, SchedulerError> {
        Ok(store.clear_allocations(project_id, squad_id)?)
    }

    /// Quick feasibility probe: could `total_dev_hours`, spread evenly over
    /// the working days from `start_date` to `crp_date`, fit within the
    /// squad's remaining capacity? Writes nothing.
    pub fn can_allocate(
        store: &impl ScheduleStore,
        squad_id: &str,
        start_date: NaiveDate,
        crp_date: NaiveDate,
        total_dev_hours: f64,
    ) -> Result<bool, SchedulerError> {
        let days = workdays::working_days_between(start_date, crp_date);
        if days.is_empty() {
            return Ok(false);
        }

        let hours_per_day = total_dev_hours / days.len() as f64;
        for day in days {
            let remaining = CapacityProvider::remaining_capacity(store, squad_id, day)?;
            if remaining + CAPACITY_EPSILON < hours_per_day {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Runs all three phases against live store state, producing the staged
    /// plan or the first failure reason.
    #[allow(clippy::too_many_arguments)]
    fn stage_plan(
        store: &impl ScheduleStore,
        project: &Project,
        squad_id: &str,
        daily_capacity: f64,
        start_date: NaiveDate,
        crp_date: NaiveDate,
        total_dev_hours: f64,
        onsite: &[OnsiteSchedule],
    ) -> Result<StagedPlan, String> {
        let mut plan = StagedPlan::new(&project.id, squad_id);

        let code_complete = project.code_complete_date.unwrap_or(crp_date);
        let uat = project.uat_date.unwrap_or(crp_date);

        // Phase 1: 90% of development hours, start → code-complete.
        let phase1_days = workdays::working_days_between(start_date, code_complete);
        if phase1_days.is_empty() {
            return Err(format!(
                "no working days between start {start_date} and code-complete {code_complete}"
            ));
        }
        let phase1_hours = total_dev_hours * 0.9;
        let per_day = phase1_hours / phase1_days.len() as f64;
        debug!(
            days = phase1_days.len(),
            hours = phase1_hours,
            per_day,
            "phase 1: bulk development"
        );
        for day in phase1_days {
            let remaining = daily_capacity - store.allocated_hours(squad_id, day);
            if remaining + CAPACITY_EPSILON < per_day {
                return Err(format!(
                    "insufficient capacity on {day}: need {per_day:.2}h, have {remaining:.2}h"
                ));
            }
            plan.stage(day, HourType::Development, per_day);
        }

        // Phase 2: 10% of development hours, CRP → UAT. Checks see phase 1's
        // staged hours as well as persisted hours from other projects.
        let phase2_days = workdays::working_days_between(crp_date, uat);
        if phase2_days.is_empty() {
            return Err(format!(
                "no working days between CRP {crp_date} and UAT {uat}"
            ));
        }
        let phase2_hours = total_dev_hours * 0.1;
        let per_day = phase2_hours / phase2_days.len() as f64;
        debug!(
            days = phase2_days.len(),
            hours = phase2_hours,
            per_day,
            "phase 2: polish development"
        );
        for day in phase2_days {
            let committed = store.allocated_hours(squad_id, day) + plan.hours_on(day);
            let remaining = daily_capacity - committed;
            if remaining + CAPACITY_EPSILON < per_day {
                return Err(format!(
                    "insufficient capacity on {day}: need {per_day:.2}h, have {remaining:.2}h"
                ));
            }
            plan.stage(day, HourType::Development, per_day);
        }

        // Phase 3: on-site weeks. A different hour type, additive to
        // development on the same day, bounded by the same capacity.
        for schedule in onsite {
            let days = workdays::working_days_between(schedule.start_date, schedule.end_date);
            if days.is_empty() {
                return Err(format!(
                    "on-site week starting {} has no working days",
                    schedule.start_date
                ));
            }
            let per_day = schedule.total_hours / days.len() as f64;
            debug!(
                week = %schedule.start_date,
                kind = %schedule.onsite_type,
                days = days.len(),
                per_day,
                "phase 3: on-site week"
            );
            for day in days {
                let committed = store.allocated_hours(squad_id, day) + plan.hours_on(day);
                let remaining = daily_capacity - committed;
                if remaining + CAPACITY_EPSILON < per_day {
                    return Err(format!(
                        "insufficient capacity on {day} for on-site hours: need {per_day:.2}h, have {remaining:.2}h"
                    ));
                }
                plan.stage(day, schedule.onsite_type.into(), per_day);
            }
        }

        Ok(plan)
    }
}

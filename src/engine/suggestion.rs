//! Earliest-feasible-start search.
//!
//! Greedy forward search over a squad's remaining capacity: starting from a
//! candidate working day, the trial walks forward consuming up to the
//! squad's full daily capacity per day until the buffered estimate is
//! covered. Any day that cannot take the planned hours fails the whole
//! trial and the candidate start advances one working day. The search is
//! bounded by a 365-day horizon.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::SchedulerError;
use crate::store::ScheduleStore;
use crate::workdays;

const SEARCH_HORIZON_DAYS: u64 = 365;
const CAPACITY_EPSILON: f64 = 1e-9;

/// Outcome of a schedule search. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSuggestion {
    /// Whether a feasible window was found.
    pub feasible: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Earliest working day the squad can absorb the project.
    pub suggested_start_date: Option<NaiveDate>,
    /// Day the buffered estimate is fully consumed.
    pub dev_complete_date: Option<NaiveDate>,
    /// Derived CRP milestone: 3 working days before development completes.
    pub crp_date: Option<NaiveDate>,
    /// Derived UAT milestone: the development-complete day.
    pub uat_date: Option<NaiveDate>,
    /// Derived go-live milestone: 10 working days after UAT.
    pub go_live_date: Option<NaiveDate>,
    /// Working days from start through development complete.
    pub duration_days: usize,
    /// Estimated hours with the buffer applied.
    pub total_hours: f64,
    /// Buffer percentage the estimate was inflated by.
    pub buffer_percentage: f64,
}

impl ScheduleSuggestion {
    /// A search that found no window, with a reason.
    pub fn infeasible(message: impl Into<String>) -> Self {
        Self {
            feasible: false,
            message: message.into(),
            suggested_start_date: None,
            dev_complete_date: None,
            crp_date: None,
            uat_date: None,
            go_live_date: None,
            duration_days: 0,
            total_hours: 0.0,
            buffer_percentage: 0.0,
        }
    }
}

/// Greedy forward search for the earliest feasible start date.
#[derive(Debug, Clone)]
pub struct ScheduleSearchEngine<C: Clock = SystemClock> {
    clock: C,
}

impl ScheduleSearchEngine<SystemClock> {
    /// Search engine anchored at the wall clock.
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for ScheduleSearchEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ScheduleSearchEngine<C> {
    /// Search engine reading "today" from the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Finds the earliest start from which the squad can absorb the
    /// project's buffered estimate, and derives the milestone dates.
    ///
    /// The search begins at `preferred_start` (rolled forward to a working
    /// day) or tomorrow. `buffer_override` takes precedence over the
    /// project's own buffer; a zero or unset buffer falls back to the 20%
    /// default.
    pub fn suggest(
        &self,
        store: &impl ScheduleStore,
        project_id: &str,
        squad_id: &str,
        buffer_override: Option<f64>,
        preferred_start: Option<NaiveDate>,
    ) -> Result<ScheduleSuggestion, SchedulerError> {
        let project = store
            .project(project_id)
            .ok_or_else(|| SchedulerError::ProjectNotFound(project_id.to_string()))?;
        let squad = store
            .squad(squad_id)
            .ok_or_else(|| SchedulerError::SquadNotFound(squad_id.to_string()))?;

        let daily_capacity = squad.daily_capacity();
        if daily_capacity <= 0.0 {
            return Ok(ScheduleSuggestion::infeasible("no available capacity"));
        }

        let buffer = project.resolve_buffer(buffer_override);
        let total_hours = project.buffered_hours(buffer);

        let earliest = preferred_start.unwrap_or_else(|| self.clock.today() + Days::new(1));
        let mut candidate = workdays::next_working_day_or_same(earliest);
        let horizon = candidate + Days::new(SEARCH_HORIZON_DAYS);

        while candidate <= horizon {
            if let Some(dev_complete) =
                try_window(store, squad_id, daily_capacity, total_hours, candidate, horizon)
            {
                let crp = workdays::add_working_days(dev_complete, -3);
                let uat = dev_complete;
                let go_live = workdays::add_working_days(uat, 10);
                let duration = workdays::working_day_count(candidate, dev_complete);
                debug!(
                    project = %project_id,
                    squad = %squad_id,
                    start = %candidate,
                    duration,
                    "schedule window found"
                );
                return Ok(ScheduleSuggestion {
                    feasible: true,
                    message: format!(
                        "Squad can absorb {total_hours:.1}h starting {candidate} \
                         ({duration} working days)"
                    ),
                    suggested_start_date: Some(candidate),
                    dev_complete_date: Some(dev_complete),
                    crp_date: Some(crp),
                    uat_date: Some(uat),
                    go_live_date: Some(go_live),
                    duration_days: duration,
                    total_hours,
                    buffer_percentage: buffer,
                });
            }
            candidate = workdays::add_working_days(candidate, 1);
        }

        Ok(ScheduleSuggestion::infeasible(
            "no feasible start found within the search horizon",
        ))
    }
}

/// One trial: walk forward from `start`, planning up to the full daily
/// capacity per working day against live remaining capacity. Returns the
/// development-complete date, or `None` if any day falls short of its
/// planned hours before the horizon.
fn try_window(
    store: &impl ScheduleStore,
    squad_id: &str,
    daily_capacity: f64,
    total_hours: f64,
    start: NaiveDate,
    horizon: NaiveDate,
) -> Option<NaiveDate> {
    let mut remaining = total_hours;
    let mut day = start;
    while day <= horizon {
        if workdays::is_working_day(day) {
            let planned = remaining.min(daily_capacity);
            let available = daily_capacity - store.allocated_hours(squad_id, day);
            if available + CAPACITY_EPSILON < planned {
                return None;
            }
            remaining -= planned;
            if remaining <= CAPACITY_EPSILON {
                return Some(day);
            }
        }
        day = day + Days::new(1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{Allocation, HourType, Project, Squad, TeamMember};
    use crate::store::MemoryStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn squad_of(member_count: usize, hours: f64) -> Squad {
        let mut squad = Squad::new("alpha");
        for i in 0..member_count {
            squad = squad.with_member(TeamMember::new(format!("m{i}"), hours));
        }
        squad
    }

    // Sunday, so "tomorrow" is Monday Mar 3.
    fn engine() -> ScheduleSearchEngine<FixedClock> {
        ScheduleSearchEngine::with_clock(FixedClock(d(2025, 3, 2)))
    }

    #[test]
    fn test_suggest_idle_squad() {
        let mut store = MemoryStore::new();
        store.insert_squad(squad_of(5, 6.5)); // 32.5h/day
        store.insert_project(Project::new("P-100", 1000.0));

        let suggestion = engine()
            .suggest(&store, "P-100", "alpha", None, None)
            .unwrap();

        assert!(suggestion.feasible);
        // 1000h + 20% = 1200h at 32.5h/day = 37 working days.
        assert!((suggestion.total_hours - 1200.0).abs() < 1e-9);
        assert_eq!(suggestion.duration_days, 37);
        assert_eq!(suggestion.suggested_start_date, Some(d(2025, 3, 3)));
        assert_eq!(suggestion.dev_complete_date, Some(d(2025, 4, 22)));
        assert_eq!(suggestion.crp_date, Some(d(2025, 4, 17)));
        assert_eq!(suggestion.uat_date, Some(d(2025, 4, 22)));
        assert_eq!(suggestion.go_live_date, Some(d(2025, 5, 6)));
    }

    #[test]
    fn test_suggest_milestone_ordering() {
        let mut store = MemoryStore::new();
        store.insert_squad(squad_of(2, 8.0));
        store.insert_project(Project::new("P-100", 200.0));

        let suggestion = engine()
            .suggest(&store, "P-100", "alpha", None, None)
            .unwrap();

        let start = suggestion.suggested_start_date.unwrap();
        let crp = suggestion.crp_date.unwrap();
        let uat = suggestion.uat_date.unwrap();
        let go_live = suggestion.go_live_date.unwrap();
        assert!(start < crp);
        assert!(crp < uat);
        assert!(uat < go_live);
        assert_eq!(uat, suggestion.dev_complete_date.unwrap());
    }

    #[test]
    fn test_suggest_busy_day_pushes_start() {
        let mut store = MemoryStore::new();
        store.insert_squad(squad_of(1, 8.0));
        store.insert_project(Project::new("P-100", 10.0).with_buffer(0.0));
        // Monday partially booked: 4h free is short of the planned 8h, so
        // the whole trial fails and the start moves to Tuesday.
        store
            .insert_allocations(vec![Allocation::new(
                "P-other",
                "alpha",
                d(2025, 3, 3),
                HourType::Development,
                4.0,
            )])
            .unwrap();

        // Zero buffer resolves to the 20% default: 12h over two days.
        let suggestion = engine()
            .suggest(&store, "P-100", "alpha", None, None)
            .unwrap();

        assert!(suggestion.feasible);
        assert_eq!(suggestion.suggested_start_date, Some(d(2025, 3, 4)));
        assert_eq!(suggestion.dev_complete_date, Some(d(2025, 3, 5)));
        assert_eq!(suggestion.duration_days, 2);
        assert!((suggestion.total_hours - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_suggest_weekend_preferred_start_rolls_forward() {
        let mut store = MemoryStore::new();
        store.insert_squad(squad_of(1, 8.0));
        store.insert_project(Project::new("P-100", 8.0).with_buffer(100.0));

        let suggestion = engine()
            .suggest(&store, "P-100", "alpha", None, Some(d(2025, 3, 8)))
            .unwrap();

        assert_eq!(suggestion.suggested_start_date, Some(d(2025, 3, 10)));
        assert!((suggestion.buffer_percentage - 100.0).abs() < 1e-9);
        assert!((suggestion.total_hours - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_suggest_buffer_override_wins() {
        let mut store = MemoryStore::new();
        store.insert_squad(squad_of(1, 8.0));
        store.insert_project(Project::new("P-100", 100.0).with_buffer(50.0));

        let suggestion = engine()
            .suggest(&store, "P-100", "alpha", Some(10.0), None)
            .unwrap();

        assert!((suggestion.buffer_percentage - 10.0).abs() < 1e-9);
        assert!((suggestion.total_hours - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_suggest_no_capacity() {
        let mut store = MemoryStore::new();
        store.insert_squad(Squad::new("empty"));
        store.insert_project(Project::new("P-100", 100.0));

        let suggestion = engine()
            .suggest(&store, "P-100", "empty", None, None)
            .unwrap();

        assert!(!suggestion.feasible);
        assert_eq!(suggestion.message, "no available capacity");
        assert!(suggestion.suggested_start_date.is_none());
    }

    #[test]
    fn test_suggest_horizon_exhausted() {
        let mut store = MemoryStore::new();
        store.insert_squad(squad_of(1, 8.0));
        store.insert_project(Project::new("P-100", 100.0));
        // Book the squad solid for well past the horizon.
        let mut rows = Vec::new();
        for day in workdays::working_days_between(d(2025, 3, 3), d(2026, 6, 1)) {
            rows.push(Allocation::new("P-other", "alpha", day, HourType::Development, 8.0));
        }
        store.insert_allocations(rows).unwrap();

        let suggestion = engine()
            .suggest(&store, "P-100", "alpha", None, None)
            .unwrap();

        assert!(!suggestion.feasible);
        assert_eq!(
            suggestion.message,
            "no feasible start found within the search horizon"
        );
    }

    #[test]
    fn test_suggest_unknown_entities() {
        let mut store = MemoryStore::new();
        store.insert_squad(squad_of(1, 8.0));
        store.insert_project(Project::new("P-100", 100.0));

        let err = engine().suggest(&store, "ghost", "alpha", None, None).unwrap_err();
        assert!(matches!(err, SchedulerError::ProjectNotFound(_)));

        let err = engine().suggest(&store, "P-100", "ghost", None, None).unwrap_err();
        assert!(matches!(err, SchedulerError::SquadNotFound(_)));
    }
}

//! Weighted squad ranking.
//!
//! Scores every active squad for a project on four criteria and ranks them:
//! projected capacity fit over the suggested window (weight 0.40), current
//! 30-day workload (0.30), number of projects already on the squad (0.20),
//! and squad-size-to-project-size match (0.10). Each criterion maps to a
//! 0–100 bucket score; squads with no feasible schedule score zero across
//! the board but stay in the list with the search engine's reason.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::SchedulerError;
use crate::models::Squad;
use crate::store::ScheduleStore;
use crate::workdays;
use chrono::{Days, NaiveDate};

use super::suggestion::{ScheduleSearchEngine, ScheduleSuggestion};

const WEIGHT_CAPACITY: f64 = 0.40;
const WEIGHT_WORKLOAD: f64 = 0.30;
const WEIGHT_PROJECT_COUNT: f64 = 0.20;
const WEIGHT_SIZE_MATCH: f64 = 0.10;

const WORKLOAD_WINDOW_DAYS: u64 = 30;

/// One squad's ranked fit for a project. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadRecommendation {
    pub squad_id: String,
    pub squad_name: String,
    /// Weighted total in `[0, 100]`.
    pub total_score: f64,
    pub capacity_score: f64,
    pub workload_score: f64,
    pub project_count_score: f64,
    pub size_match_score: f64,
    /// Why the squad ranks where it does, or why it is infeasible.
    pub reason: String,
    /// The schedule the score was computed against.
    pub suggestion: ScheduleSuggestion,
}

/// Ranks active squads for a project.
#[derive(Debug, Clone)]
pub struct SquadScorer<C: Clock + Clone = SystemClock> {
    clock: C,
}

impl SquadScorer<SystemClock> {
    /// Scorer anchored at the wall clock.
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for SquadScorer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> SquadScorer<C> {
    /// Scorer reading "today" from the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Scores every active squad for the project and returns them ranked
    /// best-first. `buffer_override` and `preferred_start` are forwarded to
    /// the schedule search.
    pub fn recommend(
        &self,
        store: &impl ScheduleStore,
        project_id: &str,
        buffer_override: Option<f64>,
        preferred_start: Option<NaiveDate>,
    ) -> Result<Vec<SquadRecommendation>, SchedulerError> {
        let project = store
            .project(project_id)
            .ok_or_else(|| SchedulerError::ProjectNotFound(project_id.to_string()))?;

        let search = ScheduleSearchEngine::with_clock(self.clock.clone());
        let mut recommendations = Vec::new();
        for squad in store.active_squads() {
            let suggestion =
                search.suggest(store, project_id, &squad.id, buffer_override, preferred_start)?;

            let recommendation = if suggestion.feasible {
                let capacity_score = capacity_score(squad.daily_capacity(), &suggestion);
                let workload_score = workload_score(store, &squad, self.clock.today());
                let project_count_score =
                    project_count_score(store.project_ids_for_squad(&squad.id).len());
                let size_match_score =
                    size_match_score(squad.active_member_count(), project.estimated_dev_hours);
                let total_score = WEIGHT_CAPACITY * capacity_score
                    + WEIGHT_WORKLOAD * workload_score
                    + WEIGHT_PROJECT_COUNT * project_count_score
                    + WEIGHT_SIZE_MATCH * size_match_score;
                SquadRecommendation {
                    squad_id: squad.id.clone(),
                    squad_name: squad.name.clone(),
                    total_score,
                    capacity_score,
                    workload_score,
                    project_count_score,
                    size_match_score,
                    reason: reason_for(total_score),
                    suggestion,
                }
            } else {
                SquadRecommendation {
                    squad_id: squad.id.clone(),
                    squad_name: squad.name.clone(),
                    total_score: 0.0,
                    capacity_score: 0.0,
                    workload_score: 0.0,
                    project_count_score: 0.0,
                    size_match_score: 0.0,
                    reason: suggestion.message.clone(),
                    suggestion,
                }
            };
            recommendations.push(recommendation);
        }

        recommendations.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        debug!(
            project = %project_id,
            squads = recommendations.len(),
            "squads ranked"
        );
        Ok(recommendations)
    }
}

/// Capacity criterion: the project's average daily demand over the
/// suggested window as a share of the squad's daily capacity. The sweet
/// spot is 60–80%.
fn capacity_score(daily_capacity: f64, suggestion: &ScheduleSuggestion) -> f64 {
    if suggestion.duration_days == 0 {
        return 50.0;
    }
    if daily_capacity <= 0.0 {
        return 0.0;
    }
    let avg_daily = suggestion.total_hours / suggestion.duration_days as f64;
    let utilization = avg_daily / daily_capacity * 100.0;

    match utilization {
        u if u > 120.0 => 20.0,
        u if u > 100.0 => 40.0,
        u if u >= 95.0 => 60.0,
        u if u >= 80.0 => 80.0,
        u if u >= 60.0 => 100.0,
        u if u >= 50.0 => 90.0,
        u if u >= 40.0 => 70.0,
        u if u >= 30.0 => 60.0,
        _ => 50.0,
    }
}

/// Workload criterion: average utilization over the next 30 calendar days.
/// The lighter the current load, the higher the score.
fn workload_score(store: &impl ScheduleStore, squad: &Squad, today: NaiveDate) -> f64 {
    let daily_capacity = squad.daily_capacity();
    if daily_capacity <= 0.0 {
        return 0.0;
    }
    let end = today + Days::new(WORKLOAD_WINDOW_DAYS);
    let working_days = workdays::working_day_count(today, end);
    if working_days == 0 {
        return 100.0;
    }
    let allocated: f64 = store
        .allocations_in_range(&squad.id, today, end)
        .iter()
        .map(|a| a.hours)
        .sum();
    let utilization = allocated / (daily_capacity * working_days as f64) * 100.0;

    match utilization {
        u if u >= 100.0 => 20.0,
        u if u >= 80.0 => 40.0,
        u if u >= 60.0 => 60.0,
        u if u >= 40.0 => 80.0,
        _ => 100.0,
    }
}

/// Project-count criterion: fewer concurrent projects score higher.
fn project_count_score(count: usize) -> f64 {
    match count {
        0 => 100.0,
        1 => 80.0,
        2 => 60.0,
        3 => 40.0,
        _ => 20.0,
    }
}

/// Size-match criterion: small squads suit small projects, large squads
/// large ones. Exact band match scores 100, adjacent bands 70, else 40.
fn size_match_score(member_count: usize, estimated_hours: f64) -> f64 {
    let squad_band = match member_count {
        0..=5 => 0,
        6..=10 => 1,
        _ => 2,
    };
    let project_band = if estimated_hours < 200.0 {
        0
    } else if estimated_hours < 500.0 {
        1
    } else {
        2
    };
    match (squad_band as i32 - project_band).abs() {
        0 => 100.0,
        1 => 70.0,
        _ => 40.0,
    }
}

fn reason_for(total_score: f64) -> String {
    let band = if total_score >= 80.0 {
        "Excellent fit"
    } else if total_score >= 60.0 {
        "Good fit"
    } else if total_score >= 40.0 {
        "Fair fit"
    } else {
        "Poor fit"
    };
    band.to_string()
}

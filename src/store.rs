//! Persistence seam.
//!
//! [`ScheduleStore`] is the narrow interface the engines consume: point
//! lookups by identifier, filtered range queries, and wholesale
//! delete/insert of allocation rows. Persistence technology is a collaborator
//! concern; [`MemoryStore`] is the in-memory reference implementation used by
//! the tests.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{Allocation, OnsiteSchedule, Project, Squad};

/// Storage failures.
///
/// A failed [`ScheduleStore::insert_allocations`] must persist nothing:
/// multi-day plans land as a single transaction or not at all.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected or aborted a commit.
    #[error("storage commit failed: {0}")]
    Commit(String),
}

/// Read and write surface the engines require of persistence.
///
/// Reads are side-effect-free and reflect the latest committed state on
/// every call. Writes must be serialized at least per squad by the
/// deployment — two concurrent commits validated against the same capacity
/// snapshot can jointly overshoot it.
pub trait ScheduleStore {
    /// Point lookup of a project.
    fn project(&self, id: &str) -> Option<Project>;

    /// Point lookup of a squad.
    fn squad(&self, id: &str) -> Option<Squad>;

    /// All squads whose active flag is set.
    fn active_squads(&self) -> Vec<Squad>;

    /// On-site schedules declared by a project.
    fn onsite_schedules(&self, project_id: &str) -> Vec<OnsiteSchedule>;

    /// All allocation rows for a project, ordered by date.
    fn allocations_for_project(&self, project_id: &str) -> Vec<Allocation>;

    /// Allocation rows for a squad within `[start, end]`, ordered by date.
    fn allocations_in_range(&self, squad_id: &str, start: NaiveDate, end: NaiveDate)
        -> Vec<Allocation>;

    /// Total hours allocated to a squad on one date, across all projects
    /// and hour types.
    fn allocated_hours(&self, squad_id: &str, date: NaiveDate) -> f64;

    /// Distinct IDs of projects holding any allocation on a squad.
    fn project_ids_for_squad(&self, squad_id: &str) -> Vec<String>;

    /// Deletes a project's allocation rows, optionally scoped to one squad.
    /// Returns the number of rows removed.
    fn clear_allocations(
        &mut self,
        project_id: &str,
        squad_id: Option<&str>,
    ) -> Result<usize, StoreError>;

    /// Inserts a batch of allocation rows as one transaction.
    fn insert_allocations(&mut self, rows: Vec<Allocation>) -> Result<(), StoreError>;
}

/// In-memory store keyed by entity ID.
///
/// Allocation rows are indexed by (squad, date) for the range queries the
/// search loop issues repeatedly.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    projects: BTreeMap<String, Project>,
    squads: BTreeMap<String, Squad>,
    onsite: Vec<OnsiteSchedule>,
    allocations: Vec<Allocation>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a project.
    pub fn insert_project(&mut self, project: Project) {
        self.projects.insert(project.id.clone(), project);
    }

    /// Adds or replaces a squad.
    pub fn insert_squad(&mut self, squad: Squad) {
        self.squads.insert(squad.id.clone(), squad);
    }

    /// Adds an on-site schedule.
    pub fn insert_onsite(&mut self, schedule: OnsiteSchedule) {
        self.onsite.push(schedule);
    }

    /// Total number of allocation rows held.
    pub fn allocation_count(&self) -> usize {
        self.allocations.len()
    }
}

impl ScheduleStore for MemoryStore {
    fn project(&self, id: &str) -> Option<Project> {
        self.projects.get(id).cloned()
    }

    fn squad(&self, id: &str) -> Option<Squad> {
        self.squads.get(id).cloned()
    }

    fn active_squads(&self) -> Vec<Squad> {
        self.squads.values().filter(|s| s.active).cloned().collect()
    }

    fn onsite_schedules(&self, project_id: &str) -> Vec<OnsiteSchedule> {
        self.onsite
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect()
    }

    fn allocations_for_project(&self, project_id: &str) -> Vec<Allocation> {
        let mut rows: Vec<Allocation> = self
            .allocations
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.date);
        rows
    }

    fn allocations_in_range(
        &self,
        squad_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Allocation> {
        let mut rows: Vec<Allocation> = self
            .allocations
            .iter()
            .filter(|a| a.squad_id == squad_id && a.date >= start && a.date <= end)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.date);
        rows
    }

    fn allocated_hours(&self, squad_id: &str, date: NaiveDate) -> f64 {
        self.allocations
            .iter()
            .filter(|a| a.squad_id == squad_id && a.date == date)
            .map(|a| a.hours)
            .sum()
    }

    fn project_ids_for_squad(&self, squad_id: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .allocations
            .iter()
            .filter(|a| a.squad_id == squad_id)
            .map(|a| a.project_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn clear_allocations(
        &mut self,
        project_id: &str,
        squad_id: Option<&str>,
    ) -> Result<usize, StoreError> {
        let before = self.allocations.len();
        self.allocations.retain(|a| {
            a.project_id != project_id || squad_id.is_some_and(|sq| a.squad_id != sq)
        });
        Ok(before - self.allocations.len())
    }

    fn insert_allocations(&mut self, rows: Vec<Allocation>) -> Result<(), StoreError> {
        self.allocations.extend(rows);
        Ok(())
    }
}

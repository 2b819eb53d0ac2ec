//! Engine error types.
//!
//! Missing entities and milestone-ordering violations are result-level
//! errors. Infeasibility (no capacity window, zero working days, zero squad
//! capacity) is never an error — it is reported through `can_allocate` /
//! `feasible` flags on the returned value objects.

use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by the scheduling engines.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The referenced project does not exist in the store.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// The referenced squad does not exist in the store.
    #[error("squad not found: {0}")]
    SquadNotFound(String),

    /// Milestone date ordering is violated; checked before any scheduling
    /// attempt is made.
    #[error("invalid milestone dates: {0}")]
    InvalidMilestones(String),

    /// The storage collaborator failed; a failed commit persists nothing.
    #[error(transparent)]
    Store(#[from] StoreError),
}

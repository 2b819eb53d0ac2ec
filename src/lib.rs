//! Capacity allocation and scheduling engine for software delivery squads.
//!
//! Plans how a squad's finite daily work-hour capacity is consumed by
//! projects across development and on-site phases: carving estimated effort
//! into day-by-day hour assignments, searching for the earliest feasible
//! start date, surfacing overcommitment and overlap conflicts before a plan
//! is committed, and ranking candidate squads by weighted fitness.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Squad`, `TeamMember`, `Project`,
//!   `Allocation`, `OnsiteSchedule`
//! - **`store`**: The persistence seam (`ScheduleStore`) and an in-memory
//!   reference implementation
//! - **`capacity`**: Daily capacity, allocated hours, and remaining-capacity
//!   projections
//! - **`engine`**: The allocation pipeline, schedule search, conflict
//!   detection, and squad recommendation
//! - **`validation`**: Milestone date-ordering checks
//! - **`workdays`**: Monday–Friday calendar arithmetic
//! - **`clock`**: Injectable "today" so searches are deterministic in tests
//!
//! # Architecture
//!
//! Everything outside this crate — HTTP routing, persistence schema,
//! authentication, export — is a collaborator behind `ScheduleStore` and the
//! plain-value contracts of `engine`. Reads are side-effect-free and may be
//! issued repeatedly; the only mutating path is the allocation commit, which
//! stages a full plan and persists it all-or-nothing.

pub mod capacity;
pub mod clock;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
pub mod validation;
pub mod workdays;

pub use capacity::{CapacityInfo, CapacityProvider};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{
    AllocationEngine, AllocationOutcome, AllocationPreview, Conflict, ConflictCheckResult,
    ConflictDetector, ConflictKind, ScheduleSearchEngine, ScheduleSuggestion, Severity,
    SquadRecommendation, SquadScorer, WeeklyCapacityPreview,
};
pub use error::SchedulerError;
pub use models::{Allocation, HourType, OnsiteSchedule, OnsiteType, Project, Squad, TeamMember};
pub use store::{MemoryStore, ScheduleStore, StoreError};

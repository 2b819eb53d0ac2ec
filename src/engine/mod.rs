//! Scheduling engines.
//!
//! - **`allocation`**: the three-phase staged allocation pipeline
//! - **`preview`**: week-by-week impact preview without writing
//! - **`suggestion`**: greedy forward search for the earliest feasible start
//! - **`conflict`**: non-blocking overcommitment and overlap checks
//! - **`recommend`**: weighted multi-criteria squad ranking

mod allocation;
mod conflict;
mod preview;
mod recommend;
mod suggestion;

pub use allocation::{AllocationEngine, AllocationOutcome};
pub use conflict::{Conflict, ConflictCheckResult, ConflictDetector, ConflictKind, Severity};
pub use preview::{AllocationPreview, WeeklyCapacityPreview};
pub use recommend::{SquadRecommendation, SquadScorer};
pub use suggestion::{ScheduleSearchEngine, ScheduleSuggestion};

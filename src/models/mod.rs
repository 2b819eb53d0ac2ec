//! Scheduling domain models.
//!
//! Flat, ID-keyed aggregates: a `Squad` owns its member list, a `Project`
//! owns its milestone dates, and `Allocation` rows reference both by ID.
//! There are no embedded back-references — relationships are resolved
//! through the store.

mod allocation;
mod onsite;
mod project;
mod squad;

pub use allocation::{Allocation, HourType};
pub use onsite::{OnsiteSchedule, OnsiteType};
pub use project::Project;
pub use squad::{Squad, TeamMember};

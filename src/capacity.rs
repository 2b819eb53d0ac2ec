//! Squad capacity projections.
//!
//! Computes a squad's aggregate daily capacity and, for any date or range,
//! capacity minus already-committed hours. Nothing is cached between calls —
//! every read reflects the latest committed state, which makes the provider
//! safe to call repeatedly inside search loops.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SchedulerError;
use crate::store::ScheduleStore;
use crate::workdays;

/// One working day's capacity picture for a squad. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityInfo {
    /// The working day.
    pub date: NaiveDate,
    /// Aggregate daily capacity of the squad's active members.
    pub total_capacity: f64,
    /// Hours already committed across all projects and hour types.
    pub allocated_hours: f64,
    /// `total_capacity - allocated_hours`.
    pub remaining_capacity: f64,
}

impl CapacityInfo {
    /// Allocated hours as a percentage of capacity, or 0 when capacity is 0.
    pub fn utilization_pct(&self) -> f64 {
        if self.total_capacity > 0.0 {
            self.allocated_hours / self.total_capacity * 100.0
        } else {
            0.0
        }
    }
}

/// Read-only capacity queries over a [`ScheduleStore`].
pub struct CapacityProvider;

impl CapacityProvider {
    /// Aggregate daily capacity: the sum of the squad's active members'
    /// daily hours.
    pub fn daily_capacity(
        store: &impl ScheduleStore,
        squad_id: &str,
    ) -> Result<f64, SchedulerError> {
        let squad = store
            .squad(squad_id)
            .ok_or_else(|| SchedulerError::SquadNotFound(squad_id.to_string()))?;
        Ok(squad.daily_capacity())
    }

    /// Hours committed to the squad on one date, across all projects.
    pub fn allocated_hours(store: &impl ScheduleStore, squad_id: &str, date: NaiveDate) -> f64 {
        store.allocated_hours(squad_id, date)
    }

    /// Capacity minus committed hours for one date.
    pub fn remaining_capacity(
        store: &impl ScheduleStore,
        squad_id: &str,
        date: NaiveDate,
    ) -> Result<f64, SchedulerError> {
        let capacity = Self::daily_capacity(store, squad_id)?;
        Ok(capacity - store.allocated_hours(squad_id, date))
    }

    /// Capacity picture for every working day in `[start, end]`, in order.
    ///
    /// Weekend dates are never emitted. The range's allocations are fetched
    /// once and grouped by date rather than re-queried per day.
    pub fn capacity_range(
        store: &impl ScheduleStore,
        squad_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CapacityInfo>, SchedulerError> {
        let capacity = Self::daily_capacity(store, squad_id)?;

        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for row in store.allocations_in_range(squad_id, start, end) {
            *by_date.entry(row.date).or_insert(0.0) += row.hours;
        }

        Ok(workdays::working_days_between(start, end)
            .into_iter()
            .map(|date| {
                let allocated = by_date.get(&date).copied().unwrap_or(0.0);
                CapacityInfo {
                    date,
                    total_capacity: capacity,
                    allocated_hours: allocated,
                    remaining_capacity: capacity - allocated,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocation, HourType, Squad, TeamMember};
    use crate::store::MemoryStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn store_with_squad() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_squad(
            Squad::new("alpha")
                .with_member(TeamMember::new("m1", 6.5))
                .with_member(TeamMember::new("m2", 6.5))
                .with_member(TeamMember::new("m3", 8.0).with_active(false)),
        );
        store
    }

    #[test]
    fn test_daily_capacity_active_members_only() {
        let store = store_with_squad();
        let capacity = CapacityProvider::daily_capacity(&store, "alpha").unwrap();
        assert!((capacity - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_capacity_unknown_squad() {
        let store = store_with_squad();
        let err = CapacityProvider::daily_capacity(&store, "ghost").unwrap_err();
        assert!(matches!(err, SchedulerError::SquadNotFound(_)));
    }

    #[test]
    fn test_remaining_capacity_reflects_commits() {
        let mut store = store_with_squad();
        let date = d(2025, 3, 3);
        store
            .insert_allocations(vec![
                Allocation::new("P-1", "alpha", date, HourType::Development, 5.0),
                Allocation::new("P-2", "alpha", date, HourType::Uat, 3.0),
            ])
            .unwrap();

        let remaining = CapacityProvider::remaining_capacity(&store, "alpha", date).unwrap();
        assert!((remaining - 5.0).abs() < 1e-9);

        // Uncommitted days have full capacity
        let idle = CapacityProvider::remaining_capacity(&store, "alpha", d(2025, 3, 4)).unwrap();
        assert!((idle - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_range_skips_weekends() {
        let store = store_with_squad();
        // Thu Mar 6 .. Mon Mar 10 spans a weekend
        let range =
            CapacityProvider::capacity_range(&store, "alpha", d(2025, 3, 6), d(2025, 3, 10))
                .unwrap();
        let dates: Vec<NaiveDate> = range.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![d(2025, 3, 6), d(2025, 3, 7), d(2025, 3, 10)]);
    }

    #[test]
    fn test_capacity_range_groups_allocations() {
        let mut store = store_with_squad();
        store
            .insert_allocations(vec![
                Allocation::new("P-1", "alpha", d(2025, 3, 4), HourType::Development, 4.0),
                Allocation::new("P-2", "alpha", d(2025, 3, 4), HourType::GoLive, 2.0),
            ])
            .unwrap();

        let range =
            CapacityProvider::capacity_range(&store, "alpha", d(2025, 3, 3), d(2025, 3, 5))
                .unwrap();
        assert_eq!(range.len(), 3);
        let tuesday = &range[1];
        assert_eq!(tuesday.date, d(2025, 3, 4));
        assert!((tuesday.allocated_hours - 6.0).abs() < 1e-9);
        assert!((tuesday.remaining_capacity - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_utilization_pct() {
        let info = CapacityInfo {
            date: d(2025, 3, 3),
            total_capacity: 40.0,
            allocated_hours: 30.0,
            remaining_capacity: 10.0,
        };
        assert!((info.utilization_pct() - 75.0).abs() < 1e-9);

        let zero = CapacityInfo {
            date: d(2025, 3, 3),
            total_capacity: 0.0,
            allocated_hours: 0.0,
            remaining_capacity: 0.0,
        };
        assert_eq!(zero.utilization_pct(), 0.0);
    }
}

//! Squad and team member models.
//!
//! A squad is a delivery team whose aggregate daily capacity is the sum of
//! its active members' daily capacity hours. Inactive members and inactive
//! squads contribute nothing.

use serde::{Deserialize, Serialize};

/// A delivery squad.
///
/// Owns its member list; allocations reference the squad by ID only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Squad {
    /// Unique squad identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Squad lead's name.
    pub lead_name: String,
    /// Whether the squad is available for new allocations.
    pub active: bool,
    /// Team members, in roster order.
    pub members: Vec<TeamMember>,
}

/// A member of exactly one squad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique member identifier.
    pub id: String,
    /// Member's name.
    pub name: String,
    /// Role within the squad (e.g., "Engineer", "QA").
    pub role: String,
    /// Hours this member can work per day.
    pub daily_capacity_hours: f64,
    /// Only active members contribute to squad capacity.
    pub active: bool,
}

impl Squad {
    /// Creates an active squad with no members.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            lead_name: String::new(),
            active: true,
            members: Vec::new(),
        }
    }

    /// Sets the squad name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the squad lead.
    pub fn with_lead(mut self, lead_name: impl Into<String>) -> Self {
        self.lead_name = lead_name.into();
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Adds a member.
    pub fn with_member(mut self, member: TeamMember) -> Self {
        self.members.push(member);
        self
    }

    /// Aggregate daily capacity: sum of active members' hours.
    pub fn daily_capacity(&self) -> f64 {
        self.members
            .iter()
            .filter(|m| m.active)
            .map(|m| m.daily_capacity_hours)
            .sum()
    }

    /// Number of active members.
    pub fn active_member_count(&self) -> usize {
        self.members.iter().filter(|m| m.active).count()
    }
}

impl TeamMember {
    /// Creates an active member with the given daily capacity.
    pub fn new(id: impl Into<String>, daily_capacity_hours: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            role: String::new(),
            daily_capacity_hours,
            active: true,
        }
    }

    /// Sets the member's name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the member's role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

//! User domain type.

use serde::{Deserialize, Serialize};

use super::id::{CircleId, DivisionId, SubdivisionId, UserId, ZoneId};
use super::role::{HierarchyLevel, UserRole};

/// Sparse mapping of the hierarchy node(s) a user's role applies to.
///
/// Only the field matching the role's scope level is normally populated;
/// the registry leaves the rest unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedLevels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision_id: Option<SubdivisionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_id: Option<DivisionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle_id: Option<CircleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<ZoneId>,
}

impl AssignedLevels {
    /// The assigned id at a given hierarchy level, if any.
    pub fn level_id(&self, level: HierarchyLevel) -> Option<&str> {
        match level {
            HierarchyLevel::Subdivision => self.subdivision_id.as_ref().map(|id| id.as_str()),
            HierarchyLevel::Division => self.division_id.as_ref().map(|id| id.as_str()),
            HierarchyLevel::Circle => self.circle_id.as_ref().map(|id| id.as_str()),
            HierarchyLevel::Zone => self.zone_id.as_ref().map(|id| id.as_str()),
        }
    }
}

/// An operations-staff user from the user registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub role: UserRole,
    /// Which hierarchy node(s) the role applies to.
    #[serde(default)]
    pub assigned_levels: AssignedLevels,
}

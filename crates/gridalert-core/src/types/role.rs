//! User roles and organizational hierarchy levels.
//!
//! The per-level recipient queries are driven by the [`UserRole::MANAGERS`]
//! table rather than per-role branches, so adding a hierarchy level means
//! adding one table entry instead of another copy of the query loop.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A level of the organizational hierarchy above the substation.
///
/// Levels form a strict ancestor chain: every subdivision may belong to a
/// division, every division to a circle, every circle to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyLevel {
    Subdivision,
    Division,
    Circle,
    Zone,
}

impl HierarchyLevel {
    /// All levels in ascending order (closest to the asset first).
    pub const ALL: [HierarchyLevel; 4] = [
        HierarchyLevel::Subdivision,
        HierarchyLevel::Division,
        HierarchyLevel::Circle,
        HierarchyLevel::Zone,
    ];

    /// Stable lowercase name, matching the registry field prefixes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subdivision => "subdivision",
            Self::Division => "division",
            Self::Circle => "circle",
            Self::Zone => "zone",
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user in the organizational hierarchy.
///
/// Serialized in camelCase to match the registry documents
/// (e.g. `"subdivisionManager"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    SubdivisionManager,
    DivisionManager,
    CircleManager,
    ZoneManager,
    Admin,
}

impl UserRole {
    /// Manager roles paired with the hierarchy level that scopes them,
    /// in ascending level order. Admins are global and not listed here.
    pub const MANAGERS: [(UserRole, HierarchyLevel); 4] = [
        (UserRole::SubdivisionManager, HierarchyLevel::Subdivision),
        (UserRole::DivisionManager, HierarchyLevel::Division),
        (UserRole::CircleManager, HierarchyLevel::Circle),
        (UserRole::ZoneManager, HierarchyLevel::Zone),
    ];

    /// The hierarchy level this role is scoped by, or `None` for roles
    /// that are eligible for every asset (admins).
    pub fn scope_level(&self) -> Option<HierarchyLevel> {
        match self {
            Self::SubdivisionManager => Some(HierarchyLevel::Subdivision),
            Self::DivisionManager => Some(HierarchyLevel::Division),
            Self::CircleManager => Some(HierarchyLevel::Circle),
            Self::ZoneManager => Some(HierarchyLevel::Zone),
            Self::Admin => None,
        }
    }

    /// Stable camelCase name, matching the registry documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubdivisionManager => "subdivisionManager",
            Self::DivisionManager => "divisionManager",
            Self::CircleManager => "circleManager",
            Self::ZoneManager => "zoneManager",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subdivisionManager" => Ok(Self::SubdivisionManager),
            "divisionManager" => Ok(Self::DivisionManager),
            "circleManager" => Ok(Self::CircleManager),
            "zoneManager" => Ok(Self::ZoneManager),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

//! Organizational hierarchy node and resolved-chain types.
//!
//! Nodes form a strict tree owned by the external org registry: every
//! substation links to a subdivision, which may link to a division, which
//! may link to a circle, which may name a zone. Absence of a link at any
//! level truncates the chain there.

use serde::{Deserialize, Serialize};

use super::id::{CircleId, DivisionId, SubdivisionId, SubstationId, ZoneId};
use super::role::HierarchyLevel;

/// A substation record from the org registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substation {
    pub id: SubstationId,
    pub name: String,
    /// Parent subdivision, if assigned.
    pub subdivision_id: Option<SubdivisionId>,
}

/// A subdivision record from the org registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subdivision {
    pub id: SubdivisionId,
    /// Parent division, if assigned.
    pub division_id: Option<DivisionId>,
}

/// A division record from the org registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub id: DivisionId,
    /// Parent circle, if assigned.
    pub circle_id: Option<CircleId>,
}

/// A circle record from the org registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub id: CircleId,
    /// Parent zone, if assigned.
    pub zone_id: Option<ZoneId>,
}

/// The fully resolved chain of organizational containers above one asset.
///
/// Optional fields are populated only while the chain continues upward: a
/// subdivision with no division yields no circle or zone regardless of any
/// further registry links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHierarchy {
    pub substation_id: SubstationId,
    pub subdivision_id: SubdivisionId,
    pub division_id: Option<DivisionId>,
    pub circle_id: Option<CircleId>,
    pub zone_id: Option<ZoneId>,
}

impl ResolvedHierarchy {
    /// The resolved id at a given hierarchy level, if the chain reaches it.
    pub fn level_id(&self, level: HierarchyLevel) -> Option<&str> {
        match level {
            HierarchyLevel::Subdivision => Some(self.subdivision_id.as_str()),
            HierarchyLevel::Division => self.division_id.as_ref().map(|id| id.as_str()),
            HierarchyLevel::Circle => self.circle_id.as_ref().map(|id| id.as_str()),
            HierarchyLevel::Zone => self.zone_id.as_ref().map(|id| id.as_str()),
        }
    }
}

//! Organizational hierarchy resolution.

use std::sync::Arc;

use tracing::debug;

use gridalert_core::result::AppResult;
use gridalert_core::traits::repository::OrgRepository;
use gridalert_core::types::hierarchy::ResolvedHierarchy;
use gridalert_core::types::id::SubstationId;

/// Resolves the full chain of organizational containers above a substation.
///
/// A missing substation or an unassigned subdivision link is a miss
/// (`Ok(None)`). Above the subdivision, a broken link or missing record
/// truncates the chain instead of failing: parent ids taken from a link are
/// trusted, but the chain only continues upward through records that
/// actually resolve.
pub struct OrgHierarchyResolver {
    org: Arc<dyn OrgRepository>,
}

impl std::fmt::Debug for OrgHierarchyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrgHierarchyResolver").finish_non_exhaustive()
    }
}

impl OrgHierarchyResolver {
    /// Create a new resolver.
    pub fn new(org: Arc<dyn OrgRepository>) -> Self {
        Self { org }
    }

    /// Resolve the hierarchy chain for a substation.
    pub async fn resolve(
        &self,
        substation_id: &SubstationId,
    ) -> AppResult<Option<ResolvedHierarchy>> {
        let Some(substation) = self.org.get_substation(substation_id).await? else {
            debug!(substation = %substation_id, "Substation not found");
            return Ok(None);
        };
        let Some(subdivision_id) = substation.subdivision_id else {
            debug!(substation = %substation_id, "Substation has no subdivision link");
            return Ok(None);
        };
        let Some(subdivision) = self.org.get_subdivision(&subdivision_id).await? else {
            debug!(subdivision = %subdivision_id, "Subdivision not found");
            return Ok(None);
        };

        let mut chain = ResolvedHierarchy {
            substation_id: substation.id,
            subdivision_id: subdivision.id,
            division_id: None,
            circle_id: None,
            zone_id: None,
        };

        if let Some(division_id) = subdivision.division_id {
            chain.division_id = Some(division_id.clone());
            if let Some(division) = self.org.get_division(&division_id).await? {
                if let Some(circle_id) = division.circle_id {
                    chain.circle_id = Some(circle_id.clone());
                    if let Some(circle) = self.org.get_circle(&circle_id).await? {
                        chain.zone_id = circle.zone_id;
                    }
                }
            }
        }

        Ok(Some(chain))
    }
}

//! Repository traits for the injected asset, org, user, preference, and
//! token stores.
//!
//! Lookup misses are `Ok(None)`, never errors; `Err` is reserved for the
//! backing store being unreachable or misbehaving.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::AppResult;
use crate::types::hierarchy::{Circle, Division, Subdivision, Substation};
use crate::types::id::{AssetId, CircleId, DivisionId, SubdivisionId, SubstationId, UserId};
use crate::types::preference::NotificationPreferences;
use crate::types::role::{HierarchyLevel, UserRole};
use crate::types::token::DeviceToken;
use crate::types::user::User;
use crate::types::Asset;

/// Read access to the external asset (bay) registry.
#[async_trait]
pub trait AssetRepository: Send + Sync + 'static {
    /// Fetch an asset by id.
    async fn get_asset(&self, id: &AssetId) -> AppResult<Option<Asset>>;
}

/// Read access to the external org registry.
#[async_trait]
pub trait OrgRepository: Send + Sync + 'static {
    /// Fetch a substation by id.
    async fn get_substation(&self, id: &SubstationId) -> AppResult<Option<Substation>>;

    /// Fetch a subdivision by id.
    async fn get_subdivision(&self, id: &SubdivisionId) -> AppResult<Option<Subdivision>>;

    /// Fetch a division by id.
    async fn get_division(&self, id: &DivisionId) -> AppResult<Option<Division>>;

    /// Fetch a circle by id.
    async fn get_circle(&self, id: &CircleId) -> AppResult<Option<Circle>>;
}

/// Read access to the user registry.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Users holding `role` whose assignment at `level` equals `level_id`.
    async fn users_by_role_and_level(
        &self,
        role: UserRole,
        level: HierarchyLevel,
        level_id: &str,
    ) -> AppResult<Vec<User>>;

    /// All users holding `role`, regardless of assignment (admins).
    async fn users_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;
}

/// Durable store of per-user notification preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync + 'static {
    /// Fetch one user's preference record.
    async fn get_preferences(&self, user_id: &UserId)
        -> AppResult<Option<NotificationPreferences>>;

    /// Create or replace one user's preference record.
    async fn set_preferences(
        &self,
        user_id: &UserId,
        preferences: &NotificationPreferences,
    ) -> AppResult<()>;

    /// Bulk-load every preference record, for cache refreshes.
    async fn all_preferences(&self) -> AppResult<Vec<(UserId, NotificationPreferences)>>;
}

/// Durable store of device push tokens.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Bulk-load every token currently flagged active, oldest first, so a
    /// later row for the same user is the most recently observed one.
    async fn active_tokens(&self) -> AppResult<Vec<DeviceToken>>;

    /// Mark a token inactive with a deactivation timestamp.
    async fn mark_inactive(&self, token: &str, deactivated_at: DateTime<Utc>) -> AppResult<()>;
}

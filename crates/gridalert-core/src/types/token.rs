//! Device push-token domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// A push registration token for one user's device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceToken {
    pub user_id: UserId,
    pub token: String,
    /// Whether the token is currently believed deliverable.
    pub active: bool,
    /// When the token was proven permanently invalid, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated_at: Option<DateTime<Utc>>,
}

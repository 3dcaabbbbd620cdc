//! Request DTOs.

use serde::Deserialize;

use gridalert_core::types::event::{EventStatus, GridEvent};

/// Body of `POST /hooks/events/status`: the pre-transition status plus the
/// event record as it looks after the transition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    /// Status the event held before this update.
    pub before_status: EventStatus,
    /// The updated event.
    pub event: GridEvent,
}

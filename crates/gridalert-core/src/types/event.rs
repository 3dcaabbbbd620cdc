//! Grid-event domain types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{AssetId, EventId, SubstationId};

/// Recognized grid-event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Tripping,
    Shutdown,
    Breakdown,
}

impl EventCategory {
    /// Lowercase name used in preference toggles and push payload data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tripping => "tripping",
            Self::Shutdown => "shutdown",
            Self::Breakdown => "breakdown",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tripping => f.write_str("Tripping"),
            Self::Shutdown => f.write_str("Shutdown"),
            Self::Breakdown => f.write_str("Breakdown"),
        }
    }
}

/// Persisted status of a grid-event record, uppercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    Open,
    Closed,
}

/// Lifecycle transition that triggered a notification cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLifecycle {
    Opened,
    Closed,
}

impl EventLifecycle {
    /// Lowercase status string used in push payload data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opened => "open",
            Self::Closed => "closed",
        }
    }
}

/// A grid-event record as consumed from the event source.
///
/// Beyond the routing fields (category, substation, asset), the record
/// carries display fields the core treats as opaque; they only surface in
/// the formatted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridEvent {
    pub id: EventId,
    pub event_type: EventCategory,
    pub status: EventStatus,
    pub substation_id: SubstationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substation_name: Option<String>,
    /// The affected asset (bay).
    pub bay_id: AssetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags_cause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_non_feeder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phase_faults: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_auto_reclose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown_person_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown_person_designation: Option<String>,
}

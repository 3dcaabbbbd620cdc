//! Per-user notification preferences.
//!
//! Field names are serialized in camelCase to stay wire-compatible with the
//! preference documents written by the mobile client.

use serde::{Deserialize, Serialize};

use super::event::EventCategory;

/// A user's notification preference record.
///
/// Created lazily with the configured default on first lookup, then
/// persisted, so every first-seen user ends up with a durable default row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    /// Voltage thresholds (kV) the user is subscribed to. An event qualifies
    /// if its voltage is >= any threshold in the union of this set and
    /// `enabled_optional_voltages`. Empty union means no voltage qualifies.
    #[serde(default)]
    pub subscribed_voltage_thresholds: Vec<u32>,
    /// Lower voltage levels the user may opt into individually.
    #[serde(default)]
    pub optional_voltage_thresholds: Vec<u32>,
    /// Optional voltages the user has actually enabled.
    #[serde(default)]
    pub enabled_optional_voltages: Vec<u32>,
    /// Bay types the user wants alerts for; case-insensitive, `"all"` is a
    /// wildcard.
    #[serde(default)]
    pub subscribed_bay_types: Vec<String>,
    /// Substations the user wants alerts for; `"all"` is a wildcard.
    #[serde(default)]
    pub subscribed_substations: Vec<String>,
    /// Tripping alerts toggle. Missing field defaults to enabled.
    #[serde(default = "default_enabled")]
    pub enable_tripping_notifications: bool,
    /// Shutdown alerts toggle. Missing field defaults to enabled.
    #[serde(default = "default_enabled")]
    pub enable_shutdown_notifications: bool,
    /// Breakdown alerts toggle. Missing field defaults to enabled.
    #[serde(default = "default_enabled")]
    pub enable_breakdown_notifications: bool,
}

fn default_enabled() -> bool {
    true
}

impl NotificationPreferences {
    /// Whether alerts for the given event category are enabled.
    pub fn category_enabled(&self, category: EventCategory) -> bool {
        match category {
            EventCategory::Tripping => self.enable_tripping_notifications,
            EventCategory::Shutdown => self.enable_shutdown_notifications,
            EventCategory::Breakdown => self.enable_breakdown_notifications,
        }
    }

    /// Iterator over the effective voltage thresholds: the union of the
    /// subscribed set and the enabled optional voltages.
    pub fn effective_voltages(&self) -> impl Iterator<Item = u32> + '_ {
        self.subscribed_voltage_thresholds
            .iter()
            .chain(self.enabled_optional_voltages.iter())
            .copied()
    }
}

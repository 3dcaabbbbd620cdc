//! Default notification preferences for first-seen users.
//!
//! The defaults are deployment configuration, not code constants: earlier
//! deployments shipped different threshold and bay-type sets, and the
//! canonical values below are overridable per environment.

use serde::{Deserialize, Serialize};

use crate::types::preference::NotificationPreferences;

/// Default preference values materialized for users without a persisted
/// preference record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultPreferencesConfig {
    /// Voltage thresholds (kV) subscribed by default.
    #[serde(default = "default_voltage_thresholds")]
    pub voltage_thresholds: Vec<u32>,
    /// Lower voltage levels offered as individual opt-ins.
    #[serde(default = "default_optional_voltages")]
    pub optional_voltage_thresholds: Vec<u32>,
    /// Optional voltages enabled by default (none).
    #[serde(default)]
    pub enabled_optional_voltages: Vec<u32>,
    /// Bay types subscribed by default.
    #[serde(default = "default_bay_types")]
    pub bay_types: Vec<String>,
    /// Substations subscribed by default.
    #[serde(default = "default_substations")]
    pub substations: Vec<String>,
    /// Tripping alerts enabled by default.
    #[serde(default = "default_true")]
    pub enable_tripping: bool,
    /// Shutdown alerts enabled by default.
    #[serde(default = "default_true")]
    pub enable_shutdown: bool,
    /// Breakdown alerts enabled by default.
    #[serde(default = "default_true")]
    pub enable_breakdown: bool,
}

impl DefaultPreferencesConfig {
    /// Materialize a preference record from the configured defaults.
    pub fn to_preferences(&self) -> NotificationPreferences {
        NotificationPreferences {
            subscribed_voltage_thresholds: self.voltage_thresholds.clone(),
            optional_voltage_thresholds: self.optional_voltage_thresholds.clone(),
            enabled_optional_voltages: self.enabled_optional_voltages.clone(),
            subscribed_bay_types: self.bay_types.clone(),
            subscribed_substations: self.substations.clone(),
            enable_tripping_notifications: self.enable_tripping,
            enable_shutdown_notifications: self.enable_shutdown,
            enable_breakdown_notifications: self.enable_breakdown,
        }
    }
}

impl Default for DefaultPreferencesConfig {
    fn default() -> Self {
        Self {
            voltage_thresholds: default_voltage_thresholds(),
            optional_voltage_thresholds: default_optional_voltages(),
            enabled_optional_voltages: Vec::new(),
            bay_types: default_bay_types(),
            substations: default_substations(),
            enable_tripping: true,
            enable_shutdown: true,
            enable_breakdown: true,
        }
    }
}

fn default_voltage_thresholds() -> Vec<u32> {
    vec![132, 220, 400, 765]
}

fn default_optional_voltages() -> Vec<u32> {
    vec![11, 33, 66, 110]
}

fn default_bay_types() -> Vec<String> {
    vec!["Line".to_string(), "Transformer".to_string()]
}

fn default_substations() -> Vec<String> {
    vec!["all".to_string()]
}

fn default_true() -> bool {
    true
}

//! Grid asset (bay) domain type.

use serde::{Deserialize, Serialize};

use super::id::AssetId;
use super::voltage::parse_voltage_kv;

/// A grid asset ("bay"), owned by the external asset registry.
///
/// Immutable for the duration of one notification cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Registry identifier.
    pub id: AssetId,
    /// Display name (e.g. "Bus Coupler 1").
    pub name: String,
    /// Asset type category (e.g. "Line", "Transformer").
    pub bay_type: String,
    /// Free-text voltage level as recorded in the registry, e.g. `"132kV"`.
    pub voltage_level: String,
}

impl Asset {
    /// Voltage level in kilovolts, parsed from the free-text registry field.
    /// Parse failures yield 0.
    pub fn voltage_kv(&self) -> u32 {
        parse_voltage_kv(&self.voltage_level)
    }

    /// Lowercased bay type, for case-insensitive preference matching.
    pub fn bay_type_lower(&self) -> String {
        self.bay_type.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_parsed_from_free_text() {
        let asset = Asset {
            id: AssetId::new("B1"),
            name: "Feeder 3".to_string(),
            bay_type: "Line".to_string(),
            voltage_level: "220kV".to_string(),
        };
        assert_eq!(asset.voltage_kv(), 220);
        assert_eq!(asset.bay_type_lower(), "line");
    }
}

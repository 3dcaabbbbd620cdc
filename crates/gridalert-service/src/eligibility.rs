//! Preference-based eligibility filtering.
//!
//! Pure decision logic: given a user's preferences and the attributes of
//! one event, decide whether the user has opted into this alert. Whether
//! the user is in the chain of responsibility at all is decided upstream by
//! the recipient resolver.

use gridalert_core::types::event::EventCategory;
use gridalert_core::types::preference::NotificationPreferences;

/// Event attributes relevant to preference matching, computed once per
/// notification cycle.
#[derive(Debug, Clone)]
pub struct EligibilityContext<'a> {
    pub category: EventCategory,
    /// Parsed asset voltage in kV (0 when unparsable).
    pub voltage_kv: u32,
    /// Lowercased asset type category.
    pub bay_type: String,
    pub substation_id: &'a str,
}

/// Whether a hierarchically relevant user has opted into this alert.
///
/// All four gates must pass; evaluation short-circuits on the first
/// failure.
pub fn is_eligible(prefs: &NotificationPreferences, ctx: &EligibilityContext<'_>) -> bool {
    category_gate(prefs, ctx.category)
        && voltage_gate(prefs, ctx.voltage_kv)
        && bay_type_gate(prefs, &ctx.bay_type)
        && substation_gate(prefs, ctx.substation_id)
}

/// The toggle matching the event category must be enabled.
fn category_gate(prefs: &NotificationPreferences, category: EventCategory) -> bool {
    prefs.category_enabled(category)
}

/// The event voltage must reach at least one subscribed threshold.
///
/// An empty effective threshold set fails closed: silence on voltage
/// preference is never treated as "all voltages".
fn voltage_gate(prefs: &NotificationPreferences, voltage_kv: u32) -> bool {
    prefs
        .effective_voltages()
        .any(|threshold| voltage_kv >= threshold)
}

/// Case-insensitive asset-type match, `"all"` as wildcard.
fn bay_type_gate(prefs: &NotificationPreferences, bay_type: &str) -> bool {
    prefs.subscribed_bay_types.iter().any(|subscribed| {
        let subscribed = subscribed.to_lowercase();
        subscribed == "all" || subscribed == bay_type
    })
}

/// Substation subscription match, `"all"` as wildcard.
fn substation_gate(prefs: &NotificationPreferences, substation_id: &str) -> bool {
    prefs
        .subscribed_substations
        .iter()
        .any(|subscribed| subscribed == "all" || subscribed == substation_id)
}

//! Default push-message formatter.
//!
//! Produces the operator-facing title/body text and the opaque data payload
//! surfaced to the mobile client. Timestamps are rendered in IST, the
//! operating timezone of the grid.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

use gridalert_core::traits::formatter::MessageFormatter;
use gridalert_core::types::asset::Asset;
use gridalert_core::types::event::{EventCategory, EventLifecycle, GridEvent};
use gridalert_core::types::message::{AndroidOptions, MessagePriority, PushMessage};

/// IST offset: UTC+05:30.
const IST_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// The standard GridAlert message formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventMessageFormatter;

impl EventMessageFormatter {
    fn title(event: &GridEvent, asset: &Asset, lifecycle: EventLifecycle) -> String {
        match lifecycle {
            EventLifecycle::Closed => {
                format!("✅ {} Restored: {}", event.event_type, asset.name)
            }
            EventLifecycle::Opened => {
                let emoji = match event.event_type {
                    EventCategory::Tripping => "⚡",
                    EventCategory::Shutdown => "🔌",
                    EventCategory::Breakdown => "🛠️",
                };
                format!("{} {}: {}", emoji, event.event_type, asset.name)
            }
        }
    }

    fn body(event: &GridEvent, lifecycle: EventLifecycle) -> String {
        let substation = event
            .substation_name
            .as_deref()
            .unwrap_or("Unknown Substation");
        let flag = event.reason_for_non_feeder.as_deref().unwrap_or("N/A");
        let cause = event
            .flags_cause
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let mut lines = vec![format!("📍 Substation: {substation}")];
        match lifecycle {
            EventLifecycle::Closed => {
                lines.push(format!("🕐 Close Time: {}", format_ist(event.end_time)));
            }
            EventLifecycle::Opened => {
                let label = match event.event_type {
                    EventCategory::Tripping => "Trip Time",
                    _ => "Start Time",
                };
                lines.push(format!("🕐 {label}: {}", format_ist(event.start_time)));
            }
        }
        lines.push(format!("🚩 Flag: {flag}"));
        if let Some(cause) = cause {
            lines.push(format!("❗ Cause: {cause}"));
        }

        if event.event_type == EventCategory::Shutdown {
            if let Some(name) = &event.shutdown_person_name {
                lines.push(format!("👤 Person: {name}"));
            }
            if let Some(designation) = &event.shutdown_person_designation {
                lines.push(format!("💼 Designation: {designation}"));
            }
        }

        match lifecycle {
            EventLifecycle::Closed => {
                if let Some(duration) = event_duration(event.start_time, event.end_time) {
                    lines.push(format!("⏱️ Duration: {duration}"));
                }
            }
            EventLifecycle::Opened => {
                if event.event_type == EventCategory::Tripping {
                    if !event.phase_faults.is_empty() {
                        lines.push(format!("⚡ Phases: {}", event.phase_faults.join(", ")));
                    }
                    if let Some(distance) = &event.distance_km {
                        lines.push(format!("📏 Distance: {distance} km"));
                    }
                    if event.has_auto_reclose == Some(true) {
                        lines.push("🔄 Auto-reclose: Yes".to_string());
                    }
                }
            }
        }

        lines.join("\n")
    }

    fn data(event: &GridEvent, asset: &Asset, lifecycle: EventLifecycle) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();
        data.insert("eventId".into(), event.id.to_string());
        data.insert("eventType".into(), event.event_type.as_str().into());
        data.insert("status".into(), lifecycle.as_str().into());
        data.insert("substationId".into(), event.substation_id.to_string());
        data.insert(
            "substationName".into(),
            event.substation_name.clone().unwrap_or_default(),
        );
        data.insert("bayId".into(), asset.id.to_string());
        data.insert("bayName".into(), asset.name.clone());
        data.insert("bayType".into(), asset.bay_type.clone());
        data.insert("voltageLevel".into(), asset.voltage_level.clone());
        data.insert(
            "startTime".into(),
            event.start_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
        );
        data.insert(
            "endTime".into(),
            event.end_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
        );
        data.insert(
            "flagsCause".into(),
            event.flags_cause.clone().unwrap_or_default(),
        );
        data.insert(
            "reasonForNonFeeder".into(),
            event.reason_for_non_feeder.clone().unwrap_or_default(),
        );
        data.insert(
            "hasAutoReclose".into(),
            event
                .has_auto_reclose
                .map(|b| b.to_string())
                .unwrap_or_default(),
        );
        data.insert(
            "phaseFaults".into(),
            if event.phase_faults.is_empty() {
                String::new()
            } else {
                serde_json::to_string(&event.phase_faults).unwrap_or_default()
            },
        );
        data.insert(
            "distance".into(),
            event.distance_km.clone().unwrap_or_default(),
        );
        data.insert(
            "shutdownType".into(),
            event.shutdown_type.clone().unwrap_or_default(),
        );
        data.insert(
            "shutdownPersonName".into(),
            event.shutdown_person_name.clone().unwrap_or_default(),
        );
        data.insert(
            "shutdownPersonDesignation".into(),
            event.shutdown_person_designation.clone().unwrap_or_default(),
        );
        data.insert("timestamp".into(), Utc::now().to_rfc3339());
        data.insert("click_action".into(), "FLUTTER_NOTIFICATION_CLICK".into());
        data
    }

    fn android(event: &GridEvent, lifecycle: EventLifecycle) -> AndroidOptions {
        AndroidOptions {
            priority: match event.event_type {
                EventCategory::Tripping => MessagePriority::High,
                _ => MessagePriority::Normal,
            },
            channel_id: notification_channel(event.event_type, lifecycle).to_string(),
            color: notification_color(event.event_type, lifecycle).to_string(),
            sound: match event.event_type {
                EventCategory::Tripping => "alert.wav".to_string(),
                _ => "default".to_string(),
            },
        }
    }
}

impl MessageFormatter for EventMessageFormatter {
    fn format(&self, event: &GridEvent, asset: &Asset, lifecycle: EventLifecycle) -> PushMessage {
        PushMessage {
            title: Self::title(event, asset, lifecycle),
            body: Self::body(event, lifecycle),
            data: Self::data(event, asset, lifecycle),
            android: Self::android(event, lifecycle),
        }
    }
}

fn notification_channel(category: EventCategory, lifecycle: EventLifecycle) -> &'static str {
    if lifecycle == EventLifecycle::Closed {
        return "status_update";
    }
    match category {
        EventCategory::Tripping => "emergency",
        EventCategory::Shutdown | EventCategory::Breakdown => "maintenance",
    }
}

fn notification_color(category: EventCategory, lifecycle: EventLifecycle) -> &'static str {
    if lifecycle == EventLifecycle::Closed {
        return "#00C851";
    }
    match category {
        EventCategory::Tripping => "#FF3547",
        EventCategory::Shutdown | EventCategory::Breakdown => "#FF8800",
    }
}

/// Render a timestamp as `"HH:MM, D Mon YYYY"` in IST, or `"N/A"`.
fn format_ist(timestamp: Option<DateTime<Utc>>) -> String {
    let Some(utc) = timestamp else {
        return "N/A".to_string();
    };
    let offset = FixedOffset::east_opt(IST_SECONDS).expect("valid IST offset");
    let local = utc.with_timezone(&offset);
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    format!(
        "{:02}:{:02}, {} {} {}",
        local.hour(),
        local.minute(),
        local.day(),
        MONTHS[local.month0() as usize],
        local.year()
    )
}

/// Elapsed time between the open and close of an event, as `"3h 20m"`.
fn event_duration(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<String> {
    let (start, end) = (start?, end?);
    let minutes = (end - start).num_minutes();
    if minutes < 0 {
        return None;
    }
    if minutes < 60 {
        Some(format!("{minutes}m"))
    } else {
        Some(format!("{}h {}m", minutes / 60, minutes % 60))
    }
}

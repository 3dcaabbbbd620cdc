//! Formatted push message types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Delivery priority of a push message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagePriority {
    Normal,
    High,
}

/// Android-specific presentation options carried alongside a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidOptions {
    pub priority: MessagePriority,
    /// Notification channel id (e.g. "emergency", "maintenance").
    pub channel_id: String,
    /// Accent color, e.g. "#FF3547".
    pub color: String,
    /// Sound resource name.
    pub sound: String,
}

/// A fully formatted push message, ready for the transport.
///
/// Produced by the message-formatter collaborator; the core never inspects
/// the content beyond handing it to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    /// Opaque key/value payload surfaced to the client app.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    pub android: AndroidOptions,
}

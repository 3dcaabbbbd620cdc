//! FCM push transport.
//!
//! Sends are issued per token rather than through the multicast endpoint —
//! one bad token then fails alone instead of poisoning the whole batch.
//! Within a batch the singles run with bounded concurrency.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use gridalert_core::config::delivery::DeliveryConfig;
use gridalert_core::error::AppError;
use gridalert_core::result::AppResult;
use gridalert_core::traits::transport::PushTransport;
use gridalert_core::types::message::{MessagePriority, PushMessage};
use gridalert_core::types::outcome::{SendErrorKind, SendOutcome};

/// FCM HTTP v1 implementation of [`PushTransport`].
#[derive(Debug, Clone)]
pub struct FcmTransport {
    client: reqwest::Client,
    endpoint: String,
    auth_token: String,
    concurrency: usize,
}

impl FcmTransport {
    /// Build a transport from delivery configuration.
    pub fn new(config: &DeliveryConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.send_timeout_seconds))
            .build()
            .map_err(|e| AppError::delivery(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.fcm_endpoint.trim_end_matches('/').to_string(),
            auth_token: config.fcm_auth_token.clone(),
            concurrency: config.send_concurrency.max(1),
        })
    }

    async fn send_one(&self, message: &PushMessage, token: &str) -> SendOutcome {
        let payload = json!({
            "message": {
                "token": token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                },
                "data": message.data,
                "android": {
                    "priority": match message.android.priority {
                        MessagePriority::High => "high",
                        MessagePriority::Normal => "normal",
                    },
                    "notification": {
                        "channel_id": message.android.channel_id,
                        "color": message.android.color,
                        "sound": message.android.sound,
                    },
                },
            }
        });

        let response = self
            .client
            .post(format!("{}/messages:send", self.endpoint))
            .bearer_auth(&self.auth_token)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => SendOutcome::Delivered,
            Ok(resp) => {
                let status = resp.status();
                let body = resp.json::<serde_json::Value>().await.ok();
                let kind = classify_error(status, body.as_ref());
                debug!(status = %status, error = %kind, "FCM send rejected");
                SendOutcome::Failed(kind)
            }
            Err(e) => {
                debug!(error = %e, "FCM send failed to complete");
                SendOutcome::Failed(SendErrorKind::Unavailable)
            }
        }
    }
}

#[async_trait]
impl PushTransport for FcmTransport {
    async fn send_batch(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> AppResult<Vec<(String, SendOutcome)>> {
        let outcomes = stream::iter(tokens.iter().cloned())
            .map(|token| async move {
                let outcome = self.send_one(message, &token).await;
                (token, outcome)
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;
        Ok(outcomes)
    }
}

/// Map an FCM error response to the delivery error taxonomy.
///
/// The v1 API reports the permanent classes as `UNREGISTERED` (the
/// registration is gone) and `INVALID_ARGUMENT` (the token is malformed).
fn classify_error(status: StatusCode, body: Option<&serde_json::Value>) -> SendErrorKind {
    if let Some(code) = body.and_then(fcm_error_code) {
        match code {
            "UNREGISTERED" => return SendErrorKind::Unregistered,
            "INVALID_ARGUMENT" => return SendErrorKind::InvalidToken,
            "QUOTA_EXCEEDED" => return SendErrorKind::QuotaExceeded,
            "UNAVAILABLE" => return SendErrorKind::Unavailable,
            _ => {}
        }
    }

    match status {
        StatusCode::NOT_FOUND => SendErrorKind::Unregistered,
        StatusCode::BAD_REQUEST => SendErrorKind::InvalidToken,
        StatusCode::TOO_MANY_REQUESTS => SendErrorKind::QuotaExceeded,
        s if s.is_server_error() => SendErrorKind::Unavailable,
        _ => SendErrorKind::Internal,
    }
}

/// Extract the most specific error code from an FCM error body.
fn fcm_error_code(body: &serde_json::Value) -> Option<&str> {
    let error = body.get("error")?;
    if let Some(details) = error.get("details").and_then(|d| d.as_array()) {
        for detail in details {
            if let Some(code) = detail.get("errorCode").and_then(|c| c.as_str()) {
                return Some(code);
            }
        }
    }
    error.get("status").and_then(|s| s.as_str())
}

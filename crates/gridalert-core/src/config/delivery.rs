//! Push delivery configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the push transport and the batch dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// FCM project send endpoint, e.g.
    /// `https://fcm.googleapis.com/v1/projects/my-project`.
    pub fcm_endpoint: String,
    /// OAuth bearer token used to authorize sends. Supplied by the
    /// deployment environment; rotation is outside this service.
    pub fcm_auth_token: String,
    /// Maximum tokens per dispatch batch.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Concurrent in-flight sends within one batch.
    #[serde(default = "default_send_concurrency")]
    pub send_concurrency: usize,
    /// Per-send request timeout in seconds.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_seconds: u64,
}

fn default_max_batch_size() -> usize {
    500
}

fn default_send_concurrency() -> usize {
    32
}

fn default_send_timeout() -> u64 {
    10
}

//! Push-delivery transport trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::message::PushMessage;
use crate::types::outcome::SendOutcome;

/// The external push-delivery capability.
///
/// One call covers at most one dispatcher batch. The transport reports a
/// per-token outcome rather than failing the whole batch: a token-level
/// failure is data, not an error.
#[async_trait]
pub trait PushTransport: Send + Sync + 'static {
    /// Send `message` to every token, returning one classified outcome per
    /// token in the same order.
    async fn send_batch(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> AppResult<Vec<(String, SendOutcome)>>;
}

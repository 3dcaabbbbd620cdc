//! Batched, isolated push dispatch.

use std::sync::Arc;

use tracing::{info, warn};

use gridalert_core::traits::transport::PushTransport;
use gridalert_core::types::message::PushMessage;
use gridalert_core::types::outcome::{DeliveryReport, SendErrorKind, SendOutcome};

use crate::invalidator::TokenInvalidator;

/// Partitions tokens into bounded batches and dispatches them concurrently.
///
/// Each batch runs in its own task: a failing or stuck batch never prevents
/// its siblings from completing, and a whole-batch transport error becomes
/// a per-token transient failure rather than aborting the cycle.
pub struct DeliveryDispatcher {
    transport: Arc<dyn PushTransport>,
    invalidator: Arc<TokenInvalidator>,
    max_batch_size: usize,
}

impl std::fmt::Debug for DeliveryDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryDispatcher")
            .field("max_batch_size", &self.max_batch_size)
            .finish_non_exhaustive()
    }
}

impl DeliveryDispatcher {
    /// Create a new dispatcher.
    pub fn new(
        transport: Arc<dyn PushTransport>,
        invalidator: Arc<TokenInvalidator>,
        max_batch_size: usize,
    ) -> Self {
        Self {
            transport,
            invalidator,
            max_batch_size: max_batch_size.max(1),
        }
    }

    /// Deliver `message` to every token and aggregate the outcomes.
    ///
    /// Permanent per-token failures are forwarded to the invalidator;
    /// transient ones are logged and left to self-correct on the next event.
    pub async fn deliver(&self, message: &PushMessage, tokens: Vec<String>) -> DeliveryReport {
        if tokens.is_empty() {
            return DeliveryReport::default();
        }

        let mut handles = Vec::new();
        for batch in tokens.chunks(self.max_batch_size) {
            let transport = Arc::clone(&self.transport);
            let message = message.clone();
            let batch = batch.to_vec();
            let fallback = batch.clone();
            let handle = tokio::spawn(async move {
                match transport.send_batch(&message, &batch).await {
                    Ok(outcomes) => collect_outcomes(outcomes),
                    Err(e) => {
                        warn!(error = %e, size = batch.len(), "Batch send failed");
                        DeliveryReport {
                            succeeded: 0,
                            failed: batch
                                .into_iter()
                                .map(|t| (t, SendErrorKind::Unavailable))
                                .collect(),
                        }
                    }
                }
            });
            handles.push((handle, fallback));
        }

        let mut report = DeliveryReport::default();
        for (handle, fallback) in handles {
            match handle.await {
                Ok(batch_report) => report.merge(batch_report),
                Err(e) => {
                    // A panicked batch task counts as transient failure for
                    // its tokens and leaves the other batches untouched.
                    warn!(error = %e, "Batch task aborted");
                    report.merge(DeliveryReport {
                        succeeded: 0,
                        failed: fallback
                            .into_iter()
                            .map(|t| (t, SendErrorKind::Internal))
                            .collect(),
                    });
                }
            }
        }

        let permanent: Vec<String> = report
            .failed
            .iter()
            .filter(|(_, kind)| kind.is_permanent())
            .map(|(token, _)| token.clone())
            .collect();
        if !permanent.is_empty() {
            let _ = self.invalidator.invalidate(permanent);
        }
        for (token, kind) in report.failed.iter().filter(|(_, k)| !k.is_permanent()) {
            warn!(token = %truncate(token), error = %kind, "Transient delivery failure");
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "Delivery cycle complete"
        );
        report
    }
}

fn collect_outcomes(outcomes: Vec<(String, SendOutcome)>) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    for (token, outcome) in outcomes {
        match outcome {
            SendOutcome::Delivered => report.succeeded += 1,
            SendOutcome::Failed(kind) => report.failed.push((token, kind)),
        }
    }
    report
}

/// Log-safe token prefix.
fn truncate(token: &str) -> &str {
    &token[..token.len().min(20)]
}

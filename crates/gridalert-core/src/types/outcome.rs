//! Per-token delivery outcomes and aggregated reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classified delivery failure for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SendErrorKind {
    /// The device registration is gone and will never succeed again.
    Unregistered,
    /// The token itself is malformed or no longer valid.
    InvalidToken,
    /// The transport rejected the send due to quota limits.
    QuotaExceeded,
    /// The transport was temporarily unreachable or overloaded.
    Unavailable,
    /// Any other transport-side failure.
    Internal,
}

impl SendErrorKind {
    /// Whether this failure proves the token permanently undeliverable.
    ///
    /// Only permanent failures may mutate the recipient registry; everything
    /// else is expected to self-correct on the next event.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Unregistered | Self::InvalidToken)
    }
}

impl fmt::Display for SendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unregistered => write!(f, "registration-not-found"),
            Self::InvalidToken => write!(f, "invalid-registration-token"),
            Self::QuotaExceeded => write!(f, "quota-exceeded"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Outcome of sending one message to one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    Failed(SendErrorKind),
}

/// Aggregated result of one delivery cycle across all batches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Number of tokens delivered successfully.
    pub succeeded: usize,
    /// Failed tokens with their classified error.
    pub failed: Vec<(String, SendErrorKind)>,
}

impl DeliveryReport {
    /// Total number of tokens attempted.
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: DeliveryReport) {
        self.succeeded += other.succeeded;
        self.failed.extend(other.failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence_classification() {
        assert!(SendErrorKind::Unregistered.is_permanent());
        assert!(SendErrorKind::InvalidToken.is_permanent());
        assert!(!SendErrorKind::QuotaExceeded.is_permanent());
        assert!(!SendErrorKind::Unavailable.is_permanent());
        assert!(!SendErrorKind::Internal.is_permanent());
    }

    #[test]
    fn report_merge() {
        let mut a = DeliveryReport {
            succeeded: 2,
            failed: vec![("t1".into(), SendErrorKind::Unavailable)],
        };
        a.merge(DeliveryReport {
            succeeded: 1,
            failed: vec![("t2".into(), SendErrorKind::Unregistered)],
        });
        assert_eq!(a.succeeded, 3);
        assert_eq!(a.attempted(), 5);
    }
}

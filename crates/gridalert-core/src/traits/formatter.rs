//! Message-formatter collaborator trait.

use crate::types::asset::Asset;
use crate::types::event::{EventLifecycle, GridEvent};
use crate::types::message::PushMessage;

/// Turns an event record into human-readable push content.
///
/// A pure function of its inputs; the engine treats the produced title,
/// body, and data payload as opaque.
pub trait MessageFormatter: Send + Sync + 'static {
    /// Format the message for one notification cycle.
    fn format(&self, event: &GridEvent, asset: &Asset, lifecycle: EventLifecycle) -> PushMessage;
}

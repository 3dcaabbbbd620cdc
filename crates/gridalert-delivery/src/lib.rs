//! # gridalert-delivery
//!
//! The outbound half of the notification engine: partitions resolved device
//! tokens into bounded batches, dispatches them concurrently through the
//! push transport, aggregates per-token outcomes, and cleans up tokens the
//! transport proves permanently invalid.

pub mod dispatcher;
pub mod fcm;
pub mod formatter;
pub mod invalidator;

pub use dispatcher::DeliveryDispatcher;
pub use fcm::FcmTransport;
pub use formatter::EventMessageFormatter;
pub use invalidator::TokenInvalidator;

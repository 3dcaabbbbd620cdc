//! Collaborator traits at the system seams.
//!
//! Everything the notification engine consumes from the outside world —
//! registries, stores, the push transport, and the message formatter — is
//! injected through these traits so the engine can be tested with
//! deterministic in-memory implementations.

pub mod formatter;
pub mod repository;
pub mod transport;

pub use formatter::MessageFormatter;
pub use repository::{
    AssetRepository, OrgRepository, PreferenceStore, TokenStore, UserRepository,
};
pub use transport::PushTransport;

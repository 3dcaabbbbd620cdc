//! Domain types for the GridAlert notification engine.

pub mod asset;
pub mod event;
pub mod hierarchy;
pub mod id;
pub mod message;
pub mod outcome;
pub mod preference;
pub mod role;
pub mod token;
pub mod user;
pub mod voltage;

pub use asset::Asset;
pub use event::{EventCategory, EventLifecycle, EventStatus, GridEvent};
pub use hierarchy::ResolvedHierarchy;
pub use message::PushMessage;
pub use outcome::{DeliveryReport, SendErrorKind, SendOutcome};
pub use preference::NotificationPreferences;
pub use role::{HierarchyLevel, UserRole};
pub use token::DeviceToken;
pub use user::User;

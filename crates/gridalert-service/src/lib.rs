//! # gridalert-service
//!
//! The inbound half of the notification engine: resolves which device
//! tokens should receive a grid-event alert (hierarchy traversal plus
//! preference filtering) and orchestrates one notification cycle per event
//! lifecycle transition.

pub mod eligibility;
pub mod hierarchy;
pub mod pipeline;
pub mod recipient;

pub use hierarchy::OrgHierarchyResolver;
pub use pipeline::NotificationPipeline;
pub use recipient::RecipientResolver;

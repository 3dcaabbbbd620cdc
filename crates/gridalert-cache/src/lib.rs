//! # gridalert-cache
//!
//! TTL-bounded, in-memory snapshot of all user notification preferences and
//! all active device tokens. A refresh replaces the whole snapshot
//! atomically; readers never observe old preferences mixed with new tokens.

pub mod clock;
pub mod preference;

pub use clock::{Clock, SystemClock};
pub use preference::PreferenceCache;

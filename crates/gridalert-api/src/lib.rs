//! # gridalert-api
//!
//! HTTP ingestion layer built on Axum.
//!
//! Exposes the event webhooks that drive the notification pipeline plus a
//! health endpoint, and wires the full application together in
//! [`app::run_server`].

pub mod app;
pub mod dto;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::run_server;
pub use router::build_router;
pub use state::AppState;

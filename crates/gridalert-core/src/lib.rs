//! # gridalert-core
//!
//! Core crate for GridAlert. Contains the domain model (grid events, assets,
//! the organizational hierarchy, users, notification preferences, device
//! tokens), collaborator traits for the injected repositories and the push
//! transport, configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other GridAlert crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

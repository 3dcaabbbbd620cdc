//! # gridalert-database
//!
//! PostgreSQL-backed implementations of the repository traits defined in
//! `gridalert-core`. Row-to-domain mapping is done by hand so the core
//! crate stays free of sqlx.

pub mod connection;
pub mod migration;
pub mod repositories;

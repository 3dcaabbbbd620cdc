//! Request and response DTOs for the webhook API.

pub mod request;
pub mod response;

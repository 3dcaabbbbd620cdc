//! Application state shared across all handlers.

use std::sync::Arc;

use gridalert_service::NotificationPipeline;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Per-event notification orchestrator.
    pub pipeline: Arc<NotificationPipeline>,
}

//! Application builder — wires repositories, cache, delivery, and the
//! pipeline into an Axum app and runs it.

use std::sync::Arc;

use tracing::{info, warn};

use gridalert_cache::{PreferenceCache, SystemClock};
use gridalert_core::config::AppConfig;
use gridalert_core::error::AppError;
use gridalert_core::traits::formatter::MessageFormatter;
use gridalert_core::traits::repository::{PreferenceStore, TokenStore};
use gridalert_core::traits::transport::PushTransport;
use gridalert_database::connection::DatabasePool;
use gridalert_database::repositories::{
    PgAssetRepository, PgOrgRepository, PgPreferenceStore, PgTokenStore, PgUserRepository,
};
use gridalert_delivery::{
    DeliveryDispatcher, EventMessageFormatter, FcmTransport, TokenInvalidator,
};
use gridalert_service::{NotificationPipeline, OrgHierarchyResolver, RecipientResolver};

use crate::router::build_router;
use crate::state::AppState;

/// Runs the GridAlert server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    let pool = db.pool().clone();

    let asset_repo = Arc::new(PgAssetRepository::new(pool.clone()));
    let org_repo = Arc::new(PgOrgRepository::new(pool.clone()));
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let preference_store: Arc<dyn PreferenceStore> =
        Arc::new(PgPreferenceStore::new(pool.clone()));
    let token_store: Arc<dyn TokenStore> = Arc::new(PgTokenStore::new(pool.clone()));

    let cache = Arc::new(PreferenceCache::new(
        Arc::clone(&preference_store),
        Arc::clone(&token_store),
        config.defaults.to_preferences(),
        config.cache.ttl(),
        Arc::new(SystemClock),
    ));
    // Warm the snapshot up front; the first event refreshes anyway if this
    // fails.
    if let Err(e) = cache.refresh().await {
        warn!(error = %e, "Initial preference snapshot load failed");
    }

    let transport: Arc<dyn PushTransport> = Arc::new(FcmTransport::new(&config.delivery)?);
    let invalidator = Arc::new(TokenInvalidator::new(
        Arc::clone(&cache),
        Arc::clone(&token_store),
    ));
    let dispatcher = Arc::new(DeliveryDispatcher::new(
        transport,
        invalidator,
        config.delivery.max_batch_size,
    ));
    let formatter: Arc<dyn MessageFormatter> = Arc::new(EventMessageFormatter);

    let resolver = RecipientResolver::new(
        OrgHierarchyResolver::new(org_repo),
        user_repo,
        Arc::clone(&preference_store),
        cache,
    );
    let pipeline = Arc::new(NotificationPipeline::new(
        asset_repo, resolver, dispatcher, formatter,
    ));

    let app = build_router(AppState { pipeline });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "GridAlert server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    info!("Shutdown signal received");
}

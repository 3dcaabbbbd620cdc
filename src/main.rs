//! GridAlert server — grid-event push notification engine.
//!
//! Main entry point: loads configuration, initializes logging, connects to
//! PostgreSQL, runs migrations, and hands off to the API layer.

use tracing_subscriber::{EnvFilter, fmt};

use gridalert_core::config::AppConfig;
use gridalert_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration for the environment named by `GRIDALERT_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("GRIDALERT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting GridAlert v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db = gridalert_database::connection::DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    gridalert_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    gridalert_api::run_server(config, db).await
}

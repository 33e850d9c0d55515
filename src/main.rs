//! StayHub Server — short-stay unit lifecycle engine.
//!
//! Main entry point that wires all crates together and starts the
//! background scheduler.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{fmt, EnvFilter};

use stayhub_core::clock::{Clock, SystemClock};
use stayhub_core::config::AppConfig;
use stayhub_core::error::AppError;
use stayhub_service::store::{CheckinStore, UnitStore};
use stayhub_service::{
    AuditSink, CheckinService, ReconciliationService, TracingAuditSink, UnitStatusProjector,
};
use stayhub_worker::jobs::TickHandler;
use stayhub_worker::{
    AutoCheckoutHandler, CleaningCompletionHandler, CronScheduler, ReconciliationHandler,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("STAYHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
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

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting StayHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = stayhub_database::connection::create_pool(&config.database).await?;
    stayhub_database::connection::health_check(&db_pool).await?;

    tracing::info!("Running database migrations...");
    stayhub_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Repositories and stores ──────────────────────────
    let unit_repo = Arc::new(stayhub_database::repositories::unit::UnitRepository::new(
        db_pool.clone(),
    ));
    let checkin_repo = Arc::new(
        stayhub_database::repositories::checkin::CheckinRepository::new(db_pool.clone()),
    );
    let units: Arc<dyn UnitStore> = unit_repo;
    let checkins: Arc<dyn CheckinStore> = checkin_repo;

    // ── Step 3: Services ─────────────────────────────────────────
    tracing::info!("Initializing services...");
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let audit: Arc<dyn AuditSink> = Arc::new(TracingAuditSink);

    let projector = Arc::new(UnitStatusProjector::new(
        Arc::clone(&units),
        Arc::clone(&clock),
        Arc::clone(&audit),
    ));
    let checkin_service = Arc::new(CheckinService::new(
        Arc::clone(&checkins),
        Arc::clone(&units),
        Arc::clone(&projector),
        Arc::clone(&clock),
        Arc::clone(&audit),
    ));
    let reconciliation_service = Arc::new(ReconciliationService::new(
        Arc::clone(&units),
        Arc::clone(&checkins),
        Arc::clone(&projector),
        config.reconciliation.clone(),
        Arc::clone(&clock),
    ));
    tracing::info!("Services initialized");

    // ── Step 4: Start background scheduler ───────────────────────
    let scheduler = if config.scheduler.enabled {
        tracing::info!("Starting background scheduler...");

        let checkout_handler: Arc<dyn TickHandler> = Arc::new(AutoCheckoutHandler::new(
            Arc::clone(&checkins),
            Arc::clone(&checkin_service),
            Arc::clone(&clock),
        ));
        let cleaning_handler: Arc<dyn TickHandler> = Arc::new(CleaningCompletionHandler::new(
            Arc::clone(&units),
            Arc::clone(&projector),
            config.cleaning.clone(),
            Arc::clone(&clock),
        ));
        let reconciliation_handler: Arc<dyn TickHandler> = Arc::new(ReconciliationHandler::new(
            Arc::clone(&reconciliation_service),
        ));

        let scheduler = CronScheduler::new(config.scheduler.clone()).await?;
        scheduler
            .register_default_tasks(checkout_handler, cleaning_handler, reconciliation_handler)
            .await?;
        scheduler.start().await?;

        tracing::info!("Background scheduler started");
        Some(scheduler)
    } else {
        tracing::info!("Background scheduler disabled");
        None
    };

    tracing::info!("StayHub running; press Ctrl+C to stop");

    // ── Step 5: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");

    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    db_pool.close().await;

    tracing::info!("StayHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

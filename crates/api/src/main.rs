use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use domain::store::Store;
use persistence::{MemoryStore, PgStore, ThemeChangeListener};
use tracing::{info, warn};

use site_api::app::{create_app, AppState};
use site_api::config::{Config, StoreBackend};
use site_api::jobs::{JobScheduler, PoolMetricsJob, RateLimitSweepJob, ThemeResyncJob};
use site_api::middleware::{self, init_metrics};
use site_api::theme_hub::ThemeHub;

/// How long background tasks get to finish after the server stops.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    middleware::logging::init_logging(&config.logging);
    init_metrics().context("Failed to install Prometheus recorder")?;

    info!("Starting studio site API v{}", env!("CARGO_PKG_VERSION"));

    let pg_store = match config.store.backend {
        StoreBackend::Postgres => {
            let db_config = persistence::db::DatabaseConfig::from(&config.database);
            let pool = persistence::db::create_pool(&db_config)
                .await
                .context("Failed to connect to the external store")?;
            Some(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            None
        }
    };
    let store: Arc<dyn Store> = match &pg_store {
        Some(pg_store) => pg_store.clone(),
        None => Arc::new(MemoryStore::new()),
    };

    let hub = Arc::new(
        ThemeHub::load(store.clone())
            .await
            .context("Failed to load theme settings")?,
    );

    let mut scheduler = JobScheduler::new();
    if let Some(pg_store) = pg_store {
        scheduler.register(PoolMetricsJob::new(pg_store.clone()));

        let listener_hub = hub.clone();
        let listener =
            ThemeChangeListener::new(pg_store.pool().clone(), config.store.realtime_channel.clone())
                .on_change(move |_payload| {
                    let hub = listener_hub.clone();
                    async move {
                        if let Err(e) = hub.reload().await {
                            warn!(error = %e, "Failed to reload theme after notification");
                        }
                    }
                });
        let shutdown = scheduler.shutdown_signal();
        scheduler.spawn_task(listener.run(shutdown));
    }

    serve(config, store, hub, scheduler).await
}

async fn serve(
    config: Config,
    store: Arc<dyn Store>,
    hub: Arc<ThemeHub>,
    mut scheduler: JobScheduler,
) -> Result<()> {
    let addr = config.socket_addr().context("Invalid server address")?;

    let state = AppState::new(config, store, hub.clone())?;
    scheduler.register(RateLimitSweepJob::new(state.rate_limiter.clone()));
    scheduler.register(ThemeResyncJob::new(hub));
    scheduler.start();

    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(SHUTDOWN_TIMEOUT).await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

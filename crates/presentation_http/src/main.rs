//! METAR HTTP Server
//!
//! Main entry point: loads configuration, wires the store, feed and
//! services together, schedules the refresh and serves the API.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{MetarIngestionService, MetarService};
use infrastructure::{
    AppConfig, MetarFeedAdapter, SchedulerConfig, ServerConfig, TaskScheduler,
    build_product_store,
    scheduled_tasks::{METAR_REFRESH_TASK, create_metar_refresh_task},
};
use presentation_http::{create_router, state::AppState, with_middleware};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "info,metar_server=debug,presentation_http=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration comes first so the log format can follow it
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(&config.server);

    info!("METAR server v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    config.validate().context("Invalid configuration")?;

    info!(
        host = %config.server.host,
        port = %config.server.port,
        cache = ?config.cache.backend,
        group = %config.stations.group_name,
        "Configuration loaded"
    );

    // Store and upstream feed
    let store = build_product_store(&config.cache).context("Failed to open weather product store")?;
    let feed = MetarFeedAdapter::new(config.upstream.clone())
        .context("Failed to initialize METAR feed client")?;
    let catalog = config.stations.catalog().context("Invalid station catalog")?;

    // Services
    let metar_service = Arc::new(MetarService::new(Arc::clone(&store), catalog));
    let ingestion = Arc::new(MetarIngestionService::new(Arc::new(feed), store));

    if config.refresh.run_on_startup {
        let startup = Arc::clone(&ingestion);
        tokio::spawn(async move {
            let outcome = startup.refresh().await;
            info!(?outcome, "Startup METAR refresh finished");
        });
    }

    let scheduler = if config.refresh.enabled {
        let scheduler = TaskScheduler::new(SchedulerConfig::default())
            .await
            .context("Failed to start task scheduler")?;
        scheduler
            .add_task(
                METAR_REFRESH_TASK,
                &config.refresh.cron,
                create_metar_refresh_task(Arc::clone(&ingestion)),
            )
            .await
            .context("Failed to schedule METAR refresh")?;
        Some(scheduler)
    } else {
        info!("Scheduled METAR refresh is disabled");
        None
    };

    let state = AppState {
        metar_service,
        ingestion,
    };
    let app = with_middleware(create_router(state), &config.server);

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler {
        for stats in scheduler.get_all_stats() {
            info!(
                task = %stats.name,
                success = stats.success_count,
                failure = stats.failure_count,
                avg_duration_ms = stats.avg_duration_ms,
                "Scheduled task summary"
            );
        }
        match tokio::time::timeout(shutdown_timeout, scheduler.stop()).await {
            Ok(Ok(())) => {},
            Ok(Err(e)) => warn!(error = %e, "Failed to stop task scheduler"),
            Err(_) => warn!(?shutdown_timeout, "Timed out stopping task scheduler"),
        }
    }

    info!("Server shutdown complete");

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` overrides the default filter
fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = server.json_logs();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

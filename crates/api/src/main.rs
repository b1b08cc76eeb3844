use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use storehub_cloud::{MemoryStore, ObjectStore, S3Config, S3Store};
use storehub_events::{EmailConfig, EmailDelivery, EventBus, OrderMailer};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storehub_api::background::promotion_expiry;
use storehub_api::bootstrap::ensure_admin;
use storehub_api::config::ServerConfig;
use storehub_api::router::build_app_router;
use storehub_api::state::AppState;

/// Timeout applied to outbound HTTP calls (reCAPTCHA).
const HTTP_CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long background tasks get to finish after shutdown is requested.
const TASK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storehub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = storehub_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    storehub_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    storehub_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    ensure_admin(&pool, config.admin.as_ref()).await?;

    // --- Object storage ---
    let storage: Arc<dyn ObjectStore> = match S3Config::from_env() {
        Some(s3) => {
            tracing::info!(bucket = %s3.bucket, region = %s3.region, "Using S3 object storage");
            Arc::new(S3Store::connect(s3).await)
        }
        None => {
            tracing::warn!("S3 not configured, uploads are kept in memory only");
            Arc::new(MemoryStore::default())
        }
    };

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let cancel = CancellationToken::new();
    let mut tasks = Vec::new();

    match EmailConfig::from_env() {
        Some(email) => {
            let mailer = OrderMailer::new(pool.clone(), EmailDelivery::new(email));
            tasks.push(tokio::spawn(mailer.run(event_bus.subscribe(), cancel.clone())));
            tracing::info!("Order mailer started");
        }
        None => tracing::info!("SMTP_HOST not set, order emails disabled"),
    }

    // --- Promotion expiry sweep ---
    tasks.push(tokio::spawn(promotion_expiry::run(
        pool.clone(),
        Duration::from_secs(config.promotion_sweep_interval_secs),
        cancel.clone(),
    )));

    // --- App state ---
    let http = reqwest::Client::builder()
        .timeout(HTTP_CLIENT_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
        event_bus: Arc::clone(&event_bus),
        http,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    for task in tasks {
        if tokio::time::timeout(TASK_SHUTDOWN_TIMEOUT, task).await.is_err() {
            tracing::warn!("Background task did not stop in time");
        }
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

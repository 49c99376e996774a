//! Hookah Catalog backend entry point
//!
//! Startup order: env + tracing, config, database pool and migrations,
//! shared state (pre-computed token keys), upload area, router, serve
//! with graceful shutdown.

use anyhow::{bail, Context, Result};
use hookah_backend::{config::AppConfig, db, routes, state::AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let production = AppConfig::is_production();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if production { "production" } else { "development" },
        "Starting hookah catalog backend"
    );

    if production {
        check_production_secrets(&config)?;
    }

    let pool = db::create_pool(&config.database).await?;
    if !production {
        // Production applies migrations from a separate job
        db::run_migrations(&pool).await?;
    }

    let state = AppState::new(pool, config.clone());
    // The upload area must exist before the first multipart request
    state.storage().ensure_dirs().await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(address = %addr, "Listening");

    axum::serve(listener, routes::create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing() {
    let default_filter = if AppConfig::is_production() {
        "hookah_backend=info,tower_http=info"
    } else {
        "hookah_backend=debug,tower_http=debug,sqlx=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if AppConfig::is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// A default or short signing secret must never reach production.
fn check_production_secrets(config: &AppConfig) -> Result<()> {
    if config.token.secret.len() < 32 || config.token.secret.contains("development") {
        bail!("token.secret must be at least 32 characters and not a development value");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tripline::{
    AppConfig, AppState, build_router,
    auth::ensure_admin,
    radar::spawn_sweeper,
    storage::{InMemoryRepository, Repository},
};

/// Travel logging backend
#[derive(Debug, Parser)]
#[command(name = "tripline", version, about)]
struct Cli {
    /// Bind host, overrides APP_HOST
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides APP_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("failed to load application configuration")?;
    if let Some(host) = cli.host.as_deref() {
        config = config.host(host);
    }
    if let Some(port) = cli.port {
        config = config.port(port);
    }

    let repo: Arc<dyn Repository> = Arc::new(InMemoryRepository::new());
    let state = AppState::from_config(&config, Arc::clone(&repo))
        .context("failed to build application state")?;

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        ensure_admin(repo.as_ref(), &state.auth, username, password)
            .await
            .context("failed to create bootstrap admin account")?;
    }

    let sweeper = config.radar.sweep_interval.map(|interval| {
        info!(interval_secs = interval.as_secs(), "radar timer sweep enabled");
        spawn_sweeper(Arc::clone(&state.radar), interval)
    });

    let app = build_router(state);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        address = %addr,
        radius_km = config.radar.radius_km,
        ttl_secs = config.radar.ttl.as_secs(),
        "tripline started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tripline=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

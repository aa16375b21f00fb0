use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;

use crate::server::{
    config::Config,
    error::Error,
    model::app::AppState,
    router,
    scheduler::Scheduler,
    util::time::{SharedClock, SystemClock},
};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "leverdag=info";

/// Initialize tracing with an env filter read from `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();
}

/// Build the shared application state on the system clock
pub fn build_state(config: Config) -> Result<AppState, Error> {
    let clock: SharedClock = Arc::new(SystemClock);

    AppState::new(config, clock)
}

/// Start background jobs, bind the listener and serve until ctrl-c
pub async fn run(config: Config) -> Result<(), Error> {
    let address = config.bind_address();

    if config.flags.enable_mock_mode {
        tracing::warn!("Mock mode enabled, the delivery date API will not be contacted");
    }

    let state = build_state(config)?;

    let mut scheduler = Scheduler::new(state.rate_limiters.clone())
        .await?
        .start()
        .await?;

    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        router::routes(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.shutdown().await?;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received");
}

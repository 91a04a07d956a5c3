//! TicketBoss Server: event seat reservations under optimistic concurrency control.
//!
//! Main entry point that wires all crates together and starts the server.

use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use ticketboss_core::config::AppConfig;
use ticketboss_core::error::AppError;
use ticketboss_core::types::EventId;
use ticketboss_database::store::{InventoryStore, StoreManager};
use ticketboss_entity::event::NewEvent;

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

/// Load layered configuration for the environment named by `TICKETBOSS_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TICKETBOSS_ENV").unwrap_or_else(|_| "development".to_string());
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
    tracing::info!("Starting TicketBoss v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Open the inventory store ─────────────────────────
    tracing::info!("Opening inventory store (provider: {})...", config.store.provider);
    let store = StoreManager::connect(&config).await?;

    // ── Step 2: Seed the event inventory ─────────────────────────
    seed_event(&store, &config).await?;

    // ── Step 3: Build application state and router ───────────────
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app_state = ticketboss_api::AppState::new(config, store);
    let app = ticketboss_api::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("TicketBoss server listening on {}", addr);

    // ── Step 4: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    let drain_deadline = async move {
        if shutdown_rx.wait_for(|stopping| *stopping).await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = drain_deadline => {
            tracing::warn!(
                grace_seconds = grace.as_secs(),
                "Requests still in flight after grace period, forcing shutdown"
            );
        }
    }

    tracing::info!("TicketBoss server shut down gracefully");
    Ok(())
}

/// Insert the configured event unless it already exists.
async fn seed_event(store: &StoreManager, config: &AppConfig) -> Result<(), AppError> {
    let event_id = EventId::new(config.event.id.clone());
    let inserted = store
        .seed_event(&NewEvent {
            event_id: event_id.clone(),
            name: config.event.name.clone(),
            total_seats: config.event.total_seats,
        })
        .await?;

    if inserted {
        tracing::info!(
            event_id = %event_id,
            total_seats = config.event.total_seats,
            "Seeded event inventory"
        );
        return Ok(());
    }

    match store.find_event(&event_id).await? {
        Some(existing) => {
            if existing.total_seats != config.event.total_seats {
                tracing::warn!(
                    event_id = %event_id,
                    stored_total = existing.total_seats,
                    configured_total = config.event.total_seats,
                    "Configured capacity differs from stored event; keeping stored inventory"
                );
            }
            tracing::info!(
                event_id = %event_id,
                available_seats = existing.available_seats,
                reserved_seats = existing.reserved_seats(),
                version = existing.version,
                "Event already exists, inventory left untouched"
            );
            Ok(())
        }
        None => Err(AppError::internal(format!(
            "Event {event_id} neither inserted nor found"
        ))),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}

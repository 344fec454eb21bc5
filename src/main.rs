//! `coworkerd`: local-first filesystem coworker server.
//!
//! Bootstraps the CP Store, spawns the worker pool, and serves the API
//! Gateway on the loopback interface. Exit codes: `0` clean shutdown, `1`
//! bind failure, `2` store-open failure.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use coworkerd::audit::AuditLog;
use coworkerd::config::Config;
use coworkerd::gateway::AppState;
use coworkerd::store::{CpStore, SqliteStore};
use coworkerd::{gateway, worker};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_level)
                .unwrap_or_else(|_| "coworkerd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "invalid host/port");
            return ExitCode::from(1);
        }
    };

    tracing::info!(store = %config.store.display(), "opening CP Store");
    let store: Arc<dyn CpStore> = match SqliteStore::open(&config.store).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(error = %e, "failed to open store");
            return ExitCode::from(2);
        }
    };

    let audit = AuditLog::new();

    tracing::info!(workers = config.workers, lease_ms = config.lease_ms, "spawning worker pool");
    let _workers = worker::spawn_pool(config.workers, store.clone(), audit.clone(), config.lease_ms);

    let app_state = AppState { store, audit };
    let app = gateway::router(app_state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            return ExitCode::from(1);
        }
    };

    tracing::info!(%addr, "coworkerd listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

//! # storefront-rs
//!
//! Session-gated storefront API serving pricing plans and order history.
//!
//! Authenticated users read their own orders (items, plans, and the latest
//! invoices); admin users read the full pricing-plan catalog.
//!
//! ## Architecture
//!
//! - **Store**: SQLite via sqlx, migrations applied at startup
//! - **Sessions**: in-process token store with TTL, issued as an HTTP-only cookie
//! - **Auth**: argon2id password hashes; bootstrap users loaded from a TOML file
//! - **HTTP**: Axum router with rate limiting, request IDs, and graceful shutdown

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

mod auth;
mod config;
mod db;
mod http;
mod models;

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use axum::serve;
use clap::Parser;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Cli};
use crate::http::{router, AppState, SessionStore};

const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging().context("failed to initialize logging")?;

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli).context("failed to load configuration")?;

    let pool = db::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    db::migrate(&pool)
        .await
        .context("failed to run database migrations")?;
    seed_bootstrap_users(&pool, config.users_file.as_deref()).await?;

    info!(
        bind = %config.bind,
        database = %config.database_url,
        users_file = ?config.users_file.as_ref().map(|path| path.display().to_string()),
        session_ttl_hours = config.session_ttl_hours,
        "configuration loaded"
    );

    let state = AppState {
        pool,
        sessions: SessionStore::new(config.session_ttl_hours),
    };
    spawn_session_pruner(state.sessions.clone(), SESSION_PRUNE_INTERVAL);

    let app = router(state);
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    let shutdown = tokio::signal::ctrl_c();
    info!(bind = %config.bind, "storefront-rs listening");

    serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = shutdown.await;
        info!("shutting down gracefully");
    })
    .await
    .context("server exited with error")
}

/// Initialize tracing subscriber with `RUST_LOG` env filter (default: `info`).
fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

/// Apply the bootstrap users file: each entry is hashed and upserted so a
/// fresh deployment has its accounts before the server accepts requests.
async fn seed_bootstrap_users(pool: &SqlitePool, path: Option<&Path>) -> anyhow::Result<()> {
    let users = auth::load_bootstrap_users(path).context("failed to load users file")?;
    if users.is_empty() {
        return Ok(());
    }

    for user in &users {
        let hash = auth::hash_password(&user.password).map_err(|error| {
            anyhow::anyhow!("failed to hash password for {}: {error}", user.name)
        })?;
        db::users::upsert_bootstrap_user(pool, &user.name, &user.role, &hash)
            .await
            .with_context(|| format!("failed to upsert bootstrap user {}", user.name))?;
    }

    info!(users = users.len(), "bootstrap users applied");
    Ok(())
}

/// Spawns a background task that drops expired session tokens on an interval.
fn spawn_session_pruner(sessions: SessionStore, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = sessions.prune_expired();
            if removed > 0 {
                debug!(removed, "expired sessions pruned");
            }
        }
    });
}

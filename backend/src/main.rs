//! Backend entry-point: wires persistence, the reservation sweep, REST
//! endpoints, and OpenAPI docs.

mod server;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use mockable::{Clock, DefaultClock};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::ReservationSweep;
use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, DieselReservationStore, PoolConfig};
use server::ServerConfig;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    run_migrations(database_url.clone()).await?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("database pool init failed: {e}")))?;

    // The sweep runs eagerly once at startup, then hourly, so a long-idle
    // deployment catches up immediately.
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let sweep = Arc::new(ReservationSweep::new(
        Arc::new(DieselReservationStore::new(pool.clone())),
        clock,
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweep_task = tokio::spawn({
        let sweep = sweep.clone();
        async move { sweep.run(shutdown_rx).await }
    });

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr, pool);
    let server = server::create_server(health_state.clone(), config)?;

    info!(%bind_addr, "server started");
    let result = server.await;

    health_state.mark_unhealthy();
    if shutdown_tx.send(true).is_err() {
        warn!("sweep already stopped before shutdown signal");
    }
    if let Err(e) = sweep_task.await {
        error!(error = %e, "sweep task join failed");
    }

    result
}

/// Read the session signing key, falling back to an ephemeral one in
/// development builds only.
fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Apply pending schema migrations before accepting traffic.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url).map_err(|e| {
            std::io::Error::other(format!("database connection for migrations failed: {e}"))
        })?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|applied| {
                if !applied.is_empty() {
                    info!(count = applied.len(), "applied schema migrations");
                }
            })
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task panicked: {e}")))?
}

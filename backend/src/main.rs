//! Service entry-point: loads settings, prepares storage and runs the HTTP
//! server.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use studyquest::inbound::http::health::HealthState;
use studyquest::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use studyquest::settings::ServiceSettings;

async fn connect_database(url: &str, max_connections: u32) -> io::Result<DbPool> {
    run_pending_migrations(url)
        .await
        .map_err(|err| io::Error::other(err.to_string()))?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(max_connections))
        .await
        .map_err(|err| io::Error::other(err.to_string()))?;
    info!(max_connections, "database pool ready");
    Ok(pool)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let mut config = ServerConfig::new(bind_addr);
    if let Some(url) = settings.database_url() {
        config = config.with_db_pool(connect_database(url, settings.db_max_connections()).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    create_server(health_state, config)?.await
}

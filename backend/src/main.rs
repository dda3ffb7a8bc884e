//! Backend entry-point: reads configuration, prepares persistence and serves
//! the profile endpoints.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use schoolemy_backend::inbound::http::health::HealthState;
use schoolemy_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use schoolemy_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, bind_addr_from_env, create_server, database_url_from_env};

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

    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let bind_addr = bind_addr_from_env(&env).map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(session, bind_addr);

    match database_url_from_env(&env) {
        Some(url) => {
            run_migrations(&url).await.map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("DATABASE_URL not set; serving fixture profile data"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "profile service listening");
    server.await
}

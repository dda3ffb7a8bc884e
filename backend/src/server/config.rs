//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use schoolemy_backend::inbound::http::session_config::SessionSettings;
use schoolemy_backend::outbound::persistence::DbPool;

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while reading server settings.
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error("invalid value for {BIND_ADDR_ENV}='{value}'; expected host:port")]
    InvalidBindAddr { value: String },
}

/// Resolve the listen address from `BIND_ADDR`, defaulting to `0.0.0.0:8080`.
pub fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, ServerConfigError> {
    let value = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    value
        .trim()
        .parse()
        .map_err(|_| ServerConfigError::InvalidBindAddr { value })
}

/// Database URL, when persistence is configured.
pub fn database_url_from_env<E: Env>(env: &E) -> Option<String> {
    env.string(DATABASE_URL_ENV)
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database pool; without one the server runs on fixture ports.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

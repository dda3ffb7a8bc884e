//! Builders wiring HTTP state to real or fixture ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use schoolemy_backend::domain::ProfileService;
use schoolemy_backend::inbound::http::state::HttpState;
use schoolemy_backend::outbound::persistence::DieselUserProfileRepository;

use super::ServerConfig;

/// Use the Diesel-backed profile service when a pool is configured, otherwise
/// the fixture ports.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            let repository = Arc::new(DieselUserProfileRepository::new(pool.clone()));
            let service = Arc::new(ProfileService::new(repository, Arc::new(DefaultClock)));
            HttpState::new(service.clone(), service)
        }
        None => HttpState::fixtures(),
    };
    web::Data::new(state)
}

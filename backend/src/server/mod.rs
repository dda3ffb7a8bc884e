//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerConfigError, bind_addr_from_env, database_url_from_env};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use schoolemy_backend::Trace;
#[cfg(debug_assertions)]
use schoolemy_backend::doc::ApiDoc;
use schoolemy_backend::inbound::http::avatar::{multipart_config, update_profile_picture};
use schoolemy_backend::inbound::http::health::{HealthState, live, ready};
use schoolemy_backend::inbound::http::profiles::{
    get_profile, json_error_handler, list_courses, update_profile,
};

use state_builders::build_http_state;

/// Session cookie lifetime.
const SESSION_TTL_DAYS: i64 = 7;

#[derive(Clone)]
struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionCookie {
    fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::days(SESSION_TTL_DAYS)),
            )
            .build()
    }
}

/// Register the session-authenticated profile endpoints.
fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_profile)
        .service(list_courses)
        .service(update_profile)
        .service(update_profile_picture);
}

/// Bind the HTTP server and mark the probes ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;
    let cookie = SessionCookie {
        key,
        secure: cookie_secure,
        same_site,
    };
    let probes = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(probes.clone())
            .app_data(http_state.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(multipart_config())
            .wrap(Trace)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app
            .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app.service(
            web::scope("")
                .wrap(cookie.middleware())
                .configure(configure_profile_routes),
        )
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

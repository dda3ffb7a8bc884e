//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;

/// Session middleware with a fresh key, a `session` cookie and no `Secure`
/// flag so plain-HTTP test requests keep it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by `response`.
///
/// # Panics
/// Panics when the response did not set one.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Path prefix of the login route registered by [`configure_test_login`].
pub const TEST_LOGIN_PATH: &str = "/test/login";

/// Register `POST /test/login/{id}`, which stores `id` as the session user.
pub fn configure_test_login(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/test/login/{id}",
        web::post().to(|session: SessionContext, id: web::Path<String>| async move {
            let user_id = UserId::new(id.into_inner()).expect("test login id is a UUID");
            session.persist_user(&user_id)?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        }),
    );
}

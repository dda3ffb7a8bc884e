//! Session access for handlers.
//!
//! Identity is resolved upstream and stored in the cookie session under
//! `user_id`. Handlers only see [`SessionContext`], never the raw session.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Message returned to writers without an authenticated identity.
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthorized: User not authenticated";

/// Handler-facing view of the cookie session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the framework session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated user's id.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.insert(USER_ID_KEY, user_id.as_ref()).map_err(|err| {
            Error::internal("Server error").with_error(format!("failed to persist session: {err}"))
        })
    }

    /// Current user id, if the session carries a well-formed one.
    ///
    /// A malformed id is treated as absent.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self.0.get::<String>(USER_ID_KEY).map_err(|err| {
            Error::internal("Server error").with_error(format!("failed to read session: {err}"))
        })?;
        Ok(raw.and_then(|raw| match UserId::new(&raw) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, "ignoring malformed user id in session");
                None
            }
        }))
    }

    /// Authenticated user id or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized(UNAUTHENTICATED_MESSAGE))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Authenticated caller, resolved from the session.
///
/// Rejects with `401` on the first poll, so extractors listed after it never
/// read the request body.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = fut.await?;
            Ok(Self(session.require_user_id()?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    const ALICE: &str = "11111111-1111-1111-1111-111111111111";

    #[rstest]
    #[actix_web::test]
    async fn persisted_user_round_trips() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/login",
                    web::post().to(|session: SessionContext| async move {
                        session.persist_user(&UserId::new(ALICE).expect("fixture id"))?;
                        Ok::<_, Error>(HttpResponse::NoContent().finish())
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.require_user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                    }),
                ),
        )
        .await;

        let login = test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;
        let cookie = session_cookie(&login);
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, ALICE);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("not-a-uuid"))]
    #[actix_web::test]
    async fn missing_or_malformed_identity_is_unauthorised(#[case] stored: Option<&'static str>) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/seed",
                    web::post().to(move |session: Session| async move {
                        if let Some(raw) = stored {
                            session.insert(USER_ID_KEY, raw).expect("seed session");
                        }
                        Ok::<_, Error>(HttpResponse::NoContent().finish())
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        session.require_user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().finish())
                    }),
                ),
        )
        .await;

        let seed = test::call_service(&app, test::TestRequest::post().uri("/seed").to_request()).await;
        let mut req = test::TestRequest::get().uri("/whoami");
        if let Some(cookie) = seed
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            req = req.cookie(cookie.into_owned());
        }
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], UNAUTHENTICATED_MESSAGE);
    }
}

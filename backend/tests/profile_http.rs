//! HTTP round trips through the profile service over an in-memory store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use uuid::Uuid;

use schoolemy_backend::Trace;
use schoolemy_backend::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use schoolemy_backend::domain::{
    EnrolledCourse, Error, ProfilePicture, ProfileService, ProfileUpdate, UserId, UserProfile,
};
use schoolemy_backend::inbound::http::avatar::{multipart_config, update_profile_picture};
use schoolemy_backend::inbound::http::profiles::{
    get_profile, json_error_handler, list_courses, update_profile,
};
use schoolemy_backend::inbound::http::session::SessionContext;
use schoolemy_backend::inbound::http::state::HttpState;

const ALICE: &str = "11111111-1111-1111-1111-111111111111";
const BOB: &str = "22222222-2222-2222-2222-222222222222";
const GHOST: &str = "99999999-9999-9999-9999-999999999999";
const BOUNDARY: &str = "profile-http-boundary";

#[derive(Default)]
struct InMemoryProfiles {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
    enrollments: Mutex<HashMap<UserId, Vec<EnrolledCourse>>>,
}

impl InMemoryProfiles {
    fn owner_of(&self, matches: impl Fn(&UserProfile) -> bool) -> Option<UserId> {
        self.profiles
            .lock()
            .expect("profiles")
            .values()
            .find(|profile| matches(profile))
            .map(|profile| profile.id.clone())
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryProfiles {
    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        Ok(self.profiles.lock().expect("profiles").get(user_id).cloned())
    }

    async fn find_enrollments(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Vec<EnrolledCourse>>, UserProfileRepositoryError> {
        if !self.profiles.lock().expect("profiles").contains_key(user_id) {
            return Ok(None);
        }
        let enrollments = self.enrollments.lock().expect("enrollments");
        Ok(Some(enrollments.get(user_id).cloned().unwrap_or_default()))
    }

    async fn find_user_id_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserId>, UserProfileRepositoryError> {
        Ok(self.owner_of(|profile| profile.email == email))
    }

    async fn find_user_id_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserId>, UserProfileRepositoryError> {
        Ok(self.owner_of(|profile| profile.username == username))
    }

    async fn apply_update(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<bool, UserProfileRepositoryError> {
        let mut profiles = self.profiles.lock().expect("profiles");
        let Some(profile) = profiles.get_mut(user_id) else {
            return Ok(false);
        };
        profile.username.clone_from(&update.username);
        profile.email.clone_from(&update.email);
        if update.mobile.is_some() {
            profile.mobile.clone_from(&update.mobile);
        }
        if update.father_name.is_some() {
            profile.father_name.clone_from(&update.father_name);
        }
        if update.date_of_birth.is_some() {
            profile.date_of_birth = update.date_of_birth;
        }
        if update.gender.is_some() {
            profile.gender = update.gender;
        }
        if update.blood_group.is_some() {
            profile.blood_group = update.blood_group;
        }
        if update.address.is_some() {
            profile.address.clone_from(&update.address);
        }
        if update.nationality.is_some() {
            profile.nationality.clone_from(&update.nationality);
        }
        if update.occupation.is_some() {
            profile.occupation.clone_from(&update.occupation);
        }
        Ok(true)
    }

    async fn set_profile_picture(
        &self,
        user_id: &UserId,
        picture: &ProfilePicture,
    ) -> Result<bool, UserProfileRepositoryError> {
        let mut profiles = self.profiles.lock().expect("profiles");
        let Some(profile) = profiles.get_mut(user_id) else {
            return Ok(false);
        };
        profile.profile_picture = Some(picture.clone());
        Ok(true)
    }
}

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0)
        .single()
        .expect("timestamp")
}

#[fixture]
fn repository() -> Arc<InMemoryProfiles> {
    let repository = InMemoryProfiles::default();
    {
        let mut profiles = repository.profiles.lock().expect("profiles");
        for (id, username, email) in [(ALICE, "alice", "alice@x.com"), (BOB, "bob", "bob@x.com")] {
            let user_id = UserId::new(id).expect("uuid");
            profiles.insert(
                user_id.clone(),
                UserProfile::new(user_id, username, email, timestamp()),
            );
        }
    }
    repository.enrollments.lock().expect("enrollments").insert(
        UserId::new(ALICE).expect("uuid"),
        vec![EnrolledCourse {
            course_id: Uuid::nil(),
            coursename: "Algebra".to_owned(),
            category: "Mathematics".to_owned(),
            price: 120_000,
            emi: false,
            thumbnail: Some("https://cdn.schoolemy.com/algebra.png".to_owned()),
            access_status: "active".to_owned(),
            emi_plan: None,
        }],
    );
    Arc::new(repository)
}

fn http_state(repository: Arc<InMemoryProfiles>) -> HttpState {
    let mut clock = MockClock::new();
    clock.expect_utc().returning(timestamp);
    let service = Arc::new(ProfileService::new(repository, Arc::new(clock)));
    HttpState::new(service.clone(), service)
}

async fn login(session: SessionContext, id: web::Path<String>) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(id.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

macro_rules! init_app {
    ($repository:expr) => {
        test::init_service(
            App::new()
                .wrap(Trace)
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".to_owned())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new(http_state($repository)))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(multipart_config())
                .route("/login/{id}", web::post().to(login))
                .service(get_profile)
                .service(list_courses)
                .service(update_profile)
                .service(update_profile_picture),
        )
        .await
    };
}

macro_rules! login_as {
    ($app:expr, $id:expr) => {{
        let res = test::call_service(
            &$app,
            test::TestRequest::post()
                .uri(&format!("/login/{}", $id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        session_cookie(&res)
    }};
}

#[rstest]
#[actix_web::test]
async fn edits_are_visible_on_next_read(repository: Arc<InMemoryProfiles>) {
    let app = init_app!(repository);
    let cookie = login_as!(app, ALICE);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/putprofile")
            .cookie(cookie.clone())
            .set_json(json!({
                "username": "alice",
                "email": "alice@school.example",
                "gender": "Female",
                "bloodGroup": "b+",
                "dateofBirth": "2003-02-14T00:00:00.000Z",
                "address": {"city": "Madurai", "zip": "625001"},
                "Occupation": "Student"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/profiles").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["_id"], ALICE);
    assert_eq!(body["email"], "alice@school.example");
    assert_eq!(body["gender"], "female");
    assert_eq!(body["bloodGroup"], "B+");
    assert_eq!(body["dateofBirth"], "2003-02-14");
    assert_eq!(body["address"], json!({"city": "Madurai", "zip": "625001"}));
    assert_eq!(body["Occupation"], "Student");
    assert!(body.get("password").is_none());
}

#[rstest]
#[actix_web::test]
async fn taken_email_is_rejected_as_conflict(repository: Arc<InMemoryProfiles>) {
    let app = init_app!(repository.clone());
    let cookie = login_as!(app, ALICE);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/putprofile")
            .cookie(cookie)
            .set_json(json!({"username": "alice", "email": "bob@x.com"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["message"], "Email already in use by another account");
    let stored = repository
        .find_profile(&UserId::new(ALICE).expect("uuid"))
        .await
        .expect("lookup")
        .expect("alice");
    assert_eq!(stored.email, "alice@x.com");
}

#[rstest]
#[actix_web::test]
async fn invalid_gender_is_rejected_with_details(repository: Arc<InMemoryProfiles>) {
    let app = init_app!(repository);
    let cookie = login_as!(app, ALICE);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/putprofile")
            .cookie(cookie)
            .set_json(json!({"username": "alice", "email": "alice@x.com", "gender": "robot"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["details"]["field"], "gender");
}

#[rstest]
#[actix_web::test]
async fn uploaded_picture_is_returned_by_profile(repository: Arc<InMemoryProfiles>) {
    let app = init_app!(repository);
    let cookie = login_as!(app, BOB);
    let mut payload = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"profilePicture\"; filename=\"bob.gif\"\r\nContent-Type: image/gif\r\n\r\n"
    )
    .into_bytes();
    payload.extend_from_slice(b"GIF89a");
    payload.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/profile-picture")
            .cookie(cookie.clone())
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/profiles").cookie(cookie).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    let picture = &body["profilePicture"];
    assert_eq!(picture["data"], "data:image/gif;base64,R0lGODlh");
    assert_eq!(picture["filename"], "bob.gif");
    assert_eq!(picture["mimetype"], "image/gif");
    assert_eq!(picture["size"], 6);
    assert_eq!(picture["uploadDate"], "2025-06-01T08:30:00Z");
}

#[rstest]
#[case(ALICE, StatusCode::OK, 1)]
#[case(BOB, StatusCode::OK, 0)]
#[actix_web::test]
async fn courses_list_enrollments(
    repository: Arc<InMemoryProfiles>,
    #[case] user: &str,
    #[case] status: StatusCode,
    #[case] count: usize,
) {
    let app = init_app!(repository);
    let cookie = login_as!(app, user);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/user/courses").cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), status);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(count));
}

#[rstest]
#[actix_web::test]
async fn unknown_user_gets_not_found(repository: Arc<InMemoryProfiles>) {
    let app = init_app!(repository);
    let cookie = login_as!(app, GHOST);

    for uri in ["/profiles", "/user/courses"] {
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(uri).cookie(cookie.clone()).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "User not found");
    }
}

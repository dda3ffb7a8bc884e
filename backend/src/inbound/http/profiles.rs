//! Profile API handlers.
//!
//! ```text
//! GET /profiles
//! GET /user/courses
//! PUT /putprofile {"username":"ada","email":"ada@example.com","gender":"female"}
//! ```
//!
//! Wire field names follow the casing existing clients already send and
//! expect (`_id`, `dateofBirth`, `Nationality`), so the DTOs here spell them
//! out explicitly instead of relying on a blanket rename.

use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, get, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Address, EmiPlan, EnrolledCourse, Error, ProfilePicture, ProfileUpdateDraft, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const USER_NOT_FOUND: &str = "User not found";

/// Postal address as sent and returned over HTTP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddressBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl From<Address> for AddressBody {
    fn from(value: Address) -> Self {
        Self {
            street: value.street,
            city: value.city,
            state: value.state,
            country: value.country,
            zip: value.zip,
        }
    }
}

impl From<AddressBody> for Address {
    fn from(value: AddressBody) -> Self {
        Self {
            street: value.street,
            city: value.city,
            state: value.state,
            country: value.country,
            zip: value.zip,
        }
    }
}

/// Stored profile picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureBody {
    /// `data:<mimetype>;base64,<payload>` URI.
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub data: String,
    pub filename: String,
    #[schema(example = "image/png")]
    pub mimetype: String,
    /// Size in bytes.
    pub size: u64,
    pub upload_date: DateTime<Utc>,
}

impl From<ProfilePicture> for ProfilePictureBody {
    fn from(value: ProfilePicture) -> Self {
        Self {
            data: value.data,
            filename: value.filename,
            mimetype: value.mimetype,
            size: value.size,
            upload_date: value.upload_date,
        }
    }
}

/// Profile returned by `GET /profiles` and `PUT /putprofile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfileBody {
    #[serde(rename = "_id")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(rename = "fatherName", skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(rename = "dateofBirth", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "female")]
    pub gender: Option<String>,
    #[serde(rename = "bloodGroup", skip_serializing_if = "Option::is_none")]
    #[schema(example = "O+")]
    pub blood_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressBody>,
    #[serde(rename = "Nationality", skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(rename = "Occupation", skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(rename = "profilePicture", skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<ProfilePictureBody>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for UserProfileBody {
    fn from(value: UserProfile) -> Self {
        Self {
            id: *value.id.as_uuid(),
            username: value.username,
            email: value.email,
            mobile: value.mobile,
            father_name: value.father_name,
            date_of_birth: value.date_of_birth,
            gender: value.gender.map(|gender| gender.as_str().to_owned()),
            blood_group: value.blood_group.map(|group| group.as_str().to_owned()),
            address: value.address.map(AddressBody::from),
            nationality: value.nationality,
            occupation: value.occupation,
            profile_picture: value.profile_picture.map(ProfilePictureBody::from),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Installment plan attached to an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmiPlanBody {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub total_amount: i64,
    pub monthly_amount: i64,
    pub months: i32,
    #[schema(example = "active")]
    pub status: String,
}

impl From<EmiPlan> for EmiPlanBody {
    fn from(value: EmiPlan) -> Self {
        Self {
            id: value.id,
            total_amount: value.total_amount,
            monthly_amount: value.monthly_amount,
            months: value.months,
            status: value.status,
        }
    }
}

/// One enrolled course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourseBody {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "coursename")]
    pub course_name: String,
    pub category: String,
    /// Price in minor currency units.
    pub price: i64,
    pub emi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[schema(example = "active")]
    pub access_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emi_plan: Option<EmiPlanBody>,
}

impl From<EnrolledCourse> for EnrolledCourseBody {
    fn from(value: EnrolledCourse) -> Self {
        Self {
            id: value.course_id,
            course_name: value.coursename,
            category: value.category,
            price: value.price,
            emi: value.emi,
            thumbnail: value.thumbnail,
            access_status: value.access_status,
            emi_plan: value.emi_plan.map(EmiPlanBody::from),
        }
    }
}

/// Response body for `GET /user/courses`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CoursesResponse {
    pub success: bool,
    pub data: Vec<EnrolledCourseBody>,
}

/// Request body for `PUT /putprofile`. Every field is optional on the wire;
/// `username` and `email` are then required by the domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdatePayload {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default, rename = "fatherName")]
    pub father_name: Option<String>,
    #[serde(default, rename = "dateofBirth")]
    #[schema(example = "2001-04-09")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, rename = "bloodGroup")]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub address: Option<AddressBody>,
    #[serde(default, rename = "Nationality", alias = "nationality")]
    pub nationality: Option<String>,
    #[serde(default, rename = "Occupation", alias = "occupation")]
    pub occupation: Option<String>,
}

impl From<ProfileUpdatePayload> for ProfileUpdateDraft {
    fn from(value: ProfileUpdatePayload) -> Self {
        Self {
            username: value.username,
            email: value.email,
            mobile: value.mobile,
            father_name: value.father_name,
            date_of_birth: value.date_of_birth,
            gender: value.gender,
            blood_group: value.blood_group,
            address: value.address.map(Address::from),
            nationality: value.nationality,
            occupation: value.occupation,
        }
    }
}

/// Response body for `PUT /putprofile`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdatedResponse {
    pub success: bool,
    #[schema(example = "Profile updated successfully")]
    pub message: String,
    pub user: UserProfileBody,
}

/// Render malformed JSON bodies with the standard error envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting malformed JSON body");
    Error::invalid_request("Invalid request body")
        .with_error(err.to_string())
        .into()
}

/// Fetch the caller's profile.
///
/// A request without a session identity matches no user and reports 404.
#[utoipa::path(
    get,
    path = "/profiles",
    responses(
        (status = 200, description = "Caller profile", body = UserProfileBody),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Server error", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "getProfile"
)]
#[get("/profiles")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfileBody>> {
    let user_id = session
        .user_id()?
        .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
    let profile = state.profile_query.fetch_profile(&user_id).await?;
    Ok(web::Json(UserProfileBody::from(profile)))
}

/// List the caller's enrolled courses in enrollment order.
#[utoipa::path(
    get,
    path = "/user/courses",
    responses(
        (status = 200, description = "Enrolled courses", body = CoursesResponse),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Server error", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "listEnrolledCourses"
)]
#[get("/user/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CoursesResponse>> {
    let user_id = session
        .user_id()?
        .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
    let courses = state.profile_query.fetch_enrollments(&user_id).await?;
    Ok(web::Json(CoursesResponse {
        success: true,
        data: courses.into_iter().map(EnrolledCourseBody::from).collect(),
    }))
}

/// Update the caller's profile fields.
#[utoipa::path(
    put,
    path = "/putprofile",
    request_body = ProfileUpdatePayload,
    responses(
        (status = 200, description = "Profile updated", body = ProfileUpdatedResponse),
        (status = 400, description = "Validation failed or email/username taken", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Server error", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "updateProfile"
)]
#[put("/putprofile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileUpdatePayload>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let draft = ProfileUpdateDraft::from(payload.into_inner());
    let profile = state.profile_command.update_profile(&user_id, draft).await?;
    Ok(HttpResponse::Ok().json(ProfileUpdatedResponse {
        success: true,
        message: "Profile updated successfully".to_owned(),
        user: UserProfileBody::from(profile),
    }))
}

#[cfg(test)]
#[path = "profiles_tests.rs"]
mod tests;

//! PostgreSQL-backed `UserProfileRepository` using Diesel.
//!
//! Addresses and profile pictures are stored as JSONB documents. Stored values
//! that no longer decode (an unknown gender, a malformed address) are logged
//! and surfaced as absent rather than failing the whole read.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{
    Address, EmiPlan, EnrolledCourse, ProfilePicture, ProfileUpdate, UserId, UserProfile,
};

use super::models::{CourseRow, EmiPlanRow, ProfileChangeset, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, emi_plans, user_enrollments, users};

/// Diesel implementation of the profile store port.
#[derive(Clone)]
pub struct DieselUserProfileRepository {
    pool: DbPool,
}

impl DieselUserProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserProfileRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserProfileRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserProfileRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "profile store operation failed");
            match kind {
                DatabaseErrorKind::UniqueViolation => UserProfileRepositoryError::unique_violation(
                    info.constraint_name().unwrap_or("unknown"),
                ),
                DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                    UserProfileRepositoryError::rejected(info.message())
                }
                DatabaseErrorKind::ClosedConnection => {
                    UserProfileRepositoryError::connection("database connection error")
                }
                _ => UserProfileRepositoryError::query("database error"),
            }
        }
        DieselError::NotFound => UserProfileRepositoryError::query("record not found"),
        other => {
            debug!(error = %other, "profile store operation failed");
            UserProfileRepositoryError::query("database error")
        }
    }
}

fn encode_json<T: serde::Serialize>(
    value: &T,
) -> Result<serde_json::Value, UserProfileRepositoryError> {
    serde_json::to_value(value)
        .map_err(|err| UserProfileRepositoryError::query(format!("encode document: {err}")))
}

fn decode_json<T: serde::de::DeserializeOwned>(
    user_id: Uuid,
    column: &'static str,
    value: Option<serde_json::Value>,
) -> Option<T> {
    let value = value?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(%user_id, column, error = %err, "ignoring undecodable stored document");
            None
        }
    }
}

fn decode_enum<T: std::str::FromStr>(
    user_id: Uuid,
    column: &'static str,
    value: Option<String>,
) -> Option<T> {
    let value = value?;
    let parsed = value.parse().ok();
    if parsed.is_none() {
        warn!(%user_id, column, value, "ignoring unknown stored value");
    }
    parsed
}

fn row_to_profile(row: ProfileRow) -> UserProfile {
    let id = row.id;
    UserProfile {
        id: UserId::from_uuid(id),
        username: row.username,
        email: row.email,
        mobile: row.mobile,
        father_name: row.father_name,
        date_of_birth: row.date_of_birth,
        gender: decode_enum(id, "gender", row.gender),
        blood_group: decode_enum(id, "blood_group", row.blood_group),
        address: decode_json::<Address>(id, "address", row.address)
            .and_then(Address::normalised),
        nationality: row.nationality,
        occupation: row.occupation,
        profile_picture: decode_json(id, "profile_picture", row.profile_picture),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_enrollment(
    (course, access_status, plan): (CourseRow, String, Option<EmiPlanRow>),
) -> EnrolledCourse {
    EnrolledCourse {
        course_id: course.id,
        coursename: course.coursename,
        category: course.category,
        price: course.price,
        emi: course.emi,
        thumbnail: course.thumbnail,
        access_status,
        emi_plan: plan.map(|plan| EmiPlan {
            id: plan.id,
            total_amount: plan.total_amount,
            monthly_amount: plan.monthly_amount,
            months: plan.months,
            status: plan.status,
        }),
    }
}

#[async_trait]
impl UserProfileRepository for DieselUserProfileRepository {
    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_profile))
    }

    async fn find_enrollments(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Vec<EnrolledCourse>>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let exists = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(users::id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows: Vec<(CourseRow, String, Option<EmiPlanRow>)> = user_enrollments::table
            .inner_join(courses::table)
            .left_join(emi_plans::table)
            .filter(user_enrollments::user_id.eq(user_id.as_uuid()))
            .order(user_enrollments::position.asc())
            .select((
                CourseRow::as_select(),
                user_enrollments::access_status,
                (
                    emi_plans::id,
                    emi_plans::total_amount,
                    emi_plans::monthly_amount,
                    emi_plans::months,
                    emi_plans::status,
                )
                    .nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Some(rows.into_iter().map(row_to_enrollment).collect()))
    }

    async fn find_user_id_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserId>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = users::table
            .filter(users::email.eq(email))
            .select(users::id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(id.map(UserId::from_uuid))
    }

    async fn find_user_id_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserId>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = users::table
            .filter(users::username.eq(username))
            .select(users::id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(id.map(UserId::from_uuid))
    }

    async fn apply_update(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<bool, UserProfileRepositoryError> {
        let address = update.address.as_ref().map(encode_json).transpose()?;
        let changeset = ProfileChangeset {
            username: &update.username,
            email: &update.email,
            mobile: update.mobile.as_deref(),
            father_name: update.father_name.as_deref(),
            date_of_birth: update.date_of_birth,
            gender: update.gender.map(|gender| gender.as_str()),
            blood_group: update.blood_group.map(|group| group.as_str()),
            address,
            nationality: update.nationality.as_deref(),
            occupation: update.occupation.as_deref(),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.filter(users::id.eq(user_id.as_uuid())))
            .set((&changeset, users::updated_at.eq(diesel::dsl::now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn set_profile_picture(
        &self,
        user_id: &UserId,
        picture: &ProfilePicture,
    ) -> Result<bool, UserProfileRepositoryError> {
        let document = encode_json(picture)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.filter(users::id.eq(user_id.as_uuid())))
            .set((
                users::profile_picture.eq(Some(document)),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}

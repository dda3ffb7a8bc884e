//! Driving port for profile and enrollment reads.
//!
//! Inbound adapters use this port to load the caller's profile and enrolled
//! courses without importing persistence details. The fixture keeps HTTP
//! handlers runnable before a database is wired.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{EmiPlan, EnrolledCourse, Error, UserId, UserProfile};

/// Domain use-case port for reading profile data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Return the profile for the given user, without credentials.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, Error>;

    /// Return the user's enrolled courses, flattened.
    async fn fetch_enrollments(&self, user_id: &UserId) -> Result<Vec<EnrolledCourse>, Error>;
}

/// Fixture query returning a canned profile for any identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileQuery;

#[async_trait]
impl ProfileQuery for FixtureProfileQuery {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        let joined = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| Error::internal("invalid fixture timestamp"))?;
        Ok(UserProfile::new(
            user_id.clone(),
            "ada",
            "ada@example.com",
            joined,
        ))
    }

    async fn fetch_enrollments(&self, _user_id: &UserId) -> Result<Vec<EnrolledCourse>, Error> {
        Ok(vec![EnrolledCourse {
            course_id: Uuid::nil(),
            coursename: "Foundations of Algebra".to_owned(),
            category: "Mathematics".to_owned(),
            price: 499_900,
            emi: true,
            thumbnail: None,
            access_status: "active".to_owned(),
            emi_plan: Some(EmiPlan {
                id: Uuid::nil(),
                total_amount: 499_900,
                monthly_amount: 166_634,
                months: 3,
                status: "ongoing".to_owned(),
            }),
        }])
    }
}

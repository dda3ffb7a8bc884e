//! Internal Diesel row structs for the profile store.
//!
//! Never exposed to the domain. `ProfileRow` deliberately omits
//! `password_hash` so credential material is never selected.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{courses, users};

/// Profile columns read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub father_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub address: Option<serde_json::Value>,
    pub nationality: Option<String>,
    pub occupation: Option<String>,
    pub profile_picture: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile write. `None` fields keep the stored value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct ProfileChangeset<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub mobile: Option<&'a str>,
    pub father_name: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<&'a str>,
    pub blood_group: Option<&'a str>,
    pub address: Option<serde_json::Value>,
    pub nationality: Option<&'a str>,
    pub occupation: Option<&'a str>,
}

/// Course columns exposed on enrollment listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub coursename: String,
    pub category: String,
    pub price: i64,
    pub emi: bool,
    pub thumbnail: Option<String>,
}

/// Installment plan columns, read through a left join.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct EmiPlanRow {
    pub id: Uuid,
    pub total_amount: i64,
    pub monthly_amount: i64,
    pub months: i32,
    pub status: String,
}

//! Enrolled-course read model.
//!
//! Enrollments are created by the purchase flow and never mutated here; this
//! module only describes the flattened projection handed to callers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Installment ("EMI") plan attached to an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiPlan {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Total payable amount in minor currency units.
    pub total_amount: i64,
    /// Amount due each month in minor currency units.
    pub monthly_amount: i64,
    pub months: i32,
    pub status: String,
}

/// One enrollment joined with the selected course fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledCourse {
    pub course_id: Uuid,
    pub coursename: String,
    pub category: String,
    /// Course price in minor currency units.
    pub price: i64,
    /// Whether the course can be paid in installments.
    pub emi: bool,
    pub thumbnail: Option<String>,
    /// Access flag owned by the enrollment flow, passed through verbatim.
    pub access_status: String,
    pub emi_plan: Option<EmiPlan>,
}

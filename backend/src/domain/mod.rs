//! Domain primitives, aggregates and services.
//!
//! Purpose: hold the profile and OTP delivery rules independent of HTTP,
//! Diesel and SMTP. Adapters talk to this layer through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - UserProfile, ProfilePicture, Address: profile aggregate and parts.
//! - EnrolledCourse, EmiPlan: enrollment read model.
//! - ProfileUpdateDraft, ProfileUpdate: unvalidated and validated edits.
//! - AvatarUpload: raw picture upload awaiting validation.
//! - ProfileService: implements the profile driving ports.
//! - OtpMailer, OtpDelivery: OTP email delivery.
//! - TraceId: request correlation identifier.

pub mod avatar;
pub mod enrollment;
pub mod error;
pub mod otp_mailer;
pub mod ports;
pub mod profile_service;
pub mod profile_update;
pub mod trace_id;
pub mod user;

pub use self::avatar::{ALLOWED_AVATAR_TYPES, AvatarUpload, MAX_AVATAR_BYTES};
pub use self::enrollment::{EmiPlan, EnrolledCourse};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::otp_mailer::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_SMTP_TIMEOUT, MailerConfig, MailerConfigError, OTP_SUBJECT,
    OtpDelivery, OtpMailer, OtpMessage, SecurityMode, SmtpCredentials, SmtpSettings, SmtpTarget,
    candidate_targets,
};
pub use self::profile_service::ProfileService;
pub use self::profile_update::{ProfileUpdate, ProfileUpdateDraft};
pub use self::trace_id::TraceId;
pub use self::user::{
    Address, BloodGroup, Gender, ProfilePicture, UserId, UserProfile, UserValidationError,
    parse_date_of_birth,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use schoolemy_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("Unauthorized: User not authenticated"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

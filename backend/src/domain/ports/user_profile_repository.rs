//! Driven port for the user profile store.
//!
//! Adapters expose only what the profile use-cases need: identity lookups for
//! uniqueness checks, the profile and enrollment reads, and the two partial
//! writes. Every write reports whether a user matched so services can raise
//! `NotFound` without a second round trip.

use async_trait::async_trait;

use crate::domain::{EnrolledCourse, ProfilePicture, ProfileUpdate, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user profile repository adapters.
    pub enum UserProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user profile repository query failed: {message}",
        /// A unique index (email or username) rejected the write.
        UniqueViolation { constraint: String } => "unique constraint violated: {constraint}",
        /// The store's own validation rejected the values.
        Rejected { message: String } => "user profile rejected by store validation: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Fetch a profile by identifier.
    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError>;

    /// Fetch the user's enrollments in enrollment order, or `None` when the
    /// user does not exist.
    async fn find_enrollments(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Vec<EnrolledCourse>>, UserProfileRepositoryError>;

    /// Resolve the owner of an email address.
    async fn find_user_id_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserId>, UserProfileRepositoryError>;

    /// Resolve the owner of a username.
    async fn find_user_id_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserId>, UserProfileRepositoryError>;

    /// Merge the populated fields of `update` into the stored profile.
    ///
    /// Returns `false` when no user matched.
    async fn apply_update(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<bool, UserProfileRepositoryError>;

    /// Replace the stored profile picture.
    ///
    /// Returns `false` when no user matched.
    async fn set_profile_picture(
        &self,
        user_id: &UserId,
        picture: &ProfilePicture,
    ) -> Result<bool, UserProfileRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unique_violation_names_constraint() {
        let err = UserProfileRepositoryError::unique_violation("users_email_key");
        assert_eq!(err.to_string(), "unique constraint violated: users_email_key");
    }

    #[rstest]
    fn rejected_carries_store_message() {
        let err = UserProfileRepositoryError::rejected("gender check failed");
        assert!(err.to_string().contains("gender check failed"));
    }
}

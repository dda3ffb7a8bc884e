//! User profile domain service.
//!
//! Implements the profile driving ports on top of the
//! [`UserProfileRepository`] driven port. Uniqueness is checked before any
//! write, and the repository's own unique and validation failures are still
//! mapped for the race where another writer lands in between.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ProfileCommand, ProfileQuery, UserProfileRepository, UserProfileRepositoryError,
};
use crate::domain::{
    AvatarUpload, EnrolledCourse, Error, ProfilePicture, ProfileUpdate, ProfileUpdateDraft,
    UserId, UserProfile,
};

const USER_NOT_FOUND: &str = "User not found";

/// Which operation a repository failure surfaced from; selects the
/// caller-facing wording for unclassified failures.
#[derive(Debug, Clone, Copy)]
enum Operation {
    Read,
    Update,
    Picture,
}

impl Operation {
    fn internal_message(self) -> &'static str {
        match self {
            Self::Read => "Server error",
            Self::Update => "Update failed due to server error",
            Self::Picture => "Failed to upload photo",
        }
    }
}

/// Profile service implementing [`ProfileQuery`] and [`ProfileCommand`].
#[derive(Clone)]
pub struct ProfileService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ProfileService<R> {
    /// Create a new service over the given repository and clock.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> ProfileService<R>
where
    R: UserProfileRepository,
{
    fn map_repository_error(operation: Operation, error: UserProfileRepositoryError) -> Error {
        match error {
            UserProfileRepositoryError::UniqueViolation { constraint } => {
                debug!(%constraint, "unique constraint rejected profile write");
                Error::conflict("Email or username already exists")
            }
            UserProfileRepositoryError::Rejected { message } => {
                Error::invalid_request("Validation failed").with_error(message)
            }
            UserProfileRepositoryError::Connection { message }
            | UserProfileRepositoryError::Query { message } => {
                Error::internal(operation.internal_message()).with_error(message)
            }
        }
    }

    async fn ensure_unique(&self, user_id: &UserId, update: &ProfileUpdate) -> Result<(), Error> {
        let email_owner = self
            .repository
            .find_user_id_by_email(&update.email)
            .await
            .map_err(|err| Self::map_repository_error(Operation::Update, err))?;
        if email_owner.is_some_and(|owner| &owner != user_id) {
            return Err(Error::conflict("Email already in use by another account"));
        }

        let username_owner = self
            .repository
            .find_user_id_by_username(&update.username)
            .await
            .map_err(|err| Self::map_repository_error(Operation::Update, err))?;
        if username_owner.is_some_and(|owner| &owner != user_id) {
            return Err(Error::conflict("Username already in use by another account"));
        }
        Ok(())
    }

    async fn load_profile(&self, operation: Operation, user_id: &UserId) -> Result<UserProfile, Error> {
        self.repository
            .find_profile(user_id)
            .await
            .map_err(|err| Self::map_repository_error(operation, err))?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[async_trait]
impl<R> ProfileQuery for ProfileService<R>
where
    R: UserProfileRepository,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        self.load_profile(Operation::Read, user_id).await
    }

    async fn fetch_enrollments(&self, user_id: &UserId) -> Result<Vec<EnrolledCourse>, Error> {
        self.repository
            .find_enrollments(user_id)
            .await
            .map_err(|err| Self::map_repository_error(Operation::Read, err))?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[async_trait]
impl<R> ProfileCommand for ProfileService<R>
where
    R: UserProfileRepository,
{
    async fn update_profile(
        &self,
        user_id: &UserId,
        draft: ProfileUpdateDraft,
    ) -> Result<UserProfile, Error> {
        let update = ProfileUpdate::try_from(draft)?;
        self.ensure_unique(user_id, &update).await?;

        let matched = self
            .repository
            .apply_update(user_id, &update)
            .await
            .map_err(|err| Self::map_repository_error(Operation::Update, err))?;
        if !matched {
            return Err(Error::not_found(USER_NOT_FOUND));
        }

        info!(%user_id, "profile updated");
        self.load_profile(Operation::Update, user_id).await
    }

    async fn update_profile_picture(
        &self,
        user_id: &UserId,
        upload: AvatarUpload,
    ) -> Result<ProfilePicture, Error> {
        upload.validate()?;
        let picture = upload.into_picture(self.clock.utc()).map_err(|err| {
            warn!(%user_id, error = %err, "profile picture encoding failed");
            Error::invalid_request("Failed to process profile picture.")
        })?;

        let matched = self
            .repository
            .set_profile_picture(user_id, &picture)
            .await
            .map_err(|err| Self::map_repository_error(Operation::Picture, err))?;
        if !matched {
            return Err(Error::not_found(
                "User not found, cannot update profile picture",
            ));
        }

        info!(%user_id, size = picture.size, mimetype = %picture.mimetype, "profile picture stored");
        Ok(picture)
    }
}

#[cfg(test)]
#[path = "profile_service_tests.rs"]
mod tests;

//! Driving port for profile mutations.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    AvatarUpload, Error, ProfilePicture, ProfileUpdate, ProfileUpdateDraft, UserId, UserProfile,
};

/// Domain use-case port for changing the caller's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Validate and merge a partial profile update, returning the re-read
    /// profile.
    async fn update_profile(
        &self,
        user_id: &UserId,
        draft: ProfileUpdateDraft,
    ) -> Result<UserProfile, Error>;

    /// Validate, encode and store a new profile picture.
    async fn update_profile_picture(
        &self,
        user_id: &UserId,
        upload: AvatarUpload,
    ) -> Result<ProfilePicture, Error>;
}

/// Fixture command that validates input and echoes it back without storing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileCommand;

#[async_trait]
impl ProfileCommand for FixtureProfileCommand {
    async fn update_profile(
        &self,
        user_id: &UserId,
        draft: ProfileUpdateDraft,
    ) -> Result<UserProfile, Error> {
        let update = ProfileUpdate::try_from(draft)?;
        let mut profile = UserProfile::new(user_id.clone(), update.username, update.email, Utc::now());
        profile.mobile = update.mobile;
        profile.father_name = update.father_name;
        profile.date_of_birth = update.date_of_birth;
        profile.gender = update.gender;
        profile.blood_group = update.blood_group;
        profile.address = update.address;
        profile.nationality = update.nationality;
        profile.occupation = update.occupation;
        Ok(profile)
    }

    async fn update_profile_picture(
        &self,
        _user_id: &UserId,
        upload: AvatarUpload,
    ) -> Result<ProfilePicture, Error> {
        upload.validate()?;
        upload.into_picture(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_update_requires_identity_fields() {
        let err = FixtureProfileCommand
            .update_profile(&UserId::random(), ProfileUpdateDraft::default())
            .await
            .expect_err("identity required");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_picture_rejects_disallowed_type() {
        let upload = AvatarUpload::new("doc.pdf", "application/pdf", vec![1]);
        let err = FixtureProfileCommand
            .update_profile_picture(&UserId::random(), upload)
            .await
            .expect_err("type rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}

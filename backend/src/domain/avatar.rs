//! Profile picture validation and inline encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{Error, ProfilePicture};

/// Largest accepted profile picture, in bytes (50 MiB).
pub const MAX_AVATAR_BYTES: u64 = 50 * 1024 * 1024;

/// Content types accepted for profile pictures.
pub const ALLOWED_AVATAR_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// A single uploaded image as received from the upload layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub filename: String,
    /// Declared content type.
    pub mimetype: String,
    /// Declared size in bytes.
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    /// Build an upload whose declared size is the payload length.
    pub fn new(filename: impl Into<String>, mimetype: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        Self {
            filename: filename.into(),
            mimetype: mimetype.into(),
            size,
            bytes,
        }
    }

    /// Check the content type against the allow-list and the size against
    /// [`MAX_AVATAR_BYTES`].
    pub fn validate(&self) -> Result<(), Error> {
        if !ALLOWED_AVATAR_TYPES.contains(&self.mimetype.as_str()) {
            return Err(Error::invalid_request(
                "Invalid file type. Only JPEG, PNG, GIF and WEBP images are allowed.",
            )
            .with_details(json!({
                "field": "profilePicture",
                "value": self.mimetype,
                "code": "invalid_file_type",
            })));
        }

        let actual = u64::try_from(self.bytes.len()).unwrap_or(u64::MAX);
        if self.size > MAX_AVATAR_BYTES || actual > MAX_AVATAR_BYTES {
            return Err(
                Error::invalid_request("File too large. Maximum size is 50MB.").with_details(
                    json!({
                        "field": "profilePicture",
                        "limit": MAX_AVATAR_BYTES,
                        "code": "file_too_large",
                    }),
                ),
            );
        }
        Ok(())
    }

    /// Encode the payload as a content-type-tagged base64 data URI and stamp
    /// the metadata with `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use schoolemy_backend::domain::AvatarUpload;
    ///
    /// let upload = AvatarUpload::new("dot.png", "image/png", vec![0xff]);
    /// let picture = upload.into_picture(Utc::now()).expect("encodes");
    /// assert_eq!(picture.data, "data:image/png;base64,/w==");
    /// assert_eq!(picture.size, 1);
    /// ```
    pub fn into_picture(self, now: DateTime<Utc>) -> Result<ProfilePicture, Error> {
        if self.mimetype.is_empty() {
            return Err(Error::invalid_request("Failed to process profile picture."));
        }
        let data = format!("data:{};base64,{}", self.mimetype, STANDARD.encode(&self.bytes));
        Ok(ProfilePicture {
            data,
            filename: self.filename,
            mimetype: self.mimetype,
            size: self.size,
            upload_date: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("image/jpeg")]
    #[case("image/jpg")]
    #[case("image/png")]
    #[case("image/gif")]
    #[case("image/webp")]
    fn accepts_allowed_types(#[case] mimetype: &str) {
        let upload = AvatarUpload::new("a", mimetype, vec![1, 2, 3]);
        assert!(upload.validate().is_ok());
    }

    #[rstest]
    #[case("application/pdf")]
    #[case("image/svg+xml")]
    #[case("image/JPG")]
    #[case(" image/png")]
    #[case("")]
    fn rejects_other_types(#[case] mimetype: &str) {
        let upload = AvatarUpload::new("a", mimetype, vec![1]);
        let err = upload.validate().expect_err("type rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().starts_with("Invalid file type"));
    }

    #[rstest]
    fn rejects_declared_size_over_limit() {
        let mut upload = AvatarUpload::new("big.png", "image/png", vec![0]);
        upload.size = MAX_AVATAR_BYTES + 1;
        let err = upload.validate().expect_err("size rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "File too large. Maximum size is 50MB.");
    }

    #[rstest]
    fn accepts_size_at_limit() {
        let mut upload = AvatarUpload::new("edge.png", "image/png", vec![0]);
        upload.size = MAX_AVATAR_BYTES;
        assert!(upload.validate().is_ok());
    }

    #[rstest]
    fn encodes_payload_as_data_uri() {
        let now = Utc::now();
        let picture = AvatarUpload::new("me.gif", "image/gif", b"GIF89a".to_vec())
            .into_picture(now)
            .expect("encodes");

        assert_eq!(picture.data, "data:image/gif;base64,R0lGODlh");
        assert_eq!(picture.filename, "me.gif");
        assert_eq!(picture.mimetype, "image/gif");
        assert_eq!(picture.size, 6);
        assert_eq!(picture.upload_date, now);
    }

    #[rstest]
    fn stores_declared_type_unchanged() {
        let picture = AvatarUpload::new("photo.jpg", "image/jpg", vec![0xff])
            .into_picture(Utc::now())
            .expect("encodes");

        assert_eq!(picture.mimetype, "image/jpg");
        assert!(picture.data.starts_with("data:image/jpg;base64,"));
    }
}

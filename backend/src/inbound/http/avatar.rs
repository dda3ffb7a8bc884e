//! Profile picture upload handler.
//!
//! ```text
//! PUT /profile-picture  (multipart/form-data, file field `profilePicture`)
//! ```

use actix_multipart::MultipartError;
use actix_multipart::form::bytes::Bytes;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::{HttpRequest, HttpResponse, put, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{AvatarUpload, Error, MAX_AVATAR_BYTES};
use crate::inbound::http::ApiResult;
use crate::inbound::http::profiles::ProfilePictureBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Slack over the file limit for multipart framing and other small fields.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Multipart body for `PUT /profile-picture`.
#[derive(MultipartForm)]
pub struct AvatarForm {
    #[multipart(rename = "profilePicture", limit = "50MiB")]
    pub profile_picture: Option<Bytes>,
}

/// OpenAPI description of [`AvatarForm`].
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AvatarFormSchema {
    /// JPEG, PNG, GIF or WEBP image up to 50 MiB.
    #[schema(rename = "profilePicture", value_type = String, format = Binary)]
    profile_picture: Vec<u8>,
}

/// Response body for `PUT /profile-picture`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureUpdatedResponse {
    pub success: bool,
    #[schema(example = "Profile picture updated successfully")]
    pub message: String,
    pub profile_picture: ProfilePictureBody,
}

/// Multipart limits sized for one 50 MiB picture held in memory, with
/// failures rendered as the standard error envelope.
pub fn multipart_config() -> MultipartFormConfig {
    let limit = usize::try_from(MAX_AVATAR_BYTES)
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD_BYTES);
    MultipartFormConfig::default()
        .total_limit(limit)
        .memory_limit(limit)
        .error_handler(multipart_error_handler)
}

fn multipart_error_handler(err: MultipartError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting multipart body");
    Error::invalid_request("Failed to process profile picture upload.")
        .with_error(err.to_string())
        .into()
}

/// Replace the caller's profile picture.
#[utoipa::path(
    put,
    path = "/profile-picture",
    request_body(content = AvatarFormSchema, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Picture stored", body = ProfilePictureUpdatedResponse),
        (status = 400, description = "Missing, oversized or unsupported file", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Failed to upload photo", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "updateProfilePicture"
)]
#[put("/profile-picture")]
pub async fn update_profile_picture(
    state: web::Data<HttpState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    MultipartForm(form): MultipartForm<AvatarForm>,
) -> ApiResult<HttpResponse> {
    let Some(file) = form.profile_picture else {
        return Err(Error::invalid_request("No file uploaded"));
    };

    let mimetype = file
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_default();
    let filename = file.file_name.unwrap_or_default();
    let upload = AvatarUpload::new(filename, mimetype, file.data.to_vec());

    let picture = state
        .profile_command
        .update_profile_picture(&user_id, upload)
        .await?;
    Ok(HttpResponse::Ok().json(ProfilePictureUpdatedResponse {
        success: true,
        message: "Profile picture updated successfully".to_owned(),
        profile_picture: ProfilePictureBody::from(picture),
    }))
}

#[cfg(test)]
#[path = "avatar_tests.rs"]
mod tests;

//! OpenAPI document for the profile endpoints and health probes.
//!
//! Domain types stay free of `utoipa`; the envelope schemas come from the
//! wrappers in [`crate::inbound::http::schemas`].

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::avatar::{AvatarFormSchema, ProfilePictureUpdatedResponse};
use crate::inbound::http::profiles::{
    AddressBody, CoursesResponse, EmiPlanBody, EnrolledCourseBody, ProfilePictureBody,
    ProfileUpdatePayload, ProfileUpdatedResponse, UserProfileBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the Schoolemy login flow.",
            ))),
        );
    }
}

/// OpenAPI document served by Swagger UI in debug builds.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Schoolemy profile API",
        description = "Session-authenticated profile, enrollment and profile picture endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::profiles::list_courses,
        crate::inbound::http::profiles::update_profile,
        crate::inbound::http::avatar::update_profile_picture,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AddressBody,
        ProfilePictureBody,
        UserProfileBody,
        EmiPlanBody,
        EnrolledCourseBody,
        CoursesResponse,
        ProfileUpdatePayload,
        ProfileUpdatedResponse,
        AvatarFormSchema,
        ProfilePictureUpdatedResponse,
    )),
    tags(
        (name = "profile", description = "Profile reads and edits"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

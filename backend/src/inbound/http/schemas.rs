//! OpenAPI schema definitions for domain types.
//!
//! The domain error stays free of utoipa derives; these wrappers describe
//! its wire shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed input or failed validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No authenticated identity.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Target record absent.
    #[schema(rename = "not_found")]
    NotFound,
    /// Email or username already taken.
    #[schema(rename = "conflict")]
    Conflict,
    /// Unclassified server-side failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `false`.
    success: bool,
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Validation failed")]
    message: String,
    /// Underlying failure text for diagnostics.
    error: Option<String>,
    /// Structured context, e.g. `{field, value, code}` for validation errors.
    details: Option<serde_json::Value>,
    #[schema(example = "6f1f2c1e-0c39-4b8e-9a8e-2f4c8f7e1a10")]
    trace_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_code_schema_lists_every_code() {
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        let json = schema_json::<ErrorCodeSchema>();
        for code in ["invalid_request", "unauthorized", "not_found", "conflict", "internal_error"] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn error_schema_uses_envelope_field_names() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_json::<ErrorSchema>();
        for field in ["success", "message", "traceId", "details", "error"] {
            assert!(json.contains(field), "missing {field}");
        }
    }
}

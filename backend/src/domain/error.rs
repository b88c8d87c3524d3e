//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
///
/// Reservation lifecycle failures get their own codes so callers can tell
/// "nothing needed doing" apart from "this is not allowed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// No remaining quota units for the requested reservation kind.
    InsufficientQuota,
    /// Confirmation requires the reservation to be awaiting confirmation.
    NotUnconfirmed,
    /// Confirmed reservations cannot be casually deleted.
    CannotDeleteConfirmed,
    /// Archived reservations are historical records and stay immutable.
    CannotDeleteLegacy,
    /// A backing service (pool, store) is temporarily unavailable; retry later.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload carried to adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "Something went wrong")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InsufficientQuota`].
    pub fn insufficient_quota(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientQuota, message)
    }

    /// Convenience constructor for [`ErrorCode::NotUnconfirmed`].
    pub fn not_unconfirmed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotUnconfirmed, message)
    }

    /// Convenience constructor for [`ErrorCode::CannotDeleteConfirmed`].
    pub fn cannot_delete_confirmed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CannotDeleteConfirmed, message)
    }

    /// Convenience constructor for [`ErrorCode::CannotDeleteLegacy`].
    pub fn cannot_delete_legacy(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CannotDeleteLegacy, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Serialisation and accessor coverage for the domain error payload.

    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_code_as_snake_case() {
        let error = Error::insufficient_quota("no standard quota left");
        let value = serde_json::to_value(&error).expect("error serialises");

        assert_eq!(value["code"], "insufficient_quota");
        assert_eq!(value["message"], "no standard quota left");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn details_round_trip() {
        let error = Error::invalid_request("bad kind")
            .with_details(json!({ "field": "kind", "value": "Weekly" }));

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details().and_then(|d| d["field"].as_str()),
            Some("kind")
        );
    }

    #[test]
    fn lifecycle_codes_are_distinguishable() {
        assert_ne!(
            Error::cannot_delete_confirmed("x").code(),
            Error::cannot_delete_legacy("x").code()
        );
        assert_ne!(
            Error::not_unconfirmed("x").code(),
            Error::cannot_delete_confirmed("x").code()
        );
    }
}

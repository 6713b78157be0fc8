//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::contact::ContactError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unparseable request (400).
    BadRequest,
    /// Honeypot or challenge failed (400).
    AntibotRejected,
    /// Required fields empty (400).
    MissingFields,
    /// Malformed email address (400).
    InvalidEmail,
    /// Wrong HTTP method (405).
    MethodNotAllowed,
    /// Transport settings incomplete (500).
    ConfigurationError,
    /// Transport failed (500).
    DeliveryFailed,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest
            | ErrorCode::AntibotRejected
            | ErrorCode::MissingFields
            | ErrorCode::InvalidEmail => StatusCode::BAD_REQUEST,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::ConfigurationError
            | ErrorCode::DeliveryFailed
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message, safe to show as is.
    pub error: String,
    /// Error code.
    pub code: ErrorCode,
    /// Names of the offending fields (only present for missing fields).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    fields: Option<Vec<String>>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: None,
        }
    }

    /// Create a bad request error.
    pub fn bad_request() -> Self {
        Self::new(ErrorCode::BadRequest, "Invalid request body")
    }

    /// Create a method not allowed error.
    pub fn method_not_allowed() -> Self {
        Self::new(ErrorCode::MethodNotAllowed, "Method not allowed")
    }

    /// Create an internal server error.
    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "An internal error occurred")
    }

    /// Create a missing fields error.
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self {
            code: ErrorCode::MissingFields,
            message: format!("Missing required fields: {}", fields.join(", ")),
            fields: Some(fields.iter().map(|f| f.to_string()).collect()),
        }
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: self.message,
            code: self.code,
            fields: self.fields,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::MethodNotAllowed => ApiError::method_not_allowed(),
            ContactError::BadRequest(detail) => {
                tracing::info!(%detail, "Rejected unparseable contact request");
                ApiError::bad_request()
            }
            ContactError::AntibotRejected(reason) => {
                tracing::warn!(%reason, "Contact submission rejected by anti-bot check");
                ApiError::new(ErrorCode::AntibotRejected, "Validation failed")
            }
            ContactError::MissingFields(fields) => {
                tracing::info!(fields = ?fields, "Contact submission missing fields");
                ApiError::missing_fields(&fields)
            }
            ContactError::InvalidEmail => {
                tracing::info!("Contact submission has an invalid email address");
                ApiError::new(ErrorCode::InvalidEmail, "Invalid email address")
            }
            ContactError::Configuration(detail) => {
                tracing::error!(%detail, "Mail transport is not configured");
                ApiError::new(
                    ErrorCode::ConfigurationError,
                    "Mail service is not configured",
                )
            }
            ContactError::DeliveryFailed(detail) => {
                tracing::error!(%detail, "Failed to deliver contact message");
                ApiError::new(ErrorCode::DeliveryFailed, "Failed to send message")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::AntibotReason;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::AntibotRejected.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::MissingFields.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::InvalidEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ErrorCode::ConfigurationError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DeliveryFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_antibot_reasons_share_one_message() {
        for reason in [
            AntibotReason::Honeypot,
            AntibotReason::WrongAnswer,
            AntibotReason::MissingToken,
            AntibotReason::InvalidToken,
        ] {
            let err = ApiError::from(ContactError::AntibotRejected(reason));
            assert_eq!(err.code(), ErrorCode::AntibotRejected);
            assert_eq!(err.message(), "Validation failed");
        }
    }

    #[test]
    fn test_missing_fields_message() {
        let err = ApiError::from(ContactError::MissingFields(vec!["email", "message"]));
        assert_eq!(err.code(), ErrorCode::MissingFields);
        assert_eq!(err.message(), "Missing required fields: email, message");
        assert_eq!(
            err.fields,
            Some(vec!["email".to_string(), "message".to_string()])
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = ApiError::from(ContactError::Configuration(
            "missing required config: password".to_string(),
        ));
        assert_eq!(err.message(), "Mail service is not configured");

        let err = ApiError::from(ContactError::DeliveryFailed(
            "SMTP error: 535 auth failed for user site@example.com".to_string(),
        ));
        assert_eq!(err.message(), "Failed to send message");
        assert!(!err.to_string().contains("535"));
    }

    #[test]
    fn test_error_body_serialization() {
        let body = ErrorBody {
            error: "Validation failed".to_string(),
            code: ErrorCode::AntibotRejected,
            fields: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["code"], "ANTIBOT_REJECTED");
        assert!(json.get("fields").is_none());
    }
}

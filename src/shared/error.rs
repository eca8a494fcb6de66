//! Application Error Types
//!
//! Errors raised at the gateway boundary, before anything reaches the
//! room registry or conversation store. Each one is reported back to the
//! offending connection as an `error` event.

use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body sent to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl AppError {
    /// Numeric code reported to clients
    pub fn code(&self) -> u16 {
        match self {
            AppError::Internal(_) => 10000,
            AppError::InvalidFrame(_) => 10001,
            AppError::UnknownEvent(_) => 10002,
            AppError::MalformedPayload(_) => 10003,
            AppError::Validation(_) => 10004,
        }
    }

    /// Build the client-facing error body, hiding internal details
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse {
            code: self.code(),
            message,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_is_masked() {
        let response = AppError::Internal("lock poisoned".into()).to_response();
        assert_eq!(response.code, 10000);
        assert_eq!(response.message, "Internal server error");
    }

    #[test]
    fn test_unknown_event_message() {
        let response = AppError::UnknownEvent("joinRoom".into()).to_response();
        assert_eq!(response.code, 10002);
        assert_eq!(response.message, "Unknown event: joinRoom");
    }

    #[test]
    fn test_serde_error_converts_to_malformed_payload() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        assert!(matches!(AppError::from(err), AppError::MalformedPayload(_)));
    }
}

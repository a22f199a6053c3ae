//! API error taxonomy
//!
//! Every failure crossing the service boundary is classified by HTTP status
//! into one of these variants. Each variant carries a fixed human-readable
//! message; server-supplied detail strings are appended when present. The
//! retryability classifier lives here too, but nothing in the service layer
//! consults it implicitly - retries only happen through the explicit
//! [`crate::retry::with_retry`] wrapper.

use std::time::Duration;
use thiserror::Error;

/// Normalized API error, classified by HTTP status at the service boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Bad Request: {}", .detail.as_deref().unwrap_or("Invalid request data"))]
    BadRequest { detail: Option<String> },

    #[error("Unauthorized: Please log in to continue")]
    Unauthorized,

    #[error("Forbidden: You do not have permission to perform this action")]
    Forbidden,

    #[error("Not Found: {}", .detail.as_deref().unwrap_or("The requested resource was not found"))]
    NotFound { detail: Option<String> },

    #[error("Conflict: {}", .detail.as_deref().unwrap_or("Resource conflict occurred"))]
    Conflict { detail: Option<String> },

    #[error("Validation Error: {}", .detail.as_deref().unwrap_or("Invalid data provided"))]
    Validation { detail: Option<String> },

    #[error("Server Error: An internal server error occurred. Please try again later.")]
    Server,

    #[error("Bad Gateway: Service temporarily unavailable")]
    BadGateway,

    #[error("Service Unavailable: Service is temporarily unavailable. Please try again later.")]
    Unavailable,

    /// Any other HTTP status the taxonomy does not name
    #[error("Request Failed: {}", .detail.as_deref().unwrap_or("An unexpected error occurred"))]
    Unexpected { status: u16, detail: Option<String> },

    /// No response received at all
    #[error("Network Error: Unable to connect to the server. Please check your connection.")]
    Network,

    /// Non-HTTP failures (decode errors, contract violations, ...)
    #[error("Unknown Error: {detail}")]
    Unknown { detail: String },
}

impl ApiError {
    /// Classify an HTTP error status, attaching the server-supplied message
    pub fn from_status(status: u16, server_message: Option<String>) -> Self {
        match status {
            400 => ApiError::BadRequest {
                detail: server_message,
            },
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound {
                detail: server_message,
            },
            409 => ApiError::Conflict {
                detail: server_message,
            },
            422 => ApiError::Validation {
                detail: server_message,
            },
            500 => ApiError::Server,
            502 => ApiError::BadGateway,
            503 => ApiError::Unavailable,
            other => ApiError::Unexpected {
                status: other,
                detail: server_message,
            },
        }
    }

    /// HTTP status this error was mapped from; 0 when no response was received
    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest { .. } => 400,
            ApiError::Unauthorized => 401,
            ApiError::Forbidden => 403,
            ApiError::NotFound { .. } => 404,
            ApiError::Conflict { .. } => 409,
            ApiError::Validation { .. } => 422,
            ApiError::Server => 500,
            ApiError::BadGateway => 502,
            ApiError::Unavailable => 503,
            ApiError::Unexpected { status, .. } => *status,
            ApiError::Network | ApiError::Unknown { .. } => 0,
        }
    }

    /// The fixed message for this error class, without any detail
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "Bad Request",
            ApiError::Unauthorized => "Unauthorized",
            ApiError::Forbidden => "Forbidden",
            ApiError::NotFound { .. } => "Not Found",
            ApiError::Conflict { .. } => "Conflict",
            ApiError::Validation { .. } => "Validation Error",
            ApiError::Server => "Server Error",
            ApiError::BadGateway => "Bad Gateway",
            ApiError::Unavailable => "Service Unavailable",
            ApiError::Unexpected { .. } => "Request Failed",
            ApiError::Network => "Network Error",
            ApiError::Unknown { .. } => "Unknown Error",
        }
    }

    /// Whether a retry could plausibly succeed: network failures, 5xx,
    /// request timeout and rate limiting.
    pub fn is_retryable(&self) -> bool {
        let status = self.status();
        matches!(self, ApiError::Network)
            || (500..600).contains(&status)
            || status == 408
            || status == 429
    }

    /// Exponential backoff delay for the given 1-based attempt: 1s, 2s, 4s,
    /// 8s, capped at 16s.
    pub fn retry_delay(attempt: u32) -> Duration {
        let millis = 1000u64.saturating_mul(1 << attempt.saturating_sub(1).min(10));
        Duration::from_millis(millis.min(16_000))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            ApiError::Network
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), None)
        } else if err.is_decode() {
            ApiError::Unknown {
                detail: format!("Failed to decode response: {}", err),
            }
        } else {
            ApiError::Unknown {
                detail: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes_to_taxonomy() {
        assert_eq!(ApiError::from_status(404, None).message(), "Not Found");
        assert_eq!(ApiError::from_status(404, None).status(), 404);
        assert_eq!(ApiError::from_status(409, None).status(), 409);
        assert_eq!(
            ApiError::from_status(418, None),
            ApiError::Unexpected {
                status: 418,
                detail: None
            }
        );
    }

    #[test]
    fn network_error_has_status_zero() {
        assert_eq!(ApiError::Network.status(), 0);
        assert_eq!(ApiError::Network.message(), "Network Error");
    }

    #[test]
    fn display_concatenates_message_and_detail() {
        let err = ApiError::from_status(400, Some("name is required".to_string()));
        assert_eq!(err.to_string(), "Bad Request: name is required");

        let err = ApiError::from_status(400, None);
        assert_eq!(err.to_string(), "Bad Request: Invalid request data");
    }

    #[test]
    fn retryability_classifier() {
        assert!(ApiError::Network.is_retryable());
        assert!(ApiError::Server.is_retryable());
        assert!(ApiError::BadGateway.is_retryable());
        assert!(ApiError::from_status(429, None).is_retryable());
        assert!(ApiError::from_status(408, None).is_retryable());
        assert!(!ApiError::from_status(404, None).is_retryable());
        assert!(!ApiError::from_status(400, None).is_retryable());
        // Non-HTTP local failures are not worth retrying
        assert!(!ApiError::Unknown {
            detail: "decode".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(ApiError::retry_delay(1), Duration::from_secs(1));
        assert_eq!(ApiError::retry_delay(2), Duration::from_secs(2));
        assert_eq!(ApiError::retry_delay(3), Duration::from_secs(4));
        assert_eq!(ApiError::retry_delay(5), Duration::from_secs(16));
        assert_eq!(ApiError::retry_delay(9), Duration::from_secs(16));
    }
}

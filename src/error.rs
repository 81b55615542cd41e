//! Error types for certificate renewal and telemetry delivery.
//!
//! None of these errors is fatal to the core. Refresh failures are retried
//! with backoff and transport failures are logged and dropped.

use thiserror::Error;

use crate::traits::HttpError;

/// Failure returned by the certificate refresh API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RefreshError {
    /// API answered with an error status.
    #[error("Certificate API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request never reached the API or the response was lost.
    #[error("Network error while refreshing certificate: {0}")]
    Network(String),

    /// API rejected the request because too many certificates were requested.
    #[error("Too many certificate requests")]
    TooManyRequests,

}

impl RefreshError {
    /// Check if the API throttled this request.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            RefreshError::TooManyRequests | RefreshError::Api { status: 429, .. }
        )
    }
}

/// Failure while delivering a telemetry event.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Underlying HTTP client failed.
    #[error("Telemetry request failed: {0}")]
    Http(#[from] HttpError),

    /// Telemetry endpoint answered with a non-success status.
    #[error("Telemetry endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Event payload could not be encoded.
    #[error("Failed to encode telemetry event: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Invalid configuration value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Environment variable holds a value that cannot be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Text that does not name a known status, intent or network type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown connection status: {0:?}")]
    UnknownStatus(String),

    #[error("Unknown user initiated change: {0:?}")]
    UnknownChange(String),

    #[error("Unknown network type: {0:?}")]
    UnknownNetworkType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_error_display() {
        assert_eq!(
            RefreshError::Api {
                status: 500,
                message: "boom".to_string()
            }
            .to_string(),
            "Certificate API error (500): boom"
        );
        assert_eq!(
            RefreshError::TooManyRequests.to_string(),
            "Too many certificate requests"
        );
    }

    #[test]
    fn test_rate_limited_detection() {
        assert!(RefreshError::TooManyRequests.is_rate_limited());
        assert!(RefreshError::Api {
            status: 429,
            message: String::new()
        }
        .is_rate_limited());
        assert!(!RefreshError::Network("offline".to_string()).is_rate_limited());
    }

    #[test]
    fn test_parse_error_display() {
        assert_eq!(
            ParseError::UnknownStatus("reasserting".to_string()).to_string(),
            "Unknown connection status: \"reasserting\""
        );
    }

    #[test]
    fn test_transport_error_from_http() {
        let err: TransportError = HttpError::Timeout("10s".to_string()).into();
        assert!(matches!(err, TransportError::Http(_)));
        assert_eq!(
            err.to_string(),
            "Telemetry request failed: Request timeout: 10s"
        );
    }
}

//! Error types for group API operations.
//!
//! Errors are categorized so callers can tell transient failures from
//! rejected requests and give the user appropriate advice.

use std::fmt;

/// Result type alias for group API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (transient, retryable).
    Network,
    /// Group, organization or user not found.
    NotFound,
    /// Request rejected by server-side validation.
    Validation,
    /// Missing or invalid session token, or insufficient permissions.
    Auth,
    /// Response could not be decoded.
    Format,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Resource not found",
            Self::Validation => "Request rejected by the server",
            Self::Auth => "Not authorized",
            Self::Format => "Unexpected response format",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check the deployment URL and your connection, then try again",
            Self::NotFound => "Run `groupctl refresh` to drop records of deleted groups",
            Self::Validation => "Fix the rejected attribute in your groups file",
            Self::Auth => "Check the session token and that your user may manage groups",
            Self::Format => "The server may be running an incompatible version",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested object does not exist.
    #[error("{resource} not found: {key}")]
    NotFound {
        /// Kind of object ("group", "organization").
        resource: &'static str,
        /// Key that was looked up.
        key: String,
    },

    /// The server answered with an error status.
    #[error("API error ({status}): {message}{}", detail_suffix(.detail))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
        /// Additional detail from the response body.
        detail: String,
    },

    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Invalid response from API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" ({detail})")
    }
}

impl Error {
    /// Create a not-found error.
    pub fn not_found(resource: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            key: key.into(),
        }
    }

    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Auth,
                404 => ErrorCategory::NotFound,
                400 | 409 | 422 => ErrorCategory::Validation,
                s if *s >= 500 => ErrorCategory::Network,
                _ => ErrorCategory::Other,
            },
            Error::Http { .. } => ErrorCategory::Network,
            Error::InvalidResponse(_) => ErrorCategory::Format,
        }
    }

    /// Whether the object the request addressed does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            ureq::Error::Json(e) => Self::InvalidResponse(e.to_string()),
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

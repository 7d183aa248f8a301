//! Canonical error codes and their coarse classifications
//!
//! Every provider failure the classifier understands is named by one of the
//! [`ErrorCode`] variants. Codes group many-to-one into an [`ErrorClassification`],
//! which is what reporting and routing decisions are usually keyed on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical identifier for a specific provider failure condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Network
    /// The request did not complete in time.
    Timeout,
    /// The connection could not be established or was dropped.
    ConnectionError,
    /// The provider host name could not be resolved.
    DnsError,

    // Authentication
    /// Generic authentication failure.
    AuthenticationError,
    /// The API key was rejected by the provider.
    InvalidApiKey,
    /// Credentials are valid but lack access to the resource.
    PermissionDenied,

    // Rate limiting
    /// Too many requests in the current window.
    RateLimit,
    /// Account quota or credits are exhausted.
    QuotaExceeded,

    // Model
    /// The requested model does not exist.
    ModelNotFound,
    /// The model is temporarily overloaded.
    ModelOverloaded,
    /// The prompt exceeds the model's context window.
    ContextLengthExceeded,

    // Response
    /// The provider returned a malformed response.
    InvalidResponse,
    /// The response payload could not be parsed.
    ParseError,
    /// The provider returned no content.
    EmptyResponse,

    // Quality
    /// The response did not pass the caller's quality threshold.
    QualityThresholdNotMet,
    /// The provider answered, but too slowly.
    LatencyTooHigh,

    // System
    /// Provider-side internal error.
    InternalError,
    /// The provider service is unavailable.
    ServiceUnavailable,
    /// A structured error that could not be characterized.
    UnknownError,

    /// An error of indeterminate, possibly caller-defined type.
    CustomError,
}

impl ErrorCode {
    /// All error codes, in table order.
    pub const ALL: [ErrorCode; 20] = [
        ErrorCode::Timeout,
        ErrorCode::ConnectionError,
        ErrorCode::DnsError,
        ErrorCode::AuthenticationError,
        ErrorCode::InvalidApiKey,
        ErrorCode::PermissionDenied,
        ErrorCode::RateLimit,
        ErrorCode::QuotaExceeded,
        ErrorCode::ModelNotFound,
        ErrorCode::ModelOverloaded,
        ErrorCode::ContextLengthExceeded,
        ErrorCode::InvalidResponse,
        ErrorCode::ParseError,
        ErrorCode::EmptyResponse,
        ErrorCode::QualityThresholdNotMet,
        ErrorCode::LatencyTooHigh,
        ErrorCode::InternalError,
        ErrorCode::ServiceUnavailable,
        ErrorCode::UnknownError,
        ErrorCode::CustomError,
    ];

    /// Returns the canonical string form (e.g. `"RATE_LIMIT"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::ConnectionError => "CONNECTION_ERROR",
            ErrorCode::DnsError => "DNS_ERROR",
            ErrorCode::AuthenticationError => "AUTHENTICATION_ERROR",
            ErrorCode::InvalidApiKey => "INVALID_API_KEY",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::RateLimit => "RATE_LIMIT",
            ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorCode::ModelNotFound => "MODEL_NOT_FOUND",
            ErrorCode::ModelOverloaded => "MODEL_OVERLOADED",
            ErrorCode::ContextLengthExceeded => "CONTEXT_LENGTH_EXCEEDED",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::EmptyResponse => "EMPTY_RESPONSE",
            ErrorCode::QualityThresholdNotMet => "QUALITY_THRESHOLD_NOT_MET",
            ErrorCode::LatencyTooHigh => "LATENCY_TOO_HIGH",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
            ErrorCode::CustomError => "CUSTOM_ERROR",
        }
    }

    /// Maps an HTTP status code returned by a provider to an error code.
    ///
    /// Returns `None` for statuses with no direct counterpart, in which case
    /// callers fall back to message inference.
    pub fn from_http_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(ErrorCode::AuthenticationError),
            403 => Some(ErrorCode::PermissionDenied),
            404 => Some(ErrorCode::ModelNotFound),
            408 => Some(ErrorCode::Timeout),
            413 => Some(ErrorCode::ContextLengthExceeded),
            429 => Some(ErrorCode::RateLimit),
            500 => Some(ErrorCode::InternalError),
            502 => Some(ErrorCode::ConnectionError),
            503 => Some(ErrorCode::ServiceUnavailable),
            504 => Some(ErrorCode::Timeout),
            529 => Some(ErrorCode::ModelOverloaded),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known [`ErrorCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error code: {0}")]
pub struct ParseErrorCodeError(pub String);

impl FromStr for ErrorCode {
    type Err = ParseErrorCodeError;

    /// Parses the canonical form. Surrounding whitespace and letter case are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseErrorCodeError(s.to_string()))
    }
}

/// Coarse category grouping related error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClassification {
    /// The provider did not answer in time.
    Timeout,
    /// Request rate or account quota limits.
    RateLimit,
    /// Credentials or permissions were rejected.
    Authentication,
    /// Model availability or context window problems.
    Model,
    /// The response arrived but is unusable.
    Quality,
    /// Connection or name resolution failures.
    Network,
    /// Provider-side internal failures and outages.
    System,
    /// Nothing more specific could be determined.
    Unknown,
}

impl ErrorClassification {
    /// Returns the snake_case name (e.g. `"rate_limit"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorClassification::Timeout => "timeout",
            ErrorClassification::RateLimit => "rate_limit",
            ErrorClassification::Authentication => "authentication",
            ErrorClassification::Model => "model",
            ErrorClassification::Quality => "quality",
            ErrorClassification::Network => "network",
            ErrorClassification::System => "system",
            ErrorClassification::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

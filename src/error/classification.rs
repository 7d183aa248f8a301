//! Classifier inputs and output
//!
//! A provider failure reaches the classifier in one of three shapes: an explicit
//! [`ErrorCode`], a structured [`RawError`], or a bare message. The verdict comes
//! back as a [`ClassifiedError`].

use serde::Serialize;

use super::{ErrorClassification, ErrorCode};

/// A structured error observed from a provider call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawError {
    /// The error's type name (e.g. `"TimeoutError"`).
    pub name: String,
    /// Human-readable error message.
    pub message: String,
    /// Explicit error code reported by the provider or client, if any.
    pub code: Option<String>,
    /// HTTP status of the failed response, if any.
    pub status: Option<u16>,
}

impl RawError {
    /// Creates a structured error from a name and message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            code: None,
            status: None,
        }
    }

    /// Builds a structured error from any [`std::error::Error`].
    ///
    /// The name is the unqualified type name; the message is the error's display
    /// output followed by its source chain.
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        let type_name = std::any::type_name::<E>();
        let name = type_name
            .split('<')
            .next()
            .and_then(|path| path.rsplit("::").next())
            .unwrap_or(type_name);

        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        Self::new(name, message)
    }

    /// Sets the explicit error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Text considered by message inference: name and message together.
    pub(crate) fn inference_text(&self) -> String {
        format!("{} {}", self.name, self.message)
    }
}

impl std::fmt::Display for RawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

/// Anything the classifier accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassifyInput {
    /// An explicit error code, looked up directly.
    Code(ErrorCode),
    /// A structured error, normalized by explicit code, status, or inference.
    Error(RawError),
    /// A bare message, normalized by inference.
    Message(String),
}

impl From<ErrorCode> for ClassifyInput {
    fn from(code: ErrorCode) -> Self {
        ClassifyInput::Code(code)
    }
}

impl From<RawError> for ClassifyInput {
    fn from(error: RawError) -> Self {
        ClassifyInput::Error(error)
    }
}

impl From<&RawError> for ClassifyInput {
    fn from(error: &RawError) -> Self {
        ClassifyInput::Error(error.clone())
    }
}

impl From<&str> for ClassifyInput {
    fn from(message: &str) -> Self {
        ClassifyInput::Message(message.to_string())
    }
}

impl From<String> for ClassifyInput {
    fn from(message: String) -> Self {
        ClassifyInput::Message(message)
    }
}

impl From<&String> for ClassifyInput {
    fn from(message: &String) -> Self {
        ClassifyInput::Message(message.clone())
    }
}

impl From<&ClassifiedError> for ClassifyInput {
    fn from(error: &ClassifiedError) -> Self {
        ClassifyInput::Code(error.code)
    }
}

/// A classified provider error with retry and fallback verdicts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedError {
    /// The normalized error code.
    pub code: ErrorCode,
    /// The coarse category of the code.
    pub classification: ErrorClassification,
    /// Whether the same request is worth reattempting against the same provider.
    pub retryable: bool,
    /// Whether the next attempt should go to a different provider.
    pub should_fallback: bool,
    /// Human-readable error message.
    pub message: String,
}

impl ClassifiedError {
    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        self.classification == ErrorClassification::Timeout
    }

    /// Returns true if this error is due to rate limits or quota.
    pub fn is_rate_limit(&self) -> bool {
        self.classification == ErrorClassification::RateLimit
    }

    /// Returns true if this error is an authentication failure.
    pub fn is_authentication(&self) -> bool {
        self.classification == ErrorClassification::Authentication
    }

    /// Returns true if the error could not be characterized.
    pub fn is_unknown(&self) -> bool {
        self.classification == ErrorClassification::Unknown
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClassifiedError {}

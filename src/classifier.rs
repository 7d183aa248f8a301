//! Provider error classifier.
//!
//! The [`ErrorClassifier`] turns an observed provider failure into a
//! [`ClassifiedError`]: it normalizes the input to an [`ErrorCode`], looks the
//! code up in the static taxonomy, and widens the retry and fallback verdicts
//! with the overrides from the active [`RetryConfig`].
//!
//! Classification never fails. Input that cannot be characterized degrades to
//! `UNKNOWN_ERROR` (structured errors) or `CUSTOM_ERROR` (bare messages).

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::RetryConfig;
use crate::error::taxonomy::{self, FALLBACK_ENTRY};
use crate::error::{ClassifiedError, ClassifyInput, ErrorCode, ErrorDetector, RawError};

/// Classifies provider errors against the taxonomy and a caller-owned config.
///
/// The active configuration is held as an `Arc` behind a lock. Each call reads
/// it once, so a concurrent [`set_config`](Self::set_config) is observed either
/// entirely or not at all.
#[derive(Debug)]
pub struct ErrorClassifier {
    config: RwLock<Arc<RetryConfig>>,
    structured: ErrorDetector,
    messages: ErrorDetector,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl ErrorClassifier {
    /// Creates a classifier using the given configuration.
    pub fn new(config: impl Into<Arc<RetryConfig>>) -> Self {
        Self {
            config: RwLock::new(config.into()),
            structured: ErrorDetector::for_structured_errors(),
            messages: ErrorDetector::for_messages(),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> Arc<RetryConfig> {
        // The lock only ever guards a whole `Arc`, so a poisoned value is still usable.
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the active configuration for all subsequent calls.
    pub fn set_config(&self, config: impl Into<Arc<RetryConfig>>) {
        let config = config.into();
        tracing::info!(
            fallback_overrides = config.fallback_on_errors.len(),
            retry_overrides = config.retryable_errors.len(),
            "retry configuration updated"
        );
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Classifies an error code, structured error, or message.
    ///
    /// `custom_message`, when given, replaces the message carried by the result.
    pub fn classify(
        &self,
        input: impl Into<ClassifyInput>,
        custom_message: Option<&str>,
    ) -> ClassifiedError {
        let (code, message) = match input.into() {
            ClassifyInput::Code(code) => (code, code.as_str().to_string()),
            ClassifyInput::Error(error) => (self.normalize_error(&error), error.message),
            ClassifyInput::Message(message) => (self.messages.infer(&message), message),
        };
        let message = custom_message.map(str::to_string).unwrap_or(message);

        self.build(code, message)
    }

    /// Returns true if the error is worth retrying against the same provider.
    pub fn is_retryable(&self, input: impl Into<ClassifyInput>) -> bool {
        self.classify(input, None).retryable
    }

    /// Returns true if the caller should switch to a different provider.
    pub fn should_fallback(&self, input: impl Into<ClassifyInput>) -> bool {
        self.classify(input, None).should_fallback
    }

    /// Resolves a structured error to a code.
    ///
    /// An explicit code wins, then a known HTTP status, then message inference.
    fn normalize_error(&self, error: &RawError) -> ErrorCode {
        if let Some(code) = error.code.as_deref().and_then(|c| c.parse::<ErrorCode>().ok()) {
            return code;
        }
        if let Some(code) = error.status.and_then(ErrorCode::from_http_status) {
            return code;
        }
        self.structured.infer(&error.inference_text())
    }

    fn build(&self, code: ErrorCode, message: String) -> ClassifiedError {
        let entry = taxonomy::lookup(code).unwrap_or_else(|| {
            tracing::warn!(%code, "no taxonomy entry for error code");
            FALLBACK_ENTRY
        });
        let config = self.config();

        let classified = ClassifiedError {
            code,
            classification: entry.classification,
            retryable: entry.retryable || config.is_retry_override(code),
            should_fallback: entry.should_fallback || config.is_fallback_override(code),
            message,
        };
        tracing::debug!(
            code = %classified.code,
            classification = %classified.classification,
            retryable = classified.retryable,
            should_fallback = classified.should_fallback,
            "classified provider error"
        );
        classified
    }
}

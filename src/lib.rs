//! Failsafe - provider error classification for retry and fallback decisions
//!
//! This library classifies failures from external service providers into a
//! fixed taxonomy and derives whether a failed call should be retried and
//! whether the caller should fall back to another provider.
//!
//! ```
//! use failsafe::classifier::ErrorClassifier;
//! use failsafe::config::RetryConfig;
//! use failsafe::error::ErrorCode;
//!
//! let classifier = ErrorClassifier::new(RetryConfig::default());
//! let result = classifier.classify("Request failed: rate limit exceeded", None);
//! assert_eq!(result.code, ErrorCode::RateLimit);
//! assert!(result.retryable);
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod logging;

pub use classifier::ErrorClassifier;
pub use config::RetryConfig;
pub use error::{ClassifiedError, ErrorClassification, ErrorCode, RawError};

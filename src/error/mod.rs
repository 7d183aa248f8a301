//! Provider error taxonomy
//!
//! This module defines the canonical error codes, the static table that maps each
//! code to a classification and default retry/fallback verdicts, and the text
//! patterns used to infer a code when a failure arrives without one.

pub mod classification;
pub mod code;
pub mod detector;
pub mod taxonomy;

// Re-export main types for convenient access
pub use classification::{ClassifiedError, ClassifyInput, RawError};
pub use code::{ErrorClassification, ErrorCode, ParseErrorCodeError};
pub use detector::{ErrorDetector, ErrorPattern};
pub use taxonomy::TaxonomyEntry;

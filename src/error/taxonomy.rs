//! Static taxonomy table
//!
//! Maps every [`ErrorCode`] to its classification and to the default retry and
//! fallback verdicts. Rows are stored in the same order as the enum, so lookup is
//! a direct index.

use super::ErrorClassification as C;
use super::{ErrorClassification, ErrorCode};

/// Classification and default verdicts for one error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyEntry {
    /// Coarse category of the error.
    pub classification: ErrorClassification,
    /// Whether the same request is worth reattempting against the same provider.
    pub retryable: bool,
    /// Whether the next attempt should go to a different provider.
    pub should_fallback: bool,
}

impl TaxonomyEntry {
    const fn new(
        classification: ErrorClassification,
        retryable: bool,
        should_fallback: bool,
    ) -> Self {
        Self {
            classification,
            retryable,
            should_fallback,
        }
    }
}

// Credentials never heal on retry. A rejected key may still be accepted by
// another provider; denied permissions and generic auth failures recur everywhere.
// Internal errors retry in place without rerouting. Of the quality codes only
// malformed payloads are retryable.
const TAXONOMY: [(ErrorCode, TaxonomyEntry); 20] = [
    (ErrorCode::Timeout, TaxonomyEntry::new(C::Timeout, true, true)),
    (ErrorCode::ConnectionError, TaxonomyEntry::new(C::Network, true, true)),
    (ErrorCode::DnsError, TaxonomyEntry::new(C::Network, true, true)),
    (ErrorCode::AuthenticationError, TaxonomyEntry::new(C::Authentication, false, false)),
    (ErrorCode::InvalidApiKey, TaxonomyEntry::new(C::Authentication, false, true)),
    (ErrorCode::PermissionDenied, TaxonomyEntry::new(C::Authentication, false, false)),
    (ErrorCode::RateLimit, TaxonomyEntry::new(C::RateLimit, true, true)),
    (ErrorCode::QuotaExceeded, TaxonomyEntry::new(C::RateLimit, false, true)),
    (ErrorCode::ModelNotFound, TaxonomyEntry::new(C::Model, false, true)),
    (ErrorCode::ModelOverloaded, TaxonomyEntry::new(C::Model, true, true)),
    (ErrorCode::ContextLengthExceeded, TaxonomyEntry::new(C::Model, false, true)),
    (ErrorCode::InvalidResponse, TaxonomyEntry::new(C::Quality, true, true)),
    (ErrorCode::ParseError, TaxonomyEntry::new(C::Quality, true, true)),
    (ErrorCode::EmptyResponse, TaxonomyEntry::new(C::Quality, true, true)),
    (ErrorCode::QualityThresholdNotMet, TaxonomyEntry::new(C::Quality, false, true)),
    (ErrorCode::LatencyTooHigh, TaxonomyEntry::new(C::Quality, false, true)),
    (ErrorCode::InternalError, TaxonomyEntry::new(C::System, true, false)),
    (ErrorCode::ServiceUnavailable, TaxonomyEntry::new(C::System, true, true)),
    (ErrorCode::UnknownError, TaxonomyEntry::new(C::Unknown, false, false)),
    (ErrorCode::CustomError, TaxonomyEntry::new(C::Unknown, false, false)),
];

/// Entry used when a code has no row. Matches `UNKNOWN_ERROR`.
pub const FALLBACK_ENTRY: TaxonomyEntry = TaxonomyEntry::new(C::Unknown, false, false);

/// Looks up the taxonomy entry for `code`.
///
/// Returns `None` only if the table row at the code's position belongs to a
/// different code, which would be a definition bug.
pub fn lookup(code: ErrorCode) -> Option<TaxonomyEntry> {
    TAXONOMY
        .get(code as usize)
        .filter(|(row_code, _)| *row_code == code)
        .map(|(_, entry)| *entry)
}

/// Iterates over every row of the table in code order.
pub fn entries() -> impl Iterator<Item = (ErrorCode, TaxonomyEntry)> {
    TAXONOMY.iter().copied()
}

impl ErrorCode {
    /// Returns this code's taxonomy entry, or [`FALLBACK_ENTRY`] if it has none.
    pub fn taxonomy(&self) -> TaxonomyEntry {
        lookup(*self).unwrap_or(FALLBACK_ENTRY)
    }

    /// Returns this code's coarse classification.
    pub fn classification(&self) -> ErrorClassification {
        self.taxonomy().classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_total() {
        for code in ErrorCode::ALL {
            assert!(lookup(code).is_some(), "{code} has no taxonomy entry");
        }
    }

    #[test]
    fn test_rows_follow_enum_order() {
        for (index, (code, _)) in entries().enumerate() {
            assert_eq!(code as usize, index);
            assert_eq!(ErrorCode::ALL[index], code);
        }
    }

    #[test]
    fn test_network_family() {
        for code in [ErrorCode::ConnectionError, ErrorCode::DnsError] {
            let entry = code.taxonomy();
            assert_eq!(entry.classification, ErrorClassification::Network);
            assert!(entry.retryable);
            assert!(entry.should_fallback);
        }
        assert_eq!(ErrorCode::Timeout.classification(), ErrorClassification::Timeout);
    }

    #[test]
    fn test_authentication_family() {
        let auth = ErrorCode::AuthenticationError.taxonomy();
        assert!(!auth.retryable);
        assert!(!auth.should_fallback);

        let key = ErrorCode::InvalidApiKey.taxonomy();
        assert!(!key.retryable);
        assert!(key.should_fallback);

        let perm = ErrorCode::PermissionDenied.taxonomy();
        assert!(!perm.retryable);
        assert!(!perm.should_fallback);
    }

    #[test]
    fn test_quality_family() {
        for code in [
            ErrorCode::InvalidResponse,
            ErrorCode::ParseError,
            ErrorCode::EmptyResponse,
        ] {
            let entry = code.taxonomy();
            assert_eq!(entry.classification, ErrorClassification::Quality);
            assert!(entry.retryable);
            assert!(entry.should_fallback);
        }
        for code in [ErrorCode::QualityThresholdNotMet, ErrorCode::LatencyTooHigh] {
            let entry = code.taxonomy();
            assert_eq!(entry.classification, ErrorClassification::Quality);
            assert!(!entry.retryable);
            assert!(entry.should_fallback);
        }
    }

    #[test]
    fn test_internal_error_retries_without_fallback() {
        let entry = ErrorCode::InternalError.taxonomy();
        assert_eq!(entry.classification, ErrorClassification::System);
        assert!(entry.retryable);
        assert!(!entry.should_fallback);
    }

    #[test]
    fn test_unknown_and_custom_match_fallback_entry() {
        assert_eq!(ErrorCode::UnknownError.taxonomy(), FALLBACK_ENTRY);
        assert_eq!(ErrorCode::CustomError.taxonomy(), FALLBACK_ENTRY);
    }
}

//! Message-based error code inference
//!
//! When a provider failure arrives without an explicit code, the code is recovered
//! from its text. Each [`ErrorPattern`] matches a set of case-insensitive fragments;
//! an [`ErrorDetector`] evaluates its patterns in order and the first match wins.
//!
//! Two rule sets exist: one for structured errors (name plus message) and one for
//! bare message strings. They overlap but are not identical, and they default to
//! different codes when nothing matches.

use regex::{Regex, RegexBuilder};

use super::ErrorCode;

/// Ordered rules for structured errors: `(fragments, code, description)`.
const STRUCTURED_ERROR_RULES: &[(&[&str], ErrorCode, &str)] = &[
    (&["timeout"], ErrorCode::Timeout, "Timeout"),
    (
        &["rate limit", "rate_limit", "too many requests"],
        ErrorCode::RateLimit,
        "Rate limit",
    ),
    (
        &["authentication", "unauthorized"],
        ErrorCode::AuthenticationError,
        "Authentication failure",
    ),
    (&["invalid api key"], ErrorCode::InvalidApiKey, "Invalid API key"),
    (
        &["quota", "exceeded", "insufficient credits"],
        ErrorCode::QuotaExceeded,
        "Quota exceeded",
    ),
    (&["overloaded"], ErrorCode::ModelOverloaded, "Model overloaded"),
    (
        &["context length", "max tokens", "token limit"],
        ErrorCode::ContextLengthExceeded,
        "Context length exceeded",
    ),
    (
        &["connection", "network", "econnrefused", "enotfound"],
        ErrorCode::ConnectionError,
        "Connection error",
    ),
    (
        &["503", "service unavailable"],
        ErrorCode::ServiceUnavailable,
        "Service unavailable",
    ),
    (
        &["empty response", "no response"],
        ErrorCode::EmptyResponse,
        "Empty response",
    ),
    (&["invalid response"], ErrorCode::InvalidResponse, "Invalid response"),
    (&["parse"], ErrorCode::ParseError, "Parse failure"),
    (
        &["permission", "forbidden", "403"],
        ErrorCode::PermissionDenied,
        "Permission denied",
    ),
    (
        &["model not found", "404"],
        ErrorCode::ModelNotFound,
        "Model not found",
    ),
];

/// Ordered rules for bare message strings: `(fragments, code, description)`.
const MESSAGE_RULES: &[(&[&str], ErrorCode, &str)] = &[
    (&["timeout"], ErrorCode::Timeout, "Timeout"),
    (
        &["rate limit", "rate_limit", "too many requests"],
        ErrorCode::RateLimit,
        "Rate limit",
    ),
    (
        &["authentication", "unauthorized"],
        ErrorCode::AuthenticationError,
        "Authentication failure",
    ),
    (&["api key"], ErrorCode::InvalidApiKey, "Invalid API key"),
    (
        &["quota", "exceeded", "insufficient credits"],
        ErrorCode::QuotaExceeded,
        "Quota exceeded",
    ),
    (&["overloaded"], ErrorCode::ModelOverloaded, "Model overloaded"),
    (
        &["context length", "max tokens", "token limit"],
        ErrorCode::ContextLengthExceeded,
        "Context length exceeded",
    ),
    (
        &["connection", "network", "econnrefused", "enotfound"],
        ErrorCode::ConnectionError,
        "Connection error",
    ),
    (
        &["503", "service unavailable", "unavailable"],
        ErrorCode::ServiceUnavailable,
        "Service unavailable",
    ),
    (&["empty", "no response"], ErrorCode::EmptyResponse, "Empty response"),
    (&["invalid response"], ErrorCode::InvalidResponse, "Invalid response"),
    (&["parse"], ErrorCode::ParseError, "Parse failure"),
    (
        &["permission", "forbidden", "403"],
        ErrorCode::PermissionDenied,
        "Permission denied",
    ),
    (
        &["model not found", "404"],
        ErrorCode::ModelNotFound,
        "Model not found",
    ),
];

/// A pattern that maps matching error text to an error code.
#[derive(Debug, Clone)]
pub struct ErrorPattern {
    /// The compiled, case-insensitive regex.
    regex: Regex,
    /// The code to assign when this pattern matches.
    code: ErrorCode,
    /// A human-readable description of what this pattern detects.
    description: String,
}

impl ErrorPattern {
    /// Creates a new error pattern from a regex pattern string.
    ///
    /// The pattern is compiled case-insensitively.
    ///
    /// # Panics
    /// Panics if the regex pattern is invalid.
    pub fn new(pattern: &str, code: ErrorCode, description: impl Into<String>) -> Self {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("Invalid regex pattern");
        Self::with_regex(regex, code, description)
    }

    /// Creates a pattern that matches when any of `fragments` occurs as a literal
    /// substring, ignoring case.
    pub fn from_fragments(
        fragments: &[&str],
        code: ErrorCode,
        description: impl Into<String>,
    ) -> Self {
        let alternation = fragments
            .iter()
            .map(|fragment| regex::escape(fragment))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(&alternation, code, description)
    }

    /// Creates a new error pattern with a pre-compiled regex.
    pub fn with_regex(regex: Regex, code: ErrorCode, description: impl Into<String>) -> Self {
        Self {
            regex,
            code,
            description: description.into(),
        }
    }

    /// Returns the regex pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the code this pattern assigns.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Checks if this pattern matches the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Finds the first match in the text and returns the matched string.
    pub fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

/// Infers error codes from text using an ordered list of patterns.
#[derive(Debug, Clone)]
pub struct ErrorDetector {
    /// Patterns in priority order.
    patterns: Vec<ErrorPattern>,
    /// Code returned when no pattern matches.
    default_code: ErrorCode,
}

impl ErrorDetector {
    /// Detector for structured errors. Unmatched input infers `UNKNOWN_ERROR`.
    pub fn for_structured_errors() -> Self {
        Self::from_rules(STRUCTURED_ERROR_RULES, ErrorCode::UnknownError)
    }

    /// Detector for bare message strings. Unmatched input infers `CUSTOM_ERROR`.
    pub fn for_messages() -> Self {
        Self::from_rules(MESSAGE_RULES, ErrorCode::CustomError)
    }

    /// Creates a detector with custom patterns and default code.
    pub fn with_patterns(patterns: Vec<ErrorPattern>, default_code: ErrorCode) -> Self {
        Self {
            patterns,
            default_code,
        }
    }

    fn from_rules(rules: &[(&[&str], ErrorCode, &str)], default_code: ErrorCode) -> Self {
        let patterns = rules
            .iter()
            .map(|(fragments, code, description)| {
                ErrorPattern::from_fragments(fragments, *code, *description)
            })
            .collect();
        Self::with_patterns(patterns, default_code)
    }

    /// Appends a pattern. It is evaluated after every existing pattern.
    pub fn add_pattern(&mut self, pattern: ErrorPattern) {
        self.patterns.push(pattern);
    }

    /// Returns the number of patterns configured.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Returns a reference to all configured patterns.
    pub fn patterns(&self) -> &[ErrorPattern] {
        &self.patterns
    }

    /// Returns the code inferred when nothing matches.
    pub fn default_code(&self) -> ErrorCode {
        self.default_code
    }

    /// Returns the first pattern matching `text`, if any.
    pub fn detect(&self, text: &str) -> Option<&ErrorPattern> {
        self.patterns.iter().find(|pattern| pattern.matches(text))
    }

    /// Infers the error code for `text`, falling back to the default code.
    pub fn infer(&self, text: &str) -> ErrorCode {
        match self.detect(text) {
            Some(pattern) => {
                tracing::trace!(
                    code = %pattern.code,
                    rule = pattern.description(),
                    matched = pattern.find(text).unwrap_or_default(),
                    "inferred error code from text"
                );
                pattern.code
            }
            None => self.default_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_sets_have_same_precedence_order() {
        let structured: Vec<ErrorCode> = STRUCTURED_ERROR_RULES.iter().map(|r| r.1).collect();
        let messages: Vec<ErrorCode> = MESSAGE_RULES.iter().map(|r| r.1).collect();
        assert_eq!(structured, messages);
    }

    #[test]
    fn test_defaults_differ() {
        assert_eq!(
            ErrorDetector::for_structured_errors().default_code(),
            ErrorCode::UnknownError
        );
        assert_eq!(ErrorDetector::for_messages().default_code(), ErrorCode::CustomError);
    }

    #[test]
    fn test_pattern_from_fragments_is_literal_and_case_insensitive() {
        let pattern = ErrorPattern::from_fragments(&["rate.limit"], ErrorCode::RateLimit, "x");
        assert!(pattern.matches("RATE.LIMIT hit"));
        assert!(!pattern.matches("rate limit hit"));
        assert_eq!(pattern.find("a Rate.Limit b"), Some("Rate.Limit"));
    }

    #[test]
    fn test_first_match_wins() {
        let detector = ErrorDetector::for_messages();
        assert_eq!(detector.infer("timeout while waiting on rate limit"), ErrorCode::Timeout);
        assert_eq!(detector.infer("rate limit exceeded"), ErrorCode::RateLimit);
        assert_eq!(detector.infer("unauthorized: invalid api key"), ErrorCode::AuthenticationError);
    }

    #[test]
    fn test_message_rules() {
        let detector = ErrorDetector::for_messages();
        let cases = [
            ("Request timeout", ErrorCode::Timeout),
            ("429 Too Many Requests", ErrorCode::RateLimit),
            ("missing api key", ErrorCode::InvalidApiKey),
            ("insufficient credits", ErrorCode::QuotaExceeded),
            ("Model is overloaded", ErrorCode::ModelOverloaded),
            ("max tokens reached", ErrorCode::ContextLengthExceeded),
            ("connect ECONNREFUSED 127.0.0.1:443", ErrorCode::ConnectionError),
            ("upstream unavailable", ErrorCode::ServiceUnavailable),
            ("empty completion", ErrorCode::EmptyResponse),
            ("invalid response body", ErrorCode::InvalidResponse),
            ("failed to parse JSON", ErrorCode::ParseError),
            ("403 Forbidden", ErrorCode::PermissionDenied),
            ("model not found: gpt-9", ErrorCode::ModelNotFound),
            ("something odd happened", ErrorCode::CustomError),
        ];
        for (text, expected) in cases {
            assert_eq!(detector.infer(text), expected, "text: {text}");
        }
    }

    #[test]
    fn test_structured_rules_are_narrower() {
        let detector = ErrorDetector::for_structured_errors();
        assert_eq!(detector.infer("Error missing api key"), ErrorCode::UnknownError);
        assert_eq!(detector.infer("Error invalid api key"), ErrorCode::InvalidApiKey);
        assert_eq!(detector.infer("Error upstream unavailable"), ErrorCode::UnknownError);
        assert_eq!(detector.infer("Error empty completion"), ErrorCode::UnknownError);
        assert_eq!(detector.infer("Error request timed out"), ErrorCode::UnknownError);
    }

    #[test]
    fn test_timed_out_does_not_outrank_rate_limit() {
        let text = "Error rate limit: request timed out";
        assert_eq!(
            ErrorDetector::for_structured_errors().infer(text),
            ErrorCode::RateLimit
        );
        assert_eq!(ErrorDetector::for_messages().infer(text), ErrorCode::RateLimit);
    }

    #[test]
    fn test_exceeded_outranks_context_length() {
        let detector = ErrorDetector::for_messages();
        assert_eq!(detector.infer("context length exceeded"), ErrorCode::QuotaExceeded);
        assert_eq!(
            detector.infer("maximum context length is 8192 tokens"),
            ErrorCode::ContextLengthExceeded
        );
    }

    #[test]
    fn test_add_pattern_is_evaluated_last() {
        let mut detector = ErrorDetector::for_messages();
        let before = detector.pattern_count();
        detector.add_pattern(ErrorPattern::new(
            r"latency\s+budget",
            ErrorCode::LatencyTooHigh,
            "Latency budget blown",
        ));
        assert_eq!(detector.pattern_count(), before + 1);
        assert_eq!(detector.infer("latency  budget blown"), ErrorCode::LatencyTooHigh);
        assert_eq!(detector.infer("latency budget timeout"), ErrorCode::Timeout);
    }

    #[test]
    fn test_custom_detector() {
        let detector = ErrorDetector::with_patterns(
            vec![ErrorPattern::from_fragments(
                &["nxdomain"],
                ErrorCode::DnsError,
                "DNS lookup failure",
            )],
            ErrorCode::UnknownError,
        );
        assert_eq!(detector.infer("NXDOMAIN api.example.com"), ErrorCode::DnsError);
        assert_eq!(detector.infer("timeout"), ErrorCode::UnknownError);
        assert_eq!(detector.patterns()[0].description(), "DNS lookup failure");
    }
}

//! Classification of responses too short to hold a registration record.

use crate::error::{ParseError, Result};

use super::normalize::line_count;
use super::result::{FailureKind, ParseOutcome, ParseResult};

/// Responses with fewer line breaks than this are classified, not extracted.
pub const MIN_RECORD_LINES: usize = 5;

/// Phrases registries use to say a domain is not registered.
///
/// Lowercase; matched by substring containment against the lowercased response.
pub const NOT_FOUND_PHRASES: &[&str] = &[
    "no match",
    "not found",
    "no entries found",
    "no data found",
    "no object found",
    "nothing found",
    "no such domain",
    "not registered",
    "not been registered",
    "no matching record",
    "object does not exist",
    "the queried object does not exist",
    "domain name not known",
    "domain unknown",
    "status: free",
    "status: available",
    "is available for registration",
];

/// Phrases signalling a rate limit in the body of a response.
pub const QUOTA_PHRASES: &[&str] = &[
    "limit exceeded",
    "quota exceeded",
    "try again later",
    "please try again",
    "exceeded the maximum allowable number",
    "can temporarily not be answered",
    "queried interval is too short",
    "number of allowed queries exceeded",
    "too many requests",
];

const ERROR_TOKEN: &str = "error";

/// Terminal classification of a short response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedFailure {
    NoSuchDomain { response: String },
    QuotaExceeded { response: String },
    Unparseable { response: String },
}

impl ClassifiedFailure {
    pub fn response(&self) -> &str {
        match self {
            ClassifiedFailure::NoSuchDomain { response }
            | ClassifiedFailure::QuotaExceeded { response }
            | ClassifiedFailure::Unparseable { response } => response,
        }
    }

    /// Maps the classification to the caller-facing outcome.
    ///
    /// `NoSuchDomain` is never an error. The other two are errors in strict
    /// mode and marked, field-less results in lenient mode.
    pub fn resolve(self, tld: &str, lenient: bool) -> Result<ParseOutcome> {
        match self {
            ClassifiedFailure::NoSuchDomain { response } => Ok(ParseOutcome::NotFound { response }),
            ClassifiedFailure::QuotaExceeded { response } if lenient => Ok(ParseOutcome::Found(
                ParseResult::degraded(tld, FailureKind::QuotaExceeded, response),
            )),
            ClassifiedFailure::Unparseable { response } if lenient => Ok(ParseOutcome::Found(
                ParseResult::degraded(tld, FailureKind::Unparseable, response),
            )),
            ClassifiedFailure::QuotaExceeded { response } => {
                Err(ParseError::QuotaExceeded { response })
            }
            ClassifiedFailure::Unparseable { response } => {
                Err(ParseError::Unparseable { response })
            }
        }
    }
}

pub fn is_short(text: &str) -> bool {
    line_count(text) < MIN_RECORD_LINES
}

/// Classifies a short response. First match wins: not-found phrases, then
/// the `error` token, then quota phrases; anything else is unparseable.
pub fn classify_short(text: &str) -> ClassifiedFailure {
    let lower = text.trim().to_lowercase();
    let response = text.to_string();

    if contains_any(&lower, NOT_FOUND_PHRASES) {
        return ClassifiedFailure::NoSuchDomain { response };
    }

    if lower.contains(ERROR_TOKEN) {
        return ClassifiedFailure::Unparseable { response };
    }

    if contains_any(&lower, QUOTA_PHRASES) {
        return ClassifiedFailure::QuotaExceeded { response };
    }

    ClassifiedFailure::Unparseable { response }
}

fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| haystack.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_short() {
        assert!(is_short("a\nb\nc"));
        assert!(is_short("1\n2\n3\n4\n5"));
        assert!(!is_short("1\n2\n3\n4\n5\n6"));
    }

    #[test]
    fn test_no_match_is_not_found() {
        let c = classify_short("\nNo match for domain \"EXAMPLE.TEST\".\n");
        assert!(matches!(c, ClassifiedFailure::NoSuchDomain { .. }));
    }

    #[test]
    fn test_not_found_phrase_beats_error_token() {
        let c = classify_short("Error: domain not found");
        assert!(matches!(c, ClassifiedFailure::NoSuchDomain { .. }));
    }

    #[test]
    fn test_error_token_beats_quota_phrase() {
        let c = classify_short("ERROR 55: please try again");
        assert!(matches!(c, ClassifiedFailure::Unparseable { .. }));
    }

    #[test]
    fn test_quota_phrase() {
        let c = classify_short("Query rate limit exceeded.\nTry again later");
        assert!(matches!(c, ClassifiedFailure::QuotaExceeded { .. }));
    }

    #[test]
    fn test_unknown_short_response() {
        let c = classify_short("Domain: syswow.64-b.it\nStatus: UNASSIGNABLE");
        assert!(matches!(c, ClassifiedFailure::Unparseable { .. }));
        assert_eq!(c.response(), "Domain: syswow.64-b.it\nStatus: UNASSIGNABLE");
    }

    #[test]
    fn test_resolve_strict() {
        let err = ClassifiedFailure::QuotaExceeded {
            response: "r".to_string(),
        }
        .resolve("com", false)
        .unwrap_err();
        assert!(err.is_quota_exceeded());

        let err = ClassifiedFailure::Unparseable {
            response: "r".to_string(),
        }
        .resolve("com", false)
        .unwrap_err();
        assert!(matches!(err, ParseError::Unparseable { .. }));
    }

    #[test]
    fn test_resolve_lenient() {
        let outcome = ClassifiedFailure::QuotaExceeded {
            response: "r".to_string(),
        }
        .resolve("de", true)
        .unwrap();
        let result = outcome.into_result().unwrap();
        assert_eq!(result.tld(), "de");
        assert_eq!(result.diagnostic().unwrap().kind, FailureKind::QuotaExceeded);
        assert_eq!(result.diagnostic().unwrap().response, "r");
    }

    #[test]
    fn test_not_found_ignores_mode() {
        for lenient in [false, true] {
            let outcome = ClassifiedFailure::NoSuchDomain {
                response: "no match".to_string(),
            }
            .resolve("com", lenient)
            .unwrap();
            assert!(outcome.is_not_found());
        }
    }
}

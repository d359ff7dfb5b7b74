//! Removal of protocol noise from raw WHOIS text.
//!
//! Trailing whitespace is left alone on purpose: several registry patterns
//! anchor on the column alignment of the raw output. Captures are trimmed at
//! extraction time instead.

use crate::config::ParseOptions;
use crate::error::{ParseError, Result};

const QUOTA_MARKER: &str = "quota exceeded";
const COMMENT_PREFIX: char = '%';
const REDACTED_MARKER: &str = "REDACTED FOR PRIVACY";
const RDDS_NOTICE: &str = "Please query the RDDS service of the Registrar of Record";
const TERMS_OF_USE_PREFIX: &str = "Terms of Use:";

/// Cleans a raw response line by line.
///
/// Fails with [`ParseError::QuotaExceeded`] as soon as any line mentions
/// "quota exceeded" in any letter case; some servers put that notice inside the
/// `%` comment banner, so the check runs before comments are dropped.
pub fn normalize(raw: &str, options: &ParseOptions) -> Result<String> {
    let mut kept: Vec<&str> = Vec::new();

    for line in raw.split('\n') {
        if line.to_lowercase().contains(QUOTA_MARKER) {
            return Err(ParseError::QuotaExceeded {
                response: raw.to_string(),
            });
        }

        if options.strip_comments && line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        if !options.keep_redacted && line.contains(REDACTED_MARKER) {
            continue;
        }

        if line.contains(RDDS_NOTICE) || line.starts_with(TERMS_OF_USE_PREFIX) {
            continue;
        }

        kept.push(line.trim_end_matches('\r'));
    }

    Ok(kept.join("\n"))
}

/// Number of line breaks in `text`, the measure used for short-response detection.
pub fn line_count(text: &str) -> usize {
    text.matches('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "% Comment banner\r\n\
Domain Name: EXAMPLE.COM\r\n\
Registrant Name: REDACTED FOR PRIVACY\r\n\
Registrar: Example Registrar, Inc.   \r\n\
Registrant Email: Please query the RDDS service of the Registrar of Record identified in this output\r\n\
Terms of Use: You agree not to misuse this data\r\n\
Name Server: NS1.EXAMPLE.COM\r\n";

    #[test]
    fn test_default_cleanup() {
        let cleaned = normalize(SAMPLE, &ParseOptions::default()).unwrap();
        assert_eq!(
            cleaned,
            "% Comment banner\n\
Domain Name: EXAMPLE.COM\n\
Registrar: Example Registrar, Inc.   \n\
Name Server: NS1.EXAMPLE.COM\n"
        );
    }

    #[test]
    fn test_strip_comments() {
        let opts = ParseOptions::new().with_strip_comments(true);
        let cleaned = normalize(SAMPLE, &opts).unwrap();
        assert!(!cleaned.contains("Comment banner"));
        assert!(cleaned.starts_with("Domain Name:"));
    }

    #[test]
    fn test_keep_redacted() {
        let opts = ParseOptions::new().with_keep_redacted(true);
        let cleaned = normalize(SAMPLE, &opts).unwrap();
        assert!(cleaned.contains("Registrant Name: REDACTED FOR PRIVACY"));
    }

    #[test]
    fn test_trailing_spaces_preserved() {
        let cleaned = normalize("Registrar: Foo   \r\r", &ParseOptions::default()).unwrap();
        assert_eq!(cleaned, "Registrar: Foo   ");
    }

    #[test]
    fn test_terms_of_use_only_as_prefix() {
        let cleaned = normalize(
            "Terms of Use: none\nSee the Terms of Use: below",
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(cleaned, "See the Terms of Use: below");
    }

    #[test]
    fn test_quota_on_first_line() {
        let raw = "% Quota Exceeded, try again later\nDomain Name: EXAMPLE.COM\n";
        let err = normalize(raw, &ParseOptions::default()).unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(err.response(), Some(raw));
    }

    #[test]
    fn test_quota_on_last_line() {
        let raw = "Domain Name: EXAMPLE.COM\nRegistrar: Foo\nQUOTA EXCEEDED";
        let err = normalize(raw, &ParseOptions::default()).unwrap_err();
        assert!(err.is_quota_exceeded());
    }

    #[test]
    fn test_quota_wins_over_comment_stripping() {
        let opts = ParseOptions::new().with_strip_comments(true);
        let err = normalize("% quota exceeded\nfoo", &opts).unwrap_err();
        assert!(err.is_quota_exceeded());
    }

    #[test]
    fn test_idempotent_on_clean_text() {
        let opts = ParseOptions::new().with_strip_comments(true);
        let once = normalize(SAMPLE, &opts).unwrap();
        let twice = normalize(&once, &opts).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("a\nb\nc"), 2);
        assert_eq!(line_count("a\nb\nc\n"), 3);
    }
}

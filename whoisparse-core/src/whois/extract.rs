//! Pattern-driven field extraction.

use std::collections::BTreeMap;

use regex::Regex;

use super::patterns::{FieldPatterns, PatternTable};

const DNSSEC_MARKER: &str = "DNSSEC:";
const DNSSEC_SIGNED_VALUES: &[&str] = &["signedDelegation", "yes"];

/// Extracted values keyed by field name.
pub type FieldMap = BTreeMap<String, Vec<String>>;

/// Runs the patterns for `tld` (or the `com` fallback) against `text`.
pub fn extract(tld: &str, text: &str, table: &PatternTable) -> FieldMap {
    extract_fields(table.resolve(tld), text)
}

/// Runs every non-meta pattern of `patterns` against `text`.
///
/// Fields without a pattern or without a match get `[""]`, never an empty vec.
pub fn extract_fields(patterns: &FieldPatterns, text: &str) -> FieldMap {
    patterns
        .fields()
        .map(|(name, pattern)| {
            let values = pattern
                .map(|re| find_all(re, text))
                .filter(|values| !values.is_empty())
                .unwrap_or_else(|| vec![String::new()]);
            (name.to_string(), values)
        })
        .collect()
}

/// All non-overlapping matches, trimmed.
///
/// Patterns with capture groups yield their first participating group,
/// patterns without groups yield the whole match. A capture spanning several
/// lines (an indented block such as a name server list) yields one value per
/// non-blank line.
pub fn find_all(re: &Regex, text: &str) -> Vec<String> {
    let mut values = Vec::new();
    if re.captures_len() > 1 {
        for caps in re.captures_iter(text) {
            let value = caps
                .iter()
                .skip(1)
                .flatten()
                .next()
                .map_or("", |m| m.as_str());
            push_value(&mut values, value);
        }
    } else {
        for m in re.find_iter(text) {
            push_value(&mut values, m.as_str());
        }
    }
    values
}

fn push_value(values: &mut Vec<String>, value: &str) {
    if value.trim().contains('\n') {
        values.extend(
            value
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    } else {
        values.push(value.trim().to_string());
    }
}

/// True when the first line after the first `DNSSEC:` marker is exactly
/// `signedDelegation` or `yes` once trimmed.
pub fn dnssec_present(text: &str) -> bool {
    text.split_once(DNSSEC_MARKER)
        .and_then(|(_, after)| after.split('\n').next())
        .map(|value| DNSSEC_SIGNED_VALUES.contains(&value.trim()))
        .unwrap_or(false)
}

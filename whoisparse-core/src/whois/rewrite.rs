//! Text rewrites applied before generic extraction.
//!
//! Two response shapes need the scanned text adjusted first:
//!
//! - Responses carrying the IANA `source:` marker. Referral wrappers put the
//!   real record after the marker; the permanent IANA-held domains
//!   (example.com, example.net, ...) end with it and use the IANA root layout.
//! - Legacy registries that echo a `Server Name:` banner ahead of the record.

use once_cell::sync::Lazy;
use regex::Regex;

use super::extract::{find_all, FieldMap};

/// Marker line emitted by IANA-sourced records; the spacing is significant.
pub const IANA_SOURCE_MARKER: &str = "source:       IANA";

const DOMAIN_NAME_LABEL: &str = "Domain Name:";

static IANA_ROOT_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("domain_name", r"domain:\s?([^\n]+)"),
        ("registrar", r"organisation:\s?([^\n]+)"),
        ("creation_date", r"created:\s?([^\n]+)"),
    ]
    .into_iter()
    .map(|(field, pattern)| (field, Regex::new(pattern).expect("Invalid IANA root regex")))
    .collect()
});

static SERVER_NAME_BANNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Server Name:").expect("Invalid Server Name regex"));

/// How a response containing [`IANA_SOURCE_MARKER`] should be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IanaSource {
    /// Continue extraction on this text (the part after the first marker).
    Body(String),
    /// The response is an IANA root record; overlay [`overlay_iana_root`].
    RootRecord,
}

/// Inspects `text` for the IANA source marker.
pub fn split_iana_source(text: &str) -> Option<IanaSource> {
    if !text.contains(IANA_SOURCE_MARKER) {
        return None;
    }

    let parts: Vec<&str> = text.split(IANA_SOURCE_MARKER).collect();
    if parts.len() > 2 {
        return Some(IanaSource::Body(parts[1..].join(IANA_SOURCE_MARKER)));
    }

    let after = parts.get(1).copied().unwrap_or_default();
    if !after.trim().is_empty() {
        return Some(IanaSource::Body(after.to_string()));
    }

    Some(IanaSource::RootRecord)
}

/// Overwrites `fields` with IANA root-layout matches, only where they match.
pub fn overlay_iana_root(fields: &mut FieldMap, text: &str) -> usize {
    let mut overlaid = 0;
    for (field, re) in IANA_ROOT_PATTERNS.iter() {
        let values = find_all(re, text);
        if !values.is_empty() {
            fields.insert(field.to_string(), values);
            overlaid += 1;
        }
    }
    overlaid
}

/// True when a legacy `Server Name:` banner is present (any letter case).
pub fn has_server_banner(text: &str) -> bool {
    SERVER_NAME_BANNER.is_match(text)
}

/// Drops everything before the first `Domain Name:` when a `Server Name:`
/// banner is present. Text without the banner, or without a `Domain Name:`
/// label to anchor on, is returned unchanged.
pub fn strip_server_banner(text: &str) -> &str {
    if !has_server_banner(text) {
        return text;
    }

    match text.find(DOMAIN_NAME_LABEL) {
        Some(start) => &text[start..],
        None => text,
    }
}

//! Domain normalization and TLD identification.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::patterns::PatternTable;
use crate::error::{ParseError, Result};

/// Reduces user input such as `https://www.Example.com./path` to
/// `example.com`.
///
/// Lowercases, then drops an `http(s)://` scheme, any path, a leading `www.`
/// and one trailing root dot. The result must contain a dot and consist of
/// non-empty ASCII alphanumeric/hyphen labels that neither start nor end with
/// a hyphen; anything else is [`ParseError::InvalidDomain`].
pub fn normalize_domain(domain: &str) -> Result<String> {
    let domain = domain.trim().to_lowercase();

    let domain = domain
        .strip_prefix("http://")
        .or_else(|| domain.strip_prefix("https://"))
        .unwrap_or(&domain);

    let domain = domain.split('/').next().unwrap_or(domain);
    let domain = domain.strip_prefix("www.").unwrap_or(domain);
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    if domain.is_empty() || !domain.contains('.') {
        return Err(ParseError::InvalidDomain(domain.to_string()));
    }

    let valid = domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !valid {
        return Err(ParseError::InvalidDomain(domain.to_string()));
    }

    for label in domain.split('.') {
        if label.is_empty() || label.starts_with('-') || label.ends_with('-') {
            return Err(ParseError::InvalidDomain(domain.to_string()));
        }
    }

    Ok(domain.to_string())
}

/// A lowercase domain suffix used as a pattern table key, e.g. `com` or `co.uk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tld(String);

impl Tld {
    pub fn new(tld: &str) -> Self {
        Self(tld.trim().trim_matches('.').to_lowercase())
    }

    /// Picks the longest suffix of `domain` that has an entry in `table`
    /// (`co.uk` wins over `uk`), or the last label when none does.
    pub fn for_domain(domain: &str, table: &PatternTable) -> Result<Self> {
        let domain = normalize_domain(domain)?;
        let labels: Vec<&str> = domain.split('.').collect();

        for start in 1..labels.len() {
            let candidate = labels[start..].join(".");
            if table.contains(&candidate) {
                return Ok(Self(candidate));
            }
        }

        let last = labels.last().copied().unwrap_or_default();
        Ok(Self(last.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Tld {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

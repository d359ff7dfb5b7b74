use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which failure a lenient-mode result stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    QuotaExceeded,
    Unparseable,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::QuotaExceeded => write!(f, "WhoisQuotaExceeded"),
            FailureKind::Unparseable => write!(f, "FailedParsingWhoisOutput"),
        }
    }
}

/// Marker attached to a result produced in lenient mode in place of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: FailureKind,
    pub response: String,
}

/// Fields extracted from one WHOIS response.
///
/// Every field defined for the TLD is present. A field that was defined but
/// not found holds a single empty string, so `values[0]` is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    tld: String,
    dnssec_present: bool,
    fields: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    diagnostic: Option<Diagnostic>,
}

impl ParseResult {
    pub(crate) fn new(
        tld: impl Into<String>,
        dnssec_present: bool,
        fields: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            tld: tld.into(),
            dnssec_present,
            fields,
            diagnostic: None,
        }
    }

    pub(crate) fn degraded(tld: impl Into<String>, kind: FailureKind, response: String) -> Self {
        Self {
            tld: tld.into(),
            dnssec_present: false,
            fields: BTreeMap::new(),
            diagnostic: Some(Diagnostic { kind, response }),
        }
    }

    pub fn tld(&self) -> &str {
        &self.tld
    }

    pub fn dnssec_present(&self) -> bool {
        self.dnssec_present
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// All matches for a field, or `None` when the TLD does not define it.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// The first match for a field, skipping the empty placeholder.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.diagnostic.is_some()
    }
}

/// Final outcome of parsing a response that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ParseOutcome {
    Found(ParseResult),
    /// The registry reported that the domain does not exist.
    NotFound { response: String },
}

impl ParseOutcome {
    pub fn as_result(&self) -> Option<&ParseResult> {
        match self {
            ParseOutcome::Found(result) => Some(result),
            ParseOutcome::NotFound { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<ParseResult> {
        match self {
            ParseOutcome::Found(result) => Some(result),
            ParseOutcome::NotFound { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ParseOutcome::NotFound { .. })
    }
}

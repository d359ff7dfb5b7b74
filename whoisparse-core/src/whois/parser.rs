use tracing::{debug, instrument, warn};

use super::classify::{classify_short, is_short, ClassifiedFailure};
use super::extract::{dnssec_present, extract};
use super::normalize::{line_count, normalize};
use super::patterns::{PatternTable, BUILTIN_PATTERNS};
use super::result::{ParseOutcome, ParseResult};
use super::rewrite::{
    has_server_banner, overlay_iana_root, split_iana_source, strip_server_banner, IanaSource,
};
use super::tld::Tld;
use crate::config::ParseOptions;
use crate::error::{ParseError, Result};

/// Turns raw WHOIS text into a [`ParseOutcome`] using a pattern table.
///
/// The parser holds no mutable state; one instance can serve any number of
/// threads as long as the table outlives it.
#[derive(Debug, Clone, Copy)]
pub struct WhoisParser<'a> {
    table: &'a PatternTable,
    options: ParseOptions,
}

impl Default for WhoisParser<'static> {
    fn default() -> Self {
        Self::new(&BUILTIN_PATTERNS)
    }
}

impl<'a> WhoisParser<'a> {
    pub fn new(table: &'a PatternTable) -> Self {
        Self {
            table,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn table(&self) -> &'a PatternTable {
        self.table
    }

    /// Parses `raw` as a response for `tld`.
    ///
    /// `tld` is matched against the table in lowercase. Short responses are
    /// classified instead of extracted. Quota and unparseable outcomes are
    /// errors unless the options are lenient.
    #[instrument(skip(self, raw), fields(tld = %tld))]
    pub fn parse(&self, raw: &str, tld: &str) -> Result<ParseOutcome> {
        let lenient = self.options.lenient;
        let tld = Tld::new(tld);
        let tld = tld.as_str();

        if self.table.get(tld).is_some_and(|p| p.is_private_registry()) {
            warn!("Private registry, no public fields to extract");
        }

        let text = match normalize(raw, &self.options) {
            Ok(text) => text,
            Err(ParseError::QuotaExceeded { response }) => {
                self.trace(|| debug!("Quota notice found during cleanup"));
                return ClassifiedFailure::QuotaExceeded { response }.resolve(tld, lenient);
            }
            Err(e) => return Err(e),
        };

        if is_short(&text) {
            self.trace(|| {
                debug!(lines = line_count(&text), response = %text, "Short response")
            });
            return classify_short(&text).resolve(tld, lenient);
        }

        // Some registries put DNSSEC ahead of the Server Name banner, so this
        // runs on the text before any rewrite.
        let dnssec = dnssec_present(&text);

        let body = match split_iana_source(&text) {
            Some(IanaSource::RootRecord) => {
                self.trace(|| debug!("IANA root record"));
                let mut fields = extract(tld, &text, self.table);
                let overlaid = overlay_iana_root(&mut fields, &text);
                self.trace(|| debug!(overlaid, "Applied IANA root fields"));
                return Ok(ParseOutcome::Found(ParseResult::new(tld, dnssec, fields)));
            }
            Some(IanaSource::Body(body)) => {
                self.trace(|| debug!("IANA source marker followed by record body"));
                body
            }
            None => text,
        };

        if has_server_banner(&body) {
            self.trace(|| debug!("Server Name banner, scanning from Domain Name:"));
        }
        let scanned = strip_server_banner(&body);

        let fields = extract(tld, scanned, self.table);
        Ok(ParseOutcome::Found(ParseResult::new(tld, dnssec, fields)))
    }

    /// Parses a response for `domain`, deriving the TLD from the table.
    pub fn parse_domain(&self, raw: &str, domain: &str) -> Result<ParseOutcome> {
        let tld = Tld::for_domain(domain, self.table)?;
        self.trace(|| debug!(domain, tld = %tld, "Resolved TLD"));
        self.parse(raw, tld.as_str())
    }

    fn trace(&self, event: impl FnOnce()) {
        if self.options.verbose {
            event();
        }
    }
}

/// Parses `raw` for `domain` with the built-in pattern table.
pub fn parse_response(raw: &str, domain: &str, options: ParseOptions) -> Result<ParseOutcome> {
    WhoisParser::default()
        .with_options(options)
        .parse_domain(raw, domain)
}

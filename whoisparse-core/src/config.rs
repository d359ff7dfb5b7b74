//! Caller-supplied parse configuration.
//!
//! A [`ParseOptions`] value is built once by the caller and handed to the
//! parser by reference; the parser never changes it.

use serde::{Deserialize, Serialize};

/// Flags controlling how a WHOIS response is cleaned and how failures surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Emit diagnostic tracing events while parsing.
    pub verbose: bool,
    /// Return quota and unparseable outcomes as marked results instead of errors.
    pub lenient: bool,
    /// Drop `%` comment lines before extraction.
    pub strip_comments: bool,
    /// Keep lines carrying the `REDACTED FOR PRIVACY` marker.
    pub keep_redacted: bool,
}

impl ParseOptions {
    /// Creates options with every flag off (strict mode).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn with_strip_comments(mut self, strip: bool) -> Self {
        self.strip_comments = strip;
        self
    }

    pub fn with_keep_redacted(mut self, keep: bool) -> Self {
        self.keep_redacted = keep;
        self
    }

    /// Options suited to batch runs: lenient, comments stripped.
    pub fn batch() -> Self {
        Self {
            lenient: true,
            strip_comments: true,
            ..Self::default()
        }
    }
}

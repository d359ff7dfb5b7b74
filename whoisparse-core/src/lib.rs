pub mod colors;
pub mod config;
pub mod error;
pub mod output;
pub mod whois;

pub use config::ParseOptions;
pub use error::{ParseError, Result};

pub use whois::{
    normalize_domain, parse_response, DomainRecord, FailureKind, ParseOutcome, ParseResult,
    PatternTable, Tld, WhoisParser, BUILTIN_PATTERNS,
};

pub use output::{OutputFormat, OutputFormatter};

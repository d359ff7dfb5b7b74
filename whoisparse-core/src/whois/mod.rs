pub mod classify;
pub mod extract;
pub mod normalize;
mod parser;
pub mod patterns;
mod record;
mod result;
pub mod rewrite;
mod tld;

pub use classify::ClassifiedFailure;
pub use extract::FieldMap;
pub use normalize::normalize;
pub use parser::{parse_response, WhoisParser};
pub use patterns::{
    FieldPatterns, PatternTable, PatternTableBuilder, TldDefinition, BUILTIN_PATTERNS,
};
pub use record::{parse_date, DomainRecord};
pub use result::{Diagnostic, FailureKind, ParseOutcome, ParseResult};
pub use tld::{normalize_domain, Tld};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("WHOIS quota exceeded")]
    QuotaExceeded { response: String },

    #[error("Failed to parse WHOIS output")]
    Unparseable { response: String },

    #[error("Invalid pattern table: {0}")]
    Configuration(String),

    #[error("Invalid pattern for {tld}.{field}: {source}")]
    InvalidPattern {
        tld: String,
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// The cleaned response text, for the failures that carry one.
    pub fn response(&self) -> Option<&str> {
        match self {
            ParseError::QuotaExceeded { response } | ParseError::Unparseable { response } => {
                Some(response)
            }
            _ => None,
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, ParseError::QuotaExceeded { .. })
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

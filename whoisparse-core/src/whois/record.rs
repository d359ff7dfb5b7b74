//! Typed view over an extracted field map.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::result::ParseResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub name: Option<String>,
    pub tld: String,
    pub registrar: Option<String>,
    pub registrant: Option<String>,
    pub registrant_country: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
    pub name_servers: Vec<String>,
    pub statuses: Vec<String>,
    pub emails: Vec<String>,
    pub dnssec: bool,
}

impl DomainRecord {
    pub fn from_result(result: &ParseResult) -> Self {
        DomainRecord {
            name: result.value("domain_name").map(str::to_lowercase),
            tld: result.tld().to_string(),
            registrar: result.value("registrar").map(String::from),
            registrant: result.value("registrant").map(String::from),
            registrant_country: result.value("registrant_country").map(str::to_uppercase),
            creation_date: result.value("creation_date").and_then(parse_date),
            expiration_date: result.value("expiration_date").and_then(parse_date),
            updated_date: result.value("updated_date").and_then(parse_date),
            name_servers: collect_unique(result, "name_servers", |ns| {
                // Glue addresses may follow the host name
                let host = ns.split_whitespace().next().unwrap_or(ns);
                host.trim_end_matches('.').to_lowercase()
            }),
            statuses: collect_unique(result, "status", strip_reference_url),
            emails: collect_unique(result, "emails", str::to_lowercase),
            dnssec: result.dnssec_present(),
        }
    }
}

impl From<&ParseResult> for DomainRecord {
    fn from(result: &ParseResult) -> Self {
        Self::from_result(result)
    }
}

fn collect_unique(
    result: &ParseResult,
    field: &str,
    map: impl Fn(&str) -> String,
) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for raw in result.get(field).unwrap_or_default() {
        if raw.is_empty() {
            continue;
        }
        let value = map(raw.as_str());
        if !value.is_empty() && !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// `clientHold https://icann.org/epp#clientHold` -> `clientHold`. Statuses
/// without a trailing URL are kept whole.
fn strip_reference_url(status: &str) -> String {
    match status.trim().rsplit_once(char::is_whitespace) {
        Some((head, url)) if url.starts_with("http://") || url.starts_with("https://") => {
            head.trim().to_string()
        }
        _ => status.trim().to_string(),
    }
}

/// Parses the date layouts registries commonly use.
pub fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let cleaned = date_str
        .trim()
        .replace(" (UTC)", "")
        .replace(" UTC", "Z")
        .replace(" +0000", "Z");
    let cleaned = cleaned.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%SZ",
        "%Y.%m.%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%d.%m.%Y %H:%M:%S",
        "%d-%b-%Y %H:%M:%S",
    ];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt.and_utc());
        }
    }

    let date_formats = [
        "%Y-%m-%d",
        "%d-%b-%Y",
        "%d-%B-%Y",
        "%d %B %Y",
        "%d %b %Y",
        "%Y.%m.%d",
        "%Y/%m/%d",
        "%d.%m.%Y",
        "%d/%m/%Y",
        "%b %d %Y",
        "%Y%m%d",
    ];
    for fmt in &date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    // JPRS appends the offset name after the date: "2020/01/15 (JST)"
    let head = cleaned.split(" (").next().unwrap_or(cleaned);
    if head != cleaned {
        return parse_date(head);
    }

    None
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Datelike, Timelike};

    use super::*;

    fn result_with(fields: &[(&str, &[&str])]) -> ParseResult {
        let map: BTreeMap<String, Vec<String>> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect();
        ParseResult::new("com", true, map)
    }

    #[test]
    fn test_record_from_result() {
        let result = result_with(&[
            ("domain_name", &["EXAMPLE.COM"]),
            ("registrar", &["Example Registrar, Inc."]),
            ("registrant", &[""]),
            ("registrant_country", &["us"]),
            ("creation_date", &["1995-08-14T04:00:00Z"]),
            ("expiration_date", &["2025-08-13T04:00:00Z"]),
            (
                "name_servers",
                &["A.IANA-SERVERS.NET", "a.iana-servers.net.", "B.IANA-SERVERS.NET"],
            ),
            (
                "status",
                &[
                    "clientDeleteProhibited https://icann.org/epp#clientDeleteProhibited",
                    "clientTransferProhibited https://icann.org/epp#clientTransferProhibited",
                ],
            ),
            ("emails", &["Abuse@Registrar.example", "abuse@registrar.example"]),
        ]);

        let record = DomainRecord::from_result(&result);
        assert_eq!(record.name.as_deref(), Some("example.com"));
        assert_eq!(record.registrar.as_deref(), Some("Example Registrar, Inc."));
        assert_eq!(record.registrant, None);
        assert_eq!(record.registrant_country.as_deref(), Some("US"));
        assert_eq!(record.creation_date.unwrap().year(), 1995);
        assert_eq!(record.expiration_date.unwrap().year(), 2025);
        assert_eq!(record.updated_date, None);
        assert_eq!(record.name_servers, vec!["a.iana-servers.net", "b.iana-servers.net"]);
        assert_eq!(
            record.statuses,
            vec!["clientDeleteProhibited", "clientTransferProhibited"]
        );
        assert_eq!(record.emails, vec!["abuse@registrar.example"]);
        assert!(record.dnssec);
    }

    #[test]
    fn test_record_from_sparse_result() {
        let record = DomainRecord::from(&result_with(&[("domain_name", &[""])]));
        assert_eq!(record.name, None);
        assert!(record.name_servers.is_empty());
        assert_eq!(record.tld, "com");
    }

    #[test]
    fn test_prose_status_and_glue_addresses() {
        let result = result_with(&[
            ("status", &["Registered until expiry date.", "ok https://icann.org/epp#ok"]),
            ("name_servers", &["NS1.EXAMPLE.NET   192.0.2.1", "ns2.example.net"]),
        ]);
        let record = DomainRecord::from_result(&result);
        assert_eq!(record.statuses, vec!["Registered until expiry date.", "ok"]);
        assert_eq!(record.name_servers, vec!["ns1.example.net", "ns2.example.net"]);
    }

    #[test]
    fn test_parse_date_formats() {
        let dt = parse_date("2023-01-15T10:30:00+01:00").unwrap();
        assert_eq!(dt.hour(), 9);

        assert_eq!(parse_date("2020-01-15").unwrap().day(), 15);
        assert_eq!(parse_date("15-Mar-2019").unwrap().month(), 3);
        assert_eq!(parse_date("01-January-2020").unwrap().year(), 2020);
        assert_eq!(parse_date("2019.03.15").unwrap().day(), 15);
        assert_eq!(parse_date("2001/03/20").unwrap().month(), 3);
        assert_eq!(parse_date("2001/03/20 (JST)").unwrap().day(), 20);
        assert_eq!(parse_date("1997-09-15 04:00:00 UTC").unwrap().hour(), 4);
        assert_eq!(parse_date("15.03.2019").unwrap().year(), 2019);
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("").is_none());
    }
}

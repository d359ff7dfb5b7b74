use serde::Serialize;

use super::OutputFormatter;
use crate::whois::{DomainRecord, ParseOutcome, PatternTable};

pub struct JsonFormatter {
    pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct TableEntry<'a> {
    tld: &'a str,
    server: Option<&'a str>,
    private_registry: bool,
    fields: Vec<&'a str>,
}

#[derive(Serialize)]
struct DomainOutcome<'a> {
    domain: &'a str,
    #[serde(flatten)]
    outcome: &'a ParseOutcome,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_outcome(&self, domain: Option<&str>, outcome: &ParseOutcome) -> String {
        match domain {
            Some(domain) => self.to_json(&DomainOutcome { domain, outcome }),
            None => self.to_json(outcome),
        }
    }

    fn format_record(&self, record: &DomainRecord) -> String {
        self.to_json(record)
    }

    fn format_table(&self, table: &PatternTable) -> String {
        let entries: Vec<TableEntry> = table
            .tlds()
            .into_iter()
            .filter_map(|tld| {
                let patterns = table.get(tld)?;
                Some(TableEntry {
                    tld,
                    server: patterns.server(),
                    private_registry: patterns.is_private_registry(),
                    fields: patterns.field_names().collect(),
                })
            })
            .collect();
        self.to_json(&entries)
    }
}

use chrono::{DateTime, Utc};
use colored::Colorize;

use super::OutputFormatter;
use crate::colors::CatppuccinExt;
use crate::whois::{DomainRecord, ParseOutcome, ParseResult, PatternTable};

pub struct HumanFormatter {
    use_colors: bool,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn label(&self, text: &str) -> String {
        if self.use_colors {
            text.sky().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn value(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_white().to_string()
        } else {
            text.to_string()
        }
    }

    fn muted(&self, text: &str) -> String {
        if self.use_colors {
            text.overlay1().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> String {
        if self.use_colors {
            format!("\n{}\n{}", text.lavender().bold(), "─".repeat(text.len()).subtext0())
        } else {
            format!("\n{}\n{}", text, "-".repeat(text.len()))
        }
    }

    fn push_date(&self, output: &mut Vec<String>, label: &str, date: Option<DateTime<Utc>>) {
        if let Some(date) = date {
            output.push(format!(
                "  {}: {}",
                self.label(label),
                self.value(&date.format("%Y-%m-%d").to_string())
            ));
        }
    }

    fn push_list(&self, output: &mut Vec<String>, label: &str, values: &[String]) {
        if !values.is_empty() {
            output.push(format!("  {}:", self.label(label)));
            for value in values {
                output.push(format!("    - {}", self.value(value)));
            }
        }
    }

    fn record_lines(&self, record: &DomainRecord) -> Vec<String> {
        let mut output = Vec::new();

        if let Some(ref registrar) = record.registrar {
            output.push(format!(
                "  {}: {}",
                self.label("Registrar"),
                self.value(registrar)
            ));
        }

        if let Some(ref registrant) = record.registrant {
            output.push(format!(
                "  {}: {}",
                self.label("Registrant"),
                self.value(registrant)
            ));
        }

        if let Some(ref country) = record.registrant_country {
            output.push(format!(
                "  {}: {}",
                self.label("Country"),
                self.value(country)
            ));
        }

        self.push_date(&mut output, "Created", record.creation_date);

        if let Some(expires) = record.expiration_date {
            let days_until = (expires - Utc::now()).num_days();
            let expiry_str = expires.format("%Y-%m-%d").to_string();
            let status = if days_until < 30 {
                self.error(&format!("{} (expires in {} days!)", expiry_str, days_until))
            } else if days_until < 90 {
                self.warning(&format!("{} ({} days)", expiry_str, days_until))
            } else {
                self.value(&format!("{} ({} days)", expiry_str, days_until))
            };
            output.push(format!("  {}: {}", self.label("Expires"), status));
        }

        self.push_date(&mut output, "Updated", record.updated_date);
        self.push_list(&mut output, "Nameservers", &record.name_servers);
        self.push_list(&mut output, "Status", &record.statuses);
        self.push_list(&mut output, "Emails", &record.emails);

        output.push(format!(
            "  {}: {}",
            self.label("DNSSEC"),
            self.value(if record.dnssec { "signed" } else { "unsigned" })
        ));

        output
    }

    fn degraded_lines(&self, result: &ParseResult) -> Vec<String> {
        let mut output = Vec::new();
        if let Some(diagnostic) = result.diagnostic() {
            output.push(format!(
                "  {} {}",
                self.warning("!"),
                self.warning(&diagnostic.kind.to_string())
            ));
            for line in diagnostic.response.lines().take(3) {
                output.push(format!("    {}", self.muted(line)));
            }
        }
        output
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_outcome(&self, domain: Option<&str>, outcome: &ParseOutcome) -> String {
        let mut output = Vec::new();

        let result = match outcome {
            ParseOutcome::NotFound { .. } => {
                output.push(self.header(&format!("WHOIS: {}", domain.unwrap_or("-"))));
                output.push(format!("  {} Domain is not registered", self.success("✓")));
                return output.join("\n");
            }
            ParseOutcome::Found(result) => result,
        };

        let title = domain
            .map(str::to_string)
            .or_else(|| result.value("domain_name").map(str::to_lowercase))
            .unwrap_or_else(|| format!(".{}", result.tld()));
        output.push(self.header(&format!("WHOIS: {}", title)));

        if result.is_degraded() {
            output.extend(self.degraded_lines(result));
            return output.join("\n");
        }

        output.extend(self.record_lines(&DomainRecord::from_result(result)));
        output.push(format!(
            "  {}: {}",
            self.label("TLD"),
            self.muted(result.tld())
        ));

        output.join("\n")
    }

    fn format_record(&self, record: &DomainRecord) -> String {
        let mut output = Vec::new();
        let title = record.name.as_deref().unwrap_or(record.tld.as_str());
        output.push(self.header(&format!("WHOIS: {}", title)));
        output.extend(self.record_lines(record));
        output.join("\n")
    }

    fn format_table(&self, table: &PatternTable) -> String {
        let mut output = Vec::new();
        output.push(self.header(&format!("Pattern table ({} TLDs)", table.len())));

        for tld in table.tlds() {
            let Some(patterns) = table.get(tld) else {
                continue;
            };
            let fields = patterns.field_names().count();
            let mut line = format!(
                "  {}: {}",
                self.label(tld),
                self.value(&format!("{} fields", fields))
            );
            if let Some(server) = patterns.server() {
                line.push_str(&format!(" {}", self.muted(&format!("({})", server))));
            }
            if patterns.is_private_registry() {
                line.push_str(&format!(" {}", self.warning("[private registry]")));
            }
            output.push(line);
        }

        output.join("\n")
    }
}

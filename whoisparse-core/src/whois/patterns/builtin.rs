//! Curated pattern table for common registries.
//!
//! `com` describes the ICANN gTLD layout shared by most registries. Other
//! entries extend it and override what their registry formats differently,
//! marking fields the registry never publishes as absent.

use once_cell::sync::Lazy;

use super::{PatternTable, PatternTableBuilder, TldDefinition};

pub static BUILTIN_PATTERNS: Lazy<PatternTable> = Lazy::new(|| {
    builtin_table()
        .build()
        .expect("Invalid built-in pattern table")
});

fn gtld() -> TldDefinition {
    TldDefinition::new()
        .field("domain_name", r"Domain Name\s*:\s*(.+)")
        .field("registrar", r"Registrar:\s?(.+)")
        .field("registrant", r"Registrant\s*Organi(?:s|z)ation:\s?(.+)")
        .field("registrant_country", r"Registrant Country:\s?(.+)")
        .field("creation_date", r"Creation Date:[ \t]*([^\n]*)")
        .field(
            "expiration_date",
            r"(?:Registry Expiry Date|Registrar Registration Expiration Date|Expiration Date):[ \t]*([^\n]*)",
        )
        .field("updated_date", r"Updated Date:[ \t]*([^\n]*)")
        .field("name_servers", r"Name Server:[ \t]*(\S+)")
        .field("status", r"Status:[ \t]*([^\n]+)")
        .field("emails", r"[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.[a-z]{2,}")
}

/// Every indented line following `header`, up to the first blank line.
fn indented_block(header: &str) -> String {
    format!(r"{}[ \t]*\n((?:[ \t]+\S[^\n]*(?:\n|$))+)", header)
}

fn builtin_table() -> PatternTableBuilder {
    PatternTable::builder()
        // gTLDs
        .tld("com", gtld().server("whois.verisign-grs.com"))
        .tld("net", TldDefinition::new().extend("com"))
        .tld(
            "org",
            TldDefinition::new().extend("com").server("whois.pir.org"),
        )
        .tld(
            "info",
            TldDefinition::new().extend("com").server("whois.afilias.net"),
        )
        .tld(
            "io",
            TldDefinition::new().extend("com").server("whois.nic.io"),
        )
        // Nominet: section headers with indented values
        .tld(
            "uk",
            TldDefinition::new()
                .extend("com")
                .field("domain_name", r"Domain name:\s+([^\n]+)")
                .field("registrar", r"Registrar:\s*\n\s*([^\[\n]+)")
                .field("registrant", r"Registrant:\s*\n\s*([^\n]+)")
                .absent("registrant_country")
                .field("creation_date", r"Registered on:\s*([^\n]+)")
                .field("expiration_date", r"Expiry date:\s*([^\n]+)")
                .field("updated_date", r"Last updated:\s*([^\n]+)")
                .field("name_servers", indented_block("Name servers:"))
                .field("status", r"Registration status:\s*\n\s*([^\n]+)")
                .absent("emails")
                .server("whois.nic.uk"),
        )
        .tld("co.uk", TldDefinition::new().extend("uk"))
        .tld("org.uk", TldDefinition::new().extend("uk"))
        // DENIC publishes almost nothing beyond delegation data
        .tld(
            "de",
            TldDefinition::new()
                .extend("com")
                .field("domain_name", r"Domain:\s?(.+)")
                .absent("registrar")
                .absent("registrant")
                .absent("registrant_country")
                .absent("creation_date")
                .absent("expiration_date")
                .field("updated_date", r"Changed:\s?(.+)")
                .field("name_servers", r"Nserver:\s*(\S+)")
                .field("status", r"Status:\s?(.+)")
                .absent("emails")
                .server("whois.denic.de"),
        )
        .tld(
            "nl",
            TldDefinition::new()
                .extend("com")
                .field("domain_name", r"Domain name:\s?(.+)")
                .field("registrar", r"Registrar:\s*\n\s*([^\n]+)")
                .absent("registrant")
                .absent("registrant_country")
                .field("creation_date", r"Creation Date:\s?(.+)")
                .absent("expiration_date")
                .field("updated_date", r"Updated Date:\s?(.+)")
                .field("name_servers", indented_block("Domain nameservers:"))
                .field("status", r"Status:\s?(.+)")
                .server("whois.domain-registry.nl"),
        )
        // AFNIC and other RIPE-style key/value layouts
        .tld(
            "fr",
            TldDefinition::new()
                .extend("com")
                .field("domain_name", r"domain:\s?(.+)")
                .field("registrar", r"registrar:\s*(.+)")
                .field("registrant", r"contact:\s?(.+)")
                .absent("registrant_country")
                .field("creation_date", r"created:\s?(.+)")
                .field("expiration_date", r"Expiry Date:\s?(.+)")
                .field("updated_date", r"last-update:\s?(.+)")
                .field("name_servers", r"nserver:\s*(\S+)")
                .field("status", r"status:\s?(.+)")
                .server("whois.nic.fr"),
        )
        .tld(
            "ru",
            TldDefinition::new()
                .extend("com")
                .field("domain_name", r"domain:\s*(.+)")
                .field("registrar", r"registrar:\s*(.+)")
                .field("registrant", r"org:\s*(.+)")
                .absent("registrant_country")
                .field("creation_date", r"created:\s*(.+)")
                .field("expiration_date", r"paid-till:\s*(.+)")
                .absent("updated_date")
                .field("name_servers", r"nserver:\s*(\S+)")
                .field("status", r"state:\s*(.+)")
                .server("whois.tcinet.ru"),
        )
        .tld(
            "br",
            TldDefinition::new()
                .extend("com")
                .field("domain_name", r"domain:\s?(.+)")
                .absent("registrar")
                .field("registrant", r"owner:\s?(.+)")
                .field("registrant_country", r"country:\s?(.+)")
                .field("creation_date", r"created:\s?(.+)")
                .field("expiration_date", r"expires:\s?(.+)")
                .field("updated_date", r"changed:\s?(.+)")
                .field("name_servers", r"nserver:\s*(\S+)")
                .field("status", r"status:\s?(.+)")
                .server("whois.registro.br"),
        )
        // JPRS bracketed labels
        .tld(
            "jp",
            TldDefinition::new()
                .extend("com")
                .field("domain_name", r"\[Domain Name\]\s?(.+)")
                .absent("registrar")
                .field("registrant", r"\[Registrant\]\s?(.+)")
                .absent("registrant_country")
                .field("creation_date", r"\[(?:Created on|登録年月日)\]\s?(.+)")
                .field("expiration_date", r"\[(?:Expires on|有効期限)\]\s?(.+)")
                .field("updated_date", r"\[Last Updated?\]\s?(.+)")
                .field("name_servers", r"\[Name Server\][ \t]*(\S+)")
                .field("status", r"\[(?:State|Status)\]\s?(.+)")
                .server("whois.jprs.jp"),
        )
        // Nested "Registrar:" blocks
        .tld(
            "eu",
            TldDefinition::new()
                .extend("com")
                .field("domain_name", r"Domain:\s?(.+)")
                .field("registrar", r"Registrar:\s*\n\s*Name:\s*(.+)")
                .absent("registrant")
                .absent("registrant_country")
                .absent("creation_date")
                .absent("expiration_date")
                .absent("updated_date")
                .field("name_servers", indented_block("Name servers:"))
                .absent("status")
                .server("whois.eu"),
        )
        .tld(
            "be",
            TldDefinition::new()
                .extend("eu")
                .field("creation_date", r"Registered:\s*(.+)")
                .field("name_servers", indented_block("Nameservers:"))
                .field("status", r"Status:\s?(.+)")
                .server("whois.dns.be"),
        )
        .tld(
            "it",
            TldDefinition::new()
                .extend("com")
                .field("domain_name", r"Domain:\s?(.+)")
                .field("registrar", r"Registrar\s*\n\s*Organization:\s*(.+)")
                .field("registrant", r"Registrant\s*\n\s*Organization:\s*(.+)")
                .absent("registrant_country")
                .field("creation_date", r"Created:\s?(.+)")
                .field("expiration_date", r"Expire Date:\s?(.+)")
                .field("updated_date", r"Last Update:\s?(.+)")
                .field("name_servers", indented_block("Nameservers"))
                .field("status", r"Status:\s?(.+)")
                .server("whois.nic.it"),
        )
        // Brand registries without public data
        .tld("bmw", TldDefinition::new().private_registry())
        .tld("google", TldDefinition::new().private_registry())
}

//! Per-TLD extraction pattern tables.
//!
//! A [`PatternTable`] maps a TLD to its [`FieldPatterns`]: field name to
//! compiled regex, an explicit "no pattern" marker, or a meta value. Keys
//! starting with [`META_PREFIX`] (`_server`, `_privateRegistry`, ...) carry
//! registry metadata and are never extracted. The `com` entry is mandatory and
//! serves every TLD without an entry of its own.
//!
//! Tables are built once through [`PatternTableBuilder`] or from JSON and are
//! read-only afterwards, so one table can be shared freely between threads.

pub mod builtin;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ParseError, Result};

pub use builtin::BUILTIN_PATTERNS;

/// Prefix marking registry metadata keys.
pub const META_PREFIX: char = '_';

/// TLD whose entry is used when a TLD has none.
pub const FALLBACK_TLD: &str = "com";

/// Inheritance directive in table definitions.
pub const EXTEND_KEY: &str = "extend";

pub const SERVER_KEY: &str = "_server";
pub const PRIVATE_REGISTRY_KEY: &str = "_privateRegistry";

pub fn is_meta_key(key: &str) -> bool {
    key.starts_with(META_PREFIX)
}

/// Value of a meta key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Flag(bool),
    Text(String),
}

/// One compiled entry of a TLD's pattern map.
#[derive(Debug, Clone)]
pub enum PatternEntry {
    Pattern(Regex),
    /// The field exists for this TLD but is never populated.
    Absent,
    Meta(MetaValue),
}

/// Compiled patterns for a single TLD.
#[derive(Debug, Clone, Default)]
pub struct FieldPatterns {
    entries: BTreeMap<String, PatternEntry>,
}

impl FieldPatterns {
    pub fn get(&self, key: &str) -> Option<&PatternEntry> {
        self.entries.get(key)
    }

    /// Extractable fields with their patterns; `None` marks an absent pattern.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&Regex>)> {
        self.entries
            .iter()
            .filter(|(key, _)| !is_meta_key(key))
            .filter_map(|(key, entry)| match entry {
                PatternEntry::Pattern(re) => Some((key.as_str(), Some(re))),
                PatternEntry::Absent => Some((key.as_str(), None)),
                PatternEntry::Meta(_) => None,
            })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields().map(|(name, _)| name)
    }

    pub fn meta(&self, key: &str) -> Option<&MetaValue> {
        match self.entries.get(key) {
            Some(PatternEntry::Meta(value)) => Some(value),
            _ => None,
        }
    }

    /// Authoritative WHOIS server recorded for this TLD.
    pub fn server(&self) -> Option<&str> {
        match self.meta(SERVER_KEY) {
            Some(MetaValue::Text(server)) => Some(server),
            _ => None,
        }
    }

    /// True for TLDs run as closed brand registries without public WHOIS data.
    pub fn is_private_registry(&self) -> bool {
        matches!(self.meta(PRIVATE_REGISTRY_KEY), Some(MetaValue::Flag(true)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DefinitionValue {
    Pattern(String),
    Absent,
    Meta(MetaValue),
}

/// Uncompiled definition of one TLD entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TldDefinition {
    extend: Option<String>,
    entries: Vec<(String, DefinitionValue)>,
}

impl TldDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the entries of `parent`; own entries override inherited ones.
    pub fn extend(mut self, parent: impl Into<String>) -> Self {
        self.extend = Some(parent.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.entries
            .push((key.into(), DefinitionValue::Pattern(pattern.into())));
        self
    }

    /// Declares a field this registry never provides.
    pub fn absent(mut self, key: impl Into<String>) -> Self {
        self.entries.push((key.into(), DefinitionValue::Absent));
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((key.into(), DefinitionValue::Meta(MetaValue::Text(value.into()))));
        self
    }

    pub fn flag(mut self, key: impl Into<String>, value: bool) -> Self {
        self.entries
            .push((key.into(), DefinitionValue::Meta(MetaValue::Flag(value))));
        self
    }

    pub fn server(self, server: impl Into<String>) -> Self {
        self.meta(SERVER_KEY, server)
    }

    pub fn private_registry(self) -> Self {
        self.flag(PRIVATE_REGISTRY_KEY, true)
    }

    fn from_json(tld: &str, value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            ParseError::Configuration(format!("entry for '{}' must be an object", tld))
        })?;

        let mut definition = TldDefinition::new();
        for (key, value) in object {
            definition = match (key.as_str(), value) {
                (EXTEND_KEY, Value::String(parent)) => definition.extend(parent.as_str()),
                (EXTEND_KEY, _) => {
                    return Err(ParseError::Configuration(format!(
                        "'{}' of '{}' must name a TLD",
                        EXTEND_KEY, tld
                    )))
                }
                (key, Value::Bool(flag)) if is_meta_key(key) => definition.flag(key, *flag),
                (key, Value::String(text)) if is_meta_key(key) => definition.meta(key, text.as_str()),
                (key, Value::String(pattern)) => definition.field(key, pattern.as_str()),
                (key, Value::Null) => definition.absent(key),
                (key, other) => {
                    return Err(ParseError::Configuration(format!(
                        "unsupported value for '{}.{}': {}",
                        tld, key, other
                    )))
                }
            };
        }

        Ok(definition)
    }
}

/// Collects TLD definitions and compiles them into a [`PatternTable`].
#[derive(Debug, Clone, Default)]
pub struct PatternTableBuilder {
    definitions: BTreeMap<String, TldDefinition>,
}

impl PatternTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tld(mut self, tld: impl Into<String>, definition: TldDefinition) -> Self {
        self.definitions.insert(tld.into().to_lowercase(), definition);
        self
    }

    /// Compiles every definition, resolving `extend` chains.
    ///
    /// Fails when the `com` fallback is missing, an `extend` parent is unknown
    /// or cyclic, a meta value sits on a data key, or a pattern does not compile.
    pub fn build(self) -> Result<PatternTable> {
        if !self.definitions.contains_key(FALLBACK_TLD) {
            return Err(ParseError::Configuration(format!(
                "missing required fallback entry '{}'",
                FALLBACK_TLD
            )));
        }

        let mut compiled_cache: HashMap<String, Regex> = HashMap::new();
        let mut entries = HashMap::with_capacity(self.definitions.len());

        for tld in self.definitions.keys() {
            let merged = self.merge_chain(tld)?;
            let mut patterns = FieldPatterns::default();

            for (key, value) in merged {
                let entry = match value {
                    DefinitionValue::Pattern(text) if is_meta_key(&key) => {
                        PatternEntry::Meta(MetaValue::Text(text))
                    }
                    DefinitionValue::Absent if is_meta_key(&key) => continue,
                    DefinitionValue::Meta(_) if !is_meta_key(&key) => {
                        return Err(ParseError::Configuration(format!(
                            "'{}.{}' holds a meta value but is not prefixed with '{}'",
                            tld, key, META_PREFIX
                        )))
                    }
                    DefinitionValue::Pattern(text) => {
                        PatternEntry::Pattern(compile(&mut compiled_cache, tld, &key, &text)?)
                    }
                    DefinitionValue::Absent => PatternEntry::Absent,
                    DefinitionValue::Meta(meta) => PatternEntry::Meta(meta),
                };
                patterns.entries.insert(key, entry);
            }

            entries.insert(tld.clone(), patterns);
        }

        let fallback = entries.get(FALLBACK_TLD).cloned().unwrap_or_default();
        debug!(tlds = entries.len(), patterns = compiled_cache.len(), "Pattern table built");

        Ok(PatternTable { entries, fallback })
    }

    /// Flattens `tld` and its ancestors, root first, later entries winning.
    fn merge_chain(&self, tld: &str) -> Result<BTreeMap<String, DefinitionValue>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(tld);

        while let Some(name) = current {
            if !visited.insert(name) {
                return Err(ParseError::Configuration(format!(
                    "circular '{}' chain at '{}'",
                    EXTEND_KEY, name
                )));
            }
            let definition = self.definitions.get(name).ok_or_else(|| {
                ParseError::Configuration(format!(
                    "'{}' extends unknown entry '{}'",
                    tld, name
                ))
            })?;
            chain.push(definition);
            current = definition.extend.as_deref();
        }

        let mut merged = BTreeMap::new();
        for definition in chain.iter().rev() {
            for (key, value) in &definition.entries {
                merged.insert(key.clone(), value.clone());
            }
        }
        Ok(merged)
    }
}

fn compile(
    cache: &mut HashMap<String, Regex>,
    tld: &str,
    field: &str,
    pattern: &str,
) -> Result<Regex> {
    if let Some(re) = cache.get(pattern) {
        return Ok(re.clone());
    }

    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ParseError::InvalidPattern {
            tld: tld.to_string(),
            field: field.to_string(),
            source,
        })?;
    cache.insert(pattern.to_string(), re.clone());
    Ok(re)
}

/// Immutable mapping from TLD to its compiled field patterns.
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: HashMap<String, FieldPatterns>,
    fallback: FieldPatterns,
}

impl PatternTable {
    pub fn builder() -> PatternTableBuilder {
        PatternTableBuilder::new()
    }

    /// Parses a JSON table definition.
    ///
    /// ```json
    /// {
    ///   "com": { "domain_name": "Domain Name:\\s?(.+)", "registrant": null },
    ///   "net": { "extend": "com", "_server": "whois.verisign-grs.com" }
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        let object = root.as_object().ok_or_else(|| {
            ParseError::Configuration("pattern table must be a JSON object".to_string())
        })?;

        object
            .iter()
            .try_fold(
                PatternTable::builder(),
                |builder, (tld, value)| -> Result<PatternTableBuilder> {
                    Ok(builder.tld(tld.as_str(), TldDefinition::from_json(tld, value)?))
                },
            )?
            .build()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The entry dedicated to `tld`, if any.
    pub fn get(&self, tld: &str) -> Option<&FieldPatterns> {
        self.entries.get(tld)
    }

    /// The entry for `tld`, or the `com` fallback.
    pub fn resolve(&self, tld: &str) -> &FieldPatterns {
        self.entries.get(tld).unwrap_or(&self.fallback)
    }

    pub fn contains(&self, tld: &str) -> bool {
        self.entries.contains_key(tld)
    }

    /// All TLDs with a dedicated entry, sorted.
    pub fn tlds(&self) -> Vec<&str> {
        let mut tlds: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        tlds.sort_unstable();
        tlds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> PatternTable {
        PatternTable::builder()
            .tld(
                "com",
                TldDefinition::new()
                    .field("domain_name", r"Domain Name:\s?(.+)")
                    .field("registrar", r"Registrar:\s?(.+)")
                    .absent("registrant")
                    .server("whois.verisign-grs.com"),
            )
            .tld(
                "uk",
                TldDefinition::new()
                    .extend("com")
                    .field("registrar", r"Registrar:\s*\n\s*(.+)")
                    .server("whois.nic.uk"),
            )
            .tld("co.uk", TldDefinition::new().extend("uk"))
            .tld("bmw", TldDefinition::new().private_registry())
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_fallback_is_configuration_error() {
        let err = PatternTable::builder()
            .tld("net", TldDefinition::new().field("domain_name", "x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ParseError::Configuration(_)));
    }

    #[test]
    fn test_resolve_falls_back_to_com() {
        let table = small_table();
        assert!(table.get("example").is_none());
        let patterns = table.resolve("example");
        assert_eq!(patterns.server(), Some("whois.verisign-grs.com"));
    }

    #[test]
    fn test_extend_chain() {
        let table = small_table();
        let co_uk = table.get("co.uk").unwrap();
        assert_eq!(co_uk.server(), Some("whois.nic.uk"));
        let names: Vec<&str> = co_uk.field_names().collect();
        assert_eq!(names, vec!["domain_name", "registrant", "registrar"]);
        match co_uk.get("registrar") {
            Some(PatternEntry::Pattern(re)) => assert!(re.as_str().contains(r"\n")),
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    #[test]
    fn test_meta_keys_are_not_fields() {
        let table = small_table();
        let com = table.get("com").unwrap();
        assert!(com.field_names().all(|name| !is_meta_key(name)));
        assert!(com.get(SERVER_KEY).is_some());
        assert!(table.get("bmw").unwrap().is_private_registry());
        assert!(!com.is_private_registry());
        assert_eq!(table.get("bmw").unwrap().field_names().count(), 0);
    }

    #[test]
    fn test_unknown_parent() {
        let err = PatternTable::builder()
            .tld("com", TldDefinition::new())
            .tld("net", TldDefinition::new().extend("org"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ParseError::Configuration(msg) if msg.contains("org")));
    }

    #[test]
    fn test_cyclic_extend() {
        let err = PatternTable::builder()
            .tld("com", TldDefinition::new())
            .tld("a", TldDefinition::new().extend("b"))
            .tld("b", TldDefinition::new().extend("a"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ParseError::Configuration(msg) if msg.contains("circular")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternTable::builder()
            .tld("com", TldDefinition::new().field("registrar", "(unclosed"))
            .build()
            .unwrap_err();
        match err {
            ParseError::InvalidPattern { tld, field, .. } => {
                assert_eq!(tld, "com");
                assert_eq!(field, "registrar");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_meta_value_on_data_key_is_rejected() {
        let err = PatternTable::builder()
            .tld("com", TldDefinition::new().flag("registrar", true))
            .build()
            .unwrap_err();
        assert!(matches!(err, ParseError::Configuration(_)));
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let table = small_table();
        match table.resolve("com").get("domain_name") {
            Some(PatternEntry::Pattern(re)) => assert!(re.is_match("DOMAIN NAME: EXAMPLE.COM")),
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "com": {
                "domain_name": "Domain Name:\\s?(.+)",
                "registrant": null,
                "_server": "whois.verisign-grs.com"
            },
            "net": { "extend": "com" },
            "bmw": { "_privateRegistry": true }
        }"#;
        let table = PatternTable::from_json(json).unwrap();
        assert_eq!(table.tlds(), vec!["bmw", "com", "net"]);
        let net = table.get("net").unwrap();
        assert!(matches!(net.get("registrant"), Some(PatternEntry::Absent)));
        assert_eq!(net.server(), Some("whois.verisign-grs.com"));
        assert!(table.get("bmw").unwrap().is_private_registry());
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = PatternTable::from_json(r#"{"com": {"registrar": 42}}"#).unwrap_err();
        assert!(matches!(err, ParseError::Configuration(_)));

        let err = PatternTable::from_json(r#"["com"]"#).unwrap_err();
        assert!(matches!(err, ParseError::Configuration(_)));

        let err = PatternTable::from_json("{not json").unwrap_err();
        assert!(matches!(err, ParseError::JsonError(_)));
    }

    #[test]
    fn test_table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PatternTable>();
    }
}

//! Header synonym table used to map external column names to canonical fields
//!
//! The table is data, not code: the built-in synonyms live in
//! `data/headers.yaml` (embedded at build time) and users can extend them
//! through the `headers:` section of their configuration.

use miette::Diagnostic;
use rust_embed::Embed;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

use crate::core::item::Field;

#[derive(Embed)]
#[folder = "data/"]
struct EmbeddedData;

const BUILTIN_FILE: &str = "headers.yaml";

/// Synonyms per canonical field, as written in YAML
pub type SynonymTable = BTreeMap<Field, Vec<String>>;

#[derive(Debug, Error, Diagnostic)]
pub enum HeaderError {
    #[error("Built-in header table '{0}' is missing")]
    #[diagnostic(code(stk::headers::missing))]
    Missing(&'static str),

    #[error("Invalid header table: {0}")]
    #[diagnostic(code(stk::headers::invalid))]
    Invalid(String),
}

/// Normalize a header for comparison
///
/// Drops a UTF-8 BOM, whitespace, `_` and `-`, and lower-cases the rest.
pub fn header_key(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Many-to-one lookup from header synonyms to canonical fields
#[derive(Debug, Clone)]
pub struct HeaderMap {
    lookup: HashMap<String, Field>,
    synonyms: SynonymTable,
}

impl HeaderMap {
    /// The synonym table shipped with the binary
    pub fn builtin() -> Result<Self, HeaderError> {
        let file = EmbeddedData::get(BUILTIN_FILE).ok_or(HeaderError::Missing(BUILTIN_FILE))?;
        let text =
            std::str::from_utf8(&file.data).map_err(|e| HeaderError::Invalid(e.to_string()))?;
        let table: SynonymTable =
            serde_yml::from_str(text).map_err(|e| HeaderError::Invalid(e.to_string()))?;
        Ok(Self::from_table(table))
    }

    /// Build a map from an explicit table; every canonical name maps to itself
    pub fn from_table(table: SynonymTable) -> Self {
        let mut map = Self {
            lookup: HashMap::new(),
            synonyms: BTreeMap::new(),
        };
        for field in Field::ALL {
            map.insert(field, field.as_str());
        }
        map.extend(&table);
        map
    }

    /// Add synonyms; a synonym already bound to another field is rebound
    pub fn extend(&mut self, table: &SynonymTable) {
        for (field, names) in table {
            for name in names {
                self.insert(*field, name);
            }
        }
    }

    fn insert(&mut self, field: Field, name: &str) {
        let key = header_key(name);
        if key.is_empty() {
            return;
        }
        if let Some(previous) = self.lookup.insert(key, field) {
            if previous != field {
                debug!(synonym = name, from = %previous, to = %field, "header synonym rebound");
            }
        }
        let entry = self.synonyms.entry(field).or_default();
        if !entry.iter().any(|n| n == name) {
            entry.push(name.to_string());
        }
    }

    /// Canonical field for a raw header, if any
    pub fn resolve(&self, header: &str) -> Option<Field> {
        self.lookup.get(&header_key(header)).copied()
    }

    /// Known synonyms for a field, for help messages
    pub fn synonyms(&self, field: Field) -> &[String] {
        self.synonyms.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}

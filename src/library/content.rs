//! Character records as stored in the data directory.
//!
//! Each record is one JSON file named `{id}.json`. The fields the site
//! renders are typed; anything else in the file is kept in
//! [`ContentRecord::extra`] without interpretation.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Content identifier (the record's file stem, e.g. `kaedehara_kazuha`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name derived from the identifier alone
    pub fn display_name(&self) -> String {
        display_name(&self.0)
    }

    /// Whether the identifier can be used as a file stem inside the data
    /// directory without escaping it.
    pub fn is_safe_file_stem(&self) -> bool {
        !self.0.is_empty()
            && self.0 != "."
            && self.0 != ".."
            && !self.0.contains(['/', '\\', '\0'])
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Convert an identifier to a display name.
///
/// `"kaedehara_kazuha"` becomes `"Kaedehara Kazuha"`. Underscores and spaces
/// both separate words; only the first character of each word is touched.
pub fn display_name(id: &str) -> String {
    id.split(['_', ' '])
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first character, leave the rest as-is
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A single constellation entry; `description` is an HTML fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constellation {
    pub name: String,
    pub description: String,
}

/// Full character record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub description: String,
    pub weapon: String,
    pub rarity: String,

    /// Stat curves indexed by level; index 0 is unused. A `null` curve
    /// reads as empty and `null` entries are kept as gaps.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hp: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub atk: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub def: Vec<Option<f64>>,

    /// Name of the ascension stat, camelCase (e.g. `critRate`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_grow: Option<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub constellations: Vec<Constellation>,

    /// Every other field in the file, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Treat an explicit `null` list the same as a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ContentRecord {
    /// Parse a record from the raw file body
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Look up a field that is not part of the typed core
    pub fn extra_field(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}

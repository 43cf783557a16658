//! Deprecation records and catalogs

use serde::{Deserialize, Serialize};

/// A single deprecated-API entry.
///
/// Field names are serialized in camelCase and declaration order so that
/// persisted catalogs are stable and human-diffable. Identity is `api_name`;
/// duplicate names across records are permitted and matched independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecationRecord {
    /// The API name, treated as a literal identifier token (e.g. "watchPosition")
    pub api_name: String,

    /// Free-form change label (e.g. "Deprecated", "Removed", "Changed")
    pub change_type: String,

    /// Human-readable guidance attached to every match of this record
    pub description: String,
}

impl DeprecationRecord {
    /// Create a new record
    pub fn new(
        api_name: impl Into<String>,
        change_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            api_name: api_name.into(),
            change_type: change_type.into(),
            description: description.into(),
        }
    }
}

/// Ordered collection of deprecation records for one catalog version.
///
/// A catalog is keyed externally by a version identifier string and is
/// immutable once loaded. Serialization is transparent: the persisted form
/// is exactly the JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    /// Records in catalog order
    pub records: Vec<DeprecationRecord>,
}

impl Catalog {
    /// Create a catalog from an ordered record sequence
    pub fn new(records: Vec<DeprecationRecord>) -> Self {
        Self { records }
    }

    /// Create a catalog with no records
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, DeprecationRecord> {
        self.records.iter()
    }
}

impl From<Vec<DeprecationRecord>> for Catalog {
    fn from(records: Vec<DeprecationRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_camel_case() {
        let record = DeprecationRecord::new("watchPosition", "Deprecated", "Use the permissions API.");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"apiName\""));
        assert!(json.contains("\"changeType\""));
        assert!(json.contains("\"description\""));
    }

    #[test]
    fn catalog_serializes_as_bare_array() {
        let catalog = Catalog::new(vec![DeprecationRecord::new("foo", "Removed", "")]);
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));
        assert!(json.ends_with(']'));
    }

    #[test]
    fn catalog_roundtrip_preserves_order() {
        let catalog = Catalog::new(vec![
            DeprecationRecord::new("b", "Deprecated", "second"),
            DeprecationRecord::new("a", "Removed", "first"),
        ]);
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, parsed);
        assert_eq!(parsed.records[0].api_name, "b");
    }
}

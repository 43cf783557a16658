//! File-backed catalog store
//!
//! One file per catalog version under the cache directory, named
//! deterministically from the version identifier and holding the
//! pretty-printed JSON array of records. A version that loads successfully
//! is authoritative: consumers never re-acquire it.

use deprewatch_core::{Catalog, DeprecationRecord};
use std::path::PathBuf;

/// Errors from loading or saving persisted catalogs
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No persisted catalog for this version. A cache miss, not a fault.
    #[error("no persisted catalog for version '{0}'")]
    NotFound(String),

    /// Bytes exist but do not validate into a record sequence. Callers
    /// treat this exactly like [`StoreError::NotFound`].
    #[error("persisted catalog for version '{version}' is corrupt: {message}")]
    CorruptCatalog { version: String, message: String },

    #[error("IO error: {0}")]
    Io(String),

    #[error("serialize error: {0}")]
    Serialize(String),
}

/// Durable key-value cache of catalogs, keyed by version identifier
pub struct CatalogStore {
    dir: PathBuf,
}

impl CatalogStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the catalog file for `version`
    pub fn catalog_path(&self, version: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(version)))
    }

    /// Load the persisted catalog for `version`.
    ///
    /// Validation is strict: every element must carry the three string
    /// fields, otherwise the file is [`StoreError::CorruptCatalog`].
    pub fn load(&self, version: &str) -> Result<Catalog, StoreError> {
        let path = self.catalog_path(version);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(version.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        let records: Vec<DeprecationRecord> =
            serde_json::from_str(&contents).map_err(|e| StoreError::CorruptCatalog {
                version: version.to_string(),
                message: e.to_string(),
            })?;

        Ok(Catalog::new(records))
    }

    /// Persist `catalog` for `version`, creating the cache directory if
    /// absent. A subsequent [`CatalogStore::load`] for the same version
    /// returns an equal catalog.
    pub fn save(&self, version: &str, catalog: &Catalog) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io(e.to_string()))?;

        let json = serde_json::to_string_pretty(catalog)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        std::fs::write(self.catalog_path(version), json).map_err(|e| StoreError::Io(e.to_string()))
    }
}

/// Deterministic file-name form of a version identifier
fn sanitize(version: &str) -> String {
    version
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore").field("dir", &self.dir).finish()
    }
}

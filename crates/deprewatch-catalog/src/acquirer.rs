//! Catalog acquisition orchestration
//!
//! Cache-first: a persisted catalog for the requested version is served
//! without touching the network or the model. Otherwise acquisition runs at
//! most once per version per process; concurrent consumers await the
//! in-flight attempt instead of racing it. Only the initial fetch can fail
//! visibly; everything after it degrades to an empty catalog.

use crate::extract::{Section, SectionExtractor};
use crate::fetch::{DocumentFetcher, FetchError, HttpFetcher};
use crate::inference::{AnthropicProvider, InferenceProvider, UnavailableProvider};
use crate::parse;
use crate::store::{CatalogStore, StoreError};
use deprewatch_core::{Catalog, Config};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Orchestrates fetch, extraction, inference, parsing, and persistence
pub struct CatalogAcquirer {
    fetcher: Arc<dyn DocumentFetcher>,
    provider: Arc<dyn InferenceProvider>,
    store: CatalogStore,
    extractor: SectionExtractor,

    /// Per-version outcomes for this process, including empty ones. The
    /// mutex is held across an acquisition so later requests for the same
    /// version wait for it rather than starting another.
    acquired: Mutex<HashMap<String, Arc<Catalog>>>,
}

impl CatalogAcquirer {
    /// Create an acquirer over the injected capabilities
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        provider: Arc<dyn InferenceProvider>,
        store: CatalogStore,
        extractor: SectionExtractor,
    ) -> Self {
        Self {
            fetcher,
            provider,
            store,
            extractor,
            acquired: Mutex::new(HashMap::new()),
        }
    }

    /// Build an acquirer wired to the production capabilities named in
    /// `config`: HTTP fetch, the Anthropic provider when its API key is
    /// configured (a stand-in signalling absence otherwise), and a store
    /// under the configured cache directory, resolved against `root` when
    /// relative.
    pub fn from_config(config: &Config, root: Option<&Path>) -> Self {
        let cache_dir = match root {
            Some(root) if config.catalog.cache_dir.is_relative() => {
                root.join(&config.catalog.cache_dir)
            }
            _ => config.catalog.cache_dir.clone(),
        };

        let provider: Arc<dyn InferenceProvider> =
            match AnthropicProvider::from_env(config.inference.clone()) {
                Ok(provider) => Arc::new(provider),
                Err(e) => {
                    tracing::warn!("inference capability absent: {e}");
                    Arc::new(UnavailableProvider::new(e.to_string()))
                }
            };

        Self::new(
            Arc::new(HttpFetcher::new()),
            provider,
            CatalogStore::new(cache_dir),
            SectionExtractor::new(config.catalog.heading_level),
        )
    }

    /// Get the catalog for `version`, acquiring from `url` on a cache miss.
    ///
    /// Resolution order: in-process memo, then the persisted store, then a
    /// single acquisition. A fetch failure propagates once — the version is
    /// memoized as empty so the run keeps functioning without deprecation
    /// data — while inference-path failures degrade silently to an empty
    /// catalog. Empty catalogs are never persisted, so a later process run
    /// may re-attempt.
    pub async fn catalog_for(&self, url: &str, version: &str) -> Result<Arc<Catalog>, FetchError> {
        let mut acquired = self.acquired.lock().await;

        if let Some(catalog) = acquired.get(version) {
            return Ok(Arc::clone(catalog));
        }

        match self.store.load(version) {
            Ok(catalog) => {
                tracing::debug!(version, records = catalog.len(), "catalog served from store");
                let catalog = Arc::new(catalog);
                acquired.insert(version.to_string(), Arc::clone(&catalog));
                return Ok(catalog);
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => {
                tracing::warn!(version, "persisted catalog unusable, re-acquiring: {e}");
            }
        }

        match self.acquire(url, version).await {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                acquired.insert(version.to_string(), Arc::clone(&catalog));
                Ok(catalog)
            }
            Err(e) => {
                acquired.insert(version.to_string(), Arc::new(Catalog::empty()));
                Err(e)
            }
        }
    }

    /// One acquisition attempt: fetch, extract, infer, parse, persist.
    async fn acquire(&self, url: &str, version: &str) -> Result<Catalog, FetchError> {
        tracing::info!(url, version, "acquiring deprecation catalog");

        let html = self.fetcher.fetch(url).await?;

        let sections = self.extractor.extract(&html);
        if sections.is_empty() {
            tracing::warn!(url, "source document has no sections; catalog is empty");
            return Ok(Catalog::empty());
        }

        let prompt = build_prompt(&sections);
        let response = match self.provider.infer(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(version, "inference failed, continuing without deprecation data: {e}");
                return Ok(Catalog::empty());
            }
        };

        let catalog = Catalog::new(parse::parse_records(&response));
        if catalog.is_empty() {
            tracing::warn!(version, "inference yielded no records; nothing persisted");
            return Ok(catalog);
        }

        if let Err(e) = self.store.save(version, &catalog) {
            tracing::warn!(version, "failed to persist catalog (kept in memory): {e}");
        }

        tracing::info!(version, records = catalog.len(), "catalog acquired");
        Ok(catalog)
    }
}

/// Prompt asking the model to structure extracted sections into records
fn build_prompt(sections: &[Section]) -> String {
    let mut sections_text = String::new();
    for section in sections {
        sections_text.push_str("## ");
        sections_text.push_str(&section.heading);
        sections_text.push('\n');
        sections_text.push_str(&section.body);
        sections_text.push_str("\n\n");
    }

    format!(
        r#"You are extracting a deprecation catalog from platform release notes.

Each section below describes a change to a platform API. Identify every API
that is deprecated, removed, or changed, and respond with a fenced ```json
block containing a JSON array of objects, one per API, with exactly these
fields:

- "apiName": the literal identifier of the API as it appears in code
- "changeType": one of "Deprecated", "Removed", or "Changed"
- "description": one sentence of guidance for affected code

Respond with only the fenced block. If no APIs are affected, respond with an
empty array.

Sections:

{sections_text}"#
    )
}

//! LSP backend for deprewatch
//!
//! The backend is the document-source and annotation-sink collaborator: the
//! editor feeds it full document text on open/change, and it answers with a
//! replace-all diagnostic set per document. The catalog is acquired once,
//! awaited, before any scan publishes results.

use deprewatch_catalog::CatalogAcquirer;
use deprewatch_core::{AnnotationStyle, ApiMatch, Catalog, Config, Severity};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticSeverity, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, InitializeParams, InitializeResult, InitializedParams, MessageType,
    NumberOrString, Position, Range, ServerCapabilities, TextDocumentSyncCapability,
    TextDocumentSyncKind, Url,
};
use tower_lsp::{Client, LanguageServer};

/// LSP backend for deprewatch
///
/// Tracks all open documents and rescans each one's full text against the
/// deprecation catalog on every change. No incremental state: identical
/// text always produces identical diagnostics.
pub struct Backend {
    /// LSP client for communicating with the editor
    client: Client,
    /// Currently open documents (URI -> full text content)
    documents: Arc<RwLock<HashMap<Url, String>>>,
    /// deprewatch configuration
    config: Arc<RwLock<Config>>,
    /// Catalog acquirer, built once the workspace root is known
    acquirer: Arc<RwLock<Option<Arc<CatalogAcquirer>>>>,
}

impl Backend {
    /// Create a new LSP backend
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(RwLock::new(Config::default())),
            acquirer: Arc::new(RwLock::new(None)),
        }
    }

    /// Load deprewatch configuration from the workspace root
    async fn load_config(&self, root: Option<&std::path::Path>) -> Config {
        if let Some(root) = root {
            let config_path = root.join("deprewatch.toml");
            match Config::from_file(&config_path) {
                Ok(config) => {
                    self.client
                        .log_message(
                            MessageType::INFO,
                            format!("Loaded config from {}", config_path.display()),
                        )
                        .await;
                    return config;
                }
                Err(e) => {
                    tracing::debug!("no usable config at {}: {e}", config_path.display());
                }
            }
        }

        Config::default()
    }

    /// Get the catalog, acquiring it on first use.
    ///
    /// Every scan goes through here, so a scan requested while acquisition
    /// is in flight awaits it instead of observing a half-loaded catalog.
    /// Acquisition failure surfaces one editor notification and an empty
    /// catalog; document watching keeps working.
    async fn ensure_catalog(&self) -> Arc<Catalog> {
        let acquirer = self.acquirer.read().await.clone();
        let Some(acquirer) = acquirer else {
            return Arc::new(Catalog::empty());
        };

        let (url, version) = {
            let config = self.config.read().await;
            (
                config.catalog.resolved_source_url(),
                config.catalog.version.clone(),
            )
        };

        match acquirer.catalog_for(&url, &version).await {
            Ok(catalog) => catalog,
            Err(e) => {
                self.client
                    .show_message(
                        MessageType::WARNING,
                        format!("deprewatch: no deprecation data could be obtained: {e}"),
                    )
                    .await;
                Arc::new(Catalog::empty())
            }
        }
    }

    /// Compute diagnostics for one document
    async fn compute_diagnostics(&self, uri: &Url) -> Vec<Diagnostic> {
        let content = match self.documents.read().await.get(uri) {
            Some(content) => content.clone(),
            None => return Vec::new(),
        };

        let catalog = self.ensure_catalog().await;
        let style = self.config.read().await.annotation.clone();

        let matches = match deprewatch_engine::scan(&catalog, &content) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!("scan failed for {uri}: {e}");
                return Vec::new();
            }
        };

        matches
            .iter()
            .map(|m| diagnostic_for(&content, m, &style))
            .collect()
    }

    /// Compute and publish diagnostics for one document
    async fn publish(&self, uri: Url) {
        let diagnostics = self.compute_diagnostics(&uri).await;
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    /// Re-publish diagnostics for every open document
    async fn publish_all(&self) {
        let uris: Vec<Url> = self.documents.read().await.keys().cloned().collect();
        for uri in uris {
            self.publish(uri).await;
        }
    }
}

/// Convert one match into an LSP diagnostic
fn diagnostic_for(text: &str, m: &ApiMatch, style: &AnnotationStyle) -> Diagnostic {
    let severity = match style.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warn => DiagnosticSeverity::WARNING,
        Severity::Info => DiagnosticSeverity::INFORMATION,
    };

    Diagnostic {
        range: Range {
            start: offset_to_position(text, m.start),
            end: offset_to_position(text, m.end),
        },
        severity: Some(severity),
        code: Some(NumberOrString::String(m.change_type.clone())),
        source: Some(style.source.clone()),
        message: m.message(),
        ..Default::default()
    }
}

/// Convert a byte offset into an LSP position (line + UTF-16 column)
fn offset_to_position(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let before = &text[..offset];

    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let character = text[line_start..offset].encode_utf16().count() as u32;

    Position { line, character }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root = params
            .root_uri
            .as_ref()
            .and_then(|uri| uri.to_file_path().ok());

        let config = self.load_config(root.as_deref()).await;
        let acquirer = CatalogAcquirer::from_config(&config, root.as_deref());

        *self.config.write().await = config;
        *self.acquirer.write().await = Some(Arc::new(acquirer));

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Full document sync: every change delivers the whole text
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "deprewatch LSP initialized")
            .await;

        // Acquire the catalog up front, then annotate whatever is already
        // open. Scans requested meanwhile await the same acquisition.
        let catalog = self.ensure_catalog().await;
        self.client
            .log_message(
                MessageType::INFO,
                format!("deprecation catalog loaded ({} records)", catalog.len()),
            )
            .await;

        self.publish_all().await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let text = params.text_document.text;

        self.documents.write().await.insert(uri.clone(), text);
        self.publish(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();

        // Full sync: the last change carries the complete text
        if let Some(change) = params.content_changes.into_iter().last() {
            self.documents.write().await.insert(uri.clone(), change.text);
            self.publish(uri).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.write().await.remove(&uri);

        // Replace-all semantics: a closed document has no annotations
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_to_position_first_line() {
        let text = "abc def";
        assert_eq!(offset_to_position(text, 0), Position { line: 0, character: 0 });
        assert_eq!(offset_to_position(text, 4), Position { line: 0, character: 4 });
    }

    #[test]
    fn offset_to_position_later_lines() {
        let text = "line one\nline two\nline three";
        let offset = text.find("two").unwrap();
        assert_eq!(offset_to_position(text, offset), Position { line: 1, character: 5 });
    }

    #[test]
    fn offset_to_position_counts_utf16_units() {
        // '𝛑' is one char, four UTF-8 bytes, two UTF-16 units
        let text = "𝛑x";
        assert_eq!(offset_to_position(text, 4), Position { line: 0, character: 2 });
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let text = "ab";
        assert_eq!(offset_to_position(text, 99), Position { line: 0, character: 2 });
    }

    #[test]
    fn diagnostic_carries_label_and_style() {
        let text = "navigator.geolocation.watchPosition(cb);";
        let m = ApiMatch {
            api_name: "watchPosition".to_string(),
            change_type: "Deprecated".to_string(),
            description: "Use permissions API instead.".to_string(),
            start: 22,
            end: 35,
        };
        let style = AnnotationStyle::default();

        let diag = diagnostic_for(text, &m, &style);
        assert_eq!(diag.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diag.source.as_deref(), Some("deprewatch"));
        assert_eq!(
            diag.message,
            "[Deprecated] watchPosition: Use permissions API instead."
        );
        assert_eq!(diag.range.start, Position { line: 0, character: 22 });
        assert_eq!(diag.range.end, Position { line: 0, character: 35 });
    }

    #[test]
    fn error_severity_maps_to_lsp_error() {
        let style = AnnotationStyle {
            severity: Severity::Error,
            source: "deprewatch".to_string(),
        };
        let m = ApiMatch {
            api_name: "unload".to_string(),
            change_type: "Removed".to_string(),
            description: String::new(),
            start: 0,
            end: 6,
        };

        let diag = diagnostic_for("unload", &m, &style);
        assert_eq!(diag.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diag.message, "[Removed] unload");
    }
}

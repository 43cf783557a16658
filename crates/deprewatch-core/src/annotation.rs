//! Match results and annotation styling

use serde::{Deserialize, Serialize};

/// Annotation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - the API is gone, usage will break
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One occurrence of a deprecated API in a document's text.
///
/// `start..end` is a half-open byte-offset range into the text the match was
/// computed against. Matches are ephemeral: recomputed from scratch on every
/// check, never diffed against a previous run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMatch {
    /// Matched API name (copied from the catalog record)
    pub api_name: String,

    /// Change label from the record
    pub change_type: String,

    /// Guidance from the record
    pub description: String,

    /// Byte offset of the first matched character
    pub start: usize,

    /// Byte offset one past the last matched character
    pub end: usize,
}

impl ApiMatch {
    /// Short inline label, e.g. `[Deprecated] watchPosition`
    pub fn label(&self) -> String {
        format!("[{}] {}", self.change_type, self.api_name)
    }

    /// Full annotation message: the label plus the record's description
    pub fn message(&self) -> String {
        if self.description.is_empty() {
            self.label()
        } else {
            format!("{}: {}", self.label(), self.description)
        }
    }
}

/// Styling applied to every published annotation.
///
/// Passed explicitly into the annotation surfaces; there is no module-level
/// shared style state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// Severity assigned to every match annotation
    #[serde(default = "default_severity")]
    pub severity: Severity,

    /// Source tag shown next to each annotation
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_severity() -> Severity {
    Severity::Warn
}

fn default_source() -> String {
    "deprewatch".to_string()
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            severity: default_severity(),
            source: default_source(),
        }
    }
}

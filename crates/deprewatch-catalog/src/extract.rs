//! Section extraction from raw HTML
//!
//! Splits a document into (heading, body) blocks at one designated heading
//! level. Each body is the text content of everything between a heading and
//! the next heading of the same level, tags stripped and entities decoded.

use once_cell::sync::Lazy;
use regex::Regex;

/// One heading/body block, in document order. Transient: produced for
/// prompt construction, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Plain-text heading content
    pub heading: String,

    /// Plain-text content up to the next heading of the same level
    pub body: String,
}

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern compiles"));

/// Extracts sections delimited by headings of a single level
pub struct SectionExtractor {
    heading: Regex,
}

impl SectionExtractor {
    /// Create an extractor splitting on `<hN>` headings.
    ///
    /// `level` is clamped to the HTML heading range 1-6.
    pub fn new(level: u8) -> Self {
        let level = level.clamp(1, 6);
        let pattern = format!(r"(?is)<h{level}\b[^>]*>(.*?)</h{level}\s*>");
        Self {
            heading: Regex::new(&pattern).expect("heading pattern compiles"),
        }
    }

    /// Split `html` into ordered sections.
    ///
    /// Headings of deeper levels inside a body are body text, not section
    /// boundaries. A document with no headings (including the empty
    /// document) yields an empty sequence.
    pub fn extract(&self, html: &str) -> Vec<Section> {
        let headings: Vec<(usize, usize, String)> = self
            .heading
            .captures_iter(html)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let inner = caps.get(1)?;
                Some((whole.start(), whole.end(), text_content(inner.as_str())))
            })
            .collect();

        headings
            .iter()
            .enumerate()
            .map(|(i, (_, body_start, heading))| {
                let body_end = headings.get(i + 1).map_or(html.len(), |next| next.0);
                Section {
                    heading: heading.clone(),
                    body: text_content(&html[*body_start..body_end]),
                }
            })
            .collect()
    }
}

impl Default for SectionExtractor {
    /// Split on `<h2>` headings
    fn default() -> Self {
        Self::new(2)
    }
}

/// Strip tags, decode common entities, and collapse whitespace
fn text_content(html: &str) -> String {
    let without_tags = TAG.replace_all(html, " ");
    let decoded = decode_entities(&without_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the entities that show up in prose; anything rarer is left as-is
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

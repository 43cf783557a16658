//! Word-boundary literal matching of catalog entries against document text

use deprewatch_core::{ApiMatch, Catalog};
use regex::Regex;

/// Error building a match pattern
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("invalid match pattern for '{api_name}': {source}")]
    InvalidPattern {
        api_name: String,
        #[source]
        source: regex::Error,
    },
}

/// Scan `text` for every occurrence of every catalog entry.
///
/// Each API name is matched as an escaped, case-sensitive literal; regex
/// metacharacters in the name carry no pattern meaning. An occurrence
/// counts only when it is word-bounded: the characters adjacent to both
/// edges are non-word characters or the string edges (word = ASCII
/// alphanumeric or underscore).
///
/// Scanning is leftmost and non-overlapping per record: after an accepted
/// occurrence the scan resumes at its end, so immediately adjacent
/// occurrences are both found while self-overlapping ones are not. A
/// rejected occurrence only advances the scan by one character.
///
/// Output is grouped by catalog order, then by position within the text for
/// each record. Occurrences of different records are never deduplicated,
/// even when their ranges coincide. Deterministic: identical inputs yield
/// the identical ordered sequence.
pub fn scan(catalog: &Catalog, text: &str) -> Result<Vec<ApiMatch>, MatchError> {
    let mut matches = Vec::new();

    for record in catalog.iter() {
        // An empty name would match at every position; such records carry
        // no identifier to look for.
        if record.api_name.is_empty() {
            continue;
        }

        let pattern =
            Regex::new(&regex::escape(&record.api_name)).map_err(|source| MatchError::InvalidPattern {
                api_name: record.api_name.clone(),
                source,
            })?;

        let mut at = 0;
        while let Some(m) = pattern.find_at(text, at) {
            if word_bounded(text, m.start(), m.end()) {
                matches.push(ApiMatch {
                    api_name: record.api_name.clone(),
                    change_type: record.change_type.clone(),
                    description: record.description.clone(),
                    start: m.start(),
                    end: m.start() + record.api_name.len(),
                });
                at = m.end();
            } else {
                at = m.start() + char_width(text, m.start());
            }
        }
    }

    Ok(matches)
}

/// Word characters follow the original matcher's `\w`: ASCII alphanumerics
/// and underscore, not the full Unicode alphanumeric set.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True when both edges of `start..end` sit against a non-word character or
/// the string edge.
fn word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

/// UTF-8 width of the character starting at `at`
fn char_width(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(1, |c| c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deprewatch_core::DeprecationRecord;
    use pretty_assertions::assert_eq;

    fn catalog_of(names: &[&str]) -> Catalog {
        Catalog::new(
            names
                .iter()
                .map(|n| DeprecationRecord::new(*n, "Deprecated", "desc"))
                .collect(),
        )
    }

    fn offsets(matches: &[ApiMatch]) -> Vec<(usize, usize)> {
        matches.iter().map(|m| (m.start, m.end)).collect()
    }

    #[test]
    fn matches_surrounded_by_non_word_chars() {
        let matches = scan(&catalog_of(&["Foo"]), "x Foo y").unwrap();
        assert_eq!(offsets(&matches), vec![(2, 5)]);
    }

    #[test]
    fn does_not_match_inside_larger_word() {
        assert!(scan(&catalog_of(&["Foo"]), "FooBar").unwrap().is_empty());
        assert!(scan(&catalog_of(&["Foo"]), "xFoo").unwrap().is_empty());
    }

    #[test]
    fn metacharacters_are_literal() {
        let catalog = catalog_of(&["a.b()"]);

        let matches = scan(&catalog, "call a.b() now").unwrap();
        assert_eq!(offsets(&matches), vec![(5, 10)]);

        // '.' must not act as a wildcard
        assert!(scan(&catalog, "call aXb() now").unwrap().is_empty());
    }

    #[test]
    fn adjacency_inside_one_word_run() {
        // "FooFoo" is a single maximal word run; both instances are embedded
        assert!(scan(&catalog_of(&["Foo"]), "FooFoo").unwrap().is_empty());
    }

    #[test]
    fn adjacent_separated_occurrences_both_match() {
        let matches = scan(&catalog_of(&["Foo"]), "Foo Foo").unwrap();
        assert_eq!(offsets(&matches), vec![(0, 3), (4, 7)]);
    }

    #[test]
    fn rejected_occurrence_does_not_swallow_the_next_one() {
        // The embedded "Foo" at offset 1 is rejected; the scan must still
        // find the freestanding one at offset 5.
        let matches = scan(&catalog_of(&["Foo"]), "xFoo Foo").unwrap();
        assert_eq!(offsets(&matches), vec![(5, 8)]);
    }

    #[test]
    fn case_sensitive() {
        assert!(scan(&catalog_of(&["Foo"]), "foo FOO").unwrap().is_empty());
    }

    #[test]
    fn idempotent_over_identical_inputs() {
        let catalog = catalog_of(&["Foo", "Bar"]);
        let text = "Bar Foo Bar";
        let first = scan(&catalog, text).unwrap();
        let second = scan(&catalog, text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_grouped_by_catalog_order_then_position() {
        let matches = scan(&catalog_of(&["Foo", "Bar"]), "Bar Foo Bar").unwrap();
        let names: Vec<&str> = matches.iter().map(|m| m.api_name.as_str()).collect();
        assert_eq!(names, vec!["Foo", "Bar", "Bar"]);
        assert_eq!(offsets(&matches), vec![(4, 7), (0, 3), (8, 11)]);
    }

    #[test]
    fn coincident_ranges_from_different_records_are_both_emitted() {
        let catalog = Catalog::new(vec![
            DeprecationRecord::new("watchPosition", "Deprecated", "inner"),
            DeprecationRecord::new("geolocation.watchPosition", "Removed", "outer"),
        ]);
        let matches = scan(&catalog, "geolocation.watchPosition").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].start, matches[0].end), (12, 25));
        assert_eq!((matches[1].start, matches[1].end), (0, 25));
    }

    #[test]
    fn duplicate_records_match_independently() {
        let catalog = Catalog::new(vec![
            DeprecationRecord::new("Foo", "Deprecated", "first"),
            DeprecationRecord::new("Foo", "Removed", "second"),
        ]);
        let matches = scan(&catalog, "Foo").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].description, "first");
        assert_eq!(matches[1].description, "second");
    }

    #[test]
    fn empty_name_records_are_skipped() {
        let catalog = Catalog::new(vec![DeprecationRecord::new("", "Deprecated", "")]);
        assert!(scan(&catalog, "anything").unwrap().is_empty());
    }

    #[test]
    fn empty_inputs() {
        assert!(scan(&Catalog::empty(), "some text").unwrap().is_empty());
        assert!(scan(&catalog_of(&["Foo"]), "").unwrap().is_empty());
    }

    #[test]
    fn offsets_are_byte_offsets_past_multibyte_text() {
        // 'é' is two bytes; the match offsets index the UTF-8 bytes
        let matches = scan(&catalog_of(&["Foo"]), "é Foo").unwrap();
        assert_eq!(offsets(&matches), vec![(3, 6)]);
    }

    #[test]
    fn end_to_end_geolocation_example() {
        let catalog = Catalog::new(vec![DeprecationRecord::new(
            "geolocation.watchPosition",
            "Deprecated",
            "Use permissions API instead.",
        )]);
        let text = "navigator.geolocation.watchPosition(cb);";

        let matches = scan(&catalog, text).unwrap();
        assert_eq!(matches.len(), 1);

        let m = &matches[0];
        let start = text.find("geolocation.watchPosition").unwrap();
        assert_eq!(m.start, start);
        assert_eq!(m.end, start + "geolocation.watchPosition".len());
        assert_eq!(m.change_type, "Deprecated");
        assert_eq!(m.description, "Use permissions API instead.");
        assert_eq!(&text[m.start..m.end], "geolocation.watchPosition");
    }
}

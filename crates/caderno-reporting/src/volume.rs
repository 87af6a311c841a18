use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use caderno_core::{ParsedRecord, SourcedRecord};

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Group records by axis.
///
/// Axes come out in lexicographic order; within an axis, records keep the
/// order they were given in.
pub fn group_by_axis(records: &[SourcedRecord]) -> BTreeMap<String, Vec<&SourcedRecord>> {
    let mut grouped: BTreeMap<String, Vec<&SourcedRecord>> = BTreeMap::new();
    for r in records {
        grouped.entry(r.record.axis.clone()).or_default().push(r);
    }
    grouped
}

/// Split a body into display paragraphs.
///
/// Paragraphs are separated by blank lines; line breaks inside a paragraph
/// become spaces.
pub fn split_paragraphs(body: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(body)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.lines().map(str::trim).collect::<Vec<_>>().join(" "))
        .collect()
}

/// Authors as printed under the title.
pub fn authors_line(record: &ParsedRecord) -> String {
    record.authors.join(", ")
}

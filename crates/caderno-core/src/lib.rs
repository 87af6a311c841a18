use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;

pub use backend::{BackendError, TextBackend, join_pages};

/// A classified abstract.
///
/// Every field is populated: when a heuristic does not match, the classifier
/// substitutes a deterministic fallback instead of leaving a field empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub title: String,
    pub authors: Vec<String>,
    /// Grouping key for the compiled volume.
    pub axis: String,
    /// Narrative text, paragraphs separated by a blank line (`"\n\n"`).
    pub body: String,
}

/// Which rule produced the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleSource {
    /// Leading lines accumulated before an author-like or header line.
    Accumulated,
    /// Nothing accumulated; the first line of the document was used.
    FirstLine,
    /// Empty document.
    Placeholder,
}

/// Which rule produced the author list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorSource {
    /// A separator-bearing line inside the scan window after the title.
    Window,
    /// The short-line check on the first non-affiliation line after the title.
    ShortLine,
    Placeholder,
}

/// Which rule produced the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSource {
    /// `Label: value` found anywhere in the text.
    Labeled,
    /// An early line merely containing a label keyword, taken verbatim.
    KeywordLine,
    Default,
}

/// Which rule produced the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySource {
    /// Lines left over after title and authors.
    Lines,
    /// Nothing left over; the whole original text.
    FullText,
}

impl TitleSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Accumulated)
    }
}

impl AuthorSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Window)
    }
}

impl AxisSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Labeled)
    }
}

impl BodySource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FullText)
    }
}

/// Per-field record of which heuristic (or fallback) produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    pub title: TitleSource,
    pub authors: AuthorSource,
    pub axis: AxisSource,
    pub body: BodySource,
}

impl Provenance {
    /// Names of the fields that did not come from their primary heuristic.
    pub fn fallback_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_fallback() {
            fields.push("title");
        }
        if self.authors.is_fallback() {
            fields.push("authors");
        }
        if self.axis.is_fallback() {
            fields.push("axis");
        }
        if self.body.is_fallback() {
            fields.push("body");
        }
        fields
    }

    pub fn used_fallback(&self) -> bool {
        !self.fallback_fields().is_empty()
    }

    /// True when authors, axis and body all fell back to their last resort.
    pub fn is_total_fallback(&self) -> bool {
        self.authors == AuthorSource::Placeholder
            && self.axis == AxisSource::Default
            && self.body == BodySource::FullText
    }
}

/// Output of a classifier run: the record plus how each field was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub record: ParsedRecord,
    pub provenance: Provenance,
}

/// A classified record tagged with the document it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcedRecord {
    /// File name of the source document.
    pub source: String,
    pub record: ParsedRecord,
    pub provenance: Provenance,
}

impl SourcedRecord {
    pub fn new(source: impl Into<String>, classification: Classification) -> Self {
        Self {
            source: source.into(),
            record: classification.record,
            provenance: classification.provenance,
        }
    }
}

/// Counts of fallback usage across a batch of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackStats {
    pub title: usize,
    pub authors: usize,
    pub axis: usize,
    pub body: usize,
    pub total_fallback: usize,
    pub records: usize,
}

impl FallbackStats {
    pub fn record(&mut self, provenance: &Provenance) {
        self.records += 1;
        self.title += provenance.title.is_fallback() as usize;
        self.authors += provenance.authors.is_fallback() as usize;
        self.axis += provenance.axis.is_fallback() as usize;
        self.body += provenance.body.is_fallback() as usize;
        self.total_fallback += provenance.is_total_fallback() as usize;
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a SourcedRecord>) -> Self {
        let mut stats = Self::default();
        for r in records {
            stats.record(&r.provenance);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary() -> Provenance {
        Provenance {
            title: TitleSource::Accumulated,
            authors: AuthorSource::Window,
            axis: AxisSource::Labeled,
            body: BodySource::Lines,
        }
    }

    #[test]
    fn primary_provenance_has_no_fallbacks() {
        let p = primary();
        assert!(!p.used_fallback());
        assert!(!p.is_total_fallback());
        assert!(p.fallback_fields().is_empty());
    }

    #[test]
    fn fallback_fields_lists_each_degraded_field() {
        let p = Provenance {
            authors: AuthorSource::ShortLine,
            axis: AxisSource::Default,
            ..primary()
        };
        assert_eq!(p.fallback_fields(), vec!["authors", "axis"]);
        assert!(!p.is_total_fallback());
    }

    #[test]
    fn total_fallback_detected() {
        let p = Provenance {
            title: TitleSource::Accumulated,
            authors: AuthorSource::Placeholder,
            axis: AxisSource::Default,
            body: BodySource::FullText,
        };
        assert!(p.is_total_fallback());
    }

    #[test]
    fn stats_accumulate_over_records() {
        let record = ParsedRecord {
            title: "T".into(),
            authors: vec!["A".into()],
            axis: "X".into(),
            body: "B".into(),
        };
        let ok = SourcedRecord {
            source: "a.pdf".into(),
            record: record.clone(),
            provenance: primary(),
        };
        let degraded = SourcedRecord {
            source: "b.pdf".into(),
            record,
            provenance: Provenance {
                axis: AxisSource::KeywordLine,
                ..primary()
            },
        };
        let stats = FallbackStats::from_records([&ok, &degraded]);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.axis, 1);
        assert_eq!(stats.title, 0);
        assert_eq!(stats.total_fallback, 0);
    }

    #[test]
    fn provenance_serializes_snake_case() {
        let text = toml::to_string(&Provenance {
            authors: AuthorSource::ShortLine,
            ..primary()
        })
        .unwrap();
        assert!(text.contains("title = \"accumulated\""));
        assert!(text.contains("authors = \"short_line\""));
    }
}

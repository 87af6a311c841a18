use std::path::Path;

use caderno_core::{Classification, ParsedRecord, Provenance, TextBackend};

use crate::ParsingError;
use crate::authors::{self, AuthorOutcome};
use crate::axis::{self, AxisOutcome};
use crate::body::{self, BodyOutcome};
use crate::config::ParsingConfig;
use crate::lines::DocumentLines;
use crate::title::{self, TitleOutcome};

/// A configurable abstract classifier.
///
/// Holds a [`ParsingConfig`] and exposes each stage as a method. Every call
/// is a pure function of its input; one classifier can be shared across
/// threads and used for many documents at once.
#[derive(Debug, Clone, Default)]
pub struct AbstractClassifier {
    config: ParsingConfig,
}

impl AbstractClassifier {
    /// Create a classifier with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Normalise raw text into its non-empty trimmed lines.
    pub fn split_lines(&self, text: &str) -> DocumentLines {
        DocumentLines::from_text(text)
    }

    /// Stage 1: title from the leading lines.
    pub fn extract_title(&self, lines: &DocumentLines) -> TitleOutcome {
        title::extract_title_with_config(lines, &self.config)
    }

    /// Stage 2: authors, starting where the title ended.
    pub fn extract_authors(&self, lines: &DocumentLines, start: usize) -> AuthorOutcome {
        authors::extract_authors_with_config(lines, start, &self.config)
    }

    /// Stage 3: axis, scanning the whole text.
    pub fn extract_axis(&self, text: &str, lines: &DocumentLines) -> AxisOutcome {
        axis::extract_axis_with_config(text, lines, &self.config)
    }

    /// Stage 4: body from the unconsumed lines.
    pub fn reconstruct_body(&self, text: &str, lines: &DocumentLines, start: usize) -> BodyOutcome {
        body::reconstruct_body_with_config(text, lines, start, &self.config)
    }

    /// Classify raw extracted text into a fully populated record.
    pub fn classify(&self, text: &str) -> Classification {
        let lines = self.split_lines(text);
        self.classify_lines(&lines, text)
    }

    /// Classify pre-split lines; `text` is the original unsegmented text used
    /// for the axis scan and the body fallback.
    pub fn classify_lines(&self, lines: &DocumentLines, text: &str) -> Classification {
        let title = self.extract_title(lines);
        let authors = self.extract_authors(lines, title.next);
        let axis = self.extract_axis(text, lines);
        let body = self.reconstruct_body(text, lines, authors.next);

        let provenance = Provenance {
            title: title.source,
            authors: authors.source,
            axis: axis.source,
            body: body.source,
        };

        tracing::debug!(
            lines = lines.len(),
            title_source = ?provenance.title,
            author_source = ?provenance.authors,
            axis_source = ?provenance.axis,
            body_source = ?provenance.body,
            authors = authors.authors.len(),
            "classified document"
        );

        Classification {
            record: ParsedRecord {
                title: title.title,
                authors: authors.authors,
                axis: axis.axis,
                body: body.body,
            },
            provenance,
        }
    }

    /// Extract a document's text through `backend` and classify it.
    pub fn classify_file(
        &self,
        path: &Path,
        backend: &dyn TextBackend,
    ) -> Result<Classification, ParsingError> {
        let text = backend.extract_text(path)?;
        Ok(self.classify(&text))
    }
}

use std::path::Path;

use thiserror::Error;

pub mod authors;
pub mod axis;
pub mod body;
pub mod classifier;
pub mod config;
pub mod lines;
pub mod rules;
pub mod title;

pub use classifier::AbstractClassifier;
pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use lines::DocumentLines;
// Re-export domain types from core (canonical definitions live there)
pub use caderno_core::{
    AuthorSource, AxisSource, BackendError, BodySource, Classification, ParsedRecord, Provenance,
    TextBackend, TitleSource,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("backend error: {0}")]
    Backend(#[from] caderno_core::BackendError),
}

/// Classify extracted abstract text with the default configuration.
///
/// Pipeline:
/// 1. Split into trimmed non-empty lines
/// 2. Accumulate the title until an author-like or header line
/// 3. Find the authors line in the window after the title
/// 4. Find the axis anywhere in the text
/// 5. Rebuild the body from what is left
///
/// Never fails: each stage falls back to a fixed value, and the returned
/// [`Provenance`] records which fallbacks were used.
pub fn classify(text: &str) -> Classification {
    AbstractClassifier::new().classify(text)
}

/// Extract a document with `backend` and classify it with the default configuration.
pub fn classify_file(path: &Path, backend: &dyn TextBackend) -> Result<Classification, ParsingError> {
    AbstractClassifier::new().classify_file(path, backend)
}

use std::path::{Path, PathBuf};

use thiserror::Error;

use caderno_parsing::AbstractClassifier;

pub mod batch;
pub mod plain;

pub use batch::{IngestFailure, IngestProgress, IngestReport, ingest_folder, ingest_paths};
// Re-export domain types for convenience
pub use caderno_core::{Classification, FallbackStats, ParsedRecord, SourcedRecord};
pub use plain::PlainTextBackend;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("extraction error: {0}")]
    Extraction(#[from] caderno_parsing::ParsingError),
    #[error("unsupported document type: {}", .0.display())]
    UnsupportedExtension(PathBuf),
    #[error("input directory not found: {}", .0.display())]
    NoInputDir(PathBuf),
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("worker task failed: {0}")]
    Join(String),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of caderno-ingest)")]
    NoPdfSupport,
}

/// Kinds of source document the ingester understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Classify a path by its extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

/// List the documents to compile in `dir`, sorted by path.
///
/// Only regular files with a `.pdf` or `.txt` extension are returned;
/// subdirectories are not descended into. An empty directory yields an
/// empty list.
pub fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::NoInputDir(dir.to_path_buf()));
    }

    let read_err = |source| IngestError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() && DocumentKind::from_path(&path).is_some() {
            sources.push(path);
        }
    }
    sources.sort();

    tracing::debug!(dir = %dir.display(), count = sources.len(), "collected sources");
    Ok(sources)
}

/// Extract and classify one document.
///
/// Dispatches on extension:
/// - `.pdf` → MuPDF backend (requires `pdf` feature)
/// - `.txt` → [`PlainTextBackend`]
pub fn ingest_file(
    path: &Path,
    classifier: &AbstractClassifier,
) -> Result<SourcedRecord, IngestError> {
    let classification = match DocumentKind::from_path(path) {
        Some(DocumentKind::Pdf) => classify_pdf(path, classifier)?,
        Some(DocumentKind::Text) => classifier.classify_file(path, &PlainTextBackend)?,
        None => return Err(IngestError::UnsupportedExtension(path.to_path_buf())),
    };

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(SourcedRecord::new(source, classification))
}

#[cfg(feature = "pdf")]
fn classify_pdf(
    path: &Path,
    classifier: &AbstractClassifier,
) -> Result<Classification, IngestError> {
    let backend = caderno_pdf_mupdf::MupdfBackend::default();
    Ok(classifier.classify_file(path, &backend)?)
}

#[cfg(not(feature = "pdf"))]
fn classify_pdf(
    _path: &Path,
    _classifier: &AbstractClassifier,
) -> Result<Classification, IngestError> {
    Err(IngestError::NoPdfSupport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_ignores_case() {
        assert_eq!(
            DocumentKind::from_path(Path::new("a/RESUMO.PDF")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("resumo.Txt")),
            Some(DocumentKind::Text)
        );
        assert_eq!(DocumentKind::from_path(Path::new("resumo.docx")), None);
        assert_eq!(DocumentKind::from_path(Path::new("LEIAME")), None);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = ingest_file(Path::new("notas.md"), &AbstractClassifier::new()).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedExtension(_)));
    }

    #[test]
    fn missing_dir_is_reported() {
        let err = collect_sources(Path::new("/nonexistent/caderno/resumos")).unwrap_err();
        assert!(matches!(err, IngestError::NoInputDir(_)));
    }
}

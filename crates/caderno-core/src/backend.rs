use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document text extraction backends.
///
/// Implementors turn a source document into ordered page-level text blocks.
/// Layout fidelity (columns, tables, spacing) is not guaranteed; the
/// classifier in `caderno_parsing` only relies on line order.
pub trait TextBackend: Send + Sync {
    /// Extract the text of each page, in page order.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;

    /// Extract the whole document as one string.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let pages = self.extract_pages(path)?;
        Ok(join_pages(&pages))
    }
}

/// Join page texts with a newline, skipping empty pages, and trim the result.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<String>);

    impl TextBackend for FixedPages {
        fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn join_skips_empty_pages_and_trims() {
        let pages = vec![
            "  Title\n".to_string(),
            String::new(),
            "Body text\n\n".to_string(),
        ];
        assert_eq!(join_pages(&pages), "Title\n\nBody text");
    }

    #[test]
    fn default_extract_text_joins_pages() {
        let backend = FixedPages(vec!["one".into(), "two".into()]);
        let text = backend.extract_text(Path::new("ignored.pdf")).unwrap();
        assert_eq!(text, "one\ntwo");
    }
}

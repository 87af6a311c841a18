use std::path::Path;

use caderno_core::{BackendError, TextBackend};

/// Form feed; `pdftotext` and similar tools emit it between pages.
const PAGE_BREAK: char = '\u{000C}';

/// [`TextBackend`] for plain-text abstracts (`.txt`).
///
/// The file is read as UTF-8; invalid sequences are replaced rather than
/// rejected so that Latin-1 exports still classify. Pages are split on form
/// feed characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextBackend;

impl PlainTextBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for PlainTextBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(text.split(PAGE_BREAK).map(str::to_string).collect())
    }
}

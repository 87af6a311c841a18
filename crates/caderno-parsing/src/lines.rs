/// The ordered, trimmed, non-empty lines of one extracted document.
///
/// Line endings are normalised (`\r\n` and lone `\r` become `\n`), every
/// line is trimmed and blank lines are dropped. Order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLines {
    lines: Vec<String>,
}

impl DocumentLines {
    pub fn from_text(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let lines = normalized
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    /// Lines from `start` to the end; empty when `start` is past the end.
    pub fn tail(&self, start: usize) -> &[String] {
        self.lines.get(start..).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_lines_and_trims() {
        let lines = DocumentLines::from_text("  Título  \n\n   \nAutor\r\nCorpo\rFim\n");
        assert_eq!(lines.as_slice(), &["Título", "Autor", "Corpo", "Fim"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(DocumentLines::from_text("").is_empty());
        assert!(DocumentLines::from_text(" \n\t\n").is_empty());
    }

    #[test]
    fn tail_past_end_is_empty() {
        let lines = DocumentLines::from_text("a\nb");
        assert_eq!(lines.tail(1), &["b"]);
        assert!(lines.tail(2).is_empty());
        assert!(lines.tail(10).is_empty());
    }

    #[test]
    fn form_feed_only_lines_are_blank() {
        let lines = DocumentLines::from_text("página um\n\u{c}\npágina dois");
        assert_eq!(lines.len(), 2);
    }
}

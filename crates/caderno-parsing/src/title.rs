use caderno_core::TitleSource;

use crate::config::ParsingConfig;
use crate::lines::DocumentLines;
use crate::rules::{self, Rule};

/// Conditions that end title accumulation, in priority order. The matching
/// line is not consumed.
pub const TITLE_STOP_RULES: &[Rule] = &[
    Rule {
        name: "section_header",
        test: rules::starts_with_section_header,
    },
    Rule {
        name: "author_line",
        test: rules::looks_like_author_line,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleOutcome {
    pub title: String,
    pub source: TitleSource,
    /// Index of the first line not assigned to the title.
    pub next: usize,
    /// Name of the rule that stopped accumulation, if any.
    pub stopped_by: Option<&'static str>,
}

/// Extract the title from the leading lines of a document.
///
/// Accumulates up to `max_title_lines` lines, stopping before the first line
/// that begins with a section header or looks like an author line. With
/// nothing accumulated the first line is used; it is left unconsumed when
/// it carries an author separator, so the author window still reads it. An
/// empty document gets the untitled placeholder.
pub fn extract_title(lines: &DocumentLines) -> TitleOutcome {
    extract_title_with_config(lines, &ParsingConfig::default())
}

/// Config-aware version of [`extract_title`].
pub(crate) fn extract_title_with_config(
    lines: &DocumentLines,
    config: &ParsingConfig,
) -> TitleOutcome {
    let mut accumulated: Vec<&str> = Vec::new();
    let mut idx = 0;
    let mut stopped_by = None;

    while let Some(candidate) = lines.get(idx) {
        if accumulated.len() >= config.max_title_lines {
            break;
        }
        if let Some(rule) = TITLE_STOP_RULES.iter().find(|r| r.matches(candidate, config)) {
            tracing::trace!(line = idx, rule = rule.name, "title accumulation stopped");
            stopped_by = Some(rule.name);
            break;
        }
        accumulated.push(candidate);
        idx += 1;
    }

    if !accumulated.is_empty() {
        return TitleOutcome {
            title: accumulated.join(" "),
            source: TitleSource::Accumulated,
            next: idx,
            stopped_by,
        };
    }

    match lines.first() {
        Some(first) => {
            let shared_with_authors =
                stopped_by == Some("author_line") && rules::is_author_candidate(first, config);
            TitleOutcome {
                title: first.to_string(),
                source: TitleSource::FirstLine,
                next: if shared_with_authors { 0 } else { 1 },
                stopped_by,
            }
        }
        None => TitleOutcome {
            title: config.untitled_placeholder.clone(),
            source: TitleSource::Placeholder,
            next: 0,
            stopped_by,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(text: &str) -> TitleOutcome {
        extract_title(&DocumentLines::from_text(text))
    }

    #[test]
    fn multi_line_title_joined_with_space() {
        let t = title_of("Impacto da IA\nna educação básica\nMaria Silva; João Souza");
        assert_eq!(t.title, "Impacto da IA na educação básica");
        assert_eq!(t.source, TitleSource::Accumulated);
        assert_eq!(t.next, 2);
        assert_eq!(t.stopped_by, Some("author_line"));
    }

    #[test]
    fn stops_at_section_header() {
        let t = title_of("um estudo de caso\nResumo: texto");
        assert_eq!(t.title, "um estudo de caso");
        assert_eq!(t.next, 1);
        assert_eq!(t.stopped_by, Some("section_header"));
    }

    #[test]
    fn respects_max_title_lines() {
        let t = title_of("linha um\nlinha dois\nlinha três\nlinha quatro\nlinha cinco");
        assert_eq!(t.title, "linha um linha dois linha três");
        assert_eq!(t.next, 3);
        assert_eq!(t.stopped_by, None);
    }

    #[test]
    fn custom_max_title_lines() {
        let config = crate::ParsingConfigBuilder::new()
            .max_title_lines(1)
            .build()
            .unwrap();
        let lines = DocumentLines::from_text("linha um\nlinha dois");
        let t = extract_title_with_config(&lines, &config);
        assert_eq!(t.title, "linha um");
        assert_eq!(t.next, 1);
    }

    #[test]
    fn first_line_fallback_consumes_it() {
        let t = title_of("Maria Silva\nResumo");
        assert_eq!(t.title, "Maria Silva");
        assert_eq!(t.source, TitleSource::FirstLine);
        assert_eq!(t.next, 1);
    }

    #[test]
    fn leading_author_line_left_for_author_window() {
        let t = title_of("Maria Silva; João Souza\nResumo\nTexto do trabalho.");
        assert_eq!(t.title, "Maria Silva; João Souza");
        assert_eq!(t.source, TitleSource::FirstLine);
        assert_eq!(t.stopped_by, Some("author_line"));
        assert_eq!(t.next, 0);
    }

    #[test]
    fn leading_header_line_is_consumed() {
        let t = title_of("Resumo: apenas corpo, sem mais nada");
        assert_eq!(t.source, TitleSource::FirstLine);
        assert_eq!(t.stopped_by, Some("section_header"));
        assert_eq!(t.next, 1);
    }

    #[test]
    fn empty_document_gets_placeholder() {
        let t = title_of("   \n");
        assert_eq!(t.title, "Sem título");
        assert_eq!(t.source, TitleSource::Placeholder);
        assert_eq!(t.next, 0);
    }
}

use caderno_core::AuthorSource;

use crate::config::ParsingConfig;
use crate::lines::DocumentLines;
use crate::rules::{self, Rule};

/// What the author window does with a line matching a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    /// End the window; the narrative part has started.
    Stop,
    /// Move on without treating the line as authors.
    Skip,
    /// Split the line and commit it as the authors line.
    Take,
}

/// Rules for lines inside the author window, evaluated top to bottom.
/// Lines matching none of them are passed over.
pub const AUTHOR_WINDOW_RULES: &[(Rule, WindowAction)] = &[
    (
        Rule {
            name: "section_header",
            test: rules::starts_with_section_header,
        },
        WindowAction::Stop,
    ),
    (
        Rule {
            name: "affiliation",
            test: rules::is_affiliation_line,
        },
        WindowAction::Skip,
    ),
    (
        Rule {
            name: "author_candidate",
            test: rules::is_author_candidate,
        },
        WindowAction::Take,
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorOutcome {
    pub authors: Vec<String>,
    pub source: AuthorSource,
    /// Index of the first line not assigned to title or authors.
    pub next: usize,
}

/// Extract the author list starting at line `start` (the end of the title).
///
/// Scans up to `author_window` lines for a separator-bearing line, skipping
/// affiliation lines and stopping at a section header. Failing that, the
/// first non-affiliation line before any header is accepted when it is
/// short. Failing that, the unknown-author placeholder is used and the
/// pointer does not move.
pub fn extract_authors(lines: &DocumentLines, start: usize) -> AuthorOutcome {
    extract_authors_with_config(lines, start, &ParsingConfig::default())
}

/// Config-aware version of [`extract_authors`].
pub(crate) fn extract_authors_with_config(
    lines: &DocumentLines,
    start: usize,
    config: &ParsingConfig,
) -> AuthorOutcome {
    if let Some(found) = scan_window(lines, start, config) {
        return found;
    }
    if let Some(found) = short_line_fallback(lines, start, config) {
        return found;
    }
    tracing::trace!(start, "no author line found, using placeholder");
    AuthorOutcome {
        authors: vec![config.unknown_author_placeholder.clone()],
        source: AuthorSource::Placeholder,
        next: start,
    }
}

fn scan_window(lines: &DocumentLines, start: usize, config: &ParsingConfig) -> Option<AuthorOutcome> {
    let end = start.saturating_add(config.author_window).min(lines.len());
    for idx in start..end {
        let line = lines.get(idx)?;
        let Some((rule, action)) = AUTHOR_WINDOW_RULES
            .iter()
            .find(|(rule, _)| rule.matches(line, config))
        else {
            continue;
        };
        tracing::trace!(line = idx, rule = rule.name, ?action, "author window");
        match action {
            WindowAction::Stop => return None,
            WindowAction::Skip => continue,
            WindowAction::Take => {}
        }
        let authors = rules::split_authors(line, config);
        if !authors.is_empty() {
            return Some(AuthorOutcome {
                authors,
                source: AuthorSource::Window,
                next: idx + 1,
            });
        }
    }
    None
}

/// Accept the first line at or after `start` that is not an affiliation,
/// provided it is a short name-like line. Nothing past a section header
/// is considered.
fn short_line_fallback(
    lines: &DocumentLines,
    start: usize,
    config: &ParsingConfig,
) -> Option<AuthorOutcome> {
    let end = start.saturating_add(config.author_window).min(lines.len());
    let (idx, line) = (start..end)
        .filter_map(|i| lines.get(i).map(|l| (i, l)))
        .take_while(|(_, l)| !rules::starts_with_section_header(l, config))
        .find(|(_, l)| !rules::is_affiliation_line(l, config))?;
    if !rules::is_short_name_line(line, config) {
        return None;
    }
    let authors = rules::split_authors(line, config);
    if authors.is_empty() {
        return None;
    }
    Some(AuthorOutcome {
        authors,
        source: AuthorSource::ShortLine,
        next: idx + 1,
    })
}

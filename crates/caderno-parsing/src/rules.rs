//! Line-shape predicates shared by the classifier stages.
//!
//! Each predicate is a pure function of a single line and the config, so
//! stages can list them as ordered [`Rule`]s and tests can exercise them one
//! at a time.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// A named line predicate. Stages evaluate their rules top to bottom.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub test: fn(&str, &ParsingConfig) -> bool,
}

impl Rule {
    pub fn matches(&self, line: &str, config: &ParsingConfig) -> bool {
        (self.test)(line, config)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Line begins with a section header token ("Resumo", "Abstract", ...).
pub fn starts_with_section_header(line: &str, config: &ParsingConfig) -> bool {
    config
        .patterns
        .section_header
        .as_ref()
        .is_some_and(|re| re.is_match(line))
}

/// Line contains two consecutive capitalised words ("Maria Silva").
pub fn has_capitalized_name_pair(line: &str, _config: &ParsingConfig) -> bool {
    static NAME_PAIR_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b\p{Lu}\p{Ll}+ \p{Lu}\p{Ll}+").unwrap());
    NAME_PAIR_RE.is_match(line)
}

/// Short line holding a `;` or `,` separator.
pub fn is_short_separated_line(line: &str, config: &ParsingConfig) -> bool {
    (line.contains(';') || line.contains(',')) && char_len(line) < config.author_line_max_length
}

/// Title-stage author test: a short separated line or a capitalised name pair.
pub fn looks_like_author_line(line: &str, config: &ParsingConfig) -> bool {
    is_short_separated_line(line, config) || has_capitalized_name_pair(line, config)
}

/// Line carries an institutional marker and no semicolon.
///
/// Semicolon lines stay author candidates even when names are followed by
/// their institutions ("Ana Lima (Universidade X); Rui Dias (Instituto Y)").
pub fn is_affiliation_line(line: &str, config: &ParsingConfig) -> bool {
    !line.contains(';')
        && config
            .patterns
            .affiliation
            .as_ref()
            .is_some_and(|re| re.is_match(line))
}

/// Contains a conjunction token standing on its own ("Ana Lima e Rui Dias").
pub fn has_conjunction(line: &str, config: &ParsingConfig) -> bool {
    config
        .patterns
        .conjunction
        .as_ref()
        .is_some_and(|re| re.is_match(line))
}

/// Author-window test: semicolon, short comma line, or a standalone conjunction.
pub fn is_author_candidate(line: &str, config: &ParsingConfig) -> bool {
    line.contains(';')
        || (line.contains(',') && char_len(line) < config.author_line_max_length)
        || has_conjunction(line, config)
}

/// Mentions a section header, axis label or keywords marker.
pub fn is_header_like(line: &str, config: &ParsingConfig) -> bool {
    config
        .patterns
        .header_like
        .as_ref()
        .is_some_and(|re| re.is_match(line))
}

/// Line is a labelled axis field ("Eixo: Educação").
pub fn is_axis_field(line: &str, config: &ParsingConfig) -> bool {
    config
        .patterns
        .axis_field
        .as_ref()
        .is_some_and(|re| re.is_match(line))
}

/// Short line with at least one word character that is not a header/label.
pub fn is_short_name_line(line: &str, config: &ParsingConfig) -> bool {
    static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w").unwrap());
    char_len(line) < config.fallback_author_max_length
        && WORD_RE.is_match(line)
        && !is_header_like(line, config)
}

/// Text after a leading section header token, with `:`/`.`/dash separators
/// removed. `None` when the line does not start with a header.
pub fn strip_section_header<'a>(line: &'a str, config: &ParsingConfig) -> Option<&'a str> {
    let re = config.patterns.section_header.as_ref()?;
    let m = re.find(line)?;
    // The match already swallowed one separator character.
    let rest = &line[m.end()..];
    Some(rest.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, ':' | '.' | '-' | '–' | '—')
    }))
}

/// Split an authors line on `;`, `,` and standalone conjunctions.
///
/// Fragments are trimmed, trailing footnote markers (digits, `*`, `†`) are
/// dropped, and empty fragments are discarded.
pub fn split_authors(line: &str, config: &ParsingConfig) -> Vec<String> {
    config
        .patterns
        .author_split
        .split(line)
        .map(clean_author_name)
        .filter(|a| !a.is_empty())
        .collect()
}

fn clean_author_name(fragment: &str) -> String {
    fragment
        .trim()
        .trim_end_matches(|c: char| {
            c.is_ascii_digit() || matches!(c, '*' | '†' | '‡' | '¹' | '²' | '³')
        })
        .trim()
        .to_string()
}

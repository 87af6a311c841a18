use caderno_core::BodySource;

use crate::config::ParsingConfig;
use crate::lines::DocumentLines;
use crate::rules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyOutcome {
    pub body: String,
    pub source: BodySource,
}

/// Rebuild the narrative body from the lines left after title and authors.
///
/// Leading preamble lines (labelled axis fields, affiliations) are skipped,
/// then a leading section header is dropped; text following the header on
/// the same line is kept. Remaining lines are joined as paragraphs with
/// `"\n\n"`. When nothing is left, the whole original `text` is the body.
pub fn reconstruct_body(text: &str, lines: &DocumentLines, start: usize) -> BodyOutcome {
    reconstruct_body_with_config(text, lines, start, &ParsingConfig::default())
}

/// Config-aware version of [`reconstruct_body`].
pub(crate) fn reconstruct_body_with_config(
    text: &str,
    lines: &DocumentLines,
    start: usize,
    config: &ParsingConfig,
) -> BodyOutcome {
    let mut rest: Vec<&str> = lines
        .tail(start)
        .iter()
        .map(String::as_str)
        .skip_while(|l| is_preamble(l, config))
        .collect();

    if let Some(first) = rest.first().copied()
        && let Some(inline) = rules::strip_section_header(first, config)
    {
        if inline.is_empty() {
            rest.remove(0);
        } else {
            rest[0] = inline;
        }
    }

    let body = rest.join("\n\n").trim().to_string();
    if body.is_empty() {
        tracing::trace!(start, "no body lines left, using full text");
        return BodyOutcome {
            body: text.to_string(),
            source: BodySource::FullText,
        };
    }

    BodyOutcome {
        body,
        source: BodySource::Lines,
    }
}

fn is_preamble(line: &str, config: &ParsingConfig) -> bool {
    !rules::starts_with_section_header(line, config)
        && (rules::is_axis_field(line, config) || rules::is_affiliation_line(line, config))
}

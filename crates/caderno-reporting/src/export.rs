use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use caderno_core::{Provenance, SourcedRecord};

use crate::types::{ExportFormat, VolumeMeta};
use crate::volume::{authors_line, group_by_axis, split_paragraphs};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write volume: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize volume: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render the compiled volume and write it to `path`, creating parent
/// directories as needed.
pub fn export_volume(
    records: &[SourcedRecord],
    meta: &VolumeMeta,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let content = render_volume(records, meta, format)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content.as_bytes())?;

    tracing::info!(
        path = %path.display(),
        format = format.label(),
        records = records.len(),
        "wrote volume"
    );
    Ok(())
}

/// Render the compiled volume as a string.
pub fn render_volume(
    records: &[SourcedRecord],
    meta: &VolumeMeta,
    format: ExportFormat,
) -> Result<String, ExportError> {
    let grouped = group_by_axis(records);
    Ok(match format {
        ExportFormat::Markdown => export_markdown(&grouped, meta),
        ExportFormat::Text => export_text(&grouped, meta),
        ExportFormat::Html => export_html(&grouped, meta),
        ExportFormat::Json => export_json(&grouped, meta)?,
    })
}

type Grouped<'a> = BTreeMap<String, Vec<&'a SourcedRecord>>;

/// One line of the volume cover.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CoverLine {
    Event(String),
    Title(String),
    Institution(String),
    Organizers(String),
    PlaceAndDate(String),
}

impl CoverLine {
    fn text(&self) -> &str {
        match self {
            CoverLine::Event(s)
            | CoverLine::Title(s)
            | CoverLine::Institution(s)
            | CoverLine::Organizers(s)
            | CoverLine::PlaceAndDate(s) => s,
        }
    }

    /// HTML class for the `<p>` rendering; the title is an `<h1>` instead.
    fn css_class(&self) -> &'static str {
        match self {
            CoverLine::Event(_) => "event",
            CoverLine::Title(_) => "title",
            CoverLine::Institution(_) => "institution",
            CoverLine::Organizers(_) => "organizers",
            CoverLine::PlaceAndDate(_) => "place",
        }
    }
}

/// Cover lines in display order, skipping unset fields.
fn cover_lines(meta: &VolumeMeta) -> Vec<CoverLine> {
    let mut lines = Vec::new();
    if let Some(name) = &meta.event_name {
        lines.push(CoverLine::Event(name.clone()));
    }
    lines.push(CoverLine::Title(meta.volume_title.clone()));
    if let Some(inst) = &meta.institution {
        lines.push(CoverLine::Institution(inst.clone()));
    }
    if let Some(org) = &meta.organizers {
        lines.push(CoverLine::Organizers(org.clone()));
    }
    if let Some(pd) = meta.place_and_date() {
        lines.push(CoverLine::PlaceAndDate(pd));
    }
    lines
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonVolume<'a> {
    meta: &'a VolumeMeta,
    axes: Vec<JsonAxis<'a>>,
}

#[derive(Serialize)]
struct JsonAxis<'a> {
    axis: &'a str,
    records: Vec<JsonRecord<'a>>,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    source: &'a str,
    title: &'a str,
    authors: &'a [String],
    paragraphs: Vec<String>,
    provenance: &'a Provenance,
}

fn export_json(grouped: &Grouped<'_>, meta: &VolumeMeta) -> Result<String, serde_json::Error> {
    let volume = JsonVolume {
        meta,
        axes: grouped
            .iter()
            .map(|(axis, records)| JsonAxis {
                axis,
                records: records
                    .iter()
                    .map(|r| JsonRecord {
                        source: &r.source,
                        title: &r.record.title,
                        authors: &r.record.authors,
                        paragraphs: split_paragraphs(&r.record.body),
                        provenance: &r.provenance,
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&volume)
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

fn md_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '#' | '|' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn export_markdown(grouped: &Grouped<'_>, meta: &VolumeMeta) -> String {
    let mut out = String::new();

    for line in cover_lines(meta) {
        let text = md_escape(line.text());
        match line {
            CoverLine::Title(_) => out.push_str(&format!("# {text}\n\n")),
            CoverLine::Event(_) => out.push_str(&format!("**{text}**\n\n")),
            CoverLine::Organizers(_) => out.push_str(&format!("*{text}*\n\n")),
            CoverLine::Institution(_) | CoverLine::PlaceAndDate(_) => {
                out.push_str(&format!("{text}\n\n"))
            }
        }
    }
    out.push_str("---\n\n");

    out.push_str(&format!("## {}\n\n", md_escape(&meta.toc_heading)));
    for (axis, records) in grouped {
        out.push_str(&format!("- {}\n", md_escape(axis)));
        for r in records {
            out.push_str(&format!("  - {}\n", md_escape(&r.record.title)));
        }
    }
    out.push_str("\n---\n\n");

    for (axis, records) in grouped {
        out.push_str(&format!("## {}\n\n", md_escape(axis)));
        for r in records {
            out.push_str(&format!("### {}\n\n", md_escape(&r.record.title)));
            out.push_str(&format!("*{}*\n\n", md_escape(&authors_line(&r.record))));
            for p in split_paragraphs(&r.record.body) {
                out.push_str(&md_escape(&p));
                out.push_str("\n\n");
            }
        }
        out.push_str("---\n\n");
    }
    out
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

fn underline(out: &mut String, text: &str, ch: char) {
    out.push_str(text);
    out.push('\n');
    out.push_str(&ch.to_string().repeat(text.chars().count()));
    out.push('\n');
}

fn export_text(grouped: &Grouped<'_>, meta: &VolumeMeta) -> String {
    let mut out = String::new();

    for line in cover_lines(meta) {
        if let CoverLine::Title(title) = &line {
            underline(&mut out, title, '=');
        } else {
            out.push_str(line.text());
            out.push('\n');
        }
    }
    out.push('\n');

    underline(&mut out, &meta.toc_heading, '-');
    for (axis, records) in grouped {
        out.push_str(&format!("{axis}\n"));
        for r in records {
            out.push_str(&format!("    {}\n", r.record.title));
        }
    }

    for (axis, records) in grouped {
        out.push_str("\n\n");
        underline(&mut out, axis, '=');
        for r in records {
            out.push('\n');
            underline(&mut out, &r.record.title, '-');
            out.push_str(&authors_line(&r.record));
            out.push('\n');
            for p in split_paragraphs(&r.record.body) {
                out.push('\n');
                out.push_str(&p);
                out.push('\n');
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const HTML_STYLE: &str = r#"body {
  font-family: Georgia, 'Times New Roman', serif;
  max-width: 42rem;
  margin: 0 auto;
  padding: 2rem;
  line-height: 1.6;
  color: #222;
}
.cover { text-align: center; margin: 4rem 0; page-break-after: always; }
.cover .event { font-size: 1.8rem; font-weight: bold; }
.cover h1 { font-size: 1.5rem; font-weight: normal; }
.cover .organizers { font-style: italic; }
nav.toc { page-break-after: always; }
nav.toc ol { list-style: none; padding-left: 1rem; }
section.axis { page-break-before: always; }
h3 { margin-bottom: 0.2rem; }
.authors { text-align: center; font-style: italic; margin-top: 0; }
p.body { text-align: justify; text-indent: 1.5rem; }
"#;

fn export_html(grouped: &Grouped<'_>, meta: &VolumeMeta) -> String {
    let mut out = String::with_capacity(8192);

    out.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"UTF-8\">\n");
    out.push_str(&format!(
        "<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n",
        html_escape(&meta.volume_title),
        HTML_STYLE
    ));

    out.push_str("<header class=\"cover\">\n");
    for line in cover_lines(meta) {
        let text = html_escape(line.text());
        if let CoverLine::Title(_) = line {
            out.push_str(&format!("<h1>{text}</h1>\n"));
        } else {
            out.push_str(&format!("<p class=\"{}\">{text}</p>\n", line.css_class()));
        }
    }
    out.push_str("</header>\n");

    out.push_str(&format!(
        "<nav class=\"toc\">\n<h2>{}</h2>\n<ol>\n",
        html_escape(&meta.toc_heading)
    ));
    for (ai, (axis, records)) in grouped.iter().enumerate() {
        out.push_str(&format!(
            "<li><a href=\"#axis-{ai}\">{}</a>\n<ol>\n",
            html_escape(axis)
        ));
        for (ri, r) in records.iter().enumerate() {
            out.push_str(&format!(
                "<li><a href=\"#axis-{ai}-{ri}\">{}</a></li>\n",
                html_escape(&r.record.title)
            ));
        }
        out.push_str("</ol>\n</li>\n");
    }
    out.push_str("</ol>\n</nav>\n");

    for (ai, (axis, records)) in grouped.iter().enumerate() {
        out.push_str(&format!(
            "<section class=\"axis\" id=\"axis-{ai}\">\n<h2>{}</h2>\n",
            html_escape(axis)
        ));
        for (ri, r) in records.iter().enumerate() {
            out.push_str(&format!(
                "<article id=\"axis-{ai}-{ri}\" data-source=\"{}\">\n<h3>{}</h3>\n<p class=\"authors\">{}</p>\n",
                html_escape(&r.source),
                html_escape(&r.record.title),
                html_escape(&authors_line(&r.record)),
            ));
            for p in split_paragraphs(&r.record.body) {
                out.push_str(&format!("<p class=\"body\">{}</p>\n", html_escape(&p)));
            }
            out.push_str("</article>\n");
        }
        out.push_str("</section>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

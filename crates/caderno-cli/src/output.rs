use std::io::Write;
use std::path::Path;

use caderno_core::{FallbackStats, SourcedRecord};
use caderno_ingest::IngestFailure;
use caderno_reporting::{ExportFormat, authors_line, split_paragraphs};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the banner before a folder is ingested.
pub fn print_compile_header(
    w: &mut dyn Write,
    input_dir: &Path,
    documents: usize,
    workers: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let dir = input_dir.display().to_string();
    if color.enabled() {
        writeln!(
            w,
            "Compiling {} documents from {} ({} workers)",
            documents.bold(),
            dir.bold(),
            workers
        )?;
    } else {
        writeln!(
            w,
            "Compiling {} documents from {} ({} workers)",
            documents, dir, workers
        )?;
    }
    Ok(())
}

/// List the documents that could not be ingested.
pub fn print_failures(
    w: &mut dyn Write,
    failures: &[IngestFailure],
    color: ColorMode,
) -> std::io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "Failed documents:".red().bold())?;
    } else {
        writeln!(w, "Failed documents:")?;
    }
    for f in failures {
        let name = f
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| f.path.display().to_string());
        if color.enabled() {
            writeln!(w, "  {} {}", name.red(), f.error.dimmed())?;
        } else {
            writeln!(w, "  {} {}", name, f.error)?;
        }
    }
    Ok(())
}

/// Print how many records fell back on each field.
pub fn print_summary(
    w: &mut dyn Write,
    stats: &FallbackStats,
    failed: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "Summary".bold())?;
    } else {
        writeln!(w, "Summary")?;
    }
    writeln!(w, "  Classified:          {}", stats.records)?;
    if failed > 0 {
        if color.enabled() {
            writeln!(w, "  Failed:              {}", failed.red())?;
        } else {
            writeln!(w, "  Failed:              {}", failed)?;
        }
    }

    let rows = [
        ("Title from 1st line", stats.title),
        ("Authors fallback", stats.authors),
        ("Default axis", stats.axis),
        ("Body is full text", stats.body),
        ("Total fallback", stats.total_fallback),
    ];
    for (label, count) in rows {
        let padded = format!("{label}:");
        if color.enabled() && count > 0 {
            writeln!(w, "  {:<21}{}", padded, count.yellow())?;
        } else {
            writeln!(w, "  {:<21}{}", padded, count)?;
        }
    }
    Ok(())
}

pub fn print_written(
    w: &mut dyn Write,
    path: &Path,
    format: ExportFormat,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    let path = path.display().to_string();
    if color.enabled() {
        writeln!(w, "{} {} ({})", "Volume written to".green(), path.bold(), format.label())?;
    } else {
        writeln!(w, "Volume written to {} ({})", path, format.label())?;
    }
    Ok(())
}

/// Print one classified record with the rule behind each field.
pub fn print_record(
    w: &mut dyn Write,
    r: &SourcedRecord,
    color: ColorMode,
) -> std::io::Result<()> {
    let p = &r.provenance;
    let fields = [
        ("Title", r.record.title.clone(), format!("{:?}", p.title), p.title.is_fallback()),
        (
            "Authors",
            authors_line(&r.record),
            format!("{:?}", p.authors),
            p.authors.is_fallback(),
        ),
        ("Axis", r.record.axis.clone(), format!("{:?}", p.axis), p.axis.is_fallback()),
    ];

    if color.enabled() {
        writeln!(w, "{} {}\n", "DRY RUN:".bold().cyan(), r.source.bold())?;
    } else {
        writeln!(w, "DRY RUN: {}\n", r.source)?;
    }

    for (label, value, source, fallback) in &fields {
        let tag = format!("[{source}]");
        if color.enabled() {
            if *fallback {
                writeln!(w, "  {:<8} {} {}", format!("{label}:"), value, tag.yellow())?;
            } else {
                writeln!(w, "  {:<8} {} {}", format!("{label}:"), value, tag.dimmed())?;
            }
        } else {
            writeln!(w, "  {:<8} {} {}", format!("{label}:"), value, tag)?;
        }
    }

    let paragraphs = split_paragraphs(&r.record.body);
    let tag = format!("[{:?}]", p.body);
    if color.enabled() && p.body.is_fallback() {
        writeln!(w, "  Body:    {} paragraphs {}", paragraphs.len(), tag.yellow())?;
    } else {
        writeln!(w, "  Body:    {} paragraphs {}", paragraphs.len(), tag)?;
    }
    for para in &paragraphs {
        let preview: String = para.chars().take(120).collect();
        let ellipsis = if para.chars().count() > 120 { "..." } else { "" };
        if color.enabled() {
            writeln!(w, "    {}", format!("{preview}{ellipsis}").dimmed())?;
        } else {
            writeln!(w, "    {preview}{ellipsis}")?;
        }
    }

    let fallbacks = p.fallback_fields();
    writeln!(w)?;
    if fallbacks.is_empty() {
        writeln!(w, "No fallbacks used.")?;
    } else if color.enabled() {
        writeln!(w, "{} {}", "Fallbacks:".yellow(), fallbacks.join(", "))?;
    } else {
        writeln!(w, "Fallbacks: {}", fallbacks.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caderno_core::{AuthorSource, AxisSource, BodySource, ParsedRecord, Provenance, TitleSource};

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn record() -> SourcedRecord {
        SourcedRecord {
            source: "resumo.pdf".into(),
            record: ParsedRecord {
                title: "Impacto da IA na Educação".into(),
                authors: vec!["Maria Silva".into(), "João Souza".into()],
                axis: "Comunicações".into(),
                body: "Primeiro.\n\nSegundo.".into(),
            },
            provenance: Provenance {
                title: TitleSource::Accumulated,
                authors: AuthorSource::Window,
                axis: AxisSource::Default,
                body: BodySource::Lines,
            },
        }
    }

    #[test]
    fn record_shows_sources_and_fallbacks() {
        let out = render(|w| print_record(w, &record(), ColorMode(false)));
        assert!(out.starts_with("DRY RUN: resumo.pdf\n"));
        assert!(out.contains("Title:   Impacto da IA na Educação [Accumulated]"));
        assert!(out.contains("Authors: Maria Silva, João Souza [Window]"));
        assert!(out.contains("Axis:    Comunicações [Default]"));
        assert!(out.contains("Body:    2 paragraphs [Lines]"));
        assert!(out.trim_end().ends_with("Fallbacks: axis"));
    }

    #[test]
    fn summary_counts_fallbacks() {
        let stats = FallbackStats {
            axis: 2,
            records: 5,
            ..Default::default()
        };
        let out = render(|w| print_summary(w, &stats, 1, ColorMode(false)));
        assert!(out.contains("Classified:          5"));
        assert!(out.contains("Failed:              1"));
        assert!(out.contains("Default axis:        2"));
        assert!(out.contains("Total fallback:      0"));
    }

    #[test]
    fn no_failures_prints_nothing() {
        let out = render(|w| print_failures(w, &[], ColorMode(false)));
        assert!(out.is_empty());
    }
}

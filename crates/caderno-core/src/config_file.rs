use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub parser: Option<ParserConfig>,
    pub event: Option<EventConfig>,
    pub layout: Option<LayoutConfig>,
    pub ingest: Option<IngestConfig>,
}

/// Thresholds, token lists and placeholders for the classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    pub max_title_lines: Option<usize>,
    pub author_line_max_length: Option<usize>,
    pub author_window: Option<usize>,
    pub fallback_author_max_length: Option<usize>,
    pub axis_scan_lines: Option<usize>,
    pub section_header_tokens: Option<TokenList>,
    pub axis_label_tokens: Option<TokenList>,
    pub axis_hint_tokens: Option<TokenList>,
    pub affiliation_marker_tokens: Option<TokenList>,
    pub keyword_marker_tokens: Option<TokenList>,
    pub conjunction_tokens: Option<TokenList>,
    pub untitled_placeholder: Option<String>,
    pub unknown_author_placeholder: Option<String>,
    pub default_axis: Option<String>,
}

/// A token list that either replaces or extends the built-in defaults.
///
/// ```toml
/// [parser.section_header_tokens]
/// extend = ["Sumário"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenList {
    pub replace: Option<Vec<String>>,
    pub extend: Option<Vec<String>>,
}

/// Cover-page data for the compiled volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: Option<String>,
    pub institution: Option<String>,
    pub organizers: Option<String>,
    pub place: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub volume_title: Option<String>,
    pub toc_heading: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    pub input_dir: Option<String>,
    pub output_path: Option<String>,
    pub format: Option<String>,
    pub workers: Option<usize>,
}

#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Platform config directory path: `<config_dir>/caderno/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("caderno").join("config.toml"))
}

/// Load config by cascading CWD `.caderno.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".caderno.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    read_from_path(path).ok()
}

/// Read and parse a config file, reporting why it could not be used.
pub fn read_from_path(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn pick<T: Clone>(overlay: Option<&T>, base: Option<&T>) -> Option<T> {
    overlay.or(base).cloned()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bp, op) = (base.parser.as_ref(), overlay.parser.as_ref());
    let (be, oe) = (base.event.as_ref(), overlay.event.as_ref());
    let (bl, ol) = (base.layout.as_ref(), overlay.layout.as_ref());
    let (bi, oi) = (base.ingest.as_ref(), overlay.ingest.as_ref());

    ConfigFile {
        parser: Some(ParserConfig {
            max_title_lines: pick(
                op.and_then(|p| p.max_title_lines.as_ref()),
                bp.and_then(|p| p.max_title_lines.as_ref()),
            ),
            author_line_max_length: pick(
                op.and_then(|p| p.author_line_max_length.as_ref()),
                bp.and_then(|p| p.author_line_max_length.as_ref()),
            ),
            author_window: pick(
                op.and_then(|p| p.author_window.as_ref()),
                bp.and_then(|p| p.author_window.as_ref()),
            ),
            fallback_author_max_length: pick(
                op.and_then(|p| p.fallback_author_max_length.as_ref()),
                bp.and_then(|p| p.fallback_author_max_length.as_ref()),
            ),
            axis_scan_lines: pick(
                op.and_then(|p| p.axis_scan_lines.as_ref()),
                bp.and_then(|p| p.axis_scan_lines.as_ref()),
            ),
            section_header_tokens: pick(
                op.and_then(|p| p.section_header_tokens.as_ref()),
                bp.and_then(|p| p.section_header_tokens.as_ref()),
            ),
            axis_label_tokens: pick(
                op.and_then(|p| p.axis_label_tokens.as_ref()),
                bp.and_then(|p| p.axis_label_tokens.as_ref()),
            ),
            axis_hint_tokens: pick(
                op.and_then(|p| p.axis_hint_tokens.as_ref()),
                bp.and_then(|p| p.axis_hint_tokens.as_ref()),
            ),
            affiliation_marker_tokens: pick(
                op.and_then(|p| p.affiliation_marker_tokens.as_ref()),
                bp.and_then(|p| p.affiliation_marker_tokens.as_ref()),
            ),
            keyword_marker_tokens: pick(
                op.and_then(|p| p.keyword_marker_tokens.as_ref()),
                bp.and_then(|p| p.keyword_marker_tokens.as_ref()),
            ),
            conjunction_tokens: pick(
                op.and_then(|p| p.conjunction_tokens.as_ref()),
                bp.and_then(|p| p.conjunction_tokens.as_ref()),
            ),
            untitled_placeholder: pick(
                op.and_then(|p| p.untitled_placeholder.as_ref()),
                bp.and_then(|p| p.untitled_placeholder.as_ref()),
            ),
            unknown_author_placeholder: pick(
                op.and_then(|p| p.unknown_author_placeholder.as_ref()),
                bp.and_then(|p| p.unknown_author_placeholder.as_ref()),
            ),
            default_axis: pick(
                op.and_then(|p| p.default_axis.as_ref()),
                bp.and_then(|p| p.default_axis.as_ref()),
            ),
        }),
        event: Some(EventConfig {
            name: pick(
                oe.and_then(|e| e.name.as_ref()),
                be.and_then(|e| e.name.as_ref()),
            ),
            institution: pick(
                oe.and_then(|e| e.institution.as_ref()),
                be.and_then(|e| e.institution.as_ref()),
            ),
            organizers: pick(
                oe.and_then(|e| e.organizers.as_ref()),
                be.and_then(|e| e.organizers.as_ref()),
            ),
            place: pick(
                oe.and_then(|e| e.place.as_ref()),
                be.and_then(|e| e.place.as_ref()),
            ),
            date: pick(
                oe.and_then(|e| e.date.as_ref()),
                be.and_then(|e| e.date.as_ref()),
            ),
        }),
        layout: Some(LayoutConfig {
            volume_title: pick(
                ol.and_then(|l| l.volume_title.as_ref()),
                bl.and_then(|l| l.volume_title.as_ref()),
            ),
            toc_heading: pick(
                ol.and_then(|l| l.toc_heading.as_ref()),
                bl.and_then(|l| l.toc_heading.as_ref()),
            ),
        }),
        ingest: Some(IngestConfig {
            input_dir: pick(
                oi.and_then(|i| i.input_dir.as_ref()),
                bi.and_then(|i| i.input_dir.as_ref()),
            ),
            output_path: pick(
                oi.and_then(|i| i.output_path.as_ref()),
                bi.and_then(|i| i.output_path.as_ref()),
            ),
            format: pick(
                oi.and_then(|i| i.format.as_ref()),
                bi.and_then(|i| i.format.as_ref()),
            ),
            workers: pick(
                oi.and_then(|i| i.workers.as_ref()),
                bi.and_then(|i| i.workers.as_ref()),
            ),
        }),
    }
}

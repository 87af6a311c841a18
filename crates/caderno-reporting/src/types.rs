use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use caderno_core::config_file::{EventConfig, LayoutConfig};

pub const DEFAULT_VOLUME_TITLE: &str = "Caderno de Resumos";
pub const DEFAULT_TOC_HEADING: &str = "Sumário";

/// Output format of the compiled volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Text,
    Html,
    Json,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Markdown,
            ExportFormat::Text,
            ExportFormat::Html,
            ExportFormat::Json,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Text => "Plain Text",
            Self::Html => "HTML",
            Self::Json => "JSON",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Text => "txt",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown export format '{0}' (expected md, txt, html or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "txt" | "text" => Ok(Self::Text),
            "html" | "htm" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Cover and layout data for the compiled volume.
///
/// Event fields left unset are omitted from the cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeMeta {
    pub volume_title: String,
    pub toc_heading: String,
    pub event_name: Option<String>,
    pub institution: Option<String>,
    pub organizers: Option<String>,
    pub place: Option<String>,
    pub date: Option<String>,
}

impl Default for VolumeMeta {
    fn default() -> Self {
        Self {
            volume_title: DEFAULT_VOLUME_TITLE.to_string(),
            toc_heading: DEFAULT_TOC_HEADING.to_string(),
            event_name: None,
            institution: None,
            organizers: None,
            place: None,
            date: None,
        }
    }
}

impl VolumeMeta {
    /// Build from the `[event]` and `[layout]` config sections.
    pub fn from_config(event: Option<&EventConfig>, layout: Option<&LayoutConfig>) -> Self {
        let defaults = Self::default();
        let non_blank = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();

        Self {
            volume_title: layout
                .and_then(|l| non_blank(&l.volume_title))
                .unwrap_or(defaults.volume_title),
            toc_heading: layout
                .and_then(|l| non_blank(&l.toc_heading))
                .unwrap_or(defaults.toc_heading),
            event_name: event.and_then(|e| non_blank(&e.name)),
            institution: event.and_then(|e| non_blank(&e.institution)),
            organizers: event.and_then(|e| non_blank(&e.organizers)),
            place: event.and_then(|e| non_blank(&e.place)),
            date: event.and_then(|e| non_blank(&e.date)),
        }
    }

    /// Place and date on one line, whichever are set.
    pub fn place_and_date(&self) -> Option<String> {
        match (&self.place, &self.date) {
            (Some(p), Some(d)) => Some(format!("{p}, {d}")),
            (Some(p), None) => Some(p.clone()),
            (None, Some(d)) => Some(d.clone()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_names_the_input() {
        let err = "docx".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err, UnknownFormat("docx".into()));
        assert_eq!(
            err.to_string(),
            "unknown export format 'docx' (expected md, txt, html or json)"
        );
    }

    #[test]
    fn format_parses_names_and_extensions() {
        for format in ExportFormat::all() {
            assert_eq!(format.extension().parse::<ExportFormat>(), Ok(*format));
        }
        assert_eq!("Markdown".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert_eq!(" HTML ".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn meta_defaults_without_config() {
        let meta = VolumeMeta::from_config(None, None);
        assert_eq!(meta, VolumeMeta::default());
        assert_eq!(meta.volume_title, "Caderno de Resumos");
        assert_eq!(meta.toc_heading, "Sumário");
        assert_eq!(meta.place_and_date(), None);
    }

    #[test]
    fn meta_takes_config_and_ignores_blanks() {
        let event = EventConfig {
            name: Some("II Encontro de Pesquisa".into()),
            institution: Some("  ".into()),
            place: Some("Curitiba".into()),
            date: Some("2025".into()),
            ..Default::default()
        };
        let layout = LayoutConfig {
            volume_title: Some("Anais".into()),
            toc_heading: None,
        };
        let meta = VolumeMeta::from_config(Some(&event), Some(&layout));
        assert_eq!(meta.event_name.as_deref(), Some("II Encontro de Pesquisa"));
        assert_eq!(meta.institution, None);
        assert_eq!(meta.volume_title, "Anais");
        assert_eq!(meta.toc_heading, "Sumário");
        assert_eq!(meta.place_and_date().as_deref(), Some("Curitiba, 2025"));
    }
}

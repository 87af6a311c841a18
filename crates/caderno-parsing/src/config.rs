use caderno_core::config_file::{ParserConfig, TokenList};
use once_cell::sync::Lazy;
use regex::Regex;

/// Marker words that open the narrative part of an abstract.
pub const DEFAULT_SECTION_HEADER_TOKENS: &[&str] = &["Resumo", "Abstract"];

/// Labels of the `Label: value` field carrying the thematic axis.
pub const DEFAULT_AXIS_LABEL_TOKENS: &[&str] = &["Eixo temático", "Eixo", "Área temática", "Área"];

/// Extra keywords that only count in the early-line axis scan.
pub const DEFAULT_AXIS_HINT_TOKENS: &[&str] = &["Tema"];

/// Substrings that mark an institutional affiliation line.
pub const DEFAULT_AFFILIATION_MARKER_TOKENS: &[&str] = &[
    "Universidade",
    "Universidad",
    "University",
    "Institu",
    "Departamento",
    "Department",
    "Centro",
    "Center",
    "Centre",
    "Faculdade",
    "Faculty",
];

/// Markers of the keywords field ("Palavras-chave:", "Keywords:").
pub const DEFAULT_KEYWORD_MARKER_TOKENS: &[&str] = &["Palavras", "Keywords"];

/// Whole-word conjunctions separating author names.
pub const DEFAULT_CONJUNCTION_TOKENS: &[&str] = &["e", "and", "&"];

pub const DEFAULT_UNTITLED_PLACEHOLDER: &str = "Sem título";
pub const DEFAULT_UNKNOWN_AUTHOR_PLACEHOLDER: &str = "Autor desconhecido";
pub const DEFAULT_AXIS: &str = "Comunicações";

/// Controls how a list of tokens is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }

    fn push(&mut self, value: T) {
        match self {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(value),
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
        }
    }
}

impl From<&TokenList> for ListOverride<String> {
    /// `replace` swaps out the defaults; `extend` appends to the resulting list.
    fn from(list: &TokenList) -> Self {
        match (&list.replace, &list.extend) {
            (Some(r), Some(e)) => {
                let mut v = r.clone();
                v.extend(e.iter().cloned());
                ListOverride::Replace(v)
            }
            (Some(r), None) => ListOverride::Replace(r.clone()),
            (None, Some(e)) => ListOverride::Extend(e.clone()),
            (None, None) => ListOverride::Default,
        }
    }
}

/// Regexes compiled from the token lists. `None` means the list was empty
/// and the corresponding predicate never matches.
#[derive(Debug, Clone)]
pub(crate) struct Patterns {
    /// Section header token at line start.
    pub(crate) section_header: Option<Regex>,
    /// `Label: value` anywhere in the text, value in group 1.
    pub(crate) axis_field: Option<Regex>,
    /// Any axis label or hint keyword.
    pub(crate) axis_keyword: Option<Regex>,
    pub(crate) affiliation: Option<Regex>,
    /// Header, axis or keywords marker anywhere in the line.
    pub(crate) header_like: Option<Regex>,
    /// Conjunction standing alone between whitespace.
    pub(crate) conjunction: Option<Regex>,
    /// Delimiters between author names.
    pub(crate) author_split: Regex,
}

/// Configuration for the structural classifier.
///
/// Token lists are compiled into case-insensitive regexes by
/// [`ParsingConfigBuilder::build`]; use the builder to customise them.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── title.rs ──
    /// Maximum number of lines accumulated into the title (default: 3).
    pub(crate) max_title_lines: usize,
    /// Separator-bearing lines shorter than this look like author lines (default: 200).
    pub(crate) author_line_max_length: usize,

    // ── authors.rs ──
    /// Number of lines after the title scanned for an authors line (default: 4).
    pub(crate) author_window: usize,
    /// Maximum length of the single-line author fallback (default: 120).
    pub(crate) fallback_author_max_length: usize,

    // ── axis.rs ──
    /// Number of leading lines scanned for an axis keyword (default: 8).
    pub(crate) axis_scan_lines: usize,

    // ── fallbacks ──
    pub(crate) untitled_placeholder: String,
    pub(crate) unknown_author_placeholder: String,
    pub(crate) default_axis: String,

    pub(crate) patterns: Patterns,
}

static DEFAULT_CONFIG: Lazy<ParsingConfig> =
    Lazy::new(|| ParsingConfigBuilder::new().build().unwrap());

impl Default for ParsingConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl ParsingConfig {
    pub fn max_title_lines(&self) -> usize {
        self.max_title_lines
    }

    pub fn author_line_max_length(&self) -> usize {
        self.author_line_max_length
    }

    pub fn author_window(&self) -> usize {
        self.author_window
    }

    pub fn untitled_placeholder(&self) -> &str {
        &self.untitled_placeholder
    }

    pub fn unknown_author_placeholder(&self) -> &str {
        &self.unknown_author_placeholder
    }

    pub fn default_axis(&self) -> &str {
        &self.default_axis
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts plain token lists that are escaped and compiled to `Regex` in
/// [`build()`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    max_title_lines: Option<usize>,
    author_line_max_length: Option<usize>,
    author_window: Option<usize>,
    fallback_author_max_length: Option<usize>,
    axis_scan_lines: Option<usize>,
    section_header_tokens: ListOverride<String>,
    axis_label_tokens: ListOverride<String>,
    axis_hint_tokens: ListOverride<String>,
    affiliation_marker_tokens: ListOverride<String>,
    keyword_marker_tokens: ListOverride<String>,
    conjunction_tokens: ListOverride<String>,
    untitled_placeholder: Option<String>,
    unknown_author_placeholder: Option<String>,
    default_axis: Option<String>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from the `[parser]` section of a config file.
    pub fn from_file_config(file: &ParserConfig) -> Self {
        let list = |l: &Option<TokenList>| {
            l.as_ref()
                .map(ListOverride::<String>::from)
                .unwrap_or_default()
        };
        Self {
            max_title_lines: file.max_title_lines,
            author_line_max_length: file.author_line_max_length,
            author_window: file.author_window,
            fallback_author_max_length: file.fallback_author_max_length,
            axis_scan_lines: file.axis_scan_lines,
            section_header_tokens: list(&file.section_header_tokens),
            axis_label_tokens: list(&file.axis_label_tokens),
            axis_hint_tokens: list(&file.axis_hint_tokens),
            affiliation_marker_tokens: list(&file.affiliation_marker_tokens),
            keyword_marker_tokens: list(&file.keyword_marker_tokens),
            conjunction_tokens: list(&file.conjunction_tokens),
            untitled_placeholder: file.untitled_placeholder.clone(),
            unknown_author_placeholder: file.unknown_author_placeholder.clone(),
            default_axis: file.default_axis.clone(),
        }
    }

    // ── Scalars ──

    pub fn max_title_lines(mut self, n: usize) -> Self {
        self.max_title_lines = Some(n);
        self
    }

    pub fn author_line_max_length(mut self, n: usize) -> Self {
        self.author_line_max_length = Some(n);
        self
    }

    pub fn author_window(mut self, n: usize) -> Self {
        self.author_window = Some(n);
        self
    }

    pub fn fallback_author_max_length(mut self, n: usize) -> Self {
        self.fallback_author_max_length = Some(n);
        self
    }

    pub fn axis_scan_lines(mut self, n: usize) -> Self {
        self.axis_scan_lines = Some(n);
        self
    }

    // ── Token lists ──

    pub fn set_section_header_tokens(mut self, tokens: Vec<String>) -> Self {
        self.section_header_tokens = ListOverride::Replace(tokens);
        self
    }

    pub fn add_section_header_token(mut self, token: String) -> Self {
        self.section_header_tokens.push(token);
        self
    }

    pub fn set_axis_label_tokens(mut self, tokens: Vec<String>) -> Self {
        self.axis_label_tokens = ListOverride::Replace(tokens);
        self
    }

    pub fn add_axis_label_token(mut self, token: String) -> Self {
        self.axis_label_tokens.push(token);
        self
    }

    pub fn set_axis_hint_tokens(mut self, tokens: Vec<String>) -> Self {
        self.axis_hint_tokens = ListOverride::Replace(tokens);
        self
    }

    pub fn set_affiliation_marker_tokens(mut self, tokens: Vec<String>) -> Self {
        self.affiliation_marker_tokens = ListOverride::Replace(tokens);
        self
    }

    pub fn add_affiliation_marker_token(mut self, token: String) -> Self {
        self.affiliation_marker_tokens.push(token);
        self
    }

    pub fn set_keyword_marker_tokens(mut self, tokens: Vec<String>) -> Self {
        self.keyword_marker_tokens = ListOverride::Replace(tokens);
        self
    }

    pub fn set_conjunction_tokens(mut self, tokens: Vec<String>) -> Self {
        self.conjunction_tokens = ListOverride::Replace(tokens);
        self
    }

    // ── Placeholders ──

    pub fn untitled_placeholder(mut self, value: impl Into<String>) -> Self {
        self.untitled_placeholder = Some(value.into());
        self
    }

    pub fn unknown_author_placeholder(mut self, value: impl Into<String>) -> Self {
        self.unknown_author_placeholder = Some(value.into());
        self
    }

    pub fn default_axis(mut self, value: impl Into<String>) -> Self {
        self.default_axis = Some(value.into());
        self
    }

    /// Compile all token lists into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let resolve = |list: &ListOverride<String>, defaults: &[&str]| -> Vec<String> {
            let defaults: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
            list.resolve(&defaults)
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        };

        let headers = resolve(&self.section_header_tokens, DEFAULT_SECTION_HEADER_TOKENS);
        let labels = resolve(&self.axis_label_tokens, DEFAULT_AXIS_LABEL_TOKENS);
        let hints = resolve(&self.axis_hint_tokens, DEFAULT_AXIS_HINT_TOKENS);
        let affiliations = resolve(
            &self.affiliation_marker_tokens,
            DEFAULT_AFFILIATION_MARKER_TOKENS,
        );
        let keywords = resolve(&self.keyword_marker_tokens, DEFAULT_KEYWORD_MARKER_TOKENS);
        let conjunctions = resolve(&self.conjunction_tokens, DEFAULT_CONJUNCTION_TOKENS);

        let axis_keywords: Vec<String> = labels.iter().chain(hints.iter()).cloned().collect();
        let header_like: Vec<String> = headers
            .iter()
            .chain(labels.iter())
            .chain(keywords.iter())
            .cloned()
            .collect();

        let compile = |template: &str, tokens: &[String]| -> Result<Option<Regex>, regex::Error> {
            alternation(tokens)
                .map(|alt| Regex::new(&template.replace("{}", &alt)))
                .transpose()
        };

        let author_split = match alternation(&conjunctions) {
            Some(alt) => Regex::new(&format!(r"[;,]|(?:^|\s+)(?:{alt})(?:\s+|$)"))?,
            None => Regex::new(r"[;,]")?,
        };

        let patterns = Patterns {
            section_header: compile(r"(?i)^(?:{})(?:\W|$)", &headers)?,
            axis_field: compile(
                r"(?i)\b(?:{})(?:[ \t]+(?:\d+|[IVXLC]+))?[ \t]*:\s*(\S[^\r\n]*)",
                &labels,
            )?,
            axis_keyword: compile(r"(?i)\b(?:{})", &axis_keywords)?,
            affiliation: compile(r"(?i)\b(?:{})", &affiliations)?,
            header_like: compile(r"(?i)\b(?:{})", &header_like)?,
            conjunction: compile(r"(?:^|\s)(?:{})(?:\s|$)", &conjunctions)?,
            author_split,
        };

        let placeholder = |value: Option<String>, default: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(ParsingConfig {
            max_title_lines: self.max_title_lines.unwrap_or(3),
            author_line_max_length: self.author_line_max_length.unwrap_or(200),
            author_window: self.author_window.unwrap_or(4),
            fallback_author_max_length: self.fallback_author_max_length.unwrap_or(120),
            axis_scan_lines: self.axis_scan_lines.unwrap_or(8),
            untitled_placeholder: placeholder(self.untitled_placeholder, DEFAULT_UNTITLED_PLACEHOLDER),
            unknown_author_placeholder: placeholder(
                self.unknown_author_placeholder,
                DEFAULT_UNKNOWN_AUTHOR_PLACEHOLDER,
            ),
            default_axis: placeholder(self.default_axis, DEFAULT_AXIS),
            patterns,
        })
    }
}

/// Build a regex alternation from literal tokens, longest first, with inner
/// spaces matching any run of whitespace. `None` for an empty list.
fn alternation(tokens: &[String]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    let mut sorted: Vec<&String> = tokens.iter().collect();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    let parts: Vec<String> = sorted
        .into_iter()
        .map(|t| {
            t.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();
    Some(parts.join("|"))
}

use caderno_core::AxisSource;

use crate::config::ParsingConfig;
use crate::lines::DocumentLines;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisOutcome {
    pub axis: String,
    pub source: AxisSource,
}

/// Detect the thematic axis of a document.
///
/// Independent of title/author consumption: first a `Label: value` field
/// anywhere in `text`, then the first of the leading lines that merely
/// mentions an axis keyword (taken verbatim), then the default axis.
pub fn extract_axis(text: &str, lines: &DocumentLines) -> AxisOutcome {
    extract_axis_with_config(text, lines, &ParsingConfig::default())
}

/// Config-aware version of [`extract_axis`].
pub(crate) fn extract_axis_with_config(
    text: &str,
    lines: &DocumentLines,
    config: &ParsingConfig,
) -> AxisOutcome {
    if let Some(axis) = labeled_axis(text, config) {
        return AxisOutcome {
            axis,
            source: AxisSource::Labeled,
        };
    }

    if let Some(re) = config.patterns.axis_keyword.as_ref()
        && let Some(line) = lines
            .iter()
            .take(config.axis_scan_lines)
            .find(|l| re.is_match(l))
    {
        return AxisOutcome {
            axis: line.to_string(),
            source: AxisSource::KeywordLine,
        };
    }

    AxisOutcome {
        axis: config.default_axis.clone(),
        source: AxisSource::Default,
    }
}

/// Value of the first labelled axis field, trailing punctuation removed.
fn labeled_axis(text: &str, config: &ParsingConfig) -> Option<String> {
    let re = config.patterns.axis_field.as_ref()?;
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .trim()
                .trim_end_matches(['.', ';', ','])
                .trim()
                .to_string()
        })
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_of(text: &str) -> AxisOutcome {
        extract_axis(text, &DocumentLines::from_text(text))
    }

    #[test]
    fn labeled_field_anywhere() {
        let a = axis_of("Título\nAutor\nResumo\ntexto\nEixo: Tecnologia\nfim");
        assert_eq!(a.axis, "Tecnologia");
        assert_eq!(a.source, AxisSource::Labeled);
    }

    #[test]
    fn labeled_field_beats_earlier_keyword_line() {
        let a = axis_of("Eixo temático do congresso\nAutor\nEixo: Educação");
        assert_eq!(a.axis, "Educação");
        assert_eq!(a.source, AxisSource::Labeled);
    }

    #[test]
    fn longer_label_and_case_insensitive() {
        let a = axis_of("EIXO TEMÁTICO: Linguagens e Códigos");
        assert_eq!(a.axis, "Linguagens e Códigos");
        let a = axis_of("Área temática: Saúde.");
        assert_eq!(a.axis, "Saúde");
    }

    #[test]
    fn numbered_axis_label() {
        let a = axis_of("Título\nEixo 3: Formação de professores");
        assert_eq!(a.axis, "Formação de professores");
    }

    #[test]
    fn value_on_following_line() {
        let a = axis_of("Título\nEixo:\nEnsino de Ciências\nResumo");
        assert_eq!(a.axis, "Ensino de Ciências");
    }

    #[test]
    fn keyword_line_taken_verbatim() {
        let a = axis_of("Título\nAutor\nTema - Meio ambiente\nResumo");
        assert_eq!(a.axis, "Tema - Meio ambiente");
        assert_eq!(a.source, AxisSource::KeywordLine);
    }

    #[test]
    fn keyword_scan_limited_to_first_lines() {
        let mut text = String::new();
        for i in 0..8 {
            text.push_str(&format!("linha {i}\n"));
        }
        text.push_str("Tema livre\n");
        let a = axis_of(&text);
        assert_eq!(a.source, AxisSource::Default);
        assert_eq!(a.axis, "Comunicações");
    }

    #[test]
    fn keyword_inside_word_is_ignored() {
        let a = axis_of("Sistema de ensino\nAutor");
        assert_eq!(a.source, AxisSource::Default);
    }
}

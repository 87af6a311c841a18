//! End-to-end behaviour of the abstract classifier on realistic inputs.

use std::sync::Arc;

use caderno_parsing::{
    AbstractClassifier, AuthorSource, AxisSource, BodySource, ParsingConfigBuilder, TitleSource,
    classify,
};

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn well_formed_abstract() {
    let text = "Impacto da IA na Educação\nMaria Silva; João Souza\nEixo: Tecnologia\nResumo:\nO presente trabalho...";
    let result = classify(text);
    let r = &result.record;
    assert_eq!(r.title, "Impacto da IA na Educação");
    assert_eq!(r.authors, vec!["Maria Silva", "João Souza"]);
    assert_eq!(r.axis, "Tecnologia");
    assert_eq!(r.body, "O presente trabalho...");
    assert!(!result.provenance.used_fallback());
}

#[test]
fn lone_title_falls_back_everywhere_else() {
    let text = "Apenas um título solitário";
    let result = classify(text);
    let r = &result.record;
    assert_eq!(r.title, text);
    assert_eq!(r.authors, vec!["Autor desconhecido"]);
    assert_eq!(r.axis, "Comunicações");
    assert_eq!(r.body, text);
    assert_eq!(result.provenance.title, TitleSource::Accumulated);
    assert!(result.provenance.is_total_fallback());
}

#[test]
fn affiliation_line_is_not_taken_as_authors() {
    let text = "Ensino de Física\nUniversidade Federal de Minas Gerais\nAna Costa\nResumo:\nEste estudo analisa práticas docentes.";
    let result = classify(text);
    let r = &result.record;
    assert_eq!(r.title, "Ensino de Física");
    assert_eq!(r.authors, vec!["Ana Costa"]);
    assert_eq!(result.provenance.authors, AuthorSource::ShortLine);
    assert_eq!(r.body, "Este estudo analisa práticas docentes.");
}

#[test]
fn body_sentence_after_header_is_not_taken_as_authors() {
    let text = "Ensino de ciências na escola pública\nResumo\nO estudo discute currículo e avaliação.\nPalavras-chave: ensino, escola";
    let result = classify(text);
    let r = &result.record;
    assert_eq!(r.title, "Ensino de ciências na escola pública");
    assert_eq!(r.authors, vec!["Autor desconhecido"]);
    assert_eq!(result.provenance.authors, AuthorSource::Placeholder);
    assert!(r.body.starts_with("O estudo discute currículo e avaliação."));
}

#[test]
fn authors_on_first_line_are_not_lost() {
    let text = "Maria Silva; João Souza\nResumo\nTexto do trabalho.";
    let result = classify(text);
    let r = &result.record;
    assert_eq!(r.title, "Maria Silva; João Souza");
    assert_eq!(result.provenance.title, TitleSource::FirstLine);
    assert_eq!(r.authors, vec!["Maria Silva", "João Souza"]);
    assert_eq!(result.provenance.authors, AuthorSource::Window);
    assert_eq!(r.body, "Texto do trabalho.");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

const ODD_INPUTS: &[&str] = &[
    "x",
    ";;;",
    "Resumo",
    "Eixo:",
    "\n\n   a   \n\n",
    "Maria Silva",
    "Universidade Federal do Paraná",
    "Resumo: apenas corpo, sem mais nada",
    "Título\nAna Lima; Rui Dias",
    "Título\nAna Lima; Rui Dias\nResumo",
    "a, b, c, d, e, f",
    "\r\nTítulo com CRLF\r\nAutor Único\r\n\r\nTexto final.\r\n",
];

#[test]
fn every_field_populated_for_non_empty_input() {
    for text in ODD_INPUTS {
        let r = classify(text).record;
        assert!(!r.title.is_empty(), "empty title for {text:?}");
        assert!(!r.authors.is_empty(), "no authors for {text:?}");
        assert!(
            r.authors.iter().all(|a| !a.is_empty()),
            "empty author for {text:?}"
        );
        assert!(!r.axis.is_empty(), "empty axis for {text:?}");
        assert!(!r.body.is_empty(), "empty body for {text:?}");
    }
}

#[test]
fn title_bounded_and_stops_before_author_or_header_line() {
    let cases = [
        ("um\ndois\ntrês\nquatro", 3, "um dois três"),
        ("um\ndois\nAna Lima; Rui Dias\ntrês", 3, "um dois"),
        ("um\nResumo\ndois", 3, "um"),
        ("um\ndois\ntrês", 2, "um dois"),
        ("título\npor Maria Silva\ncorpo", 3, "título"),
    ];
    for (text, max, expected) in cases {
        let config = ParsingConfigBuilder::new()
            .max_title_lines(max)
            .build()
            .unwrap();
        let c = AbstractClassifier::with_config(config);
        let t = c.extract_title(&c.split_lines(text));
        assert_eq!(t.title, expected, "input {text:?}");
        assert!(t.next <= max);
    }
}

#[test]
fn semicolon_line_wins_over_later_comma_line() {
    let text = "Título do trabalho\nAna Lima; Rui Dias\nEva Reis, Ivo Sá\nCorpo.";
    let r = classify(text).record;
    assert_eq!(r.authors, vec!["Ana Lima", "Rui Dias"]);
    assert_eq!(r.body, "Eva Reis, Ivo Sá\n\nCorpo.");
}

#[test]
fn labeled_axis_beats_early_keyword_line() {
    let text = "Eixo temático do encontro\nTítulo\nAna Lima; Rui Dias\nEixo: Educação\nResumo\nCorpo.";
    let result = classify(text);
    assert_eq!(result.record.axis, "Educação");
    assert_eq!(result.provenance.axis, AxisSource::Labeled);
}

#[test]
fn keyword_line_used_when_no_label() {
    let text = "Título\nAna Lima; Rui Dias\nEIXO 4 - EDUCAÇÃO AMBIENTAL\nCorpo.";
    let result = classify(text);
    assert_eq!(result.record.axis, "EIXO 4 - EDUCAÇÃO AMBIENTAL");
    assert_eq!(result.provenance.axis, AxisSource::KeywordLine);
}

#[test]
fn consumed_lines_never_reach_the_body() {
    let text = "Título\nAna Lima; Rui Dias\nCorpo um.\nCorpo dois.";
    let r = classify(text).record;
    assert!(!r.body.contains("Título"));
    assert!(!r.body.contains("Ana Lima"));
    assert_eq!(r.body, "Corpo um.\n\nCorpo dois.");
}

#[test]
fn body_falls_back_to_full_text_when_everything_consumed() {
    let text = "Título\nAna Lima; Rui Dias";
    let result = classify(text);
    assert_eq!(result.record.body, text);
    assert_eq!(result.provenance.body, BodySource::FullText);
}

#[test]
fn conjunction_does_not_split_inside_names() {
    let text = "Título\nHelena Andrade e Teresa Meireles\nCorpo.";
    let r = classify(text).record;
    assert_eq!(r.authors, vec!["Helena Andrade", "Teresa Meireles"]);
}

#[test]
fn classification_is_idempotent() {
    let c = AbstractClassifier::new();
    for text in ODD_INPUTS {
        assert_eq!(c.classify(text), c.classify(text));
    }
}

#[test]
fn concurrent_classification_matches_sequential() {
    let c = Arc::new(AbstractClassifier::new());
    let expected: Vec<_> = ODD_INPUTS.iter().map(|t| c.classify(t)).collect();

    let handles: Vec<_> = ODD_INPUTS
        .iter()
        .map(|t| {
            let c = Arc::clone(&c);
            let text = t.to_string();
            std::thread::spawn(move || c.classify(&text))
        })
        .collect();

    let actual: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn custom_tokens_change_behaviour() {
    let config = ParsingConfigBuilder::new()
        .add_section_header_token("Sumário".to_string())
        .add_axis_label_token("Linha".to_string())
        .build()
        .unwrap();
    let c = AbstractClassifier::with_config(config);
    let text = "Título\nAna Lima; Rui Dias\nLinha: História\nSumário\nCorpo.";
    let r = c.classify(text).record;
    assert_eq!(r.axis, "História");
    assert_eq!(r.body, "Corpo.");
}

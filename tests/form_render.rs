use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use pdf_formflow::config::RadioGrouping;
use pdf_formflow::{Error, FormTemplate, LayoutConfig, build_form};

const TEMPLATE: &str = r#"{
    "title": ["RELATÓRIO MENSAL", "Programa de Bolsas"],
    "intro": ["Preencha todos os campos obrigatórios."],
    "logos": ["logo.png", "missing.png"],
    "sections": [
        {
            "title": "1. Identificação",
            "items": [
                {"type": "text", "name": "nome", "label": "Nome completo", "required": true},
                {"type": "date", "name": "inicio", "label": "Data de início"},
                {"type": "dropdown", "name": "referencia", "label": "Mês de referência",
                 "options": {"month_year": {"count": 6}}, "width": 200},
                {"type": "radio", "name": "modalidade", "label": "Modalidade",
                 "options": ["Presencial", "Remoto", "Híbrido"]}
            ]
        },
        {
            "title": "2. Atividades",
            "items": [
                {"type": "paragraph", "name": "atividades", "label": "Descreva as atividades",
                 "help": "Até 500 palavras"},
                {"type": "text_with_dropdown", "name_text": "horas", "name_dropdown": "horas_unidade",
                 "label": "Carga horária", "options": ["horas", "dias"]}
            ]
        }
    ]
}"#;

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

fn write_logo(dir: &Path) {
    let img = image::RgbaImage::from_pixel(8, 4, image::Rgba([200, 30, 30, 128]));
    img.save(dir.join("logo.png")).unwrap();
}

fn write_template(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("form.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn renders_one_widget_per_field() {
    let dir = tempfile::tempdir().unwrap();
    write_logo(dir.path());
    let template = write_template(dir.path(), TEMPLATE);
    let output = dir.path().join("out.pdf");

    let form = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap();
    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(bytes, form.bytes);

    // text + 3 date parts + dropdown + 3 radios + paragraph + text + dropdown
    assert_eq!(form.widget_count, 11);
    assert_eq!(count(&bytes, b"/Subtype /Widget"), 11);
    assert_eq!(count(&bytes, b"/FT /Tx"), 3);
    assert_eq!(count(&bytes, b"/FT /Ch"), 5);
    assert_eq!(count(&bytes, b"/FT /Btn"), 3);
    assert_eq!(count(&bytes, b"/Ff 131072"), 5);
    assert_eq!(count(&bytes, b"/Ff 49152"), 3);
    assert_eq!(count(&bytes, b"/Ff 4096"), 1);
    assert_eq!(count(&bytes, b"/AS /Off"), 3);
}

#[test]
fn second_section_starts_a_new_page() {
    let dir = tempfile::tempdir().unwrap();
    write_logo(dir.path());
    let template = write_template(dir.path(), TEMPLATE);
    let output = dir.path().join("out.pdf");

    let form = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap();
    assert_eq!(form.page_count, 2);
    assert_eq!(count(&form.bytes, b"/Count 2"), 1);
    assert_eq!(count(&form.bytes, b"/Annots"), 2);
}

#[test]
fn catalog_carries_acroform() {
    let dir = tempfile::tempdir().unwrap();
    write_logo(dir.path());
    let template = write_template(dir.path(), TEMPLATE);
    let output = dir.path().join("out.pdf");

    let form = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap();
    assert_eq!(count(&form.bytes, b"/AcroForm"), 1);
    assert_eq!(count(&form.bytes, b"/NeedAppearances true"), 1);
    assert!(count(&form.bytes, b"/Helv") > 0);
}

#[test]
fn logo_is_embedded_and_missing_logo_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_logo(dir.path());
    let template = write_template(dir.path(), TEMPLATE);
    let output = dir.path().join("out.pdf");

    let form = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap();
    assert_eq!(count(&form.bytes, b"/Subtype /Image"), 2, "RGB image plus its soft mask");
    assert_eq!(count(&form.bytes, b"/SMask"), 1);
}

#[test]
fn form_without_fields_has_no_acroform() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(
        dir.path(),
        r#"{"title": ["Aviso"], "intro": ["Sem campos."]}"#,
    );
    let output = dir.path().join("out.pdf");

    let form = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap();
    assert_eq!(form.page_count, 1);
    assert_eq!(form.widget_count, 0);
    assert_eq!(count(&form.bytes, b"/AcroForm"), 0);
    assert_eq!(count(&form.bytes, b"/Annots"), 0);
}

#[test]
fn grouped_radios_share_a_parent() {
    let dir = tempfile::tempdir().unwrap();
    write_logo(dir.path());
    let template = write_template(dir.path(), TEMPLATE);
    let output = dir.path().join("out.pdf");
    let config = LayoutConfig {
        radio_grouping: RadioGrouping::Grouped,
        ..LayoutConfig::default()
    };

    let form = build_form(&template, config, reference(), &output).unwrap();
    assert_eq!(form.widget_count, 11);
    assert_eq!(count(&form.bytes, b"/Kids"), 2, "page tree plus the radio group");
    assert_eq!(count(&form.bytes, b"/Parent"), 3 + 2, "radio kids plus the two pages");
    assert_eq!(count(&form.bytes, b"/Presencial"), 1);
}

#[test]
fn repeated_section_numbers_its_fields() {
    let json = r#"{
        "sections": [{
            "title": "Mês {i}",
            "repeat": 3,
            "items": [
                {"type": "text", "name": "atividade_{i}", "label": "Atividade {i}"}
            ]
        }]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), json);
    let output = dir.path().join("out.pdf");

    let form = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap();
    assert_eq!(form.page_count, 3);
    assert_eq!(form.widget_count, 3);
    for i in 1..=3 {
        assert_eq!(count(&form.bytes, format!("(atividade_{i})").as_bytes()), 1);
    }
}

#[test]
fn unwritable_output_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), r#"{"title": ["x"]}"#);
    let output = dir.path().join("no-such-dir").join("out.pdf");

    let err = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got {err}");
}

#[test]
fn malformed_template_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), r#"{"sections": [{"items": [{"type": "slider"}]}]}"#);
    let output = dir.path().join("out.pdf");

    let err = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap_err();
    assert!(matches!(err, Error::Template(_)), "got {err}");
    assert!(!output.exists());
}

#[test]
fn oversized_padding_aborts_without_output() {
    let json = r#"{
        "sections": [{
            "items": [
                {"type": "text", "name": "a", "label": "A", "padding": {"x": 6, "y": 10}}
            ]
        }]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), json);
    let output = dir.path().join("out.pdf");

    let err = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap_err();
    assert!(matches!(err, Error::InvalidGeometry { .. }), "got {err}");
    assert!(!output.exists());
}

#[test]
fn parsed_template_renders_in_memory() {
    let template = FormTemplate::from_json(TEMPLATE).unwrap();
    let form = pdf_formflow::pdf::render(&template, LayoutConfig::default(), reference(), None).unwrap();
    // relative logos resolve against the working directory and are skipped
    assert_eq!(count(&form.bytes, b"/Subtype /Image"), 0);
    assert_eq!(form.widget_count, 11);
}

#[test]
fn demo_template_renders() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/monthly_report.json");
    let template = FormTemplate::load(&path).unwrap();
    let form = pdf_formflow::pdf::render(&template, LayoutConfig::default(), reference(), path.parent()).unwrap();
    // two fixed sections, three repetitions, closing section
    assert_eq!(form.widget_count, 9 + 3 + 3 * 8 + 4);
    assert_eq!(count(&form.bytes, b"/Subtype /Widget"), form.widget_count);
    assert!(form.page_count >= 7, "got {} pages", form.page_count);
    assert_eq!(count(&form.bytes, b"(Outubro/2026)"), 2);
}

/// `(object id, object text)` for every indirect object. Stream bodies come out garbled
/// but dictionaries are plain ASCII.
fn objects(bytes: &[u8]) -> Vec<(i32, String)> {
    let text = String::from_utf8_lossy(bytes);
    text.split("endobj")
        .filter_map(|chunk| {
            let at = chunk.find(" 0 obj")?;
            let id = chunk[..at].split_whitespace().last()?.parse().ok()?;
            Some((id, chunk[at..].to_string()))
        })
        .collect()
}

fn ref_array(dict: &str, key: &str) -> Vec<i32> {
    let Some(start) = dict.find(&format!("{key} [")) else {
        return Vec::new();
    };
    let rest = &dict[start + key.len() + 2..];
    let body = &rest[..rest.find(']').unwrap()];
    body.split(" R")
        .filter_map(|r| r.split_whitespace().next()?.parse().ok())
        .collect()
}

fn page_ref(dict: &str) -> Option<i32> {
    let at = dict.find("/P ")?;
    dict[at + 3..].split_whitespace().next()?.parse().ok()
}

fn field_name(dict: &str) -> Option<&str> {
    let at = dict.find("/T (")?;
    let rest = &dict[at + 4..];
    Some(&rest[..rest.find(')')?])
}

#[test]
fn widgets_sit_on_the_page_they_were_drawn_on() {
    let json = r#"{
        "sections": [
            {"items": [{"type": "text", "name": "p0a", "label": "A"}]},
            {"items": [
                {"type": "text", "name": "p1a", "label": "B"},
                {"type": "text", "name": "p1b", "label": "C"}
            ]}
        ]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), json);
    let output = dir.path().join("out.pdf");
    let form = build_form(&template, LayoutConfig::default(), reference(), &output).unwrap();
    assert_eq!(form.page_count, 2);

    let objs = objects(&form.bytes);
    let dict = |id: i32| objs.iter().find(|(i, _)| *i == id).map(|(_, d)| d.as_str()).unwrap();
    let (_, pages) = objs
        .iter()
        .find(|(_, d)| d.contains("/Type /Pages"))
        .unwrap();
    let page_ids = ref_array(pages, "/Kids");
    assert_eq!(page_ids.len(), 2);

    let mut names_per_page = Vec::new();
    for &page in &page_ids {
        let mut names = Vec::new();
        for annot in ref_array(dict(page), "/Annots") {
            let widget = dict(annot);
            assert_eq!(page_ref(widget), Some(page), "/P of {widget}");
            names.push(field_name(widget).unwrap().to_string());
        }
        names_per_page.push(names);
    }
    assert_eq!(names_per_page, [vec!["p0a"], vec!["p1a", "p1b"]]);
}

use super::*;

fn html(raw: &str) -> EcoString {
    init_test_logging();
    Boxlite::new(raw).with_format(Format::Html).convert().unwrap()
}

fn text(raw: &str) -> EcoString {
    init_test_logging();
    Boxlite::new(raw).with_format(Format::Text).convert().unwrap()
}

#[test]
fn html_heading_scenario() {
    assert_eq!(html(HEADING_DOC), "<h1>Title</h1>\n");
}

#[test]
fn text_heading_scenario() {
    assert_eq!(text(HEADING_DOC), "Title");
}

#[test]
fn html_rendering_is_idempotent() {
    let raw = r#"{"doc":{"content":[
        {"type":"heading","attrs":{"level":2},"content":[{"type":"text","text":"Notes"}]},
        {"type":"bullet_list","content":[
            {"type":"list_item","content":[{"type":"paragraph","content":[{"type":"text","text":"one"}]}]},
            {"type":"list_item","content":[{"type":"paragraph","content":[{"type":"text","text":"two"}]}]}
        ]}
    ]}}"#;
    assert_eq!(html(raw), html(raw));
    assert_eq!(text(raw), text(raw));
}

#[test]
fn mark_nesting_order_is_fixed() {
    let raw = r#"{"doc":{"content":[{"type":"paragraph","content":[
        {"type":"text","text":"docs","marks":[
            {"type":"link","attrs":{"href":"https://example.com"}},
            {"type":"strong"}
        ]}
    ]}]}}"#;
    assert_eq!(
        html(raw),
        "<p><a href=\"https://example.com\"><strong>docs</strong></a></p>\n"
    );

    // Mark order in the source must not affect nesting.
    let reversed = r#"{"doc":{"content":[{"type":"paragraph","content":[
        {"type":"text","text":"docs","marks":[
            {"type":"strong"},
            {"type":"link","attrs":{"href":"https://example.com"}}
        ]}
    ]}]}}"#;
    assert_eq!(html(raw), html(reversed));
}

#[test]
fn checklist_html_marks_exactly_one_item_checked() {
    let raw = r#"{"doc":{"content":[{"type":"check_list","content":[
        {"type":"check_list_item","attrs":{"checked":true},"content":[
            {"type":"paragraph","content":[{"type":"text","text":"done"}]}
        ]},
        {"type":"check_list_item","attrs":{"checked":false},"content":[
            {"type":"paragraph","content":[{"type":"text","text":"todo"}]}
        ]}
    ]}]}}"#;

    let out = html(raw);
    assert_eq!(out.matches("class=\"checked\"").count(), 1);
    assert_eq!(out.matches("class=\"unchecked\"").count(), 1);
    assert_eq!(out.matches("checked=\"checked\"").count(), 1);
    assert!(out.starts_with("<ul class=\"checklist\">"));
}

#[test]
fn table_html_carries_spans() {
    let raw = r#"{"doc":{"content":[{"type":"table","content":[
        {"type":"table_row","content":[
            {"type":"table_cell","attrs":{"colspan":2},"content":[
                {"type":"paragraph","content":[{"type":"text","text":"wide"}]}
            ]},
            {"type":"table_cell","attrs":{"rowspan":2},"content":[
                {"type":"paragraph","content":[{"type":"text","text":"tall"}]}
            ]}
        ]}
    ]}]}}"#;

    let out = html(raw);
    assert!(out.contains("<td colspan=\"2\">"));
    assert!(out.contains("<td rowspan=\"2\">"));
}

#[test]
fn code_block_html_gets_language_class() {
    let raw = r#"{"doc":{"content":[{"type":"code_block","attrs":{"language":"rust"},"content":[
        {"type":"text","text":"fn main() {}"}
    ]}]}}"#;
    assert_eq!(
        html(raw),
        "<pre><code class=\"language-rust\">fn main() {}</code></pre>\n"
    );
}

#[test]
fn html_text_is_escaped() {
    let raw = r#"{"doc":{"content":[{"type":"paragraph","content":[
        {"type":"text","text":"<b> & friends"}
    ]}]}}"#;
    let out = html(raw);
    assert!(out.contains("&lt;b&gt;"));
    assert!(!out.contains("<b>"));
}

#[test]
fn mention_html() {
    let raw = r#"{"doc":{"content":[{"type":"paragraph","content":[
        {"type":"mention","attrs":{"id":"u-42","label":"@Ada"}}
    ]}]}}"#;
    assert_eq!(
        html(raw),
        "<p><span class=\"mention\" data-user-id=\"u-42\">@Ada</span></p>\n"
    );
}

#[test]
fn text_inserts_block_separators_only() {
    let raw = r#"{"doc":{"content":[
        {"type":"heading","attrs":{"level":1},"content":[{"type":"text","text":"Title"}]},
        {"type":"paragraph","content":[
            {"type":"text","text":"Hello "},
            {"type":"text","text":"world","marks":[{"type":"strong"}]}
        ]},
        {"type":"check_list","content":[
            {"type":"check_list_item","attrs":{"checked":true},"content":[
                {"type":"paragraph","content":[{"type":"text","text":"done"}]}
            ]}
        ]}
    ]}}"#;
    assert_eq!(text(raw), "Title\nHello world\n[x] done");
}

#[test]
fn unknown_block_html_degrades_to_text() {
    let raw = r#"{"doc":{"content":[
        {"type":"call_out","content":[
            {"type":"paragraph","content":[{"type":"text","text":"careful"}]}
        ]},
        {"type":"paragraph","content":[{"type":"text","text":"next"}]}
    ]}}"#;
    assert_eq!(html(raw), "<p>careful</p>\n<p>next</p>\n");
}

#[test]
fn docx_output_is_a_zip_package() {
    let bytes = Boxlite::new(HEADING_DOC)
        .with_format(Format::Docx)
        .to_docx()
        .unwrap();
    assert!(bytes.starts_with(b"PK\x03\x04"));
}

#[test]
fn docx_checklist_states_differ() {
    let raw = r#"{"doc":{"content":[{"type":"check_list","content":[
        {"type":"check_list_item","attrs":{"checked":true},"content":[
            {"type":"paragraph","content":[{"type":"text","text":"done"}]}
        ]},
        {"type":"check_list_item","attrs":{"checked":false},"content":[
            {"type":"paragraph","content":[{"type":"text","text":"todo"}]}
        ]}
    ]}]}}"#;
    let bytes = Boxlite::new(raw)
        .with_format(Format::Docx)
        .to_docx()
        .unwrap();
    assert!(bytes.starts_with(b"PK\x03\x04"));
    assert!(!bytes.is_empty());
}

#[test]
fn docx_rejects_string_output() {
    let err = Boxlite::new(HEADING_DOC)
        .with_format(Format::Docx)
        .convert()
        .unwrap_err();
    assert!(matches!(err, Error::Task(_)));
}

#[test]
fn docx_survives_missing_asset() {
    let mut ctx = ctx_with_fetcher(StaticFetcher::new());
    let bytes = Boxlite::new(image_doc("gone"))
        .with_format(Format::Docx)
        .to_docx_with(&mut ctx)
        .unwrap();
    assert!(bytes.starts_with(b"PK\x03\x04"));
    assert_eq!(ctx.warnings().snapshot().len(), 1);
}

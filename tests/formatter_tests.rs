use std::io::Write;

use faultpage::diagnostics::{Collection, RequestContext};
use faultpage::format::html::HIDDEN_PAGE;
use faultpage::format::{DisplayPolicy, Formatter};
use faultpage::{FaultRecord, HtmlFormatter, HttpException, JsonFormatter, Level, TextFormatter};

fn source_fixture(lines: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for n in 1..=lines {
        writeln!(file, "let line_{n} = {n};").unwrap();
    }
    file
}

fn html() -> HtmlFormatter {
    HtmlFormatter::new().with_context(RequestContext::new())
}

fn leak_cases() -> Vec<FaultRecord> {
    vec![
        FaultRecord::new(Level::WARNING, "secret-message", "/srv/secret-file.rs", 3),
        FaultRecord::new(Level::ERROR, "secret-message", "/srv/secret-file.rs", 3),
        FaultRecord::new(Level::from_bits(1 << 22), "secret-message", "/srv/secret-file.rs", 3),
        FaultRecord::exception(
            HttpException::forbidden("secret-message"),
            "/srv/secret-file.rs",
            3,
        ),
    ]
}

#[test]
fn hidden_output_never_leaks_message_or_file() {
    let formatters: Vec<Box<dyn Formatter>> = vec![
        Box::new(html()),
        Box::new(html().with_policy(DisplayPolicy::Either).with_reporting(Level::NONE)),
        Box::new(TextFormatter::new()),
    ];
    for formatter in &formatters {
        for fault in leak_cases() {
            let body = formatter.render(&fault, false).body;
            assert!(
                !body.contains("secret-message") && !body.contains("secret-file"),
                "{} leaked detail:\n{}",
                formatter.name(),
                body
            );
        }
    }
}

#[test]
fn level_outside_mask_is_hidden_under_default_policy() {
    let formatter = html().with_reporting(Level::ALL & Level::from_bits(!Level::NOTICE.bits()));
    let fault = FaultRecord::new(Level::NOTICE, "quiet", "a.rs", 1);
    let rendered = formatter.render(&fault, true);
    assert_eq!(rendered.body, HIDDEN_PAGE);
    assert_eq!(rendered.status.code, 500);
}

#[test]
fn either_policy_shows_reported_level_without_display() {
    let formatter = html()
        .with_policy(DisplayPolicy::Either)
        .with_reporting(Level::NOTICE);
    let fault = FaultRecord::new(Level::NOTICE, "loud", "a.rs", 1);
    let body = formatter.render(&fault, false).body;
    assert!(body.contains("<title>Error | Notice</title>"));
    assert!(body.contains("<h2>loud</h2>"));
}

#[test]
fn exceptions_ignore_reporting_mask() {
    let formatter = html().with_reporting(Level::NONE);
    let fault = FaultRecord::exception(HttpException::new("visible"), "a.rs", 1);
    let body = formatter.render(&fault, true).body;
    assert!(body.contains("<title>Error | HttpException</title>"));
    assert!(body.contains("error-header--exception"));
}

#[test]
fn warning_page_shows_window_and_trace() {
    let file = source_fixture(20);
    let path = file.path().display().to_string();
    let fault = FaultRecord::new(Level::WARNING, "disk <almost> full", path.clone(), 12);

    let rendered = html().render(&fault, true);
    let body = rendered.body;

    assert_eq!(rendered.content_type, Some("text/html; charset=utf-8"));
    assert!(body.contains("<title>Error | Warning</title>"));
    assert!(body.contains("error-header error-header--warning"));
    assert!(body.contains("error-title error-title--warning"));
    assert!(body.contains("<h2>disk &lt;almost&gt; full</h2>"));
    assert!(body.contains("<section class=\"code-part code-part--active code-part-0\">"));
    assert!(body.contains("<li value=\"4\">let line_4 = 4;</li>"));
    assert!(body.contains("<mark class=\"highlight\">let line_12 = 12;</mark>"));
    assert!(body.contains("<li>let line_13 = 13;</li>"));
    assert!(!body.contains("let line_3 = 3;"));
    assert!(!body.contains("let line_14 = 14;"));
    assert!(body.contains("<div class=\"trace\" data-trace=\"0\">"));
    assert!(body.contains(" on line 12</p>"));
}

#[test]
fn missing_source_is_marked() {
    let fault = FaultRecord::new(Level::WARNING, "w", "/no/such/source.rs", 4);
    let body = html().render(&fault, true).body;
    assert!(body.contains("<p class=\"no-source\">no source available</p>"));
}

#[test]
fn variables_panel_lists_every_collection() {
    let context = RequestContext::new()
        .with_entries(Collection::Query, [("page", "2")])
        .with_entries(Collection::Cookie, [("theme", "<dark>")]);
    let formatter = HtmlFormatter::new().with_context(context);
    let fault = FaultRecord::new(Level::NOTICE, "n", "a.rs", 1);
    let body = formatter.render(&fault, true).body;

    assert!(body.contains("<li>page =&gt; 2</li>"));
    assert!(body.contains("<li>theme =&gt; &lt;dark&gt;</li>"));
    for label in ["server", "env", "session", "form", "files"] {
        assert!(
            body.contains(&format!(
                "{label} <small class=\"variable-empty\">empty</small></h2>"
            )),
            "missing empty marker for {label}"
        );
    }
}

#[test]
fn json_shape_for_level_fault() {
    let fault = FaultRecord::new(Level::USER_WARNING, "quota \"low\"", "src/quota.rs", 77);
    insta::assert_snapshot!(
        JsonFormatter::encode(&fault),
        @r#"{"error":{"type":512,"message":"quota \"low\"","file":"src/quota.rs","line":77}}"#
    );
}

#[test]
fn json_shape_for_exception() {
    let fault = FaultRecord::exception(HttpException::not_found("no route"), "src/router.rs", 9);
    insta::assert_snapshot!(
        JsonFormatter::encode(&fault),
        @r#"{"error":{"type":"HttpException","message":"no route","file":"src/router.rs","line":9}}"#
    );
}

#[test]
fn json_is_deterministic_and_ignores_display() {
    let fault = FaultRecord::new(Level::ERROR, "e", "a.rs", 1);
    let first = JsonFormatter.render(&fault, true);
    let second = JsonFormatter.render(&fault, false);
    assert_eq!(first, second);
    assert_eq!(first.content_type, Some("text/json"));

    let parsed: serde_json::Value = serde_json::from_str(&first.body).unwrap();
    assert_eq!(parsed["error"]["line"], 1);
}

#[test]
fn text_report_for_warning() {
    let file = source_fixture(3);
    let path = file.path().display().to_string();
    let fault = FaultRecord::new(Level::WARNING, "w", path, 2);
    let body = TextFormatter::new().render(&fault, true).body;
    assert!(body.starts_with("Warning: w\n"));
    assert!(body.contains("  1 | let line_1 = 1;\n"));
    assert!(body.contains("> 2 | let line_2 = 2;\n"));
    assert!(body.contains("  3 | let line_3 = 3;\n"));
}

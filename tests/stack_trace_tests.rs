use faultpage::diagnostics::RequestContext;
use faultpage::format::{Formatter, Rendered};
use faultpage::{FaultRecord, HtmlFormatter, Level, TextFormatter};

#[inline(never)]
fn render_html_from_caller(formatter: &HtmlFormatter, fault: &FaultRecord) -> Rendered {
    let rendered = formatter.render(fault, true);
    std::hint::black_box(rendered)
}

#[inline(never)]
fn render_text_from_caller(formatter: &TextFormatter, fault: &FaultRecord) -> Rendered {
    let rendered = formatter.render(fault, true);
    std::hint::black_box(rendered)
}

fn warning() -> FaultRecord {
    FaultRecord::new(Level::WARNING, "disk low", "/no/such/source.rs", 7)
}

fn section<'a>(body: &'a str, start: &str, end: &str) -> &'a str {
    let from = body
        .find(start)
        .unwrap_or_else(|| panic!("missing {start:?} in:\n{body}"));
    let rest = &body[from..];
    let to = rest.find(end).unwrap_or(rest.len());
    &rest[..to]
}

#[test]
fn html_trace_starts_at_the_caller_of_render() {
    let formatter = HtmlFormatter::new()
        .with_context(RequestContext::new())
        .with_reporting(Level::WARNING);
    let body = render_html_from_caller(&formatter, &warning()).body;

    let site = section(&body, "data-trace=\"0\"", "</div>");
    assert!(site.contains("<strong>disk low</strong>"), "{site}");

    let first_frame = section(&body, "data-trace=\"1\"", "</div>");
    assert!(
        first_frame.contains("<code>stack_trace_tests::render_html_from_caller()</code>"),
        "{first_frame}"
    );

    let trace = section(&body, "<aside class=\"stacktrace-column\">", "</aside>");
    assert!(!trace.contains("build_page()"), "{trace}");
    assert!(!trace.contains("HtmlFormatter"), "{trace}");
    assert!(!trace.contains("CallStack"), "{trace}");
}

#[test]
fn text_trace_starts_at_the_caller_of_render() {
    let formatter = TextFormatter::new().with_reporting(Level::WARNING);
    let body = render_text_from_caller(&formatter, &warning()).body;

    let trace = section(&body, "Stack trace:\n", "\0");
    let first_frame = trace.lines().nth(1).unwrap_or_default();
    assert!(
        first_frame.starts_with("  at stack_trace_tests::render_text_from_caller() ("),
        "{trace}"
    );
    assert!(!trace.contains("build_report()"), "{trace}");
    assert!(!trace.contains("TextFormatter"), "{trace}");
    assert!(!trace.contains("CallStack"), "{trace}");
}

#[test]
fn warning_outside_mask_hides_the_trace() {
    let formatter = HtmlFormatter::new()
        .with_context(RequestContext::new())
        .with_reporting(Level::NOTICE);
    let body = render_html_from_caller(&formatter, &warning()).body;
    assert!(!body.contains("data-trace"));
    assert!(!body.contains("disk low"));
}

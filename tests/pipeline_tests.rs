use std::sync::{Arc, Mutex};

use faultpage::diagnostics::RequestContext;
use faultpage::format::HiddenTemplate;
use faultpage::pipeline::{BufferSink, PipelineState};
use faultpage::{
    Errors, FaultRecord, HandlerError, HtmlFormatter, HttpException, JsonFormatter, Level,
    PipelineError, from_fn,
};

fn recorder(
    log: &Arc<Mutex<Vec<String>>>,
    name: &'static str,
) -> impl faultpage::Handler + use<> {
    let log = Arc::clone(log);
    from_fn(move |fault: &FaultRecord| {
        log.lock().unwrap().push(format!("{name}:{}", fault.message));
        Ok(())
    })
}

#[test]
fn not_found_exception_uses_404_hidden_page() {
    let formatter = HtmlFormatter::new()
        .with_context(RequestContext::new())
        .with_hidden_template(404, HiddenTemplate::literal("<h1>Nothing here</h1>"));
    let errors = Errors::new();
    errors.register(formatter, false);

    let fault = FaultRecord::exception(HttpException::not_found("route /admin"), "router.rs", 40);
    let mut sink = BufferSink::default();
    let code = errors.respond(fault, &mut sink);

    assert_eq!(code, 1);
    assert_eq!(sink.status_line.as_deref(), Some("HTTP/1.1 404 Not Found"));
    assert_eq!(
        sink.headers,
        vec![(
            "content-type".to_string(),
            "text/html; charset=utf-8".to_string()
        )]
    );
    assert_eq!(sink.body.as_deref(), Some("<h1>Nothing here</h1>"));
    assert_eq!(errors.state(), PipelineState::Terminated);
}

#[test]
fn handlers_run_in_order_exactly_once() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let errors = Errors::new();
    errors.register(JsonFormatter, true);
    errors.add_handler(recorder(&log, "first"));
    errors.add_handler(recorder(&log, "second"));
    assert_eq!(errors.handler_count(), 2);

    let terminate = errors
        .dispatch(FaultRecord::new(Level::WARNING, "low disk", "a.rs", 3))
        .unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["first:low disk".to_string(), "second:low disk".to_string()]
    );
    assert_eq!(terminate.exit_code, 1);
    assert!(terminate.body.contains("low disk"));
}

#[test]
fn failing_handler_skips_the_rest() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let errors = Errors::new();
    errors.register(JsonFormatter, false);
    errors.add_handler(recorder(&log, "first"));
    errors.add_handler(from_fn(|_: &FaultRecord| Err(HandlerError::failed("mailer down"))));
    errors.add_handler(recorder(&log, "third"));

    let err = errors
        .dispatch(FaultRecord::exception(HttpException::forbidden("no"), "a.rs", 1))
        .unwrap_err();

    match err {
        PipelineError::Handler {
            position, status, ..
        } => {
            assert_eq!(position, 1);
            assert_eq!(status.code, 403);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*log.lock().unwrap(), vec!["first:no".to_string()]);
    assert_eq!(errors.state(), PipelineState::Terminated);
}

#[test]
fn failing_handler_response_has_status_and_empty_body() {
    let errors = Errors::new();
    errors.register(JsonFormatter, false);
    errors.add_handler(from_fn(|_: &FaultRecord| Err(HandlerError::failed("mailer down"))));

    let mut sink = BufferSink::default();
    let code = errors.respond(FaultRecord::new(Level::ERROR, "e", "a.rs", 1), &mut sink);

    assert_eq!(code, 1);
    assert_eq!(
        sink.status_line.as_deref(),
        Some("HTTP/1.1 500 Internal Server Error")
    );
    assert!(sink.headers.is_empty());
    assert_eq!(sink.body.as_deref(), Some(""));
}

#[test]
fn display_mode_switch_is_honoured() {
    let errors = Errors::new();
    errors.register(HtmlFormatter::new().with_context(RequestContext::new()), true);
    errors.set_display_mode(false);
    assert!(!errors.display_mode());

    let terminate = errors
        .dispatch(FaultRecord::new(Level::ERROR, "hidden detail", "a.rs", 1))
        .unwrap();
    assert!(!terminate.body.contains("hidden detail"));
    assert!(terminate.body.contains("<title>Error</title>"));
}

#[test]
fn fatal_slot_is_reported_at_shutdown() {
    let errors = Errors::with_protocol("HTTP/1.0");
    errors.register(JsonFormatter, false);
    errors.record_fatal(Level::COMPILE_ERROR, "bad module", "mod.rs", 2);

    let mut sink = BufferSink::default();
    assert_eq!(errors.shutdown(&mut sink), Some(1));
    assert_eq!(
        sink.status_line.as_deref(),
        Some("HTTP/1.0 500 Internal Server Error")
    );
    assert_eq!(
        sink.body.as_deref(),
        Some(r#"{"error":{"type":64,"message":"bad module","file":"mod.rs","line":2}}"#)
    );
}

#[test]
fn unregistered_pipeline_writes_nothing() {
    let errors = Errors::new();
    let mut sink = BufferSink::default();
    assert_eq!(errors.respond(FaultRecord::here(Level::NOTICE, "n"), &mut sink), 1);
    assert_eq!(sink, BufferSink::default());
}

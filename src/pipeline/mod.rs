//! The fault pipeline.
//!
//! [`Errors`] is the process-scoped context every fault surface reports to.
//! It owns the active formatter, the ordered handler list and the display
//! flag, and runs the one-shot dispatch: status → handlers → render.
//!
//! Dispatch does not write anything or exit by itself; it returns a
//! [`Terminate`] that the surface driver writes out before ending the
//! process. See [`hooks`] for the drivers.
//!
//! All state is meant to be configured during startup, before any fault can
//! fire. Calling [`Errors::register`] or [`Errors::add_handler`] while another
//! thread is dispatching is not supported: the dispatch may observe either
//! the old or the new configuration.

pub mod hooks;
pub mod response;

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, error};

use crate::diagnostics::types::{FaultRecord, Status};
use crate::error::PipelineError;
use crate::format::Formatter;
use crate::handler::Handler;

pub use hooks::{ShutdownGuard, install};
pub use response::{BufferSink, ResponseSink, Terminate, WriterSink};

pub const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

/// Exit code used after a dispatched fault.
pub const FAULT_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PipelineState {
    Unregistered = 0,
    Registered = 1,
    Dispatching = 2,
    Terminated = 3,
}

impl PipelineState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => PipelineState::Unregistered,
            1 => PipelineState::Registered,
            2 => PipelineState::Dispatching,
            _ => PipelineState::Terminated,
        }
    }
}

pub struct Errors {
    formatter: RwLock<Option<Arc<dyn Formatter>>>,
    handlers: RwLock<Vec<Box<dyn Handler>>>,
    display: AtomicBool,
    state: AtomicU8,
    protocol: String,
    fatal: Mutex<Option<FaultRecord>>,
}

impl Errors {
    pub fn new() -> Self {
        Self::with_protocol(DEFAULT_PROTOCOL)
    }

    /// Uses `protocol` as the first token of every status line.
    pub fn with_protocol(protocol: impl Into<String>) -> Self {
        Self {
            formatter: RwLock::new(None),
            handlers: RwLock::new(Vec::new()),
            display: AtomicBool::new(false),
            state: AtomicU8::new(PipelineState::Unregistered as u8),
            protocol: protocol.into(),
            fatal: Mutex::new(None),
        }
    }

    /// Installs `formatter` as the active formatter and sets the display
    /// mode. Registering again replaces both.
    pub fn register(&self, formatter: impl Formatter + 'static, display: bool) {
        self.register_shared(Arc::new(formatter), display);
    }

    pub fn register_shared(&self, formatter: Arc<dyn Formatter>, show: bool) {
        debug!(
            formatter = formatter.name(),
            display_mode = show,
            "registering fault formatter"
        );
        *self
            .formatter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(formatter);
        self.set_display_mode(show);
        let _ = self.state.compare_exchange(
            PipelineState::Unregistered as u8,
            PipelineState::Registered as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    pub fn set_display_mode(&self, display: bool) {
        self.display.store(display, Ordering::SeqCst);
    }

    pub fn display_mode(&self) -> bool {
        self.display.load(Ordering::SeqCst)
    }

    /// Appends a handler. Handlers run in the order they were added.
    pub fn add_handler(&self, handler: impl Handler + 'static) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers.push(Box::new(handler));
        debug!(count = handlers.len(), "fault handler added");
    }

    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn state(&self) -> PipelineState {
        PipelineState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn status_line(&self, status: &Status) -> String {
        status.line(&self.protocol)
    }

    fn active_formatter(&self) -> Option<Arc<dyn Formatter>> {
        self.formatter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs the dispatch for `fault`.
    ///
    /// The status comes from the active formatter, then every handler runs in
    /// order, then the formatter renders the body. Only the first dispatch
    /// succeeds; the pipeline is terminal afterwards.
    pub fn dispatch(&self, fault: FaultRecord) -> Result<Terminate, PipelineError> {
        let formatter = self.active_formatter().ok_or(PipelineError::Unregistered)?;
        self.state
            .compare_exchange(
                PipelineState::Registered as u8,
                PipelineState::Dispatching as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map_err(|_| PipelineError::AlreadyDispatched)?;

        let status = formatter.status(&fault);
        error!(
            status = status.code,
            file = %fault.file,
            line = fault.line,
            "dispatching fault: {}",
            fault.message
        );

        let outcome = self.run_handlers(&fault, &status);
        let result = outcome.map(|()| {
            let rendered = formatter.render(&fault, self.display_mode());
            Terminate {
                status_line: self.status_line(&status),
                status,
                content_type: rendered.content_type,
                body: rendered.body,
                exit_code: FAULT_EXIT_CODE,
            }
        });
        self.state
            .store(PipelineState::Terminated as u8, Ordering::SeqCst);
        result
    }

    fn run_handlers(&self, fault: &FaultRecord, status: &Status) -> Result<(), PipelineError> {
        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for (position, handler) in handlers.iter().enumerate() {
            handler
                .handle(fault)
                .map_err(|source| PipelineError::Handler {
                    position,
                    status: status.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Dispatches `fault` and writes the outcome to `sink`. Returns the exit
    /// code the process should end with.
    ///
    /// A handler failure still writes the status line, followed by an empty
    /// body so the head is closed.
    pub fn respond(&self, fault: FaultRecord, sink: &mut dyn ResponseSink) -> i32 {
        match self.dispatch(fault) {
            Ok(terminate) => {
                if let Err(err) = terminate.write_to(sink) {
                    error!(error = %err, "failed to write fault response");
                }
                terminate.exit_code
            }
            Err(PipelineError::Handler {
                position,
                status,
                source,
            }) => {
                error!(position, error = %source, "fault handler aborted dispatch");
                let written = sink
                    .status_line(&self.status_line(&status))
                    .and_then(|()| sink.body(""));
                if let Err(err) = written {
                    error!(error = %err, "failed to write fault response");
                }
                FAULT_EXIT_CODE
            }
            Err(err) => {
                error!(error = %err, "fault could not be dispatched");
                FAULT_EXIT_CODE
            }
        }
    }
}

impl Default for Errors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::types::Level;
    use crate::error::HandlerError;
    use crate::format::JsonFormatter;
    use crate::handler::from_fn;

    fn fault() -> FaultRecord {
        FaultRecord::new(Level::WARNING, "x", "a.rs", 5)
    }

    #[test]
    fn unregistered_dispatch_fails() {
        let errors = Errors::new();
        assert!(matches!(
            errors.dispatch(fault()),
            Err(PipelineError::Unregistered)
        ));
        assert_eq!(errors.state(), PipelineState::Unregistered);
    }

    #[test]
    fn second_dispatch_is_rejected() {
        let errors = Errors::new();
        errors.register(JsonFormatter, false);
        assert!(errors.dispatch(fault()).is_ok());
        assert_eq!(errors.state(), PipelineState::Terminated);
        assert!(matches!(
            errors.dispatch(fault()),
            Err(PipelineError::AlreadyDispatched)
        ));
    }

    #[test]
    fn register_is_idempotent() {
        let errors = Errors::new();
        errors.register(JsonFormatter, true);
        errors.register(JsonFormatter, false);
        assert_eq!(errors.state(), PipelineState::Registered);
        assert!(!errors.display_mode());
    }

    #[test]
    fn failing_handler_aborts_and_keeps_status() {
        let errors = Errors::new();
        errors.register(JsonFormatter, false);
        errors.add_handler(from_fn(|_| Err(HandlerError::failed("disk full"))));
        let mut sink = BufferSink::default();
        let code = errors.respond(fault(), &mut sink);
        assert_eq!(code, FAULT_EXIT_CODE);
        assert_eq!(
            sink.status_line.as_deref(),
            Some("HTTP/1.1 500 Internal Server Error")
        );
        assert_eq!(sink.body.as_deref(), Some(""));
    }

    #[test]
    fn failing_handler_closes_response_head() {
        let errors = Errors::new();
        errors.register(JsonFormatter, false);
        errors.add_handler(from_fn(|_| Err(HandlerError::failed("disk full"))));
        let mut sink = WriterSink::new(Vec::new());
        errors.respond(fault(), &mut sink);
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "HTTP/1.1 500 Internal Server Error\r\n\r\n");
    }

    #[test]
    fn custom_protocol_in_status_line() {
        let errors = Errors::with_protocol("HTTP/2");
        errors.register(JsonFormatter, false);
        let terminate = errors.dispatch(fault()).unwrap();
        assert_eq!(terminate.status_line, "HTTP/2 500 Internal Server Error");
    }
}

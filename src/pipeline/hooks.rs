//! Fault surfaces: where faults enter the pipeline.
//!
//! - runtime faults are raised explicitly with [`Errors::raise`];
//! - uncaught exceptions arrive through the panic hook;
//! - fatal faults are parked with [`Errors::record_fatal`] and reported by
//!   [`Errors::shutdown`] when the [`ShutdownGuard`] drops.
//!
//! Every driver here ends the process after a successful dispatch.

use std::panic;
use std::process;
use std::sync::{Arc, PoisonError};

use tracing::{debug, warn};

use super::Errors;
use super::response::{ResponseSink, WriterSink};
use crate::diagnostics::types::{FaultRecord, Level, RawType};

impl Errors {
    /// Raises a runtime fault at the caller's location, writes the response
    /// to stdout and exits.
    #[track_caller]
    pub fn raise(&self, level: Level, message: impl Into<String>) -> ! {
        let fault = FaultRecord::here(level, message);
        let code = self.respond(fault, &mut WriterSink::stdout());
        process::exit(code)
    }

    /// Parks a fatal fault until [`Errors::shutdown`] runs. A later call
    /// replaces the earlier record.
    pub fn record_fatal(
        &self,
        level: Level,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) {
        let fault = FaultRecord::new(level, message, file, line);
        debug!(level = %level, file = %fault.file, line, "fatal fault recorded");
        *self.fatal.lock().unwrap_or_else(PoisonError::into_inner) = Some(fault);
    }

    /// Takes the parked fatal fault. Records with an empty level count as no
    /// fault at all.
    pub fn take_fatal(&self) -> Option<FaultRecord> {
        let fault = self
            .fatal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        match &fault.raw {
            RawType::Severity(level) if level.is_empty() => None,
            _ => Some(fault),
        }
    }

    /// Dispatches the parked fatal fault, if any, to `sink`. Returns the exit
    /// code when something was dispatched.
    pub fn shutdown(&self, sink: &mut dyn ResponseSink) -> Option<i32> {
        let fault = self.take_fatal()?;
        Some(self.respond(fault, sink))
    }

    /// Installs the panic hook and returns the guard that reports a parked
    /// fatal fault when it drops. Installing again replaces the hook.
    pub fn install(self: &Arc<Self>) -> ShutdownGuard {
        install_panic_hook(Arc::clone(self));
        ShutdownGuard {
            errors: Arc::clone(self),
        }
    }
}

/// Routes every panic through `errors` and exits with its exit code.
pub fn install_panic_hook(errors: Arc<Errors>) {
    panic::set_hook(Box::new(move |info| {
        let fault = FaultRecord::from_panic(info);
        let code = errors.respond(fault, &mut WriterSink::stdout());
        process::exit(code);
    }));
    debug!("panic hook installed");
}

pub fn install(errors: &Arc<Errors>) -> ShutdownGuard {
    errors.install()
}

/// Runs [`Errors::shutdown`] when dropped, which usually happens at the end
/// of `main`. Exits the process if a fatal fault was dispatched.
#[must_use = "the fatal slot is only reported when the guard drops"]
pub struct ShutdownGuard {
    errors: Arc<Errors>,
}

impl ShutdownGuard {
    pub fn errors(&self) -> &Arc<Errors> {
        &self.errors
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        if let Some(code) = self.errors.shutdown(&mut WriterSink::stdout()) {
            warn!(code, "process ending after fatal fault");
            process::exit(code);
        }
    }
}

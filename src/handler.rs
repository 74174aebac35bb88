//! Side-effect handlers run before a fault is rendered.
//!
//! Handlers see every dispatched fault in registration order. They may log or
//! report it but cannot change the response. A handler returning an error
//! aborts the dispatch.

use tracing::error;

use crate::diagnostics::types::{FaultRecord, RawType, classify};
use crate::error::HandlerError;

pub trait Handler: Send + Sync {
    fn handle(&self, fault: &FaultRecord) -> Result<(), HandlerError>;
}

/// Emits one `tracing` error event per fault.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHandler;

impl Handler for TracingHandler {
    fn handle(&self, fault: &FaultRecord) -> Result<(), HandlerError> {
        let class = classify(&fault.raw);
        let code = match &fault.raw {
            RawType::Severity(level) => level.bits(),
            RawType::Caught(exception) => u32::from(exception.status_code()),
        };
        error!(
            title = %class.title,
            category = class.css_class(),
            code,
            file = %fault.file,
            line = fault.line,
            "{}",
            fault.message
        );
        Ok(())
    }
}

/// Adapts a closure into a [`Handler`].
pub struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&FaultRecord) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, fault: &FaultRecord) -> Result<(), HandlerError> {
        (self.0)(fault)
    }
}

pub fn from_fn<F>(handle: F) -> FnHandler<F>
where
    F: Fn(&FaultRecord) -> Result<(), HandlerError> + Send + Sync,
{
    FnHandler(handle)
}

//! Diagnostics module.
//!
//! Fault types and their classification, plus the rendering building blocks
//! (source windows, stack frames, request context) used by the formatters.

pub mod rendering;
pub mod types;

pub use rendering::{
    CallStack, Collection, ContextProvider, FrameView, ProcessContext, RequestContext,
    SourceWindow, StackFrame,
};
pub use types::{
    Category, Classification, Exception, FaultRecord, HttpException, Level, PanicException,
    RawType, Status, classify,
};

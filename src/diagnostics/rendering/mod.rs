//! Rendering utilities for diagnostics
//!
//! Source windows, stack frames, request context and the small text helpers
//! shared by every formatter.

pub mod colors;
pub mod context;
pub mod formatter;
pub mod frame;
pub mod source;

pub use colors::Colors;
pub use context::{Collection, ContextProvider, ProcessContext, RequestContext};
pub use formatter::{escape_html, render_display_path};
pub use frame::{CallStack, FrameView, StackFrame, UNKNOWN_FILE};
pub use source::{MAX_WINDOW_LINES, SourceLine, SourceWindow};

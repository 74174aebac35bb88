//! Call-stack capture and per-frame render units
//!
//! The rich diagnostic page shows one panel per frame: the fault site first,
//! then every frame of the call stack captured while the page is built.

use backtrace::Backtrace;

use super::source::SourceWindow;
use crate::diagnostics::types::FaultRecord;

/// Label used when a frame has no file.
pub const UNKNOWN_FILE: &str = "<#unknown file>";

/// Separator between owner path and function name in Rust symbols.
const PATH_SEPARATOR: &str = "::";

/// One captured call-stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: String,
    pub owner: Option<String>,
    pub operator: Option<String>,
}

impl StackFrame {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            function: function.into(),
            owner: None,
            operator: None,
        }
    }

    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>, operator: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self.operator = Some(operator.into());
        self
    }

    /// Splits a demangled symbol path such as `app::db::Pool::get` into the
    /// owning path (`app::db::Pool`) and the function name (`get`).
    pub fn from_symbol(symbol: &str) -> Self {
        match split_symbol(symbol) {
            Some((owner, function)) => Self::new(function).with_owner(owner, PATH_SEPARATOR),
            None => Self::new(symbol),
        }
    }

    /// `function()` for free frames, `owner<operator>function()` otherwise.
    pub fn call_signature(&self) -> String {
        match &self.owner {
            Some(owner) => format!(
                "{}{}{}()",
                owner,
                self.operator.as_deref().unwrap_or(PATH_SEPARATOR),
                self.function
            ),
            None => format!("{}()", self.function),
        }
    }
}

/// Splits at the last `::` that is not nested inside `<...>`.
fn split_symbol(symbol: &str) -> Option<(&str, &str)> {
    let bytes = symbol.as_bytes();
    let mut depth = 0usize;
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                split = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    let at = split?;
    let (owner, function) = (&symbol[..at], &symbol[at + PATH_SEPARATOR.len()..]);
    if owner.is_empty() || function.is_empty() {
        None
    } else {
        Some((owner, function))
    }
}

/// A snapshot of the current call stack, innermost frame first.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<StackFrame>,
}

impl CallStack {
    pub fn from_frames(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }

    /// Captures the stack of the calling thread. Frames of the capture
    /// machinery itself are not included; the caller of `capture` is the
    /// innermost frame.
    #[inline(never)]
    pub fn capture() -> Self {
        let backtrace = Backtrace::new();
        let mut frames = Vec::new();
        for frame in backtrace.frames() {
            for symbol in frame.symbols() {
                let name = symbol
                    .name()
                    .map(|name| format!("{name:#}"))
                    .unwrap_or_else(|| "<unknown>".to_string());
                let mut stack_frame = StackFrame::from_symbol(&name);
                stack_frame.file = symbol.filename().map(|path| path.display().to_string());
                stack_frame.line = symbol.lineno();
                frames.push(stack_frame);
            }
        }

        let machinery = frames.iter().rposition(|frame| {
            frame.owner.as_deref().is_some_and(|o| o.ends_with("CallStack"))
                && frame.function == "capture"
        });
        match machinery {
            Some(position) => {
                frames.drain(..=position);
            }
            None => frames.retain(|frame| {
                !frame
                    .owner
                    .as_deref()
                    .is_some_and(|owner| owner.starts_with("backtrace"))
            }),
        }

        Self { frames }
    }

    /// Drops the `count` innermost frames.
    pub fn skip_innermost(mut self, count: usize) -> Self {
        let count = count.min(self.frames.len());
        self.frames.drain(..count);
        self
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Everything needed to render one frame: its panel label, its trace entry
/// and the source window around the call site.
#[derive(Debug, Clone)]
pub struct FrameView {
    pub index: usize,
    pub file: String,
    pub line: u32,
    /// Call signature, or the fault message for the fault site.
    pub summary: String,
    pub is_fault_site: bool,
    pub window: SourceWindow,
}

impl FrameView {
    /// The fault site itself is always panel 0.
    pub fn fault_site(fault: &FaultRecord) -> Self {
        Self {
            index: 0,
            file: fault.file.clone(),
            line: fault.line,
            summary: fault.message.clone(),
            is_fault_site: true,
            window: SourceWindow::extract(&fault.file, fault.line),
        }
    }

    /// Captured line numbers already point at the call site, so the window
    /// is centred on them unmodified.
    pub fn from_frame(index: usize, frame: &StackFrame) -> Self {
        let line = frame.line.unwrap_or(0);
        let (file, window) = match &frame.file {
            Some(file) => (file.clone(), SourceWindow::extract(file, line)),
            None => (UNKNOWN_FILE.to_string(), SourceWindow::empty(line)),
        };
        Self {
            index,
            file,
            line,
            summary: frame.call_signature(),
            is_fault_site: false,
            window,
        }
    }

    /// Fault site followed by every captured frame, numbered from 0.
    pub fn collect(fault: &FaultRecord, stack: &CallStack) -> Vec<FrameView> {
        let mut views = Vec::with_capacity(stack.len() + 1);
        views.push(Self::fault_site(fault));
        views.extend(
            stack
                .frames()
                .iter()
                .enumerate()
                .map(|(k, frame)| Self::from_frame(k + 1, frame)),
        );
        views
    }
}

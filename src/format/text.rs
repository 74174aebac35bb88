//! Plain-text formatter for terminals and log-oriented hosts.
//!
//! Uses the same display decision as the HTML formatter. Detail looks like:
//!
//! ```text
//! Warning: disk almost full
//!   --> src/store.rs:42
//!
//!   41 | let free = disk.free();
//! > 42 | warn_if_low(free);
//!   43 | }
//!
//! Stack trace:
//!   at store::Store::flush() (src/store.rs:42)
//! ```

use super::{DisplayFilter, DisplayPolicy, Formatter, Rendered};
use crate::diagnostics::rendering::{
    CallStack, Colors, FrameView, SourceWindow, render_display_path,
};
use crate::diagnostics::types::{FaultRecord, Level, classify};

pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Frames belonging to the formatter itself: `render` and `build_report`.
const RENDERER_FRAMES: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct TextFormatter {
    filter: DisplayFilter,
    use_color: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self {
            filter: DisplayFilter::default(),
            use_color: false,
        }
    }

    pub fn with_reporting(mut self, reporting: Level) -> Self {
        self.filter.reporting = reporting;
        self
    }

    pub fn with_policy(mut self, policy: DisplayPolicy) -> Self {
        self.filter.policy = policy;
        self
    }

    /// Colors the report with ANSI codes unless `NO_COLOR` is set.
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    fn hidden_report(fault: &FaultRecord) -> String {
        let status = fault.status();
        format!(
            "{}\nSomething went wrong. Please try again later.\n",
            status.phrase
        )
    }

    #[inline(never)]
    fn build_report(&self, fault: &FaultRecord) -> String {
        let colors = if self.use_color {
            Colors::new()
        } else {
            Colors::no_color()
        };
        let class = classify(&fault.raw);
        let stack = CallStack::capture().skip_innermost(RENDERER_FRAMES);

        let mut out = String::new();
        out.push_str(colors.for_category(class.category));
        out.push_str(&class.title);
        out.push_str(colors.reset);
        out.push_str(": ");
        out.push_str(&fault.message);
        out.push('\n');
        out.push_str(&format!(
            "  --> {}:{}\n",
            render_display_path(&fault.file),
            fault.line
        ));

        let window = SourceWindow::extract(&fault.file, fault.line);
        if !window.is_empty() {
            out.push('\n');
            render_window(&mut out, &window, &colors);
        }

        let views = FrameView::collect(fault, &stack);
        if views.len() > 1 {
            out.push_str("\nStack trace:");
            for view in &views[1..] {
                out.push_str("\n  at ");
                out.push_str(&view.summary);
                out.push_str(&format!(
                    " {}({}:{}){}",
                    colors.dim,
                    render_display_path(&view.file),
                    view.line,
                    colors.reset
                ));
            }
            out.push('\n');
        }
        out
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn render_window(out: &mut String, window: &SourceWindow, colors: &Colors) {
    let width = window
        .lines()
        .last()
        .map(|line| line.number.to_string().len())
        .unwrap_or(1);
    for line in window.lines() {
        let marker = if line.highlighted { '>' } else { ' ' };
        if line.highlighted {
            out.push_str(colors.red);
        }
        out.push_str(&format!(
            "{} {:>width$} | {}",
            marker,
            line.number,
            line.text,
            width = width
        ));
        if line.highlighted {
            out.push_str(colors.reset);
        }
        out.push('\n');
    }
}

impl Formatter for TextFormatter {
    fn name(&self) -> &'static str {
        "text"
    }

    #[inline(never)]
    fn render(&self, fault: &FaultRecord, display: bool) -> Rendered {
        let status = self.status(fault);
        let body = if self.filter.allows(&fault.raw, display) {
            self.build_report(fault)
        } else {
            Self::hidden_report(fault)
        };
        Rendered::new(body, status).with_content_type(CONTENT_TYPE)
    }
}

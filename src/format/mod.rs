//! Formatters turn a fault into a response body.
//!
//! Every formatter implements [`Formatter`]. Rendering never fails: a
//! formatter that cannot build its rich output falls back to its minimal
//! hidden output instead of raising a second fault.

pub mod html;
pub mod json;
pub mod template;
pub mod text;

use serde::Deserialize;

use crate::diagnostics::types::{FaultRecord, Level, RawType};

pub use crate::diagnostics::types::Status;
pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use template::{HiddenTemplate, PageTemplate, Template};
pub use text::TextFormatter;

/// A rendered response body with the status it should be sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub body: String,
    pub status: Status,
    /// Overrides the response content type when set.
    pub content_type: Option<&'static str>,
}

impl Rendered {
    pub fn new(body: impl Into<String>, status: Status) -> Self {
        Self {
            body: body.into(),
            status,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(content_type);
        self
    }
}

pub trait Formatter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The status line for `fault`. Exceptions carry their own status;
    /// everything else is `500 Internal Server Error`.
    fn status(&self, fault: &FaultRecord) -> Status {
        fault.status()
    }

    fn render(&self, fault: &FaultRecord, display: bool) -> Rendered;
}

/// How the ambient reporting mask combines with the display flag for
/// level-based faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPolicy {
    /// Show detail only when the level is reported *and* display is on.
    #[default]
    Both,
    /// Show detail when the level is reported *or* display is on.
    Either,
}

impl DisplayPolicy {
    pub fn combine(self, reported: bool, display: bool) -> bool {
        match self {
            DisplayPolicy::Both => reported && display,
            DisplayPolicy::Either => reported || display,
        }
    }
}

/// Decides between the rich and the hidden rendering of a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFilter {
    pub reporting: Level,
    pub policy: DisplayPolicy,
}

impl Default for DisplayFilter {
    fn default() -> Self {
        Self {
            reporting: Level::ALL,
            policy: DisplayPolicy::default(),
        }
    }
}

impl DisplayFilter {
    /// Exceptions are shown exactly when `display` is on. Levels also have to
    /// pass the reporting mask, combined according to the policy.
    pub fn allows(&self, raw: &RawType, display: bool) -> bool {
        match raw {
            RawType::Caught(_) => display,
            RawType::Severity(level) => self
                .policy
                .combine(self.reporting.intersects(*level), display),
        }
    }
}

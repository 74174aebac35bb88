//! HTML formatter: rich diagnostic page for developers, minimal branded page
//! for everyone else.
//!
//! Whether detail is shown is decided per fault by a [`DisplayFilter`]:
//! exceptions follow the display flag alone, level-based faults also have to
//! pass the reporting mask.

mod assets;
mod page;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use super::template::{HiddenTemplate, PageTemplate};
use super::{DisplayFilter, DisplayPolicy, Formatter, Rendered};
use crate::diagnostics::rendering::{CallStack, ContextProvider, FrameView, ProcessContext};
use crate::diagnostics::types::{DEFAULT_STATUS_CODE, FaultRecord, Level, classify};

pub use assets::HIDDEN_PAGE;

pub const CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Frames belonging to the formatter itself: `render` and `build_page`.
const RENDERER_FRAMES: usize = 2;

pub struct HtmlFormatter {
    page: Option<PageTemplate>,
    hidden: BTreeMap<u16, HiddenTemplate>,
    filter: DisplayFilter,
    context: Arc<dyn ContextProvider>,
}

impl HtmlFormatter {
    pub const DEFAULT_CODE: u16 = DEFAULT_STATUS_CODE;

    pub fn new() -> Self {
        let mut hidden = BTreeMap::new();
        hidden.insert(
            Self::DEFAULT_CODE,
            HiddenTemplate::builder(|| HIDDEN_PAGE.to_string()),
        );
        Self {
            page: None,
            hidden,
            filter: DisplayFilter::default(),
            context: Arc::new(ProcessContext::new()),
        }
    }

    /// Replaces the built-in rich page.
    pub fn set_page_template(&mut self, template: impl Into<PageTemplate>) {
        self.page = Some(template.into());
    }

    /// Registers the hidden page for `code`, replacing any previous one.
    pub fn add_hidden_template(&mut self, code: u16, template: impl Into<HiddenTemplate>) {
        self.hidden.insert(code, template.into());
    }

    pub fn with_page_template(mut self, template: impl Into<PageTemplate>) -> Self {
        self.set_page_template(template);
        self
    }

    pub fn with_hidden_template(mut self, code: u16, template: impl Into<HiddenTemplate>) -> Self {
        self.add_hidden_template(code, template);
        self
    }

    /// Ambient reporting mask; levels outside it are never shown in detail
    /// under the default policy.
    pub fn with_reporting(mut self, reporting: Level) -> Self {
        self.filter.reporting = reporting;
        self
    }

    pub fn with_policy(mut self, policy: DisplayPolicy) -> Self {
        self.filter.policy = policy;
        self
    }

    pub fn with_context(mut self, context: impl ContextProvider + 'static) -> Self {
        self.context = Arc::new(context);
        self
    }

    pub fn filter(&self) -> DisplayFilter {
        self.filter
    }

    /// Body of the hidden page for `fault`: the template registered for the
    /// exception's status code, or the default code's template.
    pub fn hidden_page(&self, fault: &FaultRecord) -> String {
        let code = fault
            .exception_status()
            .map(|status| status.code)
            .filter(|code| self.hidden.contains_key(code))
            .unwrap_or(Self::DEFAULT_CODE);

        let Some(template) = self.hidden.get(&code) else {
            return HIDDEN_PAGE.to_string();
        };
        match template.resolve() {
            Ok(body) => body,
            Err(err) => {
                warn!(code, error = %err, "hidden template unreadable, using built-in page");
                HIDDEN_PAGE.to_string()
            }
        }
    }

    #[inline(never)]
    fn build_page(&self, fault: &FaultRecord) -> String {
        let class = classify(&fault.raw);
        let stack = CallStack::capture().skip_innermost(RENDERER_FRAMES);
        let views = FrameView::collect(fault, &stack);
        let context = self.context.request_context();
        page::render_page(&class, fault, &views, &context)
    }
}

impl Default for HtmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for HtmlFormatter {
    fn name(&self) -> &'static str {
        "html"
    }

    #[inline(never)]
    fn render(&self, fault: &FaultRecord, display: bool) -> Rendered {
        let status = self.status(fault);

        if !self.filter.allows(&fault.raw, display) {
            return Rendered::new(self.hidden_page(fault), status).with_content_type(CONTENT_TYPE);
        }

        let body = match &self.page {
            None => self.build_page(fault),
            Some(template) => match template.resolve(fault) {
                Ok(body) => body,
                Err(err) => {
                    warn!(error = %err, "page template unreadable, hiding fault detail");
                    self.hidden_page(fault)
                }
            },
        };
        Rendered::new(body, status).with_content_type(CONTENT_TYPE)
    }
}

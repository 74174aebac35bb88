//! Assembly of the built-in rich diagnostic page
//!
//! Layout:
//! - a header with the fault title (styled by category) and message
//! - one code panel per frame, only the first initially visible
//! - a stack-trace column whose entries toggle the panels
//! - a variables panel listing the request context collections

use crate::diagnostics::rendering::{
    Collection, FrameView, RequestContext, escape_html, render_display_path,
};
use crate::diagnostics::types::{Classification, FaultRecord};

use super::assets::{STYLESHEET, TOGGLE_SCRIPT};

pub(super) fn render_page(
    class: &Classification,
    fault: &FaultRecord,
    views: &[FrameView],
    context: &RequestContext,
) -> String {
    let title = escape_html(&class.title);
    let mut content = String::new();

    render_header(&mut content, class, fault);

    content.push_str("<div class=\"error-details\">");
    for view in views {
        render_code_panel(&mut content, view);
    }
    content.push_str("</div>");

    content.push_str("<div class=\"column-layout\">");
    content.push_str("<aside class=\"stacktrace-column\"><div class=\"stacktrace\">");
    for view in views {
        render_trace_entry(&mut content, view);
    }
    content.push_str("</div></aside>");
    content.push_str("<aside class=\"variables\">");
    render_variables(&mut content, context);
    content.push_str("</aside>");
    content.push_str("<hr style=\"clear:both;display:none;\">");
    content.push_str("</div>");

    let mut page = String::with_capacity(content.len() + STYLESHEET.len() + 512);
    page.push_str("<!DOCTYPE html><html><head>");
    page.push_str("<meta charset=\"utf-8\">");
    page.push_str("<meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge,chrome=1\">");
    page.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, maximum-scale=1.0\">",
    );
    page.push_str(&format!("<title>Error | {}</title>", title));
    page.push_str(STYLESHEET);
    page.push_str("</head><body>");
    page.push_str(&content);
    page.push_str(TOGGLE_SCRIPT);
    page.push_str("</body></html>");
    page
}

fn render_header(out: &mut String, class: &Classification, fault: &FaultRecord) {
    let css = class.css_class();
    out.push_str(&format!(
        "<header class=\"error-header error-header--{css}\">\
         <h1 class=\"error-title error-title--{css}\">{}</h1>\
         <h2>{}</h2>\
         </header>",
        escape_html(&class.title),
        escape_html(&fault.message),
    ));
}

fn render_code_panel(out: &mut String, view: &FrameView) {
    let active = if view.index == 0 {
        "code-part--active "
    } else {
        ""
    };
    out.push_str(&format!(
        "<section class=\"code-part {}code-part-{}\">",
        active, view.index
    ));
    out.push_str(&format!(
        "<h1 class=\"file\">{}</h1>",
        escape_html(&render_display_path(&view.file))
    ));
    out.push_str("<pre class=\"code-details\">");
    if view.window.is_empty() {
        out.push_str("<p class=\"no-source\">no source available</p>");
    } else {
        out.push_str("<ol>");
        for (i, line) in view.window.lines().iter().enumerate() {
            // Only the first item needs an explicit number; the rest follow it.
            if i == 0 {
                out.push_str(&format!("<li value=\"{}\">", line.number));
            } else {
                out.push_str("<li>");
            }
            if line.highlighted {
                out.push_str("<mark class=\"highlight\">");
                out.push_str(&escape_html(&line.text));
                out.push_str("</mark>");
            } else {
                out.push_str(&escape_html(&line.text));
            }
            out.push_str("</li>");
        }
        out.push_str("</ol>");
    }
    out.push_str("</pre></section>");
}

fn render_trace_entry(out: &mut String, view: &FrameView) {
    out.push_str(&format!(
        "<div class=\"trace\" data-trace=\"{}\">",
        view.index
    ));
    out.push_str(&format!(
        "<p>{} on line {}</p>",
        escape_html(&render_display_path(&view.file)),
        view.line
    ));
    if view.is_fault_site {
        out.push_str(&format!("<strong>{}</strong>", escape_html(&view.summary)));
    } else {
        out.push_str(&format!("<code>{}</code>", escape_html(&view.summary)));
    }
    out.push_str("</div>");
}

fn render_variables(out: &mut String, context: &RequestContext) {
    for collection in Collection::ALL {
        out.push_str(&format!(
            "<h2 class=\"variable-title\">{}",
            collection.label()
        ));
        match context.get(collection) {
            Some(entries) => {
                out.push_str("</h2><ul class=\"variables-list\">");
                for (key, value) in entries {
                    out.push_str(&format!(
                        "<li>{} =&gt; {}</li>",
                        escape_html(key),
                        escape_html(value)
                    ));
                }
                out.push_str("</ul>");
            }
            None => out.push_str(" <small class=\"variable-empty\">empty</small></h2>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::rendering::{CallStack, StackFrame};
    use crate::diagnostics::types::{Level, classify};

    fn page_for(fault: &FaultRecord, frames: Vec<StackFrame>, ctx: &RequestContext) -> String {
        let views = FrameView::collect(fault, &CallStack::from_frames(frames));
        render_page(&classify(&fault.raw), fault, &views, ctx)
    }

    #[test]
    fn only_first_panel_is_active() {
        let fault = FaultRecord::new(Level::NOTICE, "n", "", 0);
        let page = page_for(
            &fault,
            vec![StackFrame::new("a"), StackFrame::new("b")],
            &RequestContext::new(),
        );
        assert_eq!(page.matches("code-part--active ").count(), 1);
        assert!(page.contains("code-part code-part--active code-part-0"));
        assert!(page.contains("<section class=\"code-part code-part-2\">"));
        assert!(page.contains("data-trace=\"2\""));
    }

    #[test]
    fn empty_collections_are_marked() {
        let fault = FaultRecord::new(Level::NOTICE, "n", "", 0);
        let mut ctx = RequestContext::new();
        ctx.insert(Collection::Query, "page", 2);
        let page = page_for(&fault, Vec::new(), &ctx);
        assert!(page.contains("<li>page =&gt; 2</li>"));
        assert!(page.contains("session <small class=\"variable-empty\">empty</small></h2>"));
    }

    #[test]
    fn panel_and_trace_share_display_path() {
        let cwd = std::env::current_dir().unwrap();
        let file = cwd.join("src").join("lib.rs").display().to_string();
        let fault = FaultRecord::new(Level::NOTICE, "n", file.clone(), 1);
        let page = page_for(&fault, Vec::new(), &RequestContext::new());
        let shown = render_display_path(&file).into_owned();
        assert_ne!(shown, file);
        assert!(page.contains(&format!("<h1 class=\"file\">{}</h1>", escape_html(&shown))));
        assert!(page.contains(&format!("<p>{} on line 1</p>", escape_html(&shown))));
        assert!(!page.contains(&format!("<h1 class=\"file\">{}</h1>", escape_html(&file))));
    }

    #[test]
    fn message_is_escaped() {
        let fault = FaultRecord::new(Level::WARNING, "<script>x</script>", "", 0);
        let page = page_for(&fault, Vec::new(), &RequestContext::new());
        assert!(!page.contains("<script>x</script>"));
        assert!(page.contains("&lt;script&gt;x&lt;/script&gt;"));
    }

    #[test]
    fn unreadable_source_is_reported() {
        let fault = FaultRecord::new(Level::WARNING, "w", "/missing/file.rs", 4);
        let page = page_for(&fault, Vec::new(), &RequestContext::new());
        assert!(page.contains("no source available"));
        assert!(page.contains("/missing/file.rs on line 4"));
    }
}

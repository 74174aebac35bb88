//! JSON formatter.
//!
//! Always renders the full fault, whatever the display flag says. Use it for
//! API endpoints whose clients are trusted, or pair it with a handler that
//! scrubs the message before it is rendered.

use serde::Serialize;

use super::{Formatter, Rendered};
use crate::diagnostics::types::{FaultRecord, RawType};

pub const CONTENT_TYPE: &str = "text/json";

const FALLBACK_BODY: &str = r#"{"error":{"type":0,"message":"","file":"","line":0}}"#;

#[derive(Serialize)]
struct Envelope<'a> {
    error: Payload<'a>,
}

#[derive(Serialize)]
struct Payload<'a> {
    #[serde(rename = "type")]
    kind: FaultType<'a>,
    message: &'a str,
    file: &'a str,
    line: u32,
}

/// Numeric level for runtime faults, kind name for exceptions.
#[derive(Serialize)]
#[serde(untagged)]
enum FaultType<'a> {
    Level(u32),
    Exception(&'a str),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(fault: &FaultRecord) -> String {
        let kind = match &fault.raw {
            RawType::Severity(level) => FaultType::Level(level.bits()),
            RawType::Caught(exception) => FaultType::Exception(exception.kind()),
        };
        let envelope = Envelope {
            error: Payload {
                kind,
                message: &fault.message,
                file: &fault.file,
                line: fault.line,
            },
        };
        serde_json::to_string(&envelope).unwrap_or_else(|_| FALLBACK_BODY.to_string())
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, fault: &FaultRecord, _display: bool) -> Rendered {
        Rendered::new(Self::encode(fault), self.status(fault)).with_content_type(CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::types::{HttpException, Level};

    #[test]
    fn level_is_encoded_as_number() {
        let fault = FaultRecord::new(Level::ERROR, "Test error", "test.rs", 11);
        assert_eq!(
            JsonFormatter::encode(&fault),
            r#"{"error":{"type":1,"message":"Test error","file":"test.rs","line":11}}"#
        );
    }

    #[test]
    fn exception_is_encoded_by_kind() {
        let fault = FaultRecord::exception(HttpException::forbidden("no"), "a.rs", 2);
        let rendered = JsonFormatter.render(&fault, false);
        assert!(rendered.body.starts_with(r#"{"error":{"type":"HttpException""#));
        assert_eq!(rendered.status.code, 403);
        assert_eq!(rendered.content_type, Some(CONTENT_TYPE));
    }
}

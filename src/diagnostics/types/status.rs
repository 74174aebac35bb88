//! HTTP-style response status

use std::borrow::Cow;
use std::fmt;

use super::exception::{DEFAULT_STATUS_CODE, DEFAULT_STATUS_PHRASE};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Status {
    pub code: u16,
    pub phrase: Cow<'static, str>,
}

impl Status {
    pub const INTERNAL_SERVER_ERROR: Status = Status {
        code: DEFAULT_STATUS_CODE,
        phrase: Cow::Borrowed(DEFAULT_STATUS_PHRASE),
    };

    pub fn new(code: u16, phrase: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            phrase: phrase.into(),
        }
    }

    /// Formats the full status line, e.g. `HTTP/1.1 404 Not Found`.
    pub fn line(&self, protocol: &str) -> String {
        format!("{} {}", protocol, self)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.phrase)
    }
}

//! Exception values that reach the pipeline through the panic surface.

use std::borrow::Cow;
use std::fmt::{Debug, Display};

use thiserror::Error;

pub const DEFAULT_STATUS_CODE: u16 = 500;
pub const DEFAULT_STATUS_PHRASE: &str = "Internal Server Error";

/// An exception-like fault carrying its own HTTP status.
///
/// `Display` supplies the message. `kind` is the name shown as the title of
/// the diagnostic page.
pub trait Exception: Display + Debug + Send + Sync + 'static {
    fn kind(&self) -> &str;

    fn status_code(&self) -> u16 {
        DEFAULT_STATUS_CODE
    }

    fn status_phrase(&self) -> &str {
        DEFAULT_STATUS_PHRASE
    }
}

/// Exception raised by application code with an explicit HTTP status.
///
/// Raise it with `std::panic::panic_any(HttpException::not_found(..))`; the
/// installed panic hook recovers the status from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HttpException {
    code: u16,
    phrase: Cow<'static, str>,
    message: String,
}

impl HttpException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: DEFAULT_STATUS_CODE,
            phrase: Cow::Borrowed(DEFAULT_STATUS_PHRASE),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).with_status(404, "Not Found")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message).with_status(403, "Forbidden")
    }

    pub fn with_status(mut self, code: u16, phrase: impl Into<Cow<'static, str>>) -> Self {
        self.code = code;
        self.phrase = phrase.into();
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Exception for HttpException {
    fn kind(&self) -> &str {
        "HttpException"
    }

    fn status_code(&self) -> u16 {
        self.code
    }

    fn status_phrase(&self) -> &str {
        &self.phrase
    }
}

/// A panic whose payload was a plain message (or something unprintable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PanicException {
    message: String,
}

impl PanicException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Exception for PanicException {
    fn kind(&self) -> &str {
        "Panic"
    }
}

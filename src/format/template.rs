//! Template sources for the HTML formatter.
//!
//! A template is either literal text, a file read at render time, or a
//! builder closure. Rich page builders receive the fault; hidden page
//! builders take no arguments.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::diagnostics::types::FaultRecord;

pub type PageBuilder = dyn Fn(&FaultRecord) -> String + Send + Sync;
pub type HiddenBuilder = dyn Fn() -> String + Send + Sync;

pub enum Template<B: ?Sized> {
    Literal(String),
    File(PathBuf),
    Builder(Arc<B>),
}

/// Replaces the built-in rich diagnostic page.
pub type PageTemplate = Template<PageBuilder>;
/// Minimal page shown when detail is hidden, keyed by status code.
pub type HiddenTemplate = Template<HiddenBuilder>;

impl<B: ?Sized> Template<B> {
    pub fn literal(text: impl Into<String>) -> Self {
        Template::Literal(text.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Template::File(path.into())
    }

    /// Resolves literal and file sources; `None` for builders.
    fn resolve_static(&self) -> Option<io::Result<String>> {
        match self {
            Template::Literal(text) => Some(Ok(text.clone())),
            Template::File(path) => Some(fs::read_to_string(path)),
            Template::Builder(_) => None,
        }
    }
}

impl PageTemplate {
    pub fn builder<F>(build: F) -> Self
    where
        F: Fn(&FaultRecord) -> String + Send + Sync + 'static,
    {
        Template::Builder(Arc::new(build))
    }

    pub fn resolve(&self, fault: &FaultRecord) -> io::Result<String> {
        match self {
            Template::Builder(build) => Ok(build(fault)),
            other => other.resolve_static().unwrap_or_else(|| Ok(String::new())),
        }
    }
}

impl HiddenTemplate {
    pub fn builder<F>(build: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Template::Builder(Arc::new(build))
    }

    pub fn resolve(&self) -> io::Result<String> {
        match self {
            Template::Builder(build) => Ok(build()),
            other => other.resolve_static().unwrap_or_else(|| Ok(String::new())),
        }
    }
}

impl<B: ?Sized> Clone for Template<B> {
    fn clone(&self) -> Self {
        match self {
            Template::Literal(text) => Template::Literal(text.clone()),
            Template::File(path) => Template::File(path.clone()),
            Template::Builder(build) => Template::Builder(Arc::clone(build)),
        }
    }
}

impl<B: ?Sized> fmt::Debug for Template<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Template::File(path) => f.debug_tuple("File").field(path).finish(),
            Template::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

impl<B: ?Sized> From<&str> for Template<B> {
    fn from(text: &str) -> Self {
        Template::Literal(text.to_string())
    }
}

impl<B: ?Sized> From<String> for Template<B> {
    fn from(text: String) -> Self {
        Template::Literal(text)
    }
}

impl<B: ?Sized> From<PathBuf> for Template<B> {
    fn from(path: PathBuf) -> Self {
        Template::File(path)
    }
}

//! Error types for the fault pipeline, handlers and configuration.
//!
//! Rendering itself never fails: formatters degrade to the hidden template
//! instead. These types cover the places where a caller can act on a failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::Status;

/// Failure reported by a side-effect [`Handler`](crate::handler::Handler).
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("handler failed: {0}")]
    Failed(String),
    #[error("handler I/O error: {0}")]
    Io(#[from] io::Error),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Reasons a dispatch could not produce a response.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no formatter registered")]
    Unregistered,
    #[error("a fault has already been dispatched")]
    AlreadyDispatched,
    /// A handler failed; the remaining handlers and rendering were skipped.
    /// `status` is the status line that had already been decided.
    #[error("handler #{position} aborted dispatch")]
    Handler {
        position: usize,
        status: Status,
        #[source]
        source: HandlerError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value `{value}` for {key}")]
    InvalidEnv { key: String, value: String },
}

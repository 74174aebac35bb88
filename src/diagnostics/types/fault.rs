//! The fault record handed through the pipeline

use std::any::Any;
use std::fmt;
use std::panic::{Location, PanicHookInfo};
use std::sync::Arc;

use super::exception::{Exception, HttpException, PanicException};
use super::severity::Level;
use super::status::Status;

/// What kind of fault fired: a severity level, or a caught exception.
#[derive(Clone)]
pub enum RawType {
    Severity(Level),
    Caught(Arc<dyn Exception>),
}

impl RawType {
    pub fn level(&self) -> Option<Level> {
        match self {
            RawType::Severity(level) => Some(*level),
            RawType::Caught(_) => None,
        }
    }

    pub fn exception(&self) -> Option<&dyn Exception> {
        match self {
            RawType::Severity(_) => None,
            RawType::Caught(exception) => Some(exception.as_ref()),
        }
    }
}

impl fmt::Debug for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawType::Severity(level) => f.debug_tuple("Severity").field(level).finish(),
            RawType::Caught(exception) => f.debug_tuple("Caught").field(exception).finish(),
        }
    }
}

impl From<Level> for RawType {
    fn from(level: Level) -> Self {
        RawType::Severity(level)
    }
}

/// One fault, built when a surface fires and discarded after dispatch.
#[derive(Debug, Clone)]
pub struct FaultRecord {
    pub raw: RawType,
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl FaultRecord {
    pub fn new(
        raw: impl Into<RawType>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            raw: raw.into(),
            message: message.into(),
            file: file.into(),
            line,
        }
    }

    /// A level-based fault located at the caller.
    #[track_caller]
    pub fn here(level: Level, message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self::new(level, message, location.file(), location.line())
    }

    pub fn exception<E: Exception>(exception: E, file: impl Into<String>, line: u32) -> Self {
        let message = exception.to_string();
        Self {
            raw: RawType::Caught(Arc::new(exception)),
            message,
            file: file.into(),
            line,
        }
    }

    /// Builds the record for a panic. An [`HttpException`] payload keeps its
    /// status; string payloads become a [`PanicException`].
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let (file, line) = info
            .location()
            .map(|loc| (loc.file().to_string(), loc.line()))
            .unwrap_or_default();
        Self::from_payload(info.payload(), file, line)
    }

    pub fn from_payload(payload: &(dyn Any + Send), file: String, line: u32) -> Self {
        if let Some(exception) = payload.downcast_ref::<HttpException>() {
            return Self::exception(exception.clone(), file, line);
        }
        let message = if let Some(msg) = payload.downcast_ref::<&str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::exception(PanicException::new(message), file, line)
    }

    /// The status carried by an exception, if the fault is one.
    pub fn exception_status(&self) -> Option<Status> {
        self.raw.exception().map(|exception| {
            Status::new(exception.status_code(), exception.status_phrase().to_string())
        })
    }

    /// The response status for this fault: the exception's own status, or
    /// `500 Internal Server Error`.
    pub fn status(&self) -> Status {
        self.exception_status().unwrap_or_default()
    }
}

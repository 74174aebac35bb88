//! Core fault types: severity levels, exceptions, fault records and statuses.

pub mod exception;
pub mod fault;
pub mod severity;
pub mod status;

pub use exception::{
    DEFAULT_STATUS_CODE, DEFAULT_STATUS_PHRASE, Exception, HttpException, PanicException,
};
pub use fault::{FaultRecord, RawType};
pub use severity::{Category, Classification, Level, classify};
pub use status::Status;

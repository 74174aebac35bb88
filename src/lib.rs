pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod handler;
pub mod pipeline;

pub use config::{ErrorsConfig, OutputFormat};
pub use diagnostics::types::{FaultRecord, HttpException, Level, RawType, Status};
pub use error::{ConfigError, HandlerError, PipelineError};
pub use format::{Formatter, HtmlFormatter, JsonFormatter, TextFormatter};
pub use handler::{Handler, TracingHandler, from_fn};
pub use pipeline::{Errors, ShutdownGuard, Terminate};

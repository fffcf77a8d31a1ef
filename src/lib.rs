//! # kv_logger
//!
//! A small synchronous leveled logger that writes `key="value"` lines.
//!
//! ## Features
//!
//! - **Four levels**: fatal, error, info, debug; fatal always logs and then exits
//! - **Contextual fields**: derive loggers that carry extra fields, without
//!   touching the parent
//! - **Thread safe**: lines from concurrent callers never interleave
//! - **Call sites**: every line ends with the caller's `file:line`
//! - **Adapters**: an `io::Write` error-line sink, and a `log` facade backend
//!   behind the `log` feature
//!
//! ```
//! use kv_logger::prelude::*;
//! use kv_logger::info;
//!
//! let logger = SyncLogger::new(std::io::stdout()).with_field("service", "api");
//! info!(logger, "listening on port {}", 8080);
//! ```

pub mod core;
pub mod integrations;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CallSite, Clock, ExitHook, Field, Level, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, PrintLogger, Result, SyncLogger,
    };
    pub use crate::sinks::{FileSink, MemorySink, Sink};
}

pub use self::core::{
    CallSite, Clock, ExitHook, Field, Level, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    PrintLogger, Result, SyncLogger, FATAL_EXIT_CODE,
};
pub use sinks::{FileSink, MemorySink, Sink};

//! Core logger types and traits

pub mod clock;
pub mod error;
pub mod field;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod traits;

pub use clock::{Clock, ExitHook};
pub use error::{LoggerError, Result};
pub use field::Field;
pub use level::Level;
pub use logger::{CallSite, LoggerBuilder, SyncLogger, FATAL_EXIT_CODE};
pub use metrics::LoggerMetrics;
pub use traits::{Logger, PrintLogger};

//! Logging macros for ergonomic log message formatting.
//!
//! Each macro takes a logger expression followed by `format!`-style
//! arguments. The logger can be anything implementing
//! [`PrintLogger`](crate::PrintLogger): a [`SyncLogger`](crate::SyncLogger),
//! a reference to one, or a boxed trait object. The recorded call site is the
//! line the macro is invoked on.
//!
//! # Examples
//!
//! ```
//! use kv_logger::prelude::*;
//! use kv_logger::info;
//!
//! let logger = SyncLogger::new(MemorySink::new());
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use kv_logger::prelude::*;
/// # let logger = SyncLogger::builder().writer(MemorySink::new()).level(Level::Debug).build();
/// use kv_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::PrintLogger as _;
        $logger.debug(::std::format_args!($($arg)+))
    }};
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use kv_logger::prelude::*;
/// # let logger = SyncLogger::new(MemorySink::new());
/// use kv_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::PrintLogger as _;
        $logger.info(::std::format_args!($($arg)+))
    }};
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use kv_logger::prelude::*;
/// # let logger = SyncLogger::new(MemorySink::new());
/// use kv_logger::error;
/// error!(logger, "Failed to connect");
/// error!(logger, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::PrintLogger as _;
        $logger.error(::std::format_args!($($arg)+))
    }};
}

/// Log a fatal message, then terminate the process with exit status 1.
///
/// Writes regardless of the configured level. With the default exit hook
/// this does not return.
///
/// # Examples
///
/// ```no_run
/// # use kv_logger::prelude::*;
/// # let logger = SyncLogger::new(MemorySink::new());
/// use kv_logger::fatal;
/// fatal!(logger, "Unrecoverable error: {}", "out of memory");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::PrintLogger as _;
        $logger.fatal(::std::format_args!($($arg)+))
    }};
}

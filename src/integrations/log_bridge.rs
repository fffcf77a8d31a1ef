//! Backend for the [`log`] facade
//!
//! [`LogBridge`] rebuilds an equivalent logger from another logger's level,
//! sink and fields, and serves `log::info!` and friends through it. Records
//! keep their own file and line.

use crate::core::{CallSite, Level, Logger, LoggerError, Result, SyncLogger};

/// The `log` level closest to `level`. `log` has no fatal level.
pub fn to_log_level(level: Level) -> log::Level {
    match level {
        Level::Fatal | Level::Error => log::Level::Error,
        Level::Info => log::Level::Info,
        Level::Debug => log::Level::Debug,
    }
}

/// The level a `log` record is written at. Warnings are kept with errors so
/// an error-level logger does not drop them; trace is folded into debug.
pub fn from_log_level(level: log::Level) -> Level {
    match level {
        log::Level::Error | log::Level::Warn => Level::Error,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

fn to_level_filter(level: Level) -> log::LevelFilter {
    match level {
        Level::Fatal | Level::Error => log::LevelFilter::Warn,
        Level::Info => log::LevelFilter::Info,
        Level::Debug => log::LevelFilter::Trace,
    }
}

pub struct LogBridge {
    logger: SyncLogger,
}

impl LogBridge {
    /// Snapshot `source`'s level, sink and fields (in order).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kv_logger::integrations::LogBridge;
    /// use kv_logger::prelude::*;
    ///
    /// let logger = SyncLogger::new(std::io::stderr()).with_field("service", "api");
    /// LogBridge::from_logger(&logger).install().unwrap();
    ///
    /// log::info!("listening on {}", 8080);
    /// ```
    pub fn from_logger(source: &dyn Logger) -> Self {
        let logger = SyncLogger::builder()
            .sink(source.out())
            .level(source.level())
            .fields(source.fields().iter().cloned())
            .build();

        Self { logger }
    }

    /// Serve records through `logger` itself.
    pub fn new(logger: SyncLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &SyncLogger {
        &self.logger
    }

    /// Install as the process-wide `log` backend.
    ///
    /// Fails if another backend is already installed.
    pub fn install(self) -> Result<()> {
        let max_level = to_level_filter(self.logger.level());
        log::set_boxed_logger(Box::new(self))
            .map_err(|e| LoggerError::other(format!("failed to install log bridge: {}", e)))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.logger.level().enables(from_log_level(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let site = record.file().map(|file| CallSite {
            file,
            line: record.line().unwrap_or(0),
        });
        self.logger
            .log_at(from_log_level(record.level()), *record.args(), site);
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            self.logger
                .report(format_args!("Failed to flush log bridge: {}", e));
        }
    }
}

//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log line.
///
/// Ordering runs from least to most verbose: `Fatal < Error < Info < Debug`.
/// A logger configured at level `C` emits a line of level `L` when `C >= L`;
/// `Fatal` is emitted regardless of the configured level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Logs and then terminates the process with exit status 1.
    Fatal = 0,
    /// Errors that should definitely be noted.
    Error = 1,
    /// General operational entries about what's going on inside the application.
    #[default]
    Info = 2,
    /// Very verbose, usually only enabled when debugging.
    Debug = 3,
}

impl Level {
    /// Every level, most severe first.
    pub const ALL: [Level; 4] = [Level::Fatal, Level::Error, Level::Info, Level::Debug];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    /// Whether a logger configured at `self` lets a line of `message` level through.
    #[inline]
    pub fn enables(self, message: Level) -> bool {
        message == Level::Fatal || self >= message
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fatal" => Ok(Level::Fatal),
            "error" => Ok(Level::Error),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(LoggerError::InvalidLevel(s.to_string())),
        }
    }
}

//! Adapters between this logger and other logging surfaces

pub mod writer;

#[cfg(feature = "log")]
pub mod log_bridge;

pub use writer::ErrorWriter;

#[cfg(feature = "log")]
pub use log_bridge::LogBridge;

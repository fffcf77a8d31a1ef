//! Logger capability traits
//!
//! [`PrintLogger`] is the leveled print surface. [`Logger`] adds level
//! control, sink and field access, and derivation of field-carrying views.
//! Adapters to other logging frameworks only need [`Logger`].

use super::{field::Field, level::Level};
use crate::sinks::Sink;
use std::fmt;
use std::sync::Arc;

/// Leveled print methods taking pre-built format arguments.
///
/// The [`debug!`](crate::debug), [`info!`](crate::info),
/// [`error!`](crate::error) and [`fatal!`](crate::fatal) macros build the
/// arguments from `format!`-style input.
///
/// Every method records the location of its caller, so implementations must
/// route all four through one shared writer to keep the captured frame the same.
pub trait PrintLogger {
    #[track_caller]
    fn debug(&self, args: fmt::Arguments<'_>);

    #[track_caller]
    fn info(&self, args: fmt::Arguments<'_>);

    #[track_caller]
    fn error(&self, args: fmt::Arguments<'_>);

    /// Terminating call.
    ///
    /// Writes the line regardless of the configured level, then ends the
    /// process with exit status 1. With the default exit hook this never
    /// returns; do not call it expecting to continue.
    #[track_caller]
    fn fatal(&self, args: fmt::Arguments<'_>);
}

pub trait Logger: PrintLogger + Send + Sync {
    fn set_level(&self, level: Level);

    fn level(&self) -> Level;

    /// Handle to the sink this logger writes to.
    fn out(&self) -> Sink;

    /// Fields in insertion order.
    fn fields(&self) -> &[Field];

    /// A print view carrying an extra `err` field set to the error's message.
    fn with_err(&self, err: &dyn std::error::Error) -> Box<dyn PrintLogger + Send + Sync>;

    /// A new logger with one more field. `self` is left unchanged.
    fn with_field(&self, key: &str, value: &str) -> Box<dyn Logger>;
}

macro_rules! forward_print_logger {
    ($($ptr:ty),+) => {
        $(
            impl<T: PrintLogger + ?Sized> PrintLogger for $ptr {
                #[track_caller]
                fn debug(&self, args: fmt::Arguments<'_>) {
                    (**self).debug(args)
                }

                #[track_caller]
                fn info(&self, args: fmt::Arguments<'_>) {
                    (**self).info(args)
                }

                #[track_caller]
                fn error(&self, args: fmt::Arguments<'_>) {
                    (**self).error(args)
                }

                #[track_caller]
                fn fatal(&self, args: fmt::Arguments<'_>) {
                    (**self).fatal(args)
                }
            }
        )+
    };
}

forward_print_logger!(&T, Box<T>, Arc<T>);

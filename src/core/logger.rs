//! Synchronous formatting logger
//!
//! Every call renders one line of the form
//!
//! ```text
//! time="<time>" lvl=<level> msg="<message>" <key>="<value>" ... file=<basename>:<line>
//! ```
//!
//! and hands it to the sink in a single write. Nothing is escaped.

use super::{
    clock::{Clock, ExitHook},
    field::Field,
    level::Level,
    metrics::LoggerMetrics,
    traits::{Logger, PrintLogger},
};
use crate::sinks::Sink;
use parking_lot::Mutex;
use std::borrow::Cow;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

const DELIMITER: u8 = b' ';

/// Exit status used by `fatal`.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl CallSite<'static> {
    /// Placeholder used when no location is available.
    pub const UNKNOWN: CallSite<'static> = CallSite { file: "???", line: 0 };

    /// Location of the caller of the enclosing `#[track_caller]` chain.
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        CallSite {
            file: location.file(),
            line: location.line(),
        }
    }
}

/// Level and scratch buffer, guarded together.
struct State {
    level: Level,
    buf: Vec<u8>,
}

impl State {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::with_capacity(256),
        }
    }
}

/// Leveled logger writing `key="value"` lines to a [`Sink`].
///
/// Loggers derived with [`with_field`](SyncLogger::with_field) share the sink,
/// clock, exit hook and metrics of their parent but own a copy of the field
/// list, a snapshot of the level and their own buffer.
///
/// # Example
///
/// ```
/// use kv_logger::prelude::*;
/// use kv_logger::{error, info};
///
/// let out = MemorySink::new();
/// let logger = SyncLogger::new(out.clone());
///
/// let request = logger.with_field("request_id", "42");
/// info!(request, "handled in {}ms", 3);
/// error!(logger, "upstream unavailable");
///
/// assert_eq!(out.lines().len(), 2);
/// ```
pub struct SyncLogger {
    out: Sink,
    state: Mutex<State>,
    fields: Vec<Field>,
    clock: Clock,
    exit_hook: ExitHook,
    metrics: Arc<LoggerMetrics>,
    diagnostics: Sink,
}

impl SyncLogger {
    /// Logger at [`Level::Info`] writing to `writer`, stamped by the system
    /// clock, whose `fatal` exits the process.
    #[must_use]
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::builder().writer(writer).build()
    }

    /// Create a builder for SyncLogger
    ///
    /// # Example
    /// ```
    /// use kv_logger::prelude::*;
    ///
    /// let logger = SyncLogger::builder()
    ///     .sink(Sink::stderr())
    ///     .level(Level::Debug)
    ///     .field("service", "billing")
    ///     .build();
    /// assert_eq!(logger.level(), Level::Debug);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn set_level(&self, level: Level) {
        self.state.lock().level = level;
    }

    pub fn level(&self) -> Level {
        self.state.lock().level
    }

    pub fn out(&self) -> Sink {
        self.out.clone()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> std::io::Result<()> {
        self.out.flush()
    }

    /// A new logger with `key="value"` appended to this logger's fields.
    ///
    /// The field list is copied, never appended in place, so siblings derived
    /// from the same parent cannot observe each other's fields.
    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<String>) -> SyncLogger {
        let level = self.level();

        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        fields.extend_from_slice(&self.fields);
        fields.push(Field::new(key, value));

        SyncLogger {
            out: self.out.clone(),
            state: Mutex::new(State::new(level)),
            fields,
            clock: self.clock.clone(),
            exit_hook: self.exit_hook.clone(),
            metrics: Arc::clone(&self.metrics),
            diagnostics: self.diagnostics.clone(),
        }
    }

    /// Shorthand for `with_field("err", err.to_string())`.
    #[must_use]
    pub fn with_err<E: fmt::Display + ?Sized>(&self, err: &E) -> SyncLogger {
        self.with_field("err", err.to_string())
    }

    /// Log at `level` with an explicit call site.
    ///
    /// Used by bridges that already know where a record came from. A missing
    /// call site renders as `file=???:0`.
    pub fn log_at(&self, level: Level, args: fmt::Arguments<'_>, site: Option<CallSite<'_>>) {
        if !self.level().enables(level) {
            return;
        }
        self.write(level, args, site.unwrap_or(CallSite::UNKNOWN));
    }

    #[track_caller]
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.level().enables(level) {
            return;
        }
        self.write(level, args, CallSite::caller());
    }

    fn write(&self, level: Level, args: fmt::Arguments<'_>, site: CallSite<'_>) {
        // Rendered before locking: a Display impl may log through this logger.
        let msg: Cow<'_, str> = match args.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(fmt::format(args)),
        };
        let now = self.clock.now();
        let file = basename(site.file);

        let mut state = self.state.lock();
        let buf = &mut state.buf;
        buf.clear();

        buf.extend_from_slice(b"time=\"");
        // Writing into a Vec cannot fail.
        let _ = write!(buf, "{}", now);
        buf.push(b'"');

        buf.push(DELIMITER);
        buf.extend_from_slice(b"lvl=");
        buf.extend_from_slice(level.as_str().as_bytes());

        buf.push(DELIMITER);
        buf.extend_from_slice(b"msg=\"");
        buf.extend_from_slice(msg.as_bytes());
        buf.push(b'"');

        for field in &self.fields {
            buf.push(DELIMITER);
            buf.extend_from_slice(field.key.as_bytes());
            buf.extend_from_slice(b"=\"");
            buf.extend_from_slice(field.value.as_bytes());
            buf.push(b'"');
        }

        buf.push(DELIMITER);
        buf.extend_from_slice(b"file=");
        buf.extend_from_slice(file.as_bytes());
        buf.push(b':');
        push_decimal(buf, site.line);
        buf.push(b'\n');

        match self.out.write_line(buf) {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(e) => {
                let failures = self.metrics.record_write_failure();
                self.report(format_args!(
                    "Failed to write log line ({} failures so far): {}",
                    failures + 1,
                    e
                ));
            }
        }
    }

    /// Best-effort note on the diagnostics channel. Its own failure is ignored.
    pub(crate) fn report(&self, args: fmt::Arguments<'_>) {
        let line = format!("[LOGGER ERROR] {}\n", args);
        let _ = self.diagnostics.write_line(line.as_bytes());
    }

    #[track_caller]
    fn log_fatal(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Fatal, args, CallSite::caller());
        if let Err(e) = self.out.flush() {
            self.report(format_args!("Failed to flush before exit: {}", e));
        }
        self.exit_hook.exit(FATAL_EXIT_CODE);
    }
}

impl PrintLogger for SyncLogger {
    #[track_caller]
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    #[track_caller]
    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    #[track_caller]
    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    #[track_caller]
    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log_fatal(args);
    }
}

impl Logger for SyncLogger {
    fn set_level(&self, level: Level) {
        SyncLogger::set_level(self, level);
    }

    fn level(&self) -> Level {
        SyncLogger::level(self)
    }

    fn out(&self) -> Sink {
        SyncLogger::out(self)
    }

    fn fields(&self) -> &[Field] {
        SyncLogger::fields(self)
    }

    fn with_err(&self, err: &dyn std::error::Error) -> Box<dyn PrintLogger + Send + Sync> {
        Box::new(SyncLogger::with_err(self, err))
    }

    fn with_field(&self, key: &str, value: &str) -> Box<dyn Logger> {
        Box::new(SyncLogger::with_field(self, key, value))
    }
}

impl fmt::Debug for SyncLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncLogger")
            .field("level", &self.level())
            .field("fields", &self.fields)
            .field("out", &self.out)
            .finish_non_exhaustive()
    }
}

/// Everything after the last path separator.
fn basename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Append `n` as unpadded decimal ASCII.
fn push_decimal(buf: &mut Vec<u8>, mut n: u32) {
    let mut digits = [0u8; 10];
    let mut pos = digits.len();
    loop {
        pos -= 1;
        digits[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    buf.extend_from_slice(&digits[pos..]);
}

/// Builder for constructing SyncLogger with a fluent API
///
/// Defaults: stderr sink, [`Level::Info`], no fields, local system clock,
/// an exit hook that terminates the process, and stderr for diagnostics.
pub struct LoggerBuilder {
    sink: Option<Sink>,
    diagnostics: Option<Sink>,
    level: Level,
    fields: Vec<Field>,
    clock: Clock,
    exit_hook: ExitHook,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            sink: None,
            diagnostics: None,
            level: Level::Info,
            fields: Vec::new(),
            clock: Clock::system(),
            exit_hook: ExitHook::process_exit(),
        }
    }

    /// Write to an existing, possibly shared, sink
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Write to a fresh sink wrapping `writer`
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.sink = Some(Sink::new(writer));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Append a field; fields keep the order they are added in
    #[must_use = "builder methods return a new value"]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field::new(key, value));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Replace the time source
    ///
    /// # Example
    ///
    /// ```
    /// use kv_logger::prelude::*;
    /// use chrono::TimeZone;
    ///
    /// let at = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    /// let out = MemorySink::new();
    /// let logger = SyncLogger::builder()
    ///     .writer(out.clone())
    ///     .clock(Clock::fixed(at))
    ///     .build();
    ///
    /// kv_logger::info!(logger, "tick");
    /// assert!(out.contents().starts_with("time=\"2024-01-02 03:04:05 +00:00\" lvl=info msg=\"tick\""));
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replace what `fatal` does after writing its line
    #[must_use = "builder methods return a new value"]
    pub fn exit_hook(mut self, hook: ExitHook) -> Self {
        self.exit_hook = hook;
        self
    }

    /// Where sink failures are reported
    ///
    /// Reporting is best-effort: if this channel fails too, the failure is
    /// dropped and the log call still returns normally.
    #[must_use = "builder methods return a new value"]
    pub fn diagnostics(mut self, sink: Sink) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    pub fn build(self) -> SyncLogger {
        SyncLogger {
            out: self.sink.unwrap_or_else(Sink::stderr),
            state: Mutex::new(State::new(self.level)),
            fields: self.fields,
            clock: self.clock,
            exit_hook: self.exit_hook,
            metrics: Arc::new(LoggerMetrics::new()),
            diagnostics: self.diagnostics.unwrap_or_else(Sink::stderr),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use chrono::{DateTime, TimeZone, Utc};
    use std::io;
    use std::sync::atomic::{AtomicI32, Ordering};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .expect("valid datetime")
    }

    fn test_logger(level: Level) -> (SyncLogger, MemorySink) {
        let out = MemorySink::new();
        let logger = SyncLogger::builder()
            .writer(out.clone())
            .level(level)
            .clock(Clock::fixed(fixed_time()))
            .exit_hook(ExitHook::new(|_| {}))
            .build();
        (logger, out)
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_exact_line_format() {
        let (logger, out) = test_logger(Level::Info);

        let line = line!() + 1;
        logger.info(format_args!("hello {}", "world"));

        assert_eq!(
            out.contents(),
            format!(
                "time=\"2024-01-02 03:04:05 +00:00\" lvl=info msg=\"hello world\" file=logger.rs:{}\n",
                line
            )
        );
    }

    #[test]
    fn test_level_gate_writes_nothing() {
        let (logger, out) = test_logger(Level::Error);

        logger.debug(format_args!("d"));
        logger.info(format_args!("i"));
        assert!(out.is_empty());
        assert_eq!(logger.metrics().lines_written(), 0);

        logger.error(format_args!("e"));
        assert_eq!(out.lines().len(), 1);
    }

    #[test]
    fn test_set_level_changes_gate() {
        let (logger, out) = test_logger(Level::Info);

        logger.debug(format_args!("hidden"));
        logger.set_level(Level::Debug);
        assert_eq!(logger.level(), Level::Debug);
        logger.debug(format_args!("shown"));

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("lvl=debug msg=\"shown\""));
    }

    #[test]
    fn test_fatal_ignores_level_and_exits() {
        let code = Arc::new(AtomicI32::new(-1));
        let code_clone = Arc::clone(&code);
        let out = MemorySink::new();
        let logger = SyncLogger::builder()
            .writer(out.clone())
            .level(Level::Fatal)
            .clock(Clock::fixed(fixed_time()))
            .exit_hook(ExitHook::new(move |c| code_clone.store(c, Ordering::SeqCst)))
            .build();

        logger.error(format_args!("suppressed"));
        assert_eq!(code.load(Ordering::SeqCst), -1);

        logger.fatal(format_args!("giving up: {}", 7));

        assert_eq!(code.load(Ordering::SeqCst), FATAL_EXIT_CODE);
        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" lvl=fatal msg=\"giving up: 7\" file=logger.rs:"));
    }

    #[test]
    fn test_fields_follow_message_in_order() {
        let (logger, out) = test_logger(Level::Info);
        let child = logger.with_field("a", "1").with_field("b", "2");

        child.info(format_args!("m"));

        let line = out.contents();
        assert!(line.contains("msg=\"m\" a=\"1\" b=\"2\" file=logger.rs:"));
        assert_eq!(child.fields(), &[Field::new("a", "1"), Field::new("b", "2")]);
    }

    #[test]
    fn test_derivation_leaves_parent_untouched() {
        let (logger, out) = test_logger(Level::Info);
        let parent = logger.with_field("base", "x");

        let left = parent.with_field("side", "left");
        let right = parent.with_field("side", "right");

        parent.info(format_args!("p"));
        left.info(format_args!("l"));
        right.info(format_args!("r"));

        let lines = out.lines();
        assert!(lines[0].contains("msg=\"p\" base=\"x\" file="));
        assert!(lines[1].contains("msg=\"l\" base=\"x\" side=\"left\" file="));
        assert!(lines[2].contains("msg=\"r\" base=\"x\" side=\"right\" file="));
        assert_eq!(parent.fields().len(), 1);
    }

    #[test]
    fn test_derived_level_is_a_snapshot() {
        let (logger, out) = test_logger(Level::Info);
        let child = logger.with_field("k", "v");

        logger.set_level(Level::Debug);
        assert_eq!(child.level(), Level::Info);
        child.debug(format_args!("child debug"));
        assert!(out.is_empty());

        child.set_level(Level::Error);
        assert_eq!(logger.level(), Level::Debug);
    }

    #[test]
    fn test_derived_logger_shares_sink_and_metrics() {
        let (logger, _out) = test_logger(Level::Info);
        let child = logger.with_field("k", "v");

        child.info(format_args!("one"));
        logger.info(format_args!("two"));

        assert!(child.out().same_as(&logger.out()));
        assert_eq!(logger.metrics().lines_written(), 2);
    }

    #[test]
    fn test_with_err_adds_err_field() {
        let (logger, out) = test_logger(Level::Info);
        let err = io::Error::new(io::ErrorKind::NotFound, "config missing");

        logger.with_err(&err).error(format_args!("startup failed"));

        assert!(out
            .contents()
            .contains("msg=\"startup failed\" err=\"config missing\" file=logger.rs:"));
    }

    #[test]
    fn test_nothing_is_escaped() {
        let (logger, out) = test_logger(Level::Info);

        logger
            .with_field("q", "a \"b\"")
            .info(format_args!("say \"{}\"", "hi there"));

        assert!(out
            .contents()
            .contains("msg=\"say \"hi there\"\" q=\"a \"b\"\" file="));
    }

    #[test]
    fn test_sink_failure_is_swallowed() {
        let logger = SyncLogger::builder()
            .writer(FailingWriter)
            .exit_hook(ExitHook::new(|_| {}))
            .build();

        logger.info(format_args!("lost"));
        logger.error(format_args!("lost too"));

        assert_eq!(logger.metrics().write_failures(), 2);
        assert_eq!(logger.metrics().lines_written(), 0);
    }

    #[test]
    fn test_failure_report_goes_to_diagnostics() {
        let diagnostics = MemorySink::new();
        let logger = SyncLogger::builder()
            .writer(FailingWriter)
            .diagnostics(Sink::new(diagnostics.clone()))
            .build();

        logger.with_field("k", "v").info(format_args!("lost"));

        let lines = diagnostics.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[LOGGER ERROR] Failed to write log line (1 failures so far): "));
        assert!(lines[0].contains("sink closed"));
    }

    #[test]
    fn test_broken_sink_and_diagnostics_never_fail_the_caller() {
        let code = Arc::new(AtomicI32::new(-1));
        let code_clone = Arc::clone(&code);
        let logger = SyncLogger::builder()
            .writer(FailingWriter)
            .diagnostics(Sink::new(FailingWriter))
            .exit_hook(ExitHook::new(move |c| code_clone.store(c, Ordering::SeqCst)))
            .build();

        logger.info(format_args!("one"));
        logger.error(format_args!("two"));
        logger.fatal(format_args!("three"));

        assert_eq!(code.load(Ordering::SeqCst), FATAL_EXIT_CODE);
        assert_eq!(logger.metrics().write_failures(), 3);
    }

    #[test]
    fn test_log_at_without_call_site() {
        let (logger, out) = test_logger(Level::Info);

        logger.log_at(Level::Info, format_args!("bridged"), None);
        logger.log_at(
            Level::Error,
            format_args!("with site"),
            Some(CallSite { file: "src/net/conn.rs", line: 88 }),
        );
        logger.log_at(Level::Debug, format_args!("gated"), None);

        let lines = out.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("msg=\"bridged\" file=???:0"));
        assert!(lines[1].ends_with("msg=\"with site\" file=conn.rs:88"));
    }

    #[test]
    fn test_call_site_capture_through_trait_object() {
        let (logger, out) = test_logger(Level::Info);
        let dynamic: Box<dyn Logger> = Logger::with_field(&logger, "k", "v");

        let line = line!() + 1;
        dynamic.info(format_args!("dyn"));

        assert!(out
            .contents()
            .ends_with(&format!("k=\"v\" file=logger.rs:{}\n", line)));
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("src/core/logger.rs"), "logger.rs");
        assert_eq!(basename("C:\\work\\main.rs"), "main.rs");
        assert_eq!(basename("main.rs"), "main.rs");
        assert_eq!(basename("???"), "???");
    }

    #[test]
    fn test_push_decimal() {
        let mut buf = Vec::new();
        push_decimal(&mut buf, 0);
        buf.push(b' ');
        push_decimal(&mut buf, 1234);
        buf.push(b' ');
        push_decimal(&mut buf, u32::MAX);
        assert_eq!(buf, b"0 1234 4294967295");
    }

    #[test]
    fn test_builder_defaults() {
        let logger = LoggerBuilder::default().build();
        assert_eq!(logger.level(), Level::Info);
        assert!(logger.fields().is_empty());
    }

    #[test]
    fn test_builder_fields() {
        let logger = SyncLogger::builder()
            .writer(MemorySink::new())
            .field("service", "api")
            .fields([("region", "eu"), ("zone", "b")])
            .build();

        let keys: Vec<_> = logger.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["service", "region", "zone"]);
    }
}

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat};
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

// --- Formatter ---

/// `<local time> <LEVEL> <target> <fields>`, one event per line.
struct StderrFormat;

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

fn paint(
    writer: &mut Writer<'_>,
    color: &str,
    text: impl std::fmt::Display,
) -> std::fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "{color}{text}\x1b[0m ")
    } else {
        write!(writer, "{text} ")
    }
}

impl<S, N> FormatEvent<S, N> for StderrFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let now = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);

        paint(&mut writer, "\x1b[2m", now)?;
        paint(&mut writer, level_color(meta.level()), format_args!("{:>5}", meta.level()))?;
        paint(&mut writer, "\x1b[36m", meta.target())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

type SharedFile = Arc<Mutex<Option<File>>>;

/// Log file target that can be attached after the subscriber is installed.
/// Output is dropped until then.
#[derive(Clone, Default)]
struct LateFile(SharedFile);

impl LateFile {
    fn slot(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn attach(
        &self,
        file: File,
    ) {
        *self.slot() = Some(file);
    }
}

struct LateFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LateFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.as_mut().map_or(Ok(buf.len()), |file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), |file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for LateFile {
    type Writer = LateFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LateFileWriter(self.slot())
    }
}

// --- Runtime controls ---

type ReloadFilter = Box<dyn Fn(EnvFilter) -> Result<(), reload::Error> + Send + Sync>;

struct LogControl {
    reload_filter: ReloadFilter,
    file: LateFile,
}

static CONTROL: OnceLock<LogControl> = OnceLock::new();

fn control() -> Result<&'static LogControl> {
    CONTROL.get().context("logging not yet initialized")
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

// --- Public API ---

/// Changes the active log filter at runtime.
/// Accepts a bare level ("error", "warn", "info", "debug", "trace")
/// or any full EnvFilter directive.
pub fn set_log_level(level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?;
    (control()?.reload_filter)(filter).context("filter reload failed")
}

/// Starts writing log output to `path` in addition to stderr, replacing any
/// file already attached. The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;
    control()?.file.attach(file);
    Ok(())
}

/// Initializes logging. Call once at startup.
///
/// - Stderr: colored when attached to a terminal, plain when piped.
///   Stdout is left to calculator output.
/// - File: inactive until `enable_file_logging()` is called.
/// - Level: INFO by default, or overridden by the RUST_LOG env var.
pub fn init_default_logging() {
    let file = LateFile::default();

    // One filter in front of both layers.
    let (level_filter, level_handle) = reload::Layer::new(default_filter());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(StderrFormat)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(StderrFormat)
        .with_ansi(false)
        .with_writer(file.clone());

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = CONTROL.set(LogControl {
            reload_filter: Box::new(move |filter| level_handle.reload(filter)),
            file,
        });
    }
}

/// Logs a background task failure with context.
pub fn log_task_error(
    task_name: &'static str,
    result: Result<()>,
) {
    if let Err(error) = result {
        error!(task = task_name, ?error, "background task failed");
    }
}

use anyhow::Result;
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

/// Filter used when neither `RUST_LOG` nor a configured level applies.
pub const DEFAULT_LEVEL: &str = "info";

// --- Formatter ---

/// `<local timestamp> <LEVEL> <crate>::<file>:<line> <fields>`
struct FarmFormat;

impl<S, N> FormatEvent<S, N> for FarmFormat
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
        let ansi = writer.has_ansi_escapes();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

        if ansi {
            write!(writer, "\x1b[2m{timestamp}\x1b[0m ")?;
        } else {
            write!(writer, "{timestamp} ")?;
        }

        let colour = match *meta.level() {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[1;32m",
            Level::DEBUG => "\x1b[1;34m",
            Level::TRACE => "\x1b[1;35m",
        };
        if ansi {
            write!(writer, "{colour}{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{:>5} ", meta.level())?;
        }

        // Workspace crates are told apart by the first target segment.
        let krate = meta.target().split("::").next().unwrap_or_default();
        let file = meta.file().map(|f| {
            f.rsplit_once("src/")
                .or_else(|| f.rsplit_once("src\\"))
                .map_or(f, |(_, rest)| rest)
        });
        if let (Some(file), Some(line)) = (file, meta.line()) {
            if ansi {
                write!(writer, "\x1b[36m{krate}::{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{krate}::{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file sink ---

type Sink = Arc<Mutex<Option<File>>>;

/// Writer that forwards to the log file once one is opened and drops
/// records until then.
#[derive(Clone)]
struct FileSink(Sink);

struct SinkGuard<'a>(MutexGuard<'a, Option<File>>);

impl Write for SinkGuard<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = SinkGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkGuard(lock(&self.0))
    }
}

fn lock(sink: &Sink) -> MutexGuard<'_, Option<File>> {
    sink.lock().unwrap_or_else(PoisonError::into_inner)
}

// --- Reload handles ---

type SetFilterFn = Box<dyn Fn(EnvFilter) -> Result<()> + Send + Sync>;

static LEVEL: OnceLock<SetFilterFn> = OnceLock::new();
static CONSOLE_GATE: OnceLock<SetFilterFn> = OnceLock::new();
static FILE_SINK: OnceLock<Sink> = OnceLock::new();

fn store_handle<S>(
    slot: &OnceLock<SetFilterFn>,
    handle: reload::Handle<EnvFilter, S>,
    what: &'static str,
) where
    S: Subscriber + Send + Sync + 'static,
{
    let _ = slot.set(Box::new(move |filter: EnvFilter| {
        handle
            .reload(filter)
            .map_err(|e| anyhow::anyhow!("{what} reload failed: {e}"))
    }));
}

fn initial_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

// --- Public API ---

/// Installs the global subscriber. Call once, before anything logs.
///
/// - Console: stderr, so log lines never interleave with the wizard's
///   output on stdout. Coloured when stderr is a terminal.
/// - File: discards until [`enable_file_logging`] is called.
/// - Level: `RUST_LOG` if set, else [`DEFAULT_LEVEL`]; adjustable later with
///   [`set_log_level`].
///
/// A second call is a no-op.
pub fn init_logging() {
    let sink: Sink = Arc::new(Mutex::new(None));
    let _ = FILE_SINK.set(sink.clone());

    // The console gate only opens or closes; the level filter is the ceiling.
    let (console_gate, console_handle) = reload::Layer::new(EnvFilter::new("trace"));
    let (level_filter, level_handle) = reload::Layer::new(initial_filter());

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(FarmFormat)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(console_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(FarmFormat)
        .with_ansi(false)
        .with_writer(FileSink(sink));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        store_handle(&LEVEL, level_handle, "level filter");
        store_handle(&CONSOLE_GATE, console_handle, "console gate");
    }
}

/// Replaces the active filter. Accepts a bare level (`"debug"`) or any
/// `EnvFilter` directive (`"farm_core=trace,info"`).
pub fn set_log_level(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| anyhow::anyhow!("invalid log level '{directive}': {e}"))?;
    match LEVEL.get() {
        Some(apply) => apply(filter),
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Shows or hides console log output. File logging is unaffected.
pub fn set_console_enabled(enabled: bool) -> Result<()> {
    let filter = EnvFilter::new(if enabled { "trace" } else { "off" });
    match CONSOLE_GATE.get() {
        Some(apply) => apply(filter),
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Appends log records to `path`, replacing any file already open. The
/// parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;

    match FILE_SINK.get() {
        Some(sink) => {
            *lock(sink) = Some(file);
            Ok(())
        }
        None => anyhow::bail!("logging not yet initialized"),
    }
}

pub fn disable_file_logging() {
    if let Some(sink) = FILE_SINK.get() {
        *lock(sink) = None;
    }
}

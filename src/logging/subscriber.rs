//! Tracing subscriber setup.
//!
//! Every event is classified once into a [`Line`], then drawn twice: with
//! colour on stderr, and as plain timestamped text in the log file.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::paths::log_file_path;
use super::types::StepStatus;

/// Target of stage-header events.
pub const STAGE_TARGET: &str = "printer_migrate::stage";
/// Target of dry-run action events.
pub const DRY_RUN_TARGET: &str = "printer_migrate::dry_run";
/// Target of run-summary events; they carry a `status` field.
pub const STEP_TARGET: &str = "printer_migrate::step";

/// Shape of one output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Stage,
    DryRun,
    Step(StepStatus),
    Error,
    Warn,
    Info,
    Debug,
}

impl Line {
    fn classify(event: &tracing::Event<'_>) -> (Self, String) {
        let mut fields = EventFields::default();
        event.record(&mut fields);
        let meta = event.metadata();

        let line = match (*meta.level(), meta.target(), fields.status) {
            (Level::ERROR, ..) => Self::Error,
            (Level::WARN, ..) => Self::Warn,
            (Level::INFO, STEP_TARGET, Some(status)) => Self::Step(status),
            (Level::INFO, STAGE_TARGET, _) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET, _) => Self::DryRun,
            (Level::INFO, ..) => Self::Info,
            _ => Self::Debug,
        };
        (line, fields.message)
    }

    fn coloured(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::DryRun => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Self::Step(status) => {
                let colour = match status {
                    StepStatus::Ok => "32",
                    StepStatus::Skipped => "33",
                    StepStatus::DryRun => "37",
                    StepStatus::Failed => "31",
                };
                format!("  \x1b[{colour}m{} {msg}\x1b[0m", status.icon())
            }
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }

    fn plain(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("==> {msg}"),
            Self::DryRun => format!("    [dry run] {msg}"),
            Self::Step(status) => format!("    {} {msg}", status.icon()),
            Self::Error => format!("    [error] {msg}"),
            Self::Warn => format!("    [warn] {msg}"),
            Self::Info => format!("    {msg}"),
            Self::Debug => format!("    [debug] {msg}"),
        }
    }
}

/// The `message` and optional `status` fields of an event.
#[derive(Default)]
struct EventFields {
    message: String,
    status: Option<StepStatus>,
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "status" => self.status = StepStatus::from_label(value),
            _ => {}
        }
    }
}

/// Appends every event to a log file, one timestamped line each.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Log file for `command` in the cache directory; `None` if unavailable.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::at(&log_file_path(command)?)
    }

    /// Truncate `path`, write a run header, and keep it open for appending.
    pub(super) fn at(path: &Path) -> Option<Self> {
        let version = option_env!("PRINTER_MIGRATE_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let started = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        fs::write(path, format!("# printer-migrate {version}, started {started}\n")).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let (line, msg) = Line::classify(event);
        let ts = chrono::Utc::now().format("%H:%M:%S");
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "[{ts}] {}", line.plain(&msg)).ok();
        }
    }
}

/// Console formatter: coloured stage headers, level prefixes, step markers.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let (line, msg) = Line::classify(event);
        writeln!(writer, "{}", line.coloured(&msg))
    }
}

/// Install the global subscriber: console on stderr (stdout is reserved for
/// `scan` output) and, when a cache directory is available, a `DEBUG` log
/// file at `$XDG_CACHE_HOME/printer-migrate/<command>.log`.
///
/// Call once at startup.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(std::io::stderr)
        .with_filter(if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        });

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

//! `tracing` subscriber: console formatting plus the persistent log file.
//!
//! The builder opens a `pair` span (`platform`, `brand`) around each pair;
//! the file layer prefixes every line emitted inside it with `[platform/brand]`
//! so interleaved warnings stay attributable after the console has scrolled.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use super::logger::{DRY_RUN_TARGET, STAGE_TARGET};
use super::utils::{log_file_path, strip_ansi, timestamp};

/// Collects the `message` field and the pair fields of an event or span.
#[derive(Default)]
struct FieldCollector {
    message: String,
    platform: Option<String>,
    brand: Option<String>,
}

impl FieldCollector {
    fn pair(&self) -> Option<PairLabel> {
        Some(PairLabel(format!(
            "{}/{}",
            self.platform.as_deref()?,
            self.brand.as_deref()?
        )))
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => value.clone_into(&mut self.message),
            "platform" => self.platform = Some(value.to_string()),
            "brand" => self.brand = Some(value.to_string()),
            _ => {}
        }
    }
}

/// `platform/brand` stored in the extensions of a `pair` span.
#[derive(Debug, Clone)]
struct PairLabel(String);

/// Appends every event to the log file, ANSI stripped and timestamped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command` and write the run header.
    ///
    /// Returns `None` when the cache directory or the file is unavailable;
    /// logging then continues on the console only.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version =
            option_env!("TOKENS_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "-".repeat(48);
        let header = format!(
            "{rule}\ntokens {version} {command} {}\n{rule}\n",
            timestamp("%Y-%m-%d %H:%M:%S")
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S> tracing_subscriber::Layer<S> for FileLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut fields = FieldCollector::default();
        attrs.record(&mut fields);
        if let Some(label) = fields.pair()
            && let Some(span) = ctx.span(id)
        {
            span.extensions_mut().insert(label);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let msg = strip_ansi(&fields.message);

        let pair = ctx
            .event_scope(event)
            .and_then(|scope| {
                scope
                    .from_root()
                    .find_map(|span| span.extensions().get::<PairLabel>().cloned())
            })
            .map_or_else(String::new, |PairLabel(label)| format!("[{label}] "));

        let metadata = event.metadata();
        let tag = match (*metadata.level(), metadata.target()) {
            (Level::INFO, STAGE_TARGET) => "==> ",
            (Level::INFO, DRY_RUN_TARGET) => "    [dry run] ",
            (Level::ERROR, _) => "    [error] ",
            (Level::WARN, _) => "    [warn] ",
            (Level::DEBUG | Level::TRACE, _) => "    [debug] ",
            _ => "    ",
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "[{}] {tag}{pair}{msg}", timestamp("%H:%M:%S")).ok();
        }
    }
}

/// Console output: `==>` stage headers, coloured warnings and errors, dim
/// debug lines. Pair context is already part of the console messages.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let msg = &fields.message;
        let metadata = event.metadata();

        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            (Level::WARN, _) => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            (Level::INFO, STAGE_TARGET) => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            (Level::INFO, DRY_RUN_TARGET) => {
                writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}")
            }
            (Level::INFO, _) => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global subscriber: console at `INFO` (`DEBUG` when
/// `verbose`), warnings and errors on stderr, and the file layer at `DEBUG`.
///
/// Call once, before anything logs.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

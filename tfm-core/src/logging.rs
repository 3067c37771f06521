//! ``src/logging.rs``
//! ============================================================================
//! # `Logger`: tracing setup
//!
//! Installs the global subscriber: an `EnvFilter` plus a daily rolling,
//! non-blocking file writer with a compact `[SEQ] LEVEL [file:line module]`
//! line format. The terminal is left alone while the TUI owns it.

use std::{
    fs,
    path::Path,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::Metadata;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, daily},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::error::AppError;

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`, before the terminal is taken over.
    ///
    /// Everything goes to a daily rolling file under `log_dir`; nothing is
    /// written to stderr while the TUI owns the screen. The returned guard
    /// must live until exit so buffered lines get flushed.
    pub fn init_tracing(log_dir: &Path, default_level: &str) -> Result<WorkerGuard, AppError> {
        fs::create_dir_all(log_dir)?;

        SEQ.get_or_init(|| AtomicUsize::new(1));

        // daily rolling file appender → <log_dir>/tfm.YYYY-MM-DD
        let file: RollingFileAppender = daily(log_dir, "tfm");
        let (writer, guard): (NonBlocking, WorkerGuard) = tracing_appender::non_blocking(file);

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let file_layer = fmt::layer()
            .event_format(SeqFileMod) // our compact formatter
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .map_err(|e| AppError::Other(format!("tracing already initialised: {e}")))?;

        Ok(guard)
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically‑increasing sequence number
        let seq: usize = SEQ
            .get()
            .map_or(0, |seq| seq.fetch_add(1, Ordering::Relaxed));

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {} {:5} [{}:{} {}] ",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        // write all key‑value pairs for this event (usually just the message)
        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}

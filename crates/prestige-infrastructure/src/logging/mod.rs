//! Logging setup.
//!
//! - one-line JSON records in a daily-rolling file
//! - human-readable records on stderr in debug builds, so command output on
//!   stdout stays machine-readable
//!
//! Library code logs through the `log` macros; `LogTracer` forwards them into
//! the `tracing` subscriber installed here.

use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{Event, Level, Subscriber};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::config::LogLevel;

const LOG_FILE_PREFIX: &str = "prestige.log";

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber. Calling it again is a no-op.
pub fn init_logger(log_dir: &Path, level: LogLevel) -> anyhow::Result<()> {
    if LOG_DIR.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(log_dir)?;

    let _ = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init();

    let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = FILE_GUARD.set(guard);

    let json_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(JsonFormatter::new())
        .with_filter(build_filter(level));

    let stderr_layer = if cfg!(debug_assertions) {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .event_format(HumanReadableFormatter)
                .with_filter(build_filter(level)),
        )
    } else {
        None
    };

    let subscriber = Registry::default().with(json_layer).with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    let _ = LOG_DIR.set(log_dir.to_path_buf());

    tracing::info!(
        target: "prestige::logging",
        log_dir = %log_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        profile = if cfg!(debug_assertions) { "debug" } else { "release" },
        "Logger initialized"
    );

    Ok(())
}

/// Directory the file layer writes to, once initialized
pub fn get_log_dir() -> Option<PathBuf> {
    LOG_DIR.get().cloned()
}

/// `RUST_LOG` wins; otherwise the configured level, with our own crates
/// one notch louder in debug builds.
fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level, cfg!(debug_assertions))))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn default_directives(level: LogLevel, debug_build: bool) -> String {
    if debug_build && matches!(level, LogLevel::Error | LogLevel::Warn | LogLevel::Info) {
        format!("{},prestige=debug", level.as_str())
    } else {
        level.as_str().to_string()
    }
}

// ============================================================
// Formatters
// ============================================================

/// One JSON object per line
struct JsonFormatter {
    pid: u32,
}

impl JsonFormatter {
    fn new() -> Self {
        Self {
            pid: std::process::id(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let record = visitor.into_record(
            chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
                .to_string(),
            *metadata.level(),
            metadata.target(),
            self.pid,
        );

        writeln!(
            writer,
            "{}",
            serde_json::to_string(&record).unwrap_or_default()
        )
    }
}

/// `2025-01-05 10:32:15.123 [INFO] (prestige::auth) message key=value`
struct HumanReadableFormatter;

impl<S, N> FormatEvent<S, N> for HumanReadableFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();

        let level = match *metadata.level() {
            Level::ERROR => "\x1b[31mERROR\x1b[0m",
            Level::WARN => "\x1b[33mWARN\x1b[0m",
            Level::INFO => "\x1b[32mINFO\x1b[0m",
            Level::DEBUG => "\x1b[36mDEBUG\x1b[0m",
            Level::TRACE => "\x1b[35mTRACE\x1b[0m",
        };

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let message = visitor
            .fields
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let extras: Vec<String> = visitor
            .fields
            .iter()
            .filter(|(key, _)| key.as_str() != "message" && !key.starts_with("log."))
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();

        let extras = if extras.is_empty() {
            String::new()
        } else {
            format!(" {}", extras.join(" "))
        };

        writeln!(
            writer,
            "{} [{}] ({}) {}{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            visitor.target_or(metadata.target()),
            message,
            extras
        )
    }
}

/// Collects event fields as JSON values
#[derive(Default)]
struct FieldVisitor {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl FieldVisitor {
    /// Records bridged from `log` carry their real target in `log.target`
    fn target_or(&self, fallback: &str) -> String {
        self.fields
            .get("log.target")
            .and_then(|v| v.as_str())
            .unwrap_or(fallback)
            .to_string()
    }

    fn into_record(
        self,
        timestamp: String,
        level: Level,
        target: &str,
        pid: u32,
    ) -> serde_json::Value {
        let target = self.target_or(target);

        let mut record = serde_json::json!({
            "timestamp": timestamp,
            "level": level.to_string(),
            "pid": pid,
            "target": target,
        });

        let mut extra = serde_json::Map::new();
        for (key, value) in self.fields {
            match key.as_str() {
                "message" => record["message"] = value,
                "log.file" => record["file"] = value,
                "log.line" => record["line"] = value,
                "log.target" | "log.module_path" => {}
                _ => {
                    extra.insert(key, value);
                }
            }
        }

        if !extra.is_empty() {
            record["fields"] = serde_json::Value::Object(extra);
        }

        record
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}

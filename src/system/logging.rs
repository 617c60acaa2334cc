//! Logging system initialization
//!
//! Console output always; when `logging.log_to_file` is set, every event is
//! also written as one JSON line to a daily-rotated file through a
//! non-blocking writer, so slow or failing disk I/O never stalls a request.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;
use crate::errors::{Result, SnaplinkError};

/// Keeps the non-blocking writers alive
///
/// Dropping it flushes whatever is still buffered; hold it until exit.
#[must_use]
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the filter from `RUST_LOG` when present, otherwise from config
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.clone()))
}

/// Create the daily rolling appender for `config.dir`
pub fn build_file_appender(config: &LoggingConfig) -> Result<rolling::RollingFileAppender> {
    std::fs::create_dir_all(&config.dir)?;

    rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix(config.file_prefix.trim_end_matches(".log"))
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1))
        .build(&config.dir)
        .map_err(|e| SnaplinkError::file_operation(format!("log appender: {}", e)))
}

/// Assemble the layers without installing them
///
/// Split out so tests can drive a subscriber scoped to one thread.
pub fn build_layers(config: &LoggingConfig) -> Result<(Vec<BoxedLayer>, LoggingGuards)> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guards = Vec::new();

    let (console_writer, console_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(console_guard);

    let console = tracing_subscriber::fmt::layer()
        .with_writer(console_writer)
        .with_level(true)
        .with_target(false);
    if config.format == "json" {
        layers.push(console.json().boxed());
    } else {
        layers.push(console.with_ansi(true).boxed());
    }

    if config.log_to_file {
        let (file_writer, file_guard) = tracing_appender::non_blocking(build_file_appender(config)?);
        guards.push(file_guard);

        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_current_span(true)
                .boxed(),
        );
    }

    Ok((layers, LoggingGuards { _guards: guards }))
}

/// Initialize logging system based on configuration
///
/// **Note**: call once during startup, after the configuration is loaded.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuards> {
    let (layers, guards) = build_layers(config)?;

    tracing_subscriber::registry()
        .with(layers)
        .with(build_filter(config))
        .try_init()
        .map_err(|e| SnaplinkError::internal(format!("logging already initialized: {}", e)))?;

    Ok(guards)
}

//! Structured logging setup for the `chromip` binary.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error>;

/// Output style for log lines on stderr and in the optional log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, BoxError> {
        if value.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(format!("invalid CHROMIP_LOG_FORMAT '{value}' (expected 'json' or 'pretty')").into())
        }
    }
}

/// Build the level filter; `off` disables logging entirely.
fn build_filter(level: &str) -> Result<EnvFilter, BoxError> {
    if level.eq_ignore_ascii_case("off") {
        Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()))
    } else {
        EnvFilter::try_new(level).map_err(|err| format!("invalid log filter: {err}").into())
    }
}

fn open_log_file(path: &str) -> Result<File, BoxError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("failed to open log file '{path}': {err}").into())
}

/// Install the global subscriber.
///
/// The level comes from `--log-level`, then `CHROMIP_TRACE`, and defaults to
/// `off`. `CHROMIP_LOG_FORMAT` selects `pretty` or `json`; `CHROMIP_LOG_FILE`
/// adds a second, uncolored sink. Returns false when a subscriber is
/// already installed.
pub fn init(level: Option<&str>) -> Result<bool, BoxError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level = level
        .map(str::to_string)
        .or_else(|| env::var("CHROMIP_TRACE").ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level)?;
    let format = LogFormat::parse(
        &env::var("CHROMIP_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
    )?;
    let log_file = env::var("CHROMIP_LOG_FILE").ok();
    let map_init_err = |err: tracing_subscriber::util::TryInitError| -> BoxError {
        format!("failed to initialize logging: {err}").into()
    };

    match format {
        LogFormat::Json => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .json();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(path) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(open_log_file(&path)?)
                    .with_ansi(false)
                    .json();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
        LogFormat::Pretty => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .pretty();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(path) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(open_log_file(&path)?)
                    .with_ansi(false)
                    .pretty();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
    }

    Ok(true)
}

//! Tracing subscriber bootstrap

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime, Uptime};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use us_shared::{LogFormat, LogOutput, LogTimestamp, LoggingConfig};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to open log file {}: {source}", .path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Init(#[from] TryInitError),
}

/// Installs the global subscriber; `RUST_LOG` takes precedence over `config.level`
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_ansi(matches!(config.output, LogOutput::Stdout | LogOutput::Stderr))
        .with_timer(Timer::from(config.timestamp))
        .with_writer(make_writer(&config.output)?);

    match config.format {
        LogFormat::Json => registry.with(fmt_layer.json().with_ansi(false)).try_init()?,
        LogFormat::Pretty => registry.with(fmt_layer.pretty()).try_init()?,
        LogFormat::Compact => registry.with(fmt_layer.compact()).try_init()?,
    }
    Ok(())
}

fn default_directives(level: &str) -> String {
    format!("{},actix_web=info,actix_server=warn", level)
}

fn make_writer(output: &LogOutput) -> Result<BoxMakeWriter, TelemetryError> {
    Ok(match output {
        LogOutput::Stdout => BoxMakeWriter::new(io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
        LogOutput::File(path) => BoxMakeWriter::new(Mutex::new(open_log_file(path)?)),
    })
}

fn open_log_file(path: &Path) -> Result<File, TelemetryError> {
    let open = || -> io::Result<File> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    };

    open().map_err(|source| TelemetryError::OpenLogFile {
        path: path.to_path_buf(),
        source,
    })
}

/// One timer type for every `LogTimestamp`, so the layer type stays fixed
enum Timer {
    System(SystemTime),
    Uptime(Uptime),
    Off,
}

impl From<LogTimestamp> for Timer {
    fn from(timestamp: LogTimestamp) -> Self {
        match timestamp {
            LogTimestamp::Rfc3339 => Timer::System(SystemTime),
            LogTimestamp::Uptime => Timer::Uptime(Uptime::default()),
            LogTimestamp::None => Timer::Off,
        }
    }
}

impl FormatTime for Timer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        match self {
            Timer::System(timer) => timer.format_time(w),
            Timer::Uptime(timer) => timer.format_time(w),
            Timer::Off => Ok(()),
        }
    }
}

use crate::config::TelemetryConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as fmt_layer, EnvFilter};

const LOG_FILE_PREFIX: &str = "wgai-gateway";
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    LogDir { path: PathBuf, source: std::io::Error },
    Appender { path: PathBuf, source: InitError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::LogDir { path, .. } => {
                write!(f, "unable to create log directory {}", path.display())
            }
            TelemetryError::Appender { path, .. } => {
                write!(f, "unable to open rolling log files in {}", path.display())
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::LogDir { source, .. } => Some(source),
            TelemetryError::Appender { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Keeps the background log writer alive; drop it only at shutdown.
#[must_use]
pub struct TelemetryGuard {
    _file_writer: Option<WorkerGuard>,
}

pub fn init(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let env_filter = build_filter(config)?;

    let console_layer = fmt_layer::layer()
        .with_target(false)
        .compact()
        .with_ansi(false);

    let (file_layer, file_writer) = match &config.log_dir {
        Some(dir) => {
            let appender = file_appender(dir, config.log_max_files)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt_layer::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| TelemetryError::Subscriber(Box::new(err)))?;

    Ok(TelemetryGuard {
        _file_writer: file_writer,
    })
}

/// Daily-rotated `wgai-gateway.<date>.log` files, keeping at most `max_files` of them.
fn file_appender(dir: &Path, max_files: usize) -> Result<RollingFileAppender, TelemetryError> {
    std::fs::create_dir_all(dir).map_err(|source| TelemetryError::LogDir {
        path: dir.to_path_buf(),
        source,
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(max_files)
        .build(dir)
        .map_err(|source| TelemetryError::Appender {
            path: dir.to_path_buf(),
            source,
        })
}

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_log_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "gateway=loud".to_string(),
            log_dir: None,
            log_max_files: 5,
        };
        match build_filter(&config) {
            Err(TelemetryError::EnvFilter { value, .. }) => assert_eq!(value, "gateway=loud"),
            Err(other) => panic!("expected env filter error, got {other}"),
            Ok(_) => panic!("expected env filter error"),
        }
    }

    #[test]
    fn file_appender_creates_the_log_directory() {
        let dir = std::env::temp_dir().join(format!("wgai-gateway-logs-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let appender = file_appender(&dir.join("nested"), 2);

        assert!(appender.is_ok(), "appender should build");
        assert!(dir.join("nested").is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}

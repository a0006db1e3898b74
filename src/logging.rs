//! Logging bootstrap
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter`. `RUST_LOG`
//! takes precedence over the configured level. When a log directory is set a
//! daily rolling file layer is added through `tracing-appender`; keep the
//! returned guard alive for as long as logs should be flushed.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `adi_gateway=debug`.
    pub level: String,
    pub format: LogFormat,
    /// Directory for daily rolling JSON log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl LoggingConfig {
    pub fn development() -> Self {
        Self {
            level: "adi_gateway=debug,info".to_string(),
            format: LogFormat::Pretty,
            log_dir: None,
        }
    }

    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            log_dir: None,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber was already set.
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<Option<WorkerGuard>, tracing_subscriber::util::TryInitError> {
    let console = match config.format {
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
        LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
    };

    let (file, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "adi-gateway.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(config.filter())
        .with(console)
        .with(file)
        .try_init()?;

    Ok(guard)
}

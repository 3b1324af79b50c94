//! Telemetry and tracing utilities
//!
//! The library itself only emits `tracing` events. Binaries and demos call one
//! of the `init_*` functions here to install a subscriber.
//!
//! ## Example
//!
//! ```rust,ignore
//! use taskmaster_llm::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! let _guard = init_subscriber(config)?;
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::LlmError;

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "TASKMASTER_LOG_LEVEL";
/// Environment variable holding the output format
pub const LOG_FORMAT_ENV: &str = "TASKMASTER_LOG_FORMAT";
/// Environment variable holding a log file path
pub const LOG_FILE_ENV: &str = "TASKMASTER_LOG_FILE";

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON lines with thread metadata
    Json,
    /// JSON lines with event fields flattened to the top level
    JsonCompact,
}

impl std::str::FromStr for OutputFormat {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" => Ok(Self::JsonCompact),
            _ => Err(LlmError::ConfigurationError(format!(
                "Invalid log format: {s}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Configuration for tracing subscriber
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Write to stderr
    pub enable_console: bool,
    /// Also append to this file
    pub log_file: Option<PathBuf>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            enable_console: true,
            log_file: None,
        }
    }
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Create a debug configuration
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }
}

/// Builder for SubscriberConfig
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    enable_console: Option<bool>,
    log_file: Option<PathBuf>,
}

impl SubscriberConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string
    pub fn log_level_str(mut self, level: &str) -> Result<Self, LlmError> {
        let level = match level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => {
                return Err(LlmError::ConfigurationError(format!(
                    "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
                )));
            }
        };
        self.log_level = Some(level);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.enable_console = Some(enable);
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn build(self) -> SubscriberConfig {
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            enable_console: self.enable_console.unwrap_or(true),
            log_file: self.log_file,
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn format_layer<W>(format: OutputFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true);
    match format {
        OutputFormat::Text => layer.with_ansi(ansi).boxed(),
        OutputFormat::Json => layer
            .json()
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed(),
        OutputFormat::JsonCompact => layer.json().flatten_event(true).boxed(),
    }
}

fn level_filter(level: tracing::Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::new(format!("taskmaster_llm={level}"))
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), LlmError> {
    let file_name = path.file_name().ok_or_else(|| {
        LlmError::ConfigurationError(format!("Log file path has no file name: {}", path.display()))
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(file_name)))
}

/// Initialize tracing subscriber with the given configuration
///
/// Returns a [`WorkerGuard`] when file logging is enabled; keep it alive for
/// the lifetime of the program so buffered lines get flushed. Calling this
/// after a global subscriber is already installed is not an error.
pub fn init_subscriber(config: SubscriberConfig) -> Result<Option<WorkerGuard>, LlmError> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.enable_console {
        layers.push(format_layer(config.output_format, std::io::stderr, true));
    }

    if let Some(path) = &config.log_file {
        let (dir, file_name) = split_log_path(path)?;
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        layers.push(format_layer(config.output_format, writer, false));
        guard = Some(file_guard);
    }

    let init_result = tracing_subscriber::registry()
        .with(layers)
        .with(level_filter(config.log_level))
        .try_init();

    match init_result {
        Ok(()) => Ok(guard),
        Err(e) => {
            let error_msg = e.to_string();
            if error_msg.contains("global default trace dispatcher has already been set") {
                Ok(None)
            } else {
                Err(LlmError::ConfigurationError(format!(
                    "Failed to initialize tracing: {e}"
                )))
            }
        }
    }
}

/// Initialize tracing subscriber with default configuration
pub fn init_default() -> Result<Option<WorkerGuard>, LlmError> {
    init_subscriber(SubscriberConfig::default())
}

/// Initialize tracing subscriber for debugging
pub fn init_debug() -> Result<Option<WorkerGuard>, LlmError> {
    init_subscriber(SubscriberConfig::debug())
}

/// Build a [`SubscriberConfig`] from environment variables
///
/// - `TASKMASTER_LOG_LEVEL`: trace, debug, info, warn, error
/// - `TASKMASTER_LOG_FORMAT`: text, json, json-compact
/// - `TASKMASTER_LOG_FILE`: log file path
pub fn config_from_env() -> Result<SubscriberConfig, LlmError> {
    let mut builder = SubscriberConfig::builder();

    if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
        builder = builder.log_level_str(&level)?;
    }
    if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
        builder = builder.output_format(format.parse()?);
    }
    if let Ok(file_path) = std::env::var(LOG_FILE_ENV) {
        builder = builder.log_file(file_path);
    }

    Ok(builder.build())
}

/// Initialize tracing subscriber from environment variables
pub fn init_from_env() -> Result<Option<WorkerGuard>, LlmError> {
    init_subscriber(config_from_env()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = SubscriberConfig::builder().build();
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.enable_console);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn log_level_from_string() {
        let config = SubscriberConfig::builder()
            .log_level_str("WARN")
            .unwrap()
            .build();
        assert_eq!(config.log_level, tracing::Level::WARN);

        let err = SubscriberConfig::builder().log_level_str("loud").unwrap_err();
        assert!(matches!(err, LlmError::ConfigurationError(_)));
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "JSON-Compact".parse::<OutputFormat>().unwrap(),
            OutputFormat::JsonCompact
        );
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn log_path_split() {
        let (dir, file) = split_log_path(Path::new("logs/llm.log")).unwrap();
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(file, PathBuf::from("llm.log"));

        let (dir, _) = split_log_path(Path::new("llm.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
    }

    #[test]
    fn test_init_default() {
        // Repeated initialization must be tolerated.
        let _ = init_default();
        assert!(init_debug().is_ok());
    }
}

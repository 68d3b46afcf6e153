//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Default filter directive when nothing else is configured.
pub const DEFAULT_FILTER: &str = "info";

/// Filter directive used with `--verbose`.
pub const VERBOSE_FILTER: &str = "inventix=debug,info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format string. Unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Line format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub filter: String,
    /// Optional log file. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds a logging config from file settings and the environment.
    ///
    /// Precedence for the filter is `INVENTIX_LOG`, then `RUST_LOG`, then
    /// `--verbose`, then the config file, then [`DEFAULT_FILTER`].
    /// `INVENTIX_LOG_FORMAT` and `INVENTIX_LOG_FILE` override the file settings.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let env_filter = std::env::var("INVENTIX_LOG")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok());
        let mut config = Self::resolve(settings, env_filter, verbose);

        if let Some(format) = std::env::var("INVENTIX_LOG_FORMAT")
            .ok()
            .as_deref()
            .and_then(LogFormat::parse)
        {
            config.format = format;
        }
        if let Ok(file) = std::env::var("INVENTIX_LOG_FILE") {
            config.file = non_empty(file).map(PathBuf::from);
        }

        config
    }

    fn resolve(
        settings: Option<&LoggingSettings>,
        env_filter: Option<String>,
        verbose: bool,
    ) -> Self {
        let format = settings
            .and_then(|s| s.format.as_deref())
            .and_then(LogFormat::parse)
            .unwrap_or_default();

        let filter = env_filter
            .and_then(non_empty)
            .or_else(|| verbose.then(|| VERBOSE_FILTER.to_string()))
            .or_else(|| settings.and_then(|s| s.filter.clone()).and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let file = settings
            .and_then(|s| s.file.clone())
            .and_then(non_empty)
            .map(PathBuf::from);

        Self {
            format,
            filter,
            file,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

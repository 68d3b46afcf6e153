//! Configuration management.
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! `INVENTIX_*` environment variables.

mod limits;

pub use limits::ExtractionLimits;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for inventix.
#[derive(Debug, Clone, Default)]
pub struct InventixConfig {
    /// Extraction and comparison bounds.
    pub extraction: ExtractionLimits,
    /// Semantic oracle configuration.
    pub oracle: OracleConfig,
    /// Logging settings from the config file.
    pub logging: LoggingSettings,
}

/// Semantic oracle configuration.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Whether extraction consults the oracle at all.
    pub enabled: bool,
    /// Provider backing the oracle.
    pub provider: OracleProvider,
    /// Model name.
    pub model: Option<String>,
    /// API key (may reference an environment variable like `${GEMINI_API_KEY}`).
    pub api_key: Option<String>,
    /// Base URL for the provider (for self-hosted or proxied endpoints).
    pub base_url: Option<String>,
    /// HTTP request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// HTTP connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
    /// Deadline for one whole oracle call, retries included (0 to disable).
    pub request_timeout_ms: u64,
    /// Retries for timed-out calls. Zero keeps a single attempt.
    pub max_retries: u32,
    /// Backoff between retries in milliseconds, doubled per attempt.
    pub retry_backoff_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: OracleProvider::default(),
            model: None,
            api_key: None,
            base_url: None,
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
            request_timeout_ms: 45_000,
            max_retries: 0,
            retry_backoff_ms: 250,
        }
    }
}

/// Available oracle providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleProvider {
    /// Google Gemini.
    #[default]
    Gemini,
    /// `OpenAI` or any OpenAI-compatible chat completions endpoint.
    OpenAi,
}

impl OracleProvider {
    /// Parses a provider string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "openai" | "open_ai" | "openai-compatible" => Self::OpenAi,
            _ => Self::Gemini,
        }
    }

    /// Returns the provider as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// "pretty" or "json".
    pub format: Option<String>,
    /// `EnvFilter` directive, e.g. `inventix=debug`.
    pub filter: Option<String>,
    /// Optional log file path.
    pub file: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Extraction limits.
    pub extraction: Option<ExtractionLimits>,
    /// Oracle configuration.
    pub oracle: Option<ConfigFileOracle>,
    /// Logging configuration.
    pub logging: Option<LoggingSettings>,
}

/// Oracle section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileOracle {
    /// Enabled flag.
    pub enabled: Option<bool>,
    /// Provider name.
    pub provider: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Base URL.
    pub base_url: Option<String>,
    /// HTTP request timeout.
    pub timeout_ms: Option<u64>,
    /// HTTP connect timeout.
    pub connect_timeout_ms: Option<u64>,
    /// Whole-call deadline.
    pub request_timeout_ms: Option<u64>,
    /// Retry count.
    pub max_retries: Option<u32>,
    /// Retry backoff.
    pub retry_backoff_ms: Option<u64>,
}

impl InventixConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::parse_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn parse_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Looks for `inventix/config.toml` under the platform config directory.
    /// Returns default configuration if no readable file is found.
    #[must_use]
    pub fn load_default() -> Self {
        Self::default_path()
            .filter(|path| path.exists())
            .and_then(|path| match Self::load_from_file(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Ignoring unreadable config file");
                    None
                },
            })
            .unwrap_or_default()
    }

    /// Returns the default config file path, if a home directory is known.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("inventix").join("config.toml"))
    }

    /// Converts a `ConfigFile` to `InventixConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(extraction) = file.extraction {
            config.extraction = extraction;
        }
        if let Some(oracle) = file.oracle {
            let target = &mut config.oracle;
            if let Some(enabled) = oracle.enabled {
                target.enabled = enabled;
            }
            if let Some(provider) = oracle.provider {
                target.provider = OracleProvider::parse(&provider);
            }
            target.model = oracle.model;
            target.api_key = oracle.api_key.map(|key| expand_env_reference(&key));
            target.base_url = oracle.base_url;
            if let Some(v) = oracle.timeout_ms {
                target.timeout_ms = v;
            }
            if let Some(v) = oracle.connect_timeout_ms {
                target.connect_timeout_ms = v;
            }
            if let Some(v) = oracle.request_timeout_ms {
                target.request_timeout_ms = v;
            }
            if let Some(v) = oracle.max_retries {
                target.max_retries = v;
            }
            if let Some(v) = oracle.retry_backoff_ms {
                target.retry_backoff_ms = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Applies `INVENTIX_*` environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        let oracle = &mut self.oracle;
        if let Some(enabled) = parse_bool_env("INVENTIX_ORACLE_ENABLED") {
            oracle.enabled = enabled;
        }
        if let Ok(v) = std::env::var("INVENTIX_ORACLE_PROVIDER") {
            oracle.provider = OracleProvider::parse(&v);
        }
        if let Ok(v) = std::env::var("INVENTIX_ORACLE_MODEL") {
            oracle.model = Some(v);
        }
        if let Ok(v) = std::env::var("INVENTIX_ORACLE_API_KEY") {
            oracle.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("INVENTIX_ORACLE_BASE_URL") {
            oracle.base_url = Some(v);
        }
        if let Some(v) = parse_env::<u64>("INVENTIX_ORACLE_TIMEOUT_MS") {
            oracle.timeout_ms = v;
        }
        if let Some(v) = parse_env::<u64>("INVENTIX_ORACLE_REQUEST_TIMEOUT_MS") {
            oracle.request_timeout_ms = v;
        }
        if let Some(v) = parse_env::<u32>("INVENTIX_ORACLE_MAX_RETRIES") {
            oracle.max_retries = v;
        }
        if let Some(v) = parse_env::<u64>("INVENTIX_ORACLE_RETRY_BACKOFF_MS") {
            oracle.retry_backoff_ms = v;
        }
        self
    }

    /// Disables the oracle.
    #[must_use]
    pub const fn without_oracle(mut self) -> Self {
        self.oracle.enabled = false;
        self
    }
}

/// Expands a `${VAR}` reference to the variable's value.
///
/// Any other string is returned unchanged; an unset variable expands to "".
fn expand_env_reference(value: &str) -> String {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .map_or_else(
            || value.to_string(),
            |name| std::env::var(name).unwrap_or_default(),
        )
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_bool_env(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .and_then(|v| match v.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

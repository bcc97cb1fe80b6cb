//! Startup configuration.
//!
//! Values come from four tiers, highest priority first:
//! command-line flags, environment, an optional TOML file, built-in defaults.
//!
//! ```toml
//! [service]
//! backend = "http"
//! base_url = "http://localhost:8000"
//! timeout_secs = 30
//! text_model = "gemini-1.5-flash"
//!
//! [logging]
//! level = "info"
//! file = "farm-advisor.log"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use farm_core::service::ServiceConfig;

use crate::logging::DEFAULT_LEVEL;

/// Environment variable overriding the backend URL from the config file.
pub const BASE_URL_ENV: &str = "FARM_ADVISOR_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Contents of the TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub service: ServiceSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceSection {
    pub backend: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub text_model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config file");
        Ok(config)
    }
}

/// Values taken from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub base_url: Option<String>,
    /// `RUST_LOG`
    pub log_filter: Option<String>,
}

impl EnvOverrides {
    pub fn from_process() -> Self {
        Self {
            base_url: std::env::var(BASE_URL_ENV).ok(),
            log_filter: std::env::var("RUST_LOG").ok(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub backend: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub text_model: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service: ServiceConfig,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Merges the tiers. Blank strings count as unset.
pub fn resolve(
    file: FileConfig,
    env: EnvOverrides,
    cli: CliOverrides,
) -> Result<Settings, ConfigError> {
    let defaults = ServiceConfig::default();

    let base_url = non_blank(cli.base_url)
        .or_else(|| non_blank(env.base_url))
        .or_else(|| non_blank(file.service.base_url))
        .unwrap_or(defaults.base_url);

    let service = ServiceConfig {
        backend: non_blank(cli.backend)
            .or_else(|| non_blank(file.service.backend))
            .map(|b| b.trim().to_lowercase())
            .unwrap_or(defaults.backend),
        base_url: base_url.trim().to_string(),
        timeout_secs: cli
            .timeout_secs
            .or(file.service.timeout_secs)
            .unwrap_or(defaults.timeout_secs),
        text_model: non_blank(cli.text_model).or_else(|| non_blank(file.service.text_model)),
    };

    if service.timeout_secs == 0 {
        return Err(ConfigError::Invalid("timeout_secs must be at least 1".to_string()));
    }

    let log_level = non_blank(cli.log_level)
        .or_else(|| non_blank(env.log_filter))
        .or_else(|| non_blank(file.logging.level))
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

    let settings = Settings {
        service,
        log_level,
        log_file: cli.log_file.or(file.logging.file),
    };
    debug!(?settings, "resolved settings");
    Ok(settings)
}

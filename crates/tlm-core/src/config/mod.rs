//! Configuration loading for the tlm CLI.
//!
//! This module handles:
//! - Loading the TOML viewer config
//! - Semantic validation
//! - Config resolution order (CLI > env > XDG > defaults)

pub mod validation;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tlm_telemetry::{DecimatingProcessor, ParserOptions, DEFAULT_DECIMATION_TARGET};

pub use validation::{validate_config, ValidationError};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TLM_CONFIG";

/// XDG config directory name.
const CONFIG_DIR_NAME: &str = "tlm";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Default input bound: 512 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Decoder and statistics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Points kept per field after decimation; 0 keeps every sample.
    pub decimation_target: usize,
    /// Edge-pad decimated series to the recording's time range.
    pub pad_to_range: bool,
    /// Largest input file the decoder accepts, in bytes.
    pub max_file_size: u64,
    /// Weighted percentiles reported by `stats`.
    pub percentiles: Vec<f64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            decimation_target: DEFAULT_DECIMATION_TARGET,
            pad_to_range: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            percentiles: vec![0.5, 0.9, 0.99],
        }
    }
}

impl ViewerConfig {
    /// Parse and validate TOML text.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Decoder options with the configured post-processor and size bound.
    pub fn parser_options(&self) -> ParserOptions {
        let options = self.raw_parser_options();
        if self.decimation_target == 0 && !self.pad_to_range {
            return options;
        }
        options.with_processor(DecimatingProcessor::new(
            self.decimation_target,
            self.pad_to_range,
        ))
    }

    /// Decoder options without a post-processor.
    pub fn raw_parser_options(&self) -> ParserOptions {
        ParserOptions::new().with_max_input_size(self.max_file_size)
    }
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config file (highest priority).
    pub config_path: Option<PathBuf>,
}

/// Resolved configuration with its origin.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ViewerConfig,
    /// File the config was read from, `None` for built-in defaults.
    pub source: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit CLI flag (via ConfigOptions)
/// 2. Environment variable (TLM_CONFIG)
/// 3. XDG config home (~/.config/tlm/config.toml), if present
/// 4. Built-in defaults
///
/// An explicit path that does not exist is an error. A missing XDG file
/// falls through to the defaults.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config_home = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

    match resolve_config_path(options, env_path, config_home) {
        Some(ConfigLocation::Required(path)) => load_file(path),
        Some(ConfigLocation::Optional(path)) if path.is_file() => load_file(path),
        _ => Ok(ResolvedConfig {
            config: ViewerConfig::default(),
            source: None,
        }),
    }
}

#[derive(Debug, PartialEq)]
enum ConfigLocation {
    Required(PathBuf),
    Optional(PathBuf),
}

fn resolve_config_path(
    options: &ConfigOptions,
    env_path: Option<PathBuf>,
    config_home: Option<PathBuf>,
) -> Option<ConfigLocation> {
    if let Some(path) = &options.config_path {
        return Some(ConfigLocation::Required(path.clone()));
    }

    if let Some(path) = env_path.filter(|p| !p.as_os_str().is_empty()) {
        return Some(ConfigLocation::Required(path));
    }

    config_home.map(|home| ConfigLocation::Optional(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
}

fn load_file(path: PathBuf) -> Result<ResolvedConfig, ConfigError> {
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound { path });
        }
        Err(source) => return Err(ConfigError::IoError { path, source }),
    };

    let config = ViewerConfig::from_toml(&text, &path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(ResolvedConfig {
        config,
        source: Some(path),
    })
}

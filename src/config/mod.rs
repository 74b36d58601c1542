//! Tap configuration.
//!
//! The configuration file carries the request keys the streams need
//! (`comp_id`, `club_id`, `match_id`, `comp_name`, `date`), the optional
//! stream selector, and two tables with defaults: `[browser]` and `[retry]`.
//! `.toml` files are read as TOML, anything else as JSON.

pub mod browser;
pub mod resolver;

pub use browser::{Backend, BrowserConfig, DEFAULT_BASE_URL};
pub use resolver::{ConfigResolver, PageRequest};

use backon::ConstantBuilder;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::app::TapError;
use crate::streams::StreamKind;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TapConfig {
    /// Run only this stream; all streams when absent
    #[serde(alias = "_stream")]
    pub stream: Option<String>,
    pub comp_id: Option<i64>,
    pub club_id: Option<i64>,
    pub match_id: Option<i64>,
    pub comp_name: Option<String>,
    /// `DD/MM/YYYY`, restricts the matches stream to one date section
    pub date: Option<String>,
    pub browser: BrowserConfig,
    pub retry: RetryConfig,
}

/// Bounds for re-fetching a page that was not ready yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per page, first one included (default: 3)
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds (default: 2000)
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 2000,
        }
    }
}

impl RetryConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// Constant-delay policy allowing `max_attempts - 1` retries after the first attempt
    pub fn policy(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.backoff())
            .with_max_times(self.max_attempts.saturating_sub(1) as usize)
    }
}

impl TapConfig {
    /// Load configuration from `path`, choosing the format by extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(&content).map_err(|e| ConfigError::Toml {
                path: path.to_path_buf(),
                source: e,
            })
        } else {
            serde_json::from_str(&content).map_err(|e| ConfigError::Json {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    /// Streams to run, in run order.
    pub fn selected_streams(&self) -> Result<Vec<StreamKind>, TapError> {
        match self.stream.as_deref() {
            Some(name) => Ok(vec![StreamKind::from_str(name)?]),
            None => Ok(StreamKind::ALL.to_vec()),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<ConfigError> for TapError {
    fn from(err: ConfigError) -> Self {
        TapError::Config(err.to_string())
    }
}

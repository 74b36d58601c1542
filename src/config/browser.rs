use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.statbunker.com/";

/// Which page session implementation drives the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Headless Chrome via the DevTools protocol
    Chrome,
    /// Plain HTTP requests, no script execution
    Http,
}

/// Configuration for the browsing session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Site root that stream paths are appended to
    pub base_url: String,

    /// Session implementation (default: chrome)
    pub backend: Backend,

    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Page load timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Wait time after navigation for dynamic content in milliseconds (default: 1000)
    pub wait_after_load_ms: u64,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            backend: Backend::Chrome,
            headless: true,
            timeout_secs: 30,
            wait_after_load_ms: 1000,
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl BrowserConfig {
    /// Get the page load timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the wait time after load as a Duration
    pub fn wait_after_load(&self) -> Duration {
        Duration::from_millis(self.wait_after_load_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = BrowserConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.backend, Backend::Chrome);
        assert!(config.headless);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.wait_after_load_ms, 1000);
        assert!(config.user_agent.is_some());
    }

    #[test]
    fn test_durations() {
        let config = BrowserConfig {
            timeout_secs: 15,
            wait_after_load_ms: 250,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.wait_after_load(), Duration::from_millis(250));
    }

    #[test]
    fn test_backend_from_toml() {
        let config: BrowserConfig = toml::from_str("backend = \"http\"").unwrap();
        assert_eq!(config.backend, Backend::Http);
        assert!(config.headless);
    }
}

//! Client configuration.

use std::time::Duration;

/// Size above which uploads are compressed first.
pub const COMPRESSION_THRESHOLD_BYTES: u64 = 20 * 1024 * 1024;

/// Configuration for the gateway client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the proxy, without a trailing slash.
    pub base_url: String,
    /// Timeout for status checks.
    pub status_timeout: Duration,
    /// Timeout for uploads and downloads, which move whole videos.
    pub transfer_timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Consecutive transient poll failures tolerated before giving up.
    pub max_transient_failures: u32,
    /// Files larger than this are compressed before upload.
    pub compression_threshold_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            status_timeout: Duration::from_secs(30),
            transfer_timeout: Duration::from_secs(30 * 60),
            poll_interval: Duration::from_secs(2),
            max_transient_failures: 3,
            compression_threshold_bytes: COMPRESSION_THRESHOLD_BYTES,
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("HOOPSTATS_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            status_timeout: Duration::from_secs(
                env_parsed("HOOPSTATS_STATUS_TIMEOUT_SECS").unwrap_or(30),
            ),
            transfer_timeout: Duration::from_secs(
                env_parsed("HOOPSTATS_TRANSFER_TIMEOUT_SECS").unwrap_or(30 * 60),
            ),
            poll_interval: Duration::from_millis(
                env_parsed("HOOPSTATS_POLL_INTERVAL_MS").unwrap_or(2000),
            ),
            max_transient_failures: env_parsed("HOOPSTATS_MAX_POLL_FAILURES").unwrap_or(3),
            compression_threshold_bytes: env_parsed("HOOPSTATS_COMPRESSION_THRESHOLD_BYTES")
                .unwrap_or(COMPRESSION_THRESHOLD_BYTES),
        }
    }

    /// Override the base URL, trimming any trailing slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.max_transient_failures, 3);
        assert_eq!(config.compression_threshold_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::default().with_base_url("http://example.com/");
        assert_eq!(config.base_url, "http://example.com");
    }
}

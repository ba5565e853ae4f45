//! Proxy configuration.

use std::time::Duration;

/// Relay server configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Gateway base URL used when a route has no override
    pub backend_url: String,
    /// Gateway override for the upload route
    pub upload_backend_url: Option<String>,
    /// Gateway override for the status route
    pub status_backend_url: Option<String>,
    /// Gateway override for the download route. Rendered videos may be
    /// served from a different deployment than the ingest API.
    pub download_backend_url: Option<String>,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Timeout for status checks
    pub status_timeout: Duration,
    /// Timeout for uploads and downloads, which move whole videos
    pub transfer_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            backend_url: "http://localhost:8000".to_string(),
            upload_backend_url: None,
            status_backend_url: None,
            download_backend_url: None,
            cors_origins: vec!["*".to_string()],
            status_timeout: Duration::from_secs(30),
            transfer_timeout: Duration::from_secs(30 * 60),
            max_body_size: 1024 * 1024 * 1024, // 1GB
            environment: "development".to_string(),
        }
    }
}

impl ProxyConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("PROXY_HOST").unwrap_or(defaults.host),
            port: std::env::var("PROXY_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            backend_url: std::env::var("BACKEND_URL")
                .map(|url| trim_base(&url))
                .unwrap_or(defaults.backend_url),
            upload_backend_url: backend_override("UPLOAD_BACKEND_URL"),
            status_backend_url: backend_override("STATUS_BACKEND_URL"),
            download_backend_url: backend_override("DOWNLOAD_BACKEND_URL"),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            status_timeout: Duration::from_secs(env_parsed("STATUS_TIMEOUT_SECS").unwrap_or(30)),
            transfer_timeout: Duration::from_secs(
                env_parsed("TRANSFER_TIMEOUT_SECS").unwrap_or(30 * 60),
            ),
            max_body_size: env_parsed("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Gateway URL for the upload route.
    pub fn upload_backend(&self) -> &str {
        self.upload_backend_url.as_deref().unwrap_or(&self.backend_url)
    }

    /// Gateway URL for the status route.
    pub fn status_backend(&self) -> &str {
        self.status_backend_url.as_deref().unwrap_or(&self.backend_url)
    }

    /// Gateway URL for the download route.
    pub fn download_backend(&self) -> &str {
        self.download_backend_url.as_deref().unwrap_or(&self.backend_url)
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn backend_override(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|url| trim_base(&url))
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.transfer_timeout, Duration::from_secs(1800));
        assert!(!config.is_production());
    }

    #[test]
    fn test_route_urls_fall_back_to_backend_url() {
        let mut config = ProxyConfig::default();
        assert_eq!(config.upload_backend(), "http://localhost:8000");
        assert_eq!(config.status_backend(), "http://localhost:8000");

        config.download_backend_url = Some("https://renders.example.com".to_string());
        assert_eq!(config.download_backend(), "https://renders.example.com");
        assert_eq!(config.status_backend(), "http://localhost:8000");
    }

    #[test]
    fn test_trim_base_strips_trailing_slash() {
        assert_eq!(trim_base("http://gateway:8000/"), "http://gateway:8000");
        assert_eq!(trim_base("http://gateway:8000"), "http://gateway:8000");
    }
}

//! Application state.

use crate::config::ProxyConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ProxyConfig,
    /// Client for quick status checks.
    pub http: reqwest::Client,
    /// Client with the long deadline used for whole-video transfers.
    pub transfer_http: reqwest::Client,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ProxyConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let http = reqwest::Client::builder()
            .timeout(config.status_timeout)
            .build()?;
        let transfer_http = reqwest::Client::builder()
            .timeout(config.transfer_timeout)
            .build()?;

        Ok(Self {
            config,
            http,
            transfer_http,
        })
    }
}

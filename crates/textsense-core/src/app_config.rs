use std::net::SocketAddr;

/// Endpoint substituted when `ENDPOINT` is unset. Calls made with it fail.
pub const PLACEHOLDER_ENDPOINT: &str = "<cognitive services endpoint>";

/// API key substituted when `TEXT_ANALYTICS_API_KEY` is unset.
pub const PLACEHOLDER_API_KEY: &str = "<api key>";

#[derive(Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub api_key: String,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub language: String,
    pub analytics_timeout_secs: u64,
}

impl AppConfig {
    /// Returns `true` when either credential fell back to its placeholder.
    #[must_use]
    pub fn uses_placeholder_credentials(&self) -> bool {
        self.endpoint == PLACEHOLDER_ENDPOINT || self.api_key == PLACEHOLDER_API_KEY
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[redacted]")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("language", &self.language)
            .field("analytics_timeout_secs", &self.analytics_timeout_secs)
            .finish()
    }
}

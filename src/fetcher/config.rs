use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the outbound HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User agent string sent with every request
    pub user_agent: String,

    /// Accept-Language header (default: English with Hindi fallback)
    pub accept_language: String,

    /// Skip TLS certificate validation for the target site (default: true).
    ///
    /// Court hosts frequently serve self-signed or misconfigured
    /// certificates. This only affects the client built from this config.
    pub accept_invalid_certs: bool,

    /// Retries for transient statuses (429, 500, 502, 503, 504) (default: 3)
    pub max_retries: u32,

    /// Backoff step between retries in milliseconds (default: 1000)
    pub retry_backoff_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "en-US,en;q=0.9,hi;q=0.8".to_string(),
            accept_invalid_certs: true,
            max_retries: 3,
            retry_backoff_ms: 1000,
        }
    }
}

impl FetcherConfig {
    /// Delay before the given retry attempt (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = FetcherConfig::default();
        assert!(config.accept_invalid_certs);
        assert_eq!(config.max_retries, 3);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.accept_language.contains("hi"));
    }

    #[test]
    fn test_retry_delay_grows_linearly() {
        let config = FetcherConfig::default();
        assert_eq!(config.retry_delay(1), Duration::from_millis(1000));
        assert_eq!(config.retry_delay(3), Duration::from_millis(3000));
    }
}

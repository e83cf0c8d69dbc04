pub mod analysis;
pub mod domain;
pub mod error;
pub mod market;
pub mod pacing;
pub mod pipeline;
pub mod reference;
pub mod source;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://api.coingecko.com/api/v3";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub market_data_base_url: Option<String>,
        pub market_data_api_key: Option<String>,
        pub static_payload_path: Option<PathBuf>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                market_data_base_url: non_empty_var("MARKET_DATA_BASE_URL"),
                market_data_api_key: non_empty_var("MARKET_DATA_API_KEY"),
                static_payload_path: non_empty_var("STATIC_PAYLOAD_PATH").map(PathBuf::from),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn market_data_base_url(&self) -> &str {
            self.market_data_base_url
                .as_deref()
                .unwrap_or(DEFAULT_MARKET_DATA_BASE_URL)
        }

        pub fn require_sentry_dsn(&self) -> anyhow::Result<&str> {
            self.sentry_dsn.as_deref().context("SENTRY_DSN is required")
        }
    }

    /// Parses a numeric environment variable, falling back to `default` when unset or invalid.
    pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
        std::env::var(key)
            .ok()
            .and_then(|s| s.trim().parse::<T>().ok())
            .unwrap_or(default)
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

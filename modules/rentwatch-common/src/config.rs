use std::env;
use std::time::Duration;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Token for the file-resolution API.
    pub bot_token: String,

    /// Base URL of the monitoring backend.
    pub monitor_api_base: String,

    /// Base URL of the file-resolution API.
    pub telegram_api_base: String,

    /// Per-request timeout for collaborator calls, in seconds.
    pub http_timeout_secs: u64,

    /// Quiet period after the last message of a media group before the
    /// batch is finalized, in seconds.
    pub media_group_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            bot_token: required_env("BOT_TOKEN"),
            monitor_api_base: env::var("MONITOR_API_BASE")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            telegram_api_base: env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "800".to_string())
                .parse()
                .expect("HTTP_TIMEOUT_SECS must be a number"),
            media_group_timeout_secs: env::var("MEDIA_GROUP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .expect("MEDIA_GROUP_TIMEOUT_SECS must be a number"),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn media_group_timeout(&self) -> Duration {
        Duration::from_secs(self.media_group_timeout_secs)
    }

    /// Log the effective configuration with the token elided.
    pub fn log_redacted(&self) {
        info!(
            monitor_api_base = %self.monitor_api_base,
            telegram_api_base = %self.telegram_api_base,
            http_timeout_secs = self.http_timeout_secs,
            media_group_timeout_secs = self.media_group_timeout_secs,
            bot_token = "<redacted>",
            "configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

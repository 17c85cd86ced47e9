use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorApiError>;

#[derive(Debug, Error)]
pub enum MonitorApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for MonitorApiError {
    fn from(err: reqwest::Error) -> Self {
        MonitorApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for MonitorApiError {
    fn from(err: serde_json::Error) -> Self {
        MonitorApiError::Parse(err.to_string())
    }
}

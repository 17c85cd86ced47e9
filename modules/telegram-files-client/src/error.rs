use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelegramFilesError>;

#[derive(Debug, Error)]
pub enum TelegramFilesError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("File request rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for TelegramFilesError {
    fn from(err: reqwest::Error) -> Self {
        TelegramFilesError::Network(err.to_string())
    }
}

pub mod error;

pub use error::{Result, TelegramFilesError};

use std::time::Duration;

use serde::Deserialize;

use rentwatch_common::ResolvedFile;

/// Envelope every Bot API response is wrapped in.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    result: Option<FileInfo>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    file_id: String,
    #[serde(default)]
    file_size: Option<u64>,
    #[serde(default)]
    file_path: Option<String>,
}

pub struct TelegramFilesClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramFilesClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Look up a file reference via the getFile endpoint and build the
    /// direct download URL. Never mutates the reference's identity fields.
    pub async fn get_file(&self, file_id: &str) -> Result<ResolvedFile> {
        let endpoint = format!("{}/bot{}/getFile", self.base_url, self.token);

        let resp = self
            .client
            .get(&endpoint)
            .query(&[("file_id", file_id)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TelegramFilesError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse = resp.json().await?;
        if !envelope.ok {
            return Err(TelegramFilesError::Rejected(
                envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let info = envelope
            .result
            .ok_or_else(|| TelegramFilesError::Rejected("response missing file info".to_string()))?;
        let file_path = info
            .file_path
            .ok_or_else(|| TelegramFilesError::Rejected("file path unavailable".to_string()))?;

        let download_url = format!("{}/file/bot{}/{}", self.base_url, self.token, file_path);

        Ok(ResolvedFile {
            file_id: info.file_id,
            file_path,
            download_url,
            file_size: info.file_size,
        })
    }
}

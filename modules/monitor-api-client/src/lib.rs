pub mod error;
pub mod types;

pub use error::{MonitorApiError, Result};
pub use types::{
    AnnouncementPayload, AnnouncementRecord, ContactInfo, GroupListResponse, GroupRecord,
    MediaRecordPayload,
};

use std::time::Duration;

pub struct MonitorApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl MonitorApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// List all monitored groups. Doubles as the startup reachability
    /// check.
    pub async fn list_groups(&self) -> Result<Vec<GroupRecord>> {
        let url = format!("{}/api/monitoredgroup/", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let body = check_status(resp).await?.text().await?;
        let page: GroupListResponse = serde_json::from_str(&body)?;
        Ok(page.into_records())
    }

    /// Find a group by its external chat id. Returns the first match.
    pub async fn find_group(&self, chat_id: i64) -> Result<Option<GroupRecord>> {
        let url = format!("{}/api/monitoredgroup/", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("chat_id", chat_id.to_string())])
            .send()
            .await?;
        let body = check_status(resp).await?.text().await?;
        let page: GroupListResponse = serde_json::from_str(&body)?;
        Ok(page.into_records().into_iter().next())
    }

    /// Register a group. The created record is not trusted for the
    /// internal id; callers re-query by chat id.
    pub async fn create_group(&self, chat_id: i64, title: &str) -> Result<()> {
        let url = format!("{}/api/monitoredgroup/", self.base_url);
        let body = serde_json::json!({ "chat_id": chat_id, "title": title });
        let resp = self.client.post(&url).json(&body).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    pub async fn create_announcement(&self, payload: &AnnouncementPayload) -> Result<i64> {
        let url = format!("{}/api/rental-announcements/", self.base_url);
        let resp = self.client.post(&url).json(payload).send().await?;
        let record: AnnouncementRecord = check_status(resp).await?.json().await?;
        Ok(record.id)
    }

    pub async fn create_media_record(&self, payload: &MediaRecordPayload) -> Result<()> {
        let url = format!("{}/api/rental-media-files/", self.base_url);
        let resp = self.client.post(&url).json(payload).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(MonitorApiError::Api {
        status: status.as_u16(),
        message,
    })
}

// Trait abstractions for the pipeline's two collaborators.
//
// FileResolver — the message source's file-reference lookup.
// AnnouncementStore — the CRUD backend that owns groups, announcements
// and media records.
//
// These enable deterministic testing with MockFileResolver and MockStore:
// no network, no backend. `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;

use monitor_api_client::{AnnouncementPayload, MediaRecordPayload, MonitorApiClient};
use rentwatch_common::ResolvedFile;
use telegram_files_client::TelegramFilesClient;

// ---------------------------------------------------------------------------
// FileResolver
// ---------------------------------------------------------------------------

#[async_trait]
pub trait FileResolver: Send + Sync {
    /// Resolve a provider file reference to a retrievable download URL.
    async fn resolve(&self, file_id: &str) -> Result<ResolvedFile>;
}

#[async_trait]
impl FileResolver for TelegramFilesClient {
    async fn resolve(&self, file_id: &str) -> Result<ResolvedFile> {
        Ok(self.get_file(file_id).await?)
    }
}

// ---------------------------------------------------------------------------
// AnnouncementStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    /// Internal id of the group with this external chat id, if known.
    async fn find_group(&self, chat_id: i64) -> Result<Option<i64>>;

    /// Register a group. The canonical internal id comes from a
    /// follow-up `find_group`, never from the create response.
    async fn create_group(&self, chat_id: i64, title: &str) -> Result<()>;

    /// Create an announcement row; returns its internal id.
    async fn create_announcement(&self, payload: &AnnouncementPayload) -> Result<i64>;

    /// Create one media record attached to an announcement.
    async fn create_media_record(&self, payload: &MediaRecordPayload) -> Result<()>;
}

#[async_trait]
impl AnnouncementStore for MonitorApiClient {
    async fn find_group(&self, chat_id: i64) -> Result<Option<i64>> {
        Ok(self.find_group(chat_id).await?.map(|group| group.id))
    }

    async fn create_group(&self, chat_id: i64, title: &str) -> Result<()> {
        Ok(self.create_group(chat_id, title).await?)
    }

    async fn create_announcement(&self, payload: &AnnouncementPayload) -> Result<i64> {
        Ok(self.create_announcement(payload).await?)
    }

    async fn create_media_record(&self, payload: &MediaRecordPayload) -> Result<()> {
        Ok(self.create_media_record(payload).await?)
    }
}

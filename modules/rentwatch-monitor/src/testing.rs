// Test mocks for the monitoring pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockFileResolver (FileResolver) — HashMap-based file_id → URL
// - MockStore (AnnouncementStore) — stateful in-memory backend
//
// Plus message constructors under `messages`. Builder pattern throughout.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use monitor_api_client::{AnnouncementPayload, MediaRecordPayload};
use rentwatch_common::{InboundMessage, PhotoVariant, ResolvedFile, Sender};

use crate::traits::{AnnouncementStore, FileResolver};

// ---------------------------------------------------------------------------
// MockFileResolver
// ---------------------------------------------------------------------------

/// HashMap-based file resolver. Returns `Err` for unregistered file ids
/// and for ids explicitly marked as failing.
#[derive(Default)]
pub struct MockFileResolver {
    urls: HashMap<String, String>,
    failures: HashSet<String>,
}

impl MockFileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_file(mut self, file_id: &str, url: &str) -> Self {
        self.urls.insert(file_id.to_string(), url.to_string());
        self
    }

    pub fn fail_file(mut self, file_id: &str) -> Self {
        self.failures.insert(file_id.to_string());
        self
    }
}

#[async_trait]
impl FileResolver for MockFileResolver {
    async fn resolve(&self, file_id: &str) -> Result<ResolvedFile> {
        if self.failures.contains(file_id) {
            bail!("simulated resolution failure for {file_id}");
        }
        match self.urls.get(file_id) {
            Some(url) => Ok(ResolvedFile {
                file_id: file_id.to_string(),
                file_path: format!("files/{file_id}"),
                download_url: url.clone(),
                file_size: None,
            }),
            None => bail!("unregistered file id {file_id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreState {
    groups: Vec<(i64, i64, String)>, // (internal id, chat id, title)
    next_group_id: i64,
    announcements: Vec<AnnouncementPayload>,
    media_records: Vec<MediaRecordPayload>,
    media_record_attempts: usize,
}

/// Stateful in-memory backend with failure toggles.
#[derive(Default)]
pub struct MockStore {
    state: Mutex<StoreState>,
    fail_group_create: bool,
    fail_announcement_create: bool,
    fail_media_records: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_group_create(mut self) -> Self {
        self.fail_group_create = true;
        self
    }

    pub fn fail_announcement_create(mut self) -> Self {
        self.fail_announcement_create = true;
        self
    }

    pub fn fail_media_records(mut self) -> Self {
        self.fail_media_records = true;
        self
    }

    // --- assertion helpers ---

    pub fn group_count(&self) -> usize {
        self.state.lock().unwrap().groups.len()
    }

    pub fn group_title(&self, chat_id: i64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .groups
            .iter()
            .find(|(_, chat, _)| *chat == chat_id)
            .map(|(_, _, title)| title.clone())
    }

    pub fn announcements_created(&self) -> usize {
        self.state.lock().unwrap().announcements.len()
    }

    pub fn last_announcement(&self) -> Option<AnnouncementPayload> {
        self.state.lock().unwrap().announcements.last().cloned()
    }

    pub fn announcements(&self) -> Vec<AnnouncementPayload> {
        self.state.lock().unwrap().announcements.clone()
    }

    pub fn media_records(&self) -> Vec<MediaRecordPayload> {
        self.state.lock().unwrap().media_records.clone()
    }

    /// Attempted create calls, including failed ones.
    pub fn media_record_attempts(&self) -> usize {
        self.state.lock().unwrap().media_record_attempts
    }
}

#[async_trait]
impl AnnouncementStore for MockStore {
    async fn find_group(&self, chat_id: i64) -> Result<Option<i64>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .groups
            .iter()
            .find(|(_, chat, _)| *chat == chat_id)
            .map(|(id, _, _)| *id))
    }

    async fn create_group(&self, chat_id: i64, title: &str) -> Result<()> {
        if self.fail_group_create {
            bail!("simulated group create failure");
        }
        let mut state = self.state.lock().unwrap();
        state.next_group_id += 1;
        let id = state.next_group_id;
        state.groups.push((id, chat_id, title.to_string()));
        Ok(())
    }

    async fn create_announcement(&self, payload: &AnnouncementPayload) -> Result<i64> {
        if self.fail_announcement_create {
            bail!("simulated announcement create failure");
        }
        let mut state = self.state.lock().unwrap();
        state.announcements.push(payload.clone());
        Ok(state.announcements.len() as i64)
    }

    async fn create_media_record(&self, payload: &MediaRecordPayload) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.media_record_attempts += 1;
        if self.fail_media_records {
            bail!("simulated media record create failure");
        }
        state.media_records.push(payload.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Message constructors
// ---------------------------------------------------------------------------

pub mod messages {
    use super::*;

    pub const CHAT_ID: i64 = -1001234567890;

    pub fn sender() -> Sender {
        Sender {
            id: 4242,
            username: Some("landlord".to_string()),
            first_name: Some("Aziz".to_string()),
            last_name: Some("Karimov".to_string()),
        }
    }

    pub fn text_message(message_id: i64, text: &str) -> InboundMessage {
        InboundMessage {
            message_id,
            chat_id: CHAT_ID,
            chat_title: Some("Toshkent ijara".to_string()),
            media_group_id: None,
            sender: sender(),
            text: Some(text.to_string()),
            photo: Vec::new(),
            video: None,
            document: None,
            audio: None,
            voice: None,
            video_note: None,
            location: None,
            raw: serde_json::json!({ "message_id": message_id }),
        }
    }

    pub fn with_photo_variants(
        message_id: i64,
        variants: &[(&str, u32, u32)],
    ) -> InboundMessage {
        let mut message = text_message(message_id, "");
        message.text = None;
        message.photo = variants
            .iter()
            .map(|(file_id, width, height)| PhotoVariant {
                file_id: file_id.to_string(),
                file_unique_id: format!("u-{file_id}"),
                width: *width,
                height: *height,
                file_size: None,
            })
            .collect();
        message
    }

    /// Put a message into a media-group batch, with an optional caption.
    pub fn in_batch(mut message: InboundMessage, batch_id: &str, caption: Option<&str>) -> InboundMessage {
        message.media_group_id = Some(batch_id.to_string());
        message.text = caption.map(str::to_string);
        message
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rentwatch_common::{
    AudioAsset, DocumentAsset, MediaKind, PhotoAsset, VideoAsset, VideoNoteAsset, VoiceAsset,
};

/// A monitored group as stored by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRecord {
    pub id: i64,
    pub chat_id: i64,
    pub title: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Group list endpoints answer either a bare array or a paginated
/// `{results: [...]}` envelope depending on backend configuration.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GroupListResponse {
    Plain(Vec<GroupRecord>),
    Paged { results: Vec<GroupRecord> },
}

impl GroupListResponse {
    pub fn into_records(self) -> Vec<GroupRecord> {
        match self {
            GroupListResponse::Plain(records) => records,
            GroupListResponse::Paged { results } => results,
        }
    }
}

/// Create-announcement response; only the id is consumed.
#[derive(Debug, Deserialize)]
pub struct AnnouncementRecord {
    pub id: i64,
}

/// Contact details attached to an announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub telegram_username: Option<String>,
    pub found_contacts: Vec<String>,
    pub user_id: i64,
}

/// Field-exact announcement create payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementPayload {
    pub group: i64,
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub message_text: String,
    pub message_id: i64,

    pub photos_data: Vec<PhotoAsset>,
    pub videos_data: Vec<VideoAsset>,
    pub documents_data: Vec<DocumentAsset>,
    pub audio_files_data: Vec<AudioAsset>,
    pub voice_messages_data: Vec<VoiceAsset>,
    pub video_notes_data: Vec<VideoNoteAsset>,

    pub rental_keywords_found: Vec<String>,
    pub confidence_score: f32,
    pub contact_info: ContactInfo,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_address: Option<String>,

    pub raw_telegram_data: serde_json::Value,

    pub is_processed: bool,
    pub is_verified: bool,
}

/// One per-asset media record, created after the announcement row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaRecordPayload {
    pub announcement: i64,
    pub media_type: MediaKind,
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub file_name: String,
    pub telegram_data: serde_json::Value,
    pub is_downloaded: bool,
}

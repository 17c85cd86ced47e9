//! Announcement persistence: one announcement row per accepted unit, then
//! one media record per asset.

use thiserror::Error;
use tracing::{info, warn};

use monitor_api_client::{AnnouncementPayload, ContactInfo, MediaRecordPayload};
use rentwatch_common::{AnalysisResult, InboundMessage, MediaAsset, MediaSet};

use crate::traits::AnnouncementStore;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("announcement create failed: {0}")]
    AnnouncementCreate(anyhow::Error),

    /// The announcement row exists but not a single media record of the
    /// batch could be written; escalated so operators see it.
    #[error("no media records saved ({total} attempted) for announcement {announcement_id}")]
    NoMediaSaved { announcement_id: i64, total: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistStats {
    pub announcement_id: i64,
    pub media_saved: usize,
    pub media_total: usize,
}

/// Write one announcement and its media records. Per-item media failures
/// are logged and counted but do not roll back the announcement; only the
/// zero-of-N case is escalated to an error.
pub async fn persist<S: AnnouncementStore + ?Sized>(
    store: &S,
    group_id: i64,
    primary: &InboundMessage,
    analysis: &AnalysisResult,
    media: &MediaSet,
    texts: &[String],
) -> Result<PersistStats, PersistError> {
    let payload = build_payload(group_id, primary, analysis, media, texts);

    let announcement_id = store
        .create_announcement(&payload)
        .await
        .map_err(PersistError::AnnouncementCreate)?;

    let assets = media.assets();
    let media_total = assets.len();
    let mut media_saved = 0;

    for asset in &assets {
        let record = media_record(announcement_id, asset);
        match store.create_media_record(&record).await {
            Ok(()) => media_saved += 1,
            Err(err) => warn!(
                announcement_id,
                file_id = %asset.file_id(),
                kind = %asset.kind(),
                error = %err,
                "media record create failed"
            ),
        }
    }

    if media_total > 0 && media_saved == 0 {
        return Err(PersistError::NoMediaSaved {
            announcement_id,
            total: media_total,
        });
    }

    info!(
        announcement_id,
        media_saved, media_total, "announcement persisted"
    );

    Ok(PersistStats {
        announcement_id,
        media_saved,
        media_total,
    })
}

fn build_payload(
    group_id: i64,
    primary: &InboundMessage,
    analysis: &AnalysisResult,
    media: &MediaSet,
    texts: &[String],
) -> AnnouncementPayload {
    let combined_text = texts
        .iter()
        .filter(|text| !text.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");

    AnnouncementPayload {
        group: group_id,
        user_id: primary.sender.id,
        username: primary.sender.username.clone().unwrap_or_default(),
        first_name: primary.sender.first_name.clone().unwrap_or_default(),
        last_name: primary.sender.last_name.clone().unwrap_or_default(),
        message_text: combined_text,
        message_id: primary.message_id,

        photos_data: media.photos.clone(),
        videos_data: media.videos.clone(),
        documents_data: media.documents.clone(),
        audio_files_data: media.audio_files.clone(),
        voice_messages_data: media.voice_messages.clone(),
        video_notes_data: media.video_notes.clone(),

        rental_keywords_found: analysis.keywords_found.clone(),
        confidence_score: analysis.confidence,
        contact_info: ContactInfo {
            telegram_username: primary.sender.username.clone(),
            found_contacts: analysis.contacts_found.clone(),
            user_id: primary.sender.id,
        },

        location_latitude: primary.location.as_ref().map(|l| l.latitude),
        location_longitude: primary.location.as_ref().map(|l| l.longitude),
        location_address: primary.location.as_ref().and_then(|l| l.address.clone()),

        raw_telegram_data: primary.raw.clone(),

        is_processed: false,
        is_verified: false,
    }
}

fn media_record(announcement: i64, asset: &MediaAsset) -> MediaRecordPayload {
    let mut record = MediaRecordPayload {
        announcement,
        media_type: asset.kind(),
        file_id: asset.file_id().to_string(),
        file_unique_id: asset.file_unique_id().to_string(),
        file_size: asset.file_size(),
        width: None,
        height: None,
        duration: None,
        length: None,
        performer: None,
        title: None,
        mime_type: None,
        download_url: asset.download_url().map(str::to_string),
        file_name: asset.suggested_file_name(),
        telegram_data: asset.to_json(),
        is_downloaded: false,
    };

    match asset {
        MediaAsset::Photo(photo) => {
            record.width = Some(photo.width);
            record.height = Some(photo.height);
        }
        MediaAsset::Video(video) => {
            record.width = Some(video.width);
            record.height = Some(video.height);
            record.duration = Some(video.duration);
            record.mime_type = video.mime_type.clone();
        }
        MediaAsset::Document(document) => {
            record.mime_type = document.mime_type.clone();
        }
        MediaAsset::Audio(audio) => {
            record.duration = Some(audio.duration);
            record.performer = audio.performer.clone();
            record.title = audio.title.clone();
        }
        MediaAsset::Voice(voice) => {
            record.duration = Some(voice.duration);
        }
        MediaAsset::VideoNote(note) => {
            record.length = Some(note.length);
            record.duration = Some(note.duration);
        }
    }

    record
}

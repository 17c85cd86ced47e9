//! Per-message media extraction.
//!
//! Each attachment present on a message becomes one asset: intrinsic
//! metadata from the descriptor plus a download URL resolved through the
//! FileResolver collaborator. Resolution failures are absorbed here — the
//! asset is still recorded for a later retry, just without a URL.

use tracing::{debug, warn};

use rentwatch_common::{
    AudioAsset, DocumentAsset, InboundMessage, MediaKind, MediaSet, PhotoAsset, ResolvedFile,
    VideoAsset, VideoNoteAsset, VoiceAsset,
};

use crate::traits::FileResolver;

/// Extract the media of one message. Never fails: a resolution error
/// downgrades that asset to metadata-only.
pub async fn extract<R: FileResolver + ?Sized>(
    message: &InboundMessage,
    resolver: &R,
) -> MediaSet {
    let mut media = MediaSet::default();

    // photo variants collapse to the largest by pixel count
    if let Some(photo) = message
        .photo
        .iter()
        .max_by_key(|variant| u64::from(variant.width) * u64::from(variant.height))
    {
        let (resolved, error) =
            resolve(resolver, &photo.file_id, MediaKind::Photo, message.message_id).await;
        media.photos.push(PhotoAsset {
            file_id: photo.file_id.clone(),
            file_unique_id: photo.file_unique_id.clone(),
            width: photo.width,
            height: photo.height,
            file_size: photo.file_size,
            download_url: resolved.as_ref().map(|f| f.download_url.clone()),
            file_path: resolved.as_ref().map(|f| f.file_path.clone()),
            resolve_error: error,
        });
    }

    if let Some(video) = &message.video {
        let (resolved, error) =
            resolve(resolver, &video.file_id, MediaKind::Video, message.message_id).await;
        media.videos.push(VideoAsset {
            file_id: video.file_id.clone(),
            file_unique_id: video.file_unique_id.clone(),
            width: video.width,
            height: video.height,
            duration: video.duration,
            mime_type: video.mime_type.clone(),
            file_size: video.file_size,
            download_url: resolved.as_ref().map(|f| f.download_url.clone()),
            file_path: resolved.as_ref().map(|f| f.file_path.clone()),
            resolve_error: error,
        });
    }

    if let Some(document) = &message.document {
        let (resolved, error) = resolve(
            resolver,
            &document.file_id,
            MediaKind::Document,
            message.message_id,
        )
        .await;
        media.documents.push(DocumentAsset {
            file_id: document.file_id.clone(),
            file_unique_id: document.file_unique_id.clone(),
            file_name: document.file_name.clone(),
            mime_type: document.mime_type.clone(),
            file_size: document.file_size,
            download_url: resolved.as_ref().map(|f| f.download_url.clone()),
            file_path: resolved.as_ref().map(|f| f.file_path.clone()),
            resolve_error: error,
        });
    }

    if let Some(audio) = &message.audio {
        let (resolved, error) =
            resolve(resolver, &audio.file_id, MediaKind::Audio, message.message_id).await;
        media.audio_files.push(AudioAsset {
            file_id: audio.file_id.clone(),
            file_unique_id: audio.file_unique_id.clone(),
            duration: audio.duration,
            performer: audio.performer.clone(),
            title: audio.title.clone(),
            file_size: audio.file_size,
            download_url: resolved.as_ref().map(|f| f.download_url.clone()),
            file_path: resolved.as_ref().map(|f| f.file_path.clone()),
            resolve_error: error,
        });
    }

    if let Some(voice) = &message.voice {
        let (resolved, error) =
            resolve(resolver, &voice.file_id, MediaKind::Voice, message.message_id).await;
        media.voice_messages.push(VoiceAsset {
            file_id: voice.file_id.clone(),
            file_unique_id: voice.file_unique_id.clone(),
            duration: voice.duration,
            file_size: voice.file_size,
            download_url: resolved.as_ref().map(|f| f.download_url.clone()),
            file_path: resolved.as_ref().map(|f| f.file_path.clone()),
            resolve_error: error,
        });
    }

    if let Some(video_note) = &message.video_note {
        let (resolved, error) = resolve(
            resolver,
            &video_note.file_id,
            MediaKind::VideoNote,
            message.message_id,
        )
        .await;
        media.video_notes.push(VideoNoteAsset {
            file_id: video_note.file_id.clone(),
            file_unique_id: video_note.file_unique_id.clone(),
            length: video_note.length,
            duration: video_note.duration,
            file_size: video_note.file_size,
            download_url: resolved.as_ref().map(|f| f.download_url.clone()),
            file_path: resolved.as_ref().map(|f| f.file_path.clone()),
            resolve_error: error,
        });
    }

    if !media.is_empty() {
        debug!(
            message_id = message.message_id,
            assets = media.len(),
            "extracted media from message"
        );
    }

    media
}

async fn resolve<R: FileResolver + ?Sized>(
    resolver: &R,
    file_id: &str,
    kind: MediaKind,
    message_id: i64,
) -> (Option<ResolvedFile>, Option<String>) {
    match resolver.resolve(file_id).await {
        Ok(file) => (Some(file), None),
        Err(err) => {
            warn!(
                file_id,
                kind = %kind,
                message_id,
                error = %err,
                "file resolution failed, keeping asset without download URL"
            );
            (None, Some(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, MockFileResolver};

    #[tokio::test]
    async fn picks_the_largest_photo_variant() {
        let resolver = MockFileResolver::new().on_file("big", "https://files/big.jpg");
        let message = messages::with_photo_variants(
            1,
            &[("thumb", 90, 60), ("big", 1280, 960), ("mid", 320, 240)],
        );

        let media = extract(&message, &resolver).await;

        assert_eq!(media.photos.len(), 1);
        let photo = &media.photos[0];
        assert_eq!(photo.file_id, "big");
        assert_eq!(photo.download_url.as_deref(), Some("https://files/big.jpg"));
        assert!(photo.resolve_error.is_none());
    }

    #[tokio::test]
    async fn resolution_failure_keeps_metadata_only_asset() {
        let resolver = MockFileResolver::new().fail_file("p1");
        let message = messages::with_photo_variants(2, &[("p1", 800, 600)]);

        let media = extract(&message, &resolver).await;

        assert_eq!(media.photos.len(), 1);
        let photo = &media.photos[0];
        assert_eq!(photo.width, 800);
        assert!(photo.download_url.is_none());
        assert!(photo.resolve_error.is_some());
    }

    #[tokio::test]
    async fn message_without_attachments_yields_empty_set() {
        let resolver = MockFileResolver::new();
        let message = messages::text_message(3, "shunchaki gap");

        let media = extract(&message, &resolver).await;

        assert!(media.is_empty());
    }

    #[tokio::test]
    async fn extracts_mixed_kinds_from_one_message() {
        let resolver = MockFileResolver::new()
            .on_file("ph", "https://files/ph.jpg")
            .on_file("vd", "https://files/vd.mp4");
        let mut message = messages::with_photo_variants(4, &[("ph", 640, 480)]);
        message.video = Some(rentwatch_common::VideoInfo {
            file_id: "vd".to_string(),
            file_unique_id: "u-vd".to_string(),
            width: 1920,
            height: 1080,
            duration: 12,
            mime_type: Some("video/mp4".to_string()),
            file_size: Some(1_000_000),
        });

        let media = extract(&message, &resolver).await;

        assert_eq!(media.len(), 2);
        assert_eq!(media.videos[0].download_url.as_deref(), Some("https://files/vd.mp4"));
    }
}

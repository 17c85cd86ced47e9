use serde::{Deserialize, Serialize};

// --- Message source types ---

/// Author of an inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Sender {
    /// A username counts only when it is non-empty.
    pub fn has_username(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
}

/// One resolution variant of a photo attachment. Messages carry several
/// sizes of the same image; extraction keeps only the largest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoVariant {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    pub duration: u32,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    pub file_id: String,
    pub file_unique_id: String,
    pub duration: u32,
    #[serde(default)]
    pub performer: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub file_id: String,
    pub file_unique_id: String,
    pub duration: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoNoteInfo {
    pub file_id: String,
    pub file_unique_id: String,
    /// Video notes are square; this is the side length in pixels.
    pub length: u32,
    pub duration: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Normalized message handed over by the capture layer. A message carries
/// at most one attachment per kind (the photo list holds size variants of
/// one image, not distinct photos).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message_id: i64,
    pub chat_id: i64,
    #[serde(default)]
    pub chat_title: Option<String>,
    /// Shared by the messages of one multi-attachment post.
    #[serde(default)]
    pub media_group_id: Option<String>,
    pub sender: Sender,
    /// Body text or media caption.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub photo: Vec<PhotoVariant>,
    #[serde(default)]
    pub video: Option<VideoInfo>,
    #[serde(default)]
    pub document: Option<DocumentInfo>,
    #[serde(default)]
    pub audio: Option<AudioInfo>,
    #[serde(default)]
    pub voice: Option<VoiceInfo>,
    #[serde(default)]
    pub video_note: Option<VideoNoteInfo>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    /// Verbatim source payload, retained for audit.
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl InboundMessage {
    /// Trimmed body text, or empty string when absent.
    pub fn text_content(&self) -> String {
        self.text.as_deref().unwrap_or("").trim().to_string()
    }

    /// Display title for the chat, falling back to a synthesized one.
    pub fn chat_title_or_default(&self) -> String {
        match self.chat_title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Group-{}", self.chat_id),
        }
    }

    /// Number of attachment kinds present. The photo variant list counts
    /// as one attachment.
    pub fn attachment_count(&self) -> usize {
        usize::from(!self.photo.is_empty())
            + usize::from(self.video.is_some())
            + usize::from(self.document.is_some())
            + usize::from(self.audio.is_some())
            + usize::from(self.voice.is_some())
            + usize::from(self.video_note.is_some())
    }
}

// --- Media kinds ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    Audio,
    Voice,
    VideoNote,
}

impl MediaKind {
    /// Backend discriminator string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::VideoNote => "video_note",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Resolved files and media assets ---

/// Result of resolving a provider file reference to a retrievable URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFile {
    pub file_id: String,
    pub file_path: String,
    pub download_url: String,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// An extracted attachment: intrinsic metadata plus the outcome of the
/// download-URL resolution. `download_url`/`file_path` are present only
/// when resolution succeeded; `resolve_error` keeps the failure reason for
/// a later retry by the downloader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAsset {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    pub duration: u32,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAsset {
    pub file_id: String,
    pub file_unique_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAsset {
    pub file_id: String,
    pub file_unique_id: String,
    pub duration: u32,
    pub performer: Option<String>,
    pub title: Option<String>,
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceAsset {
    pub file_id: String,
    pub file_unique_id: String,
    pub duration: u32,
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoNoteAsset {
    pub file_id: String,
    pub file_unique_id: String,
    pub length: u32,
    pub duration: u32,
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_error: Option<String>,
}

/// Tagged view over the six asset kinds, used where media of mixed kinds
/// flows through one code path (the per-record persistence fan-out).
#[derive(Debug, Clone, PartialEq)]
pub enum MediaAsset {
    Photo(PhotoAsset),
    Video(VideoAsset),
    Document(DocumentAsset),
    Audio(AudioAsset),
    Voice(VoiceAsset),
    VideoNote(VideoNoteAsset),
}

impl MediaAsset {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaAsset::Photo(_) => MediaKind::Photo,
            MediaAsset::Video(_) => MediaKind::Video,
            MediaAsset::Document(_) => MediaKind::Document,
            MediaAsset::Audio(_) => MediaKind::Audio,
            MediaAsset::Voice(_) => MediaKind::Voice,
            MediaAsset::VideoNote(_) => MediaKind::VideoNote,
        }
    }

    pub fn file_id(&self) -> &str {
        match self {
            MediaAsset::Photo(a) => &a.file_id,
            MediaAsset::Video(a) => &a.file_id,
            MediaAsset::Document(a) => &a.file_id,
            MediaAsset::Audio(a) => &a.file_id,
            MediaAsset::Voice(a) => &a.file_id,
            MediaAsset::VideoNote(a) => &a.file_id,
        }
    }

    pub fn file_unique_id(&self) -> &str {
        match self {
            MediaAsset::Photo(a) => &a.file_unique_id,
            MediaAsset::Video(a) => &a.file_unique_id,
            MediaAsset::Document(a) => &a.file_unique_id,
            MediaAsset::Audio(a) => &a.file_unique_id,
            MediaAsset::Voice(a) => &a.file_unique_id,
            MediaAsset::VideoNote(a) => &a.file_unique_id,
        }
    }

    pub fn file_size(&self) -> Option<u64> {
        match self {
            MediaAsset::Photo(a) => a.file_size,
            MediaAsset::Video(a) => a.file_size,
            MediaAsset::Document(a) => a.file_size,
            MediaAsset::Audio(a) => a.file_size,
            MediaAsset::Voice(a) => a.file_size,
            MediaAsset::VideoNote(a) => a.file_size,
        }
    }

    pub fn download_url(&self) -> Option<&str> {
        match self {
            MediaAsset::Photo(a) => a.download_url.as_deref(),
            MediaAsset::Video(a) => a.download_url.as_deref(),
            MediaAsset::Document(a) => a.download_url.as_deref(),
            MediaAsset::Audio(a) => a.download_url.as_deref(),
            MediaAsset::Voice(a) => a.download_url.as_deref(),
            MediaAsset::VideoNote(a) => a.download_url.as_deref(),
        }
    }

    /// File name for the downloader. Documents keep their original name
    /// when present; other kinds synthesize one from the file id.
    pub fn suggested_file_name(&self) -> String {
        let stub = |file_id: &str| file_id.get(..10).unwrap_or(file_id).to_string();
        match self {
            MediaAsset::Photo(a) => format!("photo_{}.jpg", stub(&a.file_id)),
            MediaAsset::Video(a) => format!("video_{}.mp4", stub(&a.file_id)),
            MediaAsset::Document(a) => a
                .file_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("document_{}", stub(&a.file_id))),
            MediaAsset::Audio(a) => format!("audio_{}.mp3", stub(&a.file_id)),
            MediaAsset::Voice(a) => format!("voice_{}.ogg", stub(&a.file_id)),
            MediaAsset::VideoNote(a) => format!("video_note_{}.mp4", stub(&a.file_id)),
        }
    }

    /// The kind-specific asset payload, serialized as-is for the backend's
    /// audit column.
    pub fn to_json(&self) -> serde_json::Value {
        let value = match self {
            MediaAsset::Photo(a) => serde_json::to_value(a),
            MediaAsset::Video(a) => serde_json::to_value(a),
            MediaAsset::Document(a) => serde_json::to_value(a),
            MediaAsset::Audio(a) => serde_json::to_value(a),
            MediaAsset::Voice(a) => serde_json::to_value(a),
            MediaAsset::VideoNote(a) => serde_json::to_value(a),
        };
        value.unwrap_or(serde_json::Value::Null)
    }
}

// --- Media sets ---

/// Extracted media for one message or one merged batch: six ordered
/// sequences, one per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSet {
    pub photos: Vec<PhotoAsset>,
    pub videos: Vec<VideoAsset>,
    pub documents: Vec<DocumentAsset>,
    pub audio_files: Vec<AudioAsset>,
    pub voice_messages: Vec<VoiceAsset>,
    pub video_notes: Vec<VideoNoteAsset>,
}

impl MediaSet {
    /// Combine per-message sets into one, kind by kind, preserving arrival
    /// order. No dedup by provider id: a batch is one author-authored post,
    /// repeats are the author's.
    pub fn merge(sets: impl IntoIterator<Item = MediaSet>) -> MediaSet {
        let mut merged = MediaSet::default();
        for set in sets {
            merged.photos.extend(set.photos);
            merged.videos.extend(set.videos);
            merged.documents.extend(set.documents);
            merged.audio_files.extend(set.audio_files);
            merged.voice_messages.extend(set.voice_messages);
            merged.video_notes.extend(set.video_notes);
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.photos.len()
            + self.videos.len()
            + self.documents.len()
            + self.audio_files.len()
            + self.voice_messages.len()
            + self.video_notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All assets flattened in persistence order: photos, videos,
    /// documents, audio, voice, video notes.
    pub fn assets(&self) -> Vec<MediaAsset> {
        let mut assets = Vec::with_capacity(self.len());
        assets.extend(self.photos.iter().cloned().map(MediaAsset::Photo));
        assets.extend(self.videos.iter().cloned().map(MediaAsset::Video));
        assets.extend(self.documents.iter().cloned().map(MediaAsset::Document));
        assets.extend(self.audio_files.iter().cloned().map(MediaAsset::Audio));
        assets.extend(self.voice_messages.iter().cloned().map(MediaAsset::Voice));
        assets.extend(self.video_notes.iter().cloned().map(MediaAsset::VideoNote));
        assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo_asset(file_id: &str) -> PhotoAsset {
        PhotoAsset {
            file_id: file_id.to_string(),
            file_unique_id: format!("u-{file_id}"),
            width: 800,
            height: 600,
            file_size: None,
            download_url: None,
            file_path: None,
            resolve_error: None,
        }
    }

    fn video_asset(file_id: &str) -> VideoAsset {
        VideoAsset {
            file_id: file_id.to_string(),
            file_unique_id: format!("u-{file_id}"),
            width: 1280,
            height: 720,
            duration: 30,
            mime_type: Some("video/mp4".to_string()),
            file_size: None,
            download_url: None,
            file_path: None,
            resolve_error: None,
        }
    }

    #[test]
    fn merge_preserves_arrival_order_per_kind() {
        let msg1 = MediaSet {
            photos: vec![photo_asset("p1")],
            ..MediaSet::default()
        };
        let msg2 = MediaSet {
            videos: vec![video_asset("v1")],
            ..MediaSet::default()
        };
        let msg3 = MediaSet {
            photos: vec![photo_asset("p2")],
            ..MediaSet::default()
        };

        let merged = MediaSet::merge([msg1, msg2, msg3]);

        let photo_ids: Vec<&str> = merged.photos.iter().map(|p| p.file_id.as_str()).collect();
        assert_eq!(photo_ids, vec!["p1", "p2"]);
        assert_eq!(merged.videos.len(), 1);
        assert_eq!(merged.videos[0].file_id, "v1");
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_keeps_repeated_provider_ids() {
        let a = MediaSet {
            photos: vec![photo_asset("same")],
            ..MediaSet::default()
        };
        let b = MediaSet {
            photos: vec![photo_asset("same")],
            ..MediaSet::default()
        };
        assert_eq!(MediaSet::merge([a, b]).photos.len(), 2);
    }

    #[test]
    fn assets_flatten_in_persistence_order() {
        let set = MediaSet {
            photos: vec![photo_asset("p1")],
            videos: vec![video_asset("v1")],
            ..MediaSet::default()
        };
        let kinds: Vec<MediaKind> = set.assets().iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec![MediaKind::Photo, MediaKind::Video]);
    }

    #[test]
    fn suggested_file_names_truncate_long_ids() {
        let asset = MediaAsset::Photo(photo_asset("AgACAgIAAxkBAAIB"));
        assert_eq!(asset.suggested_file_name(), "photo_AgACAgIAAx.jpg");

        let short = MediaAsset::Voice(VoiceAsset {
            file_id: "abc".to_string(),
            file_unique_id: "u-abc".to_string(),
            duration: 3,
            file_size: None,
            download_url: None,
            file_path: None,
            resolve_error: None,
        });
        assert_eq!(short.suggested_file_name(), "voice_abc.ogg");
    }

    #[test]
    fn document_keeps_its_own_file_name() {
        let doc = MediaAsset::Document(DocumentAsset {
            file_id: "docid12345678".to_string(),
            file_unique_id: "u-doc".to_string(),
            file_name: Some("floorplan.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
            file_size: Some(1024),
            download_url: None,
            file_path: None,
            resolve_error: None,
        });
        assert_eq!(doc.suggested_file_name(), "floorplan.pdf");
    }

    #[test]
    fn attachment_count_treats_photo_variants_as_one() {
        let message = InboundMessage {
            message_id: 1,
            chat_id: -100,
            chat_title: None,
            media_group_id: None,
            sender: Sender {
                id: 7,
                username: None,
                first_name: None,
                last_name: None,
            },
            text: None,
            photo: vec![
                PhotoVariant {
                    file_id: "small".to_string(),
                    file_unique_id: "u-s".to_string(),
                    width: 90,
                    height: 60,
                    file_size: None,
                },
                PhotoVariant {
                    file_id: "big".to_string(),
                    file_unique_id: "u-b".to_string(),
                    width: 1280,
                    height: 960,
                    file_size: None,
                },
            ],
            video: None,
            document: None,
            audio: None,
            voice: None,
            video_note: None,
            location: None,
            raw: serde_json::Value::Null,
        };
        assert_eq!(message.attachment_count(), 1);
    }

    #[test]
    fn failed_resolution_fields_are_omitted_from_json() {
        let asset = MediaAsset::Photo(photo_asset("p1"));
        let json = asset.to_json();
        assert!(json.get("download_url").is_none());
        assert!(json.get("resolve_error").is_none());
        // intrinsic optionals stay present as null
        assert!(json.get("file_size").is_some());
    }
}

//! Orchestration of the two processing paths: one-off messages and
//! debounce-collected media-group batches. Both share the same
//! extract → analyze → decide → persist spine.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use rentwatch_common::{AnalysisResult, Decision, InboundMessage, MediaSet};

use crate::traits::{AnnouncementStore, FileResolver};
use crate::{analyzer, media, persister, resolver};

pub struct Pipeline<R, S> {
    resolver: Arc<R>,
    store: Arc<S>,
}

impl<R: FileResolver, S: AnnouncementStore> Pipeline<R, S> {
    pub fn new(resolver: Arc<R>, store: Arc<S>) -> Self {
        Self { resolver, store }
    }

    /// Process a message that is not part of a media group.
    pub async fn process_single(&self, message: &InboundMessage) -> Result<()> {
        let group_id = resolver::upsert_group(
            self.store.as_ref(),
            message.chat_id,
            &message.chat_title_or_default(),
        )
        .await?;

        let media = media::extract(message, self.resolver.as_ref()).await;
        let text = message.text_content();
        let analysis = analyzer::analyze(&text, &message.sender, media.len());

        let texts = if text.is_empty() { vec![] } else { vec![text] };
        self.decide_and_persist(group_id, message, analysis, media, texts)
            .await
    }

    /// Process a finalized media-group batch. The first message is the
    /// primary one: its sender and location go into the announcement.
    pub async fn process_batch(&self, batch: &[InboundMessage]) -> Result<()> {
        let Some(primary) = batch.first() else {
            return Ok(());
        };

        let group_id = resolver::upsert_group(
            self.store.as_ref(),
            primary.chat_id,
            &primary.chat_title_or_default(),
        )
        .await?;

        let mut sets = Vec::with_capacity(batch.len());
        let mut texts = Vec::new();
        for message in batch {
            sets.push(media::extract(message, self.resolver.as_ref()).await);
            let text = message.text_content();
            if !text.is_empty() {
                texts.push(text);
            }
        }

        let merged = MediaSet::merge(sets);
        let combined_text = texts.join("\n");
        let analysis = analyzer::analyze(&combined_text, &primary.sender, merged.len());

        self.decide_and_persist(group_id, primary, analysis, merged, texts)
            .await
    }

    async fn decide_and_persist(
        &self,
        group_id: i64,
        primary: &InboundMessage,
        analysis: AnalysisResult,
        media: MediaSet,
        texts: Vec<String>,
    ) -> Result<()> {
        let decision = Decision::from_score(analysis.confidence);
        let confidence_pct = (analysis.confidence * 100.0) as u32;

        if !decision.should_persist() {
            info!(
                message_id = primary.message_id,
                chat_id = primary.chat_id,
                confidence_pct,
                "confidence too low, skipping"
            );
            return Ok(());
        }

        let stats = persister::persist(
            self.store.as_ref(),
            group_id,
            primary,
            &analysis,
            &media,
            &texts,
        )
        .await?;

        let keyword_preview = analysis.keywords_found
            [..analysis.keywords_found.len().min(5)]
            .join(", ");
        info!(
            announcement_id = stats.announcement_id,
            chat_id = primary.chat_id,
            sender_id = primary.sender.id,
            confidence_pct,
            decision = ?decision,
            media_saved = stats.media_saved,
            media_total = stats.media_total,
            keywords = %keyword_preview,
            "rental announcement saved"
        );
        Ok(())
    }
}

//! Media-group aggregation.
//!
//! Messages sharing a media_group_id are one logical post split across
//! several attachments. They are buffered per batch id and finalized only
//! after a quiet period with no further arrivals; every arrival restarts
//! the timer. Messages without a batch id bypass the buffer entirely.
//!
//! The batch map is the only shared mutable state. All mutations happen
//! under one async mutex, and the old timer is aborted under that lock
//! before its replacement is armed, so a given batch instance can never
//! be finalized twice.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use rentwatch_common::InboundMessage;

use crate::pipeline::Pipeline;
use crate::traits::{AnnouncementStore, FileResolver};

struct PendingBatch {
    messages: Vec<InboundMessage>,
    timer: JoinHandle<()>,
}

struct Inner<R, S> {
    pipeline: Pipeline<R, S>,
    batches: Mutex<HashMap<String, PendingBatch>>,
    debounce: Duration,
}

/// Cheap to clone; clones share the batch map.
pub struct Aggregator<R, S> {
    inner: Arc<Inner<R, S>>,
}

impl<R, S> Clone for Aggregator<R, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, S> Aggregator<R, S>
where
    R: FileResolver + 'static,
    S: AnnouncementStore + 'static,
{
    pub fn new(pipeline: Pipeline<R, S>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                pipeline,
                batches: Mutex::new(HashMap::new()),
                debounce,
            }),
        }
    }

    /// Route one inbound message. Returns as soon as the message is
    /// buffered or its processing task is spawned; unrelated messages and
    /// batches never wait on each other.
    pub async fn on_message(&self, message: InboundMessage) {
        let Some(batch_id) = message.media_group_id.clone() else {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                if let Err(err) = inner.pipeline.process_single(&message).await {
                    error!(
                        message_id = message.message_id,
                        chat_id = message.chat_id,
                        error = ?err,
                        "message processing failed"
                    );
                }
            });
            return;
        };

        let mut batches = self.inner.batches.lock().await;
        match batches.get_mut(&batch_id) {
            Some(pending) => {
                pending.messages.push(message);
                // abort before arming: at no point do two timers exist
                pending.timer.abort();
                pending.timer = arm_timer(&self.inner, batch_id.clone());
                debug!(
                    batch_id = %batch_id,
                    buffered = pending.messages.len(),
                    "media group timer restarted"
                );
            }
            None => {
                debug!(batch_id = %batch_id, "new media group window opened");
                let timer = arm_timer(&self.inner, batch_id.clone());
                batches.insert(
                    batch_id,
                    PendingBatch {
                        messages: vec![message],
                        timer,
                    },
                );
            }
        }
    }

    /// Number of batches currently collecting.
    pub async fn pending_batches(&self) -> usize {
        self.inner.batches.lock().await.len()
    }
}

fn arm_timer<R, S>(inner: &Arc<Inner<R, S>>, batch_id: String) -> JoinHandle<()>
where
    R: FileResolver + 'static,
    S: AnnouncementStore + 'static,
{
    let inner = Arc::clone(inner);
    tokio::spawn(async move {
        tokio::time::sleep(inner.debounce).await;
        finalize(&inner, &batch_id).await;
    })
}

/// Take the batch out of the map, then process it. Removal precedes
/// processing, so the entry is cleared whatever the outcome.
async fn finalize<R, S>(inner: &Inner<R, S>, batch_id: &str)
where
    R: FileResolver + 'static,
    S: AnnouncementStore + 'static,
{
    let pending = inner.batches.lock().await.remove(batch_id);
    let Some(pending) = pending else {
        // superseded by a newer arrival's timer
        return;
    };

    info!(
        batch_id,
        messages = pending.messages.len(),
        "media group window closed, processing batch"
    );

    if let Err(err) = inner.pipeline.process_batch(&pending.messages).await {
        error!(batch_id, error = ?err, "media group processing failed");
    }
}

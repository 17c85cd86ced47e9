//! Group resolution: external chat id → internal group id.

use anyhow::{bail, Result};
use tracing::info;

use crate::traits::AnnouncementStore;

/// Idempotent upsert. Existing groups keep their stored title; a repeat
/// sighting never updates it. After a create, the canonical internal id
/// is read back by chat id instead of trusting the create response.
pub async fn upsert_group<S: AnnouncementStore + ?Sized>(
    store: &S,
    chat_id: i64,
    title: &str,
) -> Result<i64> {
    if let Some(id) = store.find_group(chat_id).await? {
        return Ok(id);
    }

    info!(chat_id, title, "registering new monitored group");
    store.create_group(chat_id, title).await?;

    match store.find_group(chat_id).await? {
        Some(id) => Ok(id),
        None => bail!("group {chat_id} not found after create"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStore;

    #[tokio::test]
    async fn creates_group_on_first_sight() {
        let store = MockStore::new();
        let id = upsert_group(&store, -100123, "Ijara e'lonlari").await.unwrap();
        assert_eq!(store.group_count(), 1);
        assert_eq!(store.group_title(-100123).as_deref(), Some("Ijara e'lonlari"));
        assert!(id > 0);
    }

    #[tokio::test]
    async fn repeat_sightings_return_the_same_id_without_a_second_record() {
        let store = MockStore::new();
        let first = upsert_group(&store, -100123, "Ijara e'lonlari").await.unwrap();
        let second = upsert_group(&store, -100123, "Renamed group").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.group_count(), 1);
        // stale title is accepted
        assert_eq!(store.group_title(-100123).as_deref(), Some("Ijara e'lonlari"));
    }

    #[tokio::test]
    async fn distinct_chats_get_distinct_ids() {
        let store = MockStore::new();
        let a = upsert_group(&store, -1, "a").await.unwrap();
        let b = upsert_group(&store, -2, "b").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.group_count(), 2);
    }

    #[tokio::test]
    async fn create_failure_propagates() {
        let store = MockStore::new().fail_group_create();
        assert!(upsert_group(&store, -5, "x").await.is_err());
        assert_eq!(store.group_count(), 0);
    }
}

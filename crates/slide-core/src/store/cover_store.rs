// ── Central reactive cover store ──
//
// Thread-safe, lock-free storage for every managed cover.
// Mutations are broadcast to subscribers via `watch` channels.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{Cover, CoverBackend, CoverId, MoveIntent};
use crate::stream::EntityStream;

/// Central reactive store for all covers.
///
/// Covers are keyed by [`CoverId`] and additionally indexed by their
/// backend address, so a poll result for a host or a cloud id finds its
/// cover without a scan. A cover is never mutated in place; every update
/// publishes a fresh record.
pub struct CoverStore {
    pub(crate) covers: EntityCollection<Cover>,
    pub(crate) last_poll: watch::Sender<Option<DateTime<Utc>>>,
}

impl CoverStore {
    pub fn new() -> Self {
        let (last_poll, _) = watch::channel(None);

        Self {
            covers: EntityCollection::new(),
            last_poll,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    /// All covers, ordered by id.
    pub fn covers_snapshot(&self) -> Arc<Vec<Arc<Cover>>> {
        self.covers.snapshot()
    }

    // ── Single-cover lookups ─────────────────────────────────────────

    pub fn cover(&self, id: &CoverId) -> Option<Arc<Cover>> {
        self.covers.get_by_key(id.as_str())
    }

    pub fn cover_by_backend(&self, backend: &CoverBackend) -> Option<Arc<Cover>> {
        self.covers.get_by_alias(&backend.alias())
    }

    /// Resolve a user-supplied identifier.
    ///
    /// Tried in order: cover id, local host, cloud numeric id, then a
    /// case-insensitive name match.
    pub fn find(&self, identifier: &str) -> Option<Arc<Cover>> {
        if let Some(cover) = self.covers.get_by_key(identifier) {
            return Some(cover);
        }
        let by_host = CoverBackend::Local {
            host: identifier.to_owned(),
        };
        if let Some(cover) = self.cover_by_backend(&by_host) {
            return Some(cover);
        }
        if let Ok(slide_id) = identifier.parse::<i64>() {
            if let Some(cover) = self.cover_by_backend(&CoverBackend::Cloud { slide_id }) {
                return Some(cover);
            }
        }
        self.covers
            .snapshot()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(identifier))
            .cloned()
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn cover_count(&self) -> usize {
        self.covers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covers.is_empty()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_covers(&self) -> EntityStream<Cover> {
        EntityStream::new(self.covers.subscribe())
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_poll(&self) -> Option<DateTime<Utc>> {
        *self.last_poll.borrow()
    }

    /// How long ago the last poll cycle finished, or `None` if never polled.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_poll().map(|t| Utc::now() - t)
    }

    // ── Mutations (controller only) ──────────────────────────────────

    /// Insert a cover or replace the one with the same id.
    pub(crate) fn insert(&self, cover: Cover) -> bool {
        let key = cover.id.as_str().to_owned();
        let alias = cover.backend.alias();
        self.covers.upsert(key, alias, cover)
    }

    pub(crate) fn update(&self, id: &CoverId, f: impl FnOnce(&mut Cover)) -> Option<Arc<Cover>> {
        self.covers.modify(id.as_str(), f)
    }

    pub(crate) fn remove(&self, id: &CoverId) -> Option<Arc<Cover>> {
        self.covers.remove(id.as_str())
    }

    pub(crate) fn apply_intent(&self, id: &CoverId, intent: MoveIntent) -> Option<Arc<Cover>> {
        self.update(id, |cover| cover.apply_intent(intent))
    }

    pub(crate) fn mark_offline(&self, id: &CoverId) -> Option<Arc<Cover>> {
        self.update(id, |cover| cover.set_online(false))
    }

    pub(crate) fn mark_polled(&self) {
        let _ = self.last_poll.send(Some(Utc::now()));
    }

    pub(crate) fn clear(&self) {
        self.covers.clear();
        let _ = self.last_poll.send(None);
    }
}

impl Default for CoverStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::CoverStatus;

    fn store_with_two() -> CoverStore {
        let store = CoverStore::new();
        store.insert(Cover::new(
            CoverId::from("aa"),
            "Living room",
            CoverBackend::Cloud { slide_id: 12 },
        ));
        store.insert(Cover::new(
            CoverId::from("slide_bb"),
            "192.168.1.40",
            CoverBackend::Local {
                host: "192.168.1.40".into(),
            },
        ));
        store
    }

    #[test]
    fn find_by_every_identifier() {
        let store = store_with_two();
        assert_eq!(store.find("aa").unwrap().id.as_str(), "aa");
        assert_eq!(store.find("12").unwrap().id.as_str(), "aa");
        assert_eq!(store.find("living ROOM").unwrap().id.as_str(), "aa");
        assert_eq!(store.find("192.168.1.40").unwrap().id.as_str(), "slide_bb");
        assert!(store.find("kitchen").is_none());
    }

    #[test]
    fn snapshot_is_ordered_by_id() {
        let store = store_with_two();
        let ids: Vec<String> = store
            .covers_snapshot()
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["aa", "slide_bb"]);
    }

    #[test]
    fn intent_and_offline_publish_new_records() {
        let store = store_with_two();
        let id = CoverId::from("aa");
        let before = store.cover(&id).unwrap();

        let after = store.apply_intent(&id, MoveIntent::Close).unwrap();
        assert_eq!(after.status, CoverStatus::Closing);
        assert_eq!(before.status, CoverStatus::Unknown);

        store.update(&id, |c| c.online = true);
        assert!(!store.mark_offline(&id).unwrap().online);
        assert!(store.mark_offline(&CoverId::from("nope")).is_none());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = store_with_two();
        let mut stream = store.subscribe_covers();
        assert_eq!(stream.current().len(), 2);

        store.remove(&CoverId::from("aa"));
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn clear_resets_metadata() {
        let store = store_with_two();
        store.mark_polled();
        assert!(store.data_age().is_some());

        store.clear();
        assert!(store.is_empty());
        assert!(store.last_poll().is_none());
    }
}

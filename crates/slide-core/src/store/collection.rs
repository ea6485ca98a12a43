// ── Generic reactive entity collection ──
//
// Lock-free concurrent storage with O(1) lookups and push-based
// change notification via `watch` channels.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A lock-free, reactive collection for a single entity type.
///
/// Uses `DashMap` for O(1) concurrent lookups and `watch` channels
/// for push-based change notification. Every mutation rebuilds the
/// snapshot that subscribers receive.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    /// Primary storage: key string -> entity.
    by_key: DashMap<String, Arc<T>>,

    /// Secondary index: alias -> key string.
    /// Aliases are backend addresses such as `"cloud:{id}"` or `"local:{host}"`.
    alias_to_key: DashMap<String, String>,

    /// Reverse of `alias_to_key` for efficient removal.
    key_to_alias: DashMap<String, String>,

    /// Full snapshot ordered by key, rebuilt on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_key: DashMap::new(),
            alias_to_key: DashMap::new(),
            key_to_alias: DashMap::new(),
            snapshot,
        }
    }

    /// Insert or replace an entity. Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: String, alias: String, entity: T) -> bool {
        // Drop a stale alias if the key was previously reachable under another one.
        if let Some(old_alias) = self.key_to_alias.get(&key) {
            if *old_alias != alias {
                self.alias_to_key.remove(old_alias.as_str());
            }
        }

        let is_new = !self.by_key.contains_key(&key);
        self.by_key.insert(key.clone(), Arc::new(entity));
        self.alias_to_key.insert(alias.clone(), key.clone());
        self.key_to_alias.insert(key, alias);

        self.rebuild_snapshot();

        is_new
    }

    /// Replace an existing entity with a modified copy.
    ///
    /// Readers holding the previous `Arc` keep a consistent view; the
    /// entity is never mutated in place. Returns `None` if the key is absent.
    pub(crate) fn modify(&self, key: &str, f: impl FnOnce(&mut T)) -> Option<Arc<T>> {
        let updated = {
            let mut entry = self.by_key.get_mut(key)?;
            let mut next = T::clone(entry.value());
            f(&mut next);
            let next = Arc::new(next);
            *entry.value_mut() = Arc::clone(&next);
            next
        };

        self.rebuild_snapshot();
        Some(updated)
    }

    /// Remove an entity by key. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, key: &str) -> Option<Arc<T>> {
        let removed = self.by_key.remove(key).map(|(_, v)| v);
        if removed.is_some() {
            if let Some((_, alias)) = self.key_to_alias.remove(key) {
                self.alias_to_key.remove(&alias);
            }
            self.rebuild_snapshot();
        }
        removed
    }

    /// Look up an entity by its primary key string.
    pub(crate) fn get_by_key(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Look up an entity by its alias (secondary index).
    pub(crate) fn get_by_alias(&self, alias: &str) -> Option<Arc<T>> {
        let key = self.alias_to_key.get(alias)?;
        self.by_key
            .get(key.value().as_str())
            .map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    /// Remove all entities.
    pub(crate) fn clear(&self) {
        self.by_key.clear();
        self.alias_to_key.clear();
        self.key_to_alias.clear();
        self.rebuild_snapshot();
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all values into a key-ordered snapshot and broadcast it.
    fn rebuild_snapshot(&self) {
        let mut entries: Vec<(String, Arc<T>)> = self
            .by_key
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let values: Vec<Arc<T>> = entries.into_iter().map(|(_, v)| v).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

//! In-memory reactive container for one entity collection.
//!
//! The store is the single writer of its collection. Every mutation builds a
//! new `Vec` behind a new `Arc`, so readers holding an older [`Snapshot`] are
//! never affected and `Arc::ptr_eq` is a valid change test. Readers either
//! pull with [`EntityStore::snapshot`] or wait on a [`StoreSubscription`].

use std::sync::Arc;
use tokio::sync::watch;

use crate::entity::{Entity, EntityPatch};

/// Immutable view of a store's contents at one instant.
pub type Snapshot<T> = Arc<Vec<T>>;

/// Ordered, id-unique list of entities with change notification.
pub struct EntityStore<T: Entity> {
    tx: watch::Sender<Snapshot<T>>,
}

/// What a create reconciliation did with the server's entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reconciled {
    /// Replaced the temporary entry in place.
    Replaced,
    /// Temporary entry was gone; an entry with the server id was overwritten.
    Merged,
    /// Temporary entry was gone; the server entity was prepended.
    Prepended,
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<T>) -> Self {
        let (tx, _) = watch::channel(Arc::new(dedupe(items)));
        Self { tx }
    }

    /// Current ordered list.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.tx.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.tx.borrow().iter().find(|e| e.id() == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tx.borrow().iter().any(|e| e.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tx.borrow().iter().position(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Registers a reader. The subscription sees every snapshot published
    /// after this call; a slow reader skips straight to the latest one.
    pub fn subscribe(&self) -> StoreSubscription<T> {
        StoreSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Swaps the whole collection. Duplicate ids keep their first occurrence.
    pub fn replace(&self, items: Vec<T>) {
        self.tx.send_replace(Arc::new(dedupe(items)));
    }

    /// Inserts `item` at the front (or back). An entry with the same id is
    /// overwritten in place instead, so ids stay unique.
    pub fn apply_insert(&self, item: T, at_front: bool) {
        self.tx.send_modify(|current| {
            let mut next = current.as_ref().clone();
            match next.iter().position(|e| e.id() == item.id()) {
                Some(pos) => {
                    tracing::warn!(
                        "{}: insert of existing id {} overwrites it in place",
                        T::COLLECTION,
                        item.id()
                    );
                    next[pos] = item;
                }
                None if at_front => next.insert(0, item),
                None => next.push(item),
            }
            *current = Arc::new(next);
        });
    }

    /// Applies `patch` to the entry with `id`. Returns false (and publishes
    /// nothing) if the id is unknown.
    pub fn apply_update(&self, id: &str, patch: &T::Patch) -> bool {
        let applied = self.tx.send_if_modified(|current| {
            let Some(pos) = current.iter().position(|e| e.id() == id) else {
                return false;
            };
            let mut next = current.as_ref().clone();
            patch.apply(&mut next[pos]);
            *current = Arc::new(next);
            true
        });
        if !applied {
            tracing::debug!("{}: update of unknown id {} ignored", T::COLLECTION, id);
        }
        applied
    }

    /// Replaces the entry with `id` by `item`, keeping its position. Returns
    /// false if the id is unknown.
    pub fn apply_replace(&self, id: &str, item: T) -> bool {
        let applied = self.tx.send_if_modified(|current| {
            let Some(pos) = current.iter().position(|e| e.id() == id) else {
                return false;
            };
            let mut next = current.as_ref().clone();
            let new_id = item.id().to_string();
            next[pos] = item;
            if new_id != id {
                remove_other(&mut next, &new_id, pos);
            }
            *current = Arc::new(next);
            true
        });
        if !applied {
            tracing::debug!("{}: replace of unknown id {} ignored", T::COLLECTION, id);
        }
        applied
    }

    /// Removes the entry with `id`. Returns false if the id is unknown.
    pub fn apply_remove(&self, id: &str) -> bool {
        let removed = self.tx.send_if_modified(|current| {
            if !current.iter().any(|e| e.id() == id) {
                return false;
            }
            let next: Vec<T> = current.iter().filter(|e| e.id() != id).cloned().collect();
            *current = Arc::new(next);
            true
        });
        if !removed {
            tracing::debug!("{}: remove of unknown id {} ignored", T::COLLECTION, id);
        }
        removed
    }

    /// Swaps a temporary entry for the server's entity after a successful
    /// create.
    pub(crate) fn reconcile_created(&self, temp_id: &str, server: T) -> Reconciled {
        let mut outcome = Reconciled::Prepended;
        self.tx.send_modify(|current| {
            let mut next = current.as_ref().clone();
            let server_id = server.id().to_string();
            if let Some(pos) = next.iter().position(|e| e.id() == temp_id) {
                next[pos] = server;
                remove_other(&mut next, &server_id, pos);
                outcome = Reconciled::Replaced;
            } else if let Some(pos) = next.iter().position(|e| e.id() == server_id) {
                next[pos] = server;
                outcome = Reconciled::Merged;
            } else {
                next.insert(0, server);
            }
            *current = Arc::new(next);
        });
        outcome
    }
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops every entry with `id` except the one at `keep`.
fn remove_other<T: Entity>(items: &mut Vec<T>, id: &str, keep: usize) {
    let mut index = 0;
    items.retain(|e| {
        let retain = index == keep || e.id() != id;
        index += 1;
        retain
    });
}

fn dedupe<T: Entity>(items: Vec<T>) -> Vec<T> {
    let before = items.len();
    let mut seen = std::collections::HashSet::new();
    let unique: Vec<T> = items
        .into_iter()
        .filter(|e| seen.insert(e.id().to_string()))
        .collect();
    if unique.len() < before {
        tracing::warn!(
            "{}: dropped {} duplicate id(s)",
            T::COLLECTION,
            before - unique.len()
        );
    }
    unique
}

/// Change stream for one store.
pub struct StoreSubscription<T> {
    rx: watch::Receiver<Snapshot<T>>,
}

impl<T> StoreSubscription<T> {
    /// Waits for the next published snapshot. Returns `None` once the store
    /// has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// True if a snapshot was published since the last `changed`/`current`.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Latest snapshot; marks it as seen.
    pub fn current(&mut self) -> Snapshot<T> {
        self.rx.borrow_and_update().clone()
    }
}

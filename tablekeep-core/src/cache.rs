//! On-device persistence of a store's snapshot.
//!
//! Writes are best effort: a failed write is logged and the in-memory store
//! stays authoritative. Reads run an integrity pass: records that no longer
//! deserialize are discarded, and foreign keys that no longer resolve are
//! pointed at the first entry of their catalog. The repaired list is written
//! back so the repair only happens once.

use serde_json::Value;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use crate::catalog::CatalogSnapshot;
use crate::entity::Entity;
use crate::storage::DurableStorage;
use crate::store::EntityStore;

/// Namespace for every cache key.
pub const KEY_PREFIX: &str = "tablekeep";

pub struct DurableCache<T> {
    storage: Arc<dyn DurableStorage>,
    key: String,
    /// Held across snapshot and write so writes land in snapshot order.
    write_lock: Mutex<()>,
    _entity: PhantomData<fn() -> T>,
}

/// Counters from one restore, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub seeded: bool,
    pub kept: usize,
    pub discarded: usize,
    pub repaired_keys: usize,
}

impl<T: Entity> DurableCache<T> {
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            storage,
            key: format!("{}.{}", KEY_PREFIX, T::COLLECTION),
            write_lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serializes `items` under this collection's key. Returns false if the
    /// write failed; the failure itself is only logged.
    pub fn persist(&self, items: &[T]) -> bool {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write(items)
    }

    /// Writes the store's current snapshot. The snapshot is taken under the
    /// write lock, so concurrent callers can never leave an older snapshot
    /// on disk after a newer one.
    pub fn persist_latest(&self, store: &EntityStore<T>) -> bool {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write(&store.snapshot())
    }

    fn write(&self, items: &[T]) -> bool {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("{}: failed to serialize cache: {}", T::COLLECTION, e);
                return false;
            }
        };
        match self.storage.set(&self.key, &json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("{}: failed to write cache: {}", T::COLLECTION, e);
                false
            }
        }
    }

    /// Reads the cached list, falling back to `seed` when nothing usable is
    /// stored, and repairs dangling foreign keys against `catalogs`.
    pub fn restore(&self, seed: Vec<T>, catalogs: &CatalogSnapshot) -> Vec<T> {
        self.restore_with_report(seed, catalogs).0
    }

    pub fn restore_with_report(
        &self,
        seed: Vec<T>,
        catalogs: &CatalogSnapshot,
    ) -> (Vec<T>, RestoreReport) {
        let records = match self.read_records() {
            Some(records) => records,
            None => {
                tracing::info!(
                    "{}: no usable cache, seeding {} record(s)",
                    T::COLLECTION,
                    seed.len()
                );
                self.persist(&seed);
                let report = RestoreReport {
                    seeded: true,
                    kept: seed.len(),
                    ..Default::default()
                };
                return (seed, report);
            }
        };

        let mut report = RestoreReport::default();
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(records.len());

        for record in records {
            let item = match serde_json::from_value::<T>(record) {
                Ok(item) => item,
                Err(e) => {
                    tracing::debug!("{}: discarding cached record: {}", T::COLLECTION, e);
                    report.discarded += 1;
                    continue;
                }
            };
            if let Err(e) = item.validate() {
                tracing::debug!(
                    "{}: discarding cached record {}: {}",
                    T::COLLECTION,
                    item.id(),
                    e
                );
                report.discarded += 1;
                continue;
            }
            if !seen.insert(item.id().to_string()) {
                report.discarded += 1;
                continue;
            }
            items.push(item);
        }

        for item in items.iter_mut() {
            report.repaired_keys += repair_foreign_keys(item, catalogs);
        }
        report.kept = items.len();

        if report.discarded > 0 || report.repaired_keys > 0 {
            tracing::warn!(
                "{}: restored {} record(s), discarded {}, repaired {} reference(s)",
                T::COLLECTION,
                report.kept,
                report.discarded,
                report.repaired_keys
            );
        }

        self.persist(&items);
        (items, report)
    }

    /// Drops the cached entry.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!("{}: failed to clear cache: {}", T::COLLECTION, e);
        }
    }

    /// The stored JSON array, or `None` when missing, unparsable, not an
    /// array, or empty.
    fn read_records(&self) -> Option<Vec<Value>> {
        let raw = self.storage.get(&self.key)?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) if !records.is_empty() => Some(records),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("{}: cache is not valid JSON: {}", T::COLLECTION, e);
                None
            }
        }
    }
}

/// Points every unresolved foreign key at the first entry of its catalog.
/// Kinds absent from the snapshot are left alone. Returns the number of
/// keys rewritten.
fn repair_foreign_keys<T: Entity>(item: &mut T, catalogs: &CatalogSnapshot) -> usize {
    let id = item.id().to_string();
    let mut repaired = 0;

    for (kind, key) in item.foreign_keys_mut() {
        if !catalogs.contains_kind(kind) || catalogs.resolve(kind, key.as_str()).is_some() {
            continue;
        }
        match catalogs.first(kind) {
            Some(first) => {
                tracing::warn!(
                    "{} {}: unknown {} reference '{}', using '{}'",
                    T::COLLECTION,
                    id,
                    kind,
                    key,
                    first.id
                );
                *key = first.id.clone();
                repaired += 1;
            }
            None => {
                tracing::warn!(
                    "{} {}: unknown {} reference '{}' left as is, catalog is empty",
                    T::COLLECTION,
                    id,
                    kind,
                    key
                );
            }
        }
    }

    repaired
}

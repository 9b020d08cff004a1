//! One resource kind, wired end to end.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::cache::DurableCache;
use crate::catalog::CatalogSnapshot;
use crate::enrich::{enrich_all, Enrich};
use crate::entity::Entity;
use crate::remote::RemoteSource;
use crate::storage::DurableStorage;
use crate::store::{EntityStore, Snapshot};
use crate::sync::{LoadOutcome, SyncEngine};

/// Store, cache and engine for a single entity kind.
///
/// Build one per kind at start-up and hand out references; nothing in the
/// crate holds these globally.
pub struct Resource<T: Entity, R> {
    store: Arc<EntityStore<T>>,
    cache: Arc<DurableCache<T>>,
    engine: SyncEngine<T, R>,
}

impl<T: Entity, R: RemoteSource<T>> Resource<T, R> {
    pub fn new(storage: Arc<dyn DurableStorage>, remote: Arc<R>) -> Self {
        let store = Arc::new(EntityStore::new());
        let cache = Arc::new(DurableCache::new(storage));
        let engine = SyncEngine::new(store.clone(), cache.clone(), remote);
        Self {
            store,
            cache,
            engine,
        }
    }

    /// Fills the store from the cache, or from `seed` when the cache holds
    /// nothing usable.
    pub fn boot(&self, seed: Vec<T>, catalogs: &CatalogSnapshot) -> Snapshot<T> {
        let items = self.cache.restore(seed, catalogs);
        tracing::debug!("{}: booted with {} record(s)", T::COLLECTION, items.len());
        self.store.replace(items);
        self.store.snapshot()
    }

    pub fn spawn_refresh(&self) -> JoinHandle<LoadOutcome> {
        self.engine.spawn_load_all()
    }

    pub fn store(&self) -> &Arc<EntityStore<T>> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<DurableCache<T>> {
        &self.cache
    }

    pub fn engine(&self) -> &SyncEngine<T, R> {
        &self.engine
    }

    pub fn views(&self, catalogs: &CatalogSnapshot) -> Vec<T::View>
    where
        T: Enrich,
    {
        enrich_all(&self.store.snapshot(), catalogs)
    }
}

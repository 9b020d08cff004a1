use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{Completion, SyncError, TempIdStrategy};
use crate::cache::DurableCache;
use crate::entity::{Entity, EntityPatch};
use crate::remote::RemoteSource;
use crate::store::{EntityStore, Snapshot};

/// Where the data in the store came from after a [`SyncEngine::load_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The server answered with this many records.
    Remote(usize),
    /// The server could not be used; the store still holds cached data.
    CacheOnly,
}

impl LoadOutcome {
    pub fn is_remote(&self) -> bool {
        matches!(self, LoadOutcome::Remote(_))
    }
}

/// Applies mutations to the local store first and tells the server after.
///
/// Each mutator changes the [`EntityStore`] and the cache before it
/// returns, then sends the request from a spawned task. The returned
/// [`Completion`] carries the server's verdict. A failed request never
/// rolls the local change back.
///
/// Mutators spawn onto the current tokio runtime and must be called from
/// inside one.
pub struct SyncEngine<T: Entity, R> {
    store: Arc<EntityStore<T>>,
    cache: Arc<DurableCache<T>>,
    remote: Arc<R>,
    temp_ids: TempIdStrategy,
}

impl<T: Entity, R> Clone for SyncEngine<T, R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
            remote: self.remote.clone(),
            temp_ids: self.temp_ids,
        }
    }
}

impl<T: Entity, R: RemoteSource<T>> SyncEngine<T, R> {
    pub fn new(store: Arc<EntityStore<T>>, cache: Arc<DurableCache<T>>, remote: Arc<R>) -> Self {
        Self {
            store,
            cache,
            remote,
            temp_ids: TempIdStrategy::default(),
        }
    }

    pub fn with_temp_ids(mut self, strategy: TempIdStrategy) -> Self {
        self.temp_ids = strategy;
        self
    }

    pub fn store(&self) -> &Arc<EntityStore<T>> {
        &self.store
    }

    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.store.snapshot()
    }

    /// Replaces the store with the server's collection. Failures are logged
    /// and leave the store as it was.
    pub async fn load_all(&self) -> LoadOutcome {
        match self.remote.list().await {
            Ok(items) => {
                let count = items.len();
                self.store.replace(items);
                self.persist();
                tracing::info!("{}: loaded {} record(s) from server", T::COLLECTION, count);
                LoadOutcome::Remote(count)
            }
            Err(e) => {
                tracing::warn!("{}: load failed, serving cached data: {}", T::COLLECTION, e);
                LoadOutcome::CacheOnly
            }
        }
    }

    pub fn spawn_load_all(&self) -> JoinHandle<LoadOutcome> {
        let engine = self.clone();
        tokio::spawn(async move { engine.load_all().await })
    }

    /// Re-reads one record from the server. Only an id still present in the
    /// store is overwritten.
    pub async fn refresh(&self, id: &str) -> Result<T, SyncError> {
        let server = self.remote.get_by_id(id).await.map_err(SyncError::from)?;
        if self.store.apply_replace(id, server.clone()) {
            self.persist();
        }
        Ok(server)
    }

    /// Inserts a temporary entity at the front of the store, then posts
    /// `patch` to the server. On success the temporary entry is swapped for
    /// the server's entity in place.
    pub fn create(&self, patch: T::Patch) -> Completion<T> {
        if let Err(e) = patch.validate() {
            return Completion::ready(Err(SyncError::Invalid(e)));
        }

        let temp_id = self.temp_ids.generate();
        let mut local = T::default();
        patch.apply(&mut local);
        local.set_id(temp_id.clone());
        self.store.apply_insert(local, true);
        self.persist();
        tracing::debug!("{}: created {} locally", T::COLLECTION, temp_id);

        let (tx, completion) = Completion::channel();
        let engine = self.clone();
        tokio::spawn(async move {
            let result = match engine.remote.create(&patch).await {
                Ok(server) => {
                    let outcome = engine.store.reconcile_created(&temp_id, server.clone());
                    engine.persist();
                    tracing::debug!(
                        "{}: {} confirmed as {} ({:?})",
                        T::COLLECTION,
                        temp_id,
                        server.id(),
                        outcome
                    );
                    Ok(server)
                }
                Err(e) => {
                    tracing::warn!(
                        "{}: create of {} failed, keeping local copy: {}",
                        T::COLLECTION,
                        temp_id,
                        e
                    );
                    Err(SyncError::from(e))
                }
            };
            let _ = tx.send(result);
        });
        completion
    }

    /// Patches the entry locally, then puts the whole patched entity to the
    /// server. An unknown id resolves to [`SyncError::NotFound`] without a
    /// request.
    pub fn update(&self, id: &str, patch: T::Patch) -> Completion<T> {
        if let Err(e) = patch.validate() {
            return Completion::ready(Err(SyncError::Invalid(e)));
        }
        if !self.store.apply_update(id, &patch) {
            return Completion::ready(Err(SyncError::NotFound));
        }
        self.persist();

        let Some(local) = self.store.get(id) else {
            return Completion::ready(Err(SyncError::NotFound));
        };

        let (tx, completion) = Completion::channel();
        let engine = self.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            let result = match engine.remote.update(&id, &local).await {
                Ok(server) => {
                    if engine.store.apply_replace(&id, server.clone()) {
                        engine.persist();
                    }
                    Ok(server)
                }
                Err(e) => {
                    tracing::warn!(
                        "{}: update of {} failed, keeping local changes: {}",
                        T::COLLECTION,
                        id,
                        e
                    );
                    Err(SyncError::from(e))
                }
            };
            let _ = tx.send(result);
        });
        completion
    }

    /// Removes the entry locally and tells the server. The completion always
    /// resolves to `Ok`; a failed server delete is only logged.
    pub fn delete(&self, id: &str) -> Completion<()> {
        if self.store.apply_remove(id) {
            self.persist();
        }

        let (tx, completion) = Completion::channel();
        let engine = self.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            match engine.remote.delete(&id).await {
                Ok(()) => tracing::debug!("{}: {} deleted on server", T::COLLECTION, id),
                Err(e) => tracing::warn!(
                    "{}: server delete of {} failed, local removal stands: {}",
                    T::COLLECTION,
                    id,
                    e
                ),
            }
            let _ = tx.send(Ok(()));
        });
        completion
    }

    fn persist(&self) {
        self.cache.persist_latest(&self.store);
    }
}

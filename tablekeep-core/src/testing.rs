//! In-memory remotes for unit tests.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

use crate::catalog::CatalogKind;
use crate::entity::{Entity, EntityPatch};
use crate::remote::{CatalogSource, RemoteError, RemoteSource};

/// A REST collection held in a Vec. Created entities get ids `srv-1`,
/// `srv-2`, ...
///
/// A gated remote parks every call until [`FakeRemote::release`] hands out
/// a permit, which lets a test observe the optimistic state before the
/// server answers.
pub(crate) struct FakeRemote<T> {
    items: Mutex<Vec<T>>,
    gate: Option<Semaphore>,
    failure: Mutex<Option<RemoteError>>,
    next_id: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl<T: Entity> FakeRemote<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
            gate: None,
            failure: Mutex::new(None),
            next_id: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Every call fails as if the server could not be reached.
    pub fn unreachable() -> Self {
        let remote = Self::new();
        remote.fail_with(RemoteError::Unreachable("connection refused".into()));
        remote
    }

    pub fn fail_with(&self, error: RemoteError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Lets `calls` parked requests through.
    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    pub fn items(&self) -> Vec<T> {
        self.items.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        let failure = self.failure.lock().unwrap().clone();
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<T: Entity> RemoteSource<T> for FakeRemote<T> {
    async fn list(&self) -> Result<Vec<T>, RemoteError> {
        self.enter("list".into()).await?;
        Ok(self.items())
    }

    async fn get_by_id(&self, id: &str) -> Result<T, RemoteError> {
        self.enter(format!("get {}", id)).await?;
        let items = self.items.lock().unwrap();
        items
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or(RemoteError::Status(404))
    }

    async fn create(&self, payload: &T::Patch) -> Result<T, RemoteError> {
        self.enter("create".into()).await?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut entity = T::default();
        payload.apply(&mut entity);
        entity.set_id(format!("srv-{}", n));
        self.items.lock().unwrap().push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &str, payload: &T) -> Result<T, RemoteError> {
        self.enter(format!("update {}", id)).await?;
        let mut items = self.items.lock().unwrap();
        let slot = items
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(RemoteError::Status(404))?;
        *slot = payload.clone();
        slot.set_id(id.to_string());
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.enter(format!("delete {}", id)).await?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|e| e.id() != id);
        if items.len() == before {
            return Err(RemoteError::Status(404));
        }
        Ok(())
    }
}

/// Catalog endpoints backed by a map. Kinds never `set` fail as
/// unreachable.
pub(crate) struct FakeCatalogSource {
    lists: Mutex<HashMap<CatalogKind, Vec<Value>>>,
    fetches: Mutex<HashMap<CatalogKind, usize>>,
}

impl FakeCatalogSource {
    pub fn new() -> Self {
        Self {
            lists: Mutex::new(HashMap::new()),
            fetches: Mutex::new(HashMap::new()),
        }
    }

    pub fn set(&self, kind: CatalogKind, records: Vec<Value>) {
        self.lists.lock().unwrap().insert(kind, records);
    }

    pub fn fetches(&self, kind: CatalogKind) -> usize {
        self.fetches.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }
}

impl CatalogSource for FakeCatalogSource {
    async fn fetch_catalog(&self, kind: CatalogKind) -> Result<Vec<Value>, RemoteError> {
        *self.fetches.lock().unwrap().entry(kind).or_insert(0) += 1;
        self.lists
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .ok_or_else(|| RemoteError::Unreachable(format!("no {} endpoint", kind)))
    }
}

//! Lazily loaded, cached catalog lookups.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{CatalogEntry, CatalogKind, CatalogSnapshot};
use crate::remote::CatalogSource;
use crate::seed;

/// Resolves catalog lists, fetching each kind at most once per successful
/// load.
///
/// Remote failures fall back to the bundled seed list for that kind. The
/// fallback is not cached, so the next `get` tries the API again.
pub struct CatalogResolver<S> {
    source: Arc<S>,
    loaded: Mutex<HashMap<CatalogKind, Arc<Vec<CatalogEntry>>>>,
}

impl<S: CatalogSource> CatalogResolver<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, kind: CatalogKind) -> Option<Arc<Vec<CatalogEntry>>> {
        self.loaded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .cloned()
    }

    /// Returns the list for `kind`, loading it on first use.
    pub async fn get(&self, kind: CatalogKind) -> Arc<Vec<CatalogEntry>> {
        if let Some(list) = self.cached(kind) {
            return list;
        }

        match self.source.fetch_catalog(kind).await {
            Ok(records) => {
                let entries: Vec<CatalogEntry> =
                    records.iter().filter_map(CatalogEntry::from_remote).collect();
                if entries.len() < records.len() {
                    tracing::debug!(
                        "Dropped {} {} record(s) without an id",
                        records.len() - entries.len(),
                        kind
                    );
                }
                let list = Arc::new(entries);
                self.loaded
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(kind, list.clone());
                tracing::debug!("Loaded {} {} from server", list.len(), kind);
                list
            }
            Err(e) => {
                tracing::warn!("Catalog {} unavailable, using bundled list: {}", kind, e);
                Arc::new(seed::catalog(kind))
            }
        }
    }

    /// Looks up one entry.
    pub async fn resolve(&self, kind: CatalogKind, id: &str) -> Option<CatalogEntry> {
        self.get(kind).await.iter().find(|e| e.id == id).cloned()
    }

    /// Gathers several kinds into one immutable snapshot.
    pub async fn snapshot(&self, kinds: &[CatalogKind]) -> CatalogSnapshot {
        let mut snapshot = CatalogSnapshot::new();
        for kind in kinds {
            if !snapshot.contains_kind(*kind) {
                snapshot.insert(*kind, self.get(*kind).await);
            }
        }
        snapshot
    }

    /// Forgets the cached list so the next `get` hits the API.
    pub fn invalidate(&self, kind: CatalogKind) {
        self.loaded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&kind);
    }

    pub fn is_loaded(&self, kind: CatalogKind) -> bool {
        self.cached(kind).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalogSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_maps_remote_shape_and_caches() {
        let source = Arc::new(FakeCatalogSource::new());
        source.set(
            CatalogKind::Units,
            vec![
                json!({"id": "u9", "symbol": "lb", "name": "Pound"}),
                json!({"name": "no id"}),
            ],
        );
        let resolver = CatalogResolver::new(source.clone());

        let units = resolver.get(CatalogKind::Units).await;
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].short_label(), "lb");
        assert!(resolver.is_loaded(CatalogKind::Units));

        resolver.get(CatalogKind::Units).await;
        assert_eq!(source.fetches(CatalogKind::Units), 1);
    }

    #[tokio::test]
    async fn test_get_falls_back_to_seed_without_caching() {
        let source = Arc::new(FakeCatalogSource::new());
        let resolver = CatalogResolver::new(source.clone());

        let restaurants = resolver.get(CatalogKind::Restaurants).await;
        assert_eq!(*restaurants, seed::catalog(CatalogKind::Restaurants));
        assert!(!resolver.is_loaded(CatalogKind::Restaurants));

        // Server comes back: the next call picks up the remote list.
        source.set(
            CatalogKind::Restaurants,
            vec![json!({"id": "r7", "name": "Pier Seven"})],
        );
        let restaurants = resolver.get(CatalogKind::Restaurants).await;
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].id, "r7");
        assert_eq!(source.fetches(CatalogKind::Restaurants), 2);
    }

    #[tokio::test]
    async fn test_resolve() {
        let source = Arc::new(FakeCatalogSource::new());
        source.set(
            CatalogKind::Ingredients,
            vec![json!({"id": "i1", "name": "Tomatoes"})],
        );
        let resolver = CatalogResolver::new(source);

        let found = resolver.resolve(CatalogKind::Ingredients, "i1").await;
        assert_eq!(found.unwrap().label(), "Tomatoes");
        assert!(resolver
            .resolve(CatalogKind::Ingredients, "missing")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let source = Arc::new(FakeCatalogSource::new());
        source.set(CatalogKind::Suppliers, vec![json!({"id": "s1", "name": "A"})]);
        let resolver = CatalogResolver::new(source.clone());

        resolver.get(CatalogKind::Suppliers).await;
        resolver.invalidate(CatalogKind::Suppliers);
        assert!(!resolver.is_loaded(CatalogKind::Suppliers));
        resolver.get(CatalogKind::Suppliers).await;
        assert_eq!(source.fetches(CatalogKind::Suppliers), 2);
    }

    #[tokio::test]
    async fn test_snapshot_collects_kinds() {
        let source = Arc::new(FakeCatalogSource::new());
        source.set(CatalogKind::Restaurants, vec![json!({"id": "r1", "name": "A"})]);
        let resolver = CatalogResolver::new(source);

        let snapshot = resolver
            .snapshot(&[CatalogKind::Restaurants, CatalogKind::Units])
            .await;
        assert_eq!(snapshot.entries(CatalogKind::Restaurants).len(), 1);
        // Units came from the seed fallback.
        assert_eq!(snapshot.first(CatalogKind::Units).unwrap().id, "u1");
        assert!(!snapshot.contains_kind(CatalogKind::Suppliers));
    }
}

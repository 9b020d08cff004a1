//! Everything a command needs, built once per invocation.

use std::sync::Arc;
use std::time::Duration;
use tablekeep_core::{
    check_server, CatalogResolver, CatalogSnapshot, DurableStorage, Entity, FileStorage,
    HttpRemote, LoadOutcome, Resource,
};

use crate::config::Config;

pub type CliResource<T> = Resource<T, HttpRemote>;

pub struct AppContext {
    remote: Arc<HttpRemote>,
    storage: Arc<dyn DurableStorage>,
    catalogs: CatalogResolver<HttpRemote>,
}

impl AppContext {
    /// Builds the HTTP client, falling back to offline mode when asked to or
    /// when the API does not answer its health check.
    pub async fn connect(config: &Config, force_offline: bool) -> Self {
        let remote = if force_offline || config.offline.value {
            tracing::info!("Offline mode, using cached data only");
            HttpRemote::offline()
        } else if !check_server(&config.api_url.value).await {
            tracing::warn!(
                "Server {} unreachable, using cached data only",
                config.api_url.value
            );
            HttpRemote::offline()
        } else {
            let mut remote = HttpRemote::new(config.api_url.value.clone())
                .with_timeout(Duration::from_secs(config.request_timeout_secs.value));
            if let Some(key) = &config.api_key.value {
                remote = remote.with_api_key(key.clone());
            }
            remote
        };

        let storage = Arc::new(FileStorage::new(config.data_dir.value.clone()));
        Self::new(Arc::new(remote), storage)
    }

    pub fn new(remote: Arc<HttpRemote>, storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            catalogs: CatalogResolver::new(remote.clone()),
            remote,
            storage,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.remote.is_offline()
    }

    pub fn catalogs(&self) -> &CatalogResolver<HttpRemote> {
        &self.catalogs
    }

    /// Boots the resource for `T` from the cache (or `seed`) and waits for
    /// the background refresh. Returns the resource and the catalogs its
    /// foreign keys point into.
    pub async fn open<T: Entity>(&self, seed: Vec<T>) -> (CliResource<T>, CatalogSnapshot) {
        let catalogs = self.catalogs.snapshot(T::CATALOG_KINDS).await;
        let resource = Resource::new(self.storage.clone(), self.remote.clone());
        resource.boot(seed, &catalogs);

        if !self.is_offline() {
            match resource.spawn_refresh().await {
                Ok(LoadOutcome::Remote(count)) => {
                    tracing::debug!("{}: {} record(s) from server", T::COLLECTION, count)
                }
                Ok(LoadOutcome::CacheOnly) => {}
                Err(e) => tracing::warn!("{}: refresh task failed: {}", T::COLLECTION, e),
            }
        }
        (resource, catalogs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekeep_core::{seed, InventoryItem, MemoryStorage};
    use tempfile::tempdir;

    fn offline_context() -> AppContext {
        AppContext::new(
            Arc::new(HttpRemote::offline()),
            Arc::new(MemoryStorage::new()),
        )
    }

    #[tokio::test]
    async fn test_open_offline_boots_from_seed() {
        let ctx = offline_context();
        let (resource, catalogs) = ctx.open(seed::inventory_items()).await;

        assert_eq!(resource.store().len(), seed::inventory_items().len());
        assert!(catalogs.contains_kind(tablekeep_core::CatalogKind::Units));
    }

    #[tokio::test]
    async fn test_connect_offline_flag_skips_network() {
        let temp_dir = tempdir().unwrap();
        let config = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), |name| {
            (name == "TK_DATA_DIR").then(|| temp_dir.path().display().to_string())
        })
        .unwrap();

        let ctx = AppContext::connect(&config, true).await;
        assert!(ctx.is_offline());

        let (resource, _) = ctx.open::<InventoryItem>(seed::inventory_items()).await;
        assert!(!resource.store().is_empty());
        assert!(temp_dir.path().join("tablekeep.inventory.json").exists());
    }
}

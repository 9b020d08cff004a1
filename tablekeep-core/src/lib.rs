//! tablekeep core library
//!
//! Local-first entity stores for the restaurant back office. Every resource
//! kind (inventory items, purchase orders, menus, suppliers, restaurants) is
//! held in an in-memory [`EntityStore`], mutated optimistically by a
//! [`SyncEngine`], persisted by a [`DurableCache`] and reconciled with the
//! REST API in the background.

pub mod cache;
pub mod catalog;
pub mod enrich;
pub mod entity;
pub mod models;
pub mod remote;
pub mod resource;
pub mod seed;
pub mod storage;
pub mod store;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{DurableCache, RestoreReport};
pub use catalog::{CatalogEntry, CatalogKind, CatalogResolver, CatalogSnapshot};
pub use enrich::{enrich_all, Enrich};
pub use entity::{Entity, EntityPatch, ForeignKeyMut, ValidationError};
pub use models::{
    InventoryItem, InventoryPatch, InventoryView, Menu, MenuItem, MenuPatch, MenuView, OrderLine,
    OrderLineView, OrderStatus, PurchaseOrder, PurchaseOrderPatch, PurchaseOrderView, Restaurant,
    RestaurantPatch, RestaurantView, StockStatus, Supplier, SupplierPatch, SupplierView,
    LOW_STOCK_THRESHOLD,
};
pub use remote::{check_server, CatalogSource, HttpRemote, RemoteError, RemoteSource};
pub use resource::Resource;
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{EntityStore, Snapshot, StoreSubscription};
pub use sync::{is_temp_id, Completion, LoadOutcome, SyncEngine, SyncError, TempIdStrategy};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

//! In-memory JSON collections behind the REST routes.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tablekeep_core::{
    seed, CatalogKind, Entity, InventoryItem, Menu, PurchaseOrder, Restaurant, Supplier,
};
use tokio::sync::RwLock;

struct Collection {
    items: Vec<Value>,
    /// Fields every created record starts from. `None` marks a read-only
    /// catalog.
    template: Option<Map<String, Value>>,
}

impl Collection {
    fn writable<T: Entity>(items: Vec<T>) -> Self {
        let template = match serde_json::to_value(T::default()) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        };
        Self {
            items: to_values(&items),
            template: Some(template),
        }
    }

    fn read_only<T: Serialize>(items: Vec<T>) -> Self {
        Self {
            items: to_values(&items),
            template: None,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.get("id").and_then(Value::as_str) == Some(id))
    }
}

fn to_values<T: Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionError {
    UnknownCollection(String),
    NotFound(String),
    ReadOnly(String),
    NotAnObject,
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionError::UnknownCollection(name) => write!(f, "Unknown collection: {}", name),
            CollectionError::NotFound(id) => write!(f, "Record not found: {}", id),
            CollectionError::ReadOnly(name) => write!(f, "Collection {} is read-only", name),
            CollectionError::NotAnObject => write!(f, "Request body must be a JSON object"),
        }
    }
}

impl std::error::Error for CollectionError {}

/// Every collection the API serves, keyed by path segment.
pub struct Collections {
    inner: RwLock<HashMap<String, Collection>>,
}

impl Collections {
    /// Entity collections filled from the bundled seed data, plus the
    /// read-only ingredient and unit catalogs.
    pub fn seeded() -> Self {
        let mut map = HashMap::new();
        map.insert(
            InventoryItem::COLLECTION.to_string(),
            Collection::writable(seed::inventory_items()),
        );
        map.insert(
            PurchaseOrder::COLLECTION.to_string(),
            Collection::writable(seed::purchase_orders()),
        );
        map.insert(
            Menu::COLLECTION.to_string(),
            Collection::writable(seed::menus()),
        );
        map.insert(
            Supplier::COLLECTION.to_string(),
            Collection::writable(seed::suppliers()),
        );
        map.insert(
            Restaurant::COLLECTION.to_string(),
            Collection::writable(seed::restaurants()),
        );
        for kind in [CatalogKind::Ingredients, CatalogKind::Units] {
            map.insert(
                kind.path().to_string(),
                Collection::read_only(seed::catalog(kind)),
            );
        }
        Self {
            inner: RwLock::new(map),
        }
    }

    pub async fn list(&self, name: &str) -> Result<Vec<Value>, CollectionError> {
        let inner = self.inner.read().await;
        let collection = lookup(&inner, name)?;
        Ok(collection.items.clone())
    }

    pub async fn get(&self, name: &str, id: &str) -> Result<Value, CollectionError> {
        let inner = self.inner.read().await;
        let collection = lookup(&inner, name)?;
        collection
            .position(id)
            .map(|pos| collection.items[pos].clone())
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))
    }

    /// Merges `body` onto the collection's template under a fresh UUID.
    pub async fn create(&self, name: &str, body: Value) -> Result<Value, CollectionError> {
        let Value::Object(fields) = body else {
            return Err(CollectionError::NotAnObject);
        };
        let mut inner = self.inner.write().await;
        let collection = lookup_mut(&mut inner, name)?;
        let mut record = collection
            .template
            .clone()
            .ok_or_else(|| CollectionError::ReadOnly(name.to_string()))?;

        record.extend(fields);
        let id = uuid::Uuid::new_v4().to_string();
        record.insert("id".to_string(), Value::String(id.clone()));

        let record = Value::Object(record);
        collection.items.push(record.clone());
        tracing::info!("Created {}/{}", name, id);
        Ok(record)
    }

    /// Replaces the stored record wholesale, keeping `id`.
    pub async fn replace(&self, name: &str, id: &str, body: Value) -> Result<Value, CollectionError> {
        let Value::Object(mut fields) = body else {
            return Err(CollectionError::NotAnObject);
        };
        let mut inner = self.inner.write().await;
        let collection = writable_mut(&mut inner, name)?;
        let pos = collection
            .position(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;

        fields.insert("id".to_string(), Value::String(id.to_string()));
        let record = Value::Object(fields);
        collection.items[pos] = record.clone();
        tracing::info!("Updated {}/{}", name, id);
        Ok(record)
    }

    pub async fn delete(&self, name: &str, id: &str) -> Result<(), CollectionError> {
        let mut inner = self.inner.write().await;
        let collection = writable_mut(&mut inner, name)?;
        let pos = collection
            .position(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        collection.items.remove(pos);
        tracing::info!("Deleted {}/{}", name, id);
        Ok(())
    }
}

fn lookup<'a>(
    inner: &'a HashMap<String, Collection>,
    name: &str,
) -> Result<&'a Collection, CollectionError> {
    inner
        .get(name)
        .ok_or_else(|| CollectionError::UnknownCollection(name.to_string()))
}

fn lookup_mut<'a>(
    inner: &'a mut HashMap<String, Collection>,
    name: &str,
) -> Result<&'a mut Collection, CollectionError> {
    inner
        .get_mut(name)
        .ok_or_else(|| CollectionError::UnknownCollection(name.to_string()))
}

fn writable_mut<'a>(
    inner: &'a mut HashMap<String, Collection>,
    name: &str,
) -> Result<&'a mut Collection, CollectionError> {
    let collection = lookup_mut(inner, name)?;
    if collection.template.is_none() {
        return Err(CollectionError::ReadOnly(name.to_string()));
    }
    Ok(collection)
}

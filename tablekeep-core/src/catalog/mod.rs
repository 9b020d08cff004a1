//! Read-only reference data used for foreign keys and display names.
//!
//! Catalogs are fetched lazily from the API, cached in memory and, when the
//! API cannot be reached, replaced by the bundled seed lists in
//! [`crate::seed`].

mod resolver;

pub use resolver::CatalogResolver;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Shown in projections when a foreign key does not resolve.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The reference dimensions an entity can point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Restaurants,
    Ingredients,
    Units,
    Suppliers,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 4] = [
        CatalogKind::Restaurants,
        CatalogKind::Ingredients,
        CatalogKind::Units,
        CatalogKind::Suppliers,
    ];

    /// REST path segment (`GET /{path}`).
    pub fn path(&self) -> &'static str {
        match self {
            CatalogKind::Restaurants => "restaurants",
            CatalogKind::Ingredients => "ingredients",
            CatalogKind::Units => "units",
            CatalogKind::Suppliers => "suppliers",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "restaurants" | "restaurant" => Ok(CatalogKind::Restaurants),
            "ingredients" | "ingredient" => Ok(CatalogKind::Ingredients),
            "units" | "unit" => Ok(CatalogKind::Units),
            "suppliers" | "supplier" => Ok(CatalogKind::Suppliers),
            _ => Err(format!(
                "Invalid catalog '{}'. Valid options: restaurants, ingredients, units, suppliers",
                s
            )),
        }
    }
}

/// One reference record: an id plus a display name and/or a short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl CatalogEntry {
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            code: None,
        }
    }

    pub fn coded(id: impl Into<String>, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            code: Some(code.into()),
        }
    }

    /// Display name, falling back to the code and then the id.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or(&self.id)
    }

    /// Short code, falling back to the name and then the id. Used for units.
    pub fn short_label(&self) -> &str {
        self.code
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }

    /// Maps an arbitrary API record into a catalog entry.
    ///
    /// Accepts string or numeric ids and the `symbol`/`abbreviation` aliases
    /// for `code`. Records without an id yield `None`.
    pub fn from_remote(value: &Value) -> Option<Self> {
        let id = match value.get("id")? {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            id,
            name: text("name"),
            code: text("code")
                .or_else(|| text("symbol"))
                .or_else(|| text("abbreviation")),
        })
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.code) {
            (Some(name), Some(code)) => write!(f, "{} ({})", name, code),
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// Immutable view over several catalogs, consumed synchronously by the
/// enrichment and cache-repair passes.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    lists: HashMap<CatalogKind, Arc<Vec<CatalogEntry>>>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: CatalogKind, entries: Vec<CatalogEntry>) -> Self {
        self.lists.insert(kind, Arc::new(entries));
        self
    }

    pub fn insert(&mut self, kind: CatalogKind, entries: Arc<Vec<CatalogEntry>>) {
        self.lists.insert(kind, entries);
    }

    pub fn contains_kind(&self, kind: CatalogKind) -> bool {
        self.lists.contains_key(&kind)
    }

    pub fn entries(&self, kind: CatalogKind) -> &[CatalogEntry] {
        self.lists.get(&kind).map(|l| l.as_slice()).unwrap_or(&[])
    }

    pub fn resolve(&self, kind: CatalogKind, id: &str) -> Option<&CatalogEntry> {
        self.entries(kind).iter().find(|e| e.id == id)
    }

    pub fn first(&self, kind: CatalogKind) -> Option<&CatalogEntry> {
        self.entries(kind).first()
    }

    /// Display name for `id`, or [`UNKNOWN_LABEL`].
    pub fn label(&self, kind: CatalogKind, id: &str) -> String {
        self.resolve(kind, id)
            .map(|e| e.label().to_string())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    /// Short code for `id`, or [`UNKNOWN_LABEL`].
    pub fn short_label(&self, kind: CatalogKind, id: &str) -> String {
        self.resolve(kind, id)
            .map(|e| e.short_label().to_string())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "Units".parse::<CatalogKind>().unwrap(),
            CatalogKind::Units
        );
        assert_eq!(
            "supplier".parse::<CatalogKind>().unwrap(),
            CatalogKind::Suppliers
        );
        assert!("dishes".parse::<CatalogKind>().is_err());
    }

    #[test]
    fn test_from_remote_maps_name_and_code() {
        let entry = CatalogEntry::from_remote(&json!({
            "id": "u1",
            "name": "Kilogram",
            "symbol": "kg",
            "extra": true
        }))
        .unwrap();
        assert_eq!(entry.id, "u1");
        assert_eq!(entry.name.as_deref(), Some("Kilogram"));
        assert_eq!(entry.code.as_deref(), Some("kg"));
    }

    #[test]
    fn test_from_remote_numeric_id() {
        let entry = CatalogEntry::from_remote(&json!({"id": 42, "name": "Harbor"})).unwrap();
        assert_eq!(entry.id, "42");
    }

    #[test]
    fn test_from_remote_without_id_is_dropped() {
        assert!(CatalogEntry::from_remote(&json!({"name": "Nameless"})).is_none());
        assert!(CatalogEntry::from_remote(&json!({"id": "", "name": "Blank"})).is_none());
        assert!(CatalogEntry::from_remote(&json!("not an object")).is_none());
    }

    #[test]
    fn test_labels() {
        let unit = CatalogEntry::coded("u1", "kg", "Kilogram");
        assert_eq!(unit.label(), "Kilogram");
        assert_eq!(unit.short_label(), "kg");
        assert_eq!(unit.to_string(), "Kilogram (kg)");

        let bare = CatalogEntry {
            id: "x".into(),
            name: None,
            code: None,
        };
        assert_eq!(bare.label(), "x");
    }

    #[test]
    fn test_snapshot_resolve_and_first() {
        let snapshot = CatalogSnapshot::new().with(
            CatalogKind::Restaurants,
            vec![
                CatalogEntry::named("r1", "Harbor Bistro"),
                CatalogEntry::named("r2", "Olive & Thyme"),
            ],
        );

        assert_eq!(
            snapshot.resolve(CatalogKind::Restaurants, "r2").unwrap().label(),
            "Olive & Thyme"
        );
        assert!(snapshot.resolve(CatalogKind::Restaurants, "r9").is_none());
        assert_eq!(snapshot.first(CatalogKind::Restaurants).unwrap().id, "r1");
        assert!(snapshot.first(CatalogKind::Units).is_none());
        assert_eq!(snapshot.label(CatalogKind::Units, "u1"), UNKNOWN_LABEL);
    }
}

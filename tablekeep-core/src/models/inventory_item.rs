use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{CatalogKind, CatalogSnapshot};
use crate::enrich::Enrich;
use crate::entity::{check_amount, Entity, EntityPatch, ForeignKeyMut, ValidationError};

/// Below this many units an item is reported as running low.
pub const LOW_STOCK_THRESHOLD: f64 = 10.0;

/// Stock held by one restaurant for one ingredient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    #[serde(default)]
    pub restaurant_id: String,
    #[serde(default)]
    pub ingredient_id: String,
    #[serde(default)]
    pub unit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

impl InventoryItem {
    pub fn status(&self) -> StockStatus {
        StockStatus::for_quantity(self.quantity)
    }
}

impl Entity for InventoryItem {
    type Patch = InventoryPatch;

    const COLLECTION: &'static str = "inventory";
    const CATALOG_KINDS: &'static [CatalogKind] = &[
        CatalogKind::Restaurants,
        CatalogKind::Ingredients,
        CatalogKind::Units,
        CatalogKind::Suppliers,
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::new("id", "must not be empty"));
        }
        check_amount("quantity", self.quantity)?;
        if let Some(cost) = self.cost_per_unit {
            check_amount("costPerUnit", cost)?;
        }
        Ok(())
    }

    fn foreign_keys_mut(&mut self) -> Vec<ForeignKeyMut<'_>> {
        let mut keys: Vec<ForeignKeyMut<'_>> = vec![
            (CatalogKind::Restaurants, &mut self.restaurant_id),
            (CatalogKind::Ingredients, &mut self.ingredient_id),
            (CatalogKind::Units, &mut self.unit_id),
        ];
        if let Some(supplier_id) = self.supplier_id.as_mut() {
            keys.push((CatalogKind::Suppliers, supplier_id));
        }
        keys
    }
}

/// Optional-field update for an [`InventoryItem`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_unit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

impl InventoryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_restaurant(mut self, restaurant_id: impl Into<String>) -> Self {
        self.restaurant_id = Some(restaurant_id.into());
        self
    }

    pub fn with_ingredient(mut self, ingredient_id: impl Into<String>) -> Self {
        self.ingredient_id = Some(ingredient_id.into());
        self
    }

    pub fn with_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }

    pub fn with_supplier(mut self, supplier_id: impl Into<String>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }
}

impl EntityPatch<InventoryItem> for InventoryPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(quantity) = self.quantity {
            check_amount("quantity", quantity)?;
        }
        if let Some(cost) = self.cost_per_unit {
            check_amount("costPerUnit", cost)?;
        }
        Ok(())
    }

    fn apply(&self, target: &mut InventoryItem) {
        if let Some(v) = &self.restaurant_id {
            target.restaurant_id = v.clone();
        }
        if let Some(v) = &self.ingredient_id {
            target.ingredient_id = v.clone();
        }
        if let Some(v) = &self.unit_id {
            target.unit_id = v.clone();
        }
        if let Some(v) = &self.supplier_id {
            target.supplier_id = Some(v.clone());
        }
        if let Some(v) = self.quantity {
            target.quantity = v;
        }
        if let Some(v) = self.cost_per_unit {
            target.cost_per_unit = Some(v);
        }
        if let Some(v) = self.expiry_date {
            target.expiry_date = Some(v);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Out,
    Low,
    Available,
}

impl StockStatus {
    pub fn for_quantity(quantity: f64) -> Self {
        if quantity <= 0.0 {
            StockStatus::Out
        } else if quantity < LOW_STOCK_THRESHOLD {
            StockStatus::Low
        } else {
            StockStatus::Available
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Out => write!(f, "out"),
            StockStatus::Low => write!(f, "low"),
            StockStatus::Available => write!(f, "available"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    pub id: String,
    pub restaurant_name: String,
    pub ingredient_name: String,
    pub unit_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    pub quantity: f64,
    pub status: StockStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

impl Enrich for InventoryItem {
    type View = InventoryView;

    fn enrich(&self, catalogs: &CatalogSnapshot) -> InventoryView {
        InventoryView {
            id: self.id.clone(),
            restaurant_name: catalogs.label(CatalogKind::Restaurants, &self.restaurant_id),
            ingredient_name: catalogs.label(CatalogKind::Ingredients, &self.ingredient_id),
            unit_code: catalogs.short_label(CatalogKind::Units, &self.unit_id),
            supplier_name: self
                .supplier_id
                .as_deref()
                .map(|id| catalogs.label(CatalogKind::Suppliers, id)),
            quantity: self.quantity,
            status: self.status(),
            stock_value: self.cost_per_unit.map(|cost| cost * self.quantity),
            expiry_date: self.expiry_date,
        }
    }
}

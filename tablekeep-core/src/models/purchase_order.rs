use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{CatalogKind, CatalogSnapshot};
use crate::enrich::Enrich;
use crate::entity::{check_amount, Entity, EntityPatch, ForeignKeyMut, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Draft,
    Submitted,
    Received,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Submitted => "submitted",
            OrderStatus::Received => "received",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(OrderStatus::Draft),
            "submitted" => Ok(OrderStatus::Submitted),
            "received" => Ok(OrderStatus::Received),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!(
                "Invalid order status '{}'. Valid options: draft, submitted, received, cancelled",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default)]
    pub ingredient_id: String,
    #[serde(default)]
    pub unit_id: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl OrderLine {
    pub fn new(
        ingredient_id: impl Into<String>,
        unit_id: impl Into<String>,
        quantity: f64,
        unit_price: f64,
    ) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            unit_id: unit_id.into(),
            quantity,
            unit_price,
        }
    }

    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_amount("lines.quantity", self.quantity)?;
        check_amount("lines.unitPrice", self.unit_price)
    }
}

/// An order placed by a restaurant with one supplier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: String,
    #[serde(default)]
    pub restaurant_id: String,
    #[serde(default)]
    pub supplier_id: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PurchaseOrder {
    /// Sum of price x quantity over all lines.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(OrderLine::total).sum()
    }
}

impl Entity for PurchaseOrder {
    type Patch = PurchaseOrderPatch;

    const COLLECTION: &'static str = "purchase-orders";
    const CATALOG_KINDS: &'static [CatalogKind] = &[
        CatalogKind::Restaurants,
        CatalogKind::Suppliers,
        CatalogKind::Ingredients,
        CatalogKind::Units,
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
        self.lines.iter().try_for_each(OrderLine::validate)
    }

    fn foreign_keys_mut(&mut self) -> Vec<ForeignKeyMut<'_>> {
        let mut keys: Vec<ForeignKeyMut<'_>> = vec![
            (CatalogKind::Restaurants, &mut self.restaurant_id),
            (CatalogKind::Suppliers, &mut self.supplier_id),
        ];
        for line in self.lines.iter_mut() {
            keys.push((CatalogKind::Ingredients, &mut line.ingredient_id));
            keys.push((CatalogKind::Units, &mut line.unit_id));
        }
        keys
    }
}

/// Optional-field update for a [`PurchaseOrder`]. `lines`, when set,
/// replaces the whole line list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseOrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<OrderLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EntityPatch<PurchaseOrder> for PurchaseOrderPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.lines {
            Some(lines) => lines.iter().try_for_each(OrderLine::validate),
            None => Ok(()),
        }
    }

    fn apply(&self, target: &mut PurchaseOrder) {
        if let Some(v) = &self.restaurant_id {
            target.restaurant_id = v.clone();
        }
        if let Some(v) = &self.supplier_id {
            target.supplier_id = v.clone();
        }
        if let Some(v) = self.status {
            target.status = v;
        }
        if let Some(v) = self.order_date {
            target.order_date = Some(v);
        }
        if let Some(v) = self.expected_date {
            target.expected_date = Some(v);
        }
        if let Some(v) = &self.lines {
            target.lines = v.clone();
        }
        if let Some(v) = &self.notes {
            target.notes = Some(v.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub ingredient_name: String,
    pub unit_code: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderView {
    pub id: String,
    pub restaurant_name: String,
    pub supplier_name: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    pub lines: Vec<OrderLineView>,
    pub total: f64,
}

impl Enrich for PurchaseOrder {
    type View = PurchaseOrderView;

    fn enrich(&self, catalogs: &CatalogSnapshot) -> PurchaseOrderView {
        PurchaseOrderView {
            id: self.id.clone(),
            restaurant_name: catalogs.label(CatalogKind::Restaurants, &self.restaurant_id),
            supplier_name: catalogs.label(CatalogKind::Suppliers, &self.supplier_id),
            status: self.status,
            order_date: self.order_date,
            expected_date: self.expected_date,
            lines: self
                .lines
                .iter()
                .map(|line| OrderLineView {
                    ingredient_name: catalogs.label(CatalogKind::Ingredients, &line.ingredient_id),
                    unit_code: catalogs.short_label(CatalogKind::Units, &line.unit_id),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.total(),
                })
                .collect(),
            total: self.total(),
        }
    }
}

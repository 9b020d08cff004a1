//! Bundled datasets.
//!
//! Catalog seeds back the [`CatalogResolver`](crate::CatalogResolver) when the
//! API is unreachable; entity seeds populate a store on first run, before
//! anything has been cached.

use chrono::NaiveDate;

use crate::catalog::{CatalogEntry, CatalogKind};
use crate::models::{
    InventoryItem, Menu, MenuItem, OrderLine, OrderStatus, PurchaseOrder, Restaurant, Supplier,
};

/// Static fallback list for one catalog.
pub fn catalog(kind: CatalogKind) -> Vec<CatalogEntry> {
    match kind {
        CatalogKind::Restaurants => vec![
            CatalogEntry::named("r1", "Harbor Bistro"),
            CatalogEntry::named("r2", "Olive & Thyme"),
            CatalogEntry::named("r3", "Night Market Grill"),
        ],
        CatalogKind::Ingredients => vec![
            CatalogEntry::named("i1", "Tomatoes"),
            CatalogEntry::named("i2", "Mozzarella"),
            CatalogEntry::named("i3", "Basil"),
            CatalogEntry::named("i4", "Olive Oil"),
            CatalogEntry::named("i5", "Flour"),
            CatalogEntry::named("i6", "Chicken Thigh"),
            CatalogEntry::named("i7", "Arborio Rice"),
            CatalogEntry::named("i8", "Parmesan"),
        ],
        CatalogKind::Units => vec![
            CatalogEntry::coded("u1", "kg", "Kilogram"),
            CatalogEntry::coded("u2", "g", "Gram"),
            CatalogEntry::coded("u3", "L", "Litre"),
            CatalogEntry::coded("u4", "ml", "Millilitre"),
            CatalogEntry::coded("u5", "pcs", "Pieces"),
        ],
        CatalogKind::Suppliers => vec![
            CatalogEntry::named("s1", "Coastal Produce Co."),
            CatalogEntry::named("s2", "Dairy Direct"),
            CatalogEntry::named("s3", "Mill & Grain"),
        ],
    }
}

pub fn restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            id: "r1".into(),
            name: "Harbor Bistro".into(),
            address: Some("12 Quay Street".into()),
            phone: Some("555-0101".into()),
            manager: Some("Dana Reyes".into()),
            seats: Some(64),
        },
        Restaurant {
            id: "r2".into(),
            name: "Olive & Thyme".into(),
            address: Some("48 Market Road".into()),
            phone: Some("555-0142".into()),
            manager: Some("Sam Okafor".into()),
            seats: Some(40),
        },
        Restaurant {
            id: "r3".into(),
            name: "Night Market Grill".into(),
            address: Some("3 Lantern Lane".into()),
            phone: None,
            manager: None,
            seats: Some(28),
        },
    ]
}

pub fn suppliers() -> Vec<Supplier> {
    vec![
        Supplier {
            id: "s1".into(),
            name: "Coastal Produce Co.".into(),
            contact_name: Some("Lee Marsh".into()),
            email: Some("orders@coastalproduce.example".into()),
            phone: Some("555-0190".into()),
            ingredient_ids: vec!["i1".into(), "i3".into()],
        },
        Supplier {
            id: "s2".into(),
            name: "Dairy Direct".into(),
            contact_name: None,
            email: Some("sales@dairydirect.example".into()),
            phone: None,
            ingredient_ids: vec!["i2".into(), "i8".into()],
        },
        Supplier {
            id: "s3".into(),
            name: "Mill & Grain".into(),
            contact_name: Some("Priya Natarajan".into()),
            email: None,
            phone: Some("555-0177".into()),
            ingredient_ids: vec!["i5".into(), "i7".into()],
        },
    ]
}

pub fn inventory_items() -> Vec<InventoryItem> {
    vec![
        InventoryItem {
            id: "inv-1".into(),
            restaurant_id: "r1".into(),
            ingredient_id: "i1".into(),
            unit_id: "u1".into(),
            supplier_id: Some("s1".into()),
            quantity: 24.0,
            cost_per_unit: Some(3.2),
            expiry_date: NaiveDate::from_ymd_opt(2026, 11, 2),
        },
        InventoryItem {
            id: "inv-2".into(),
            restaurant_id: "r1".into(),
            ingredient_id: "i2".into(),
            unit_id: "u1".into(),
            supplier_id: Some("s2".into()),
            quantity: 6.0,
            cost_per_unit: Some(11.5),
            expiry_date: NaiveDate::from_ymd_opt(2026, 10, 24),
        },
        InventoryItem {
            id: "inv-3".into(),
            restaurant_id: "r2".into(),
            ingredient_id: "i5".into(),
            unit_id: "u1".into(),
            supplier_id: Some("s3".into()),
            quantity: 0.0,
            cost_per_unit: Some(1.1),
            expiry_date: None,
        },
    ]
}

pub fn purchase_orders() -> Vec<PurchaseOrder> {
    vec![PurchaseOrder {
        id: "po-1".into(),
        restaurant_id: "r1".into(),
        supplier_id: "s1".into(),
        status: OrderStatus::Submitted,
        order_date: NaiveDate::from_ymd_opt(2026, 10, 12),
        expected_date: NaiveDate::from_ymd_opt(2026, 10, 16),
        lines: vec![
            OrderLine {
                ingredient_id: "i1".into(),
                unit_id: "u1".into(),
                quantity: 20.0,
                unit_price: 3.2,
            },
            OrderLine {
                ingredient_id: "i3".into(),
                unit_id: "u2".into(),
                quantity: 500.0,
                unit_price: 0.02,
            },
        ],
        notes: None,
    }]
}

pub fn menus() -> Vec<Menu> {
    vec![Menu {
        id: "m1".into(),
        restaurant_id: "r1".into(),
        name: "Autumn Dinner".into(),
        description: Some("Seasonal evening menu".into()),
        active: true,
        items: vec![
            MenuItem {
                name: "Margherita".into(),
                price: 14.0,
                ingredient_ids: vec!["i1".into(), "i2".into(), "i3".into(), "i5".into()],
            },
            MenuItem {
                name: "Mushroom Risotto".into(),
                price: 18.5,
                ingredient_ids: vec!["i7".into(), "i8".into()],
            },
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSnapshot;
    use crate::entity::Entity;

    fn seed_catalogs() -> CatalogSnapshot {
        CatalogKind::ALL
            .iter()
            .fold(CatalogSnapshot::new(), |s, kind| s.with(*kind, catalog(*kind)))
    }

    fn all_keys_resolve<T: Entity>(items: Vec<T>, catalogs: &CatalogSnapshot) {
        for mut item in items {
            let id = item.id().to_string();
            for (kind, key) in item.foreign_keys_mut() {
                assert!(
                    catalogs.resolve(kind, key.as_str()).is_some(),
                    "{} {} has dangling {} key {}",
                    T::COLLECTION,
                    id,
                    kind,
                    key
                );
            }
        }
    }

    #[test]
    fn test_every_catalog_seed_is_non_empty() {
        for kind in CatalogKind::ALL {
            assert!(!catalog(kind).is_empty(), "{} seed is empty", kind);
        }
    }

    #[test]
    fn test_entity_seeds_reference_seed_catalogs() {
        let catalogs = seed_catalogs();
        all_keys_resolve(inventory_items(), &catalogs);
        all_keys_resolve(purchase_orders(), &catalogs);
        all_keys_resolve(menus(), &catalogs);
        all_keys_resolve(suppliers(), &catalogs);
        all_keys_resolve(restaurants(), &catalogs);
    }

    #[test]
    fn test_entity_seeds_validate() {
        assert!(inventory_items().iter().all(|i| i.validate().is_ok()));
        assert!(purchase_orders().iter().all(|o| o.validate().is_ok()));
        assert!(menus().iter().all(|m| m.validate().is_ok()));
    }
}

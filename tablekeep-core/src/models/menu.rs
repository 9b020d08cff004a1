use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogKind, CatalogSnapshot};
use crate::enrich::Enrich;
use crate::entity::{check_amount, check_name, Entity, EntityPatch, ForeignKeyMut, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub ingredient_ids: Vec<String>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ingredient_ids: Vec::new(),
        }
    }

    pub fn with_ingredients(mut self, ingredient_ids: Vec<String>) -> Self {
        self.ingredient_ids = ingredient_ids;
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_name("items.name", &self.name)?;
        check_amount("items.price", self.price)
    }
}

/// A restaurant's menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,
    #[serde(default)]
    pub restaurant_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Entity for Menu {
    type Patch = MenuPatch;

    const COLLECTION: &'static str = "menus";
    const CATALOG_KINDS: &'static [CatalogKind] =
        &[CatalogKind::Restaurants, CatalogKind::Ingredients];

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
        self.items.iter().try_for_each(MenuItem::validate)
    }

    fn foreign_keys_mut(&mut self) -> Vec<ForeignKeyMut<'_>> {
        let mut keys: Vec<ForeignKeyMut<'_>> =
            vec![(CatalogKind::Restaurants, &mut self.restaurant_id)];
        for item in self.items.iter_mut() {
            for ingredient_id in item.ingredient_ids.iter_mut() {
                keys.push((CatalogKind::Ingredients, ingredient_id));
            }
        }
        keys
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MenuItem>>,
}

impl EntityPatch<Menu> for MenuPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            check_name("name", name)?;
        }
        match &self.items {
            Some(items) => items.iter().try_for_each(MenuItem::validate),
            None => Ok(()),
        }
    }

    fn apply(&self, target: &mut Menu) {
        if let Some(v) = &self.restaurant_id {
            target.restaurant_id = v.clone();
        }
        if let Some(v) = &self.name {
            target.name = v.clone();
        }
        if let Some(v) = &self.description {
            target.description = Some(v.clone());
        }
        if let Some(v) = self.active {
            target.active = v;
        }
        if let Some(v) = &self.items {
            target.items = v.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    pub name: String,
    pub price: f64,
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    pub id: String,
    pub restaurant_name: String,
    pub name: String,
    pub active: bool,
    pub item_count: usize,
    pub items: Vec<MenuItemView>,
}

impl Enrich for Menu {
    type View = MenuView;

    fn enrich(&self, catalogs: &CatalogSnapshot) -> MenuView {
        MenuView {
            id: self.id.clone(),
            restaurant_name: catalogs.label(CatalogKind::Restaurants, &self.restaurant_id),
            name: self.name.clone(),
            active: self.active,
            item_count: self.items.len(),
            items: self
                .items
                .iter()
                .map(|item| MenuItemView {
                    name: item.name.clone(),
                    price: item.price,
                    ingredients: item
                        .ingredient_ids
                        .iter()
                        .map(|id| catalogs.label(CatalogKind::Ingredients, id))
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn menu() -> Menu {
        Menu {
            id: "m1".into(),
            restaurant_id: "r1".into(),
            name: "Lunch".into(),
            active: true,
            items: vec![
                MenuItem::new("Caprese", 11.0)
                    .with_ingredients(vec!["i1".into(), "i2".into()]),
                MenuItem::new("Focaccia", 6.0).with_ingredients(vec!["i5".into()]),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_enrich_menu() {
        let catalogs = CatalogSnapshot::new()
            .with(
                CatalogKind::Restaurants,
                vec![CatalogEntry::named("r1", "Harbor Bistro")],
            )
            .with(
                CatalogKind::Ingredients,
                vec![
                    CatalogEntry::named("i1", "Tomatoes"),
                    CatalogEntry::named("i2", "Mozzarella"),
                ],
            );

        let view = menu().enrich(&catalogs);
        assert_eq!(view.restaurant_name, "Harbor Bistro");
        assert_eq!(view.item_count, 2);
        assert_eq!(view.items[0].ingredients, vec!["Tomatoes", "Mozzarella"]);
        assert_eq!(view.items[1].ingredients, vec!["Unknown"]);
    }

    #[test]
    fn test_foreign_keys_cover_item_ingredients() {
        let mut m = menu();
        assert_eq!(m.foreign_keys_mut().len(), 4);
    }

    #[test]
    fn test_patch_validation() {
        let blank = MenuPatch {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let negative = MenuPatch {
            items: Some(vec![MenuItem::new("Soup", -4.0)]),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_name_is_required_when_deserializing() {
        assert!(serde_json::from_str::<Menu>(r#"{"id":"m1"}"#).is_err());
        let m: Menu = serde_json::from_str(r#"{"id":"m1","name":"Brunch"}"#).unwrap();
        assert!(!m.active);
        assert!(m.items.is_empty());
    }
}

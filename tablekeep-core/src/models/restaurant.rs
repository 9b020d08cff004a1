use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogKind, CatalogSnapshot};
use crate::enrich::Enrich;
use crate::entity::{check_name, Entity, EntityPatch, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
}

impl Entity for Restaurant {
    type Patch = RestaurantPatch;

    const COLLECTION: &'static str = "restaurants";
    const CATALOG_KINDS: &'static [CatalogKind] = &[];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestaurantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
}

impl RestaurantPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl EntityPatch<Restaurant> for RestaurantPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => check_name("name", name),
            None => Ok(()),
        }
    }

    fn apply(&self, target: &mut Restaurant) {
        if let Some(v) = &self.name {
            target.name = v.clone();
        }
        if let Some(v) = &self.address {
            target.address = Some(v.clone());
        }
        if let Some(v) = &self.phone {
            target.phone = Some(v.clone());
        }
        if let Some(v) = &self.manager {
            target.manager = Some(v.clone());
        }
        if let Some(v) = self.seats {
            target.seats = Some(v);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantView {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
}

impl Enrich for Restaurant {
    type View = RestaurantView;

    fn enrich(&self, _catalogs: &CatalogSnapshot) -> RestaurantView {
        RestaurantView {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone().unwrap_or_else(|| "-".to_string()),
            manager: self.manager.clone(),
            seats: self.seats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_applies_set_fields_only() {
        let mut restaurant = Restaurant {
            id: "r1".into(),
            name: "Harbor Bistro".into(),
            manager: Some("Ines".into()),
            ..Default::default()
        };
        RestaurantPatch::new()
            .with_address("1 Quay St")
            .apply(&mut restaurant);

        assert_eq!(restaurant.name, "Harbor Bistro");
        assert_eq!(restaurant.address.as_deref(), Some("1 Quay St"));
        assert_eq!(restaurant.manager.as_deref(), Some("Ines"));
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(RestaurantPatch::new().with_name("  ").validate().is_err());
        assert!(RestaurantPatch::new().validate().is_ok());
    }

    #[test]
    fn test_name_is_required_in_cache() {
        let parsed = serde_json::from_str::<Restaurant>(r#"{"id":"r1"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_view_defaults_address() {
        let restaurant = Restaurant {
            id: "r1".into(),
            name: "Harbor Bistro".into(),
            seats: Some(40),
            ..Default::default()
        };
        let view = restaurant.enrich(&CatalogSnapshot::new());
        assert_eq!(view.address, "-");
        assert_eq!(view.seats, Some(40));
    }
}

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogKind, CatalogSnapshot};
use crate::enrich::Enrich;
use crate::entity::{check_name, Entity, EntityPatch, ForeignKeyMut, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Ingredients this supplier can deliver.
    #[serde(default)]
    pub ingredient_ids: Vec<String>,
}

impl Entity for Supplier {
    type Patch = SupplierPatch;

    const COLLECTION: &'static str = "suppliers";
    const CATALOG_KINDS: &'static [CatalogKind] = &[CatalogKind::Ingredients];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn foreign_keys_mut(&mut self) -> Vec<ForeignKeyMut<'_>> {
        self.ingredient_ids
            .iter_mut()
            .map(|id| (CatalogKind::Ingredients, id))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_ids: Option<Vec<String>>,
}

impl EntityPatch<Supplier> for SupplierPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            check_name("name", name)?;
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ValidationError::new("email", "must contain '@'"));
            }
        }
        Ok(())
    }

    fn apply(&self, target: &mut Supplier) {
        if let Some(v) = &self.name {
            target.name = v.clone();
        }
        if let Some(v) = &self.contact_name {
            target.contact_name = Some(v.clone());
        }
        if let Some(v) = &self.email {
            target.email = Some(v.clone());
        }
        if let Some(v) = &self.phone {
            target.phone = Some(v.clone());
        }
        if let Some(v) = &self.ingredient_ids {
            target.ingredient_ids = v.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierView {
    pub id: String,
    pub name: String,
    /// Contact person, else email, else phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub ingredient_names: Vec<String>,
}

impl Enrich for Supplier {
    type View = SupplierView;

    fn enrich(&self, catalogs: &CatalogSnapshot) -> SupplierView {
        SupplierView {
            id: self.id.clone(),
            name: self.name.clone(),
            contact: self
                .contact_name
                .clone()
                .or_else(|| self.email.clone())
                .or_else(|| self.phone.clone()),
            ingredient_names: self
                .ingredient_ids
                .iter()
                .map(|id| catalogs.label(CatalogKind::Ingredients, id))
                .collect(),
        }
    }
}

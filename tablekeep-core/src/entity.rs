//! The contract every synchronised resource kind implements.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use crate::catalog::CatalogKind;

/// A mutable borrow of one foreign key field, tagged with the catalog it
/// points into.
pub type ForeignKeyMut<'a> = (CatalogKind, &'a mut String);

/// A record held in an [`EntityStore`](crate::EntityStore).
///
/// Entities are plain serde structs. The wire format and the cache format are
/// the same camelCase JSON, so anything that survives a round trip through the
/// API also survives a round trip through the cache.
pub trait Entity:
    Clone + Default + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Optional-field patch accepted by `update` and `create`.
    type Patch: EntityPatch<Self>;

    /// REST collection segment (`GET /{COLLECTION}`), also the cache key suffix.
    const COLLECTION: &'static str;

    /// Catalog kinds referenced by this entity's foreign keys.
    const CATALOG_KINDS: &'static [CatalogKind];

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Structural checks for records read back from the cache. Serde already
    /// rejects missing required fields and mistyped values; this catches what
    /// the type system cannot.
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id().trim().is_empty() {
            return Err(ValidationError::new("id", "must not be empty"));
        }
        Ok(())
    }

    /// Every foreign key field, including those nested in line items.
    fn foreign_keys_mut(&mut self) -> Vec<ForeignKeyMut<'_>> {
        Vec::new()
    }
}

/// Partial update for an entity of type `T`. Unset fields leave the target
/// untouched.
pub trait EntityPatch<T>: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    fn validate(&self) -> Result<(), ValidationError>;

    fn apply(&self, target: &mut T);
}

/// A record or patch failed a structural check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// Quantities and prices must be finite and non-negative.
pub(crate) fn check_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(())
}

pub(crate) fn check_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_amount() {
        assert!(check_amount("quantity", 0.0).is_ok());
        assert!(check_amount("quantity", 12.5).is_ok());
        assert!(check_amount("quantity", -1.0).is_err());
        assert!(check_amount("quantity", f64::NAN).is_err());
        assert!(check_amount("quantity", f64::INFINITY).is_err());
    }

    #[test]
    fn test_check_name() {
        assert!(check_name("name", "Basil").is_ok());
        assert!(check_name("name", "   ").is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("quantity", "must not be negative");
        assert_eq!(err.to_string(), "invalid quantity: must not be negative");
    }
}

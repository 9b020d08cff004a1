//! Render-ready projections.
//!
//! A projection joins one entity with catalog data: foreign keys become
//! display names and derived fields (stock status, order totals) are
//! computed. Projections are never stored; callers recompute them on every
//! read from the current store and catalog snapshots.

use serde::Serialize;
use std::fmt;

use crate::catalog::CatalogSnapshot;
use crate::entity::Entity;

/// Pure join of an entity with catalog data.
///
/// Implementations must not depend on anything but their inputs: the same
/// entity and snapshot always produce the same projection.
pub trait Enrich: Entity {
    type View: Clone + fmt::Debug + PartialEq + Serialize;

    fn enrich(&self, catalogs: &CatalogSnapshot) -> Self::View;
}

/// Projects a whole store snapshot, preserving order.
pub fn enrich_all<T: Enrich>(items: &[T], catalogs: &CatalogSnapshot) -> Vec<T::View> {
    items.iter().map(|item| item.enrich(catalogs)).collect()
}

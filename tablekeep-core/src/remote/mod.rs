//! Seams to the REST API.
//!
//! The [`SyncEngine`](crate::SyncEngine) and
//! [`CatalogResolver`](crate::CatalogResolver) only ever see these traits.
//! [`HttpRemote`] is the reqwest-backed implementation; tests substitute
//! in-memory fakes.

mod http;

pub use http::{check_server, HttpRemote};

use serde_json::Value;
use std::future::Future;

use crate::catalog::CatalogKind;
use crate::entity::Entity;

/// Per-entity REST collection:
///
/// - `GET    /{collection}`
/// - `GET    /{collection}/{id}`
/// - `POST   /{collection}`
/// - `PUT    /{collection}/{id}`
/// - `DELETE /{collection}/{id}`
pub trait RemoteSource<T: Entity>: Send + Sync + 'static {
    fn list(&self) -> impl Future<Output = Result<Vec<T>, RemoteError>> + Send;

    fn get_by_id(&self, id: &str) -> impl Future<Output = Result<T, RemoteError>> + Send;

    /// Sends the user's partial record; the server fills in the rest and
    /// assigns the id.
    fn create(&self, payload: &T::Patch) -> impl Future<Output = Result<T, RemoteError>> + Send;

    fn update(&self, id: &str, payload: &T) -> impl Future<Output = Result<T, RemoteError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// Read endpoints for reference data (`GET /restaurants`, `GET /units`, ...).
///
/// Returns raw records; shape mapping happens in the resolver.
pub trait CatalogSource: Send + Sync + 'static {
    fn fetch_catalog(
        &self,
        kind: CatalogKind,
    ) -> impl Future<Output = Result<Vec<Value>, RemoteError>> + Send;
}

/// Errors that can occur talking to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// Transport failure: DNS, refused connection, timeout, offline mode.
    Unreachable(String),
    /// Non-2xx response.
    Status(u16),
    /// 2xx response whose body could not be decoded.
    Malformed { status: u16, reason: String },
}

impl RemoteError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Unreachable(_) => None,
            RemoteError::Status(status) | RemoteError::Malformed { status, .. } => Some(*status),
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Unreachable(e) => write!(f, "Server unreachable: {}", e),
            RemoteError::Status(status) => write!(f, "Server returned status {}", status),
            RemoteError::Malformed { status, reason } => {
                write!(f, "Malformed response (status {}): {}", status, reason)
            }
        }
    }
}

impl std::error::Error for RemoteError {}

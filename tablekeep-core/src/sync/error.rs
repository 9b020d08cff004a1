use crate::entity::ValidationError;
use crate::remote::RemoteError;

/// Errors surfaced by [`SyncEngine`](super::SyncEngine) operations.
///
/// None of these undo an optimistic change; the local state keeps the
/// user's intent and the caller decides what to tell them.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    NetworkUnavailable,
    ServerError(u16),
    NotFound,
    Invalid(ValidationError),
}

impl SyncError {
    /// True for failures worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::NetworkUnavailable => true,
            SyncError::ServerError(status) => *status >= 500,
            SyncError::NotFound | SyncError::Invalid(_) => false,
        }
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::NetworkUnavailable => write!(f, "Network unavailable"),
            SyncError::ServerError(status) => write!(f, "Server error (status {})", status),
            SyncError::NotFound => write!(f, "Not found"),
            SyncError::Invalid(e) => write!(f, "Invalid input: {}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Unreachable(_) => SyncError::NetworkUnavailable,
            RemoteError::Status(404) => SyncError::NotFound,
            RemoteError::Status(status) => SyncError::ServerError(status),
            RemoteError::Malformed { status, .. } => SyncError::ServerError(status),
        }
    }
}

impl From<ValidationError> for SyncError {
    fn from(e: ValidationError) -> Self {
        SyncError::Invalid(e)
    }
}

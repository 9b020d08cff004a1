//! Optimistic mutations and background reconciliation.

mod completion;
mod engine;
mod error;
mod temp_id;

pub use completion::Completion;
pub use engine::{LoadOutcome, SyncEngine};
pub use error::SyncError;
pub use temp_id::{is_temp_id, TempIdStrategy, TEMP_ID_PREFIX};

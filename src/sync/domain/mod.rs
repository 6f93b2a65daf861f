//! Domain model for task synchronisation.
//!
//! Holds the task record, identifiers, assignment resolution and the
//! outbound payload. Nothing here performs I/O.

mod assignment;
mod error;
mod ids;
mod payload;
mod task;

pub use assignment::AssignmentBuckets;
pub use error::TaskDomainError;
pub use ids::{AssigneeId, InternalId, ListId, Priority, RemoteId};
pub use payload::{CustomFieldValue, TaskPayload};
pub use task::{DEFAULT_CATEGORY, SyncAction, TaskRecord};

//! Error types for sync domain validation.

use thiserror::Error;

/// Errors returned while constructing domain sync values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The internal task identifier is empty after trimming.
    #[error("internal task identifier must not be empty")]
    EmptyInternalId,

    /// The remote record identifier is empty after trimming.
    #[error("remote task identifier must not be empty")]
    EmptyRemoteId,

    /// The destination list identifier is empty after trimming.
    #[error("list identifier must not be empty")]
    EmptyListId,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The priority is outside the range accepted by the remote service.
    #[error("invalid priority {0}, expected a value between 1 and 4")]
    InvalidPriority(u8),
}

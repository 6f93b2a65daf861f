//! State store port holding the internal-to-remote identifier mapping.

use crate::sync::domain::{InternalId, RemoteId};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for state store operations.
pub type StateStoreResult<T> = Result<T, StateStoreError>;

/// Durable mapping from internal task identifier to remote identifier.
///
/// Implementations load their state wholesale on construction, mutate it in
/// memory, and rewrite it wholesale on [`StateStore::flush`]. At most one
/// remote identifier exists per internal identifier.
pub trait StateStore: Send {
    /// Returns the remote identifier mapped to `internal_id`.
    fn get(&self, internal_id: &InternalId) -> Option<RemoteId>;

    /// Maps `internal_id` to `remote_id`, replacing any previous entry.
    fn set(&mut self, internal_id: InternalId, remote_id: RemoteId);

    /// Removes the entry for `internal_id`, returning the previous value.
    fn delete(&mut self, internal_id: &InternalId) -> Option<RemoteId>;

    /// Writes the whole in-memory mapping to durable storage.
    ///
    /// Flushing twice without an intervening mutation produces identical
    /// durable state.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError`] when the durable write fails; the durable
    /// state then still holds its previous content.
    fn flush(&self) -> StateStoreResult<()>;

    /// Returns a copy of the in-memory mapping.
    fn snapshot(&self) -> BTreeMap<InternalId, RemoteId>;
}

/// Errors returned by state store implementations.
#[derive(Debug, Clone, Error)]
pub enum StateStoreError {
    /// Stored state could not be parsed.
    #[error("corrupt state file {path}: {reason}")]
    Corrupt {
        /// Location of the state.
        path: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StateStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

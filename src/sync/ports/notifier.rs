//! Notification port invoked after a successful upsert.

use crate::sync::domain::{AssigneeId, RemoteId, SyncAction, TaskRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Outcome of a successful upsert, handed to notifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertEvent {
    /// Task that was synchronised.
    pub task: TaskRecord,
    /// Remote identifier the task is mapped to.
    pub remote_id: RemoteId,
    /// Remote side effect that was performed.
    pub action: SyncAction,
    /// Assignees sent to the remote service after bucket resolution.
    pub assignees: Vec<AssigneeId>,
    /// Time the upsert completed.
    pub synced_at: DateTime<Utc>,
}

/// Capability invoked at most once per successful upsert, after the mapping
/// has been persisted.
///
/// Failures are logged by the engine and never turn the upsert into a
/// failure.
#[async_trait]
pub trait UpsertNotifier: Send + Sync {
    /// Reports the outcome of an upsert.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the notification cannot be produced or
    /// delivered.
    async fn notify(&self, event: &UpsertEvent) -> NotifierResult<()>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The message could not be rendered.
    #[error("failed to format notification: {0}")]
    Format(String),

    /// The receiving endpoint answered with a non-success status.
    #[error("notification rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The notification could not be delivered.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}

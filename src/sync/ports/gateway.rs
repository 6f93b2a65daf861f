//! Remote task gateway port.

use crate::sync::domain::{ListId, RemoteId, TaskPayload};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote gateway operations.
pub type RemoteGatewayResult<T> = Result<T, RemoteGatewayError>;

/// Create and update primitives of the remote task-management API.
#[async_trait]
pub trait RemoteTaskGateway: Send + Sync {
    /// Creates a task in the given list and returns its remote identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteGatewayError::Rejected`] when the service refuses the
    /// request or [`RemoteGatewayError::Transport`] when it cannot be reached.
    async fn create(&self, list_id: &ListId, payload: &TaskPayload)
    -> RemoteGatewayResult<RemoteId>;

    /// Updates an existing remote task.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteGatewayError::NotFound`] when the remote task no longer
    /// exists, and the other variants as for [`RemoteTaskGateway::create`].
    async fn update(&self, remote_id: &RemoteId, payload: &TaskPayload)
    -> RemoteGatewayResult<()>;
}

/// Errors returned by remote gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum RemoteGatewayError {
    /// The remote record does not exist.
    #[error("remote task {0} not found")]
    NotFound(RemoteId),

    /// The service answered with a non-success status.
    #[error("remote service rejected the request with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Raw response body, unmodified.
        body: String,
    },

    /// The service answered successfully but the response was unusable.
    #[error("malformed remote response: {0}")]
    MalformedResponse(String),

    /// The request could not be completed.
    #[error("remote transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteGatewayError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

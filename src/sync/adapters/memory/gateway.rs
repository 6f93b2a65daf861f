//! In-memory remote gateway adapter for engine tests.

use crate::sync::{
    domain::{ListId, RemoteId, TaskPayload},
    ports::{RemoteGatewayError, RemoteGatewayResult, RemoteTaskGateway},
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

/// Remote call observed by [`InMemoryRemoteGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    /// A create call against a list.
    Create {
        /// Destination list.
        list_id: ListId,
        /// Payload sent.
        payload: TaskPayload,
    },
    /// An update call against an existing remote record.
    Update {
        /// Target remote record.
        remote_id: RemoteId,
        /// Payload sent.
        payload: TaskPayload,
    },
}

/// Remote record held by [`InMemoryRemoteGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTaskRecord {
    /// List the record was created in.
    pub list_id: ListId,
    /// Latest payload written to the record.
    pub payload: TaskPayload,
}

/// In-memory stand-in for the remote task service.
///
/// Clones share state, so a test can keep a handle after moving the gateway
/// into the engine. Remote identifiers are taken from the queue filled by
/// [`InMemoryRemoteGateway::queue_remote_ids`] and generated otherwise.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemoteGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    records: HashMap<RemoteId, RemoteTaskRecord>,
    queued_ids: VecDeque<String>,
    next_id: u64,
    create_failures: VecDeque<RemoteGatewayError>,
    update_failures: VecDeque<RemoteGatewayError>,
    calls: Vec<GatewayCall>,
}

fn lock_error(err: impl std::fmt::Display) -> RemoteGatewayError {
    RemoteGatewayError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryRemoteGateway {
    /// Creates an empty in-memory gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues identifiers handed out by subsequent successful creates.
    ///
    /// # Errors
    ///
    /// Returns gateway transport errors when lock acquisition fails.
    pub fn queue_remote_ids<I, S>(&self, ids: I) -> RemoteGatewayResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.write().map_err(lock_error)?;
        state.queued_ids.extend(ids.into_iter().map(Into::into));
        Ok(())
    }

    /// Makes the next create call fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns gateway transport errors when lock acquisition fails.
    pub fn fail_next_create(&self, error: RemoteGatewayError) -> RemoteGatewayResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.create_failures.push_back(error);
        Ok(())
    }

    /// Makes the next update call fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns gateway transport errors when lock acquisition fails.
    pub fn fail_next_update(&self, error: RemoteGatewayError) -> RemoteGatewayResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.update_failures.push_back(error);
        Ok(())
    }

    /// Deletes a remote record out-of-band, as a user of the remote service
    /// would.
    ///
    /// # Errors
    ///
    /// Returns gateway transport errors when lock acquisition fails.
    pub fn delete_remote(&self, remote_id: &RemoteId) -> RemoteGatewayResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        Ok(state.records.remove(remote_id).is_some())
    }

    /// Returns the remote record for `remote_id`, if it exists.
    ///
    /// # Errors
    ///
    /// Returns gateway transport errors when lock acquisition fails.
    pub fn remote_record(
        &self,
        remote_id: &RemoteId,
    ) -> RemoteGatewayResult<Option<RemoteTaskRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.records.get(remote_id).cloned())
    }

    /// Returns every call received so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns gateway transport errors when lock acquisition fails.
    pub fn calls(&self) -> RemoteGatewayResult<Vec<GatewayCall>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.calls.clone())
    }
}

impl InMemoryGatewayState {
    fn allocate_id(&mut self) -> RemoteGatewayResult<RemoteId> {
        let raw = if let Some(queued) = self.queued_ids.pop_front() {
            queued
        } else {
            self.next_id += 1;
            format!("task-{}", self.next_id)
        };
        RemoteId::new(raw).map_err(|err| RemoteGatewayError::MalformedResponse(err.to_string()))
    }
}

#[async_trait]
impl RemoteTaskGateway for InMemoryRemoteGateway {
    async fn create(
        &self,
        list_id: &ListId,
        payload: &TaskPayload,
    ) -> RemoteGatewayResult<RemoteId> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(GatewayCall::Create {
            list_id: list_id.clone(),
            payload: payload.clone(),
        });
        if let Some(error) = state.create_failures.pop_front() {
            return Err(error);
        }

        let remote_id = state.allocate_id()?;
        state.records.insert(
            remote_id.clone(),
            RemoteTaskRecord {
                list_id: list_id.clone(),
                payload: payload.clone(),
            },
        );
        Ok(remote_id)
    }

    async fn update(&self, remote_id: &RemoteId, payload: &TaskPayload) -> RemoteGatewayResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(GatewayCall::Update {
            remote_id: remote_id.clone(),
            payload: payload.clone(),
        });
        if let Some(error) = state.update_failures.pop_front() {
            return Err(error);
        }

        let record = state
            .records
            .get_mut(remote_id)
            .ok_or_else(|| RemoteGatewayError::NotFound(remote_id.clone()))?;
        record.payload = payload.clone();
        Ok(())
    }
}

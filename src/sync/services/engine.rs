//! Reconciliation engine: idempotent create-or-update of remote tasks.

use crate::sync::{
    adapters::notify::LoggingNotifier,
    domain::{
        AssigneeId, AssignmentBuckets, InternalId, ListId, RemoteId, SyncAction, TaskPayload,
        TaskRecord,
    },
    ports::{
        RemoteGatewayError, RemoteTaskGateway, StateStore, StateStoreError, UpsertEvent,
        UpsertNotifier,
    },
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// How long an upsert waits for its notifier by default.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings fixed at engine construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// List that receives new tasks without a target list override.
    pub default_list_id: ListId,
    /// Default assignees by task category.
    pub buckets: AssignmentBuckets,
    /// Upper bound on the wait for the notifier; a slower notifier is
    /// abandoned and logged.
    pub notify_timeout: Duration,
}

impl EngineConfig {
    /// Creates a configuration with no assignment buckets.
    #[must_use]
    pub fn new(default_list_id: ListId) -> Self {
        Self {
            default_list_id,
            buckets: AssignmentBuckets::new(),
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    /// Sets the assignment buckets.
    #[must_use]
    pub fn with_buckets(mut self, buckets: AssignmentBuckets) -> Self {
        self.buckets = buckets;
        self
    }

    /// Sets the notifier wait limit.
    #[must_use]
    pub const fn with_notify_timeout(mut self, notify_timeout: Duration) -> Self {
        self.notify_timeout = notify_timeout;
        self
    }
}

/// Successful upsert result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Remote identifier now mapped to the task.
    pub remote_id: RemoteId,
    /// Remote side effect that was performed.
    pub action: SyncAction,
}

/// Errors that abort an upsert.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote service rejected a call or could not be reached.
    #[error(transparent)]
    Remote(#[from] RemoteGatewayError),

    /// A stale mapping was detected but its removal could not be persisted.
    #[error("failed to persist removal of stale mapping for {internal_id}: {source}")]
    StaleRepair {
        /// Task whose mapping was stale.
        internal_id: InternalId,
        /// Underlying store failure.
        #[source]
        source: StateStoreError,
    },

    /// The remote record was created but the mapping could not be persisted.
    ///
    /// The mapping is kept in memory, so later upserts in the same process
    /// still update `remote_id`.
    #[error("created remote task {remote_id} for {internal_id} but failed to persist mapping: {source}")]
    Persistence {
        /// Task that was created.
        internal_id: InternalId,
        /// Identifier of the created remote record.
        remote_id: RemoteId,
        /// Underlying store failure.
        #[source]
        source: StateStoreError,
    },
}

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Drives the upsert protocol between task records, the state store and the
/// remote gateway.
///
/// The state store sits behind an async mutex that is held for the whole
/// read, remote call, mutate and flush sequence, so concurrent upserts on one
/// engine are serialised.
pub struct SyncEngine<G, S, C>
where
    G: RemoteTaskGateway,
    S: StateStore,
    C: Clock + Send + Sync,
{
    gateway: Arc<G>,
    store: Mutex<S>,
    notifier: Arc<dyn UpsertNotifier>,
    clock: Arc<C>,
    config: EngineConfig,
}

impl<G, S, C> SyncEngine<G, S, C>
where
    G: RemoteTaskGateway,
    S: StateStore,
    C: Clock + Send + Sync,
{
    /// Creates an engine that reports upserts through [`LoggingNotifier`].
    #[must_use]
    pub fn new(gateway: Arc<G>, store: S, clock: Arc<C>, config: EngineConfig) -> Self {
        Self {
            gateway,
            store: Mutex::new(store),
            notifier: Arc::new(LoggingNotifier),
            clock,
            config,
        }
    }

    /// Replaces the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn UpsertNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the remote identifier currently mapped to `internal_id`.
    pub async fn remote_id_for(&self, internal_id: &InternalId) -> Option<RemoteId> {
        self.store.lock().await.get(internal_id)
    }

    /// Creates or updates the remote counterpart of `task`.
    ///
    /// Failures are logged with their diagnostic text and reported as
    /// `None`; use [`SyncEngine::try_upsert`] to inspect them.
    pub async fn upsert(&self, task: &TaskRecord) -> Option<RemoteId> {
        match self.try_upsert(task).await {
            Ok(outcome) => Some(outcome.remote_id),
            Err(err) => {
                error!(internal_id = %task.internal_id(), error = %err, "Upsert failed");
                None
            }
        }
    }

    /// Creates or updates the remote counterpart of `task`.
    ///
    /// A known mapping is updated in place. When the remote record has been
    /// deleted out-of-band the stale mapping is removed and persisted before
    /// a new record is created. New mappings are persisted before the
    /// notifier runs; notifier failures never fail the upsert.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] when the remote service rejects a call or
    /// cannot be reached, and the persistence variants when the state store
    /// cannot be flushed.
    pub async fn try_upsert(&self, task: &TaskRecord) -> SyncResult<UpsertOutcome> {
        let internal_id = task.internal_id();
        let list_id = task
            .target_list_id()
            .unwrap_or(&self.config.default_list_id);
        let assignees = self.config.buckets.resolve(task.assignees(), task.category());
        let payload = TaskPayload::build(task, assignees.clone());

        let mut store = self.store.lock().await;
        if let Some(remote_id) = store.get(internal_id) {
            match self.gateway.update(&remote_id, &payload).await {
                Ok(()) => {
                    drop(store);
                    let outcome = UpsertOutcome {
                        remote_id,
                        action: SyncAction::Updated,
                    };
                    self.notify(task, &outcome, assignees).await;
                    return Ok(outcome);
                }
                Err(RemoteGatewayError::NotFound(_)) => {
                    warn!(
                        internal_id = %internal_id,
                        remote_id = %remote_id,
                        "Remote task was deleted, recreating"
                    );
                    let removed = store.delete(internal_id);
                    if let Err(source) = store.flush() {
                        if let Some(stale) = removed {
                            store.set(internal_id.clone(), stale);
                        }
                        return Err(SyncError::StaleRepair {
                            internal_id: internal_id.clone(),
                            source,
                        });
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }

        let remote_id = self.gateway.create(list_id, &payload).await?;
        store.set(internal_id.clone(), remote_id.clone());
        if let Err(source) = store.flush() {
            return Err(SyncError::Persistence {
                internal_id: internal_id.clone(),
                remote_id,
                source,
            });
        }
        drop(store);

        let outcome = UpsertOutcome {
            remote_id,
            action: SyncAction::Created,
        };
        self.notify(task, &outcome, assignees).await;
        Ok(outcome)
    }

    async fn notify(
        &self,
        task: &TaskRecord,
        outcome: &UpsertOutcome,
        assignees: Vec<AssigneeId>,
    ) {
        let event = UpsertEvent {
            task: task.clone(),
            remote_id: outcome.remote_id.clone(),
            action: outcome.action,
            assignees,
            synced_at: self.clock.utc(),
        };
        let notifier = Arc::clone(&self.notifier);
        let mut handle = tokio::spawn(async move { notifier.notify(&event).await });

        let Ok(joined) = tokio::time::timeout(self.config.notify_timeout, &mut handle).await else {
            handle.abort();
            warn!(
                internal_id = %task.internal_id(),
                timeout_ms = self.config.notify_timeout.as_millis(),
                "Notifier timed out, upsert result unaffected"
            );
            return;
        };
        match joined {
            Ok(Ok(())) => info!(
                internal_id = %task.internal_id(),
                remote_id = %outcome.remote_id,
                action = %outcome.action,
                "Upsert complete"
            ),
            Ok(Err(err)) => warn!(
                internal_id = %task.internal_id(),
                error = %err,
                "Notifier failed, upsert result unaffected"
            ),
            Err(err) => warn!(
                internal_id = %task.internal_id(),
                error = %err,
                "Notifier aborted, upsert result unaffected"
            ),
        }
    }
}

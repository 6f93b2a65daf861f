//! In-memory state store adapter with an inspectable durable copy.

use crate::sync::{
    domain::{InternalId, RemoteId},
    ports::{StateStore, StateStoreError, StateStoreResult},
};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// State store that keeps its "durable" copy in shared memory.
///
/// The working mapping is private to the store; the durable copy is only
/// replaced on [`StateStore::flush`] and can be observed through
/// [`InMemoryStateStore::durable`].
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    entries: BTreeMap<InternalId, RemoteId>,
    durable: DurableState,
}

/// Shared view of the last flushed mapping of an [`InMemoryStateStore`].
#[derive(Debug, Clone, Default)]
pub struct DurableState {
    inner: Arc<RwLock<DurableInner>>,
}

#[derive(Debug, Default)]
struct DurableInner {
    entries: BTreeMap<InternalId, RemoteId>,
    flush_count: usize,
    fail_flushes: bool,
}

fn lock_error(err: impl std::fmt::Display) -> StateStoreError {
    StateStoreError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryStateStore {
    /// Creates an empty store, as if no state had been persisted before.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose working and durable mappings hold `entries`, as
    /// if they had been loaded at startup.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError`] when lock acquisition fails.
    pub fn with_entries(
        entries: impl IntoIterator<Item = (InternalId, RemoteId)>,
    ) -> StateStoreResult<Self> {
        let store = Self {
            entries: entries.into_iter().collect(),
            durable: DurableState::default(),
        };
        store.durable.replace(&store.entries)?;
        Ok(store)
    }

    /// Returns a handle to the durable copy.
    #[must_use]
    pub fn durable(&self) -> DurableState {
        self.durable.clone()
    }
}

impl DurableState {
    /// Returns the last flushed mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError`] when lock acquisition fails.
    pub fn entries(&self) -> StateStoreResult<BTreeMap<InternalId, RemoteId>> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner.entries.clone())
    }

    /// Returns how many flushes have succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError`] when lock acquisition fails.
    pub fn flush_count(&self) -> StateStoreResult<usize> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner.flush_count)
    }

    /// Makes subsequent flushes fail (or succeed again).
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError`] when lock acquisition fails.
    pub fn set_fail_flushes(&self, fail: bool) -> StateStoreResult<()> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        inner.fail_flushes = fail;
        Ok(())
    }

    fn replace(&self, entries: &BTreeMap<InternalId, RemoteId>) -> StateStoreResult<()> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        inner.entries.clone_from(entries);
        Ok(())
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, internal_id: &InternalId) -> Option<RemoteId> {
        self.entries.get(internal_id).cloned()
    }

    fn set(&mut self, internal_id: InternalId, remote_id: RemoteId) {
        self.entries.insert(internal_id, remote_id);
    }

    fn delete(&mut self, internal_id: &InternalId) -> Option<RemoteId> {
        self.entries.remove(internal_id)
    }

    fn flush(&self) -> StateStoreResult<()> {
        let mut inner = self.durable.inner.write().map_err(lock_error)?;
        if inner.fail_flushes {
            return Err(StateStoreError::persistence(std::io::Error::other(
                "simulated flush failure",
            )));
        }
        inner.entries.clone_from(&self.entries);
        inner.flush_count += 1;
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<InternalId, RemoteId> {
        self.entries.clone()
    }
}

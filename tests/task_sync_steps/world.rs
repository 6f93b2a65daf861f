//! Shared world state for task sync BDD scenarios.

use std::sync::Arc;

use clickflow::sync::{
    adapters::memory::{DurableState, InMemoryRemoteGateway, InMemoryStateStore},
    domain::{ListId, RemoteId},
    services::{EngineConfig, SyncEngine},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Engine type used by the BDD world.
pub type TestSyncEngine = SyncEngine<InMemoryRemoteGateway, InMemoryStateStore, DefaultClock>;

/// Scenario world for task sync behaviour tests.
pub struct TaskSyncWorld {
    pub gateway: InMemoryRemoteGateway,
    pub engine: Option<TestSyncEngine>,
    pub durable: Option<DurableState>,
    pub last_result: Option<Option<RemoteId>>,
}

impl TaskSyncWorld {
    /// Creates a world without an engine; a `Given` step installs one.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gateway: InMemoryRemoteGateway::new(),
            engine: None,
            durable: None,
            last_result: None,
        }
    }

    /// Installs an engine over `store`.
    pub fn install(&mut self, store: InMemoryStateStore) -> Result<(), eyre::Report> {
        let list_id = ListId::new("900100").map_err(|err| eyre::eyre!("{err}"))?;
        self.durable = Some(store.durable());
        self.engine = Some(SyncEngine::new(
            Arc::new(self.gateway.clone()),
            store,
            Arc::new(DefaultClock),
            EngineConfig::new(list_id),
        ));
        Ok(())
    }
}

impl Default for TaskSyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskSyncWorld {
    TaskSyncWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

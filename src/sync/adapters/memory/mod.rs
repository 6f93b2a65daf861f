//! In-memory adapters for deterministic engine tests.

mod gateway;
mod state_store;

pub use gateway::{GatewayCall, InMemoryRemoteGateway, RemoteTaskRecord};
pub use state_store::{DurableState, InMemoryStateStore};

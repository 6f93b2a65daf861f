//! Port contracts for task synchronisation.
//!
//! Ports define infrastructure-agnostic interfaces used by the sync engine.

pub mod gateway;
pub mod notifier;
pub mod state_store;

pub use gateway::{RemoteGatewayError, RemoteGatewayResult, RemoteTaskGateway};
pub use notifier::{NotifierError, NotifierResult, UpsertEvent, UpsertNotifier};
pub use state_store::{StateStore, StateStoreError, StateStoreResult};

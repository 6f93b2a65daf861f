//! Application services for task synchronisation.

mod engine;

pub use engine::{
    DEFAULT_NOTIFY_TIMEOUT, EngineConfig, SyncEngine, SyncError, SyncResult, UpsertOutcome,
};

//! File-backed adapters.

mod json_state_store;

pub use json_state_store::{DEFAULT_STATE_FILE, JsonFileStateStore};

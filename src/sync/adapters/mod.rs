//! Adapter implementations for the sync ports.

pub mod clickup;
pub mod file;
pub mod memory;
pub mod notify;

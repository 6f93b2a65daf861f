//! Task synchronisation into ClickUp.
//!
//! Mirrors locally defined task records into a remote project-management
//! service while keeping a durable mapping from internal task identifier to
//! remote record identifier. The mapping makes upserts idempotent and lets
//! the engine detect and repair records deleted on the remote side. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Clickflow: idempotent task synchronisation into ClickUp.
//!
//! This crate mirrors locally defined tasks (security findings, orders, and
//! the like) into ClickUp, keeping a durable mapping between each internal
//! task identifier and the remote record created for it, and optionally
//! announcing the outcome on Slack.
//!
//! # Architecture
//!
//! Clickflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure task, payload and assignment types
//! - **Ports**: Abstract trait interfaces for the remote service, the state
//!   store and notifications
//! - **Adapters**: ClickUp HTTP, JSON state file, Slack, and in-memory test
//!   doubles
//!
//! # Modules
//!
//! - [`sync`]: Reconciliation engine and its ports and adapters
//! - [`config`]: Explicit runtime configuration

pub mod config;
pub mod sync;

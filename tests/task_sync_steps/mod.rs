//! Step definitions for task sync behaviour scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;

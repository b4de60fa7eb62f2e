//! codescope-core
//!
//! Core library for the codescope analysis dashboard.
//!
//! Source text goes through the heuristic scorer (`analysis`), lands in the
//! result store (`store`) as a revisioned record, and is read back by the four
//! widget renderers (`widgets`). The persistence gateway (`gateway`) saves
//! records to the project database (`db`) and pushes realtime updates; the
//! dashboard context (`dashboard`) wires a store to a gateway.
//!
//! Frontends (the CLI today) only drive these types and print what they return.

pub mod model;
pub mod analysis;
pub mod store;
pub mod gateway;
pub mod dashboard;
pub mod widgets;
pub mod db;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Crate-level tests that drive whole turns through the engine.
//!
//! - `determinism.rs`: same configuration and commands give the same board
//! - `integration.rs`: end-to-end movement, rotation and connectivity scenarios
//! - `invariants.rs`: property tests over random command sequences
//! - `helpers.rs`: board setup and inspection utilities

mod determinism;
mod helpers;
mod invariants;

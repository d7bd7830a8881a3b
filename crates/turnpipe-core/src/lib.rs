//! # Turnpipe Core
//!
//! Turn-based rule engine for a tile-grid pipe rotation puzzle.
//!
//! Entities sit on a rectangular grid, one per tile. Slot 0 holds the pivot.
//! Each player command is resolved as a transactional turn: either every
//! mutation commits, or the board rolls back to where the turn started.
//!
//! ## Architecture
//!
//! - **Store** ([`store`]): struct-of-arrays entity storage with a tile index
//! - **Board** ([`board`], [`turn`]): turn transactions, rotation counters and
//!   stall feedback
//! - **Resolvers** ([`resolver`]): straight-line pushing, quarter turns along
//!   quantized arcs, connectivity propagation
//! - **Engine** ([`engine`]): configuration, command routing and the frame
//!   view for renderers
//!
//! ## Usage
//!
//! ```rust
//! use turnpipe_core::{Command, Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! let outcome = engine.apply(Command::MoveRight);
//! assert!(outcome.is_committed());
//! assert_eq!(engine.view().pivot().unwrap().position.x, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the grid substrate
pub use turnpipe_grid;

pub mod board;
pub mod config;
pub mod engine;
pub mod entity;
pub mod hash;
pub mod layout;
pub mod output;
pub mod resolver;
pub mod store;
pub mod turn;
pub mod view;

pub use board::{Board, PartialRotation, RotationCounts};
pub use config::{ConfigError, EngineConfig, Layout, Placement};
pub use engine::Engine;
pub use entity::{EntityFlags, EntityId, EntityType};
pub use output::{Command, CommandKind, TurnFailure, TurnOutcome};
pub use store::{EntityStore, StoreError};
pub use view::{EntityView, FrameSnapshot, FrameView};

#[cfg(test)]
mod tests;

//! The engine facade: board, resolvers and configuration in one place.
//!
//! An [`Engine`] is built from an [`EngineConfig`], routes each [`Command`] to
//! the resolver that handles its kind and exposes the board through a
//! read-only [`FrameView`] for rendering.
//!
//! # Example
//!
//! ```
//! use turnpipe_core::config::{EngineConfig, Layout};
//! use turnpipe_core::engine::Engine;
//! use turnpipe_core::output::Command;
//!
//! let mut engine = Engine::new(EngineConfig::with_grid(6, 6).with_layout(Layout::Empty)).unwrap();
//! assert!(engine.apply(Command::MoveRight).is_committed());
//! assert!(engine.apply(Command::RotateLeft).is_committed());
//!
//! let counts = engine.take_rotation_counts();
//! assert_eq!(counts.left, 1);
//! ```

use std::fmt;

use tracing::{debug, info};
use turnpipe_grid::{Direction, Rotation};

use crate::board::{Board, PartialRotation, RotationCounts};
use crate::config::{ConfigError, EngineConfig};
use crate::hash::hash_board;
use crate::layout;
use crate::output::{Command, TurnOutcome};
use crate::resolver::{rotation_pushes, LinearResolver, Push, Resolver, RotationResolver};
use crate::store::EntityStore;
use crate::view::FrameView;

// =============================================================================
// Engine
// =============================================================================

/// Owns a board and the resolvers that act on it.
pub struct Engine {
    board: Board,
    resolvers: Vec<Box<dyn Resolver>>,
    config: EngineConfig,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("board", &self.board)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("config", &self.config)
            .finish()
    }
}

impl Engine {
    /// Builds the board described by `config`.
    ///
    /// The pivot is placed first and is always movable. Layout entities that
    /// cannot be placed are skipped. No connectivity pass runs here; the
    /// first committed turn performs it.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Grid`] for unusable grid dimensions
    /// - [`ConfigError::Pivot`] if the pivot lies outside the grid
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let bounds = config.bounds()?;
        let mut store = EntityStore::new(bounds);
        let pivot = config.pivot;
        store
            .place(pivot.kind, pivot.position, true, pivot.orientation)
            .map_err(ConfigError::Pivot)?;
        let placed = layout::populate(&config.layout, &mut store);

        info!(
            columns = bounds.columns(),
            rows = bounds.rows(),
            entities = store.len(),
            placed,
            "engine_ready"
        );

        Ok(Self {
            board: Board::new(store),
            resolvers: vec![
                Box::new(LinearResolver::new()),
                Box::new(RotationResolver::new()),
            ],
            config,
        })
    }

    /// Parses a JSON configuration and builds the engine.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::new(EngineConfig::from_json_str(json)?)
    }

    /// Resolves one player command as a full turn.
    pub fn apply(&mut self, command: Command) -> TurnOutcome {
        let kind = command.kind();
        let board = &mut self.board;
        let outcome = self
            .resolvers
            .iter()
            .find(|resolver| resolver.handles().contains(&kind))
            .map_or(TurnOutcome::Committed, |resolver| {
                resolver.resolve(command, board)
            });
        debug!(%command, %outcome, "command_applied");
        outcome
    }

    /// Moves every movable entity one tile.
    pub fn move_all(&mut self, direction: Direction) -> TurnOutcome {
        self.apply(Command::from(direction))
    }

    /// Rotates the movable group a quarter turn around the pivot.
    pub fn rotate(&mut self, rotation: Rotation) -> TurnOutcome {
        self.apply(Command::from(rotation))
    }

    /// Pushes the rotation would attempt, in execution order, without
    /// touching the board.
    #[must_use]
    pub fn preview_rotation(&self, rotation: Rotation) -> Vec<Push> {
        rotation_pushes(self.board.store(), rotation)
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board, for editing entities between turns.
    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The configuration this engine was built from.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view for rendering.
    #[must_use]
    pub fn view(&self) -> FrameView<'_> {
        FrameView::new(&self.board)
    }

    /// Drains committed rotations; see [`Board::take_rotation_counts`].
    pub fn take_rotation_counts(&mut self) -> RotationCounts {
        self.board.take_rotation_counts()
    }

    /// Consumes stall feedback; see [`Board::take_partial_rotation`].
    pub fn take_partial_rotation(&mut self) -> Option<PartialRotation> {
        self.board.take_partial_rotation()
    }

    /// Deterministic hash of the board state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        hash_board(&self.board)
    }
}

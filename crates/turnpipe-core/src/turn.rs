//! Per-turn transaction state.
//!
//! A turn is opened with [`Board::begin_turn`](crate::board::Board::begin_turn),
//! which snapshots every transform and hands back a [`TurnContext`]. Resolvers
//! record failures on the context instead of unwinding; the board decides at
//! [`finalize_turn`](crate::board::Board::finalize_turn) whether to commit or to
//! restore the snapshot.
//!
//! # State Machine
//!
//! ```text
//! Idle --begin_turn--> InTurn --finalize_turn/abort_turn--> Committing --> Idle
//! ```

use serde::{Deserialize, Serialize};
use turnpipe_grid::{Direction, Rotation, TileMap, TilePos};

use crate::board::RotationCounts;
use crate::output::TurnFailure;
use crate::store::EntityStore;

/// Transaction phase of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No turn is open.
    #[default]
    Idle,
    /// A turn is open and accepting changes.
    InTurn,
    /// The open turn is being committed or rolled back.
    Committing,
}

/// Copy of every transform taken at turn start.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnSnapshot {
    positions: Vec<TilePos>,
    orientations: Vec<Direction>,
    tiles: TileMap,
}

impl TurnSnapshot {
    /// Captures positions, orientations and the tile map.
    #[must_use]
    pub fn capture(store: &EntityStore) -> Self {
        Self {
            positions: store.positions().to_vec(),
            orientations: store.orientations().to_vec(),
            tiles: store.tile_map().clone(),
        }
    }

    /// Writes the captured transforms back verbatim.
    pub fn restore(&self, store: &mut EntityStore) {
        store.restore_transforms(&self.positions, &self.orientations, &self.tiles);
    }
}

/// State of one open turn.
#[derive(Debug)]
#[must_use = "an open turn must be finalized or aborted"]
pub struct TurnContext {
    pub(crate) snapshot: TurnSnapshot,
    pub(crate) failure: Option<TurnFailure>,
    pub(crate) pending: RotationCounts,
}

impl TurnContext {
    pub(crate) fn new(snapshot: TurnSnapshot) -> Self {
        Self {
            snapshot,
            failure: None,
            pending: RotationCounts::default(),
        }
    }

    /// `true` until a failure is recorded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// First failure recorded in this turn.
    #[must_use]
    pub fn failure(&self) -> Option<TurnFailure> {
        self.failure
    }

    /// Marks the turn as failed. Later failures do not replace the first.
    pub fn fail(&mut self, failure: TurnFailure) {
        self.failure.get_or_insert(failure);
    }

    /// Queues a completed quarter turn; it reaches the board only on commit.
    pub fn queue_rotation(&mut self, rotation: Rotation) {
        self.pending.add(rotation);
    }

    /// Quarter turns queued so far.
    #[must_use]
    pub fn pending_rotations(&self) -> RotationCounts {
        self.pending
    }
}

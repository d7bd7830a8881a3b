//! The board: entity store plus the turn transaction manager.
//!
//! [`Board`] owns the [`EntityStore`] and everything that persists between
//! commands: accumulated rotation counters for the renderer and the
//! partial-rotation feedback left by a stalled turn. It also drives the turn
//! state machine described in [`crate::turn`].
//!
//! # Commit and Rollback
//!
//! - Commit recomputes connectivity and folds the turn's queued rotations into
//!   [`RotationCounts`].
//! - Rollback restores the snapshot taken by [`Board::begin_turn`] and zeroes
//!   motion deltas.
//! - Both clear the `MOVED` marker on every slot.

use serde::{Deserialize, Serialize};
use tracing::trace;
use turnpipe_grid::Rotation;

use crate::entity::EntityFlags;
use crate::output::{TurnFailure, TurnOutcome};
use crate::resolver::update_all_connections;
use crate::store::EntityStore;
use crate::turn::{TurnContext, TurnPhase, TurnSnapshot};

/// Quarter turns applied but not yet consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RotationCounts {
    /// Counter-clockwise turns.
    pub left: u32,
    /// Clockwise turns.
    pub right: u32,
}

impl RotationCounts {
    /// Counts one turn.
    pub fn add(&mut self, rotation: Rotation) {
        match rotation {
            Rotation::Left => self.left += 1,
            Rotation::Right => self.right += 1,
        }
    }

    /// Adds another set of counts to this one.
    pub fn merge(&mut self, other: RotationCounts) {
        self.left += other.left;
        self.right += other.right;
    }

    /// Returns `true` if no turn is pending.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0
    }
}

/// How far a stalled rotation got before it was rolled back.
///
/// `sign` is `0` while there is nothing to report and `1` once a rotation
/// stalls. `angle` is the arc angle of the failing push, negated and
/// multiplied by the rotation's sign.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialRotation {
    /// Signed angle in radians.
    pub angle: f32,
    /// Marker; non-zero when feedback is pending.
    pub sign: i32,
}

impl PartialRotation {
    /// Feedback for a rotation that stalled on a push at `priority`.
    #[must_use]
    pub fn stalled(priority: f32, rotation: Rotation) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let sign = rotation.sign() as f32;
        Self {
            angle: -priority * sign,
            sign: 1,
        }
    }

    /// Returns `true` if feedback is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.sign != 0
    }
}

/// Entity store plus persistent turn bookkeeping.
#[derive(Debug, Clone)]
pub struct Board {
    store: EntityStore,
    rotation_counts: RotationCounts,
    partial_rotation: PartialRotation,
    phase: TurnPhase,
}

impl Board {
    /// Wraps a populated store.
    #[must_use]
    pub fn new(store: EntityStore) -> Self {
        Self {
            store,
            rotation_counts: RotationCounts::default(),
            partial_rotation: PartialRotation::default(),
            phase: TurnPhase::Idle,
        }
    }

    /// Read access to the entity store.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Write access to the entity store, for administrative placement and
    /// removal between turns.
    pub(crate) fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Current transaction phase.
    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Rotation counters accumulated since the last
    /// [`take_rotation_counts`](Self::take_rotation_counts).
    #[must_use]
    pub const fn rotation_counts(&self) -> RotationCounts {
        self.rotation_counts
    }

    /// Current partial-rotation feedback.
    #[must_use]
    pub const fn partial_rotation(&self) -> PartialRotation {
        self.partial_rotation
    }

    /// Returns the pending rotation counters and zeroes them.
    pub fn take_rotation_counts(&mut self) -> RotationCounts {
        std::mem::take(&mut self.rotation_counts)
    }

    /// Returns pending partial-rotation feedback once, then clears its sign.
    pub fn take_partial_rotation(&mut self) -> Option<PartialRotation> {
        if !self.partial_rotation.is_pending() {
            return None;
        }
        let feedback = self.partial_rotation;
        self.partial_rotation.sign = 0;
        Some(feedback)
    }

    pub(crate) fn set_partial_rotation(&mut self, feedback: PartialRotation) {
        self.partial_rotation = feedback;
    }

    /// Puts back a whole store captured before a multi-turn operation.
    pub(crate) fn restore_store(&mut self, store: EntityStore) {
        debug_assert_eq!(self.phase, TurnPhase::Idle);
        self.store = store;
        self.store.clear_deltas();
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Opens a turn.
    ///
    /// Clears `MOVED` and every motion delta, snapshots positions,
    /// orientations and the tile map.
    pub fn begin_turn(&mut self) -> TurnContext {
        debug_assert_eq!(self.phase, TurnPhase::Idle, "turn already open");
        self.store.remove_flags_everywhere(EntityFlags::MOVED);
        self.store.clear_deltas();
        self.phase = TurnPhase::InTurn;
        TurnContext::new(TurnSnapshot::capture(&self.store))
    }

    /// Clears the rotation-scoped markers `TEMPORARILY_MOVABLE` and `PUSHED`.
    pub fn begin_rotation_subphase(&mut self) {
        self.store.remove_flags_everywhere(
            EntityFlags::TEMPORARILY_MOVABLE | EntityFlags::PUSHED,
        );
    }

    /// Closes a turn: commits it if no failure was recorded, otherwise
    /// restores the snapshot.
    pub fn finalize_turn(&mut self, turn: TurnContext) -> TurnOutcome {
        debug_assert_eq!(self.phase, TurnPhase::InTurn, "no open turn");
        self.phase = TurnPhase::Committing;

        let TurnContext {
            snapshot,
            failure,
            pending,
        } = turn;
        let outcome = match failure {
            None => {
                update_all_connections(&mut self.store);
                self.rotation_counts.merge(pending);
                trace!(left = pending.left, right = pending.right, "turn_committed");
                TurnOutcome::Committed
            }
            Some(failure) => {
                snapshot.restore(&mut self.store);
                self.store.clear_deltas();
                trace!(failure = %failure, "turn_rolled_back");
                TurnOutcome::Aborted { failure }
            }
        };

        self.store.remove_flags_everywhere(EntityFlags::MOVED);
        self.phase = TurnPhase::Idle;
        debug_assert!(self.store.is_consistent(), "tile map out of sync");
        outcome
    }

    /// Closes a turn by forcing the rollback path.
    pub fn abort_turn(&mut self, mut turn: TurnContext, failure: TurnFailure) -> TurnOutcome {
        turn.fail(failure);
        self.finalize_turn(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType;
    use turnpipe_grid::{Direction, GridBounds, TilePos};

    fn board() -> Board {
        let mut store = EntityStore::new(GridBounds::try_new(5, 5).unwrap());
        store
            .place(EntityType::StraightPipe, TilePos::new(1, 1), true, Direction::Right)
            .unwrap();
        store
            .place(EntityType::StraightPipe, TilePos::new(3, 1), false, Direction::Right)
            .unwrap();
        Board::new(store)
    }

    mod transaction_tests {
        use super::*;

        #[test]
        fn begin_turn_opens_and_clears_markers() {
            let mut board = board();
            board.store_mut().insert_flags(1, EntityFlags::MOVED);
            board.store_mut().set_delta(1, glam::IVec2::X);

            let turn = board.begin_turn();
            assert_eq!(board.phase(), TurnPhase::InTurn);
            assert!(!board.store().flags(1).contains(EntityFlags::MOVED));
            assert_eq!(board.store().delta(1), glam::IVec2::ZERO);

            assert!(board.finalize_turn(turn).is_committed());
            assert_eq!(board.phase(), TurnPhase::Idle);
        }

        #[test]
        fn commit_recomputes_connectivity() {
            let mut board = board();
            let turn = board.begin_turn();
            board.store_mut().relocate(0, TilePos::new(2, 1));
            board.store_mut().insert_flags(0, EntityFlags::MOVED);
            let outcome = board.finalize_turn(turn);

            assert!(outcome.is_committed());
            assert!(board.store().flags(1).is_movable());
            assert!(!board.store().flags(0).contains(EntityFlags::MOVED));
        }

        #[test]
        fn failure_restores_snapshot() {
            let mut board = board();
            let before = board.store().clone();

            let mut turn = board.begin_turn();
            board.store_mut().relocate(0, TilePos::new(2, 1));
            board.store_mut().insert_flags(0, EntityFlags::MOVED);
            board.store_mut().set_delta(0, glam::IVec2::X);
            turn.queue_rotation(Rotation::Right);
            let failure = TurnFailure::OutOfBounds {
                target: TilePos::new(5, 1),
            };
            turn.fail(failure);

            assert_eq!(board.finalize_turn(turn), TurnOutcome::Aborted { failure });
            assert_eq!(board.store(), &before);
            assert!(board.rotation_counts().is_zero());
        }

        #[test]
        fn abort_turn_forces_rollback() {
            let mut board = board();
            let before = board.store().clone();
            let turn = board.begin_turn();
            board.store_mut().relocate(1, TilePos::new(3, 2));
            let failure = TurnFailure::BlockedByImmovable {
                target: TilePos::new(3, 2),
            };
            let outcome = board.abort_turn(turn, failure);
            assert_eq!(outcome.failure(), Some(failure));
            assert_eq!(board.store(), &before);
        }

        #[test]
        fn committed_rotations_reach_counters() {
            let mut board = board();
            let mut turn = board.begin_turn();
            turn.queue_rotation(Rotation::Left);
            board.finalize_turn(turn);
            assert_eq!(board.rotation_counts(), RotationCounts { left: 1, right: 0 });
        }

        #[test]
        fn rotation_subphase_clears_rotation_markers() {
            let mut board = board();
            board.store_mut().insert_flags(
                1,
                EntityFlags::TEMPORARILY_MOVABLE | EntityFlags::PUSHED,
            );
            board.begin_rotation_subphase();
            assert!(board.store().flags(1).is_empty());
        }
    }

    mod feedback_tests {
        use super::*;

        #[test]
        fn take_rotation_counts_drains() {
            let mut board = board();
            let mut turn = board.begin_turn();
            turn.queue_rotation(Rotation::Right);
            board.finalize_turn(turn);

            assert_eq!(board.take_rotation_counts().right, 1);
            assert!(board.take_rotation_counts().is_zero());
        }

        #[test]
        fn partial_rotation_is_reported_once() {
            let mut board = board();
            assert_eq!(board.take_partial_rotation(), None);

            board.set_partial_rotation(PartialRotation::stalled(0.5, Rotation::Right));
            let feedback = board.take_partial_rotation().unwrap();
            assert_eq!(feedback.sign, 1);
            assert!((feedback.angle + 0.5).abs() < f32::EPSILON);
            assert_eq!(board.take_partial_rotation(), None);
        }

        #[test]
        fn left_stall_angle_is_positive() {
            let feedback = PartialRotation::stalled(0.25, Rotation::Left);
            assert!((feedback.angle - 0.25).abs() < f32::EPSILON);
        }
    }
}

//! Quarter turns of the movable group around the pivot.
//!
//! A rotation runs as a sequence of turns:
//!
//! 1. Every movable entity except the pivot contributes the quantized arc of
//!    its offset ([`quantize_arc`]); all steps are merged into one push list
//!    ordered by arc angle (stable, so equal angles keep slot order).
//! 2. Each push runs in its own turn and clears its target tile, displacing
//!    immovable obstacles or enrolling them in the rotation.
//! 3. A final turn places every movable or temporarily movable entity on its
//!    exact rotated tile at once and turns its orientation.
//!
//! If a push fails the rotation *stalls*: the board is put back exactly as it
//! was before the rotation and the angle reached is left as partial-rotation
//! feedback. If the final placement collides the rotation is aborted and also
//! rolled back, without feedback.

use tracing::debug;
use turnpipe_grid::{Rotation, TilePos};

use super::linear::push_in_direction;
use super::quantize::quantize_arc;
use super::{Push, Resolver};
use crate::board::{Board, PartialRotation};
use crate::entity::EntityFlags;
use crate::output::{Command, CommandKind, TurnFailure, TurnOutcome};
use crate::store::{EntityStore, StoreError};

/// Resolver for the two rotate commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct RotationResolver;

impl RotationResolver {
    /// Creates the resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Resolver for RotationResolver {
    fn handles(&self) -> &[CommandKind] {
        &[CommandKind::Rotate]
    }

    fn resolve(&self, command: Command, board: &mut Board) -> TurnOutcome {
        match command.rotation() {
            Some(rotation) => rotate(board, rotation),
            None => {
                debug_assert!(false, "{command} routed to the rotation resolver");
                TurnOutcome::Committed
            }
        }
    }
}

/// Ordered push list for turning the current movable group.
///
/// Empty when the store is empty or nothing but the pivot is movable.
#[must_use]
pub fn rotation_pushes(store: &EntityStore, rotation: Rotation) -> Vec<Push> {
    let Some(pivot) = store.pivot_position() else {
        return Vec::new();
    };

    let mut pushes: Vec<Push> = store
        .slots()
        .filter(|&slot| store.flags(slot).is_movable())
        .map(|slot| store.position(slot) - pivot)
        .filter(|offset| *offset != TilePos::ZERO)
        .flat_map(|offset| quantize_arc(offset, rotation))
        .map(|step| Push {
            priority: step.angle,
            from: pivot + step.from,
            direction: step.direction,
        })
        .collect();
    pushes.sort_by(|a, b| a.priority.total_cmp(&b.priority));
    pushes
}

/// Turns the movable group a quarter turn around the pivot.
///
/// Returns [`TurnOutcome::Committed`] on success, [`TurnOutcome::Stalled`]
/// when a push failed and [`TurnOutcome::Aborted`] when the final placement
/// collided. Only a committed rotation changes the board; a stall leaves
/// partial-rotation feedback behind.
pub fn rotate(board: &mut Board, rotation: Rotation) -> TurnOutcome {
    let Some(pivot) = board.store().pivot_position() else {
        return TurnOutcome::Committed;
    };
    let pushes = rotation_pushes(board.store(), rotation);
    let before = board.store().clone();
    debug!(%rotation, pushes = pushes.len(), "rotation_started");

    board.begin_rotation_subphase();
    for push in &pushes {
        let mut turn = board.begin_turn();
        push_in_direction(board.store_mut(), &mut turn, push);
        if let TurnOutcome::Aborted { failure } = board.finalize_turn(turn) {
            board.restore_store(before);
            let feedback = PartialRotation::stalled(push.priority, rotation);
            board.set_partial_rotation(feedback);
            debug!(angle = feedback.angle, failure = %failure, "rotation_stalled");
            return TurnOutcome::Stalled {
                angle: feedback.angle,
                failure,
            };
        }
    }

    let mut turn = board.begin_turn();
    match place_rotated_group(board.store_mut(), &before, pivot, rotation) {
        Ok(()) => turn.queue_rotation(rotation),
        Err(failure) => turn.fail(failure),
    }
    let outcome = board.finalize_turn(turn);
    if let TurnOutcome::Aborted { failure } = outcome {
        board.restore_store(before);
        debug!(failure = %failure, "rotation_aborted");
    } else {
        debug!(%rotation, "rotation_committed");
    }
    outcome
}

/// Records push deltas and moves the rotating group onto its rotated tiles.
fn place_rotated_group(
    store: &mut EntityStore,
    before: &EntityStore,
    pivot: TilePos,
    rotation: Rotation,
) -> Result<(), TurnFailure> {
    let mut moves = Vec::new();
    for slot in store.slots() {
        let flags = store.flags(slot);
        if flags.contains(EntityFlags::PUSHED) {
            store.set_delta(slot, store.position(slot) - before.position(slot));
        }
        if flags.rotates() {
            let offset = store.position(slot) - pivot;
            moves.push((slot, pivot + rotation.rotate_offset(offset)));
        }
    }

    store.relocate_group(&moves).map_err(|error| match error {
        StoreError::OutOfBounds { position } => TurnFailure::OutOfBounds { target: position },
        StoreError::TileOccupied { position, .. } => {
            TurnFailure::BlockedByImmovable { target: position }
        }
        _ => TurnFailure::BlockedByImmovable { target: pivot },
    })?;

    for (slot, _) in moves {
        store.set_orientation(slot, store.orientation(slot).rotated(rotation));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType;
    use glam::IVec2;
    use turnpipe_grid::{Direction, GridBounds};

    fn board_with(entities: &[(EntityType, i32, i32, bool)]) -> Board {
        let mut store = EntityStore::new(GridBounds::try_new(5, 5).unwrap());
        for &(kind, x, y, movable) in entities {
            store
                .place(kind, TilePos::new(x, y), movable, Direction::Up)
                .unwrap();
        }
        Board::new(store)
    }

    mod push_list_tests {
        use super::*;

        #[test]
        fn pivot_alone_has_no_pushes() {
            let board = board_with(&[(EntityType::BentPipe, 2, 2, true)]);
            assert!(rotation_pushes(board.store(), Rotation::Right).is_empty());
        }

        #[test]
        fn immovable_entities_have_no_arc() {
            let board = board_with(&[
                (EntityType::BentPipe, 2, 2, true),
                (EntityType::Box, 3, 2, false),
            ]);
            assert!(rotation_pushes(board.store(), Rotation::Right).is_empty());
        }

        #[test]
        fn pushes_are_absolute_and_sorted() {
            let board = board_with(&[
                (EntityType::BentPipe, 2, 2, true),
                (EntityType::Box, 4, 2, true),
                (EntityType::Box, 3, 2, true),
            ]);
            let pushes = rotation_pushes(board.store(), Rotation::Right);
            assert_eq!(pushes.len(), 6);
            assert!(pushes
                .windows(2)
                .all(|pair| pair[0].priority <= pair[1].priority));
            assert_eq!(pushes[0].from, TilePos::new(4, 2));
            assert_eq!(pushes[0].direction, Direction::Down);
        }
    }

    mod rotate_tests {
        use super::*;

        #[test]
        #[cfg(debug_assertions)]
        #[should_panic(expected = "routed to the rotation resolver")]
        fn move_command_is_rejected() {
            let mut board = board_with(&[(EntityType::BentPipe, 2, 2, true)]);
            let _ = RotationResolver::new().resolve(Command::MoveUp, &mut board);
        }

        #[test]
        fn lone_pivot_turns_in_place() {
            let mut board = board_with(&[(EntityType::BentPipe, 2, 2, true)]);
            assert!(rotate(&mut board, Rotation::Right).is_committed());
            assert_eq!(board.store().position(0), TilePos::new(2, 2));
            assert_eq!(board.store().orientation(0), Direction::Right);
            assert_eq!(board.rotation_counts().right, 1);
        }

        #[test]
        fn neighbour_swings_to_rotated_tile() {
            let mut board = board_with(&[
                (EntityType::BentPipe, 2, 2, true),
                (EntityType::Box, 3, 2, true),
            ]);
            assert!(rotate(&mut board, Rotation::Right).is_committed());
            assert_eq!(board.store().position(1), TilePos::new(2, 1));
            assert_eq!(board.store().orientation(1), Direction::Right);
            assert!(board.store().is_consistent());
        }

        #[test]
        fn obstacle_on_the_arc_is_pushed_aside() {
            let mut board = board_with(&[
                (EntityType::BentPipe, 2, 2, true),
                (EntityType::Box, 3, 2, true),
                (EntityType::Box, 3, 1, false),
            ]);
            assert!(rotate(&mut board, Rotation::Right).is_committed());
            let store = board.store();
            assert_eq!(store.position(1), TilePos::new(2, 1));
            assert_eq!(store.position(2), TilePos::new(3, 0));
            assert_eq!(store.delta(2), IVec2::new(0, -1));
            assert!(store.flags(2).contains(EntityFlags::PUSHED));
            assert_eq!(store.orientation(2), Direction::Up);
        }

        #[test]
        fn stall_rolls_back_and_reports_angle() {
            let mut board = board_with(&[
                (EntityType::BentPipe, 2, 2, true),
                (EntityType::Box, 4, 2, true),
                (EntityType::Box, 3, 0, false),
            ]);
            let before = board.store().clone();

            let outcome = rotate(&mut board, Rotation::Right);
            let TurnOutcome::Stalled { angle, failure } = outcome else {
                panic!("expected a stall, got {outcome:?}");
            };
            assert!((angle + 0.4777).abs() < 1e-3);
            assert_eq!(
                failure,
                TurnFailure::OutOfBounds {
                    target: TilePos::new(3, -1)
                }
            );
            assert_eq!(board.store(), &before);
            assert!(board.rotation_counts().is_zero());

            let feedback = board.take_partial_rotation().unwrap();
            assert_eq!(feedback.sign, 1);
            assert!((feedback.angle - angle).abs() < f32::EPSILON);
        }

        #[test]
        fn arc_leaving_the_grid_stalls_immediately() {
            // The arc of (0, 1) starts on an axis, so its second step carries a
            // slightly negative angle and runs first.
            let mut board = board_with(&[
                (EntityType::BentPipe, 0, 2, true),
                (EntityType::Box, 0, 3, true),
            ]);
            let before = board.store().clone();
            let outcome = rotate(&mut board, Rotation::Left);
            assert_eq!(
                outcome.failure(),
                Some(TurnFailure::OutOfBounds {
                    target: TilePos::new(-1, 2)
                })
            );
            assert!(matches!(outcome, TurnOutcome::Stalled { .. }));
            assert_eq!(board.store(), &before);
        }
    }

    mod placement_tests {
        use super::*;

        #[test]
        fn destination_held_by_outsider_is_refused() {
            let mut board = board_with(&[
                (EntityType::BentPipe, 2, 2, true),
                (EntityType::Box, 3, 2, true),
                (EntityType::Box, 2, 1, false),
            ]);
            let before = board.store().clone();
            let result = place_rotated_group(
                board.store_mut(),
                &before,
                TilePos::new(2, 2),
                Rotation::Right,
            );
            assert_eq!(
                result,
                Err(TurnFailure::BlockedByImmovable {
                    target: TilePos::new(2, 1)
                })
            );
            assert_eq!(board.store(), &before);
        }

        #[test]
        fn destination_outside_grid_is_refused() {
            let mut board = board_with(&[
                (EntityType::BentPipe, 0, 2, true),
                (EntityType::Box, 0, 3, true),
            ]);
            let before = board.store().clone();
            let result = place_rotated_group(
                board.store_mut(),
                &before,
                TilePos::new(0, 2),
                Rotation::Left,
            );
            assert_eq!(
                result,
                Err(TurnFailure::OutOfBounds {
                    target: TilePos::new(-1, 2)
                })
            );
        }

        #[test]
        fn whole_group_turns_together() {
            let mut board = board_with(&[
                (EntityType::BentPipe, 2, 2, true),
                (EntityType::Box, 3, 2, true),
                (EntityType::Box, 2, 1, true),
                (EntityType::Box, 1, 2, true),
            ]);
            let before = board.store().clone();
            place_rotated_group(board.store_mut(), &before, TilePos::new(2, 2), Rotation::Right)
                .unwrap();
            let store = board.store();
            assert_eq!(store.position(1), TilePos::new(2, 1));
            assert_eq!(store.position(2), TilePos::new(1, 2));
            assert_eq!(store.position(3), TilePos::new(2, 3));
            assert!(store.is_consistent());
        }
    }
}

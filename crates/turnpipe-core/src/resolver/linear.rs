//! Straight-line movement with chained pushes.
//!
//! A move command steps every movable entity one tile in a direction. An
//! entity standing in the way is pushed first, recursively, so whole lines of
//! entities shift together. The `MOVED` flag marks visited slots and bounds
//! the recursion to one visit per slot per turn.

use tracing::trace;
use turnpipe_grid::Direction;

use super::{Push, PushKind, Resolver};
use crate::board::Board;
use crate::entity::EntityFlags;
use crate::output::{Command, CommandKind, TurnFailure, TurnOutcome};
use crate::store::EntityStore;
use crate::turn::TurnContext;

/// Resolver for the four move commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearResolver;

impl LinearResolver {
    /// Creates the resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Resolver for LinearResolver {
    fn handles(&self) -> &[CommandKind] {
        &[CommandKind::Move]
    }

    fn resolve(&self, command: Command, board: &mut Board) -> TurnOutcome {
        match command.direction() {
            Some(direction) => move_all(board, direction),
            None => {
                debug_assert!(false, "{command} routed to the move resolver");
                TurnOutcome::Committed
            }
        }
    }
}

/// Moves every movable entity one tile in `direction` as a single turn.
///
/// Slots are visited in slot order. If any step fails the whole turn is
/// rolled back.
pub fn move_all(board: &mut Board, direction: Direction) -> TurnOutcome {
    let mut turn = board.begin_turn();
    for slot in board.store().slots() {
        if !turn.is_ok() {
            break;
        }
        if board.store().flags(slot).is_movable() {
            move_one(board.store_mut(), &mut turn, slot, direction, PushKind::Direct);
        }
    }
    board.finalize_turn(turn)
}

/// Steps one slot, pushing whatever stands in its way first.
///
/// - A slot already visited this turn is left alone.
/// - Leaving the grid fails the turn.
/// - An unvisited occupant of the target tile is pushed first. During a
///   rotation a movable occupant is not pushed; instead this slot yields and
///   is marked `TEMPORARILY_MOVABLE | PUSHED` so it joins the rotation.
/// - If the target is still occupied afterwards the step is silently skipped.
pub fn move_one(
    store: &mut EntityStore,
    turn: &mut TurnContext,
    slot: usize,
    direction: Direction,
    kind: PushKind,
) {
    if store.flags(slot).contains(EntityFlags::MOVED) {
        return;
    }
    let target = store.position(slot) + direction.offset();
    if !store.bounds().contains(target) {
        turn.fail(TurnFailure::OutOfBounds { target });
        return;
    }

    if let Some(blocker) = store.find_by_position(target) {
        let blocker_flags = store.flags(blocker);
        if !blocker_flags.contains(EntityFlags::MOVED) {
            if kind == PushKind::Rotation && blocker_flags.is_movable() {
                store.insert_flags(
                    slot,
                    EntityFlags::TEMPORARILY_MOVABLE | EntityFlags::PUSHED,
                );
                trace!(slot, blocker, "yielded_to_movable");
                return;
            }
            move_one(store, turn, blocker, direction, kind);
        }
    }

    if store.find_by_position(target).is_some() {
        return;
    }

    store.relocate(slot, target);
    let marks = match kind {
        PushKind::Direct => EntityFlags::MOVED,
        PushKind::Rotation => EntityFlags::MOVED | EntityFlags::PUSHED,
    };
    store.insert_flags(slot, marks);
    store.set_delta(slot, direction.offset());
}

/// Clears the target tile of one rotation push.
///
/// Fails the turn if the target is outside the grid, or if after pushing an
/// immovable occupant the tile is still held by something that is neither
/// movable nor temporarily movable.
pub fn push_in_direction(store: &mut EntityStore, turn: &mut TurnContext, push: &Push) {
    let target = push.target();
    if !store.bounds().contains(target) {
        turn.fail(TurnFailure::OutOfBounds { target });
        return;
    }

    if let Some(blocker) = store.find_by_position(target) {
        let flags = store.flags(blocker);
        if !flags.is_movable() && !flags.contains(EntityFlags::MOVED) {
            move_one(store, turn, blocker, push.direction, PushKind::Rotation);
        }
    }

    if let Some(occupant) = store.find_by_position(target) {
        if !store.flags(occupant).rotates() {
            turn.fail(TurnFailure::BlockedByImmovable { target });
        }
    }
}

//! Command resolvers.
//!
//! Resolvers turn one [`Command`] into board mutations, running each unit of
//! work inside a turn opened on the [`Board`]. The engine routes a command to
//! the resolver whose [`Resolver::handles()`] lists the command's kind.
//!
//! # Invariants
//!
//! - A resolver mutates the board only between `begin_turn` and
//!   `finalize_turn`/`abort_turn`.
//! - A resolver leaves the board [`Idle`](crate::turn::TurnPhase::Idle).
//! - Resolution is deterministic: slots are visited in slot order and pushes
//!   in a stable priority order.
//!
//! # Available Resolvers
//!
//! - [`LinearResolver`]: straight-line chained pushes
//! - [`RotationResolver`]: quarter turns around the pivot
//!
//! Connectivity ([`update_all_connections`]) is not a resolver; the board runs
//! it on every commit.

mod connectivity;
mod linear;
mod quantize;
mod rotation;

pub use connectivity::{connectable_directions, update_all_connections};
pub use linear::{move_all, move_one, push_in_direction, LinearResolver};
pub use quantize::{quantize_arc, ArcStep, AXIS_NUDGE, HALF_TURN, MAX_ARC_STEPS, SNAP_BIAS};
pub use rotation::{rotate, rotation_pushes, RotationResolver};

use serde::{Deserialize, Serialize};
use turnpipe_grid::{Direction, TilePos};

use crate::board::Board;
use crate::output::{Command, CommandKind, TurnOutcome};

/// Resolver runs one command against the board.
///
/// # Example
///
/// ```
/// use turnpipe_core::board::Board;
/// use turnpipe_core::output::{Command, CommandKind, TurnOutcome};
/// use turnpipe_core::resolver::Resolver;
///
/// struct Idle;
///
/// impl Resolver for Idle {
///     fn handles(&self) -> &[CommandKind] {
///         &[CommandKind::Move]
///     }
///
///     fn resolve(&self, _command: Command, _board: &mut Board) -> TurnOutcome {
///         TurnOutcome::Committed
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the command kinds this resolver handles.
    fn handles(&self) -> &[CommandKind];

    /// Runs `command` to completion.
    ///
    /// The board must be idle on entry and is idle on return.
    fn resolve(&self, command: Command, board: &mut Board) -> TurnOutcome;
}

/// How a step was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PushKind {
    /// A straight-line move command.
    Direct,
    /// Clearing the arc of a rotation.
    Rotation,
}

/// One unit push along a rotation arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Push {
    /// Accumulated arc angle at `from`; pushes run in ascending order.
    pub priority: f32,
    /// Tile the push starts from.
    pub from: TilePos,
    /// Direction of the step.
    pub direction: Direction,
}

impl Push {
    /// Tile the push clears into.
    #[must_use]
    pub fn target(&self) -> TilePos {
        self.from + self.direction.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }

    #[test]
    fn push_target_is_one_step_ahead() {
        let push = Push {
            priority: 0.0,
            from: TilePos::new(3, 2),
            direction: Direction::Down,
        };
        assert_eq!(push.target(), TilePos::new(3, 1));
    }
}

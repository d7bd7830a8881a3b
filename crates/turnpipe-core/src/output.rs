//! Commands fed into the engine and the outcomes it reports back.
//!
//! A [`Command`] is the only input the engine accepts. Each command runs to
//! completion and yields a [`TurnOutcome`]; a failed turn carries the
//! [`TurnFailure`] that stopped it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use turnpipe_grid::{Direction, Rotation, TilePos};

// =============================================================================
// Commands
// =============================================================================

/// One discrete player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    /// Push every movable entity one row up.
    MoveUp,
    /// Push every movable entity one row down.
    MoveDown,
    /// Push every movable entity one column left.
    MoveLeft,
    /// Push every movable entity one column right.
    MoveRight,
    /// Turn the movable group a quarter turn counter-clockwise around the pivot.
    RotateLeft,
    /// Turn the movable group a quarter turn clockwise around the pivot.
    RotateRight,
}

impl Command {
    /// All commands in declaration order.
    pub const ALL: [Command; 6] = [
        Command::MoveUp,
        Command::MoveDown,
        Command::MoveLeft,
        Command::MoveRight,
        Command::RotateLeft,
        Command::RotateRight,
    ];

    /// Routing category of this command.
    #[must_use]
    pub const fn kind(self) -> CommandKind {
        match self {
            Command::MoveUp | Command::MoveDown | Command::MoveLeft | Command::MoveRight => {
                CommandKind::Move
            }
            Command::RotateLeft | Command::RotateRight => CommandKind::Rotate,
        }
    }

    /// Direction of a move command.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Command::MoveUp => Some(Direction::Up),
            Command::MoveDown => Some(Direction::Down),
            Command::MoveLeft => Some(Direction::Left),
            Command::MoveRight => Some(Direction::Right),
            Command::RotateLeft | Command::RotateRight => None,
        }
    }

    /// Rotation of a rotate command.
    #[must_use]
    pub const fn rotation(self) -> Option<Rotation> {
        match self {
            Command::RotateLeft => Some(Rotation::Left),
            Command::RotateRight => Some(Rotation::Right),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Command::MoveUp => "move-up",
            Command::MoveDown => "move-down",
            Command::MoveLeft => "move-left",
            Command::MoveRight => "move-right",
            Command::RotateLeft => "rotate-left",
            Command::RotateRight => "rotate-right",
        }
    }
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Command::MoveUp,
            Direction::Down => Command::MoveDown,
            Direction::Left => Command::MoveLeft,
            Direction::Right => Command::MoveRight,
        }
    }
}

impl From<Rotation> for Command {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Left => Command::RotateLeft,
            Rotation::Right => Command::RotateRight,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A command name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command `{0}`")]
pub struct ParseCommandError(String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| ParseCommandError(s.to_owned()))
    }
}

/// Routing category used to pick a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Straight-line pushes.
    Move,
    /// Quarter turns around the pivot.
    Rotate,
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why a turn could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TurnFailure {
    /// A step or placement would leave the grid.
    #[error("tile {target} is outside the grid")]
    OutOfBounds {
        /// Tile that was to be reached.
        target: TilePos,
    },
    /// A tile needed by the turn is held by something that cannot make way.
    #[error("tile {target} is held by an immovable entity")]
    BlockedByImmovable {
        /// The blocked tile.
        target: TilePos,
    },
}

/// Result of running one command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Every change was applied.
    Committed,
    /// The turn was rolled back.
    Aborted {
        /// First failure recorded during the turn.
        failure: TurnFailure,
    },
    /// A rotation stopped part-way and was rolled back; `angle` is how far it
    /// turned, in signed radians, for the renderer's partial-turn feedback.
    Stalled {
        /// Negated arc angle of the failing push times the rotation sign.
        angle: f32,
        /// Failure of the push that stalled.
        failure: TurnFailure,
    },
}

impl TurnOutcome {
    /// Returns `true` if the command took effect.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, TurnOutcome::Committed)
    }

    /// Failure that stopped the command, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<TurnFailure> {
        match self {
            TurnOutcome::Committed => None,
            TurnOutcome::Aborted { failure } | TurnOutcome::Stalled { failure, .. } => {
                Some(*failure)
            }
        }
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnOutcome::Committed => write!(f, "committed"),
            TurnOutcome::Aborted { failure } => write!(f, "aborted: {failure}"),
            TurnOutcome::Stalled { angle, failure } => {
                write!(f, "stalled at {angle:.3} rad: {failure}")
            }
        }
    }
}

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-slot movement markers.
    ///
    /// `MOVED` is the visited marker of a push chain and is only ever set
    /// inside a turn. `TEMPORARILY_MOVABLE` and `PUSHED` live for one rotation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EntityFlags: u8 {
        /// Connected to the pivot; moves with every command.
        const MOVABLE = 1 << 0;
        /// Joined the current rotation after yielding to a movable entity.
        const TEMPORARILY_MOVABLE = 1 << 1;
        /// Displaced by a rotation push.
        const PUSHED = 1 << 2;
        /// Already stepped during the current turn.
        const MOVED = 1 << 3;
    }
}

impl EntityFlags {
    /// Connected to the pivot.
    #[must_use]
    pub const fn is_movable(self) -> bool {
        self.contains(Self::MOVABLE)
    }

    /// Takes part in the final placement of a rotation.
    #[must_use]
    pub const fn rotates(self) -> bool {
        self.intersects(Self::MOVABLE.union(Self::TEMPORARILY_MOVABLE))
    }
}

//! Read-only frame view for renderers.
//!
//! A renderer reads entity transforms and motion deltas through
//! [`FrameView`] and consumes the per-frame handshake values (rotation
//! counters, stall feedback) from the [`Board`] or
//! [`Engine`](crate::engine::Engine). [`FrameSnapshot`] is an owned copy of
//! one frame that can be serialized.
//!
//! # Example
//!
//! ```
//! use turnpipe_core::config::{EngineConfig, Layout};
//! use turnpipe_core::engine::Engine;
//! use turnpipe_core::output::Command;
//!
//! let mut engine = Engine::new(EngineConfig::with_grid(5, 5).with_layout(Layout::Empty)).unwrap();
//! engine.apply(Command::MoveRight);
//!
//! let view = engine.view();
//! let pivot = view.pivot().unwrap();
//! assert_eq!(pivot.position.x, 2);
//! assert_eq!(pivot.delta.x, 1);
//! ```

use glam::IVec2;
use serde::{Deserialize, Serialize};
use turnpipe_grid::{Direction, GridBounds, TilePos};

use crate::board::{Board, PartialRotation, RotationCounts};
use crate::entity::{EntityFlags, EntityId, EntityType};
use crate::store::EntityStore;

/// Render-relevant state of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    /// Stable identifier.
    pub id: EntityId,
    /// Entity type.
    pub kind: EntityType,
    /// Current tile.
    pub position: TilePos,
    /// Current orientation.
    pub orientation: Direction,
    /// Status flags.
    pub flags: EntityFlags,
    /// Displacement during the last committed turn.
    pub delta: IVec2,
}

impl EntityView {
    fn from_slot(store: &EntityStore, slot: usize) -> Self {
        Self {
            id: store.id(slot),
            kind: store.entity_type(slot),
            position: store.position(slot),
            orientation: store.orientation(slot),
            flags: store.flags(slot),
            delta: store.delta(slot),
        }
    }

    /// Tile the entity started the last turn on.
    #[must_use]
    pub fn previous_position(&self) -> TilePos {
        self.position - self.delta
    }
}

/// Borrowed, read-only view of a board.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    board: &'a Board,
}

impl<'a> FrameView<'a> {
    /// Views `board`.
    #[must_use]
    pub const fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Grid dimensions.
    #[must_use]
    pub fn bounds(&self) -> GridBounds {
        self.board.store().bounds()
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.board.store().len()
    }

    /// Whether the board has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.board.store().is_empty()
    }

    /// Every entity in slot order; the pivot comes first.
    pub fn entities(&self) -> impl Iterator<Item = EntityView> + 'a {
        let store = self.board.store();
        store.slots().map(move |slot| EntityView::from_slot(store, slot))
    }

    /// The pivot, if any entity exists.
    #[must_use]
    pub fn pivot(&self) -> Option<EntityView> {
        self.entities().next()
    }

    /// Entity with the given id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<EntityView> {
        let store = self.board.store();
        store.find_by_id(id).map(|slot| EntityView::from_slot(store, slot))
    }

    /// Entity occupying `position`.
    #[must_use]
    pub fn entity_at(&self, position: TilePos) -> Option<EntityView> {
        let store = self.board.store();
        store
            .find_by_position(position)
            .map(|slot| EntityView::from_slot(store, slot))
    }

    /// Pending rotation counters, without consuming them.
    #[must_use]
    pub fn rotation_counts(&self) -> RotationCounts {
        self.board.rotation_counts()
    }

    /// Current stall feedback, without consuming it.
    #[must_use]
    pub fn partial_rotation(&self) -> PartialRotation {
        self.board.partial_rotation()
    }

    /// Owned copy of this frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        let bounds = self.bounds();
        FrameSnapshot {
            columns: bounds.columns(),
            rows: bounds.rows(),
            entities: self.entities().collect(),
            rotation_counts: self.rotation_counts(),
            partial_rotation: self.partial_rotation(),
        }
    }
}

/// Serializable copy of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Grid width.
    pub columns: u32,
    /// Grid height.
    pub rows: u32,
    /// Entities in slot order.
    pub entities: Vec<EntityView>,
    /// Pending rotation counters.
    pub rotation_counts: RotationCounts,
    /// Stall feedback.
    pub partial_rotation: PartialRotation,
}

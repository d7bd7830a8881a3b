//! Entity identity and classification.
//!
//! Entities themselves are not objects: their state lives in the parallel
//! arrays of [`EntityStore`](crate::store::EntityStore). This module holds the
//! small value types those arrays are made of:
//! - [`EntityId`]: stable identifier, reused from a free pool
//! - [`EntityType`]: closed set of kinds, drives connection geometry
//! - [`EntityFlags`]: per-slot movement markers
//!
//! # Example
//!
//! ```
//! use turnpipe_core::entity::{EntityFlags, EntityId, EntityType};
//!
//! let id = EntityId::new(3);
//! assert_eq!(id.as_u32(), 3);
//! assert_eq!(EntityType::BentPipe.to_string(), "BentPipe");
//! assert!(EntityFlags::MOVABLE.is_movable());
//! ```

mod flags;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use flags::EntityFlags;

/// Unique identifier for a live entity.
///
/// Ids are unique among live entities only. When an entity is removed its id
/// returns to the pool and the next placement takes the smallest free value.
/// Ids are not slot indices; use
/// [`EntityStore::find_by_id`](crate::store::EntityStore::find_by_id) to go
/// from one to the other.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new `EntityId` from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub(crate) const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Kind of an entity.
///
/// The type decides which sides of the tile an entity can connect through
/// (see [`connectable_directions`](crate::resolver::connectable_directions)).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Decorative filler, never connects.
    Background,
    /// Player marker, never connects.
    Player,
    /// Elbow pipe joining its orientation and the side a quarter turn to the left.
    BentPipe,
    /// Straight pipe joining its orientation and the opposite side.
    StraightPipe,
    /// Plain obstacle, never connects.
    Box,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background => write!(f, "Background"),
            Self::Player => write!(f, "Player"),
            Self::BentPipe => write!(f, "BentPipe"),
            Self::StraightPipe => write!(f, "StraightPipe"),
            Self::Box => write!(f, "Box"),
        }
    }
}

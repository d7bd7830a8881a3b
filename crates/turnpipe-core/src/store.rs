//! Entity store for the rule engine.
//!
//! The store holds every entity in parallel arrays indexed by *slot*:
//! id, type, position, orientation, flags and motion delta. Next to the arrays
//! it keeps the grid's [`TileMap`], the tile-to-slot half of the two-way
//! mapping between tiles and entities.
//!
//! # Slot Layout
//!
//! - Slots `0..len()` are live. Removal moves the last live slot into the
//!   freed one, so slots are dense but not stable across removals.
//! - Slot 0 is the pivot: the first entity placed. It is always movable and
//!   cannot be removed.
//! - Capacity equals the number of tiles; at most one entity per tile.
//!
//! # Tile Map Synchronization
//!
//! Every mutation that affects a position goes through the store
//! ([`place`](EntityStore::place), [`remove`](EntityStore::remove),
//! [`relocate`](EntityStore::relocate),
//! [`relocate_group`](EntityStore::relocate_group)) and updates both
//! `position[slot]` and the tile map before returning. After any of them
//! [`is_consistent`](EntityStore::is_consistent) holds.
//!
//! # Example
//!
//! ```
//! use turnpipe_core::store::EntityStore;
//! use turnpipe_core::entity::EntityType;
//! use turnpipe_grid::{Direction, GridBounds, TilePos};
//!
//! let mut store = EntityStore::new(GridBounds::try_new(8, 8).unwrap());
//! let pivot = store
//!     .place(EntityType::BentPipe, TilePos::new(1, 1), true, Direction::Up)
//!     .unwrap();
//! let pipe = store
//!     .place(EntityType::StraightPipe, TilePos::new(1, 2), false, Direction::Up)
//!     .unwrap();
//!
//! assert_eq!(store.find_by_position(TilePos::new(1, 2)), store.find_by_id(pipe));
//! assert_eq!(store.find_by_id(pivot), Some(0));
//! ```

use glam::IVec2;
use thiserror::Error;
use turnpipe_grid::{Direction, GridBounds, TileMap, TilePos};

use crate::entity::{EntityFlags, EntityId, EntityType};

// =============================================================================
// Errors
// =============================================================================

/// Errors from administrative store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Every slot is in use.
    #[error("entity store is full ({capacity} slots)")]
    GridFull {
        /// Slot capacity of the store.
        capacity: usize,
    },
    /// The id pool is exhausted.
    #[error("no entity id available")]
    NoIdAvailable,
    /// The position is outside the grid.
    #[error("position {position} is outside the grid")]
    OutOfBounds {
        /// Offending position.
        position: TilePos,
    },
    /// Another entity holds the tile.
    #[error("tile {position} is occupied by entity {occupant}")]
    TileOccupied {
        /// Offending position.
        position: TilePos,
        /// Entity currently on the tile.
        occupant: EntityId,
    },
    /// No live entity has this id.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    /// The pivot entity cannot be removed.
    #[error("the pivot entity cannot be removed")]
    PivotProtected,
}

// =============================================================================
// Entity Store
// =============================================================================

/// Structure-of-arrays storage for all entities plus the tile index.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore {
    bounds: GridBounds,
    ids: Vec<EntityId>,
    types: Vec<EntityType>,
    positions: Vec<TilePos>,
    orientations: Vec<Direction>,
    flags: Vec<EntityFlags>,
    deltas: Vec<IVec2>,
    tiles: TileMap,
}

impl EntityStore {
    /// Creates an empty store with one slot per tile of `bounds`.
    #[must_use]
    pub fn new(bounds: GridBounds) -> Self {
        let capacity = bounds.tile_count();
        Self {
            bounds,
            ids: Vec::with_capacity(capacity),
            types: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            orientations: Vec::with_capacity(capacity),
            flags: Vec::with_capacity(capacity),
            deltas: Vec::with_capacity(capacity),
            tiles: TileMap::new(bounds),
        }
    }

    /// Grid the store covers.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Maximum number of entities.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.bounds.tile_count()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing has been placed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Live slot indices in slot order.
    pub fn slots(&self) -> std::ops::Range<usize> {
        0..self.len()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Places a new entity and returns its id.
    ///
    /// The first entity placed becomes the pivot in slot 0 and is stored
    /// movable regardless of `movable`.
    ///
    /// # Errors
    ///
    /// Checked in this order: [`StoreError::GridFull`],
    /// [`StoreError::NoIdAvailable`], [`StoreError::OutOfBounds`],
    /// [`StoreError::TileOccupied`]. A refused placement changes nothing.
    pub fn place(
        &mut self,
        kind: EntityType,
        position: TilePos,
        movable: bool,
        orientation: Direction,
    ) -> Result<EntityId, StoreError> {
        if self.len() >= self.capacity() {
            return Err(StoreError::GridFull {
                capacity: self.capacity(),
            });
        }
        let id = self.smallest_available_id()?;
        if !self.bounds.contains(position) {
            return Err(StoreError::OutOfBounds { position });
        }
        if let Some(occupant) = self.tiles.get(position) {
            return Err(StoreError::TileOccupied {
                position,
                occupant: self.ids[occupant],
            });
        }

        let slot = self.len();
        let flags = if movable || slot == 0 {
            EntityFlags::MOVABLE
        } else {
            EntityFlags::empty()
        };
        self.ids.push(id);
        self.types.push(kind);
        self.positions.push(position);
        self.orientations.push(orientation);
        self.flags.push(flags);
        self.deltas.push(IVec2::ZERO);
        self.tiles.insert(position, slot);
        Ok(id)
    }

    /// Removes an entity, freeing its id and its tile.
    ///
    /// The last live slot is moved into the freed slot and its tile map entry
    /// is rewritten to follow it.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownEntity`] if no live entity has `id`,
    /// [`StoreError::PivotProtected`] for the pivot.
    pub fn remove(&mut self, id: EntityId) -> Result<(), StoreError> {
        let slot = self.find_by_id(id).ok_or(StoreError::UnknownEntity(id))?;
        if slot == 0 {
            return Err(StoreError::PivotProtected);
        }
        self.tiles.clear(self.positions[slot]);

        self.ids.swap_remove(slot);
        self.types.swap_remove(slot);
        self.positions.swap_remove(slot);
        self.orientations.swap_remove(slot);
        self.flags.swap_remove(slot);
        self.deltas.swap_remove(slot);

        if slot < self.len() {
            self.tiles.insert(self.positions[slot], slot);
        }
        Ok(())
    }

    /// Lowest id not held by a live entity.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoIdAvailable`] when every id below capacity is taken.
    pub fn smallest_available_id(&self) -> Result<EntityId, StoreError> {
        let mut used = vec![false; self.capacity()];
        for id in &self.ids {
            if let Some(flag) = used.get_mut(id.as_usize()) {
                *flag = true;
            }
        }
        let free = used
            .iter()
            .position(|taken| !taken)
            .ok_or(StoreError::NoIdAvailable)?;
        u32::try_from(free)
            .map(EntityId::new)
            .map_err(|_| StoreError::NoIdAvailable)
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Slot of the entity with `id` (linear scan).
    #[must_use]
    pub fn find_by_id(&self, id: EntityId) -> Option<usize> {
        self.ids.iter().position(|candidate| *candidate == id)
    }

    /// Slot occupying `position`, if any.
    #[must_use]
    pub fn find_by_position(&self, position: TilePos) -> Option<usize> {
        self.tiles.get(position)
    }

    /// Position of the pivot, or `None` before anything is placed.
    #[must_use]
    pub fn pivot_position(&self) -> Option<TilePos> {
        self.positions.first().copied()
    }

    /// Id in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not live.
    #[must_use]
    pub fn id(&self, slot: usize) -> EntityId {
        self.ids[slot]
    }

    /// Type in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not live.
    #[must_use]
    pub fn entity_type(&self, slot: usize) -> EntityType {
        self.types[slot]
    }

    /// Position of `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not live.
    #[must_use]
    pub fn position(&self, slot: usize) -> TilePos {
        self.positions[slot]
    }

    /// Orientation of `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not live.
    #[must_use]
    pub fn orientation(&self, slot: usize) -> Direction {
        self.orientations[slot]
    }

    /// Flags of `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not live.
    #[must_use]
    pub fn flags(&self, slot: usize) -> EntityFlags {
        self.flags[slot]
    }

    /// Displacement recorded for `slot` during the last turn.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not live.
    #[must_use]
    pub fn delta(&self, slot: usize) -> IVec2 {
        self.deltas[slot]
    }

    /// All live positions in slot order.
    #[must_use]
    pub fn positions(&self) -> &[TilePos] {
        &self.positions
    }

    /// All live orientations in slot order.
    #[must_use]
    pub fn orientations(&self) -> &[Direction] {
        &self.orientations
    }

    /// The tile-to-slot index.
    #[must_use]
    pub fn tile_map(&self) -> &TileMap {
        &self.tiles
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Sets flags on `slot`.
    pub(crate) fn insert_flags(&mut self, slot: usize, flags: EntityFlags) {
        self.flags[slot].insert(flags);
    }

    /// Clears flags on every slot. The pivot keeps `MOVABLE`.
    pub(crate) fn remove_flags_everywhere(&mut self, flags: EntityFlags) {
        for slot_flags in &mut self.flags {
            slot_flags.remove(flags);
        }
        if let Some(pivot) = self.flags.first_mut() {
            pivot.insert(EntityFlags::MOVABLE);
        }
    }

    /// Sets the orientation of `slot`.
    pub(crate) fn set_orientation(&mut self, slot: usize, orientation: Direction) {
        self.orientations[slot] = orientation;
    }

    /// Records the turn displacement of `slot`.
    pub(crate) fn set_delta(&mut self, slot: usize, delta: IVec2) {
        self.deltas[slot] = delta;
    }

    /// Zeroes every displacement.
    pub(crate) fn clear_deltas(&mut self) {
        self.deltas.fill(IVec2::ZERO);
    }

    /// Moves `slot` to `to`, updating both halves of the tile mapping.
    ///
    /// The caller checks that `to` is inside the grid and free.
    pub(crate) fn relocate(&mut self, slot: usize, to: TilePos) {
        debug_assert!(self.bounds.contains(to), "relocation target outside grid");
        debug_assert!(!self.tiles.is_occupied(to), "relocation target occupied");
        let from = self.positions[slot];
        if self.tiles.get(from) == Some(slot) {
            self.tiles.clear(from);
        }
        self.positions[slot] = to;
        self.tiles.insert(to, slot);
    }

    /// Moves several slots at once.
    ///
    /// Every source tile is vacated before any destination is occupied, so
    /// members of the group may move onto each other's old tiles.
    ///
    /// # Errors
    ///
    /// [`StoreError::OutOfBounds`] if a destination is outside the grid,
    /// [`StoreError::TileOccupied`] if a destination is held by an entity
    /// outside the group or claimed twice. Nothing changes on error.
    pub fn relocate_group(&mut self, moves: &[(usize, TilePos)]) -> Result<(), StoreError> {
        let mut moving = vec![false; self.len()];
        for &(slot, _) in moves {
            moving[slot] = true;
        }
        let mut claimed: Vec<Option<usize>> = vec![None; self.capacity()];
        for &(slot, to) in moves {
            let index = self
                .bounds
                .tile_index(to)
                .ok_or(StoreError::OutOfBounds { position: to })?;
            let held_by_outsider = self
                .tiles
                .get(to)
                .filter(|occupant| !moving[*occupant]);
            if let Some(occupant) = held_by_outsider {
                return Err(StoreError::TileOccupied {
                    position: to,
                    occupant: self.ids[occupant],
                });
            }
            if let Some(claimer) = claimed[index].replace(slot) {
                return Err(StoreError::TileOccupied {
                    position: to,
                    occupant: self.ids[claimer],
                });
            }
        }

        for &(slot, _) in moves {
            self.tiles.clear(self.positions[slot]);
        }
        for &(slot, to) in moves {
            self.positions[slot] = to;
            self.tiles.insert(to, slot);
        }
        Ok(())
    }

    /// Replaces positions, orientations and the tile map wholesale.
    ///
    /// Used to roll a turn back; the slices must come from this store with the
    /// same set of live slots.
    pub(crate) fn restore_transforms(
        &mut self,
        positions: &[TilePos],
        orientations: &[Direction],
        tiles: &TileMap,
    ) {
        debug_assert_eq!(positions.len(), self.len());
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.orientations.clear();
        self.orientations.extend_from_slice(orientations);
        self.tiles.clone_from(tiles);
    }

    /// Checks the two-way consistency of positions and the tile map.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.tiles.occupied_count() == self.len()
            && self
                .positions
                .iter()
                .enumerate()
                .all(|(slot, pos)| self.tiles.get(*pos) == Some(slot))
    }
}

// =============================================================================
// Tests
// =============================================================================

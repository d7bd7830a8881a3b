//! Tile-to-slot index.
//!
//! A [`TileMap`] stores, for every tile of a grid, the slot of the entity that
//! occupies it (if any). It is the reverse half of the two-way mapping between
//! tiles and entities; the forward half (slot to position) lives with the
//! entity data. Keeping the two halves in agreement is the owner's job.

use crate::{GridBounds, TilePos};

/// Dense occupancy index, one entry per tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    bounds: GridBounds,
    slots: Vec<Option<usize>>,
}

impl TileMap {
    /// Create an empty map covering `bounds`.
    #[must_use]
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            slots: vec![None; bounds.tile_count()],
        }
    }

    /// Bounds covered by this map.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Slot occupying a tile. Out-of-bounds coordinates are never occupied.
    #[must_use]
    pub fn get(&self, pos: TilePos) -> Option<usize> {
        self.bounds
            .tile_index(pos)
            .and_then(|index| self.slots[index])
    }

    /// Check if a tile holds a slot.
    #[must_use]
    pub fn is_occupied(&self, pos: TilePos) -> bool {
        self.get(pos).is_some()
    }

    /// Record `slot` at `pos`, returning the previous occupant.
    ///
    /// Returns `None` and does nothing if `pos` is outside the grid.
    pub fn insert(&mut self, pos: TilePos, slot: usize) -> Option<usize> {
        let index = self.bounds.tile_index(pos)?;
        self.slots[index].replace(slot)
    }

    /// Empty a tile, returning its previous occupant.
    pub fn clear(&mut self, pos: TilePos) -> Option<usize> {
        let index = self.bounds.tile_index(pos)?;
        self.slots[index].take()
    }

    /// Number of occupied tiles.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_map() -> TileMap {
        TileMap::new(GridBounds::try_new(4, 3).unwrap())
    }

    #[test]
    fn starts_empty() {
        let map = small_map();
        assert_eq!(map.occupied_count(), 0);
        assert!(!map.is_occupied(TilePos::new(0, 0)));
    }

    #[test]
    fn insert_and_clear() {
        let mut map = small_map();
        let pos = TilePos::new(2, 1);
        assert_eq!(map.insert(pos, 7), None);
        assert_eq!(map.get(pos), Some(7));
        assert_eq!(map.insert(pos, 3), Some(7));
        assert_eq!(map.clear(pos), Some(3));
        assert!(!map.is_occupied(pos));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut map = small_map();
        assert_eq!(map.insert(TilePos::new(4, 0), 1), None);
        assert_eq!(map.get(TilePos::new(4, 0)), None);
        assert_eq!(map.get(TilePos::new(-1, 0)), None);
        assert_eq!(map.occupied_count(), 0);
    }

    proptest! {
        #[test]
        fn occupancy_tracks_last_write(
            ops in prop::collection::vec((0i32..4, 0i32..3, prop::option::of(0usize..8)), 1..40)
        ) {
            let mut map = small_map();
            let mut expected = std::collections::HashMap::new();
            for (x, y, slot) in ops {
                let pos = TilePos::new(x, y);
                match slot {
                    Some(slot) => {
                        map.insert(pos, slot);
                        expected.insert((x, y), slot);
                    }
                    None => {
                        map.clear(pos);
                        expected.remove(&(x, y));
                    }
                }
            }
            prop_assert_eq!(map.occupied_count(), expected.len());
            for ((x, y), slot) in expected {
                prop_assert_eq!(map.get(TilePos::new(x, y)), Some(slot));
            }
        }
    }
}

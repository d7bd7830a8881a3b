//! # Turnpipe Grid
//!
//! Tile grid substrate for the turnpipe rule engine.
//!
//! The grid is a fixed rectangle of square tiles addressed by integer
//! (column, row) pairs. Rows grow in the [`Direction::Up`] direction. Every
//! coordinate inside the bounds maps to exactly one linear tile index
//! (`column + row * columns`) and back.
//!
//! This crate knows nothing about entities. It provides:
//!
//! - [`GridBounds`]: dimensions, bounds checks and index conversion
//! - [`Direction`] / [`DirectionSet`]: the four cardinal directions and sets of them
//! - [`TileMap`]: the tile-to-slot index the entity store keeps in sync
//!
//! ## Quick Start
//!
//! ```rust
//! use turnpipe_grid::{Direction, GridBounds, TileMap, TilePos};
//!
//! let bounds = GridBounds::try_new(4, 3).unwrap();
//! let mut tiles = TileMap::new(bounds);
//!
//! let pos = TilePos::new(1, 1);
//! tiles.insert(pos, 0);
//! assert_eq!(tiles.get(pos), Some(0));
//! assert!(tiles.get(pos + Direction::Up.offset()).is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod direction;
pub mod tile_map;

pub use direction::{Direction, DirectionSet, Rotation};
pub use tile_map::TileMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer tile coordinate `(column, row)`.
pub type TilePos = glam::IVec2;

/// Errors raised while describing a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// One of the dimensions is zero.
    #[error("grid dimensions must be non-zero, got {columns}x{rows}")]
    Empty {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The tile count does not fit the coordinate type.
    #[error("grid of {columns}x{rows} tiles is too large")]
    TooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

/// Dimensions of a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    columns: u32,
    rows: u32,
}

impl GridBounds {
    /// Create bounds for a grid of `columns` x `rows` tiles.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Empty`] if either dimension is zero and
    /// [`GridError::TooLarge`] if the tile count overflows `i32`.
    pub fn try_new(columns: u32, rows: u32) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::Empty { columns, rows });
        }
        let fits = columns
            .checked_mul(rows)
            .is_some_and(|count| i32::try_from(count).is_ok());
        if !fits {
            return Err(GridError::TooLarge { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of tiles.
    #[must_use]
    pub const fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Check if a coordinate lies inside the grid.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.columns && (pos.y as u32) < self.rows
    }

    /// Linear tile index of a coordinate, or `None` outside the grid.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn tile_index(&self, pos: TilePos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.x as usize + pos.y as usize * self.columns as usize)
        } else {
            None
        }
    }

    /// Coordinate of a linear tile index, or `None` past the last tile.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn position_of(&self, index: usize) -> Option<TilePos> {
        if index >= self.tile_count() {
            return None;
        }
        let columns = self.columns as usize;
        // The constructor guarantees every index fits in i32.
        Some(TilePos::new((index % columns) as i32, (index / columns) as i32))
    }

    /// Iterate every coordinate in tile index order.
    pub fn positions(&self) -> impl Iterator<Item = TilePos> + '_ {
        (0..self.tile_count()).filter_map(|index| self.position_of(index))
    }
}

//! Engine configuration.
//!
//! [`EngineConfig`] describes the grid, the pivot and the initial layout. It
//! deserializes from JSON with every field optional; missing fields take the
//! classic defaults (a 20x16 grid, a bent-pipe pivot at (1, 1) facing up and
//! fifteen pairs of scattered pipes).
//!
//! ```
//! use turnpipe_core::config::{EngineConfig, Layout};
//!
//! let config = EngineConfig::from_json_str(
//!     r#"{ "columns": 8, "rows": 6, "layout": { "kind": "scattered", "seed": 7, "pairs": 3 } }"#,
//! )
//! .unwrap();
//! assert_eq!(config.columns, 8);
//! assert_eq!(config.layout, Layout::Scattered { seed: 7, pairs: 3 });
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use turnpipe_grid::{Direction, GridBounds, GridError, TilePos};

use crate::entity::EntityType;
use crate::store::StoreError;

/// Errors from loading a configuration or building an engine from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The grid dimensions are unusable.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The pivot could not be placed.
    #[error("pivot cannot be placed: {0}")]
    Pivot(#[source] StoreError),
}

/// One entity to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Entity type.
    pub kind: EntityType,
    /// Tile to place it on.
    pub position: TilePos,
    /// Initial orientation.
    #[serde(default)]
    pub orientation: Direction,
    /// Whether it starts out movable.
    #[serde(default)]
    pub movable: bool,
}

impl Placement {
    /// An immovable entity facing up.
    #[must_use]
    pub const fn new(kind: EntityType, position: TilePos) -> Self {
        Self {
            kind,
            position,
            orientation: Direction::Up,
            movable: false,
        }
    }

    /// Sets the orientation.
    #[must_use]
    pub const fn facing(mut self, orientation: Direction) -> Self {
        self.orientation = orientation;
        self
    }

    /// Marks the entity movable.
    #[must_use]
    pub const fn movable(mut self) -> Self {
        self.movable = true;
        self
    }
}

/// Initial population of the grid besides the pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// Nothing but the pivot.
    Empty,
    /// Deterministic scatter of bent/straight pipe pairs on modular
    /// progressions of the tile coordinates.
    Classic {
        /// Number of pairs.
        pairs: u32,
    },
    /// Seeded random scatter of bent/straight pipe pairs.
    Scattered {
        /// RNG seed.
        seed: u64,
        /// Number of pairs.
        pairs: u32,
    },
    /// Exactly these entities, placed in order.
    Explicit {
        /// Entities to place.
        entities: Vec<Placement>,
    },
}

impl Default for Layout {
    fn default() -> Self {
        Self::Classic { pairs: 15 }
    }
}

/// Configuration for an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid width in tiles.
    pub columns: u32,
    /// Grid height in tiles.
    pub rows: u32,
    /// The pivot entity, placed first. It is always movable.
    pub pivot: Placement,
    /// Everything else.
    pub layout: Layout,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 16,
            pivot: Placement::new(EntityType::BentPipe, TilePos::new(1, 1)).movable(),
            layout: Layout::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if the text is not a valid configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default configuration with custom grid dimensions.
    #[must_use]
    pub fn with_grid(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Replaces the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the pivot.
    #[must_use]
    pub fn with_pivot(mut self, pivot: Placement) -> Self {
        self.pivot = pivot;
        self
    }

    /// Validated grid bounds.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Grid`] for empty or oversized grids.
    pub fn bounds(&self) -> Result<GridBounds, ConfigError> {
        Ok(GridBounds::try_new(self.columns, self.rows)?)
    }
}

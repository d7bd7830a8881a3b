//! Test helpers for building engines and inspecting boards.

use turnpipe_grid::{Direction, TilePos};

use crate::config::{EngineConfig, Layout, Placement};
use crate::engine::Engine;
use crate::entity::{EntityFlags, EntityType};
use crate::store::EntityStore;
use crate::turn::TurnPhase;

// =============================================================================
// Setup
// =============================================================================

/// Builds an engine with a bent-pipe pivot facing up at `pivot` and the given
/// extra entities, placed in order.
pub fn engine_with(columns: u32, rows: u32, pivot: TilePos, entities: Vec<Placement>) -> Engine {
    let config = EngineConfig::with_grid(columns, rows)
        .with_pivot(Placement::new(EntityType::BentPipe, pivot).movable())
        .with_layout(Layout::Explicit { entities });
    Engine::new(config).unwrap()
}

/// A movable box facing up.
pub fn movable_box(x: i32, y: i32) -> Placement {
    Placement::new(EntityType::Box, TilePos::new(x, y)).movable()
}

/// An immovable box facing up.
pub fn fixed_box(x: i32, y: i32) -> Placement {
    Placement::new(EntityType::Box, TilePos::new(x, y))
}

/// A pipe of `kind` facing `orientation`.
pub fn pipe(kind: EntityType, x: i32, y: i32, orientation: Direction) -> Placement {
    Placement::new(kind, TilePos::new(x, y)).facing(orientation)
}

/// Engine on the classic 20x16 board with a seeded scatter layout.
pub fn scattered_engine(seed: u64, pairs: u32) -> Engine {
    let config = EngineConfig::default().with_layout(Layout::Scattered { seed, pairs });
    Engine::new(config).unwrap()
}

// =============================================================================
// Inspection
// =============================================================================

/// Positions and orientations of every slot.
pub fn transforms(store: &EntityStore) -> Vec<(TilePos, Direction)> {
    store
        .slots()
        .map(|slot| (store.position(slot), store.orientation(slot)))
        .collect()
}

/// Asserts the invariants that must hold between turns.
pub fn assert_idle_and_consistent(engine: &Engine) {
    let board = engine.board();
    let store = board.store();
    assert_eq!(board.phase(), TurnPhase::Idle);
    assert!(store.is_consistent(), "tile map out of sync");
    assert!(store.flags(0).is_movable(), "pivot lost movability");
    for slot in store.slots() {
        assert!(
            !store.flags(slot).contains(EntityFlags::MOVED),
            "slot {slot} still marked moved"
        );
        assert!(store.bounds().contains(store.position(slot)));
    }
}

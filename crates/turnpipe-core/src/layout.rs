//! Initial population of the grid.
//!
//! Placement failures are not errors here: a refused placement (occupied
//! tile, full grid, out of bounds) is logged and skipped. Generated layouts
//! stop early once every tile is taken.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use turnpipe_grid::{Direction, TilePos};

use crate::config::{Layout, Placement};
use crate::entity::EntityType;
use crate::store::EntityStore;

/// Places every entity of `layout` into `store`; returns how many were placed.
pub fn populate(layout: &Layout, store: &mut EntityStore) -> usize {
    match layout {
        Layout::Empty => 0,
        Layout::Classic { pairs } => classic(*pairs, store),
        Layout::Scattered { seed, pairs } => scattered(*seed, *pairs, store),
        Layout::Explicit { entities } => entities
            .iter()
            .filter(|placement| place_or_skip(store, placement))
            .count(),
    }
}

/// Places one entity, logging instead of failing.
fn place_or_skip(store: &mut EntityStore, placement: &Placement) -> bool {
    match store.place(
        placement.kind,
        placement.position,
        placement.movable,
        placement.orientation,
    ) {
        Ok(_) => true,
        Err(error) => {
            debug!(
                error = %error,
                kind = %placement.kind,
                position = %placement.position,
                "placement_refused"
            );
            false
        }
    }
}

/// Pair `i` puts a bent pipe at `(5i mod C, 7i mod R)` and a straight pipe at
/// `(11i mod C, 13i mod R)`, both facing `i mod 4`. Both tiles are chosen
/// before either pipe is placed.
fn classic(pairs: u32, store: &mut EntityStore) -> usize {
    let mut placed = 0;
    for i in 1..=u64::from(pairs) {
        if store.len() == store.capacity() {
            break;
        }
        let bent = first_free(store, modular_tile(store, i * 5, i * 7));
        let straight = first_free(store, modular_tile(store, i * 11, i * 13));
        #[allow(clippy::cast_possible_truncation)]
        let orientation = Direction::from_index((i % 4) as usize);

        for (kind, position) in [
            (EntityType::BentPipe, bent),
            (EntityType::StraightPipe, straight),
        ] {
            let placement = Placement::new(kind, position).facing(orientation);
            placed += usize::from(place_or_skip(store, &placement));
        }
    }
    placed
}

/// Like [`classic`] but with tiles and orientations drawn from a seeded RNG.
fn scattered(seed: u64, pairs: u32, store: &mut EntityStore) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let bounds = store.bounds();
    let mut placed = 0;
    for _ in 0..pairs {
        if store.len() == store.capacity() {
            break;
        }
        for kind in [EntityType::BentPipe, EntityType::StraightPipe] {
            let start = modular_tile(
                store,
                u64::from(rng.gen_range(0..bounds.columns())),
                u64::from(rng.gen_range(0..bounds.rows())),
            );
            let position = first_free(store, start);
            let orientation = Direction::from_index(rng.gen_range(0..Direction::COUNT));
            let placement = Placement::new(kind, position).facing(orientation);
            placed += usize::from(place_or_skip(store, &placement));
        }
    }
    placed
}

/// `(x mod C, y mod R)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn modular_tile(store: &EntityStore, x: u64, y: u64) -> TilePos {
    let bounds = store.bounds();
    // Both remainders are below a dimension, which fits in i32.
    TilePos::new(
        (x % u64::from(bounds.columns())) as i32,
        (y % u64::from(bounds.rows())) as i32,
    )
}

/// Walks diagonally (with wrap-around) from `start` to the first free tile.
///
/// Gives up after one lap over the tile count and returns `start`, which the
/// following placement then refuses.
fn first_free(store: &EntityStore, start: TilePos) -> TilePos {
    let mut position = start;
    for _ in 0..store.bounds().tile_count() {
        if !store.tile_map().is_occupied(position) {
            return position;
        }
        #[allow(clippy::cast_sign_loss)]
        let (x, y) = (position.x as u64 + 1, position.y as u64 + 1);
        position = modular_tile(store, x, y);
    }
    start
}

//! Pipe connectivity and movability.
//!
//! Two neighbouring entities are connected when each lists the side facing the
//! other among its connectable directions. Movability spreads from the pivot
//! along connections.

use turnpipe_grid::{Direction, DirectionSet, Rotation};

use crate::entity::{EntityFlags, EntityType};
use crate::store::EntityStore;

/// Sides of the tile an entity of `kind` facing `orientation` connects through.
///
/// - `BentPipe`: its orientation and the side a quarter turn to the left.
/// - `StraightPipe`: its orientation and the opposite side.
/// - Anything else: none.
#[must_use]
pub fn connectable_directions(kind: EntityType, orientation: Direction) -> DirectionSet {
    match kind {
        EntityType::BentPipe => {
            DirectionSet::from(orientation) | DirectionSet::from(orientation.rotated(Rotation::Left))
        }
        EntityType::StraightPipe => {
            DirectionSet::from(orientation) | DirectionSet::from(orientation.opposite())
        }
        EntityType::Background | EntityType::Player | EntityType::Box => DirectionSet::empty(),
    }
}

/// Marks every entity connected to a movable one as movable.
///
/// One forward pass in slot order: a slot that is movable when it is visited
/// marks each neighbour that connects back. A slot marked after its own visit
/// does not spread further until the next pass. Movability is never revoked.
pub fn update_all_connections(store: &mut EntityStore) {
    for slot in store.slots() {
        if !store.flags(slot).is_movable() {
            continue;
        }
        let position = store.position(slot);
        let sides = connectable_directions(store.entity_type(slot), store.orientation(slot));
        for direction in sides.directions() {
            let Some(neighbour) = store.find_by_position(position + direction.offset()) else {
                continue;
            };
            let back = connectable_directions(
                store.entity_type(neighbour),
                store.orientation(neighbour),
            );
            if back.has(direction.opposite()) {
                store.insert_flags(neighbour, EntityFlags::MOVABLE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnpipe_grid::{GridBounds, TilePos};

    fn store() -> EntityStore {
        EntityStore::new(GridBounds::try_new(8, 8).unwrap())
    }

    mod geometry_tests {
        use super::*;

        #[test]
        fn bent_pipe_joins_orientation_and_left_side() {
            let up = connectable_directions(EntityType::BentPipe, Direction::Up);
            assert_eq!(up, DirectionSet::UP | DirectionSet::LEFT);
            let right = connectable_directions(EntityType::BentPipe, Direction::Right);
            assert_eq!(right, DirectionSet::RIGHT | DirectionSet::UP);
        }

        #[test]
        fn straight_pipe_joins_opposite_sides() {
            let up = connectable_directions(EntityType::StraightPipe, Direction::Up);
            assert_eq!(up, DirectionSet::UP | DirectionSet::DOWN);
            let left = connectable_directions(EntityType::StraightPipe, Direction::Left);
            assert_eq!(left, DirectionSet::LEFT | DirectionSet::RIGHT);
        }

        #[test]
        fn non_pipes_never_connect() {
            for kind in [EntityType::Background, EntityType::Player, EntityType::Box] {
                for d in Direction::all() {
                    assert!(connectable_directions(kind, *d).is_empty());
                }
            }
        }
    }

    mod propagation_tests {
        use super::*;

        #[test]
        fn bent_pivot_reaches_straight_pipe_above() {
            let mut store = store();
            store
                .place(EntityType::BentPipe, TilePos::new(1, 1), true, Direction::Up)
                .unwrap();
            store
                .place(EntityType::StraightPipe, TilePos::new(1, 2), false, Direction::Up)
                .unwrap();
            update_all_connections(&mut store);
            assert!(store.flags(1).is_movable());
        }

        #[test]
        fn one_sided_contact_does_not_connect() {
            let mut store = store();
            store
                .place(EntityType::BentPipe, TilePos::new(1, 1), true, Direction::Up)
                .unwrap();
            // Faces left/right, so it has no side pointing down at the pivot.
            store
                .place(EntityType::StraightPipe, TilePos::new(1, 2), false, Direction::Left)
                .unwrap();
            update_all_connections(&mut store);
            assert!(!store.flags(1).is_movable());
        }

        #[test]
        fn single_pass_lags_on_backward_links() {
            let mut store = store();
            let pipe = |store: &mut EntityStore, x| {
                store
                    .place(EntityType::StraightPipe, TilePos::new(x, 1), false, Direction::Right)
                    .unwrap();
            };
            // Slots: pivot (1,1), third link (3,1), second link (2,1), fourth link (4,1).
            pipe(&mut store, 1);
            pipe(&mut store, 3);
            pipe(&mut store, 2);
            pipe(&mut store, 4);

            update_all_connections(&mut store);
            assert!(store.flags(2).is_movable());
            assert!(store.flags(1).is_movable());
            assert!(!store.flags(3).is_movable());

            update_all_connections(&mut store);
            assert!(store.flags(3).is_movable());
        }

        #[test]
        fn movability_is_sticky() {
            let mut store = store();
            store
                .place(EntityType::Box, TilePos::new(0, 0), true, Direction::Up)
                .unwrap();
            store
                .place(EntityType::Box, TilePos::new(5, 5), true, Direction::Up)
                .unwrap();
            update_all_connections(&mut store);
            assert!(store.flags(1).is_movable());
        }
    }
}

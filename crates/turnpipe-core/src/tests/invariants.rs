//! Property tests over random command sequences.

use std::collections::BTreeSet;

use proptest::prelude::*;
use turnpipe_grid::{Rotation, TilePos};

use crate::config::{EngineConfig, Layout, Placement};
use crate::engine::Engine;
use crate::entity::EntityType;
use crate::output::{Command, TurnOutcome};

use super::helpers::{assert_idle_and_consistent, scattered_engine, transforms};

fn command() -> impl Strategy<Value = Command> {
    prop::sample::select(Command::ALL.to_vec())
}

/// Offsets around the pivot, excluding the pivot tile itself.
fn cluster() -> impl Strategy<Value = BTreeSet<(i32, i32)>> {
    prop::collection::btree_set((-3i32..=3, -3i32..=3), 0..16)
        .prop_map(|set| set.into_iter().filter(|&offset| offset != (0, 0)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_turn_leaves_a_consistent_board(
        seed in any::<u64>(),
        commands in prop::collection::vec(command(), 1..24),
    ) {
        let mut engine = scattered_engine(seed, 12);
        let count = engine.board().store().len();
        for command in commands {
            engine.apply(command);
            assert_idle_and_consistent(&engine);
            prop_assert_eq!(engine.board().store().len(), count);
        }
    }

    #[test]
    fn failed_commands_change_nothing(
        seed in any::<u64>(),
        commands in prop::collection::vec(command(), 1..24),
    ) {
        let mut engine = scattered_engine(seed, 12);
        for command in commands {
            let before = engine.board().store().clone();
            let outcome = engine.apply(command);
            if outcome.is_committed() {
                continue;
            }
            let store = engine.board().store();
            prop_assert_eq!(transforms(store), transforms(&before));
            for slot in store.slots() {
                prop_assert_eq!(store.flags(slot).is_movable(), before.flags(slot).is_movable());
            }
            if let TurnOutcome::Stalled { .. } = outcome {
                prop_assert!(engine.take_partial_rotation().is_some());
            }
        }
    }

    #[test]
    fn free_rotation_round_trips(offsets in cluster(), right in any::<bool>()) {
        let pivot = TilePos::new(7, 7);
        let entities = offsets
            .iter()
            .map(|&(x, y)| Placement::new(EntityType::Box, pivot + TilePos::new(x, y)).movable())
            .collect();
        let config = EngineConfig::with_grid(15, 15)
            .with_pivot(Placement::new(EntityType::Box, pivot))
            .with_layout(Layout::Explicit { entities });
        let mut engine = Engine::new(config).unwrap();
        let start = transforms(engine.board().store());

        let rotation = if right { Rotation::Right } else { Rotation::Left };
        prop_assert!(engine.rotate(rotation).is_committed());
        for slot in engine.board().store().slots() {
            let store = engine.board().store();
            let offset = start[slot].0 - pivot;
            prop_assert_eq!(store.position(slot), pivot + rotation.rotate_offset(offset));
        }

        prop_assert!(engine.rotate(rotation.inverse()).is_committed());
        prop_assert_eq!(transforms(engine.board().store()), start);
        assert_idle_and_consistent(&engine);
    }
}

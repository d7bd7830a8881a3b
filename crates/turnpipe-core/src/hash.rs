//! State hashing for determinism checks.
//!
//! Two boards driven by the same configuration and the same command sequence
//! must produce identical hashes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::board::Board;
use crate::store::EntityStore;

/// Compute a deterministic hash of board state.
///
/// Covers grid bounds, every slot (id, type, position, orientation, flags,
/// delta) in slot order, the pending rotation counters and the stall
/// feedback.
#[must_use]
pub fn hash_board(board: &Board) -> u64 {
    let mut hasher = DefaultHasher::new();

    hash_store(board.store(), &mut hasher);
    board.rotation_counts().hash(&mut hasher);

    // Angle as bits to avoid float comparison issues
    let partial = board.partial_rotation();
    partial.angle.to_bits().hash(&mut hasher);
    partial.sign.hash(&mut hasher);

    hasher.finish()
}

fn hash_store<H: Hasher>(store: &EntityStore, hasher: &mut H) {
    let bounds = store.bounds();
    bounds.columns().hash(hasher);
    bounds.rows().hash(hasher);
    store.len().hash(hasher);

    for slot in store.slots() {
        store.id(slot).hash(hasher);
        store.entity_type(slot).hash(hasher);
        store.position(slot).hash(hasher);
        store.orientation(slot).hash(hasher);
        store.flags(slot).bits().hash(hasher);
        store.delta(slot).hash(hasher);
    }
}

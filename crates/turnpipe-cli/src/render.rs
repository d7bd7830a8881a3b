//! Text rendering of a frame.
//!
//! One character per tile, highest row first. Pipes are drawn with box
//! characters showing their open sides; movable pipes use the heavy set.

use std::fmt::Write;

use turnpipe_core::{EntityType, EntityView, FrameView};
use turnpipe_grid::{Direction, TilePos};

const EMPTY: char = '·';

/// Glyph for one entity.
fn glyph(entity: &EntityView) -> char {
    let heavy = entity.flags.is_movable();
    match (entity.kind, entity.orientation, heavy) {
        (EntityType::BentPipe, Direction::Up, false) => '┘',
        (EntityType::BentPipe, Direction::Left, false) => '┐',
        (EntityType::BentPipe, Direction::Down, false) => '┌',
        (EntityType::BentPipe, Direction::Right, false) => '└',
        (EntityType::BentPipe, Direction::Up, true) => '┛',
        (EntityType::BentPipe, Direction::Left, true) => '┓',
        (EntityType::BentPipe, Direction::Down, true) => '┏',
        (EntityType::BentPipe, Direction::Right, true) => '┗',
        (EntityType::StraightPipe, Direction::Up | Direction::Down, false) => '│',
        (EntityType::StraightPipe, Direction::Left | Direction::Right, false) => '─',
        (EntityType::StraightPipe, Direction::Up | Direction::Down, true) => '┃',
        (EntityType::StraightPipe, Direction::Left | Direction::Right, true) => '━',
        (EntityType::Box, _, false) => '#',
        (EntityType::Box, _, true) => '▣',
        (EntityType::Player, _, _) => '@',
        (EntityType::Background, _, _) => ' ',
    }
}

/// Draws the grid, top row first.
pub fn render(view: &FrameView<'_>) -> String {
    let bounds = view.bounds();
    let mut out = String::new();
    for row in (0..bounds.rows()).rev() {
        for column in 0..bounds.columns() {
            #[allow(clippy::cast_possible_wrap)]
            let position = TilePos::new(column as i32, row as i32);
            let c = view.entity_at(position).map_or(EMPTY, |entity| glyph(&entity));
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// One-line summary of the pivot and how many entities are movable.
pub fn status(view: &FrameView<'_>) -> String {
    let mut line = String::new();
    if let Some(pivot) = view.pivot() {
        let _ = write!(
            line,
            "pivot {} facing {}",
            pivot.position, pivot.orientation
        );
    }
    let movable = view.entities().filter(|e| e.flags.is_movable()).count();
    let _ = write!(line, ", {movable}/{} movable", view.len());
    line
}

//! Arc quantization for quarter turns.
//!
//! A quarter turn moves an entity along a circular arc around the pivot. The
//! grid only knows unit steps, so the arc is walked as a chain of lattice
//! crossings: from the current point the walker looks at the next half-tile
//! boundary in x and in y, follows whichever the circle reaches first, and
//! rounds the result to a tile. Each crossing becomes one cardinal step tagged
//! with the arc angle accumulated so far.
//!
//! # Frame
//!
//! The walk runs in a frame whose rows grow downwards and is mirrored back on
//! the way out, so [`quantize_arc`] speaks the grid's rows-up coordinates.
//!
//! # Numerics
//!
//! All arithmetic is `f32`. Rounding is biased by [`SNAP_BIAS`] toward the
//! turn's sense so a point sitting exactly on a boundary falls on the side the
//! turn is heading to. Crossing an axis nudges the walker [`AXIS_NUDGE`] off
//! it and accounts the swept angle with [`HALF_TURN`], which is slightly less
//! than π; the very first step after starting on an axis can therefore carry a
//! tiny negative angle.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use turnpipe_grid::{Direction, Rotation};

/// Rounding bias toward the turn's sense.
pub const SNAP_BIAS: f32 = 0.0001;

/// Distance from an axis at which the walker resumes after crossing it.
pub const AXIS_NUDGE: f32 = 0.5001;

/// Angle accounted for a crossing from one side of an axis to the other.
pub const HALF_TURN: f32 = 3.141_592;

/// Upper bound on lattice crossings for one arc.
pub const MAX_ARC_STEPS: usize = 100;

/// One cardinal step of a quantized arc, relative to the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcStep {
    /// Arc angle accumulated when the walk reached `from`.
    pub angle: f32,
    /// Offset from the pivot the step starts at.
    pub from: IVec2,
    /// Direction of the step.
    pub direction: Direction,
}

/// Quantizes the quarter-turn arc of `offset` around the pivot.
///
/// Returns the unit steps leading from `offset` to
/// `rotation.rotate_offset(offset)`, in walk order. Steps spanning more than
/// one tile are dropped. The pivot itself (`offset == 0`) has no arc.
///
/// # Example
///
/// ```
/// use glam::IVec2;
/// use turnpipe_core::resolver::quantize_arc;
/// use turnpipe_grid::{Direction, Rotation};
///
/// let steps = quantize_arc(IVec2::new(1, 0), Rotation::Right);
/// let path: Vec<_> = steps.iter().map(|s| (s.from, s.direction)).collect();
/// assert_eq!(
///     path,
///     vec![(IVec2::new(1, 0), Direction::Down), (IVec2::new(1, -1), Direction::Left)]
/// );
/// ```
#[must_use]
pub fn quantize_arc(offset: IVec2, rotation: Rotation) -> Vec<ArcStep> {
    if offset == IVec2::ZERO {
        return Vec::new();
    }

    let start = mirror(offset);
    let sign = rotation.sign();
    let end = IVec2::new(-start.y * sign, start.x * sign);

    let mut walker = ArcWalker::new(start, sign);
    let mut points = vec![(start, walker.angle)];
    for _ in 0..MAX_ARC_STEPS {
        let point = walker.advance();
        points.push((point, walker.angle));
        if point == end {
            break;
        }
    }

    points
        .windows(2)
        .filter_map(|pair| {
            let (from, angle) = pair[0];
            let (to, _) = pair[1];
            let from = mirror(from);
            let direction = Direction::from_offset(mirror(to) - from)?;
            Some(ArcStep {
                angle,
                from,
                direction,
            })
        })
        .collect()
}

/// Flips between the rows-up grid frame and the rows-down walk frame.
const fn mirror(v: IVec2) -> IVec2 {
    IVec2::new(v.x, -v.y)
}

// =============================================================================
// Arc Walker
// =============================================================================

/// Walk state: exact point on the circle plus swept angle.
struct ArcWalker {
    pos: Vec2,
    angle: f32,
    sign: f32,
    radius: f32,
}

/// Quadrant of the walk frame, with the symmetry mapping it onto the first.
#[derive(Clone, Copy)]
enum Quadrant {
    First,
    Second,
    Third,
    Fourth,
}

impl Quadrant {
    fn of(p: Vec2) -> Option<Self> {
        match (p.x > 0.5, p.x < -0.5, p.y > 0.5, p.y < -0.5) {
            (true, _, true, _) => Some(Quadrant::First),
            (_, true, true, _) => Some(Quadrant::Second),
            (_, true, _, true) => Some(Quadrant::Third),
            (true, _, _, true) => Some(Quadrant::Fourth),
            _ => None,
        }
    }

    fn to_first(self, v: Vec2) -> Vec2 {
        match self {
            Quadrant::First => v,
            Quadrant::Second => Vec2::new(v.y, -v.x),
            Quadrant::Third => Vec2::new(-v.x, -v.y),
            Quadrant::Fourth => Vec2::new(-v.y, v.x),
        }
    }

    fn from_first(self, v: Vec2) -> Vec2 {
        match self {
            Quadrant::First => v,
            Quadrant::Second => Vec2::new(-v.y, v.x),
            Quadrant::Third => Vec2::new(-v.x, -v.y),
            Quadrant::Fourth => Vec2::new(v.y, -v.x),
        }
    }
}

impl ArcWalker {
    #[allow(clippy::cast_precision_loss)]
    fn new(start: IVec2, sign: i32) -> Self {
        let pos = start.as_vec2();
        Self {
            pos,
            angle: 0.0,
            sign: sign as f32,
            radius: pos.length(),
        }
    }

    /// Advances to the next lattice crossing and returns its tile.
    #[allow(clippy::cast_possible_truncation)]
    fn advance(&mut self) -> IVec2 {
        let Vec2 { x, y } = self.pos;

        if let Some(quadrant) = Quadrant::of(self.pos) {
            let (pos, tile) = self.snap(quadrant.to_first(self.pos));
            self.pos = quadrant.from_first(pos);
            let tile = quadrant.from_first(tile);
            return IVec2::new(tile.x as i32, tile.y as i32);
        }

        if x.abs() <= 0.5 {
            let y_sign = if y >= 0.0 { 1.0 } else { -1.0 };
            self.angle += HALF_TURN - (y / x).atan().abs() * 2.0;
            self.pos = Vec2::new(-y_sign * self.sign * AXIS_NUDGE, y);
            return IVec2::new((-y_sign * self.sign) as i32, y.round() as i32);
        }

        if y.abs() <= 0.5 {
            let x_sign = if x >= 0.0 { 1.0 } else { -1.0 };
            self.angle += (y / x).atan().abs() * 2.0;
            self.pos = Vec2::new(x, x_sign * self.sign * AXIS_NUDGE);
            return IVec2::new(x.round() as i32, (x_sign * self.sign) as i32);
        }

        IVec2::ZERO
    }

    /// Moves a first-quadrant point to the nearer of its next x and y
    /// boundary crossings. Returns the new point and its rounded tile.
    fn snap(&mut self, mut p: Vec2) -> (Vec2, Vec2) {
        let current = (p.y / p.x).atan();
        let next = self.lattice_target(p);
        let along_x = (next.x / self.radius).acos();
        let along_y = (next.y / self.radius).asin();
        let dx = (along_x - current).abs();
        let dy = (along_y - current).abs();

        if dx < dy {
            p.x = next.x;
            p.y = along_x.sin() * self.radius;
            self.angle += dx;
        } else {
            p.y = next.y;
            p.x = along_y.cos() * self.radius;
            self.angle += dy;
        }

        let tile = Vec2::new(
            (p.x - self.sign * SNAP_BIAS).round(),
            (p.y + self.sign * SNAP_BIAS).round(),
        );
        (p, tile)
    }

    /// Next half-tile boundaries in x and y in the turn's sense, clamped to
    /// the circle.
    fn lattice_target(&self, p: Vec2) -> Vec2 {
        if self.sign < 0.0 {
            Vec2::new(
                ((p.x + SNAP_BIAS).round() + 0.5).min(self.radius),
                (p.y - SNAP_BIAS).round() - 0.5,
            )
        } else {
            Vec2::new(
                (p.x - SNAP_BIAS).round() - 0.5,
                ((p.y + SNAP_BIAS).round() + 0.5).min(self.radius),
            )
        }
    }
}

//! Grid coordinates and rectangles.

use std::fmt;

/// A cell position by column (`x`) and row (`y`).
///
/// Coordinates are signed and unbounded; nothing here clamps them.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Position {
        Position { x, y }
    }

    /// Saturates at the coordinate limits.
    pub const fn offset(self, dx: i64, dy: i64) -> Position {
        Position::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Corners of a rectangular selection, both inclusive.
///
/// `origin` is where the selection started, so either axis may run
/// backwards (origin greater than terminal).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct MultiSelection {
    pub origin: Position,
    pub terminal: Position,
}

impl MultiSelection {
    pub const fn new(origin: Position, terminal: Position) -> MultiSelection {
        MultiSelection { origin, terminal }
    }

    /// Inclusive containment, normalising each axis first.
    pub fn contains(&self, pos: Position) -> bool {
        let (x1, x2) = min_max(self.origin.x, self.terminal.x);
        let (y1, y2) = min_max(self.origin.y, self.terminal.y);
        pos.x >= x1 && pos.x <= x2 && pos.y >= y1 && pos.y <= y2
    }

    /// Rectangle from origin with raw signed deltas to terminal.
    pub fn to_rect(&self) -> Rect {
        Rect {
            origin: self.origin,
            width: self.terminal.x.saturating_sub(self.origin.x),
            height: self.terminal.y.saturating_sub(self.origin.y),
        }
    }
}

/// A rectangle as origin plus signed extents.
///
/// `width` and `height` are deltas, not sizes: a single cell has `0, 0`, and a
/// selection dragged up-left has negative extents. Consumers normalise.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Rect {
    pub origin: Position,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const fn cell(origin: Position) -> Rect {
        Rect {
            origin,
            width: 0,
            height: 0,
        }
    }

    /// Normalised inclusive corners `(top_left, bottom_right)`.
    pub fn bounds(&self) -> (Position, Position) {
        let (x1, x2) = min_max(self.origin.x, self.origin.x.saturating_add(self.width));
        let (y1, y2) = min_max(self.origin.y, self.origin.y.saturating_add(self.height));
        (Position::new(x1, y1), Position::new(x2, y2))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.origin, self.width, self.height)
    }
}

fn min_max(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}

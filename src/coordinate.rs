//! Positions on the toroidal grid.
//!
//! Every arithmetic step on a coordinate goes through [`wrap`], so stepping left of column `0`
//! lands on column `width - 1`, stepping above row `0` lands on row `height - 1`, and likewise
//! for the other two edges and all four corners.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Maps any integer onto `[0, bound)`.
///
/// `bound` must be positive.
#[must_use]
pub fn wrap(value: isize, bound: usize) -> usize {
    // `rem_euclid` also handles offsets larger than a single lap of the torus.
    value.rem_euclid(bound as isize) as usize
}

/// An `(x, y)` cell position with `x` in `[0, width)` and `y` in `[0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Coordinate { x, y }
    }

    /// Returns the coordinate `(x + dx, y + dy)` wrapped onto a `width` x `height` torus.
    #[must_use]
    pub fn offset(self, dx: isize, dy: isize, width: usize, height: usize) -> Self {
        Coordinate {
            x: wrap(self.x as isize + dx, width),
            y: wrap(self.y as isize + dy, height),
        }
    }

    /// Row-major position of this coordinate in a grid of the given width.
    #[must_use]
    pub const fn index(self, width: usize) -> usize {
        self.y * width + self.x
    }

    /// Inverse of [`Coordinate::index`].
    #[must_use]
    pub const fn from_index(index: usize, width: usize) -> Self {
        Coordinate {
            x: index % width,
            y: index / width,
        }
    }

    /// Canonical string form, unique per coordinate. Suitable as a lookup key outside the grid.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

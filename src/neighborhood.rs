//! Ring-ordered neighborhood traversal.
//!
//! A neighborhood of radius `R` is the concatenation of the rings `r = 1..=R`, innermost first.
//! The order is load-bearing: the transition function decays the infection chance each time it
//! finishes consuming one ring, so a ring must always contribute exactly
//! [`NeighborhoodModel::ring_size`] entries, in a fixed orientation.
//!
//! Rings are produced as offsets from the center and wrapped onto the torus afterwards. When
//! `2r` equals a grid dimension the two opposite edges of the ring fall on the same cells and
//! those cells appear twice in the ring. This only happens at the largest radius an even-sized
//! grid allows.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// The shape of the neighborhood around a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborhoodModel {
    /// Diamond-shaped rings of `4r` cells (Manhattan distance `r`).
    VonNeumann,
    /// Square rings of `8r` cells (Chebyshev distance `r`).
    #[default]
    Moore,
}

impl NeighborhoodModel {
    /// Number of cells added by each unit of radius.
    #[must_use]
    pub const fn multiplier(self) -> usize {
        match self {
            NeighborhoodModel::VonNeumann => 4,
            NeighborhoodModel::Moore => 8,
        }
    }

    /// Number of cells in the ring at `radius`.
    #[must_use]
    pub const fn ring_size(self, radius: usize) -> usize {
        self.multiplier() * radius
    }

    /// Offsets of the ring at `radius` relative to its center, in traversal order.
    #[must_use]
    pub fn ring_offsets(self, radius: usize) -> Vec<(isize, isize)> {
        let r = radius as isize;
        let mut offsets = Vec::with_capacity(self.ring_size(radius));
        match self {
            NeighborhoodModel::VonNeumann => {
                // Starts at the left tip of the diamond and walks its four diagonal edges.
                offsets.extend((0..r).map(|i| (i - r, i)));
                offsets.extend((0..r).map(|i| (i, r - i)));
                offsets.extend((0..r).map(|i| (r - i, -i)));
                offsets.extend((0..r).map(|i| (-i, i - r)));
            }
            NeighborhoodModel::Moore => {
                // Starts at the top-left corner. Each edge stops one short of the next corner.
                let side = 2 * r;
                offsets.extend((0..side).map(|i| (i - r, -r)));
                offsets.extend((0..side).map(|i| (r, i - r)));
                offsets.extend((0..side).map(|i| (r - i, r)));
                offsets.extend((0..side).map(|i| (-r, r - i)));
            }
        }
        offsets
    }
}

/// Largest radius that does not lap the torus in either dimension.
#[must_use]
pub fn effective_radius(requested: usize, width: usize, height: usize) -> usize {
    requested.min(width / 2).min(height / 2)
}

/// A precomputed traversal stencil for one grid.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    model: NeighborhoodModel,
    radius: usize,
    width: usize,
    height: usize,
    offsets: Vec<(isize, isize)>,
}

impl Neighborhood {
    /// Builds the stencil for `model`, clamping `requested_radius` with [`effective_radius`].
    #[must_use]
    pub fn new(
        model: NeighborhoodModel,
        requested_radius: usize,
        width: usize,
        height: usize,
    ) -> Self {
        let radius = effective_radius(requested_radius, width, height);
        let offsets = (1..=radius).flat_map(|r| model.ring_offsets(r)).collect();
        Neighborhood {
            model,
            radius,
            width,
            height,
            offsets,
        }
    }

    #[must_use]
    pub fn model(&self) -> NeighborhoodModel {
        self.model
    }

    /// The clamped radius actually used.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Total number of neighbors of every cell, counting repeated cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Every neighbor of `center`, innermost ring first.
    pub fn neighbors(&self, center: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        self.offsets
            .iter()
            .map(move |&(dx, dy)| center.offset(dx, dy, self.width, self.height))
    }

    /// The ring at `radius` around `center`, in traversal order.
    #[must_use]
    pub fn ring(&self, center: Coordinate, radius: usize) -> Vec<Coordinate> {
        self.model
            .ring_offsets(radius)
            .into_iter()
            .map(|(dx, dy)| center.offset(dx, dy, self.width, self.height))
            .collect()
    }
}

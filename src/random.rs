//! Reproducible per-cell random number generation.
//!
//! The engine never shares a generator between cells. Each cell gets its own `SmallRng` for each
//! (stream, day) pair, seeded from a hash of the base seed, the stream, the day and the cell's
//! coordinate. Draws therefore do not depend on the order in which cells are visited, and cells
//! can be computed on any thread.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::coordinate::Coordinate;

/// Independent families of draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RngStream {
    /// Draws made while populating the grid.
    Population,
    /// Draws made while computing a cell's next state.
    Transmission,
}

impl RngStream {
    fn tag(self) -> u8 {
        match self {
            RngStream::Population => 0,
            RngStream::Transmission => 1,
        }
    }
}

/// Derives the seed for one cell's generator.
#[must_use]
pub fn derive_seed(base_seed: u64, stream: RngStream, day: u64, coordinate: Coordinate) -> u64 {
    let mut bytes = [0u8; 25];
    bytes[0] = stream.tag();
    bytes[1..9].copy_from_slice(&day.to_le_bytes());
    bytes[9..17].copy_from_slice(&(coordinate.x as u64).to_le_bytes());
    bytes[17..25].copy_from_slice(&(coordinate.y as u64).to_le_bytes());
    xxh3_64_with_seed(&bytes, base_seed)
}

/// Creates the generator for one cell.
#[must_use]
pub fn cell_rng(base_seed: u64, stream: RngStream, day: u64, coordinate: Coordinate) -> SmallRng {
    SmallRng::seed_from_u64(derive_seed(base_seed, stream, day, coordinate))
}

/// Returns true with probability `p`.
///
/// Total over every `f64`: `p <= 0` and NaN never succeed, `p >= 1` always does.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

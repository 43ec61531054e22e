//! A cellular-automaton contagion simulator on a toroidal grid.
//!
//! Every cell of a `width` x `height` grid is an individual that may be susceptible,
//! contagious, removed (immune) or dead. The grid wraps at its edges, so every cell has the same
//! number of neighbors. Each simulated day, every susceptible cell is exposed to its contagious
//! neighbors, ring by ring from the inside out, with an infection chance that decays with
//! distance. Contagious cells may be removed, with a chance that shrinks with the time they have
//! been infected, and die after a fixed number of days.
//!
//! The engine is organized in layers:
//! * [`coordinate`] provides wrapped grid positions.
//! * [`neighborhood`] enumerates the Von Neumann or Moore rings around a cell.
//! * [`cell`] holds the per-cell state and its daily transition.
//! * [`grid`] owns the double-buffered population, the three population strategies, and the
//!   day-by-day stepping.
//! * [`statistics`] aggregates counts over the grid.
//!
//! Around the engine, [`parameters`], [`report`] and [`runner`] make up the `epigrid` binary,
//! which runs a simulation until the statistics settle and writes a daily CSV report.
//!
//! ```
//! use epigrid::{Coordinate, CellState, Grid, GridConfig, NeighborhoodModel};
//!
//! let config = GridConfig {
//!     width: 5,
//!     height: 5,
//!     contagion_radius: 1,
//!     neighborhood: NeighborhoodModel::VonNeumann,
//!     base_infection_chance: 1.0,
//!     ..GridConfig::default()
//! };
//! let mut grid = Grid::new(config, 42).unwrap();
//! grid.set_cell(Coordinate::new(2, 2), CellState::new(true, false, 0.0));
//! grid.advance();
//! assert_eq!(grid.snapshot().infections, 5);
//! ```
pub mod cell;
pub mod coordinate;
pub mod error;
pub mod grid;
pub mod log;
pub mod neighborhood;
pub mod parameters;
pub mod random;
pub mod report;
pub mod runner;
pub mod statistics;

pub use cell::{CellState, TransmissionParams};
pub use coordinate::{wrap, Coordinate};
pub use error::EpigridError;
pub use grid::{Grid, GridConfig};
pub use neighborhood::{Neighborhood, NeighborhoodModel};
pub use parameters::{Parameters, PopulationStrategy};
pub use statistics::{Statistics, StatisticsDelta};

// Re-export for logging.
pub use crate::log::{debug, error, info, trace, warn};

// Re-exports so downstream crates use the same versions as the engine.
pub use rand;
pub use rand_distr;

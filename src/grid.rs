//! The double-buffered toroidal grid.
//!
//! A `Grid` owns two fully populated buffers of `width * height` cells stored in row-major
//! order. A day is computed by writing every cell's next state into the `next` buffer, reading
//! only from the `current` one, and then swapping the two. Each cell's next state depends only
//! on the current buffer and on its own random stream (see [`crate::random`]), so the cells of a
//! day are computed in parallel.

use log::{debug, trace};
use rand::distr::Distribution;
use rand::rngs::SmallRng;
use rand::Rng;
use rand_distr::Normal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cell::{CellState, TransmissionParams};
use crate::coordinate::Coordinate;
use crate::error::EpigridError;
use crate::neighborhood::{Neighborhood, NeighborhoodModel};
use crate::random::{cell_rng, chance, RngStream};
use crate::statistics::Statistics;

/// Upper bound on redraws of a boundary resistance value under the skewed Gaussian strategy.
pub const MAX_REROLLS: u32 = 1000;

/// Fixed configuration of a grid, set once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    /// Requested radius; clamped to half the smaller grid dimension.
    pub contagion_radius: usize,
    pub days_to_death: u32,
    pub neighborhood: NeighborhoodModel,
    pub base_infection_chance: f64,
    /// Decay of the infection chance per ring. Values outside `(0, 1]` select squaring.
    pub contagion_decay: f64,
    /// Decay of the removal chance per day infected. Values outside `(0, 1]` select
    /// exponentiation of the resistance.
    pub removal_decay: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            width: 50,
            height: 50,
            contagion_radius: 3,
            days_to_death: 5,
            neighborhood: NeighborhoodModel::Moore,
            base_infection_chance: 0.05,
            contagion_decay: 0.5,
            removal_decay: 0.95,
        }
    }
}

impl GridConfig {
    #[must_use]
    pub fn transmission_params(&self) -> TransmissionParams {
        TransmissionParams {
            neighborhood: self.neighborhood,
            base_infection_chance: self.base_infection_chance,
            contagion_decay: self.contagion_decay,
            removal_decay: self.removal_decay,
            days_to_death: self.days_to_death,
        }
    }

    fn validate(&self) -> Result<usize, EpigridError> {
        if self.width == 0 {
            return Err(EpigridError::InvalidConfig(
                "width must be positive".to_string(),
            ));
        }
        if self.height == 0 {
            return Err(EpigridError::InvalidConfig(
                "height must be positive".to_string(),
            ));
        }
        let max_dimension = isize::MAX as usize;
        if self.width > max_dimension || self.height > max_dimension {
            return Err(EpigridError::InvalidConfig(
                "grid dimensions are too large".to_string(),
            ));
        }
        self.width.checked_mul(self.height).ok_or_else(|| {
            EpigridError::InvalidConfig(format!(
                "a {}x{} grid has too many cells",
                self.width, self.height
            ))
        })
    }
}

fn sample_resistance<R: Rng + ?Sized>(normal: &Normal<f64>, reroll: bool, rng: &mut R) -> f64 {
    let mut resistance = normal.sample(rng).clamp(0.0, 1.0);
    let mut rerolls = 0;
    while reroll && (resistance == 0.0 || resistance == 1.0) && rerolls < MAX_REROLLS {
        resistance = normal.sample(rng).clamp(0.0, 1.0);
        rerolls += 1;
    }
    resistance
}

pub struct Grid {
    config: GridConfig,
    params: TransmissionParams,
    neighborhood: Neighborhood,
    seed: u64,
    day: u64,
    populated: bool,
    current: Vec<CellState>,
    next: Vec<CellState>,
}

impl Grid {
    /// Creates a grid of healthy, susceptible cells with zero resistance.
    ///
    /// # Errors
    ///
    /// Returns [`EpigridError::InvalidConfig`] if either dimension is zero or the grid cannot be
    /// addressed.
    pub fn new(config: GridConfig, seed: u64) -> Result<Grid, EpigridError> {
        let cell_count = config.validate()?;
        let neighborhood = Neighborhood::new(
            config.neighborhood,
            config.contagion_radius,
            config.width,
            config.height,
        );
        debug!(
            "creating {}x{} grid with {:?} neighborhood of radius {} (requested {})",
            config.width,
            config.height,
            config.neighborhood,
            neighborhood.radius(),
            config.contagion_radius
        );
        Ok(Grid {
            params: config.transmission_params(),
            config,
            neighborhood,
            seed,
            day: 0,
            populated: false,
            current: vec![CellState::default(); cell_count],
            next: vec![CellState::default(); cell_count],
        })
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.config.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.config.height
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of days simulated so far.
    #[must_use]
    pub fn day(&self) -> u64 {
        self.day
    }

    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    #[must_use]
    pub fn neighborhood(&self) -> &Neighborhood {
        &self.neighborhood
    }

    /// The current day's cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.current
    }

    /// Every coordinate in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> {
        let width = self.config.width;
        (0..self.current.len()).map(move |index| Coordinate::from_index(index, width))
    }

    /// The ordered neighbor list of `coordinate`, innermost ring first.
    pub fn neighbors(&self, coordinate: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        self.neighborhood.neighbors(self.wrap(coordinate))
    }

    fn wrap(&self, coordinate: Coordinate) -> Coordinate {
        Coordinate::new(
            coordinate.x % self.config.width,
            coordinate.y % self.config.height,
        )
    }

    /// The current state of the cell at `coordinate` (wrapped onto the grid).
    #[must_use]
    pub fn cell(&self, coordinate: Coordinate) -> &CellState {
        &self.current[self.wrap(coordinate).index(self.config.width)]
    }

    /// Overwrites the current state of one cell, e.g. to seed an infection.
    pub fn set_cell(&mut self, coordinate: Coordinate, state: CellState) {
        let index = self.wrap(coordinate).index(self.config.width);
        self.current[index] = state;
    }

    fn populate_with<F>(&mut self, strategy: &str, make_cell: F) -> Result<(), EpigridError>
    where
        F: Fn(&mut SmallRng) -> CellState + Sync,
    {
        if self.populated || self.day > 0 {
            return Err(EpigridError::AlreadyPopulated);
        }
        let seed = self.seed;
        let width = self.config.width;
        self.current
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, cell)| {
                let coordinate = Coordinate::from_index(index, width);
                let mut rng = cell_rng(seed, RngStream::Population, 0, coordinate);
                *cell = make_cell(&mut rng);
            });
        self.populated = true;
        debug!("populated {} cells with the {strategy} strategy", self.current.len());
        Ok(())
    }

    /// Infects each cell with probability `infection_fraction` and gives every cell the same
    /// `resistance`.
    ///
    /// # Errors
    ///
    /// Returns [`EpigridError::AlreadyPopulated`] if the grid was populated or stepped before.
    pub fn populate_uniform(
        &mut self,
        infection_fraction: f64,
        resistance: f64,
    ) -> Result<(), EpigridError> {
        self.populate_with("uniform", |rng| {
            let infected = chance(rng, infection_fraction);
            CellState::sample(infected, resistance, rng)
        })
    }

    /// Infects each cell with probability `infection_fraction` and draws each resistance from a
    /// normal distribution around `target_resistance`, clamped to `[0, 1]`. With `reroll`,
    /// values that land exactly on `0` or `1` are redrawn (at most [`MAX_REROLLS`] times).
    ///
    /// # Errors
    ///
    /// Returns [`EpigridError::InvalidParameter`] if `target_resistance` or `std_dev` is not
    /// finite, and [`EpigridError::AlreadyPopulated`] if the grid was populated or stepped
    /// before.
    pub fn populate_skewed_gaussian(
        &mut self,
        infection_fraction: f64,
        target_resistance: f64,
        std_dev: f64,
        reroll: bool,
    ) -> Result<(), EpigridError> {
        if !target_resistance.is_finite() {
            return Err(EpigridError::InvalidParameter(format!(
                "target resistance must be finite, got {target_resistance}"
            )));
        }
        if !std_dev.is_finite() {
            return Err(EpigridError::InvalidParameter(format!(
                "resistance standard deviation must be finite, got {std_dev}"
            )));
        }
        let normal = Normal::new(target_resistance, std_dev.abs()).map_err(|e| {
            EpigridError::InvalidParameter(format!("resistance standard deviation {std_dev}: {e}"))
        })?;
        self.populate_with("skewed gaussian", |rng| {
            let infected = chance(rng, infection_fraction);
            let resistance = sample_resistance(&normal, reroll, rng);
            CellState::sample(infected, resistance, rng)
        })
    }

    /// Infects each cell with probability `infection_fraction` and draws each resistance
    /// uniformly from `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`EpigridError::AlreadyPopulated`] if the grid was populated or stepped before.
    pub fn populate_uniform_resistance(
        &mut self,
        infection_fraction: f64,
    ) -> Result<(), EpigridError> {
        self.populate_with("uniform resistance", |rng| {
            let infected = chance(rng, infection_fraction);
            let resistance = rng.random::<f64>();
            CellState::sample(infected, resistance, rng)
        })
    }

    /// Simulates one day.
    pub fn advance(&mut self) {
        let day = self.day + 1;
        let seed = self.seed;
        let width = self.config.width;
        let current = &self.current;
        let neighborhood = &self.neighborhood;
        let params = &self.params;

        self.next
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, next)| {
                let coordinate = Coordinate::from_index(index, width);
                let mut rng = cell_rng(seed, RngStream::Transmission, day, coordinate);
                let neighbors = neighborhood
                    .neighbors(coordinate)
                    .map(|neighbor| &current[neighbor.index(width)]);
                *next = current[index].transition(neighbors, params, &mut rng);
            });

        std::mem::swap(&mut self.current, &mut self.next);
        self.day = day;
        trace!("advanced to day {day}");
    }

    /// Counts the contagious, dead and removed cells of the current day.
    #[must_use]
    pub fn snapshot(&self) -> Statistics {
        self.current
            .iter()
            .fold(Statistics::default(), |mut statistics, cell| {
                statistics.infections += usize::from(cell.is_contagious());
                statistics.deaths += usize::from(cell.is_dead());
                statistics.removed += usize::from(cell.is_removed());
                statistics
            })
    }
}

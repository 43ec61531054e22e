//! Run parameters, loadable from a JSON file.
//!
//! ```json
//! {
//!   "random_seed": 7,
//!   "grid": { "width": 40, "height": 40, "neighborhood": "von_neumann" },
//!   "population": {
//!     "strategy": "skewed_gaussian",
//!     "infection_fraction": 0.01,
//!     "target_resistance": 0.3,
//!     "std_dev": 0.1,
//!     "reroll": true
//!   }
//! }
//! ```
//!
//! Every field is optional; missing fields take their default values.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EpigridError;
use crate::grid::{Grid, GridConfig};

/// One of the three ways of populating a fresh grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PopulationStrategy {
    Uniform {
        infection_fraction: f64,
        resistance: f64,
    },
    SkewedGaussian {
        infection_fraction: f64,
        target_resistance: f64,
        std_dev: f64,
        #[serde(default)]
        reroll: bool,
    },
    UniformResistance {
        infection_fraction: f64,
    },
}

impl Default for PopulationStrategy {
    fn default() -> Self {
        PopulationStrategy::Uniform {
            infection_fraction: 0.01,
            resistance: 0.25,
        }
    }
}

impl PopulationStrategy {
    /// Populates `grid` with this strategy.
    ///
    /// # Errors
    ///
    /// Propagates the errors of the underlying `Grid::populate_*` call.
    pub fn apply(&self, grid: &mut Grid) -> Result<(), EpigridError> {
        match *self {
            PopulationStrategy::Uniform {
                infection_fraction,
                resistance,
            } => grid.populate_uniform(infection_fraction, resistance),
            PopulationStrategy::SkewedGaussian {
                infection_fraction,
                target_resistance,
                std_dev,
                reroll,
            } => grid.populate_skewed_gaussian(
                infection_fraction,
                target_resistance,
                std_dev,
                reroll,
            ),
            PopulationStrategy::UniformResistance { infection_fraction } => {
                grid.populate_uniform_resistance(infection_fraction)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub random_seed: u64,
    pub grid: GridConfig,
    pub population: PopulationStrategy,
    /// Consecutive days without any change after which a run stops.
    pub stable_days: u32,
    /// Optional hard limit on the number of simulated days.
    pub max_days: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            random_seed: 0,
            grid: GridConfig::default(),
            population: PopulationStrategy::default(),
            stable_days: 3,
            max_days: None,
        }
    }
}

impl Parameters {
    /// Reads parameters from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an `EpigridError` if the file cannot be opened or is not valid parameter JSON.
    pub fn from_json_file(path: &Path) -> Result<Parameters, EpigridError> {
        let reader = BufReader::new(File::open(path)?);
        let parameters = serde_json::from_reader(reader)?;
        Ok(parameters)
    }
}

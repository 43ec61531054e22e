//! The per-individual epidemiological record and its daily transition.
//!
//! A cell moves through three conditions:
//!
//! * **Susceptible** (`contagious == false`): each day the cell scans its neighbors, innermost
//!   ring first, and each contagious neighbor gets one chance to infect it. The chance starts at
//!   the base infection chance and decays every time a ring has been fully consumed. The scan
//!   stops at the first successful infection.
//! * **Infected** (`contagious == true`, not removed, not dead): `days_infected` grows by one per
//!   day, the cell may be removed (gain immunity) with a probability that shrinks with the days
//!   infected, and it dies once `days_infected` reaches `days_to_death`.
//! * **Frozen**: a dead cell, or a removed cell that is still marked contagious, never changes
//!   again. Frozen cells keep their `contagious` flag and are therefore still counted as
//!   infections by the statistics.
//!
//! A decay factor outside `(0, 1]` selects the fallback schedule in which a probability is
//! squared (infection) or raised to the days infected (removal) instead of being scaled.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::neighborhood::NeighborhoodModel;
use crate::random::chance;

/// The simulation-wide parameters a transition reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransmissionParams {
    pub neighborhood: NeighborhoodModel,
    pub base_infection_chance: f64,
    pub contagion_decay: f64,
    pub removal_decay: f64,
    pub days_to_death: u32,
}

fn is_decay_factor(decay: f64) -> bool {
    decay > 0.0 && decay <= 1.0
}

/// The infection chance in effect once the ring at `finished_radius` has been consumed.
fn decayed_infection_chance(
    params: &TransmissionParams,
    current: f64,
    finished_radius: usize,
) -> f64 {
    if is_decay_factor(params.contagion_decay) {
        params.base_infection_chance * params.contagion_decay.powf(finished_radius as f64)
    } else {
        current * current
    }
}

/// The chance a contagious neighbor on the ring at `radius` has of infecting a cell.
///
/// Ring `1` uses the base chance.
#[must_use]
pub fn infection_chance_at_radius(params: &TransmissionParams, radius: usize) -> f64 {
    (1..radius).fold(params.base_infection_chance, |current, finished| {
        decayed_infection_chance(params, current, finished)
    })
}

/// The chance an infected cell is removed on its `days_infected`-th day of infection.
#[must_use]
pub fn removal_chance(params: &TransmissionParams, resistance: f64, days_infected: u32) -> f64 {
    if is_decay_factor(params.removal_decay) {
        resistance * params.removal_decay.powf(f64::from(days_infected))
    } else {
        resistance.powf(f64::from(days_infected))
    }
}

/// One individual's state on one day. Never mutated in place; each day produces a new value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CellState {
    contagious: bool,
    removed: bool,
    dead: bool,
    days_infected: u32,
    resistance: f64,
}

impl CellState {
    /// Creates a living cell that has never been infected. `resistance` is clamped to `[0, 1]`
    /// with NaN mapped to `0`.
    #[must_use]
    pub fn new(contagious: bool, removed: bool, resistance: f64) -> Self {
        let resistance = if resistance.is_nan() {
            0.0
        } else {
            resistance.clamp(0.0, 1.0)
        };
        CellState {
            contagious,
            removed,
            dead: false,
            days_infected: 0,
            resistance,
        }
    }

    /// Creates a cell whose pre-existing immunity is drawn with probability equal to its
    /// resistance, independently of whether it starts contagious.
    pub fn sample<R: Rng + ?Sized>(contagious: bool, resistance: f64, rng: &mut R) -> Self {
        let mut cell = CellState::new(contagious, false, resistance);
        cell.removed = chance(rng, cell.resistance);
        cell
    }

    #[must_use]
    pub fn is_contagious(&self) -> bool {
        self.contagious
    }

    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    #[must_use]
    pub fn days_infected(&self) -> u32 {
        self.days_infected
    }

    #[must_use]
    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// True if no transition can ever change this cell again.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.dead || (self.contagious && self.removed)
    }

    /// Computes this cell's state for the next day.
    ///
    /// `neighbors` must be ordered innermost ring first, each ring contributing exactly
    /// `params.neighborhood.ring_size(r)` entries.
    pub fn transition<'a, I, R>(
        &self,
        neighbors: I,
        params: &TransmissionParams,
        rng: &mut R,
    ) -> CellState
    where
        I: IntoIterator<Item = &'a CellState>,
        R: Rng + ?Sized,
    {
        if self.dead {
            return *self;
        }
        if !self.contagious {
            return self.exposure(neighbors, params, rng);
        }
        if self.removed {
            return *self;
        }
        self.progression(params, rng)
    }

    fn exposure<'a, I, R>(
        &self,
        neighbors: I,
        params: &TransmissionParams,
        rng: &mut R,
    ) -> CellState
    where
        I: IntoIterator<Item = &'a CellState>,
        R: Rng + ?Sized,
    {
        let mut next = *self;
        let mut infection_chance = params.base_infection_chance;
        let mut radius = 1;
        let mut ring_end = params.neighborhood.ring_size(radius);

        for (consumed, neighbor) in neighbors.into_iter().enumerate() {
            if neighbor.contagious && chance(rng, infection_chance) {
                next.contagious = true;
                return next;
            }
            if consumed + 1 == ring_end {
                infection_chance = decayed_infection_chance(params, infection_chance, radius);
                radius += 1;
                ring_end += params.neighborhood.ring_size(radius);
            }
        }
        next
    }

    fn progression<R: Rng + ?Sized>(
        &self,
        params: &TransmissionParams,
        rng: &mut R,
    ) -> CellState {
        let mut next = *self;
        next.days_infected += 1;
        next.removed = chance(rng, removal_chance(params, self.resistance, next.days_infected));
        // Death is decided independently of removal; both may happen on the same day.
        if next.days_infected >= params.days_to_death {
            next.dead = true;
        }
        next
    }
}

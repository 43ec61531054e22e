//! Aggregate counts over the grid and the day-over-day bookkeeping the driver uses to decide
//! when a run has settled.

use serde::{Deserialize, Serialize};

/// Counts of cells in each (non-exclusive) category on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Cells marked contagious, including removed and dead cells that were once infected.
    pub infections: usize,
    pub deaths: usize,
    pub removed: usize,
}

impl Statistics {
    /// Change from `previous` to `self`.
    #[must_use]
    pub fn delta_since(&self, previous: &Statistics) -> StatisticsDelta {
        StatisticsDelta {
            infections: self.infections as i64 - previous.infections as i64,
            deaths: self.deaths as i64 - previous.deaths as i64,
            removed: self.removed as i64 - previous.removed as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatisticsDelta {
    pub infections: i64,
    pub deaths: i64,
    pub removed: i64,
}

impl StatisticsDelta {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.infections == 0 && self.deaths == 0 && self.removed == 0
    }
}

/// Counts consecutive days without any change in the statistics.
#[derive(Debug, Clone)]
pub struct StabilityTracker {
    required_days: u32,
    stable_days: u32,
}

impl StabilityTracker {
    #[must_use]
    pub fn new(required_days: u32) -> Self {
        StabilityTracker {
            required_days,
            stable_days: 0,
        }
    }

    /// Records one day's delta and returns true once the run has been stable for the required
    /// number of consecutive days.
    pub fn observe(&mut self, delta: &StatisticsDelta) -> bool {
        if delta.is_zero() {
            self.stable_days += 1;
        } else {
            self.stable_days = 0;
        }
        self.is_stable()
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.stable_days >= self.required_days
    }

    #[must_use]
    pub fn stable_days(&self) -> u32 {
        self.stable_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_signed_difference() {
        let before = Statistics {
            infections: 10,
            deaths: 2,
            removed: 5,
        };
        let after = Statistics {
            infections: 14,
            deaths: 2,
            removed: 4,
        };
        assert_eq!(
            after.delta_since(&before),
            StatisticsDelta {
                infections: 4,
                deaths: 0,
                removed: -1,
            }
        );
        assert!(before.delta_since(&before).is_zero());
    }

    #[test]
    fn stability_needs_consecutive_quiet_days() {
        let quiet = StatisticsDelta::default();
        let busy = StatisticsDelta {
            deaths: 1,
            ..StatisticsDelta::default()
        };
        let mut tracker = StabilityTracker::new(3);
        assert!(!tracker.observe(&quiet));
        assert!(!tracker.observe(&quiet));
        assert!(!tracker.observe(&busy));
        assert_eq!(tracker.stable_days(), 0);
        assert!(!tracker.observe(&quiet));
        assert!(!tracker.observe(&quiet));
        assert!(tracker.observe(&quiet));
        assert!(tracker.is_stable());
    }
}

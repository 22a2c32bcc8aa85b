//! Construction-time tuning: initial bucket count, load-factor threshold and
//! the growth policy applied on automatic rehash.

use crate::error::ConfigError;

pub(crate) const DEFAULT_CAPACITY: usize = 11;
pub(crate) const DEFAULT_MAX_LOAD: f64 = 1.0;

/// How the bucket count grows when an insert pushes the load factor over the
/// threshold.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Growth {
    /// `2c + 1`. Keeps capacities odd after the first growth.
    #[default]
    DoublePlusOne,
    /// `2c`.
    Double,
}

impl Growth {
    /// Next capacity after `current`; strictly larger unless saturated.
    #[inline]
    pub fn next(self, current: usize) -> usize {
        let grown = match self {
            Growth::DoublePlusOne => current.saturating_mul(2).saturating_add(1),
            Growth::Double => current.saturating_mul(2),
        };
        grown.max(current.saturating_add(1))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub initial_capacity: usize,
    pub max_load_factor: f64,
    pub growth: Growth,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD,
            growth: Growth::default(),
        }
    }
}

impl MapConfig {
    /// Smallest accepted `max_load_factor`. Below it a single entry would
    /// already demand more than a million buckets.
    pub const MIN_MAX_LOAD_FACTOR: f64 = 1e-6;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn max_load_factor(mut self, load: f64) -> Self {
        self.max_load_factor = load;
        self
    }

    pub fn growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor < Self::MIN_MAX_LOAD_FACTOR {
            return Err(ConfigError::InvalidLoadFactor(self.max_load_factor));
        }
        Ok(())
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LifeError;
use crate::grid::Grid;

/// Startup configuration for a simulation session.
///
/// Every field has a default, so a config file only needs the values it
/// wants to change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid height in cells.
    pub rows: u32,
    /// Grid width in cells.
    pub cols: u32,
    /// Delay between scheduled steps, in milliseconds.
    pub step_delay_ms: u64,
    /// Probability in `[0.0, 1.0]` that a randomized cell starts alive.
    pub alive_probability: f64,
    /// Whether audio collaborators should voice completed steps.
    pub sound_enabled: bool,
    /// Seed for the session's random number generator.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            step_delay_ms: 500,
            alive_probability: 0.5,
            sound_enabled: true,
            seed: 42,
        }
    }
}

impl SimConfig {
    /// Checks dimensions and probability without building anything.
    pub fn validate(&self) -> Result<(), LifeError> {
        Grid::validate_dims(self.rows, self.cols)?;
        if !(0.0..=1.0).contains(&self.alive_probability) {
            return Err(LifeError::InvalidProbability {
                value: self.alive_probability,
            });
        }
        Ok(())
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

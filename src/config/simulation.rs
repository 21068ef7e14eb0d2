use super::traits::{ensure, ConfigSection};
use crate::error::EvacError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Simulation settings for ground-truth evaluation, plus the location of the
/// surrogate that stands in for the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds of simulated time before an evacuation is cut off
    pub time_limit: f64,
    pub time_per_tick: f64,
    pub num_pedestrians: usize,
    pub surrogate_model: PathBuf,
    /// Granularity of exit locations, in perimeter units
    pub exit_precision: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_limit: 600.0,
            time_per_tick: 0.4,
            num_pedestrians: 100,
            surrogate_model: PathBuf::from("surrogate-model.json"),
            exit_precision: 0.1,
        }
    }
}

impl ConfigSection for SimulationConfig {
    fn section_name() -> &'static str {
        "simulation"
    }

    fn validate(&self) -> Result<(), EvacError> {
        let s = Self::section_name();
        ensure(self.time_limit > 0.0, s, "Time limit must be positive")?;
        ensure(self.time_per_tick > 0.0, s, "Time per tick must be positive")?;
        ensure(
            self.exit_precision > 0.0 && self.exit_precision.is_finite(),
            s,
            "Exit precision must be a positive number",
        )?;
        Ok(())
    }
}

//! Rectangular evacuation environment and the exit-placement problem on its
//! perimeter.

pub mod decoder;

pub use decoder::{Access, Edge, ExitDecoder};

use crate::config::{traits::ensure, ConfigSection, SimulationConfig};
use crate::error::EvacError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Room whose walls host the exits.
///
/// The perimeter is measured counter-clockwise from the origin corner:
/// bottom wall, right wall, top wall, left wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// Width of a single exit, in the same unit as the walls
    pub exit_width: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            width: 20.0,
            height: 10.0,
            exit_width: 1.0,
        }
    }
}

impl Environment {
    pub fn perimeter_length(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    /// Edge lengths in perimeter order
    pub fn edge_lengths(&self) -> [f64; 4] {
        [self.width, self.height, self.width, self.height]
    }
}

impl ConfigSection for Environment {
    fn section_name() -> &'static str {
        "environment"
    }

    fn validate(&self) -> Result<(), EvacError> {
        let s = Self::section_name();
        ensure(
            self.width > 0.0 && self.width.is_finite(),
            s,
            "Width must be a positive number",
        )?;
        ensure(
            self.height > 0.0 && self.height.is_finite(),
            s,
            "Height must be a positive number",
        )?;
        ensure(self.exit_width > 0.0, s, "Exit width must be positive")?;
        ensure(
            self.exit_width <= self.perimeter_length(),
            s,
            "Exit width cannot exceed the perimeter length",
        )?;
        Ok(())
    }
}

/// Placement of a fixed number of exits on an environment's perimeter.
#[derive(Debug, Clone)]
pub struct ExitEvacuationProblem {
    environment: Environment,
    num_exits: usize,
    simulation: SimulationConfig,
}

impl ExitEvacuationProblem {
    pub fn new(
        environment: Environment,
        num_exits: usize,
        simulation: SimulationConfig,
    ) -> Result<Self, EvacError> {
        environment.validate()?;
        simulation.validate()?;
        if num_exits == 0 {
            return Err(EvacError::Configuration(
                "Number of exits must be at least 1".to_string(),
            ));
        }
        let total_width = num_exits as f64 * environment.exit_width;
        if total_width > environment.perimeter_length() {
            log::warn!(
                "{} exits of width {} cannot fit on a perimeter of {} without overlapping",
                num_exits,
                environment.exit_width,
                environment.perimeter_length()
            );
        }
        Ok(Self {
            environment,
            num_exits,
            simulation,
        })
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn num_exits(&self) -> usize {
        self.num_exits
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    pub fn perimeter_length(&self) -> f64 {
        self.environment.perimeter_length()
    }

    /// Step used to round exit locations
    pub fn exit_precision(&self) -> f64 {
        self.simulation.exit_precision
    }
}

impl fmt::Display for ExitEvacuationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExitEvacuationProblem(environment: {} [{}x{}], exits: {} of width {}, perimeter: {}, precision: {})",
            self.environment.name,
            self.environment.width,
            self.environment.height,
            self.num_exits,
            self.environment.exit_width,
            self.perimeter_length(),
            self.exit_precision(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perimeter_length() {
        let env = Environment {
            name: "box".to_string(),
            width: 3.0,
            height: 2.0,
            exit_width: 1.0,
        };
        assert_eq!(env.perimeter_length(), 10.0);
    }

    #[test]
    fn test_rejects_degenerate_environment() {
        let env = Environment {
            width: 0.0,
            ..Environment::default()
        };
        assert!(env.validate().is_err());

        let env = Environment {
            exit_width: 1000.0,
            ..Environment::default()
        };
        assert!(env.validate().is_err());
    }

    #[test]
    fn test_problem_requires_exits() {
        let result = ExitEvacuationProblem::new(Environment::default(), 0, SimulationConfig::default());
        assert!(matches!(result, Err(EvacError::Configuration(_))));
    }
}

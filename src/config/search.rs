use super::traits::{ensure, ConfigSection};
use crate::error::EvacError;
use serde::{Deserialize, Serialize};

/// Parameters of the experiment and of the genetic search each run uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub num_runs: usize,
    /// Seed of the first run; run `i` uses `seed + i`
    pub seed: u64,
    pub population_size: usize,
    pub num_generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Half-width of the uniform offset applied to a mutated gene
    pub mutation_spread: f64,
    pub tournament_size: usize,
    pub elitism_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_runs: 30,
            seed: 1,
            population_size: 100,
            num_generations: 100,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            mutation_spread: 0.05,
            tournament_size: 2,
            elitism_count: 1,
        }
    }
}

impl SearchConfig {
    /// Seed of the zero-based run `run`.
    pub fn run_seed(&self, run: usize) -> u64 {
        self.seed.wrapping_add(run as u64)
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), EvacError> {
        let s = Self::section_name();
        ensure(self.num_runs >= 1, s, "At least one run is required")?;
        ensure(self.population_size >= 2, s, "Population size must be at least 2")?;
        ensure(self.num_generations >= 1, s, "At least one generation is required")?;
        ensure(
            (0.0..=1.0).contains(&self.crossover_rate),
            s,
            "Crossover rate must be between 0 and 1",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.mutation_rate),
            s,
            "Mutation rate must be between 0 and 1",
        )?;
        ensure(
            self.mutation_spread > 0.0 && self.mutation_spread <= 1.0,
            s,
            "Mutation spread must be in (0, 1]",
        )?;
        ensure(self.tournament_size >= 1, s, "Tournament size must be at least 1")?;
        ensure(
            self.elitism_count < self.population_size,
            s,
            "Elitism count must be smaller than the population size",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        let config = SearchConfig {
            mutation_rate: 1.5,
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(EvacError::Configuration(_))));

        let config = SearchConfig {
            crossover_rate: -0.1,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_elitism_filling_population() {
        let config = SearchConfig {
            population_size: 4,
            elitism_count: 4,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_run_seeds_are_consecutive() {
        let config = SearchConfig {
            seed: 42,
            ..SearchConfig::default()
        };
        assert_eq!(config.run_seed(0), 42);
        assert_eq!(config.run_seed(3), 45);
    }
}

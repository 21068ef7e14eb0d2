use serde::{Deserialize, Serialize};

/// Candidate exit placement: one normalized perimeter position per exit.
pub type Genome = Vec<f64>;

/// Scalar evacuation cost. Lower is better.
pub type FitnessValue = f64;

/// Direction in which the search should push fitness values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationSense {
    Minimization,
    Maximization,
}

impl OptimizationSense {
    /// True when `a` is strictly better than `b` under this sense.
    pub fn is_better(self, a: FitnessValue, b: FitnessValue) -> bool {
        match self {
            OptimizationSense::Minimization => a < b,
            OptimizationSense::Maximization => a > b,
        }
    }

    /// Ordering that sorts the best fitness first.
    pub fn best_first(self, a: FitnessValue, b: FitnessValue) -> std::cmp::Ordering {
        match self {
            OptimizationSense::Minimization => a.total_cmp(&b),
            OptimizationSense::Maximization => b.total_cmp(&a),
        }
    }
}

/// One generation of a run: the evaluated population and its fitnesses,
/// index-aligned.
///
/// Field names are part of the persisted trace format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationTrace {
    pub genome: Vec<Genome>,
    pub fitness: Vec<FitnessValue>,
}

impl GenerationTrace {
    pub fn len(&self) -> usize {
        self.genome.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genome.is_empty()
    }
}

/// Complete trace of one seeded run.
///
/// Serialized as `{"seed", "time", "rundata"}` in that order; downstream
/// training tooling reads the fields positionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub seed: u64,
    /// Wall time of the run in seconds
    pub time: f64,
    #[serde(rename = "rundata")]
    pub generations: Vec<GenerationTrace>,
}

impl RunRecord {
    /// Total number of evaluated individuals across all generations
    pub fn evaluations(&self) -> usize {
        self.generations.iter().map(GenerationTrace::len).sum()
    }

    /// Fitness values of every generation, flattened in evaluation order
    pub fn fitness_sequence(&self) -> impl Iterator<Item = FitnessValue> + '_ {
        self.generations.iter().flat_map(|g| g.fitness.iter().copied())
    }

    /// Best (genome, fitness) seen in the run under the given sense
    pub fn best(&self, sense: OptimizationSense) -> Option<(&Genome, FitnessValue)> {
        self.generations
            .iter()
            .flat_map(|g| g.genome.iter().zip(g.fitness.iter().copied()))
            .min_by(|a, b| sense.best_first(a.1, b.1))
    }
}

/// All runs of an experiment, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentResult {
    pub runs: Vec<RunRecord>,
}

impl ExperimentResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, run: RunRecord) {
        self.runs.push(run);
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run() -> RunRecord {
        RunRecord {
            seed: 7,
            time: 0.5,
            generations: vec![
                GenerationTrace {
                    genome: vec![vec![0.1, 0.2], vec![0.3, 0.4]],
                    fitness: vec![5.0, 3.0],
                },
                GenerationTrace {
                    genome: vec![vec![0.5, 0.6], vec![0.7, 0.8]],
                    fitness: vec![4.0, 6.0],
                },
            ],
        }
    }

    #[test]
    fn test_run_record_field_order() {
        let json = serde_json::to_string(&sample_run()).unwrap();
        assert!(json.starts_with(r#"{"seed":7,"time":0.5,"rundata":[{"genome":[[0.1,0.2]"#));
    }

    #[test]
    fn test_best_respects_sense() {
        let run = sample_run();
        let (genome, fitness) = run.best(OptimizationSense::Minimization).unwrap();
        assert_eq!(fitness, 3.0);
        assert_eq!(genome, &vec![0.3, 0.4]);

        let (_, fitness) = run.best(OptimizationSense::Maximization).unwrap();
        assert_eq!(fitness, 6.0);
    }

    #[test]
    fn test_experiment_result_is_a_bare_array() {
        let mut result = ExperimentResult::new();
        result.push(sample_run());
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(result.runs[0].evaluations(), 4);
    }
}

use super::canonical::{canonicalize, round_location};
use crate::data::FitnessCache;
use crate::environment::{Access, ExitDecoder, ExitEvacuationProblem};
use crate::error::{EvacError, Result};
use crate::ml::models::{SortedFeatures, SurrogateModel};
use crate::types::{FitnessValue, OptimizationSense};
use std::sync::Arc;

/// What a search needs from the problem it optimizes.
pub trait ObjectiveFunction {
    /// Lifecycle hook called once before the first evaluation of every run.
    fn new_run(&mut self);

    fn evaluate(&mut self, genome: &[f64]) -> Result<FitnessValue>;

    fn optimization_sense(&self) -> OptimizationSense;

    /// Number of genes a genome must have
    fn genome_length(&self) -> usize;
}

/// Counters for the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationStats {
    pub evaluations: usize,
    pub cache_hits: usize,
    pub surrogate_calls: usize,
    pub distinct_placements: usize,
}

/// Locations of a fixed number of exits on the perimeter, scored by the
/// surrogate model through a per-run cache.
pub struct PerimetralExitObjective {
    problem: ExitEvacuationProblem,
    decoder: ExitDecoder,
    model: Arc<dyn SurrogateModel>,
    cache: FitnessCache,
}

impl PerimetralExitObjective {
    pub fn new(problem: ExitEvacuationProblem, model: Arc<dyn SurrogateModel>) -> Result<Self> {
        if model.input_dim() != problem.num_exits() {
            return Err(EvacError::ModelLoad(format!(
                "Surrogate takes {} inputs but the problem has {} exits",
                model.input_dim(),
                problem.num_exits()
            )));
        }
        let decoder = ExitDecoder::new(&problem);
        Ok(Self {
            problem,
            decoder,
            model,
            cache: FitnessCache::new(),
        })
    }

    pub fn stats(&self) -> EvaluationStats {
        EvaluationStats {
            evaluations: self.cache.hits() + self.cache.misses(),
            cache_hits: self.cache.hits(),
            surrogate_calls: self.cache.misses(),
            distinct_placements: self.cache.len(),
        }
    }

    /// Physical accesses encoded by a genome, using the rounded location of
    /// every gene. Access ids run consecutively across exits.
    pub fn decode(&self, genome: &[f64]) -> Vec<Access> {
        let perimeter = self.problem.perimeter_length();
        let step = self.problem.exit_precision();
        let mut exits = Vec::with_capacity(genome.len());
        for (exit, &gene) in genome.iter().enumerate() {
            let location = round_location(gene, perimeter, step);
            let accesses = self.decoder.decode_access(location, exit, exits.len());
            exits.extend(accesses);
        }
        exits
    }
}

impl ObjectiveFunction for PerimetralExitObjective {
    fn new_run(&mut self) {
        self.cache.reset();
    }

    fn evaluate(&mut self, genome: &[f64]) -> Result<FitnessValue> {
        if genome.len() != self.problem.num_exits() {
            return Err(EvacError::Evaluation(format!(
                "Genome has {} genes, expected {}",
                genome.len(),
                self.problem.num_exits()
            )));
        }

        let key = canonicalize(
            genome,
            self.problem.perimeter_length(),
            self.problem.exit_precision(),
        )?;

        if let Some(value) = self.cache.lookup(&key) {
            return Ok(value);
        }

        // Key is rounded and deduplicated; the features are not.
        let features = SortedFeatures::from_genome(genome);
        let value = self.model.predict(&features)?;
        self.cache.store(key, value);
        Ok(value)
    }

    fn optimization_sense(&self) -> OptimizationSense {
        OptimizationSense::Minimization
    }

    fn genome_length(&self) -> usize {
        self.problem.num_exits()
    }
}

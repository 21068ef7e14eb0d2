// src/engines/metrics/engine.rs
use crate::engines::metrics::CircularSetDiversity;
use crate::error::Result;
use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best: FitnessValue,
    pub mean: FitnessValue,
    pub worst: FitnessValue,
    pub diversity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run: usize,
    pub seed: u64,
    pub time: f64,
    pub evaluations: usize,
    pub best_fitness: Option<FitnessValue>,
    pub best_genome: Option<Genome>,
    pub generations: Vec<GenerationStats>,
}

/// Aggregate view of an experiment, written as the "ea data" artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub optimization_sense: OptimizationSense,
    pub num_runs: usize,
    pub total_time: f64,
    pub best_run: Option<usize>,
    pub best_fitness: Option<FitnessValue>,
    pub mean_best_fitness: Option<FitnessValue>,
    pub runs: Vec<RunSummary>,
}

impl ExperimentSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub struct StatisticsEngine {
    sense: OptimizationSense,
    diversity: CircularSetDiversity,
}

impl StatisticsEngine {
    pub fn new(sense: OptimizationSense, diversity: CircularSetDiversity) -> Self {
        Self { sense, diversity }
    }

    pub fn generation(&self, index: usize, trace: &GenerationTrace) -> GenerationStats {
        let fitness = &trace.fitness;
        let best = fitness
            .iter()
            .copied()
            .min_by(|a, b| self.sense.best_first(*a, *b))
            .unwrap_or(f64::NAN);
        let worst = fitness
            .iter()
            .copied()
            .max_by(|a, b| self.sense.best_first(*a, *b))
            .unwrap_or(f64::NAN);
        let mean = if fitness.is_empty() {
            f64::NAN
        } else {
            fitness.iter().sum::<f64>() / fitness.len() as f64
        };

        GenerationStats {
            generation: index,
            best,
            mean,
            worst,
            diversity: self.diversity.population(&trace.genome),
        }
    }

    pub fn run(&self, index: usize, record: &RunRecord) -> RunSummary {
        let best = record.best(self.sense);
        RunSummary {
            run: index,
            seed: record.seed,
            time: record.time,
            evaluations: record.evaluations(),
            best_fitness: best.map(|(_, f)| f),
            best_genome: best.map(|(g, _)| g.clone()),
            generations: record
                .generations
                .iter()
                .enumerate()
                .map(|(i, g)| self.generation(i, g))
                .collect(),
        }
    }

    pub fn calculate_all(
        &self,
        result: &ExperimentResult,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> ExperimentSummary {
        let runs: Vec<RunSummary> = result
            .runs
            .iter()
            .enumerate()
            .map(|(i, r)| self.run(i, r))
            .collect();

        let bests: Vec<(usize, FitnessValue)> = runs
            .iter()
            .filter_map(|r| r.best_fitness.map(|f| (r.run, f)))
            .collect();
        let best = bests
            .iter()
            .copied()
            .min_by(|a, b| self.sense.best_first(a.1, b.1));
        let mean_best_fitness = if bests.is_empty() {
            None
        } else {
            Some(bests.iter().map(|(_, f)| f).sum::<f64>() / bests.len() as f64)
        };

        ExperimentSummary {
            started_at,
            finished_at,
            optimization_sense: self.sense,
            num_runs: runs.len(),
            total_time: result.runs.iter().map(|r| r.time).sum(),
            best_run: best.map(|(run, _)| run),
            best_fitness: best.map(|(_, f)| f),
            mean_best_fitness,
            runs,
        }
    }
}

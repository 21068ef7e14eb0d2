//! Persisted run traces ("training data").
//!
//! The file is a JSON array with one object per run:
//!
//! ```text
//! [ { "seed": 42, "time": 1.5,
//!     "rundata": [ { "genome": [[0.1, 0.7], ...], "fitness": [12.3, ...] }, ... ] } ]
//! ```
//!
//! `rundata` holds one entry per generation. Surrogate training tooling
//! parses these fields positionally, so names, nesting and order are fixed.

use crate::error::{EvacError, Result};
use crate::types::ExperimentResult;
use std::path::Path;

pub fn training_data_json(result: &ExperimentResult) -> Result<String> {
    Ok(serde_json::to_string(result)?)
}

pub fn parse_training_data(json: &str) -> Result<ExperimentResult> {
    let result: ExperimentResult =
        serde_json::from_str(json).map_err(|e| EvacError::Trace(e.to_string()))?;
    validate(&result)?;
    Ok(result)
}

pub fn read_training_data<P: AsRef<Path>>(path: P) -> Result<ExperimentResult> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    parse_training_data(&contents)
        .map_err(|e| EvacError::Trace(format!("{}: {}", path.display(), e)))
}

/// Number of genes per genome, taken from the first genome in the trace
pub fn genome_length(result: &ExperimentResult) -> Option<usize> {
    result
        .runs
        .iter()
        .flat_map(|r| r.generations.iter())
        .flat_map(|g| g.genome.iter())
        .map(Vec::len)
        .next()
}

/// Check the invariants serde cannot: aligned genome/fitness lists and a
/// single genome length across the whole trace.
pub fn validate(result: &ExperimentResult) -> Result<()> {
    let expected = genome_length(result);

    for (run_idx, run) in result.runs.iter().enumerate() {
        for (gen_idx, generation) in run.generations.iter().enumerate() {
            if generation.genome.len() != generation.fitness.len() {
                return Err(EvacError::Trace(format!(
                    "Run {} generation {}: {} genomes but {} fitness values",
                    run_idx,
                    gen_idx,
                    generation.genome.len(),
                    generation.fitness.len()
                )));
            }
            if let Some(genome) = generation.genome.iter().find(|g| Some(g.len()) != expected) {
                return Err(EvacError::Trace(format!(
                    "Run {} generation {}: genome of length {}, expected {}",
                    run_idx,
                    gen_idx,
                    genome.len(),
                    expected.unwrap_or(0)
                )));
            }
        }
    }

    Ok(())
}

use crate::data::export;
use crate::error::{EvacError, Result};
use crate::types::ExperimentResult;
use polars::prelude::*;
use std::path::Path;

/// Flat tabular view of run traces: one row per evaluated individual.
pub struct CsvConnector;

impl CsvConnector {
    /// Flatten a trace into columns `genome_0..genome_{n-1}, fitness, seed,
    /// run, time`, where `run` is the position of the run in the trace.
    pub fn trace_to_frame(result: &ExperimentResult) -> Result<DataFrame> {
        export::validate(result)?;
        let num_exits = export::genome_length(result)
            .ok_or_else(|| EvacError::Trace("Trace contains no genomes".to_string()))?;

        let rows = result.runs.iter().map(|r| r.evaluations()).sum();
        let mut genes: Vec<Vec<f64>> = vec![Vec::with_capacity(rows); num_exits];
        let mut fitness = Vec::with_capacity(rows);
        let mut seeds = Vec::with_capacity(rows);
        let mut runs = Vec::with_capacity(rows);
        let mut times = Vec::with_capacity(rows);

        for (run_idx, run) in result.runs.iter().enumerate() {
            for generation in &run.generations {
                for (genome, value) in generation.genome.iter().zip(&generation.fitness) {
                    for (column, gene) in genes.iter_mut().zip(genome) {
                        column.push(*gene);
                    }
                    fitness.push(*value);
                    seeds.push(run.seed);
                    runs.push(run_idx as u32);
                    times.push(run.time);
                }
            }
        }

        let mut columns: Vec<Column> = genes
            .into_iter()
            .enumerate()
            .map(|(i, values)| Column::new(format!("genome_{}", i).into(), values))
            .collect();
        columns.push(Column::new("fitness".into(), fitness));
        columns.push(Column::new("seed".into(), seeds));
        columns.push(Column::new("run".into(), runs));
        columns.push(Column::new("time".into(), times));

        Ok(DataFrame::new(columns)?)
    }

    /// Write a frame as CSV with a header row
    pub fn write<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<()> {
        let mut file = std::fs::File::create(path.as_ref())?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)?;
        Ok(())
    }

    /// Load a CSV file into a DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenerationTrace, RunRecord};

    fn result() -> ExperimentResult {
        let generation = |offset: f64| GenerationTrace {
            genome: vec![vec![0.1 + offset, 0.2], vec![0.3 + offset, 0.4]],
            fitness: vec![1.0 + offset, 2.0 + offset],
        };
        ExperimentResult {
            runs: vec![
                RunRecord {
                    seed: 100,
                    time: 1.5,
                    generations: vec![generation(0.0), generation(0.5)],
                },
                RunRecord {
                    seed: 205,
                    time: 2.5,
                    generations: vec![generation(0.25)],
                },
            ],
        }
    }

    #[test]
    fn test_trace_to_frame_layout() {
        let df = CsvConnector::trace_to_frame(&result()).unwrap();
        let cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(cols, vec!["genome_0", "genome_1", "fitness", "seed", "run", "time"]);
        assert_eq!(df.height(), 6);

        let runs = df.column("run").unwrap().u32().unwrap();
        assert_eq!(runs.get(0), Some(0));
        assert_eq!(runs.get(5), Some(1));

        // The run index is positional, not derived from the seed.
        let seeds = df.column("seed").unwrap().u64().unwrap();
        assert_eq!(seeds.get(5), Some(205));

        let fitness = df.column("fitness").unwrap().f64().unwrap();
        assert_eq!(fitness.get(3), Some(2.5));
    }

    #[test]
    fn test_write_includes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        let mut df = CsvConnector::trace_to_frame(&result()).unwrap();
        CsvConnector::write(&mut df, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("genome_0,genome_1,fitness,seed,run,time"));
        assert_eq!(lines.count(), 6);

        let loaded = CsvConnector::load(&path).unwrap();
        assert_eq!(loaded.height(), 6);
        assert_eq!(loaded.width(), 6);
    }

    #[test]
    fn test_empty_trace_is_rejected() {
        assert!(matches!(
            CsvConnector::trace_to_frame(&ExperimentResult::new()),
            Err(EvacError::Trace(_))
        ));
    }
}

use crate::config::{ExperimentConfig, ExperimentPaths, SearchConfig};
use crate::data::export;
use crate::engines::evaluation::{ObjectiveFunction, PerimetralExitObjective};
use crate::engines::generation::{
    ConsoleProgressCallback, EvolutionConfig, EvolutionEngine, SearchStrategy,
};
use crate::engines::metrics::{CircularSetDiversity, StatisticsEngine};
use crate::environment::ExitEvacuationProblem;
use crate::error::{EvacError, Result};
use crate::ml::models::{MlpSurrogate, SurrogateModel};
use crate::types::{ExperimentResult, RunRecord};
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    NotStarted,
    /// Executing the zero-based run
    Running(usize),
    Finished,
    Aborted,
}

/// Executes a configured number of seeded runs against one objective and
/// persists their traces once all of them have completed.
pub struct ExperimentDriver<S: SearchStrategy> {
    search_config: SearchConfig,
    objective: PerimetralExitObjective,
    search: S,
    paths: ExperimentPaths,
    state: DriverState,
}

impl ExperimentDriver<EvolutionEngine<ConsoleProgressCallback>> {
    /// Build the standard driver: load the surrogate once, set up the
    /// problem and a genetic search reporting through the log.
    pub fn from_config(config: ExperimentConfig, paths: ExperimentPaths) -> Result<Self> {
        config.validate()?;
        let model: Arc<dyn SurrogateModel> =
            Arc::new(MlpSurrogate::load(&config.simulation.surrogate_model, config.num_exits)?);

        let problem = ExitEvacuationProblem::new(config.environment, config.num_exits, config.simulation)?;
        log::info!("{}", problem);

        let objective = PerimetralExitObjective::new(problem, model)?;
        let engine = EvolutionEngine::new(EvolutionConfig::from(&config.search), ConsoleProgressCallback);
        Ok(Self::new(config.search, objective, engine, paths))
    }
}

impl<S: SearchStrategy> ExperimentDriver<S> {
    pub fn new(
        search_config: SearchConfig,
        objective: PerimetralExitObjective,
        search: S,
        paths: ExperimentPaths,
    ) -> Self {
        Self {
            search_config,
            objective,
            search,
            paths,
            state: DriverState::NotStarted,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Run every configured run, then write the training trace and the
    /// statistics summary. Any error leaves the driver `Aborted` and writes
    /// nothing.
    pub fn run(&mut self) -> Result<ExperimentResult> {
        if self.state != DriverState::NotStarted {
            return Err(EvacError::Configuration(format!(
                "Experiment cannot be started from state {:?}",
                self.state
            )));
        }

        match self.execute() {
            Ok(result) => {
                self.state = DriverState::Finished;
                Ok(result)
            }
            Err(e) => {
                log::error!("Experiment aborted: {}", e);
                self.state = DriverState::Aborted;
                Err(e)
            }
        }
    }

    fn execute(&mut self) -> Result<ExperimentResult> {
        let started_at = Utc::now();
        let mut result = ExperimentResult::new();

        for i in 0..self.search_config.num_runs {
            self.state = DriverState::Running(i);
            let record = self.run_once(i)?;
            result.push(record);
        }

        let statistics = StatisticsEngine::new(
            self.objective.optimization_sense(),
            CircularSetDiversity::default(),
        );
        let summary = statistics.calculate_all(&result, started_at, Utc::now());

        // Serialize both artifacts before touching the filesystem.
        let training_data = export::training_data_json(&result)?;
        let ea_data = summary.to_json()?;
        self.write_outputs(&training_data, &ea_data)?;

        log::info!(
            "Experiment finished: {} runs, traces in {}",
            result.len(),
            self.paths.training_data_file.display()
        );
        Ok(result)
    }

    fn run_once(&mut self, run: usize) -> Result<RunRecord> {
        let seed = self.search_config.run_seed(run);
        self.objective.new_run();

        let start = Instant::now();
        let outcome = self.search.search(&mut self.objective, seed)?;
        let time = start.elapsed().as_secs_f64();

        log::info!("Run {}: {:.2}s\t{}", run, time, outcome.best_fitness);
        log::info!("Run {} best placement: {:?}", run, self.objective.decode(&outcome.best_genome));
        let stats = self.objective.stats();
        log::debug!(
            "Run {} cache: {} evaluations, {} hits, {} surrogate calls",
            run,
            stats.evaluations,
            stats.cache_hits,
            stats.surrogate_calls
        );

        Ok(RunRecord {
            seed,
            time,
            generations: outcome.generations,
        })
    }

    fn write_outputs(&self, training_data: &str, ea_data: &str) -> Result<()> {
        write_file(&self.paths.training_data_file, training_data)?;
        if let Err(e) = write_file(&self.paths.ea_data_file, ea_data) {
            // Leave no partial output behind.
            let _ = fs::remove_file(&self.paths.training_data_file);
            return Err(e);
        }
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

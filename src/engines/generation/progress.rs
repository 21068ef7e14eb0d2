use super::evolution_engine::ProgressCallback;
use crate::types::FitnessValue;

/// Reports generation progress through the `log` facade.
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::trace!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: FitnessValue, mean_fitness: FitnessValue) {
        log::debug!(
            "Generation {} complete. Best fitness: {:.4}, mean: {:.4}",
            generation + 1,
            best_fitness,
            mean_fitness
        );
    }
}

/// Ignores every event.
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: FitnessValue, _mean_fitness: FitnessValue) {}
}

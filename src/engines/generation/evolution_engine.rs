use crate::config::SearchConfig;
use crate::engines::evaluation::ObjectiveFunction;
use crate::engines::generation::operators::{crossover, mutate, random_genome, tournament_selection};
use crate::error::Result;
use crate::types::{FitnessValue, GenerationTrace, Genome, OptimizationSense};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub mutation_spread: f64,
    pub crossover_rate: f64,
    pub elitism_count: usize,
    pub tournament_size: usize,
}

impl From<&SearchConfig> for EvolutionConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            population_size: config.population_size,
            generations: config.num_generations,
            mutation_rate: config.mutation_rate,
            mutation_spread: config.mutation_spread,
            crossover_rate: config.crossover_rate,
            elitism_count: config.elitism_count,
            tournament_size: config.tournament_size,
        }
    }
}

/// Everything a single seeded search produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub generations: Vec<GenerationTrace>,
    pub best_genome: Genome,
    pub best_fitness: FitnessValue,
}

/// A search procedure that can be run against any objective with a seed.
pub trait SearchStrategy {
    fn search(&mut self, objective: &mut dyn ObjectiveFunction, seed: u64) -> Result<SearchOutcome>;
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: FitnessValue, mean_fitness: FitnessValue);
}

/// Generational genetic algorithm over real-valued genomes.
pub struct EvolutionEngine<C: ProgressCallback> {
    config: EvolutionConfig,
    callback: C,
}

impl<C: ProgressCallback> EvolutionEngine<C> {
    pub fn new(config: EvolutionConfig, callback: C) -> Self {
        Self { config, callback }
    }

    /// Run the evolution process
    pub fn run(&mut self, objective: &mut dyn ObjectiveFunction, seed: u64) -> Result<SearchOutcome> {
        let mut rng = StdRng::seed_from_u64(seed);
        let sense = objective.optimization_sense();

        // Initialize population
        let mut population: Vec<Genome> = (0..self.config.population_size)
            .map(|_| random_genome(objective.genome_length(), &mut rng))
            .collect();

        let mut trace = Vec::with_capacity(self.config.generations);
        let mut best: Option<(Genome, FitnessValue)> = None;

        // Evolution loop
        for generation in 0..self.config.generations {
            self.callback.on_generation_start(generation);

            let evaluated = evaluate_population(objective, &population)?;

            for (genome, fitness) in &evaluated {
                let improves = best
                    .as_ref()
                    .map_or(true, |(_, current)| sense.is_better(*fitness, *current));
                if improves {
                    best = Some((genome.clone(), *fitness));
                }
            }

            let fitness: Vec<FitnessValue> = evaluated.iter().map(|(_, f)| *f).collect();
            let generation_best = fitness
                .iter()
                .copied()
                .min_by(|a, b| sense.best_first(*a, *b))
                .unwrap_or(f64::NAN);
            let mean = fitness.iter().sum::<f64>() / fitness.len().max(1) as f64;
            self.callback.on_generation_complete(generation, generation_best, mean);

            trace.push(GenerationTrace {
                genome: population,
                fitness,
            });

            // Check termination
            if generation == self.config.generations - 1 {
                break;
            }

            // Create next generation
            population = self.create_next_generation(&evaluated, sense, &mut rng);
        }

        let (best_genome, best_fitness) = best.unwrap_or_else(|| (Vec::new(), f64::NAN));
        Ok(SearchOutcome {
            generations: trace,
            best_genome,
            best_fitness,
        })
    }

    fn create_next_generation(
        &self,
        evaluated: &[(Genome, FitnessValue)],
        sense: OptimizationSense,
        rng: &mut StdRng,
    ) -> Vec<Genome> {
        let size = self.config.population_size;
        let mut next_generation = Vec::with_capacity(size);

        // Elitism: copy top performers
        let mut sorted: Vec<&(Genome, FitnessValue)> = evaluated.iter().collect();
        sorted.sort_by(|a, b| sense.best_first(a.1, b.1));
        for (genome, _) in sorted.iter().take(self.config.elitism_count) {
            next_generation.push(genome.clone());
        }

        // Generate offspring
        while next_generation.len() < size {
            if rng.gen::<f64>() < self.config.crossover_rate {
                let parent1 = tournament_selection(evaluated, self.config.tournament_size, sense, rng);
                let parent2 = tournament_selection(evaluated, self.config.tournament_size, sense, rng);

                let (mut child1, mut child2) = crossover(&parent1, &parent2, rng);

                mutate(&mut child1, self.config.mutation_rate, self.config.mutation_spread, rng);
                mutate(&mut child2, self.config.mutation_rate, self.config.mutation_spread, rng);

                next_generation.push(child1);
                if next_generation.len() < size {
                    next_generation.push(child2);
                }
            } else {
                // Reproduction (copy)
                let mut child = tournament_selection(evaluated, self.config.tournament_size, sense, rng);
                mutate(&mut child, self.config.mutation_rate, self.config.mutation_spread, rng);
                next_generation.push(child);
            }
        }

        next_generation
    }
}

impl<C: ProgressCallback> SearchStrategy for EvolutionEngine<C> {
    fn search(&mut self, objective: &mut dyn ObjectiveFunction, seed: u64) -> Result<SearchOutcome> {
        self.run(objective, seed)
    }
}

fn evaluate_population(
    objective: &mut dyn ObjectiveFunction,
    population: &[Genome],
) -> Result<Vec<(Genome, FitnessValue)>> {
    population
        .iter()
        .map(|genome| Ok((genome.clone(), objective.evaluate(genome)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::progress::SilentProgress;
    use crate::error::EvacError;

    /// Distance of the sorted genome to a fixed target placement.
    struct TargetObjective {
        target: Vec<f64>,
        calls: usize,
        fail_after: Option<usize>,
    }

    impl ObjectiveFunction for TargetObjective {
        fn new_run(&mut self) {}

        fn evaluate(&mut self, genome: &[f64]) -> Result<FitnessValue> {
            self.calls += 1;
            if self.fail_after.is_some_and(|n| self.calls > n) {
                return Err(EvacError::Evaluation("boom".to_string()));
            }
            let mut sorted = genome.to_vec();
            sorted.sort_by(f64::total_cmp);
            Ok(sorted.iter().zip(&self.target).map(|(g, t)| (g - t).abs()).sum())
        }

        fn optimization_sense(&self) -> OptimizationSense {
            OptimizationSense::Minimization
        }

        fn genome_length(&self) -> usize {
            self.target.len()
        }
    }

    fn config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 20,
            generations: 15,
            mutation_rate: 0.2,
            mutation_spread: 0.1,
            crossover_rate: 0.9,
            elitism_count: 1,
            tournament_size: 2,
        }
    }

    fn objective() -> TargetObjective {
        TargetObjective {
            target: vec![0.25, 0.75],
            calls: 0,
            fail_after: None,
        }
    }

    #[test]
    fn test_trace_shape() {
        let mut engine = EvolutionEngine::new(config(), SilentProgress);
        let mut objective = objective();
        let outcome = engine.run(&mut objective, 42).unwrap();

        assert_eq!(outcome.generations.len(), 15);
        for generation in &outcome.generations {
            assert_eq!(generation.genome.len(), 20);
            assert_eq!(generation.fitness.len(), 20);
            assert!(generation.genome.iter().all(|g| g.len() == 2));
        }
        assert_eq!(objective.calls, 20 * 15);
    }

    #[test]
    fn test_same_seed_same_trace() {
        let a = EvolutionEngine::new(config(), SilentProgress).run(&mut objective(), 7).unwrap();
        let b = EvolutionEngine::new(config(), SilentProgress).run(&mut objective(), 7).unwrap();
        assert_eq!(a.generations, b.generations);

        let c = EvolutionEngine::new(config(), SilentProgress).run(&mut objective(), 8).unwrap();
        assert_ne!(a.generations, c.generations);
    }

    #[test]
    fn test_elitism_never_loses_the_best() {
        let outcome = EvolutionEngine::new(config(), SilentProgress).run(&mut objective(), 3).unwrap();
        let bests: Vec<f64> = outcome
            .generations
            .iter()
            .map(|g| g.fitness.iter().copied().fold(f64::INFINITY, f64::min))
            .collect();
        assert!(bests.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(outcome.best_fitness, *bests.last().unwrap());
    }

    #[test]
    fn test_evaluation_error_aborts_search() {
        let mut objective = TargetObjective {
            fail_after: Some(25),
            ..objective()
        };
        let result = EvolutionEngine::new(config(), SilentProgress).run(&mut objective, 1);
        assert!(matches!(result, Err(EvacError::Evaluation(_))));
    }
}

use crate::types::{FitnessValue, Genome, OptimizationSense};
use rand::Rng;

/// Tournament selection: pick best of K random candidates
pub fn tournament_selection<R: Rng>(
    population: &[(Genome, FitnessValue)],
    tournament_size: usize,
    sense: OptimizationSense,
    rng: &mut R,
) -> Genome {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = population[best_idx].1;

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if sense.is_better(population[idx].1, best_fitness) {
            best_idx = idx;
            best_fitness = population[idx].1;
        }
    }

    population[best_idx].0.clone()
}

/// Single-point crossover: swap genome segments
pub fn crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> (Genome, Genome) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.clone(), parent2.clone());
    }

    let point = rng.gen_range(1..len);

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    child1[point..len].copy_from_slice(&parent2[point..len]);
    child2[point..len].copy_from_slice(&parent1[point..len]);

    (child1, child2)
}

/// Mutation: shift genes by a uniform offset, wrapping around the perimeter
pub fn mutate<R: Rng>(
    genome: &mut Genome,
    mutation_rate: f64,
    spread: f64,
    rng: &mut R,
) {
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *gene = wrap_unit(*gene + rng.gen_range(-spread..=spread));
        }
    }
}

/// Generate random genome with genes uniform in [0, 1)
pub fn random_genome<R: Rng>(length: usize, rng: &mut R) -> Genome {
    (0..length).map(|_| rng.gen::<f64>()).collect()
}

/// Map a position onto the unit circle [0, 1)
fn wrap_unit(x: f64) -> f64 {
    let wrapped = x.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

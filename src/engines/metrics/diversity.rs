// src/engines/metrics/diversity.rs
use crate::types::Genome;

/// Diversity of exit placements treated as sets of points on a circle.
///
/// Genes are positions on the closed perimeter, so 0.02 and 0.98 are close.
/// Two placements are compared gene-to-nearest-gene in both directions,
/// which makes the distance independent of gene order.
#[derive(Debug, Clone, Copy)]
pub struct CircularSetDiversity {
    circumference: f64,
}

impl CircularSetDiversity {
    pub fn new(circumference: f64) -> Self {
        Self { circumference }
    }

    fn point_distance(&self, a: f64, b: f64) -> f64 {
        let d = (a - b).abs() % self.circumference;
        d.min(self.circumference - d)
    }

    /// Mean distance from each gene of `a` to the nearest gene of `b`
    fn directed(&self, a: &[f64], b: &[f64]) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let total: f64 = a
            .iter()
            .map(|&x| {
                b.iter()
                    .map(|&y| self.point_distance(x, y))
                    .fold(f64::INFINITY, f64::min)
            })
            .sum();
        total / a.len() as f64
    }

    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        0.5 * (self.directed(a, b) + self.directed(b, a))
    }

    /// Mean pairwise distance of a population; zero below two individuals.
    pub fn population(&self, genomes: &[Genome]) -> f64 {
        let n = genomes.len();
        if n < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                total += self.distance(&genomes[i], &genomes[j]);
            }
        }
        total / (n * (n - 1) / 2) as f64
    }
}

impl Default for CircularSetDiversity {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_wraps_around() {
        let d = CircularSetDiversity::default();
        assert!(close(d.distance(&[0.05], &[0.95]), 0.1));
    }

    #[test]
    fn test_order_independent() {
        let d = CircularSetDiversity::default();
        assert!(close(d.distance(&[0.1, 0.6], &[0.6, 0.1]), 0.0));
        assert!(close(
            d.distance(&[0.1, 0.5], &[0.2, 0.7]),
            d.distance(&[0.5, 0.1], &[0.7, 0.2])
        ));
    }

    #[test]
    fn test_population_mean() {
        let d = CircularSetDiversity::default();
        let genomes = vec![vec![0.0], vec![0.25], vec![0.5]];
        // pairs: 0.25, 0.5, 0.25
        assert!(close(d.population(&genomes), 1.0 / 3.0));
        assert_eq!(d.population(&genomes[..1]), 0.0);
    }
}

//! Permutation-invariant, quantized cache keys for exit placements.
//!
//! Two genomes that put their exits on the same set of physical locations
//! (after rounding to the configured precision) share a key, whatever the
//! order of their genes. Crossover and mutation produce many such duplicates,
//! which is what makes the fitness cache pay off.

use crate::error::{EvacError, Result};
use std::collections::BTreeSet;

/// Default granularity of exit locations, in perimeter units
pub const DEFAULT_PRECISION_STEP: f64 = 0.1;

/// Set of quantized exit locations.
///
/// Stored as bucket indices `round(gene * perimeter / step)` so the key is
/// exactly hashable and ordered; bucket `b` sits at `b / (1 / step)` along
/// the perimeter. Rounding is half away from zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey {
    buckets: BTreeSet<i64>,
}

impl CanonicalKey {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Quantized locations along the perimeter, ascending
    pub fn locations(&self, precision_step: f64) -> Vec<f64> {
        let factor = 1.0 / precision_step;
        self.buckets.iter().map(|&b| b as f64 / factor).collect()
    }

    /// Normalize the quantized locations back into gene space, so the key
    /// can be fed to [`canonicalize`] again.
    pub fn to_genes(&self, perimeter_length: f64, precision_step: f64) -> Vec<f64> {
        self.locations(precision_step)
            .into_iter()
            .map(|location| location / perimeter_length)
            .collect()
    }
}

/// Round a gene to the precision grid, returning its bucket index.
pub fn quantize(gene: f64, perimeter_length: f64, precision_step: f64) -> i64 {
    (gene * perimeter_length / precision_step).round() as i64
}

/// Rounded location of a gene along the perimeter.
pub fn round_location(gene: f64, perimeter_length: f64, precision_step: f64) -> f64 {
    quantize(gene, perimeter_length, precision_step) as f64 / (1.0 / precision_step)
}

pub fn canonicalize(genome: &[f64], perimeter_length: f64, precision_step: f64) -> Result<CanonicalKey> {
    if !(perimeter_length > 0.0 && perimeter_length.is_finite()) {
        return Err(EvacError::Evaluation(format!(
            "Invalid perimeter length: {}",
            perimeter_length
        )));
    }
    if !(precision_step > 0.0 && precision_step.is_finite()) {
        return Err(EvacError::Evaluation(format!(
            "Invalid precision step: {}",
            precision_step
        )));
    }
    if let Some(gene) = genome.iter().find(|g| !g.is_finite()) {
        return Err(EvacError::Evaluation(format!("Non-finite gene value: {}", gene)));
    }

    let buckets = genome
        .iter()
        .map(|&gene| quantize(gene, perimeter_length, precision_step))
        .collect();

    Ok(CanonicalKey { buckets })
}

//! Sampling Distribution - Validated Probability Mass
//!
//! A normalized probability mass over a candidate set, used by the RAD
//! samplers to draw rows with replacement. The only way to build one is
//! [`SamplingDistribution::from_weights`], which rejects weights that cannot
//! be normalized, so a constructed distribution never carries NaNs.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{Result, SamplerError};
use crate::points::Points;

// =============================================================================
// SamplingDistribution
// =============================================================================

/// Normalized probabilities over `len()` candidates.
///
/// # Invariants
/// - every probability is finite and `>= 0`
/// - probabilities sum to 1 within `1e-9`
#[derive(Debug, Clone)]
pub struct SamplingDistribution {
    probs: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl SamplingDistribution {
    /// Normalizes non-negative weights into a distribution.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(SamplerError::degenerate("no candidates to sample from"));
        }
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(SamplerError::degenerate(format!(
                "weight {i} is {w}; weights must be finite and non-negative"
            )));
        }

        let total: f64 = weights.iter().sum();
        if !total.is_finite() {
            return Err(SamplerError::degenerate("total weight overflows"));
        }
        if total <= 0.0 {
            return Err(SamplerError::degenerate("total weight is zero"));
        }

        let probs: Vec<f64> = weights.into_iter().map(|w| w / total).collect();
        let index = WeightedIndex::new(&probs)
            .map_err(|e| SamplerError::degenerate(e.to_string()))?;
        Ok(Self { probs, index })
    }

    /// Probability of each candidate.
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Always false; an empty distribution cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Draws `n` candidate indices with replacement.
    pub fn sample_indices<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<usize> {
        (0..n).map(|_| self.index.sample(rng)).collect()
    }

    /// Draws `n` rows of `candidates` with replacement.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, candidates: &Points, n: usize) -> Result<Points> {
        if candidates.rows() != self.len() {
            return Err(SamplerError::ShapeMismatch {
                expected: vec![self.len(), candidates.dim()],
                actual: candidates.shape().to_vec(),
            });
        }
        Ok(candidates.select(&self.sample_indices(rng, n)))
    }
}

/// RAD v1 weights: `|r| + floor`.
///
/// Non-finite residuals are rejected whatever the floor; with `floor == 0`
/// an all-zero field has no mass and fails in
/// [`SamplingDistribution::from_weights`].
pub fn residual_weights(residuals: &[f64], floor: f64) -> Result<Vec<f64>> {
    if !floor.is_finite() || floor < 0.0 {
        return Err(SamplerError::config(format!(
            "residual floor must be finite and >= 0, got {floor}"
        )));
    }
    if let Some(i) = residuals.iter().position(|r| !r.is_finite()) {
        return Err(SamplerError::degenerate(format!(
            "residual at grid point {i} is {}",
            residuals[i]
        )));
    }
    Ok(residuals.iter().map(|r| r.abs() + floor).collect())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_normalizes() {
        let dist = SamplingDistribution::from_weights(vec![1.0, 3.0]).unwrap();
        assert_eq!(dist.probs(), &[0.25, 0.75]);
        assert!((dist.probs().iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_degenerate_weights() {
        for weights in [
            vec![],
            vec![0.0, 0.0],
            vec![1.0, -0.5],
            vec![1.0, f64::NAN],
            vec![f64::INFINITY, 1.0],
            vec![f64::MAX, f64::MAX],
        ] {
            let err = SamplingDistribution::from_weights(weights).unwrap_err();
            assert!(matches!(err, SamplerError::DegenerateDistribution(_)));
        }
    }

    #[test]
    fn test_draw_respects_mass() {
        let dist = SamplingDistribution::from_weights(vec![0.0, 1.0, 0.0]).unwrap();
        let grid = Points::column(vec![10.0, 20.0, 30.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let drawn = dist.draw(&mut rng, &grid, 50).unwrap();
        assert_eq!(drawn.rows(), 50);
        assert!(drawn.as_slice().iter().all(|&x| x == 20.0));

        let short = Points::column(vec![1.0]);
        assert!(dist.draw(&mut rng, &short, 5).is_err());
    }

    #[test]
    fn test_residual_weights() {
        let w = residual_weights(&[-2.0, 0.0, 1.0], 0.5).unwrap();
        assert_eq!(w, vec![2.5, 0.5, 1.5]);

        let err = residual_weights(&[1.0, f64::INFINITY], 1e-10).unwrap_err();
        assert!(matches!(err, SamplerError::DegenerateDistribution(_)));
        assert!(residual_weights(&[1.0], -1.0).unwrap_err().is_configuration());
    }
}

//! Model - Physics-Informed Model Interface
//!
//! The [`PinnModel`] trait is everything the training loop and the samplers
//! need from a model: its parameter store, a residual function, the loss
//! breakdown and one optimization step over a lane-stacked batch.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use radpinn_data::{Batch, ModelView, Points, ResidualFn};
use serde::{Deserialize, Serialize};

use crate::config::WeightingConfig;
use crate::params::ParamStore;

// =============================================================================
// LossBreakdown
// =============================================================================

/// Per-term losses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LossBreakdown {
    /// Inner boundary condition loss
    pub inner_bcs: f64,
    /// Outer boundary condition loss
    pub outer_bcs: f64,
    /// Mean squared residual
    pub res: f64,
}

impl LossBreakdown {
    /// Weighted sum of the terms.
    pub fn total(&self, weights: &WeightingConfig) -> f64 {
        weights.inner_bcs * self.inner_bcs + weights.outer_bcs * self.outer_bcs + weights.res * self.res
    }

    /// True if every term is finite.
    pub fn is_finite(&self) -> bool {
        self.inner_bcs.is_finite() && self.outer_bcs.is_finite() && self.res.is_finite()
    }

    /// Mean of several breakdowns.
    pub fn mean(parts: &[LossBreakdown]) -> LossBreakdown {
        if parts.is_empty() {
            return LossBreakdown::default();
        }
        let n = parts.len() as f64;
        LossBreakdown {
            inner_bcs: parts.iter().map(|l| l.inner_bcs).sum::<f64>() / n,
            outer_bcs: parts.iter().map(|l| l.outer_bcs).sum::<f64>() / n,
            res: parts.iter().map(|l| l.res).sum::<f64>() / n,
        }
    }
}

// =============================================================================
// PinnModel Trait
// =============================================================================

/// A physics-informed model trained on collocation batches.
pub trait PinnModel: Send + Sync {
    /// Parameter type shared with samplers through snapshots.
    type Params: Clone + Send + Sync + 'static;

    /// Shared parameter store.
    fn store(&self) -> &ParamStore<Self::Params>;

    /// Pointwise residual of given parameters.
    fn residual_fn(&self) -> ResidualFn<Self::Params>;

    /// Dimension of the model input.
    fn input_dim(&self) -> usize;

    /// Loss terms of `params` with residuals taken at `points`.
    fn losses(&self, params: &Self::Params, points: &Points) -> LossBreakdown;

    /// Model output of `params` at every row of `points`.
    fn predict(&self, params: &Self::Params, points: &Points) -> Vec<f64>;

    /// One optimization step on `batch`. Returns the losses before the update,
    /// averaged over lanes.
    fn step(&mut self, batch: &Batch) -> LossBreakdown;

    /// Read-only view for residual-adaptive samplers.
    fn view(&self) -> ModelView<Self::Params> {
        ModelView::from_parts(self.store().snapshot_fn(), self.residual_fn())
    }
}

/// Relative L2 error `||pred - reference|| / ||reference||`.
pub fn relative_l2_error(pred: &[f64], reference: &[f64]) -> f64 {
    let diff: f64 = pred
        .iter()
        .zip(reference)
        .map(|(p, r)| (p - r).powi(2))
        .sum::<f64>()
        .sqrt();
    let norm: f64 = reference.iter().map(|r| r * r).sum::<f64>().sqrt();
    diff / norm
}

// =============================================================================
// Tests
// =============================================================================

//! RAD Samplers - Residual-Adaptive Distribution Sampling
//!
//! [`RadSampler`] re-evaluates the model residual over a fixed evaluation
//! grid on every batch request and draws rows with probability proportional
//! to `|r| + floor`. [`RadSamplerTwo`] turns caller-supplied residual
//! magnitudes over the previous batch into `y^k / mean(y^k) + c` weights.
//!
//! Samplers never hold the model. They see it through a [`ModelView`]: a
//! parameter snapshot function and a residual function.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::sync::Arc;

use tracing::debug;

use crate::distribution::{residual_weights, SamplingDistribution};
use crate::domain::Domain;
use crate::error::{Result, SamplerError};
use crate::key::RandomKey;
use crate::points::Points;
use crate::sampler::{Sampler, SamplerContext, SamplerState};

/// Default additive floor for RAD v1 weights.
pub const DEFAULT_RAD_FLOOR: f64 = 1e-10;

/// Default number of evaluation grid points.
pub const DEFAULT_GRID_POINTS: usize = 10_000;

// =============================================================================
// ModelView
// =============================================================================

/// Takes a coherent copy of the model parameters.
pub type SnapshotFn<P> = Arc<dyn Fn() -> P + Send + Sync>;

/// Evaluates the pointwise residual of the parameters at every row.
pub type ResidualFn<P> = Arc<dyn Fn(&P, &Points) -> Vec<f64> + Send + Sync>;

/// Read-only view of a model: snapshot plus residual.
pub struct ModelView<P> {
    snapshot: SnapshotFn<P>,
    residual: ResidualFn<P>,
}

impl<P> Clone for ModelView<P> {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            residual: Arc::clone(&self.residual),
        }
    }
}

impl<P> ModelView<P> {
    /// Creates a view from a snapshot function and a residual function.
    pub fn new<S, R>(snapshot: S, residual: R) -> Self
    where
        S: Fn() -> P + Send + Sync + 'static,
        R: Fn(&P, &Points) -> Vec<f64> + Send + Sync + 'static,
    {
        Self {
            snapshot: Arc::new(snapshot),
            residual: Arc::new(residual),
        }
    }

    /// Creates a view from shared functions.
    pub fn from_parts(snapshot: SnapshotFn<P>, residual: ResidualFn<P>) -> Self {
        Self { snapshot, residual }
    }

    /// A fresh parameter snapshot.
    pub fn snapshot(&self) -> P {
        (self.snapshot)()
    }

    /// Residual of `params` at every row of `points`.
    pub fn residual(&self, params: &P, points: &Points) -> Vec<f64> {
        (self.residual)(params, points)
    }

    /// Residual of a fresh snapshot at every row of `points`.
    pub fn evaluate(&self, points: &Points) -> Vec<f64> {
        let params = self.snapshot();
        self.residual(&params, points)
    }
}

// =============================================================================
// RadSampler
// =============================================================================

/// RAD v1: residual-proportional sampling over a fixed evaluation grid.
pub struct RadSampler<P> {
    state: SamplerState,
    grid: Points,
    model: ModelView<P>,
    floor: f64,
    distribution: Option<SamplingDistribution>,
}

impl<P> RadSampler<P> {
    /// Creates a RAD v1 sampler over `grid`.
    pub fn new(grid: Points, model: ModelView<P>, floor: f64, num_lanes: usize) -> Result<Self> {
        if grid.is_empty() {
            return Err(SamplerError::config("RAD evaluation grid is empty"));
        }
        if !floor.is_finite() || floor < 0.0 {
            return Err(SamplerError::config(format!(
                "RAD floor must be finite and >= 0, got {floor}"
            )));
        }
        Ok(Self {
            state: SamplerState::new("rad", num_lanes)?,
            grid,
            model,
            floor,
            distribution: None,
        })
    }

    /// Creates a sampler whose grid is `grid_points` evenly spaced points
    /// spanning a one-dimensional domain.
    pub fn over_domain(
        domain: &Domain,
        grid_points: usize,
        model: ModelView<P>,
        floor: f64,
        num_lanes: usize,
    ) -> Result<Self> {
        Self::new(default_grid(domain, grid_points)?, model, floor, num_lanes)
    }

    /// The additive weight floor.
    pub fn floor(&self) -> f64 {
        self.floor
    }
}

/// `n` evenly spaced points spanning a one-dimensional domain.
pub fn default_grid(domain: &Domain, n: usize) -> Result<Points> {
    if domain.dim() != 1 {
        return Err(SamplerError::config(format!(
            "a default RAD grid needs a one-dimensional domain, got {} dimensions",
            domain.dim()
        )));
    }
    if n == 0 {
        return Err(SamplerError::config("RAD grid needs at least one point"));
    }
    let (lo, hi) = domain.bound(0);
    Ok(Points::linspace(lo, hi, n))
}

impl<P> Sampler for RadSampler<P> {
    fn state(&self) -> &SamplerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SamplerState {
        &mut self.state
    }

    fn dim(&self) -> usize {
        self.grid.dim()
    }

    fn prepare(&mut self) -> Result<()> {
        let params = self.model.snapshot();
        let residuals = self.model.residual(&params, &self.grid);
        if residuals.len() != self.grid.rows() {
            return Err(SamplerError::ShapeMismatch {
                expected: vec![self.grid.rows()],
                actual: vec![residuals.len()],
            });
        }

        let weights = residual_weights(&residuals, self.floor)?;
        let dist = SamplingDistribution::from_weights(weights)?;
        debug!(
            sampler = "rad",
            grid = self.grid.rows(),
            max_prob = dist.probs().iter().copied().fold(0.0, f64::max),
            "recomputed residual distribution"
        );
        self.distribution = Some(dist);
        Ok(())
    }

    fn generate(&self, key: RandomKey, batch_size: usize) -> Result<Points> {
        let dist = self
            .distribution
            .as_ref()
            .ok_or(SamplerError::Uninitialized { sampler: "rad" })?;
        dist.draw(&mut key.into_rng(), &self.grid, batch_size)
    }

    fn evaluation_grid(&self) -> Option<&Points> {
        Some(&self.grid)
    }

    fn distribution(&self) -> Option<&SamplingDistribution> {
        self.distribution.as_ref()
    }

    fn retire(mut self: Box<Self>) -> SamplerContext {
        SamplerContext {
            key: self.state.take_key(),
            grid: Some(self.grid),
        }
    }
}

// =============================================================================
// RadSamplerTwo
// =============================================================================

/// RAD v2 weights: `y^k / mean(y^k) + c`.
///
/// When `mean(y^k) == 0` the ratio term is 0 and every weight is `c`.
pub fn improved_rad_weights(y_hat: &[f64], k: f64, c: f64) -> Result<Vec<f64>> {
    if !c.is_finite() || c < 0.0 {
        return Err(SamplerError::config(format!(
            "RAD v2 offset c must be finite and >= 0, got {c}"
        )));
    }
    if !k.is_finite() {
        return Err(SamplerError::config(format!(
            "RAD v2 exponent k must be finite, got {k}"
        )));
    }
    if let Some(i) = y_hat.iter().position(|y| !y.is_finite() || *y < 0.0) {
        return Err(SamplerError::config(format!(
            "residual magnitude {i} is {}; magnitudes must be finite and >= 0",
            y_hat[i]
        )));
    }
    if y_hat.is_empty() {
        return Err(SamplerError::config("RAD v2 needs at least one magnitude"));
    }

    let powered: Vec<f64> = y_hat.iter().map(|y| y.powf(k)).collect();
    let mean = powered.iter().sum::<f64>() / powered.len() as f64;
    if !mean.is_finite() {
        return Err(SamplerError::degenerate(format!(
            "mean of y^k is {mean} for k = {k}"
        )));
    }
    if mean == 0.0 {
        return Ok(vec![c; powered.len()]);
    }
    Ok(powered.into_iter().map(|p| p / mean + c).collect())
}

/// RAD v2: resample the previous batch weighted by residual magnitude.
pub struct RadSamplerTwo {
    state: SamplerState,
    x: Points,
    distribution: SamplingDistribution,
    k: f64,
    c: f64,
}

impl RadSamplerTwo {
    /// Builds the sampler from the previous batch `x` and the residual
    /// magnitudes `y_hat` at its rows.
    pub fn new(x: Points, y_hat: &[f64], k: f64, c: f64, num_lanes: usize) -> Result<Self> {
        if x.is_empty() {
            return Err(SamplerError::config("RAD v2 needs a non-empty previous batch"));
        }
        if y_hat.len() != x.rows() {
            return Err(SamplerError::config(format!(
                "RAD v2 got {} magnitudes for {} points",
                y_hat.len(),
                x.rows()
            )));
        }
        let weights = improved_rad_weights(y_hat, k, c)?;
        let distribution = SamplingDistribution::from_weights(weights)?;
        Ok(Self {
            state: SamplerState::new("rad2", num_lanes)?,
            x,
            distribution,
            k,
            c,
        })
    }

    /// Exponent applied to residual magnitudes.
    pub fn k(&self) -> f64 {
        self.k
    }

    /// Additive offset.
    pub fn c(&self) -> f64 {
        self.c
    }
}

impl Sampler for RadSamplerTwo {
    fn state(&self) -> &SamplerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SamplerState {
        &mut self.state
    }

    fn dim(&self) -> usize {
        self.x.dim()
    }

    fn generate(&self, key: RandomKey, batch_size: usize) -> Result<Points> {
        self.distribution
            .draw(&mut key.into_rng(), &self.x, batch_size)
    }

    fn evaluation_grid(&self) -> Option<&Points> {
        Some(&self.x)
    }

    fn distribution(&self) -> Option<&SamplingDistribution> {
        Some(&self.distribution)
    }
}

// =============================================================================
// Tests
// =============================================================================

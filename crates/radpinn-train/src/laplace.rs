//! Radial Laplace - Problem, Reference Solution and Surrogate
//!
//! The 1-D radial Laplace equation `r u'' + u' = 0` on `[r0, r1]` with
//! `u(r0) = u0`, `u(r1) = u1`, whose exact solution is
//! `u0 + (u1 - u0) ln(r / r0) / ln(r1 / r0)`.
//!
//! [`RadialLaplace`] is a surrogate linear in its parameters,
//! `u(r) = sum_j theta_j t^j` with `t = ln(r / r0) / L` and `L = ln(r1 / r0)`.
//! Its residual is `sum_j theta_j j (j - 1) t^(j - 2) / (L^2 r)`, so losses
//! and gradients are closed form. Lanes compute residual gradients in
//! parallel and the results are averaged.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::sync::Arc;

use radpinn_data::{Batch, Points, RandomKey, ResidualFn};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use crate::adam::Adam;
use crate::config::{RunConfig, WeightingConfig};
use crate::error::{TrainError, TrainResult};
use crate::model::{LossBreakdown, PinnModel};
use crate::params::ParamStore;

/// Key stream for parameter initialization. Training steps never reach it.
const INIT_STREAM: u64 = u64::MAX - 1;

// =============================================================================
// Reference Solution
// =============================================================================

/// Exact solution of the radial Laplace problem.
pub fn exact_solution(r: f64, r0: f64, r1: f64, u0: f64, u1: f64) -> f64 {
    u0 + (u1 - u0) * (r / r0).ln() / (r1 / r0).ln()
}

/// Reference dataset: `(u_ref, r_star)` on `n_r` evenly spaced radii.
pub fn laplace_dataset(r0: f64, r1: f64, n_r: usize, u0: f64, u1: f64) -> (Vec<f64>, Points) {
    let r_star = Points::linspace(r0, r1, n_r);
    let u_ref = r_star
        .as_slice()
        .iter()
        .map(|&r| exact_solution(r, r0, r1, u0, u1))
        .collect();
    (u_ref, r_star)
}

// =============================================================================
// Log-Radius Basis
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct LogBasis {
    r0: f64,
    log_ratio: f64,
}

impl LogBasis {
    fn t(&self, r: f64) -> f64 {
        (r / self.r0).ln() / self.log_ratio
    }

    /// `t^j` for `j = 0..n`.
    fn values(&self, r: f64, n: usize) -> Vec<f64> {
        let t = self.t(r);
        (0..n).map(|j| t.powi(j as i32)).collect()
    }

    /// Residual of each basis function: `j (j - 1) t^(j - 2) / (L^2 r)`.
    fn residual_features(&self, r: f64, n: usize) -> Vec<f64> {
        let t = self.t(r);
        let scale = self.log_ratio * self.log_ratio * r;
        (0..n)
            .map(|j| {
                if j < 2 {
                    0.0
                } else {
                    (j * (j - 1)) as f64 * t.powi(j as i32 - 2) / scale
                }
            })
            .collect()
    }

    fn value(&self, theta: &[f64], r: f64) -> f64 {
        dot(theta, &self.values(r, theta.len()))
    }

    fn residual(&self, theta: &[f64], r: f64) -> f64 {
        dot(theta, &self.residual_features(r, theta.len()))
    }

    /// Mean squared residual over `points` and its gradient.
    fn residual_loss(&self, theta: &[f64], points: &Points) -> (f64, Vec<f64>) {
        let mut grad = vec![0.0; theta.len()];
        if points.is_empty() {
            return (0.0, grad);
        }
        let mut loss = 0.0;
        for row in points.iter_rows() {
            let phi = self.residual_features(row[0], theta.len());
            let res = dot(theta, &phi);
            loss += res * res;
            for (g, p) in grad.iter_mut().zip(&phi) {
                *g += 2.0 * res * p;
            }
        }
        let n = points.rows() as f64;
        grad.iter_mut().for_each(|g| *g /= n);
        (loss / n, grad)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

// =============================================================================
// RadialLaplace
// =============================================================================

/// Log-polynomial surrogate for the radial Laplace problem.
pub struct RadialLaplace {
    basis: LogBasis,
    r1: f64,
    u0: f64,
    u1: f64,
    weights: WeightingConfig,
    store: ParamStore<Vec<f64>>,
    optimizer: Adam,
}

impl RadialLaplace {
    /// Builds the model with `Normal(0, init_std)` coefficients drawn from
    /// the run seed.
    pub fn new(config: &RunConfig) -> TrainResult<Self> {
        let normal = Normal::new(0.0, config.model.init_std)
            .map_err(|e| TrainError::Config(format!("model.init_std: {e}")))?;
        let mut rng = RandomKey::new(config.training.seed)
            .fold_in(INIT_STREAM)
            .into_rng();
        let theta = (0..=config.model.degree)
            .map(|_| normal.sample(&mut rng))
            .collect();
        Ok(Self::with_params(config, theta))
    }

    /// Builds the model with explicit coefficients.
    pub fn with_params(config: &RunConfig, theta: Vec<f64>) -> Self {
        let p = &config.problem;
        Self {
            basis: LogBasis {
                r0: p.r0,
                log_ratio: (p.r1 / p.r0).ln(),
            },
            r1: p.r1,
            u0: p.u0,
            u1: p.u1,
            weights: config.weighting,
            store: ParamStore::new(theta),
            optimizer: Adam::new(config.training.learning_rate)
                .weight_decay(config.training.weight_decay),
        }
    }

    /// Current coefficients.
    pub fn params(&self) -> Vec<f64> {
        self.store.snapshot()
    }

    /// Optimizer steps taken so far.
    pub fn steps_taken(&self) -> usize {
        self.optimizer.steps()
    }

    fn boundary_errors(&self, theta: &[f64]) -> (f64, f64) {
        (
            self.u0 - self.basis.value(theta, self.basis.r0),
            self.u1 - self.basis.value(theta, self.r1),
        )
    }
}

impl PinnModel for RadialLaplace {
    type Params = Vec<f64>;

    fn store(&self) -> &ParamStore<Vec<f64>> {
        &self.store
    }

    fn residual_fn(&self) -> ResidualFn<Vec<f64>> {
        let basis = self.basis;
        Arc::new(move |theta: &Vec<f64>, points: &Points| {
            points
                .iter_rows()
                .map(|row| basis.residual(theta, row[0]))
                .collect()
        })
    }

    fn input_dim(&self) -> usize {
        1
    }

    fn losses(&self, params: &Vec<f64>, points: &Points) -> LossBreakdown {
        let (e_in, e_out) = self.boundary_errors(params);
        let (res, _) = self.basis.residual_loss(params, points);
        LossBreakdown {
            inner_bcs: e_in * e_in,
            outer_bcs: e_out * e_out,
            res,
        }
    }

    fn predict(&self, params: &Vec<f64>, points: &Points) -> Vec<f64> {
        points
            .iter_rows()
            .map(|row| self.basis.value(params, row[0]))
            .collect()
    }

    fn step(&mut self, batch: &Batch) -> LossBreakdown {
        let theta = self.store.snapshot();
        let n = theta.len();

        let basis = self.basis;
        let per_lane: Vec<(f64, Vec<f64>)> = batch
            .lanes()
            .par_iter()
            .map(|lane| basis.residual_loss(&theta, lane))
            .collect();
        let lanes = per_lane.len() as f64;
        let res = per_lane.iter().map(|(l, _)| l).sum::<f64>() / lanes;
        let mut grad = vec![0.0; n];
        for (_, g) in &per_lane {
            for (acc, v) in grad.iter_mut().zip(g) {
                *acc += v / lanes;
            }
        }

        let (e_in, e_out) = self.boundary_errors(&theta);
        let b_in = self.basis.values(self.basis.r0, n);
        let b_out = self.basis.values(self.r1, n);
        let w = self.weights;
        for j in 0..n {
            grad[j] = w.res * grad[j]
                - 2.0 * w.inner_bcs * e_in * b_in[j]
                - 2.0 * w.outer_bcs * e_out * b_out[j];
        }

        self.store.update(|params| self.optimizer.step(params, &grad));

        LossBreakdown {
            inner_bcs: e_in * e_in,
            outer_bcs: e_out * e_out,
            res,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

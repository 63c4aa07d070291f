//! Trainer - Training Loop and Evaluation
//!
//! `train_and_evaluate` runs `max_steps` optimization steps of the radial
//! Laplace surrogate, pulling every batch from the sampler controller, and
//! returns a [`TrainReport`].
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::path::Path;
use std::time::Instant;

use radpinn_data::SamplerKind;
use serde::Serialize;
use tracing::info;

use crate::config::RunConfig;
use crate::controller::{ControllerSettings, ResampleEvent, SamplerController};
use crate::diagnostics::Diagnostics;
use crate::error::{TrainError, TrainResult};
use crate::laplace::{laplace_dataset, RadialLaplace};
use crate::model::{relative_l2_error, LossBreakdown, PinnModel};

// =============================================================================
// Report
// =============================================================================

/// One periodic evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// Step evaluated
    pub step: usize,
    /// Weighted total loss
    pub loss: f64,
    /// Loss terms
    pub losses: LossBreakdown,
    /// Relative L2 error, if enabled
    pub l2_error: Option<f64>,
    /// Seconds since training started
    pub elapsed_secs: f64,
}

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainReport {
    /// Run name
    pub run_name: String,
    /// Configured sampler kind
    pub sampler: SamplerKind,
    /// Steps taken
    pub steps: usize,
    /// Final loss terms over the reference grid
    pub final_losses: LossBreakdown,
    /// Final weighted loss
    pub final_loss: f64,
    /// Final relative L2 error against the exact solution
    pub l2_error: f64,
    /// Sampler swaps
    pub resample_events: Vec<ResampleEvent>,
    /// Periodic evaluations
    pub history: Vec<LogRecord>,
    /// Final model coefficients
    pub params: Vec<f64>,
    /// Wall-clock training time
    pub elapsed_secs: f64,
}

impl TrainReport {
    /// Writes the report as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> TrainResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// =============================================================================
// Training Loop
// =============================================================================

/// Trains and evaluates a run.
pub fn train_and_evaluate(config: &RunConfig) -> TrainResult<TrainReport> {
    train_with_progress(config, |_| {})
}

/// Trains and evaluates a run, calling `on_step` after every step.
pub fn train_with_progress(
    config: &RunConfig,
    mut on_step: impl FnMut(usize),
) -> TrainResult<TrainReport> {
    config.validate()?;
    let p = &config.problem;
    let (u_ref, r_star) = laplace_dataset(p.r0, p.r1, p.n_r, p.u0, p.u1);

    let mut model = RadialLaplace::new(config)?;
    let settings = ControllerSettings::from_config(config, r_star.clone())?;
    if settings.point_dim() != model.input_dim() {
        return Err(TrainError::Config(format!(
            "sampler '{}' produces {}-D points but the model takes {}-D input",
            settings.kind,
            settings.point_dim(),
            model.input_dim()
        )));
    }

    let diagnostics = (config.sampler.plot_rad || config.sampler.plot_batch)
        .then(|| Diagnostics::new(config.figures_dir()));
    let mut controller = SamplerController::new(settings, model.view(), diagnostics)?;

    info!(
        run = %config.project.name,
        sampler = %config.sampler.sampler_name,
        steps = config.training.max_steps,
        lanes = config.training.num_lanes,
        "Training started"
    );

    let weights = config.weighting;
    let start = Instant::now();
    let mut history = Vec::new();
    for step in 0..config.training.max_steps {
        let batch = controller.next_batch(step)?;
        let losses = model.step(&batch);
        let loss = losses.total(&weights);
        if !loss.is_finite() {
            return Err(TrainError::Diverged { step, loss });
        }

        let last = step + 1 == config.training.max_steps;
        if step % config.logging.log_every_steps == 0 || last {
            let params = model.store().snapshot();
            let l2_error = config
                .logging
                .log_errors
                .then(|| relative_l2_error(&model.predict(&params, &r_star), &u_ref));
            let elapsed_secs = start.elapsed().as_secs_f64();
            info!(
                step,
                loss,
                inner_bcs = losses.inner_bcs,
                outer_bcs = losses.outer_bcs,
                res = losses.res,
                l2_error = l2_error.unwrap_or(f64::NAN),
                elapsed_secs,
                "Step"
            );
            history.push(LogRecord {
                step,
                loss,
                losses,
                l2_error,
                elapsed_secs,
            });
        }
        on_step(step);
    }

    let params = model.store().snapshot();
    let final_losses = model.losses(&params, &r_star);
    let final_loss = final_losses.total(&weights);
    let l2_error = relative_l2_error(&model.predict(&params, &r_star), &u_ref);
    let elapsed_secs = start.elapsed().as_secs_f64();
    info!(final_loss, l2_error, elapsed_secs, "Training finished");

    Ok(TrainReport {
        run_name: config.project.name.clone(),
        sampler: config.sampler.sampler_name,
        steps: config.training.max_steps,
        final_losses,
        final_loss,
        l2_error,
        resample_events: controller.into_events(),
        history,
        params,
        elapsed_secs,
    })
}

// =============================================================================
// Tests
// =============================================================================

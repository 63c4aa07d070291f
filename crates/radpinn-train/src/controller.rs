//! Controller - Sampler Lifecycle
//!
//! Owns the active sampler and decides, before every step, whether to retire
//! it and build a replacement. Adaptive kinds start from a uniform sampler
//! over the training domain and are rebuilt at every resample boundary
//! (`step != 0 && step % resample_every_steps == 0`); static kinds are
//! built once.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use radpinn_data::{
    build_sampler, default_grid, Batch, Domain, ModelView, Points, RandomKey, Sampler,
    SamplerKind, SamplerSpec,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{TrainError, TrainResult};

// =============================================================================
// Phase and Events
// =============================================================================

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Serving batches from the current sampler
    Active,
    /// Swapping samplers at a resample boundary
    Resampling,
}

/// One sampler swap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResampleEvent {
    /// Step the replacement first served
    pub step: usize,
    /// Kind of the replacement
    pub kind: SamplerKind,
    /// True if the outgoing key stream was continued
    pub carried: bool,
}

// =============================================================================
// Settings
// =============================================================================

/// Everything the controller needs to build samplers.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Configured sampler kind
    pub kind: SamplerKind,
    /// Resample boundary spacing
    pub resample_every_steps: usize,
    /// Continue the outgoing key stream and grid
    pub carry_forward: bool,
    /// Write the RAD distribution at boundaries
    pub plot_rad: bool,
    /// Write a batch histogram at boundaries
    pub plot_batch: bool,
    /// Run seed
    pub seed: u64,
    /// Points per lane
    pub batch_size: usize,
    /// Number of lanes
    pub num_lanes: usize,
    /// Training domain
    pub domain: Domain,
    /// RAD v1 evaluation grid
    pub grid: Points,
    /// RAD v1 weight floor
    pub rad_floor: f64,
    /// RAD v2 exponent
    pub k: f64,
    /// RAD v2 offset
    pub c: f64,
    /// Coordinate table for space and time-space samplers
    pub coords: Points,
    /// Temporal interval for the time-space sampler
    pub temporal: Domain,
}

impl ControllerSettings {
    /// Derives settings from a run configuration. `coords` is the reference
    /// coordinate table.
    pub fn from_config(config: &RunConfig, coords: Points) -> TrainResult<Self> {
        let s = &config.sampler;
        let (grid_lo, grid_hi) = config.grid_bounds();
        let grid = default_grid(&Domain::interval(grid_lo, grid_hi)?, s.grid_points)?;
        let [t0, t1] = s.temporal_domain;
        let settings = Self {
            kind: s.sampler_name,
            resample_every_steps: s.resample_every_steps,
            carry_forward: s.carry_forward,
            plot_rad: s.plot_rad,
            plot_batch: s.plot_batch,
            seed: config.training.seed,
            batch_size: config.training.batch_size_per_device,
            num_lanes: config.training.num_lanes,
            domain: Domain::interval(config.problem.r0, config.problem.r1)?,
            grid,
            rad_floor: s.rad_floor,
            k: s.k,
            c: s.c,
            coords,
            temporal: Domain::interval(t0, t1)?,
        };
        settings.check()?;
        Ok(settings)
    }

    /// Rejects settings the boundary rule cannot use.
    fn check(&self) -> TrainResult<()> {
        if self.resample_every_steps == 0 {
            return Err(TrainError::Config(
                "sampler.resample_every_steps must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Dimension of the points the configured kind produces.
    pub fn point_dim(&self) -> usize {
        match self.kind {
            SamplerKind::Uniform => self.domain.dim(),
            SamplerKind::Space => self.coords.dim(),
            SamplerKind::TimeSpace => 1 + self.coords.dim(),
            SamplerKind::RadV1 => self.grid.dim(),
            SamplerKind::RadV2 => self.domain.dim(),
        }
    }
}

// =============================================================================
// SamplerController
// =============================================================================

/// Drives the active sampler across resample boundaries.
pub struct SamplerController<P> {
    settings: ControllerSettings,
    model: ModelView<P>,
    diagnostics: Option<Diagnostics>,
    active: Option<Box<dyn Sampler>>,
    phase: Phase,
    last_batch: Option<Points>,
    events: Vec<ResampleEvent>,
}

impl<P: 'static> SamplerController<P> {
    /// Builds the initial sampler.
    pub fn new(
        settings: ControllerSettings,
        model: ModelView<P>,
        diagnostics: Option<Diagnostics>,
    ) -> TrainResult<Self> {
        settings.check()?;
        let spec: SamplerSpec<P> = initial_spec(&settings);
        let kind = spec.kind();
        let sampler = build_sampler(
            spec,
            settings.batch_size,
            RandomKey::new(settings.seed),
            settings.num_lanes,
        )
        .map_err(|e| TrainError::sampler(kind.as_str(), 0, e))?;
        debug!(sampler = %kind, configured = %settings.kind, "Initial sampler built");

        Ok(Self {
            settings,
            model,
            diagnostics,
            active: Some(sampler),
            phase: Phase::Active,
            last_batch: None,
            events: Vec::new(),
        })
    }

    /// True if the batch for `step` comes from a replacement sampler.
    pub fn is_resample_boundary(&self, step: usize) -> bool {
        self.settings.kind.is_adaptive()
            && step != 0
            && step % self.settings.resample_every_steps == 0
    }

    /// The batch for `step`.
    pub fn next_batch(&mut self, step: usize) -> TrainResult<Batch> {
        if self.is_resample_boundary(step) {
            self.phase = Phase::Resampling;
            self.resample(step)?;
        }

        let sampler = self
            .active
            .as_mut()
            .ok_or_else(|| TrainError::Config("no active sampler".to_string()))?;
        let batch = sampler
            .next_batch()
            .map_err(|e| TrainError::sampler(sampler.name(), step, e))?;

        if self.phase == Phase::Resampling {
            self.write_diagnostics(step, &batch);
            self.phase = Phase::Active;
        }
        if self.settings.kind == SamplerKind::RadV2 {
            self.last_batch = Some(batch.flatten());
        }
        Ok(batch)
    }

    fn resample(&mut self, step: usize) -> TrainResult<()> {
        let kind = self.settings.kind;
        let context = match self.active.take() {
            Some(outgoing) => outgoing.retire(),
            None => Default::default(),
        };

        let (key, grid, carried) = match (self.settings.carry_forward, context.key) {
            (true, Some(key)) => (key, context.grid, true),
            _ => (RandomKey::new(self.settings.seed).fold_in(step as u64), None, false),
        };

        let spec = match kind {
            SamplerKind::RadV1 => SamplerSpec::RadV1 {
                grid: grid.unwrap_or_else(|| self.settings.grid.clone()),
                model: self.model.clone(),
                floor: self.settings.rad_floor,
            },
            SamplerKind::RadV2 => {
                let x = self.last_batch.take().ok_or_else(|| {
                    TrainError::sampler(
                        kind.as_str(),
                        step,
                        radpinn_data::SamplerError::config("no previous batch to resample"),
                    )
                })?;
                let y_hat = self.model.evaluate(&x).into_iter().map(f64::abs).collect();
                SamplerSpec::RadV2 {
                    x,
                    y_hat,
                    k: self.settings.k,
                    c: self.settings.c,
                }
            }
            _ => static_spec(&self.settings, kind),
        };

        let sampler = build_sampler(spec, self.settings.batch_size, key, self.settings.num_lanes)
            .map_err(|e| TrainError::sampler(kind.as_str(), step, e))?;
        self.active = Some(sampler);
        self.events.push(ResampleEvent {
            step,
            kind,
            carried,
        });
        info!(step, sampler = %kind, carried, "Resampled collocation points");
        Ok(())
    }

    fn write_diagnostics(&self, step: usize, batch: &Batch) {
        let (Some(diagnostics), Some(sampler)) = (&self.diagnostics, &self.active) else {
            return;
        };
        if self.settings.plot_batch {
            diagnostics.plot_batch(step, &batch.flatten());
        }
        if self.settings.plot_rad {
            if let (Some(grid), Some(dist)) = (sampler.evaluation_grid(), sampler.distribution()) {
                diagnostics.plot_rad(step, grid, dist.probs());
            }
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Name of the active sampler.
    pub fn active_name(&self) -> Option<&'static str> {
        self.active.as_ref().map(|s| s.name())
    }

    /// Swaps so far.
    pub fn events(&self) -> &[ResampleEvent] {
        &self.events
    }

    /// Consumes the controller, returning its swap history.
    pub fn into_events(self) -> Vec<ResampleEvent> {
        self.events
    }
}

fn static_spec<P>(settings: &ControllerSettings, kind: SamplerKind) -> SamplerSpec<P> {
    match kind {
        SamplerKind::Space => SamplerSpec::Space {
            coords: settings.coords.clone(),
        },
        SamplerKind::TimeSpace => SamplerSpec::TimeSpace {
            temporal: settings.temporal.clone(),
            coords: settings.coords.clone(),
        },
        SamplerKind::Uniform | SamplerKind::RadV1 | SamplerKind::RadV2 => SamplerSpec::Uniform {
            domain: settings.domain.clone(),
        },
    }
}

/// Static kinds start as configured; adaptive kinds start uniform.
fn initial_spec<P>(settings: &ControllerSettings) -> SamplerSpec<P> {
    static_spec(settings, settings.kind)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(kind: SamplerKind, carry_forward: bool) -> ControllerSettings {
        let mut config = RunConfig::with_seed(1234);
        config.sampler.sampler_name = kind;
        config.sampler.resample_every_steps = 10;
        config.sampler.carry_forward = carry_forward;
        config.sampler.grid_points = 200;
        config.training.batch_size_per_device = 16;
        config.training.num_lanes = 2;
        ControllerSettings::from_config(&config, Points::linspace(0.001, 1.0, 64)).unwrap()
    }

    fn view() -> ModelView<()> {
        ModelView::new(|| (), |_: &(), pts: &Points| {
            pts.iter_rows().map(|r| 1.0 / r[0]).collect()
        })
    }

    #[test]
    fn test_zero_resample_interval_rejected() {
        let mut config = RunConfig::with_seed(1234);
        config.sampler.resample_every_steps = 0;
        let coords = Points::linspace(0.001, 1.0, 8);
        assert!(matches!(
            ControllerSettings::from_config(&config, coords),
            Err(TrainError::Config(_))
        ));

        let mut s = settings(SamplerKind::RadV1, false);
        s.resample_every_steps = 0;
        assert!(matches!(
            SamplerController::new(s, view(), None),
            Err(TrainError::Config(_))
        ));
    }

    #[test]
    fn test_swaps_only_at_boundaries() {
        let mut controller = SamplerController::new(settings(SamplerKind::RadV1, false), view(), None).unwrap();
        assert_eq!(controller.active_name(), Some("uniform"));

        for step in 0..35 {
            controller.next_batch(step).unwrap();
            assert_eq!(controller.phase(), Phase::Active);
        }
        let steps: Vec<usize> = controller.events().iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![10, 20, 30]);
        assert_eq!(controller.active_name(), Some("rad"));
        assert!(controller.events().iter().all(|e| !e.carried));
    }

    #[test]
    fn test_static_kind_never_swaps() {
        let mut controller = SamplerController::new(settings(SamplerKind::Space, false), view(), None).unwrap();
        for step in 0..25 {
            controller.next_batch(step).unwrap();
        }
        assert!(controller.events().is_empty());
        assert_eq!(controller.active_name(), Some("space"));
    }

    #[test]
    fn test_replacement_without_carry_uses_fold_in() {
        let s = settings(SamplerKind::RadV1, false);
        let mut controller = SamplerController::new(s.clone(), view(), None).unwrap();
        let mut at_ten = None;
        for step in 0..=10 {
            let batch = controller.next_batch(step).unwrap();
            if step == 10 {
                at_ten = Some(batch);
            }
        }

        let spec = SamplerSpec::RadV1 {
            grid: s.grid.clone(),
            model: view(),
            floor: s.rad_floor,
        };
        let mut fresh = build_sampler(spec, 16, RandomKey::new(1234).fold_in(10), 2).unwrap();
        assert_eq!(at_ten.unwrap(), fresh.next_batch().unwrap());
    }

    #[test]
    fn test_carry_forward_continues_stream() {
        let mut carried = SamplerController::new(settings(SamplerKind::RadV1, true), view(), None).unwrap();
        let mut fresh = SamplerController::new(settings(SamplerKind::RadV1, false), view(), None).unwrap();
        let mut differs = false;
        for step in 0..=20 {
            let a = carried.next_batch(step).unwrap();
            let b = fresh.next_batch(step).unwrap();
            if step < 10 {
                assert_eq!(a, b);
            } else {
                differs |= a != b;
            }
        }
        assert!(differs);
        assert!(carried.events().iter().all(|e| e.carried));
    }

    #[test]
    fn test_rad_two_resamples_previous_batch() {
        let mut controller = SamplerController::new(settings(SamplerKind::RadV2, false), view(), None).unwrap();
        let mut previous = None;
        for step in 0..=10 {
            let batch = controller.next_batch(step).unwrap();
            if step == 9 {
                previous = Some(batch.flatten());
            } else if step == 10 {
                let prev = previous.take().unwrap();
                assert!(batch
                    .flatten()
                    .iter_rows()
                    .all(|row| prev.iter_rows().any(|p| p == row)));
            }
        }
        assert_eq!(controller.active_name(), Some("rad2"));
    }

    #[test]
    fn test_sampler_failure_names_step() {
        let zero = ModelView::new(|| (), |_: &(), pts: &Points| vec![0.0; pts.rows()]);
        let mut s = settings(SamplerKind::RadV1, false);
        s.rad_floor = 0.0;
        let mut controller = SamplerController::new(s, zero, None).unwrap();
        for step in 0..10 {
            controller.next_batch(step).unwrap();
        }
        let err = controller.next_batch(10).unwrap_err();
        assert!(matches!(err, TrainError::Sampler { step: 10, .. }));
        assert!(err.to_string().contains("'rad'"));
    }
}

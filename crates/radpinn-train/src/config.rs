//! Config - Run Configuration
//!
//! Handles parsing and validation of radpinn run files (`radpinn.toml`).
//! Every field has a default except `training.seed`, which must always be
//! given explicitly.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::path::{Path, PathBuf};

use radpinn_data::{SamplerKind, DEFAULT_GRID_POINTS, DEFAULT_RAD_FLOOR};
use serde::{Deserialize, Serialize};

use crate::error::{TrainError, TrainResult};

// =============================================================================
// Run Configuration
// =============================================================================

/// Run configuration (radpinn.toml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Run metadata and output location
    #[serde(default)]
    pub project: ProjectConfig,

    /// Training loop settings
    pub training: TrainingConfig,

    /// Collocation sampler settings
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Boundary-value problem
    #[serde(default)]
    pub problem: ProblemConfig,

    /// Surrogate model
    #[serde(default)]
    pub model: ModelConfig,

    /// Static loss weights
    #[serde(default)]
    pub weighting: WeightingConfig,

    /// Periodic evaluation
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Run metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Run name; diagnostics go to `output_dir/figures/<name>/`
    #[serde(default = "default_name")]
    pub name: String,

    /// Output directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_name() -> String {
    "radpinn".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

// =============================================================================
// Training Configuration
// =============================================================================

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of optimization steps
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Collocation points per lane and step
    #[serde(default = "default_batch_size")]
    pub batch_size_per_device: usize,

    /// Number of execution lanes
    #[serde(default = "default_num_lanes")]
    pub num_lanes: usize,

    /// Random seed (required)
    pub seed: u64,

    /// Adam learning rate
    #[serde(default = "default_lr")]
    pub learning_rate: f64,

    /// Adam L2 penalty on the coefficients
    #[serde(default)]
    pub weight_decay: f64,
}

impl TrainingConfig {
    /// Default training settings with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            max_steps: default_max_steps(),
            batch_size_per_device: default_batch_size(),
            num_lanes: default_num_lanes(),
            seed,
            learning_rate: default_lr(),
            weight_decay: 0.0,
        }
    }
}

fn default_max_steps() -> usize {
    2000
}
fn default_batch_size() -> usize {
    128
}
fn default_num_lanes() -> usize {
    1
}
fn default_lr() -> f64 {
    1e-3
}

// =============================================================================
// Sampler Configuration
// =============================================================================

/// Sampler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Sampler kind (uniform/random, space, time_space, rad, rad2)
    #[serde(default = "default_sampler")]
    pub sampler_name: SamplerKind,

    /// Resample boundary spacing for adaptive samplers
    #[serde(default = "default_resample_every")]
    pub resample_every_steps: usize,

    /// Write the RAD distribution at each resample boundary
    #[serde(default)]
    pub plot_rad: bool,

    /// Write a histogram of the first batch after each resample boundary
    #[serde(default)]
    pub plot_batch: bool,

    /// Continue the outgoing key stream and grid across resample boundaries
    #[serde(default)]
    pub carry_forward: bool,

    /// RAD v1 evaluation grid size
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,

    /// RAD v1 grid lower bound (defaults to `problem.r0`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_lo: Option<f64>,

    /// RAD v1 grid upper bound (defaults to `problem.r1`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_hi: Option<f64>,

    /// RAD v1 additive weight floor
    #[serde(default = "default_rad_floor")]
    pub rad_floor: f64,

    /// RAD v2 offset
    #[serde(default = "default_c")]
    pub c: f64,

    /// RAD v2 exponent
    #[serde(default = "default_k")]
    pub k: f64,

    /// Temporal interval for the time-space sampler
    #[serde(default = "default_temporal_domain")]
    pub temporal_domain: [f64; 2],
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sampler_name: default_sampler(),
            resample_every_steps: default_resample_every(),
            plot_rad: false,
            plot_batch: false,
            carry_forward: false,
            grid_points: default_grid_points(),
            grid_lo: None,
            grid_hi: None,
            rad_floor: default_rad_floor(),
            c: default_c(),
            k: default_k(),
            temporal_domain: default_temporal_domain(),
        }
    }
}

fn default_sampler() -> SamplerKind {
    SamplerKind::RadV1
}
fn default_resample_every() -> usize {
    100
}
fn default_grid_points() -> usize {
    DEFAULT_GRID_POINTS
}
fn default_rad_floor() -> f64 {
    DEFAULT_RAD_FLOOR
}
fn default_c() -> f64 {
    1.0
}
fn default_k() -> f64 {
    1.0
}
fn default_temporal_domain() -> [f64; 2] {
    [0.0, 1.0]
}

// =============================================================================
// Problem Configuration
// =============================================================================

/// Radial Laplace problem on `[r0, r1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Inner radius
    #[serde(default = "default_r0")]
    pub r0: f64,

    /// Outer radius
    #[serde(default = "default_r1")]
    pub r1: f64,

    /// Reference grid size
    #[serde(default = "default_n_r")]
    pub n_r: usize,

    /// Value at the inner radius
    #[serde(default = "default_u0")]
    pub u0: f64,

    /// Value at the outer radius
    #[serde(default)]
    pub u1: f64,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            r0: default_r0(),
            r1: default_r1(),
            n_r: default_n_r(),
            u0: default_u0(),
            u1: 0.0,
        }
    }
}

fn default_r0() -> f64 {
    0.001
}
fn default_r1() -> f64 {
    1.0
}
fn default_n_r() -> usize {
    12_800
}
fn default_u0() -> f64 {
    1.0
}

// =============================================================================
// Model, Weighting and Logging Configuration
// =============================================================================

/// Surrogate model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Highest power of the log-radius basis
    #[serde(default = "default_degree")]
    pub degree: usize,

    /// Standard deviation of the initial coefficients
    #[serde(default = "default_init_std")]
    pub init_std: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            degree: default_degree(),
            init_std: default_init_std(),
        }
    }
}

fn default_degree() -> usize {
    6
}
fn default_init_std() -> f64 {
    0.1
}

/// Static loss weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightingConfig {
    /// Inner boundary weight
    #[serde(default = "default_weight")]
    pub inner_bcs: f64,

    /// Outer boundary weight
    #[serde(default = "default_weight")]
    pub outer_bcs: f64,

    /// Residual weight
    #[serde(default = "default_weight")]
    pub res: f64,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            inner_bcs: default_weight(),
            outer_bcs: default_weight(),
            res: default_weight(),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Periodic evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Evaluate and log every this many steps
    #[serde(default = "default_log_every")]
    pub log_every_steps: usize,

    /// Include the relative L2 error in evaluations
    #[serde(default = "default_log_errors")]
    pub log_errors: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_every_steps: default_log_every(),
            log_errors: default_log_errors(),
        }
    }
}

fn default_log_every() -> usize {
    100
}
fn default_log_errors() -> bool {
    true
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl RunConfig {
    /// Default configuration with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            project: ProjectConfig::default(),
            training: TrainingConfig::with_seed(seed),
            sampler: SamplerConfig::default(),
            problem: ProblemConfig::default(),
            model: ModelConfig::default(),
            weighting: WeightingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> TrainResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: RunConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> TrainResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory for diagnostics of this run.
    pub fn figures_dir(&self) -> PathBuf {
        self.project.output_dir.join("figures").join(&self.project.name)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> TrainResult<()> {
        let t = &self.training;
        ensure(t.max_steps > 0, "training.max_steps must be > 0")?;
        ensure(
            t.batch_size_per_device > 0,
            "training.batch_size_per_device must be > 0",
        )?;
        ensure(t.num_lanes > 0, "training.num_lanes must be > 0")?;
        ensure(
            t.learning_rate.is_finite() && t.learning_rate > 0.0,
            "training.learning_rate must be finite and > 0",
        )?;
        ensure(
            t.weight_decay.is_finite() && t.weight_decay >= 0.0,
            "training.weight_decay must be finite and >= 0",
        )?;

        let s = &self.sampler;
        ensure(
            s.resample_every_steps > 0,
            "sampler.resample_every_steps must be > 0",
        )?;
        ensure(s.grid_points > 0, "sampler.grid_points must be > 0")?;
        let (lo, hi) = self.grid_bounds();
        ensure(
            lo.is_finite() && hi.is_finite() && lo < hi,
            "sampler grid bounds must be finite with grid_lo < grid_hi",
        )?;
        ensure(
            s.rad_floor.is_finite() && s.rad_floor >= 0.0,
            "sampler.rad_floor must be finite and >= 0",
        )?;
        ensure(s.c.is_finite() && s.c >= 0.0, "sampler.c must be finite and >= 0")?;
        ensure(s.k.is_finite(), "sampler.k must be finite")?;
        let [t0, t1] = s.temporal_domain;
        ensure(
            t0.is_finite() && t1.is_finite() && t0 < t1,
            "sampler.temporal_domain must be finite and increasing",
        )?;

        let p = &self.problem;
        ensure(
            p.r0.is_finite() && p.r0 > 0.0,
            "problem.r0 must be finite and > 0",
        )?;
        ensure(p.r1.is_finite() && p.r1 > p.r0, "problem.r1 must exceed problem.r0")?;
        ensure(p.n_r >= 2, "problem.n_r must be >= 2")?;
        ensure(
            p.u0.is_finite() && p.u1.is_finite(),
            "problem boundary values must be finite",
        )?;

        ensure(
            self.model.init_std.is_finite() && self.model.init_std >= 0.0,
            "model.init_std must be finite and >= 0",
        )?;
        let w = &self.weighting;
        ensure(
            [w.inner_bcs, w.outer_bcs, w.res]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0),
            "loss weights must be finite and >= 0",
        )?;
        ensure(
            self.logging.log_every_steps > 0,
            "logging.log_every_steps must be > 0",
        )?;
        Ok(())
    }

    /// RAD v1 grid bounds after applying the problem-domain defaults.
    pub fn grid_bounds(&self) -> (f64, f64) {
        (
            self.sampler.grid_lo.unwrap_or(self.problem.r0),
            self.sampler.grid_hi.unwrap_or(self.problem.r1),
        )
    }
}

fn ensure(ok: bool, msg: &str) -> TrainResult<()> {
    if ok {
        Ok(())
    } else {
        Err(TrainError::Config(msg.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================

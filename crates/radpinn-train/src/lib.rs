//! radpinn-train - Training Loop for Residual-Adaptive PINNs
//!
//! Provides everything around the samplers needed to train end to end:
//! - `RunConfig` loaded from TOML
//! - The sampler lifecycle controller with resample boundaries
//! - The `PinnModel` interface and the radial Laplace surrogate
//! - Adam, the parameter store and JSON diagnostics
//! - `train_and_evaluate`, returning a `TrainReport`
//!
//! # Example
//!
//! ```ignore
//! use radpinn_train::prelude::*;
//!
//! let mut config = RunConfig::with_seed(1234);
//! config.training.max_steps = 500;
//!
//! let report = train_and_evaluate(&config)?;
//! println!("l2 error: {:.3e}", report.l2_error);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Numeric allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::ptr_arg)]
#![allow(clippy::float_cmp)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::too_many_lines)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adam;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod laplace;
pub mod model;
pub mod params;
pub mod trainer;

// =============================================================================
// Re-exports
// =============================================================================

pub use adam::Adam;
pub use config::{
    LoggingConfig, ModelConfig, ProblemConfig, ProjectConfig, RunConfig, SamplerConfig,
    TrainingConfig, WeightingConfig,
};
pub use controller::{ControllerSettings, Phase, ResampleEvent, SamplerController};
pub use diagnostics::{Diagnostics, Histogram};
pub use error::{TrainError, TrainResult};
pub use laplace::{exact_solution, laplace_dataset, RadialLaplace};
pub use model::{relative_l2_error, LossBreakdown, PinnModel};
pub use params::ParamStore;
pub use trainer::{train_and_evaluate, train_with_progress, LogRecord, TrainReport};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for training.
pub mod prelude {
    pub use crate::{
        train_and_evaluate, train_with_progress, LossBreakdown, PinnModel, RadialLaplace,
        ResampleEvent, RunConfig, SamplerController, TrainError, TrainReport, TrainResult,
    };
    pub use radpinn_data::SamplerKind;
}

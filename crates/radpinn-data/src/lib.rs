//! radpinn-data - Collocation Samplers for Physics-Informed Training
//!
//! Provides the collocation point sampling infrastructure:
//! - Splittable random keys for reproducible, lane-independent streams
//! - The `Sampler` contract with lane fan-out on the rayon pool
//! - Static samplers (uniform, space, time-space)
//! - Residual-adaptive samplers (RAD v1 over a grid, RAD v2 over the
//!   previous batch)
//! - A factory over the closed set of sampler kinds
//!
//! # Example
//!
//! ```ignore
//! use radpinn_data::prelude::*;
//!
//! let domain = Domain::interval(0.001, 1.0)?;
//! let mut sampler = UniformSampler::new(domain, 4)?;
//! sampler.configure(128, 1234)?;
//!
//! let batch = sampler.next_batch()?;
//! assert_eq!(batch.shape(), [4, 128, 1]);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Numeric allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::float_cmp)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unreadable_literal)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod distribution;
pub mod domain;
pub mod error;
pub mod factory;
pub mod key;
pub mod points;
pub mod rad;
pub mod sampler;

// =============================================================================
// Re-exports
// =============================================================================

pub use batch::Batch;
pub use distribution::{residual_weights, SamplingDistribution};
pub use domain::Domain;
pub use error::{Result, SamplerError};
pub use factory::{build_sampler, SamplerKind, SamplerSpec};
pub use key::RandomKey;
pub use points::Points;
pub use rad::{
    default_grid, improved_rad_weights, ModelView, RadSampler, RadSamplerTwo, ResidualFn,
    SnapshotFn, DEFAULT_GRID_POINTS, DEFAULT_RAD_FLOOR,
};
pub use sampler::{
    BaseSampler, Batches, Sampler, SamplerContext, SamplerState, SpaceSampler, TimeSpaceSampler,
    UniformSampler,
};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for sampling.
pub mod prelude {
    pub use crate::{
        build_sampler, Batch, Domain, ModelView, Points, RadSampler, RadSamplerTwo, RandomKey,
        Sampler, SamplerContext, SamplerError, SamplerKind, SamplerSpec, SpaceSampler,
        TimeSpaceSampler, UniformSampler,
    };
}

//! Error - Training Error Types
//!
//! Defines error types for configuration, the training loop and the
//! sampler lifecycle.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use radpinn_data::SamplerError;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Training errors
#[derive(Error, Debug)]
pub enum TrainError {
    /// Invalid run configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sampler failed while drawing or building a batch; training halts
    #[error("Sampler '{sampler}' failed at step {step}: {source}")]
    Sampler {
        /// Name of the failing sampler
        sampler: String,
        /// Training step being served
        step: usize,
        /// Underlying sampler error
        #[source]
        source: SamplerError,
    },

    /// Sampler error outside the training loop (setup)
    #[error("Data error: {0}")]
    Data(#[from] SamplerError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The loss became non-finite
    #[error("Training diverged at step {step}: loss = {loss}")]
    Diverged {
        /// Step at which the loss was observed
        step: usize,
        /// The offending loss value
        loss: f64,
    },
}

/// Result type for training operations
pub type TrainResult<T> = Result<T, TrainError>;

impl TrainError {
    /// Wraps a sampler failure with the sampler name and step.
    pub fn sampler(sampler: impl Into<String>, step: usize, source: SamplerError) -> Self {
        TrainError::Sampler {
            sampler: sampler.into(),
            step,
            source,
        }
    }
}

// =============================================================================
// Error Conversion
// =============================================================================

impl From<toml::de::Error> for TrainError {
    fn from(e: toml::de::Error) -> Self {
        TrainError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for TrainError {
    fn from(e: toml::ser::Error) -> Self {
        TrainError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for TrainError {
    fn from(e: serde_json::Error) -> Self {
        TrainError::Serialization(e.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

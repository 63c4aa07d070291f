//! Error Types - Sampler Error Handling
//!
//! Error taxonomy for everything that can go wrong while building a sampler
//! or drawing a batch of collocation points.
//!
//! # Key Features
//! - Configuration problems surface at construction time
//! - Lifecycle misuse (`next_batch` before `configure`) is its own variant
//! - Degenerate probability mass is reported instead of producing NaNs
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// The error type for sampler operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    /// Invalid sampler configuration: unknown sampler name, domain shape or
    /// dimension mismatch, invalid batch size, lane count or RAD parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A batch was requested before the sampler was configured.
    #[error("Sampler '{sampler}' used before configure()")]
    Uninitialized {
        /// Name of the sampler.
        sampler: &'static str,
    },

    /// The sampling weights cannot be normalized (zero or non-finite mass).
    #[error("Degenerate sampling distribution: {0}")]
    DegenerateDistribution(String),

    /// Point generation was invoked on a sampler that does not provide it.
    #[error("Sampler '{sampler}' does not implement point generation")]
    NotImplemented {
        /// Name of the sampler.
        sampler: &'static str,
    },

    /// Two shapes that must agree do not.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },
}

/// Result type for sampler operations.
pub type Result<T> = std::result::Result<T, SamplerError>;

// =============================================================================
// Error Helpers
// =============================================================================

impl SamplerError {
    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Shorthand for a degenerate distribution error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateDistribution(msg.into())
    }

    /// Returns true for errors raised while building a sampler.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

// =============================================================================
// Tests
// =============================================================================

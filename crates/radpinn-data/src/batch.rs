//! Batch - Lane-Stacked Collocation Batches
//!
//! A [`Batch`] is what one `next_batch()` call produces: one [`Points`] lane
//! per execution lane, each of shape `(batch_size, dim)`, so the whole batch
//! has shape `(num_lanes, batch_size, dim)`.
//!
//! Batches are not `Clone` and expose no mutation. A batch is handed to the
//! training step that requested it; anything that needs the points afterwards
//! takes an explicit copy with [`Batch::flatten`].
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use crate::error::{Result, SamplerError};
use crate::points::Points;

// =============================================================================
// Batch
// =============================================================================

/// A batch of collocation points stacked over lanes.
#[derive(Debug, PartialEq)]
pub struct Batch {
    lanes: Vec<Points>,
}

impl Batch {
    /// Stacks per-lane tables into a batch. All lanes must share a shape.
    pub fn from_lanes(lanes: Vec<Points>) -> Result<Self> {
        let Some(first) = lanes.first() else {
            return Err(SamplerError::config("a batch needs at least one lane"));
        };
        let shape = first.shape();
        if let Some(bad) = lanes.iter().find(|lane| lane.shape() != shape) {
            return Err(SamplerError::ShapeMismatch {
                expected: shape.to_vec(),
                actual: bad.shape().to_vec(),
            });
        }
        Ok(Self { lanes })
    }

    /// Number of lanes.
    pub fn num_lanes(&self) -> usize {
        self.lanes.len()
    }

    /// Points per lane.
    pub fn batch_size(&self) -> usize {
        self.lanes[0].rows()
    }

    /// Point dimension.
    pub fn dim(&self) -> usize {
        self.lanes[0].dim()
    }

    /// `[num_lanes, batch_size, dim]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.num_lanes(), self.batch_size(), self.dim()]
    }

    /// Total number of points over all lanes.
    pub fn len(&self) -> usize {
        self.num_lanes() * self.batch_size()
    }

    /// True if the lanes hold no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th lane.
    pub fn lane(&self, i: usize) -> &Points {
        &self.lanes[i]
    }

    /// All lanes.
    pub fn lanes(&self) -> &[Points] {
        &self.lanes
    }

    /// Copies all lanes into one `(num_lanes * batch_size, dim)` table.
    pub fn flatten(&self) -> Points {
        let dim = self.dim();
        let data: Vec<f64> = self
            .lanes
            .iter()
            .flat_map(|lane| lane.as_slice().iter().copied())
            .collect();
        Points::from_raw(data, dim)
    }
}

// =============================================================================
// Tests
// =============================================================================

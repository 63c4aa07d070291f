//! Domain - Box Bounds for Uniform Sampling
//!
//! Per-dimension `[low, high)` bounds. A one-dimensional domain is a single
//! interval; a `(dim, 2)` table of `[low, high]` rows builds a box.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rand::distributions::Uniform;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SamplerError};
use crate::points::Points;

// =============================================================================
// Domain
// =============================================================================

/// Immutable per-dimension bounds. Every dimension satisfies `low < high`
/// with both ends finite and a width well below `f64::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDomain")]
pub struct Domain {
    bounds: Vec<(f64, f64)>,
}

#[derive(Deserialize)]
struct RawDomain {
    bounds: Vec<(f64, f64)>,
}

impl TryFrom<RawDomain> for Domain {
    type Error = SamplerError;

    fn try_from(raw: RawDomain) -> Result<Self> {
        Domain::new(raw.bounds)
    }
}

impl Domain {
    /// Creates a domain from per-dimension `(low, high)` pairs.
    pub fn new(bounds: Vec<(f64, f64)>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(SamplerError::config("domain needs at least one dimension"));
        }
        for (d, &(lo, hi)) in bounds.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(SamplerError::config(format!(
                    "domain bounds must be finite (dimension {d}: [{lo}, {hi}])"
                )));
            }
            if lo >= hi {
                return Err(SamplerError::config(format!(
                    "domain dimension {d} is empty: low {lo} >= high {hi}"
                )));
            }
            // Uniform sampling scales the width up slightly; keep headroom.
            if !((hi - lo) * 2.0).is_finite() {
                return Err(SamplerError::config(format!(
                    "domain dimension {d} is too wide: [{lo}, {hi}]"
                )));
            }
        }
        Ok(Self { bounds })
    }

    /// One-dimensional interval `[lo, hi)`.
    pub fn interval(lo: f64, hi: f64) -> Result<Self> {
        Self::new(vec![(lo, hi)])
    }

    /// Builds a domain from a `(dim, 2)` table of `[low, high]` rows.
    pub fn from_points(table: &Points) -> Result<Self> {
        if table.dim() != 2 || table.is_empty() {
            return Err(SamplerError::config(format!(
                "domain table must have shape (dim, 2), got {:?}",
                table.shape()
            )));
        }
        Self::new(table.iter_rows().map(|r| (r[0], r[1])).collect())
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.bounds.len()
    }

    /// Per-dimension `(low, high)` pairs.
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Bounds of dimension `d`.
    pub fn bound(&self, d: usize) -> (f64, f64) {
        self.bounds[d]
    }

    /// One uniform distribution per dimension.
    pub(crate) fn uniforms(&self) -> Vec<Uniform<f64>> {
        self.bounds
            .iter()
            .map(|&(lo, hi)| Uniform::new(lo, hi))
            .collect()
    }

    /// True if `point` lies within the bounds (low inclusive, high exclusive).
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .zip(&self.bounds)
                .all(|(&x, &(lo, hi))| x >= lo && x < hi)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval() {
        let d = Domain::interval(0.001, 1.0).unwrap();
        assert_eq!(d.dim(), 1);
        assert_eq!(d.bound(0), (0.001, 1.0));
        assert!(d.contains(&[0.5]));
        assert!(!d.contains(&[1.0]));
        assert!(!d.contains(&[0.5, 0.5]));
    }

    #[test]
    fn test_rejects_bad_bounds() {
        assert!(Domain::interval(1.0, 1.0).unwrap_err().is_configuration());
        assert!(Domain::interval(2.0, 1.0).is_err());
        assert!(Domain::interval(0.0, f64::INFINITY).is_err());
        assert!(Domain::interval(f64::NAN, 1.0).is_err());
        assert!(Domain::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_overflowing_width() {
        let err = Domain::interval(-1e308, 1e308).unwrap_err();
        assert!(err.is_configuration());
        assert!(Domain::new(vec![(0.0, 1.0), (-f64::MAX, f64::MAX)]).is_err());
        assert!(Domain::interval(0.0, f64::MAX).is_err());
        assert!(Domain::interval(-1e307, 1e307).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let d: Domain = serde_json::from_str(r#"{"bounds":[[0.0,2.0]]}"#).unwrap();
        assert_eq!(d.bound(0), (0.0, 2.0));
        assert_eq!(serde_json::to_string(&d).unwrap(), r#"{"bounds":[[0.0,2.0]]}"#);

        let reversed = serde_json::from_str::<Domain>(r#"{"bounds":[[1.0,0.0]]}"#);
        assert!(reversed.unwrap_err().to_string().contains("empty"));
        assert!(serde_json::from_str::<Domain>(r#"{"bounds":[]}"#).is_err());
        assert!(serde_json::from_str::<Domain>(r#"{"bounds":[[-1e308,1e308]]}"#).is_err());
    }

    #[test]
    fn test_from_points_table() {
        let table = Points::new(vec![0.0, 1.0, -1.0, 1.0], 2).unwrap();
        let d = Domain::from_points(&table).unwrap();
        assert_eq!(d.dim(), 2);
        assert_eq!(d.bounds(), &[(0.0, 1.0), (-1.0, 1.0)]);

        let wrong = Points::new(vec![0.0, 1.0, 2.0], 3).unwrap();
        assert!(Domain::from_points(&wrong).unwrap_err().is_configuration());
    }
}

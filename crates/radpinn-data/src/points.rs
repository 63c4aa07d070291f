//! Points - Row-Major Point Tables
//!
//! [`Points`] is the storage type shared by coordinate tables, evaluation
//! grids and batch lanes: `rows` points of dimension `dim`, stored row-major
//! in one contiguous `Vec<f64>`.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use serde::Serialize;

use crate::error::{Result, SamplerError};

// =============================================================================
// Points
// =============================================================================

/// A `(rows, dim)` table of points.
///
/// # Invariants
/// - `dim > 0`
/// - `data.len() == rows * dim`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Points {
    rows: usize,
    dim: usize,
    data: Vec<f64>,
}

impl Points {
    /// Creates a table from flat row-major data.
    pub fn new(data: Vec<f64>, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(SamplerError::config("point dimension must be > 0"));
        }
        if data.len() % dim != 0 {
            return Err(SamplerError::config(format!(
                "{} values cannot be split into rows of dimension {dim}",
                data.len()
            )));
        }
        Ok(Self {
            rows: data.len() / dim,
            dim,
            data,
        })
    }

    /// Builds a table whose shape the caller has already validated.
    pub(crate) fn from_raw(data: Vec<f64>, dim: usize) -> Self {
        debug_assert!(dim > 0 && data.len() % dim == 0);
        Self {
            rows: data.len() / dim,
            dim,
            data,
        }
    }

    /// Creates a single-column table.
    #[must_use]
    pub fn column(values: Vec<f64>) -> Self {
        Self {
            rows: values.len(),
            dim: 1,
            data: values,
        }
    }

    /// Creates a table from individual rows; all rows must share a length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let dim = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != dim) {
            return Err(SamplerError::ShapeMismatch {
                expected: vec![dim],
                actual: vec![bad.len()],
            });
        }
        let data = rows.iter().flatten().copied().collect();
        Self::new(data, dim)
    }

    /// `n` evenly spaced values on `[lo, hi]` as a single column.
    #[must_use]
    pub fn linspace(lo: f64, hi: f64, n: usize) -> Self {
        let values = match n {
            0 => Vec::new(),
            1 => vec![lo],
            _ => {
                let step = (hi - lo) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                    .collect()
            }
        };
        Self::column(values)
    }

    /// Number of points.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Dimension of each point.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// `[rows, dim]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.dim]
    }

    /// True if the table holds no points.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Flat row-major values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the table, returning the flat values.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// The `i`-th point. Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterates over points.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dim)
    }

    /// Copies column `c` out of the table.
    pub fn column_values(&self, c: usize) -> Vec<f64> {
        self.iter_rows().map(|r| r[c]).collect()
    }

    /// Gathers the given rows (repeats allowed) into a new table.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.dim);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self {
            rows: indices.len(),
            dim: self.dim,
            data,
        }
    }

    /// Concatenates two tables column-wise: `[self | other]`.
    pub fn hstack(&self, other: &Points) -> Result<Self> {
        if self.rows != other.rows {
            return Err(SamplerError::ShapeMismatch {
                expected: vec![self.rows, other.dim],
                actual: vec![other.rows, other.dim],
            });
        }
        let dim = self.dim + other.dim;
        let mut data = Vec::with_capacity(self.rows * dim);
        for (a, b) in self.iter_rows().zip(other.iter_rows()) {
            data.extend_from_slice(a);
            data.extend_from_slice(b);
        }
        Ok(Self {
            rows: self.rows,
            dim,
            data,
        })
    }

    /// Concatenates tables row-wise. All tables must share a dimension.
    pub fn vstack(parts: &[Points]) -> Result<Self> {
        let Some(first) = parts.first() else {
            return Err(SamplerError::config("cannot stack zero tables"));
        };
        let dim = first.dim;
        let mut data = Vec::with_capacity(parts.iter().map(|p| p.data.len()).sum());
        for part in parts {
            if part.dim != dim {
                return Err(SamplerError::ShapeMismatch {
                    expected: vec![part.rows, dim],
                    actual: part.shape().to_vec(),
                });
            }
            data.extend_from_slice(&part.data);
        }
        Self::new(data, dim)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_ragged() {
        assert!(Points::new(vec![1.0, 2.0, 3.0], 2).is_err());
        assert!(Points::new(vec![1.0, 2.0], 0).is_err());

        let p = Points::new(vec![1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(p.shape(), [2, 2]);
        assert_eq!(p.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn test_from_rows() {
        let p = Points::from_rows(&[vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
        assert_eq!(p.as_slice(), &[0.0, 1.0, 2.0, 3.0]);

        let err = Points::from_rows(&[vec![0.0, 1.0], vec![2.0]]).unwrap_err();
        assert!(matches!(err, SamplerError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_linspace_endpoints() {
        let p = Points::linspace(0.001, 0.5, 10_000);
        assert_eq!(p.rows(), 10_000);
        assert_eq!(p.row(0)[0], 0.001);
        assert_eq!(p.row(9_999)[0], 0.5);

        assert_eq!(Points::linspace(2.0, 3.0, 1).as_slice(), &[2.0]);
        assert!(Points::linspace(2.0, 3.0, 0).is_empty());
    }

    #[test]
    fn test_select_and_hstack() {
        let table = Points::new(vec![10.0, 11.0, 20.0, 21.0, 30.0, 31.0], 2).unwrap();
        let picked = table.select(&[2, 0, 2]);
        assert_eq!(picked.as_slice(), &[30.0, 31.0, 10.0, 11.0, 30.0, 31.0]);

        let time = Points::column(vec![0.1, 0.2, 0.3]);
        let joined = time.hstack(&picked).unwrap();
        assert_eq!(joined.dim(), 3);
        assert_eq!(joined.row(1), &[0.2, 10.0, 11.0]);

        assert!(Points::column(vec![1.0]).hstack(&picked).is_err());
    }

    #[test]
    fn test_vstack() {
        let a = Points::column(vec![1.0, 2.0]);
        let b = Points::column(vec![3.0]);
        let stacked = Points::vstack(&[a, b]).unwrap();
        assert_eq!(stacked.column_values(0), vec![1.0, 2.0, 3.0]);

        let wide = Points::new(vec![1.0, 2.0], 2).unwrap();
        assert!(Points::vstack(&[stacked, wide]).is_err());
        assert!(Points::vstack(&[]).is_err());
    }
}

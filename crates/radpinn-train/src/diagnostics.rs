//! Diagnostics - Sampler Distribution Snapshots
//!
//! Writes JSON snapshots of the collocation batch and the RAD distribution
//! at resample boundaries to `output_dir/figures/<run>/`. Writing is best
//! effort: failures are logged and never abort training.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use radpinn_data::Points;
use serde::Serialize;

/// Histogram bins for batch snapshots.
pub const HISTOGRAM_BINS: usize = 50;

// =============================================================================
// Histogram
// =============================================================================

/// Equal-width histogram of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Lower edge of the first bin
    pub lo: f64,
    /// Upper edge of the last bin
    pub hi: f64,
    /// Counts per bin
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width bins spanning their range.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut counts = vec![0; bins];
        if values.is_empty() {
            return Self {
                lo: 0.0,
                hi: 0.0,
                counts,
            };
        }

        let width = (hi - lo) / bins as f64;
        for &v in values {
            let bin = if width > 0.0 {
                (((v - lo) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[bin] += 1;
        }
        Self { lo, hi, counts }
    }
}

#[derive(Serialize)]
struct BatchSnapshot<'a> {
    step: usize,
    points: usize,
    dim: usize,
    histograms: &'a [Histogram],
}

#[derive(Serialize)]
struct RadSnapshot<'a> {
    step: usize,
    x: &'a [f64],
    p: &'a [f64],
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Writer for resample-boundary snapshots.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    dir: PathBuf,
}

impl Diagnostics {
    /// Writes into `dir`, created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the batch snapshot for `step`.
    pub fn batch_path(&self, step: usize) -> PathBuf {
        self.dir.join(format!("batch_step_{step}.json"))
    }

    /// Path of the RAD snapshot for `step`.
    pub fn rad_path(&self, step: usize) -> PathBuf {
        self.dir.join(format!("rad_step_{step}.json"))
    }

    /// Histogram per column of the batch drawn at `step`.
    pub fn plot_batch(&self, step: usize, points: &Points) {
        let histograms: Vec<Histogram> = (0..points.dim())
            .map(|c| Histogram::from_values(&points.column_values(c), HISTOGRAM_BINS))
            .collect();
        let snapshot = BatchSnapshot {
            step,
            points: points.rows(),
            dim: points.dim(),
            histograms: &histograms,
        };
        self.write(&self.batch_path(step), &snapshot);
    }

    /// Sampling probability over the first column of the candidate grid.
    pub fn plot_rad(&self, step: usize, grid: &Points, probs: &[f64]) {
        let x = grid.column_values(0);
        let snapshot = RadSnapshot { step, x: &x, p: probs };
        self.write(&self.rad_path(step), &snapshot);
    }

    fn write<T: Serialize>(&self, path: &Path, value: &T) {
        if let Err(e) = write_json(path, value) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write diagnostics");
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()
}

// =============================================================================
// Tests
// =============================================================================

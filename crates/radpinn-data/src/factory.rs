//! Sampler Factory - Kinds, Specs and Construction
//!
//! [`SamplerKind`] is the closed set of sampler names accepted in run
//! configurations. [`SamplerSpec`] carries everything one kind needs, and
//! [`build_sampler`] turns a spec into a configured, boxed sampler.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::{Result, SamplerError};
use crate::key::RandomKey;
use crate::points::Points;
use crate::rad::{ModelView, RadSampler, RadSamplerTwo};
use crate::sampler::{Sampler, SpaceSampler, TimeSpaceSampler, UniformSampler};

// =============================================================================
// SamplerKind
// =============================================================================

/// Sampler kinds selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SamplerKind {
    /// Uniform over a box (`"uniform"`, `"random"`).
    Uniform,
    /// Rows of a coordinate table (`"space"`).
    Space,
    /// Uniform time column plus table rows (`"time_space"`).
    TimeSpace,
    /// Residual-proportional over a grid (`"rad"`).
    RadV1,
    /// Power-law residual weights over the previous batch (`"rad2"`).
    RadV2,
}

impl SamplerKind {
    /// All kinds.
    pub const ALL: [SamplerKind; 5] = [
        SamplerKind::Uniform,
        SamplerKind::Space,
        SamplerKind::TimeSpace,
        SamplerKind::RadV1,
        SamplerKind::RadV2,
    ];

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            SamplerKind::Uniform => "uniform",
            SamplerKind::Space => "space",
            SamplerKind::TimeSpace => "time_space",
            SamplerKind::RadV1 => "rad",
            SamplerKind::RadV2 => "rad2",
        }
    }

    /// True for kinds that resample from model residuals.
    pub fn is_adaptive(self) -> bool {
        matches!(self, SamplerKind::RadV1 | SamplerKind::RadV2)
    }
}

impl fmt::Display for SamplerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplerKind {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" | "random" => Ok(SamplerKind::Uniform),
            "space" => Ok(SamplerKind::Space),
            "time_space" | "timespace" => Ok(SamplerKind::TimeSpace),
            "rad" | "rad_v1" => Ok(SamplerKind::RadV1),
            "rad2" | "rad_v2" => Ok(SamplerKind::RadV2),
            other => Err(SamplerError::config(format!(
                "unknown sampler '{other}' (expected one of: uniform, random, space, time_space, rad, rad2)"
            ))),
        }
    }
}

impl TryFrom<String> for SamplerKind {
    type Error = SamplerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SamplerKind> for String {
    fn from(kind: SamplerKind) -> Self {
        kind.as_str().to_string()
    }
}

// =============================================================================
// SamplerSpec
// =============================================================================

/// Everything needed to build one sampler of a given kind.
pub enum SamplerSpec<P> {
    /// Uniform over `domain`.
    Uniform {
        /// Sampled box.
        domain: Domain,
    },
    /// Rows of `coords`.
    Space {
        /// Coordinate table.
        coords: Points,
    },
    /// Time column from `temporal`, space rows from `coords`.
    TimeSpace {
        /// One-dimensional temporal interval.
        temporal: Domain,
        /// Spatial coordinate table.
        coords: Points,
    },
    /// RAD v1 over `grid`.
    RadV1 {
        /// Evaluation grid.
        grid: Points,
        /// Model snapshot and residual.
        model: ModelView<P>,
        /// Additive weight floor.
        floor: f64,
    },
    /// RAD v2 over the previous batch.
    RadV2 {
        /// Previous batch points.
        x: Points,
        /// Residual magnitudes at `x`.
        y_hat: Vec<f64>,
        /// Exponent.
        k: f64,
        /// Offset.
        c: f64,
    },
}

impl<P> SamplerSpec<P> {
    /// The kind this spec builds.
    pub fn kind(&self) -> SamplerKind {
        match self {
            SamplerSpec::Uniform { .. } => SamplerKind::Uniform,
            SamplerSpec::Space { .. } => SamplerKind::Space,
            SamplerSpec::TimeSpace { .. } => SamplerKind::TimeSpace,
            SamplerSpec::RadV1 { .. } => SamplerKind::RadV1,
            SamplerSpec::RadV2 { .. } => SamplerKind::RadV2,
        }
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builds a sampler from `spec` and configures it with `batch_size` and `key`.
pub fn build_sampler<P: 'static>(
    spec: SamplerSpec<P>,
    batch_size: usize,
    key: RandomKey,
    num_lanes: usize,
) -> Result<Box<dyn Sampler>> {
    let mut sampler: Box<dyn Sampler> = match spec {
        SamplerSpec::Uniform { domain } => Box::new(UniformSampler::new(domain, num_lanes)?),
        SamplerSpec::Space { coords } => Box::new(SpaceSampler::new(coords, num_lanes)?),
        SamplerSpec::TimeSpace { temporal, coords } => {
            Box::new(TimeSpaceSampler::new(temporal, coords, num_lanes)?)
        }
        SamplerSpec::RadV1 { grid, model, floor } => {
            Box::new(RadSampler::new(grid, model, floor, num_lanes)?)
        }
        SamplerSpec::RadV2 { x, y_hat, k, c } => {
            Box::new(RadSamplerTwo::new(x, &y_hat, k, c, num_lanes)?)
        }
    };
    sampler.configure_with_key(batch_size, key)?;
    Ok(sampler)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("random".parse::<SamplerKind>().unwrap(), SamplerKind::Uniform);
        assert_eq!("uniform".parse::<SamplerKind>().unwrap(), SamplerKind::Uniform);
        assert_eq!("space".parse::<SamplerKind>().unwrap(), SamplerKind::Space);
        assert_eq!("time_space".parse::<SamplerKind>().unwrap(), SamplerKind::TimeSpace);
        assert_eq!("rad".parse::<SamplerKind>().unwrap(), SamplerKind::RadV1);
        assert_eq!("RAD2".parse::<SamplerKind>().unwrap(), SamplerKind::RadV2);

        let err = "sobol".parse::<SamplerKind>().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("sobol"));
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for kind in SamplerKind::ALL {
            assert_eq!(kind.as_str().parse::<SamplerKind>().unwrap(), kind);
        }
        assert!(SamplerKind::RadV1.is_adaptive());
        assert!(SamplerKind::RadV2.is_adaptive());
        assert!(!SamplerKind::Uniform.is_adaptive());
    }

    #[test]
    fn test_serde_uses_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            kind: SamplerKind,
        }
        let w: Wrapper = serde_json::from_str(r#"{"kind":"random"}"#).unwrap();
        assert_eq!(w.kind, SamplerKind::Uniform);
        assert_eq!(
            serde_json::to_string(&Wrapper { kind: SamplerKind::RadV2 }).unwrap(),
            r#"{"kind":"rad2"}"#
        );
        assert!(serde_json::from_str::<Wrapper>(r#"{"kind":"bogus"}"#).is_err());
    }

    #[test]
    fn test_build_configures() {
        let spec: SamplerSpec<()> = SamplerSpec::Uniform {
            domain: Domain::interval(0.0, 1.0).unwrap(),
        };
        assert_eq!(spec.kind(), SamplerKind::Uniform);
        let mut sampler = build_sampler(spec, 12, RandomKey::new(1), 3).unwrap();
        assert_eq!(sampler.next_batch().unwrap().shape(), [3, 12, 1]);
    }

    #[test]
    fn test_build_rejects_bad_spec() {
        let spec: SamplerSpec<()> = SamplerSpec::Space {
            coords: Points::column(Vec::new()),
        };
        assert!(build_sampler(spec, 4, RandomKey::new(1), 1).err().unwrap().is_configuration());

        let spec: SamplerSpec<()> = SamplerSpec::Uniform {
            domain: Domain::interval(0.0, 1.0).unwrap(),
        };
        assert!(build_sampler(spec, 0, RandomKey::new(1), 1).err().unwrap().is_configuration());
    }
}

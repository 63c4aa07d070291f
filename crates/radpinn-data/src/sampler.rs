//! Samplers - Collocation Point Strategies
//!
//! The [`Sampler`] contract and the static sampling strategies. A sampler is
//! configured once with a batch size and a seed; every `next_batch()` call
//! then splits its key, fans point generation out over the lanes on the
//! rayon pool and stacks the lanes into a [`Batch`].
//!
//! # Key Features
//! - One independent sub-key per lane, derived by splitting
//! - Bit-identical replay for a fixed seed
//! - A retired sampler hands its key back as a [`SamplerContext`]
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rayon::prelude::*;

use crate::batch::Batch;
use crate::distribution::SamplingDistribution;
use crate::domain::Domain;
use crate::error::{Result, SamplerError};
use crate::key::RandomKey;
use crate::points::Points;

// =============================================================================
// SamplerState
// =============================================================================

struct Configured {
    batch_size: usize,
    key: Option<RandomKey>,
}

/// Lane count, batch size and the current key of a sampler.
///
/// Created unconfigured. Every batch request consumes the key once: it is
/// split into the next key and a per-call key, and the per-call key is split
/// into one key per lane.
pub struct SamplerState {
    name: &'static str,
    num_lanes: usize,
    configured: Option<Configured>,
}

impl SamplerState {
    /// Creates an unconfigured state.
    pub fn new(name: &'static str, num_lanes: usize) -> Result<Self> {
        if num_lanes == 0 {
            return Err(SamplerError::config(format!(
                "sampler '{name}' needs at least one lane"
            )));
        }
        Ok(Self {
            name,
            num_lanes,
            configured: None,
        })
    }

    /// Sets the batch size and key.
    pub fn configure(&mut self, batch_size: usize, key: RandomKey) -> Result<()> {
        if batch_size == 0 {
            return Err(SamplerError::config(format!(
                "sampler '{}' batch size must be > 0",
                self.name
            )));
        }
        self.configured = Some(Configured {
            batch_size,
            key: Some(key),
        });
        Ok(())
    }

    /// Consumes the key for one batch request.
    ///
    /// Returns the batch size and one key per lane.
    pub fn advance(&mut self) -> Result<(usize, Vec<RandomKey>)> {
        let uninitialized = SamplerError::Uninitialized { sampler: self.name };
        let configured = self.configured.as_mut().ok_or(uninitialized.clone())?;
        let key = configured.key.take().ok_or(uninitialized)?;

        let (next, sub) = key.split();
        configured.key = Some(next);
        Ok((configured.batch_size, sub.split_n(self.num_lanes)))
    }

    /// Removes the current key, leaving the state unusable.
    pub fn take_key(&mut self) -> Option<RandomKey> {
        self.configured.as_mut().and_then(|c| c.key.take())
    }

    /// Sampler name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of lanes.
    pub fn num_lanes(&self) -> usize {
        self.num_lanes
    }

    /// Configured batch size, if any.
    pub fn batch_size(&self) -> Option<usize> {
        self.configured.as_ref().map(|c| c.batch_size)
    }
}

// =============================================================================
// SamplerContext
// =============================================================================

/// What a retired sampler hands back to the controller.
#[derive(Debug, Default)]
pub struct SamplerContext {
    /// The key the sampler would have used for its next batch.
    pub key: Option<RandomKey>,
    /// The RAD evaluation grid, if the sampler had one.
    pub grid: Option<Points>,
}

// =============================================================================
// Sampler Trait
// =============================================================================

/// Trait for all collocation samplers.
pub trait Sampler: Send + Sync {
    /// Shared lifecycle state.
    fn state(&self) -> &SamplerState;

    /// Mutable lifecycle state.
    fn state_mut(&mut self) -> &mut SamplerState;

    /// Dimension of the generated points.
    fn dim(&self) -> usize;

    /// Sampler name, as used in logs and errors.
    fn name(&self) -> &'static str {
        self.state().name()
    }

    /// Stores the batch size and derives the key from `seed`.
    fn configure(&mut self, batch_size: usize, seed: u64) -> Result<()> {
        self.configure_with_key(batch_size, RandomKey::new(seed))
    }

    /// Stores the batch size and an explicit key.
    fn configure_with_key(&mut self, batch_size: usize, key: RandomKey) -> Result<()> {
        self.state_mut().configure(batch_size, key)
    }

    /// Runs once per batch request, before the lane fan-out.
    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    /// Generates one lane of `batch_size` points from `key`.
    fn generate(&self, key: RandomKey, batch_size: usize) -> Result<Points> {
        let _ = (key, batch_size);
        Err(SamplerError::NotImplemented {
            sampler: self.name(),
        })
    }

    /// Draws the next batch.
    fn next_batch(&mut self) -> Result<Batch> {
        let (batch_size, keys) = self.state_mut().advance()?;
        self.prepare()?;

        let this = &*self;
        let lanes = keys
            .into_par_iter()
            .map(|key| this.generate(key, batch_size))
            .collect::<Result<Vec<_>>>()?;
        Batch::from_lanes(lanes)
    }

    /// Candidate grid for residual-adaptive samplers.
    fn evaluation_grid(&self) -> Option<&Points> {
        None
    }

    /// Distribution used by the most recent batch, for adaptive samplers.
    fn distribution(&self) -> Option<&SamplingDistribution> {
        None
    }

    /// Retires the sampler, handing back its key.
    fn retire(mut self: Box<Self>) -> SamplerContext {
        SamplerContext {
            key: self.state_mut().take_key(),
            grid: None,
        }
    }

    /// Infinite iterator over batches.
    fn batches(&mut self) -> Batches<'_, Self>
    where
        Self: Sized,
    {
        Batches::new(self)
    }
}

/// Infinite iterator of `next_batch()` results.
pub struct Batches<'a, S: ?Sized> {
    sampler: &'a mut S,
}

impl<'a, S: Sampler + ?Sized> Batches<'a, S> {
    /// Wraps a sampler; works for trait objects too.
    pub fn new(sampler: &'a mut S) -> Self {
        Self { sampler }
    }
}

impl<S: Sampler + ?Sized> Iterator for Batches<'_, S> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.sampler.next_batch())
    }
}

// =============================================================================
// BaseSampler
// =============================================================================

/// The bare contract: configurable, but generates nothing.
pub struct BaseSampler {
    state: SamplerState,
    dim: usize,
}

impl BaseSampler {
    /// Creates a base sampler for points of dimension `dim`.
    pub fn new(dim: usize, num_lanes: usize) -> Result<Self> {
        Ok(Self {
            state: SamplerState::new("base", num_lanes)?,
            dim,
        })
    }
}

impl Sampler for BaseSampler {
    fn state(&self) -> &SamplerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SamplerState {
        &mut self.state
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

// =============================================================================
// UniformSampler
// =============================================================================

/// Each coordinate independently uniform within the domain bounds.
pub struct UniformSampler {
    state: SamplerState,
    domain: Domain,
    uniforms: Vec<Uniform<f64>>,
}

impl UniformSampler {
    /// Creates a uniform sampler over `domain`.
    pub fn new(domain: Domain, num_lanes: usize) -> Result<Self> {
        let uniforms = domain.uniforms();
        Ok(Self {
            state: SamplerState::new("uniform", num_lanes)?,
            domain,
            uniforms,
        })
    }

    /// The sampled domain.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }
}

impl Sampler for UniformSampler {
    fn state(&self) -> &SamplerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SamplerState {
        &mut self.state
    }

    fn dim(&self) -> usize {
        self.domain.dim()
    }

    fn generate(&self, key: RandomKey, batch_size: usize) -> Result<Points> {
        let mut rng = key.into_rng();
        let mut data = Vec::with_capacity(batch_size * self.dim());
        for _ in 0..batch_size {
            data.extend(self.uniforms.iter().map(|u| u.sample(&mut rng)));
        }
        Points::new(data, self.dim())
    }
}

// =============================================================================
// SpaceSampler
// =============================================================================

fn draw_rows<R: Rng + ?Sized>(rng: &mut R, coords: &Points, n: usize) -> Points {
    let rows = coords.rows();
    let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..rows)).collect();
    coords.select(&indices)
}

fn check_coords(name: &str, coords: &Points) -> Result<()> {
    if coords.is_empty() {
        return Err(SamplerError::config(format!(
            "sampler '{name}' needs a non-empty coordinate table"
        )));
    }
    Ok(())
}

/// Rows drawn uniformly with replacement from a fixed coordinate table.
pub struct SpaceSampler {
    state: SamplerState,
    coords: Points,
}

impl SpaceSampler {
    /// Creates a space sampler over the rows of `coords`.
    pub fn new(coords: Points, num_lanes: usize) -> Result<Self> {
        check_coords("space", &coords)?;
        Ok(Self {
            state: SamplerState::new("space", num_lanes)?,
            coords,
        })
    }

    /// The coordinate table.
    pub fn coords(&self) -> &Points {
        &self.coords
    }
}

impl Sampler for SpaceSampler {
    fn state(&self) -> &SamplerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SamplerState {
        &mut self.state
    }

    fn dim(&self) -> usize {
        self.coords.dim()
    }

    fn generate(&self, key: RandomKey, batch_size: usize) -> Result<Points> {
        Ok(draw_rows(&mut key.into_rng(), &self.coords, batch_size))
    }
}

// =============================================================================
// TimeSpaceSampler
// =============================================================================

/// A uniform time column followed by rows of a spatial coordinate table.
pub struct TimeSpaceSampler {
    state: SamplerState,
    temporal: Domain,
    time: Uniform<f64>,
    coords: Points,
}

impl TimeSpaceSampler {
    /// Creates a time-space sampler. `temporal` must be one-dimensional.
    pub fn new(temporal: Domain, coords: Points, num_lanes: usize) -> Result<Self> {
        if temporal.dim() != 1 {
            return Err(SamplerError::config(format!(
                "temporal domain must be one-dimensional, got {} dimensions",
                temporal.dim()
            )));
        }
        check_coords("time_space", &coords)?;
        let (lo, hi) = temporal.bound(0);
        Ok(Self {
            state: SamplerState::new("time_space", num_lanes)?,
            time: Uniform::new(lo, hi),
            temporal,
            coords,
        })
    }

    /// The temporal interval.
    pub fn temporal(&self) -> &Domain {
        &self.temporal
    }
}

impl Sampler for TimeSpaceSampler {
    fn state(&self) -> &SamplerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SamplerState {
        &mut self.state
    }

    fn dim(&self) -> usize {
        1 + self.coords.dim()
    }

    fn generate(&self, key: RandomKey, batch_size: usize) -> Result<Points> {
        let (time_key, space_key) = key.split();

        let mut rng = time_key.into_rng();
        let t = Points::column((0..batch_size).map(|_| self.time.sample(&mut rng)).collect());
        let x = draw_rows(&mut space_key.into_rng(), &self.coords, batch_size);
        t.hstack(&x)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(num_lanes: usize) -> UniformSampler {
        UniformSampler::new(Domain::interval(0.001, 1.0).unwrap(), num_lanes).unwrap()
    }

    #[test]
    fn test_uninitialized() {
        let mut sampler = uniform(2);
        let err = sampler.next_batch().unwrap_err();
        assert_eq!(err, SamplerError::Uninitialized { sampler: "uniform" });
    }

    #[test]
    fn test_configure_validation() {
        let mut sampler = uniform(2);
        assert!(sampler.configure(0, 1).unwrap_err().is_configuration());
        assert!(UniformSampler::new(Domain::interval(0.0, 1.0).unwrap(), 0).is_err());
    }

    #[test]
    fn test_base_sampler_not_implemented() {
        let mut sampler = BaseSampler::new(1, 2).unwrap();
        sampler.configure(8, 1234).unwrap();
        let err = sampler.next_batch().unwrap_err();
        assert_eq!(err, SamplerError::NotImplemented { sampler: "base" });
    }

    #[test]
    fn test_uniform_batch_shape_and_bounds() {
        let mut sampler = uniform(4);
        sampler.configure(64, 1234).unwrap();
        let batch = sampler.next_batch().unwrap();
        assert_eq!(batch.shape(), [4, 64, 1]);
        assert!(batch
            .lanes()
            .iter()
            .flat_map(|l| l.as_slice())
            .all(|&x| (0.001..1.0).contains(&x)));

        // Sibling lanes draw different points.
        assert_ne!(batch.lane(0), batch.lane(1));
    }

    #[test]
    fn test_uniform_box() {
        let domain = Domain::new(vec![(0.0, 1.0), (-5.0, -4.0)]).unwrap();
        let mut sampler = UniformSampler::new(domain.clone(), 1).unwrap();
        sampler.configure(100, 9).unwrap();
        let batch = sampler.next_batch().unwrap();
        assert_eq!(batch.dim(), 2);
        assert!(batch.lane(0).iter_rows().all(|p| domain.contains(p)));
    }

    #[test]
    fn test_batches_iterator() {
        let mut sampler = uniform(1);
        sampler.configure(16, 5).unwrap();
        let batches: Vec<Batch> = sampler.batches().take(3).map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 3);
        assert_ne!(batches[0], batches[1]);
        assert_ne!(batches[1], batches[2]);
    }

    #[test]
    fn test_batches_on_trait_object() {
        let mut boxed: Box<dyn Sampler> = Box::new(uniform(1));
        boxed.configure(4, 5).unwrap();
        let mut iter = Batches::new(boxed.as_mut());
        assert_eq!(iter.next().unwrap().unwrap().shape(), [1, 4, 1]);
    }

    #[test]
    fn test_space_sampler_rows_from_table() {
        let coords = Points::new(vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0], 2).unwrap();
        let mut sampler = SpaceSampler::new(coords.clone(), 2).unwrap();
        sampler.configure(20, 7).unwrap();
        let batch = sampler.next_batch().unwrap();
        assert_eq!(batch.shape(), [2, 20, 2]);
        for lane in batch.lanes() {
            assert!(lane
                .iter_rows()
                .all(|row| coords.iter_rows().any(|c| c == row)));
        }

        assert!(matches!(
            SpaceSampler::new(Points::column(Vec::new()), 1),
            Err(e) if e.is_configuration()
        ));
    }

    #[test]
    fn test_time_space_columns() {
        let coords = Points::new(vec![5.0, 6.0, 7.0, 8.0], 2).unwrap();
        let temporal = Domain::interval(0.0, 0.5).unwrap();
        let mut sampler = TimeSpaceSampler::new(temporal, coords.clone(), 1).unwrap();
        sampler.configure(32, 11).unwrap();
        assert_eq!(sampler.dim(), 3);

        let batch = sampler.next_batch().unwrap();
        assert_eq!(batch.shape(), [1, 32, 3]);
        for row in batch.lane(0).iter_rows() {
            assert!((0.0..0.5).contains(&row[0]));
            assert!(coords.iter_rows().any(|c| c == &row[1..]));
        }

        let wide = Domain::new(vec![(0.0, 1.0), (0.0, 1.0)]).unwrap();
        assert!(TimeSpaceSampler::new(wide, coords, 1).is_err());
    }

    #[test]
    fn test_retire_returns_next_key() {
        let mut reference = uniform(2);
        reference.configure(8, 77).unwrap();
        reference.next_batch().unwrap();
        let expected = reference.next_batch().unwrap();

        let mut outgoing = uniform(2);
        outgoing.configure(8, 77).unwrap();
        outgoing.next_batch().unwrap();
        let context = (Box::new(outgoing) as Box<dyn Sampler>).retire();
        assert!(context.grid.is_none());

        let mut replacement = uniform(2);
        replacement
            .configure_with_key(8, context.key.unwrap())
            .unwrap();
        assert_eq!(replacement.next_batch().unwrap(), expected);
    }
}

//! Random Keys - Splittable Seeded Random State
//!
//! A [`RandomKey`] is an opaque 256-bit seed. Keys are split, never
//! incremented: splitting consumes the parent and yields independent children
//! derived through a ChaCha20 stream, so lanes that receive sibling keys draw
//! uncorrelated samples.
//!
//! Keys are neither `Clone` nor `Copy`. Once a key has been split or turned
//! into a generator it is gone, which rules out accidental reuse.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::fmt;

use rand::{RngCore, SeedableRng};
use rand_chacha::{ChaCha20Rng, ChaCha8Rng};

/// Stream used when splitting. Splits read from the start of the stream.
const SPLIT_STREAM: u64 = 0;

/// Word position `fold_in` reads from, on stream `data`. Splits never reach
/// it, so folded keys and split children cannot coincide for any `data`.
const FOLD_WORD_POS: u128 = 1 << 64;

// =============================================================================
// RandomKey
// =============================================================================

/// Opaque, splittable random key.
pub struct RandomKey {
    seed: [u8; 32],
}

impl RandomKey {
    /// Creates a key from an integer seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::draw(&mut rng)
    }

    fn draw(rng: &mut ChaCha20Rng) -> Self {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        Self { seed }
    }

    fn stream(&self, stream: u64) -> ChaCha20Rng {
        let mut rng = ChaCha20Rng::from_seed(self.seed);
        rng.set_stream(stream);
        rng
    }

    /// Splits the key into two children, consuming it.
    #[must_use]
    pub fn split(self) -> (Self, Self) {
        let mut rng = self.stream(SPLIT_STREAM);
        let first = Self::draw(&mut rng);
        let second = Self::draw(&mut rng);
        (first, second)
    }

    /// Splits the key into `n` children, consuming it.
    ///
    /// `split_n(2)` yields the same pair as [`split`](Self::split).
    #[must_use]
    pub fn split_n(self, n: usize) -> Vec<Self> {
        let mut rng = self.stream(SPLIT_STREAM);
        (0..n).map(|_| Self::draw(&mut rng)).collect()
    }

    /// Derives a key bound to `data`, consuming the parent.
    #[must_use]
    pub fn fold_in(self, data: u64) -> Self {
        let mut rng = self.stream(data);
        rng.set_word_pos(FOLD_WORD_POS);
        Self::draw(&mut rng)
    }

    /// Turns the key into a generator for a single draw procedure.
    #[must_use]
    pub fn into_rng(self) -> ChaCha8Rng {
        ChaCha8Rng::from_seed(self.seed)
    }

    /// Short, non-secret identifier of the key for logs and tests.
    pub fn fingerprint(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.seed[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl fmt::Debug for RandomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RandomKey({:016x})", self.fingerprint())
    }
}

// =============================================================================
// Tests
// =============================================================================

//! # Coherent Noise
//!
//! Seeded 2D simplex noise plus the fractal (fBm) sum used for the terrain
//! fields.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, this implementation produces exactly the same
//! values on any platform. The permutation table is shuffled with ChaCha8,
//! whose output is specified independently of the host.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., route generation).
    ///
    /// Uses a hash mix so that each purpose gets an independent stream.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// A fresh ChaCha8 generator seeded from this seed.
    #[must_use]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xC0FF_EE00_D15E_A5E5)
    }
}

/// 12 gradient directions for 2D simplex.
const GRADIENTS: [[i8; 2]; 12] = [
    [1, 0], [1, 1], [0, 1], [-1, 1],
    [-1, 0], [-1, -1], [0, -1], [1, -1],
    [1, 0], [0, 1], [-1, 0], [0, -1],
];

/// 2D Simplex noise generator.
///
/// `sample` is in `[-1, 1]`; `fractal` is normalized to `[0, 1]`.
pub struct SimplexNoise {
    /// 256 shuffled entries, doubled to avoid index wrapping.
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut seed.rng());

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = (x + skew).floor() as i64;
        let j = (y + skew).floor() as i64;

        let unskew = (i + j) as f64 * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);

        // Upper or lower triangle of the skewed cell
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + Self::G2;
        let y1 = y0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let g0 = self.hash(ii + self.hash(jj) as usize);
        let g1 = self.hash(ii + i1 + self.hash(jj + j1) as usize);
        let g2 = self.hash(ii + 1 + self.hash(jj + 1) as usize);

        let n = corner(x0, y0, g0) + corner(x1, y1, g1) + corner(x2, y2, g2);

        // 70 scales the corner sum to roughly [-1, 1]
        (70.0 * n).clamp(-1.0, 1.0)
    }

    /// Fractal Brownian motion normalized to `[0, 1]`.
    ///
    /// Each octave doubles the frequency and halves the amplitude; the sum is
    /// divided by the total amplitude so the range does not depend on
    /// `octaves`. Zero octaves is treated as one.
    #[must_use]
    pub fn fractal(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.max(1) {
            total += (self.sample(x * frequency, y * frequency) + 1.0) * 0.5 * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        (total / max_amplitude).clamp(0.0, 1.0)
    }
}

/// Contribution from one corner of the simplex.
#[inline]
fn corner(x: f64, y: f64, hash: u8) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let grad = GRADIENTS[(hash % 12) as usize];
        let t2 = t * t;
        t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
    }
}

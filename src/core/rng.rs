//! Deterministic random stream for cosmetic orb axes.
//!
//! Rotation axes never influence the rules, but peers seeded identically and
//! fed the same move sequence still produce identical boards, which keeps
//! whole-board equality checks meaningful across peers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha8 stream that hands out orb rotation axes.
#[derive(Clone, Debug)]
pub struct CosmeticRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl CosmeticRng {
    /// Create a new stream with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from its seed.
    pub fn reset(&mut self) {
        self.inner = ChaCha8Rng::seed_from_u64(self.seed);
    }

    /// Draw a rotation axis in `[-1,1) x [-3,3) x [-4,4)`.
    ///
    /// Never returns the zero vector.
    pub fn rotation_axes(&mut self) -> [f32; 3] {
        let mut axes = [
            2.0 * self.inner.gen::<f32>() - 1.0,
            6.0 * self.inner.gen::<f32>() - 3.0,
            8.0 * self.inner.gen::<f32>() - 4.0,
        ];
        if axes == [0.0; 3] {
            for a in &mut axes {
                *a += self.inner.gen_range(f32::EPSILON..1.0);
            }
        }
        axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut a = CosmeticRng::new(42);
        let mut b = CosmeticRng::new(42);

        for _ in 0..50 {
            assert_eq!(a.rotation_axes(), b.rotation_axes());
        }
    }

    #[test]
    fn test_reset() {
        let mut rng = CosmeticRng::new(9);
        let first = rng.rotation_axes();
        rng.rotation_axes();

        rng.reset();
        assert_eq!(rng.rotation_axes(), first);
        assert_eq!(rng.seed(), 9);
    }

    #[test]
    fn test_axes_ranges() {
        let mut rng = CosmeticRng::new(1);

        for _ in 0..500 {
            let [x, y, z] = rng.rotation_axes();
            assert!((-1.0..1.0).contains(&x));
            assert!((-3.0..3.0).contains(&y));
            assert!((-4.0..4.0).contains(&z));
            assert_ne!([x, y, z], [0.0; 3]);
        }
    }
}

//! Seeded random draws for AI timing.

use rand::Rng;

/// Normal draw centred between `min` and `max`, clamped to them.
///
/// Marsaglia polar method; sigma puts both bounds three deviations out, so
/// clamping only trims the far tails.
pub fn gaussian_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let mean = (min + max) * 0.5;
    let sigma = (max - mean) / 3.0;
    if sigma <= 0.0 {
        return mean;
    }

    loop {
        let u = rng.gen_range(-1.0f32..1.0);
        let v = rng.gen_range(-1.0f32..1.0);
        let s = u * u + v * v;
        if s > 0.0 && s < 1.0 {
            let z = u * (-2.0 * s.ln() / s).sqrt();
            return (mean + z * sigma).clamp(min, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_stays_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10_000 {
            let v = gaussian_between(&mut rng, 1.2, 1.8);
            assert!((1.2..=1.8).contains(&v));
        }
    }

    #[test]
    fn test_centred_on_midpoint() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let n = 20_000;
        let mean: f32 = (0..n).map(|_| gaussian_between(&mut rng, 0.8, 1.2)).sum::<f32>() / n as f32;
        assert!((mean - 1.0).abs() < 0.01, "mean was {mean}");
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(gaussian_between(&mut rng, 2.0, 2.0), 2.0);
        assert!((0.8..=1.2).contains(&gaussian_between(&mut rng, 1.2, 0.8)));
    }
}

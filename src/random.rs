// Scalar helpers shared by every entity: random-in-range and straight-line distance.

use rand::Rng;

/// Uniform float in `[min, max)`. Returns `min` when the range is empty.
#[inline]
pub fn random<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Euclidean distance between (x1,y1) and (x2,y2).
#[inline]
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random(&mut rng, 50.0, 70.0);
            assert!((50.0..70.0).contains(&v));
        }
    }

    #[test]
    fn test_random_empty_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(random(&mut rng, 3.0, 3.0), 3.0);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
        assert_eq!(distance(1.0, 1.0, 1.0, 1.0), 0.0);
    }
}

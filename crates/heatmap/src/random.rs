//! Random datasets for demos and load testing.

use heatmap_common::{DataPoint, DataSet};
use rand::Rng;

/// Upper bound for a random dataset's maximum.
const MAX_RANDOM_MAX: u32 = 1000;

/// Random dataset construction.
pub trait RandomDataSet {
    /// `points` random points on a `width` x `height` surface.
    ///
    /// The maximum is drawn from `1..=1000`; each point gets `x` in
    /// `1..=width`, `y` in `1..=height` and a count in `1..=max`.
    fn random<R: Rng + ?Sized>(points: usize, width: u32, height: u32, rng: &mut R) -> Self;
}

impl RandomDataSet for DataSet {
    fn random<R: Rng + ?Sized>(points: usize, width: u32, height: u32, rng: &mut R) -> Self {
        let max = rng.gen_range(1..=MAX_RANDOM_MAX);
        let data = (0..points)
            .map(|_| {
                DataPoint::new(
                    rng.gen_range(1..=width.max(1)),
                    rng.gen_range(1..=height.max(1)),
                    rng.gen_range(1..=max) as f64,
                )
            })
            .collect();
        DataSet::new(max as f64, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_dataset_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let dataset = DataSet::random(500, 40, 30, &mut rng);

        assert_eq!(dataset.data.len(), 500);
        assert!((1.0..=1000.0).contains(&dataset.max));
        assert_eq!(dataset.max.fract(), 0.0);
        for point in &dataset.data {
            assert!((1..=40).contains(&point.x));
            assert!((1..=30).contains(&point.y));
            assert!(point.count >= 1.0 && point.count <= dataset.max);
        }
        dataset.validate().unwrap();
    }

    #[test]
    fn test_random_dataset_is_seed_stable() {
        let a = DataSet::random(20, 100, 100, &mut StdRng::seed_from_u64(42));
        let b = DataSet::random(20, 100, 100, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}

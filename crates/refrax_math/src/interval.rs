use serde::{Deserialize, Serialize};

/// A closed range of real values, used for refractive index sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Value at `alpha` of the way from min to max.
    pub fn lerp(&self, alpha: f64) -> f64 {
        self.min + alpha * self.size()
    }

    /// `n` evenly spaced values from min to max, both ends included.
    ///
    /// A single sample sits at min.
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let last = (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        // Pin the last sample so max is hit exactly
                        if i == n - 1 {
                            self.max
                        } else {
                            self.lerp(i as f64 / last)
                        }
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_creation() {
        let interval = Interval::new(0.0, 10.0);
        assert_eq!(interval.min, 0.0);
        assert_eq!(interval.max, 10.0);
    }

    #[test]
    fn test_interval_size() {
        let interval = Interval::new(2.0, 7.0);
        assert_eq!(interval.size(), 5.0);

        let negative = Interval::new(-5.0, 5.0);
        assert_eq!(negative.size(), 10.0);
    }

    #[test]
    fn test_interval_lerp() {
        let interval = Interval::new(1.3, 1.4);

        assert_eq!(interval.lerp(0.0), 1.3);
        assert!((interval.lerp(0.5) - 1.35).abs() < 1e-12);
        assert_eq!(Interval::new(2.0, 2.0).lerp(0.7), 2.0);
    }

    #[test]
    fn test_linspace_endpoints() {
        let samples = Interval::new(1.3, 1.4).linspace(200);

        assert_eq!(samples.len(), 200);
        assert_eq!(samples[0], 1.3);
        assert_eq!(samples[199], 1.4);
        assert!(samples.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_linspace_small_counts() {
        let interval = Interval::new(0.0, 1.0);

        assert!(interval.linspace(0).is_empty());
        assert_eq!(interval.linspace(1), vec![0.0]);
        assert_eq!(interval.linspace(3), vec![0.0, 0.5, 1.0]);
    }
}

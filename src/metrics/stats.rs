//! Summary statistics over duration samples
//!
//! Mean and variance use truncating integer arithmetic: durations are whole
//! nanoseconds and the harness targets order-of-magnitude comparisons, not
//! sub-nanosecond precision. Accumulation happens in i128 because squared
//! nanosecond deviations overflow i64 for second-scale samples.

/// Mean, standard deviation, and extrema of one sample list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    /// Truncating integer mean, nanoseconds.
    pub mean_ns: i64,
    /// Square root of the truncating integer variance.
    pub stddev_ns: f64,
    /// Smallest sample, nanoseconds.
    pub min_ns: i64,
    /// Largest sample, nanoseconds.
    pub max_ns: i64,
}

impl SummaryStats {
    /// Compute statistics over `samples`. Returns `None` for an empty list.
    pub fn from_samples(samples: &[i64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len() as i128;
        let sum: i128 = samples.iter().map(|&v| v as i128).sum();
        let mean = sum / count;

        let squared_deviations: i128 = samples
            .iter()
            .map(|&v| {
                let d = v as i128 - mean;
                d * d
            })
            .sum();
        let variance = squared_deviations / count;

        let mut min = samples[0];
        let mut max = samples[0];
        for &v in &samples[1..] {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }

        Some(Self {
            mean_ns: mean as i64,
            stddev_ns: (variance as f64).sqrt(),
            min_ns: min,
            max_ns: max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equal_samples() {
        let stats = SummaryStats::from_samples(&[500; 8]).unwrap();
        assert_eq!(stats.mean_ns, 500);
        assert_eq!(stats.stddev_ns, 0.0);
        assert_eq!(stats.min_ns, 500);
        assert_eq!(stats.max_ns, 500);
    }

    #[test]
    fn test_mean_truncates() {
        // (1 + 2) / 2 == 1 under integer division.
        let stats = SummaryStats::from_samples(&[1, 2]).unwrap();
        assert_eq!(stats.mean_ns, 1);
    }

    #[test]
    fn test_min_max_bound_every_sample() {
        let samples = [900, 150, 4200, 377, 377, 2, 999];
        let stats = SummaryStats::from_samples(&samples).unwrap();
        assert_eq!(stats.min_ns, 2);
        assert_eq!(stats.max_ns, 4200);
        for v in samples {
            assert!(stats.min_ns <= v && v <= stats.max_ns);
        }
    }

    #[test]
    fn test_known_stddev() {
        // Deviations from mean 30 are -20 and +20; variance 400, stddev 20.
        let stats = SummaryStats::from_samples(&[10, 50]).unwrap();
        assert_eq!(stats.mean_ns, 30);
        assert_eq!(stats.stddev_ns, 20.0);
    }

    #[test]
    fn test_second_scale_samples_do_not_overflow() {
        // Squared deviations near (2e9)^2 exceed i64; i128 accumulation holds.
        let second = 1_000_000_000i64;
        let stats = SummaryStats::from_samples(&[second, 3 * second]).unwrap();
        assert_eq!(stats.mean_ns, 2 * second);
        assert_eq!(stats.stddev_ns, second as f64);
    }

    #[test]
    fn test_empty_input() {
        assert!(SummaryStats::from_samples(&[]).is_none());
    }
}

//! Outlier trimming for skewed count samples.
//!
//! Casualty and vehicle counts near busy junctions occasionally contain a
//! single freak incident that dominates the mean. Before averaging, the
//! sample is trimmed by repeatedly dropping the largest value until its
//! spread falls back under the threshold.

/// Population standard deviation above which a sample is considered
/// spiked.
pub const SPREAD_THRESHOLD: f64 = 5.0;

/// Returns a copy of `values` with maximal elements removed one at a time
/// until the population standard deviation is at most
/// [`SPREAD_THRESHOLD`].
///
/// The input is never mutated. A sample whose spread is already within the
/// threshold comes back unchanged, in its original order. Termination is
/// guaranteed: each round removes exactly one element and a sample of
/// length <= 1 has zero deviation, so at most `len - 1` rounds run. A
/// sample that never settles is trimmed all the way down to one value;
/// that is accepted trimming behavior, not an error.
#[must_use]
pub fn trim_outliers(values: &[f64]) -> Vec<f64> {
    let mut sample = values.to_vec();
    while sample.len() > 1 && population_std_dev(&sample) > SPREAD_THRESHOLD {
        if let Some(max_index) = index_of_max(&sample) {
            sample.remove(max_index);
        } else {
            break;
        }
    }
    sample
}

/// Population standard deviation (divisor `n`, not `n - 1`). Zero for
/// samples shorter than two elements.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

fn index_of_max(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_settled_samples_unchanged() {
        let values = vec![1.0, 1.0, 2.0, 1.0];
        assert!(population_std_dev(&values) <= SPREAD_THRESHOLD);
        assert_eq!(trim_outliers(&values), values);
    }

    #[test]
    fn drops_a_single_spike() {
        // std of [1, 1, 2, 1, 50] is ~19.5; removing 50 settles it
        let values = vec![1.0, 1.0, 2.0, 1.0, 50.0];
        assert_eq!(trim_outliers(&values), vec![1.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn does_not_mutate_the_input() {
        let values = vec![1.0, 50.0, 1.0];
        let _ = trim_outliers(&values);
        assert_eq!(values, vec![1.0, 50.0, 1.0]);
    }

    #[test]
    fn removes_exactly_one_maximum_per_round() {
        // Two equal spikes: only one of them goes per round
        let values = vec![1.0, 40.0, 40.0];
        let trimmed = trim_outliers(&values);
        assert!(trimmed.len() < values.len());
        assert!(population_std_dev(&trimmed) <= SPREAD_THRESHOLD);
    }

    #[test]
    fn never_settling_sample_trims_down_to_one_value() {
        // Geometric growth keeps the spread above threshold until one
        // element remains
        let values = vec![1.0, 100.0, 10_000.0, 1_000_000.0];
        assert_eq!(trim_outliers(&values), vec![1.0]);
    }

    #[test]
    fn short_samples_have_zero_deviation() {
        assert!((population_std_dev(&[]) - 0.0).abs() < f64::EPSILON);
        assert!((population_std_dev(&[42.0]) - 0.0).abs() < f64::EPSILON);
        assert_eq!(trim_outliers(&[42.0]), vec![42.0]);
    }
}

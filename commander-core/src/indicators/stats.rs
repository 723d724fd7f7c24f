//! Sample statistics over return series.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). 0.0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Sample standard deviation of the strictly negative values only.
pub fn downside_std_dev(values: &[f64]) -> f64 {
    let negatives: Vec<f64> = values.iter().copied().filter(|&r| r < 0.0).collect();
    sample_std_dev(&negatives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn std_dev_known_value() {
        // mean 5, squared deviations sum 32, n-1 = 7 -> sqrt(32/7)
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_approx(sample_std_dev(&values), (32.0_f64 / 7.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn std_dev_degenerate_inputs() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[1.0]), 0.0);
        assert_eq!(sample_std_dev(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn downside_ignores_gains() {
        let values = [0.05, -0.01, 0.10, -0.03];
        assert_approx(
            downside_std_dev(&values),
            sample_std_dev(&[-0.01, -0.03]),
            DEFAULT_EPSILON,
        );
        assert_eq!(downside_std_dev(&[0.01, 0.02]), 0.0);
    }
}

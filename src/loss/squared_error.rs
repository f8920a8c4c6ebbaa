use crate::error::{check_width, Result};

pub struct SquaredError;

impl SquaredError {
    /// Σ 0.5·(target − actual)² over one example.
    pub fn total(target: &[f64], actual: &[f64]) -> Result<f64> {
        check_width("error target/actual", target.len(), actual.len())?;
        Ok(target.iter().zip(actual.iter())
            .map(|(t, a)| Self::single(*t, *a))
            .sum())
    }

    pub fn single(target: f64, actual: f64) -> f64 {
        let difference = target - actual;
        0.5 * difference * difference
    }

    /// ∂E/∂actual for one output: `-(target - actual)`.
    pub fn derivative(target: f64, actual: f64) -> f64 {
        -(target - actual)
    }
}

/// The `EvaluateError` entry point; see [`SquaredError::total`].
pub fn error_total(target: &[f64], actual: &[f64]) -> Result<f64> {
    SquaredError::total(target, actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use approx::assert_relative_eq;

    #[test]
    fn half_sum_of_squares() {
        let e = error_total(&[1.0, 0.0, 2.0], &[0.5, 0.0, 4.0]).unwrap();
        assert_relative_eq!(e, 0.125 + 0.0 + 2.0);
    }

    #[test]
    fn perfect_prediction_is_zero() {
        assert_eq!(error_total(&[0.3, -7.0], &[0.3, -7.0]).unwrap(), 0.0);
        assert_eq!(SquaredError::derivative(0.3, 0.3), 0.0);
    }

    #[test]
    fn mismatched_lengths_fail() {
        assert!(matches!(
            error_total(&[1.0], &[1.0, 2.0]),
            Err(NetworkError::DimensionMismatch { expected: 1, actual: 2, .. })
        ));
    }
}

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Categorical cross-entropy loss for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Predictions are clipped into [EPS, 1 - EPS] so log() stays finite.
const EPS: f64 = 1e-10;

impl CrossEntropyLoss {
    /// Total (summed, not averaged) cross-entropy over a batch:
    ///   L = -sum(expected[i][j] * ln(clip(predicted[i][j])))
    ///
    /// Only entries with a non-zero target contribute, which is one term per
    /// row under one-hot labels.
    pub fn loss(expected: &Matrix, predicted: &Matrix) -> Result<f64> {
        if expected.shape() != predicted.shape() {
            return Err(NnError::shape("CrossEntropyLoss::loss", expected.shape(), predicted.shape()));
        }
        Ok(expected.data.iter().zip(&predicted.data)
            .map(|(e_row, p_row)| Self::row_loss(e_row, p_row))
            .sum())
    }

    /// Cross-entropy of a single sample.
    pub fn row_loss(expected: &[f64], predicted: &[f64]) -> f64 {
        expected.iter().zip(predicted)
            .filter(|(e, _)| **e != 0.0)
            .map(|(&e, &p)| -e * p.clamp(EPS, 1.0 - EPS).ln())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::activation::activation::softmax;

    #[test]
    fn perfect_prediction_has_near_zero_loss() {
        let y = Matrix::from_rows(vec![vec![0.0, 1.0, 0.0]]).unwrap();
        let loss = CrossEntropyLoss::loss(&y, &y).unwrap();
        assert!(loss >= 0.0);
        assert!(loss < 1e-9);
    }

    #[test]
    fn zero_probability_is_clipped_not_infinite() {
        let y = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        let p = Matrix::from_rows(vec![vec![0.0, 1.0]]).unwrap();
        let loss = CrossEntropyLoss::loss(&y, &p).unwrap();
        assert!((loss - (-(1e-10f64).ln())).abs() < 1e-9);
    }

    #[test]
    fn sums_over_rows() {
        let y = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let p = Matrix::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        let loss = CrossEntropyLoss::loss(&y, &p).unwrap();
        assert!((loss - 2.0 * 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let y = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        let p = Matrix::from_rows(vec![vec![1.0, 0.0, 0.0]]).unwrap();
        assert!(matches!(
            CrossEntropyLoss::loss(&y, &p),
            Err(NnError::ShapeMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn loss_is_non_negative(
            logits in prop::collection::vec(-20.0..20.0f64, 2..8),
            class in 0usize..8,
        ) {
            let class = class % logits.len();
            let mut target = vec![0.0; logits.len()];
            target[class] = 1.0;
            let loss = CrossEntropyLoss::row_loss(&target, &softmax(&logits));
            prop_assert!(loss >= 0.0);
        }
    }
}

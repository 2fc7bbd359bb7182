use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Index of the maximum element; ties go to the lowest index.
/// Returns 0 for an empty slice.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x > v[best] {
            best = i;
        }
    }
    best
}

/// Fraction of rows whose predicted arg-max matches the label arg-max.
///
/// Returns 0.0 for an empty batch.
pub fn accuracy(predictions: &Matrix, labels: &Matrix) -> Result<f64> {
    check_shapes("accuracy", predictions, labels)?;
    if predictions.rows == 0 {
        return Ok(0.0);
    }
    let correct = predictions.data.iter().zip(&labels.data)
        .filter(|(p, y)| argmax(p) == argmax(y))
        .count();
    Ok(correct as f64 / predictions.rows as f64)
}

/// `classes × classes` counts: row = true class, column = predicted class.
pub fn confusion_matrix(predictions: &Matrix, labels: &Matrix) -> Result<Vec<Vec<usize>>> {
    check_shapes("confusion_matrix", predictions, labels)?;
    let n = labels.cols;
    if n == 0 && labels.rows > 0 {
        return Err(NnError::InvalidConfig("confusion_matrix needs at least one class column".into()));
    }
    let mut counts = vec![vec![0usize; n]; n];
    for (p, y) in predictions.data.iter().zip(&labels.data) {
        counts[argmax(y)][argmax(p)] += 1;
    }
    Ok(counts)
}

fn check_shapes(context: &'static str, predictions: &Matrix, labels: &Matrix) -> Result<()> {
    if predictions.shape() != labels.shape() {
        return Err(NnError::shape(context, labels.shape(), predictions.shape()));
    }
    Ok(())
}

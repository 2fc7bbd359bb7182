use crate::math::matrix::Matrix;

pub fn relu(x: f64) -> f64 {
    if x > 0.0 { x } else { 0.0 }
}

/// Subgradient of ReLU; taken as 0 at the kink.
pub fn relu_derivative(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

/// Numerically stable softmax of a single row.
///
/// The row maximum is subtracted before exponentiating so large logits cannot
/// overflow; the result is unchanged because softmax is shift-invariant.
pub fn softmax(row: &[f64]) -> Vec<f64> {
    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = row.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Applies `softmax` independently to every row, so each sample gets its own
/// probability distribution.
pub fn softmax_rows(logits: &Matrix) -> Matrix {
    Matrix {
        rows: logits.rows,
        cols: logits.cols,
        data: logits.data.iter().map(|row| softmax(row)).collect(),
    }
}

use serde::{Serialize, Deserialize};

/// Selects how the output-layer delta is formed from `labels - output`.
///
/// - `ReluOnOutput`:        multiplies the error by the ReLU derivative of
///   the softmax output. Softmax outputs are positive, so this is usually the
///   plain error, but an output that underflows to exactly 0.0 stops
///   contributing. Default, kept for parity with earlier runs.
/// - `SoftmaxCrossEntropy`: the error itself, the exact negative gradient of
///   summed cross-entropy with respect to the output logits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientRule {
    #[default]
    ReluOnOutput,
    SoftmaxCrossEntropy,
}

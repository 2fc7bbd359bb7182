use crate::activation::activation::{relu, softmax_rows};
use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::network::params::Parameters;

/// Every intermediate of one forward pass over a batch.
///
/// Training keeps these around to form the gradients; inference only needs
/// `output`.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    /// z1 = X·W1 + b1, shape (N × hidden)
    pub hidden_pre: Matrix,
    /// a1 = relu(z1), shape (N × hidden)
    pub hidden: Matrix,
    /// z2 = a1·W2 + b2, shape (N × outputs)
    pub output_pre: Matrix,
    /// softmax(z2) per row, shape (N × outputs)
    pub output: Matrix,
}

/// Runs `features` through the network without touching `params`.
pub fn forward(params: &Parameters, features: &Matrix) -> Result<ForwardPass> {
    if features.cols != params.input_size() {
        return Err(NnError::shape(
            "forward features",
            (features.rows, params.input_size()),
            features.shape(),
        ));
    }

    let hidden_pre = features.dot(&params.hidden_weights)?.add_row(&params.hidden_bias)?;
    let hidden = hidden_pre.map(relu);
    let output_pre = hidden.dot(&params.output_weights)?.add_row(&params.output_bias)?;
    let output = softmax_rows(&output_pre);

    Ok(ForwardPass { hidden_pre, hidden, output_pre, output })
}

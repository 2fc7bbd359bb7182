use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::network::params::Parameters;

/// Update directions for every parameter tensor, one full-batch step's worth.
///
/// These already point downhill (they are formed from `labels - output`), so
/// the optimizer adds them.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub hidden_weights: Matrix,
    pub hidden_bias: Matrix,
    pub output_weights: Matrix,
    pub output_bias: Matrix,
}

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies `params += learning_rate * grads` to all four tensors.
    ///
    /// Shapes are checked up front so a mismatch leaves `params` untouched.
    pub fn step(&self, params: &mut Parameters, grads: &Gradients) -> Result<()> {
        let pairs = [
            ("hidden_weights", &params.hidden_weights, &grads.hidden_weights),
            ("hidden_bias", &params.hidden_bias, &grads.hidden_bias),
            ("output_weights", &params.output_weights, &grads.output_weights),
            ("output_bias", &params.output_bias, &grads.output_bias),
        ];
        for (name, param, grad) in pairs {
            if param.shape() != grad.shape() {
                return Err(NnError::shape(name, param.shape(), grad.shape()));
            }
        }

        let lr = self.learning_rate;
        params.hidden_weights.add_scaled(&grads.hidden_weights, lr)?;
        params.hidden_bias.add_scaled(&grads.hidden_bias, lr)?;
        params.output_weights.add_scaled(&grads.output_weights, lr)?;
        params.output_bias.add_scaled(&grads.output_bias, lr)?;
        Ok(())
    }
}

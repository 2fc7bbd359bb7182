use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::network::config::NetworkConfig;

/// Weight initialization strategy.
///
/// - `Uniform`: i.i.d. samples from U[low, high); biases set to `bias`.
/// - `He`:      N(0, sqrt(2 / fan_in)), suited to ReLU layers; zero biases.
/// - `Xavier`:  N(0, sqrt(1 / fan_in)); zero biases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightInit {
    Uniform { low: f64, high: f64, bias: f64 },
    He,
    Xavier,
}

impl Default for WeightInit {
    fn default() -> Self {
        WeightInit::Uniform { low: -1.0, high: 1.0, bias: 0.0 }
    }
}

impl WeightInit {
    pub fn validate(&self) -> Result<()> {
        match *self {
            WeightInit::Uniform { low, high, bias } => {
                if !(low.is_finite() && high.is_finite() && bias.is_finite()) || low >= high {
                    return Err(NnError::InvalidConfig(format!(
                        "uniform init needs finite bounds with low < high, got [{low}, {high})"
                    )));
                }
                Ok(())
            }
            WeightInit::He | WeightInit::Xavier => Ok(()),
        }
    }

    /// A (fan_in × fan_out) weight matrix.
    pub fn weights<R: Rng + ?Sized>(&self, fan_in: usize, fan_out: usize, rng: &mut R) -> Matrix {
        match *self {
            WeightInit::Uniform { low, high, .. } => Matrix::uniform(fan_in, fan_out, low, high, rng),
            WeightInit::He => Matrix::he(fan_in, fan_out, rng),
            WeightInit::Xavier => Matrix::xavier(fan_in, fan_out, rng),
        }
    }

    /// A 1×width bias row.
    pub fn bias(&self, width: usize) -> Matrix {
        match *self {
            WeightInit::Uniform { bias, .. } => Matrix::filled(1, width, bias),
            WeightInit::He | WeightInit::Xavier => Matrix::zeros(1, width),
        }
    }
}

/// The four trainable tensors of the network.
///
/// Shapes are fixed when the store is created; training only changes values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// (inputs × hidden)
    pub hidden_weights: Matrix,
    /// (1 × hidden)
    pub hidden_bias: Matrix,
    /// (hidden × outputs)
    pub output_weights: Matrix,
    /// (1 × outputs)
    pub output_bias: Matrix,
}

impl Parameters {
    /// Allocates and fills all four tensors from `config.init`.
    pub fn initialize<R: Rng + ?Sized>(config: &NetworkConfig, rng: &mut R) -> Parameters {
        let init = config.init;
        Parameters {
            hidden_weights: init.weights(config.input_neurons, config.hidden_neurons, rng),
            hidden_bias: init.bias(config.hidden_neurons),
            output_weights: init.weights(config.hidden_neurons, config.output_neurons, rng),
            output_bias: init.bias(config.output_neurons),
        }
    }

    /// Assembles a store from explicit tensors, checking they fit together.
    pub fn from_parts(
        hidden_weights: Matrix,
        hidden_bias: Matrix,
        output_weights: Matrix,
        output_bias: Matrix,
    ) -> Result<Parameters> {
        let (inputs, hidden) = hidden_weights.shape();
        if hidden_bias.shape() != (1, hidden) {
            return Err(NnError::shape("hidden_bias", (1, hidden), hidden_bias.shape()));
        }
        if output_weights.rows != hidden {
            return Err(NnError::shape("output_weights", (hidden, output_weights.cols), output_weights.shape()));
        }
        let outputs = output_weights.cols;
        if output_bias.shape() != (1, outputs) {
            return Err(NnError::shape("output_bias", (1, outputs), output_bias.shape()));
        }
        if inputs == 0 || hidden == 0 || outputs == 0 {
            return Err(NnError::InvalidConfig("parameter tensors must be non-empty".into()));
        }
        Ok(Parameters { hidden_weights, hidden_bias, output_weights, output_bias })
    }

    pub fn input_size(&self) -> usize {
        self.hidden_weights.rows
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_weights.cols
    }

    pub fn output_size(&self) -> usize {
        self.output_weights.cols
    }

    /// True when the tensor shapes match `config`.
    pub fn fits(&self, config: &NetworkConfig) -> bool {
        self.input_size() == config.input_neurons
            && self.hidden_size() == config.hidden_neurons
            && self.output_size() == config.output_neurons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn initialize_allocates_configured_shapes() {
        let config = NetworkConfig::new(4, 3, 2, 0, 0.1);
        let params = Parameters::initialize(&config, &mut StdRng::seed_from_u64(1));
        assert_eq!(params.hidden_weights.shape(), (4, 3));
        assert_eq!(params.hidden_bias.shape(), (1, 3));
        assert_eq!(params.output_weights.shape(), (3, 2));
        assert_eq!(params.output_bias.shape(), (1, 2));
        assert!(params.fits(&config));
        assert!(params.hidden_bias.data[0].iter().all(|&b| b == 0.0));
    }

    #[test]
    fn same_seed_gives_same_parameters() {
        let config = NetworkConfig::new(4, 5, 3, 0, 0.1).with_init(WeightInit::He);
        let a = Parameters::initialize(&config, &mut StdRng::seed_from_u64(42));
        let b = Parameters::initialize(&config, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn uniform_bias_constant_is_applied() {
        let config = NetworkConfig::new(2, 2, 2, 0, 0.1)
            .with_init(WeightInit::Uniform { low: -0.1, high: 0.1, bias: 0.01 });
        let params = Parameters::initialize(&config, &mut StdRng::seed_from_u64(3));
        assert_eq!(params.output_bias, Matrix::filled(1, 2, 0.01));
        assert!(params.hidden_weights.data.iter().flatten().all(|w| w.abs() <= 0.1));
    }

    #[test]
    fn from_parts_rejects_inconsistent_shapes() {
        let ok = Parameters::from_parts(
            Matrix::zeros(2, 3),
            Matrix::zeros(1, 3),
            Matrix::zeros(3, 2),
            Matrix::zeros(1, 2),
        );
        assert!(ok.is_ok());

        let bad = Parameters::from_parts(
            Matrix::zeros(2, 3),
            Matrix::zeros(1, 3),
            Matrix::zeros(4, 2),
            Matrix::zeros(1, 2),
        );
        assert!(matches!(bad, Err(NnError::ShapeMismatch { .. })));
    }

    #[test]
    fn rejects_inverted_uniform_bounds() {
        let init = WeightInit::Uniform { low: 1.0, high: -1.0, bias: 0.0 };
        assert!(init.validate().is_err());
    }
}

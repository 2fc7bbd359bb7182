use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::network::params::WeightInit;
use crate::train::gradient_rule::GradientRule;

/// Hyperparameters of a one-hidden-layer classifier.
///
/// Fixed for the lifetime of a `Network`. Fields:
/// - `input_neurons`:  number of features per sample
/// - `hidden_neurons`: width of the ReLU hidden layer
/// - `output_neurons`: number of classes (softmax outputs)
/// - `epochs`:         full-batch updates performed by one `train` call
/// - `learning_rate`:  step size applied to every gradient
/// - `gradient`:       how the output-layer delta is formed
/// - `init`:           weight initialization strategy
/// - `seed`:           fixes the initialization RNG when set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_neurons: usize,
    pub hidden_neurons: usize,
    pub output_neurons: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    #[serde(default)]
    pub gradient: GradientRule,
    #[serde(default)]
    pub init: WeightInit,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkConfig {
    /// Builds a config with the default gradient rule, initializer and no seed.
    pub fn new(
        input_neurons: usize,
        hidden_neurons: usize,
        output_neurons: usize,
        epochs: usize,
        learning_rate: f64,
    ) -> Self {
        NetworkConfig {
            input_neurons,
            hidden_neurons,
            output_neurons,
            epochs,
            learning_rate,
            gradient: GradientRule::default(),
            init: WeightInit::default(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_gradient(mut self, gradient: GradientRule) -> Self {
        self.gradient = gradient;
        self
    }

    pub fn with_init(mut self, init: WeightInit) -> Self {
        self.init = init;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("input_neurons", self.input_neurons),
            ("hidden_neurons", self.hidden_neurons),
            ("output_neurons", self.output_neurons),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(NnError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NnError::InvalidConfig(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        self.init.validate()
    }
}

impl Default for NetworkConfig {
    /// Iris layout: 4 measurements, 10 hidden units, 3 species.
    fn default() -> Self {
        NetworkConfig::new(4, 10, 3, 1000, 0.005)
    }
}

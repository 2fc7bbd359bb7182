use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::network::config::NetworkConfig;
use crate::network::forward::{forward, ForwardPass};
use crate::network::params::Parameters;

/// A one-hidden-layer classifier: ReLU hidden layer, softmax output.
///
/// The parameter store is owned here and only mutated through `&mut self`
/// (see `train::trainer::train`), so a training run can never overlap a read.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    params: Option<Parameters>,
}

impl Network {
    /// Validates `config` and allocates freshly initialized parameters.
    pub fn new(config: NetworkConfig) -> Result<Network> {
        let mut network = Network::uninitialized(config)?;
        network.initialize();
        Ok(network)
    }

    /// Validates `config` but defers allocation; `train` initializes on
    /// first use and `predict` reports `UninitializedNetwork` until then.
    pub fn uninitialized(config: NetworkConfig) -> Result<Network> {
        config.validate()?;
        Ok(Network { config, params: None })
    }

    /// Wraps explicit parameters, which must match the configured shapes.
    pub fn with_parameters(config: NetworkConfig, params: Parameters) -> Result<Network> {
        config.validate()?;
        if !params.fits(&config) {
            return Err(NnError::shape(
                "Network::with_parameters",
                (config.input_neurons, config.hidden_neurons),
                params.hidden_weights.shape(),
            ));
        }
        Ok(Network { config, params: Some(params) })
    }

    /// Discards any current parameters and draws new ones. Uses the configured
    /// seed when present, otherwise OS entropy.
    pub fn initialize(&mut self) {
        self.params = Some(fresh_parameters(&self.config));
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn parameters(&self) -> Option<&Parameters> {
        self.params.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.params.is_some()
    }

    /// Parameters for training, allocating them first if needed.
    pub(crate) fn parameters_mut(&mut self) -> &mut Parameters {
        let config = &self.config;
        self.params.get_or_insert_with(|| fresh_parameters(config))
    }

    /// Forward pass keeping every intermediate.
    pub fn forward(&self, features: &Matrix) -> Result<ForwardPass> {
        let params = self.params.as_ref().ok_or(NnError::UninitializedNetwork)?;
        forward(params, features)
    }

    /// Class probabilities for each row of `features`, shape (N × outputs).
    pub fn predict(&self, features: &Matrix) -> Result<Matrix> {
        Ok(self.forward(features)?.output)
    }
}

fn fresh_parameters(config: &NetworkConfig) -> Parameters {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!(
        inputs = config.input_neurons,
        hidden = config.hidden_neurons,
        outputs = config.output_neurons,
        "initializing parameters"
    );
    Parameters::initialize(config, &mut rng)
}

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::activation::activation::relu_derivative;
use crate::error::{NnError, Result};
use crate::eval::metrics::accuracy;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::math::matrix::Matrix;
use crate::network::config::NetworkConfig;
use crate::network::forward::{forward, ForwardPass};
use crate::network::network::Network;
use crate::network::params::Parameters;
use crate::optim::sgd::{Gradients, Sgd};
use crate::train::epoch_stats::{EpochStats, TrainReport};
use crate::train::gradient_rule::GradientRule;

/// Trains `network` for `config.epochs` epochs of full-batch gradient
/// descent on (`features`, `labels`).
///
/// # Arguments
/// - `network`:  modified in place; parameters are allocated first if the
///             network was built with `Network::uninitialized`, otherwise
///             training resumes from the current values
/// - `features`: (N × input_neurons)
/// - `labels`:   one-hot, (N × output_neurons)
///
/// Every epoch performs exactly one update computed from one forward pass
/// over the whole batch. Samples are used in the given order.
///
/// # Errors
/// `ShapeMismatch` if the batch disagrees with the configuration or with
/// itself. The check runs before anything is computed, so a failed call
/// leaves the network unchanged.
pub fn train(network: &mut Network, features: &Matrix, labels: &Matrix) -> Result<TrainReport> {
    let config = network.config().clone();
    check_batch(&config, features, labels)?;

    let optimizer = Sgd::new(config.learning_rate);
    let params = network.parameters_mut();
    let log_every = (config.epochs / 10).max(1);

    info!(
        samples = features.rows,
        epochs = config.epochs,
        learning_rate = config.learning_rate,
        gradient = ?config.gradient,
        "training started"
    );

    let mut history = history_buffer(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let pass = forward(params, features)?;
        let grads = backward(params, features, labels, &pass, config.gradient)?;
        let loss = CrossEntropyLoss::loss(labels, &pass.output)?;
        let train_accuracy = accuracy(&pass.output, labels)?;

        optimizer.step(params, &grads)?;

        if !loss.is_finite() {
            warn!(epoch, loss, "loss is not finite; consider a smaller learning rate");
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            loss,
            accuracy: train_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if epoch % log_every == 0 || epoch == config.epochs {
            info!(epoch, loss, accuracy = train_accuracy, "epoch complete");
        } else {
            debug!(epoch, loss, accuracy = train_accuracy, "epoch complete");
        }

        history.push(stats);
    }

    let final_pass = forward(params, features)?;
    let final_loss = CrossEntropyLoss::loss(labels, &final_pass.output)?;
    let final_accuracy = accuracy(&final_pass.output, labels)?;

    info!(final_loss, final_accuracy, "training finished");

    Ok(TrainReport { history, final_loss, final_accuracy })
}

/// Backpropagates one forward pass into update directions.
///
/// With `d_out` the output delta selected by `rule`:
/// ```text
/// d_hidden = (d_out · W2ᵀ) ⊙ relu'(a1)
/// ΔW2 = a1ᵀ · d_out      Δb2 = Σrows d_out
/// ΔW1 = Xᵀ  · d_hidden   Δb1 = Σrows d_hidden
/// ```
/// Nothing is applied here; all four directions come from the same
/// parameter values.
pub fn backward(
    params: &Parameters,
    features: &Matrix,
    labels: &Matrix,
    pass: &ForwardPass,
    rule: GradientRule,
) -> Result<Gradients> {
    let error = labels.elementwise_sub(&pass.output)?;
    let d_output = match rule {
        GradientRule::ReluOnOutput => error.hadamard(&pass.output.map(relu_derivative))?,
        GradientRule::SoftmaxCrossEntropy => error,
    };

    let error_at_hidden = d_output.dot(&params.output_weights.transpose())?;
    let d_hidden = error_at_hidden.hadamard(&pass.hidden.map(relu_derivative))?;

    Ok(Gradients {
        output_weights: pass.hidden.transpose().dot(&d_output)?,
        output_bias: d_output.sum_axis(0)?,
        hidden_weights: features.transpose().dot(&d_hidden)?,
        hidden_bias: d_hidden.sum_axis(0)?,
    })
}

/// Upper bound on the history slots reserved up front.
const HISTORY_RESERVE: usize = 10_000;

/// The epoch count comes from user config and has no upper limit, so only a
/// bounded prefix is reserved.
fn history_buffer(epochs: usize) -> Vec<EpochStats> {
    Vec::with_capacity(epochs.min(HISTORY_RESERVE))
}

fn check_batch(config: &NetworkConfig, features: &Matrix, labels: &Matrix) -> Result<()> {
    if features.cols != config.input_neurons {
        return Err(NnError::shape(
            "train features",
            (features.rows, config.input_neurons),
            features.shape(),
        ));
    }
    if labels.cols != config.output_neurons || labels.rows != features.rows {
        return Err(NnError::shape(
            "train labels",
            (features.rows, config.output_neurons),
            labels.shape(),
        ));
    }
    Ok(())
}

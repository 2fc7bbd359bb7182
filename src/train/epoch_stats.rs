use serde::{Serialize, Deserialize};

/// Statistics for one epoch of `train`.
///
/// Loss and accuracy come from the epoch's forward pass, so they describe the
/// parameters as they were *before* that epoch's update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Summed cross-entropy over the whole training batch.
    pub loss: f64,
    /// Training accuracy as a fraction in [0, 1].
    pub accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Outcome of a `train` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    /// One entry per completed epoch; empty when `epochs == 0`.
    pub history: Vec<EpochStats>,
    /// Summed cross-entropy after the last update.
    pub final_loss: f64,
    /// Training accuracy after the last update.
    pub final_accuracy: f64,
}

impl TrainReport {
    /// Loss before any update of this run: the first epoch's loss, or the
    /// final loss when no epoch ran.
    pub fn initial_loss(&self) -> f64 {
        self.history.first().map_or(self.final_loss, |s| s.loss)
    }
}

//! A one-hidden-layer classifier for tabular data, trained with hand-derived
//! full-batch backpropagation.
//!
//! ```rust,ignore
//! use iris_nn::{Network, NetworkConfig, train, accuracy};
//!
//! let mut network = Network::new(NetworkConfig::new(4, 10, 3, 1000, 0.005))?;
//! let report = train(&mut network, &train_x, &train_y)?;
//! let probs = network.predict(&test_x)?;
//! println!("loss {:.4}, accuracy {:.3}", report.final_loss, accuracy(&probs, &test_y)?);
//! ```

pub mod math;
pub mod activation;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;
pub mod eval;
pub mod data;
pub mod config;
pub mod error;
pub mod logging;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use error::{NnError, Result};
pub use network::{Network, NetworkConfig, Parameters, WeightInit};
pub use loss::cross_entropy::CrossEntropyLoss;
pub use train::{train, EpochStats, GradientRule, TrainReport};
pub use eval::{accuracy, argmax, confusion_matrix};
pub use data::{Dataset, LabelMode, MinMaxScaler};
pub use config::{DataConfig, RunConfig};

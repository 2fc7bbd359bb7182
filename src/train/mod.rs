pub mod epoch_stats;
pub mod gradient_rule;
pub mod trainer;

pub use epoch_stats::{EpochStats, TrainReport};
pub use gradient_rule::GradientRule;
pub use trainer::{backward, train};

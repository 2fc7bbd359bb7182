pub mod sgd;

pub use sgd::{Gradients, Sgd};

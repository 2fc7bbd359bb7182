pub mod config;
pub mod forward;
pub mod network;
pub mod params;

pub use config::NetworkConfig;
pub use forward::{forward, ForwardPass};
pub use network::Network;
pub use params::{Parameters, WeightInit};

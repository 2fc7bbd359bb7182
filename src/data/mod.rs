pub mod csv;
pub mod dataset;
pub mod scaler;

pub use csv::{load_csv, parse_csv, LabelMode, IRIS_CLASSES};
pub use dataset::Dataset;
pub use scaler::MinMaxScaler;

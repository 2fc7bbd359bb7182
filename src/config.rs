use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::data::csv::{LabelMode, IRIS_CLASSES};
use crate::error::{NnError, Result};
use crate::network::config::NetworkConfig;

/// Where the data comes from and how it is prepared before training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file; the last column holds the class name.
    pub path: PathBuf,
    /// Share of shuffled rows used for training; the rest is held out.
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
    /// Class names in one-hot column order.
    #[serde(default = "default_class_names")]
    pub class_names: Vec<String>,
    /// Min-max scale features using training-split statistics.
    #[serde(default = "default_normalize")]
    pub normalize: bool,
    /// Fixes the shuffle before splitting when set.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

fn default_train_fraction() -> f64 {
    0.8
}

fn default_class_names() -> Vec<String> {
    IRIS_CLASSES.iter().map(|s| s.to_string()).collect()
}

fn default_normalize() -> bool {
    true
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            path: PathBuf::from("data/iris.data"),
            train_fraction: default_train_fraction(),
            class_names: default_class_names(),
            normalize: default_normalize(),
            shuffle_seed: None,
        }
    }
}

impl DataConfig {
    pub fn label_mode(&self) -> LabelMode {
        LabelMode::ClassName { classes: self.class_names.clone() }
    }
}

/// Everything one `iris-nn train` run needs, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub network: NetworkConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl RunConfig {
    /// Cross-field checks on top of `NetworkConfig::validate`.
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        if self.data.class_names.len() != self.network.output_neurons {
            return Err(NnError::InvalidConfig(format!(
                "{} class names configured but network has {} outputs",
                self.data.class_names.len(),
                self.network.output_neurons
            )));
        }
        if !(self.data.train_fraction > 0.0 && self.data.train_fraction <= 1.0) {
            return Err(NnError::InvalidConfig(format!(
                "train_fraction must be in (0, 1], got {}",
                self.data.train_fraction
            )));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `RunConfig` from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_iris_setup() {
        let config = RunConfig::default();
        config.validate().unwrap();
        assert_eq!(config.network.input_neurons, 4);
        assert_eq!(config.data.label_mode().n_classes(), 3);
    }

    #[test]
    fn json_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("iris-nn-config-{}.json", std::process::id()));
        let mut config = RunConfig::default();
        config.network.seed = Some(17);
        config.data.shuffle_seed = Some(3);

        config.save_json(&path).unwrap();
        let loaded = RunConfig::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn data_section_is_optional() {
        let json = r#"{"network":{"input_neurons":4,"hidden_neurons":6,"output_neurons":3,"epochs":5,"learning_rate":0.01}}"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.data, DataConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn class_count_must_match_outputs() {
        let mut config = RunConfig::default();
        config.network.output_neurons = 2;
        assert!(matches!(config.validate(), Err(NnError::InvalidConfig(_))));
    }
}

use serde::{Serialize, Deserialize};

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};

/// Per-column min-max scaling into [0, 1].
///
/// Fit on the training split only and apply the same transform to the test
/// split. Constant columns map to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl MinMaxScaler {
    pub fn fit(data: &Dataset) -> Result<MinMaxScaler> {
        if data.is_empty() {
            return Err(NnError::InvalidConfig("cannot fit a scaler on an empty dataset".into()));
        }
        let width = data.n_features();
        let mut min = vec![f64::INFINITY; width];
        let mut max = vec![f64::NEG_INFINITY; width];
        for row in data.feature_rows() {
            for (j, &x) in row.iter().enumerate() {
                min[j] = min[j].min(x);
                max[j] = max[j].max(x);
            }
        }
        Ok(MinMaxScaler { min, max })
    }

    pub fn transform(&self, data: &Dataset) -> Result<Dataset> {
        if data.n_features() != self.min.len() && !data.is_empty() {
            return Err(NnError::shape(
                "MinMaxScaler::transform",
                (data.len(), self.min.len()),
                (data.len(), data.n_features()),
            ));
        }
        let scaled = data.feature_rows().iter()
            .map(|row| {
                row.iter().enumerate()
                    .map(|(j, &x)| {
                        let range = self.max[j] - self.min[j];
                        if range > 0.0 { (x - self.min[j]) / range } else { 0.0 }
                    })
                    .collect()
            })
            .collect();
        data.with_features(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds(features: Vec<Vec<f64>>) -> Dataset {
        let labels = features.iter().map(|_| vec![1.0]).collect();
        Dataset::new(features, labels).unwrap()
    }

    #[test]
    fn scales_training_columns_into_unit_range() {
        let train = ds(vec![vec![1.0, 10.0, 5.0], vec![3.0, 20.0, 5.0], vec![2.0, 15.0, 5.0]]);
        let scaler = MinMaxScaler::fit(&train).unwrap();
        let scaled = scaler.transform(&train).unwrap();
        assert_eq!(scaled.feature_rows()[0], vec![0.0, 0.0, 0.0]);
        assert_eq!(scaled.feature_rows()[1], vec![1.0, 1.0, 0.0]);
        assert_eq!(scaled.feature_rows()[2], vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_split_uses_training_statistics() {
        let scaler = MinMaxScaler::fit(&ds(vec![vec![0.0], vec![2.0]])).unwrap();
        let scaled = scaler.transform(&ds(vec![vec![4.0]])).unwrap();
        assert_eq!(scaled.feature_rows()[0], vec![2.0]);
    }

    #[test]
    fn rejects_wrong_width() {
        let scaler = MinMaxScaler::fit(&ds(vec![vec![0.0, 1.0]])).unwrap();
        assert!(scaler.transform(&ds(vec![vec![1.0]])).is_err());
    }
}

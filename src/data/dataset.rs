use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Feature rows paired with one-hot label rows.
///
/// Invariants: same number of feature and label rows, and every feature row
/// (resp. label row) has the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Vec<Vec<f64>>,
    labels: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<Vec<f64>>) -> Result<Dataset> {
        if features.len() != labels.len() {
            return Err(NnError::shape(
                "Dataset::new",
                (features.len(), labels.first().map_or(0, Vec::len)),
                (labels.len(), labels.first().map_or(0, Vec::len)),
            ));
        }
        check_rectangular("Dataset features", &features)?;
        check_rectangular("Dataset labels", &labels)?;
        Ok(Dataset { features, labels })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }

    pub fn n_classes(&self) -> usize {
        self.labels.first().map_or(0, Vec::len)
    }

    pub fn feature_rows(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn label_rows(&self) -> &[Vec<f64>] {
        &self.labels
    }

    /// Features as an (N × n_features) matrix.
    pub fn features(&self) -> Matrix {
        Matrix { rows: self.len(), cols: self.n_features(), data: self.features.clone() }
    }

    /// Labels as an (N × n_classes) matrix.
    pub fn labels(&self) -> Matrix {
        Matrix { rows: self.len(), cols: self.n_classes(), data: self.labels.clone() }
    }

    /// Same labels, replaced features. Used by feature scaling.
    pub fn with_features(&self, features: Vec<Vec<f64>>) -> Result<Dataset> {
        Dataset::new(features, self.labels.clone())
    }

    /// Number of samples per class, by one-hot column.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes()];
        for row in &self.labels {
            if let Some(c) = row.iter().position(|&v| v == 1.0) {
                counts[c] += 1;
            }
        }
        counts
    }

    /// Shuffles the rows and splits them into (train, test).
    ///
    /// The train part gets the first `floor(len * train_fraction)` shuffled
    /// rows, the test part the rest.
    pub fn split<R: Rng + ?Sized>(&self, train_fraction: f64, rng: &mut R) -> Result<(Dataset, Dataset)> {
        if !(0.0..=1.0).contains(&train_fraction) {
            return Err(NnError::InvalidConfig(format!(
                "train_fraction must be within [0, 1], got {train_fraction}"
            )));
        }

        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);

        let split_index = (self.len() as f64 * train_fraction).floor() as usize;
        let (train_idx, test_idx) = indices.split_at(split_index);

        let train = self.select(train_idx);
        let test = self.select(test_idx);
        if train.is_empty() || test.is_empty() {
            warn!(train = train.len(), test = test.len(), "split produced an empty partition");
        }
        debug!(train = train.len(), test = test.len(), "split dataset");
        Ok((train, test))
    }

    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i].clone()).collect(),
        }
    }
}

fn check_rectangular(context: &'static str, rows: &[Vec<f64>]) -> Result<()> {
    let width = rows.first().map_or(0, Vec::len);
    match rows.iter().find(|r| r.len() != width) {
        Some(bad) => Err(NnError::shape(context, (rows.len(), width), (rows.len(), bad.len()))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn ten_rows() -> Dataset {
        let features = (0..10).map(|i| vec![i as f64, (i * 2) as f64]).collect();
        let labels = (0..10)
            .map(|i| if i % 2 == 0 { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
            .collect();
        Dataset::new(features, labels).unwrap()
    }

    #[test]
    fn split_follows_fraction_and_keeps_pairs() {
        let ds = ten_rows();
        let (train, test) = ds.split(0.8, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let mut seen: Vec<f64> = train.feature_rows().iter()
            .chain(test.feature_rows())
            .map(|r| r[0])
            .collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(seen, (0..10).map(|i| i as f64).collect::<Vec<_>>());

        for (f, l) in train.feature_rows().iter().zip(train.label_rows()) {
            let even = (f[0] as usize) % 2 == 0;
            assert_eq!(l[0] == 1.0, even);
            assert_eq!(f[1], f[0] * 2.0);
        }
    }

    #[test]
    fn split_rejects_fraction_out_of_range() {
        let ds = ten_rows();
        assert!(ds.split(1.5, &mut StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn new_rejects_mismatched_lengths_and_ragged_rows() {
        assert!(Dataset::new(vec![vec![1.0]], vec![]).is_err());
        assert!(Dataset::new(vec![vec![1.0], vec![1.0, 2.0]], vec![vec![1.0], vec![1.0]]).is_err());
    }

    #[test]
    fn converts_to_matrices() {
        let ds = ten_rows();
        assert_eq!(ds.features().shape(), (10, 2));
        assert_eq!(ds.labels().shape(), (10, 2));
        assert_eq!(ds.class_counts(), vec![5, 5]);
    }
}

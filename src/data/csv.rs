//! CSV parsing for tabular classification data.
//!
//! Supported format:
//! - UTF-8, comma-separated; blank lines are skipped
//! - Optional header row (detected when any feature cell is non-numeric and
//!   the last cell is not a valid class)
//! - Double-quoted fields with embedded commas are handled correctly
//! - The last column is the class, interpreted according to `LabelMode`

use std::path::Path;

use tracing::debug;

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};

/// Class names of the UCI Iris dataset, in one-hot column order.
pub const IRIS_CLASSES: [&str; 3] = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMode {
    /// Last column is a class name; its position in `classes` is the one-hot
    /// column. Unknown names are an error.
    ClassName { classes: Vec<String> },
    /// Last column is a 0-based integer class index below `n_classes`.
    ClassIndex { n_classes: usize },
}

impl LabelMode {
    pub fn iris() -> LabelMode {
        LabelMode::ClassName {
            classes: IRIS_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn n_classes(&self) -> usize {
        match self {
            LabelMode::ClassName { classes } => classes.len(),
            LabelMode::ClassIndex { n_classes } => *n_classes,
        }
    }

    fn class_of(&self, cell: &str, line: usize) -> Result<usize> {
        let cell = cell.trim();
        match self {
            LabelMode::ClassName { classes } => classes.iter()
                .position(|c| c == cell)
                .ok_or_else(|| NnError::UnknownClass { line, name: cell.to_string() }),
            LabelMode::ClassIndex { n_classes } => {
                let idx = cell.parse::<usize>().map_err(|_| NnError::Parse {
                    line,
                    message: format!("class index '{cell}' is not a non-negative integer"),
                })?;
                if idx >= *n_classes {
                    return Err(NnError::Parse {
                        line,
                        message: format!("class index {idx} >= n_classes {n_classes}"),
                    });
                }
                Ok(idx)
            }
        }
    }
}

/// Reads and parses a CSV file.
pub fn load_csv(path: impl AsRef<Path>, label_mode: &LabelMode) -> Result<Dataset> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "read dataset file");
    parse_csv(&text, label_mode)
}

/// Parses CSV text into features and one-hot labels.
///
/// Line numbers in errors are 1-based positions in `text`.
pub fn parse_csv(text: &str, label_mode: &LabelMode) -> Result<Dataset> {
    let n_classes = label_mode.n_classes();
    if n_classes == 0 {
        return Err(NnError::InvalidConfig("label mode has no classes".into()));
    }

    let mut features: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<Vec<f64>> = Vec::new();
    let mut first_data_line = true;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        if cells.len() < 2 {
            return Err(NnError::Parse {
                line: line_no,
                message: format!("expected at least 2 columns (features + class), got {}", cells.len()),
            });
        }
        let (feature_cells, label_cell) = cells.split_at(cells.len() - 1);

        if first_data_line {
            first_data_line = false;
            if is_header(feature_cells, &label_cell[0], label_mode) {
                debug!(line = line_no, "skipping header row");
                continue;
            }
        }

        let row = parse_floats(feature_cells, line_no)?;
        if let Some(first) = features.first() {
            if row.len() != first.len() {
                return Err(NnError::Parse {
                    line: line_no,
                    message: format!("feature count {} does not match earlier rows' {}", row.len(), first.len()),
                });
            }
        }

        let class = label_mode.class_of(&label_cell[0], line_no)?;
        let mut one_hot = vec![0.0f64; n_classes];
        one_hot[class] = 1.0;

        features.push(row);
        labels.push(one_hot);
    }

    if features.is_empty() {
        return Err(NnError::Parse { line: 0, message: "CSV contains no data rows".into() });
    }

    Dataset::new(features, labels)
}

/// A header has a non-numeric feature cell and no valid class in the last
/// column. A data row with a malformed number is left to fail in parsing.
fn is_header(cells: &[String], label_cell: &str, label_mode: &LabelMode) -> bool {
    let non_numeric = cells.iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    });
    non_numeric && label_mode.class_of(label_cell, 0).is_err()
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], line: usize) -> Result<Vec<f64>> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| NnError::Parse {
                line,
                message: format!("'{c}' is not a valid number"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IRIS_SAMPLE: &str = "\
5.1,3.5,1.4,0.2,Iris-setosa
7.0,3.2,4.7,1.4,Iris-versicolor
6.3,3.3,6.0,2.5,Iris-virginica

";

    #[test]
    fn parses_iris_rows_into_one_hot_labels() {
        let ds = parse_csv(IRIS_SAMPLE, &LabelMode::iris()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.n_features(), 4);
        assert_eq!(ds.label_rows()[1], vec![0.0, 1.0, 0.0]);
        assert_eq!(ds.feature_rows()[2], vec![6.3, 3.3, 6.0, 2.5]);
    }

    #[test]
    fn unknown_class_reports_line() {
        let text = "5.1,3.5,1.4,0.2,Iris-setosa\n4.9,3.0,1.4,0.2,Iris-unknown\n";
        match parse_csv(text, &LabelMode::iris()) {
            Err(NnError::UnknownClass { line, name }) => {
                assert_eq!(line, 2);
                assert_eq!(name, "Iris-unknown");
            }
            other => panic!("expected UnknownClass, got {other:?}"),
        }
    }

    #[test]
    fn skips_header_and_reads_class_indices() {
        let text = "a,b,label\n0.5,1.5,1\n2.0,\"3.0\",0\n";
        let ds = parse_csv(text, &LabelMode::ClassIndex { n_classes: 2 }).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.label_rows()[0], vec![0.0, 1.0]);
        assert_eq!(ds.feature_rows()[1], vec![2.0, 3.0]);
    }

    #[test]
    fn rejects_bad_numbers_ragged_rows_and_out_of_range_classes() {
        let mode = LabelMode::ClassIndex { n_classes: 2 };
        assert!(matches!(parse_csv("1.0,2.0,0\n1.0,x,1\n", &mode), Err(NnError::Parse { line: 2, .. })));
        assert!(matches!(parse_csv("1.0,2.0,0\n1.0,1\n", &mode), Err(NnError::Parse { line: 2, .. })));
        assert!(matches!(parse_csv("1.0,2.0,5\n", &mode), Err(NnError::Parse { line: 1, .. })));
        assert!(parse_csv("\n\n", &mode).is_err());
    }

    #[test]
    fn malformed_first_row_is_not_mistaken_for_a_header() {
        let text = "5.1,x,1.4,0.2,Iris-setosa\n4.9,3.0,1.4,0.2,Iris-setosa\n";
        match parse_csv(text, &LabelMode::iris()) {
            Err(NnError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected Parse on line 1, got {other:?}"),
        }

        let with_header = "sepal_length,sepal_width,petal_length,petal_width,species\n5.1,3.5,1.4,0.2,Iris-setosa\n";
        assert_eq!(parse_csv(with_header, &LabelMode::iris()).unwrap().len(), 1);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        assert_eq!(parse_csv_row("1,\"a,b\",\"say \"\"hi\"\"\""), vec!["1", "a,b", "say \"hi\""]);
    }
}

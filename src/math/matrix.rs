use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{NnError, Result, Shape};

/// Dense row-major matrix of `f64`.
///
/// Every operation returns a new matrix; the binary operations check shapes
/// and report `ShapeMismatch` instead of panicking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![value; cols]; rows],
        }
    }

    /// Builds a matrix from row vectors. All rows must have the same length;
    /// an empty input yields a 0×0 matrix.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NnError::shape("Matrix::from_rows", (rows, cols), (rows, bad.len())));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// A single-row (1×n) matrix.
    pub fn row_vector(values: Vec<f64>) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: vec![values],
        }
    }

    /// Samples every entry independently from U[low, high).
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, low: f64, high: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = low + rng.gen::<f64>() * (high - low);
            }
        }
        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // (0, 1] keeps ln() finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn normal<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// He initialization: samples from N(0, sqrt(2 / rows)).
    ///
    /// Weights are laid out (fan_in × fan_out), so `rows` is the number of
    /// input connections.
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (2.0 / rows.max(1) as f64).sqrt();
        Matrix::normal(rows, cols, std_dev, rng)
    }

    /// Xavier (Glorot) initialization: samples from N(0, sqrt(1 / rows)).
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (1.0 / rows.max(1) as f64).sqrt();
        Matrix::normal(rows, cols, std_dev, rng)
    }

    pub fn shape(&self) -> Shape {
        (self.rows, self.cols)
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self × rhs`.
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NnError::shape("Matrix::dot", (self.cols, rhs.cols), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                for j in 0..res.cols {
                    res.data[i][j] += a * rhs.data[k][j];
                }
            }
        }

        Ok(res)
    }

    pub fn elementwise_add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "Matrix::elementwise_add", |a, b| a + b)
    }

    pub fn elementwise_sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "Matrix::elementwise_sub", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "Matrix::hadamard", |a, b| a * b)
    }

    /// Adds a 1×cols row vector to every row.
    pub fn add_row(&self, row: &Matrix) -> Result<Matrix> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(NnError::shape("Matrix::add_row", (1, self.cols), row.shape()));
        }
        let bias = &row.data[0];
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|r| r.iter().zip(bias).map(|(x, b)| x + b).collect())
                .collect(),
        })
    }

    /// Sums along `axis`: 0 collapses rows into a 1×cols vector of column
    /// sums, 1 collapses columns into a rows×1 vector of row sums.
    pub fn sum_axis(&self, axis: usize) -> Result<Matrix> {
        match axis {
            0 => {
                let mut sums = vec![0.0; self.cols];
                for row in &self.data {
                    for (s, x) in sums.iter_mut().zip(row) {
                        *s += x;
                    }
                }
                Ok(Matrix::row_vector(sums))
            }
            1 => Ok(Matrix {
                rows: self.rows,
                cols: 1,
                data: self.data.iter().map(|row| vec![row.iter().sum()]).collect(),
            }),
            _ => Err(NnError::InvalidAxis(axis)),
        }
    }

    /// In-place `self += factor * delta`.
    pub fn add_scaled(&mut self, delta: &Matrix, factor: f64) -> Result<()> {
        if self.shape() != delta.shape() {
            return Err(NnError::shape("Matrix::add_scaled", self.shape(), delta.shape()));
        }
        for (row, drow) in self.data.iter_mut().zip(&delta.data) {
            for (x, d) in row.iter_mut().zip(drow) {
                *x += factor * d;
            }
        }
        Ok(())
    }

    fn zip_with<F>(&self, rhs: &Matrix, context: &'static str, op: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(NnError::shape(context, self.shape(), rhs.shape()));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&rhs.data)
                .map(|(ra, rb)| ra.iter().zip(rb).map(|(&a, &b)| op(a, b)).collect())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn m(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, NnError::ShapeMismatch { .. }));
    }

    #[test]
    fn dot_multiplies_and_checks_inner_dimension() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = m(vec![vec![5.0], vec![6.0]]);
        assert_eq!(a.dot(&b).unwrap(), m(vec![vec![17.0], vec![39.0]]));
        assert!(b.dot(&b).is_err());
    }

    #[test]
    fn dot_propagates_non_finite_values_through_zero_terms() {
        let a = m(vec![vec![0.0, 1.0]]);
        let b = m(vec![vec![f64::INFINITY], vec![2.0]]);
        assert!(a.dot(&b).unwrap().data[0][0].is_nan());

        let c = m(vec![vec![f64::NAN], vec![2.0]]);
        assert!(a.dot(&c).unwrap().data[0][0].is_nan());
    }

    #[test]
    fn add_row_broadcasts_across_rows() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let bias = Matrix::row_vector(vec![10.0, 20.0]);
        assert_eq!(a.add_row(&bias).unwrap(), m(vec![vec![11.0, 22.0], vec![13.0, 24.0]]));
        assert!(a.add_row(&Matrix::row_vector(vec![1.0])).is_err());
    }

    #[test]
    fn sum_axis_reduces_columns_and_rows() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(a.sum_axis(0).unwrap(), Matrix::row_vector(vec![5.0, 7.0, 9.0]));
        assert_eq!(a.sum_axis(1).unwrap(), m(vec![vec![6.0], vec![15.0]]));
        assert!(matches!(a.sum_axis(2), Err(NnError::InvalidAxis(2))));
    }

    #[test]
    fn elementwise_ops_require_equal_shapes() {
        let a = m(vec![vec![1.0, 2.0]]);
        let b = m(vec![vec![3.0, 5.0]]);
        assert_eq!(a.hadamard(&b).unwrap(), m(vec![vec![3.0, 10.0]]));
        assert_eq!(b.elementwise_sub(&a).unwrap(), m(vec![vec![2.0, 3.0]]));
        assert!(a.elementwise_add(&a.transpose()).is_err());
    }

    #[test]
    fn add_scaled_updates_in_place() {
        let mut a = m(vec![vec![1.0, 1.0]]);
        a.add_scaled(&m(vec![vec![2.0, -4.0]]), 0.5).unwrap();
        assert_eq!(a, m(vec![vec![2.0, -1.0]]));
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = Matrix::uniform(8, 5, -0.5, 0.5, &mut rng);
        assert_eq!(w.shape(), (8, 5));
        assert!(w.data.iter().flatten().all(|&x| (-0.5..0.5).contains(&x)));
    }
}

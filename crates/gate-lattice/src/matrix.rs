//! Dense exact matrices.

use std::ops::Mul;

use gate_core::errors::{dimension_mismatch, GateError};
use gate_core::Limits;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::arith::exact_div;

/// Dense row-major matrix with exact entries.
///
/// Shapes with zero rows or zero columns are valid; a `b2 x 0` matrix is how
/// "no generators" is represented, and it still remembers its row count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

/// Integer matrix.
pub type IntMatrix = Matrix<BigInt>;
/// Rational matrix.
pub type RatMatrix = Matrix<BigRational>;

impl<T: Clone + Zero> Matrix<T> {
    /// Creates a `rows x cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    /// Builds a matrix from row vectors, rejecting ragged input.
    ///
    /// An empty row list yields the `0 x 0` matrix.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GateError> {
        let cols = rows.first().map_or(0, Vec::len);
        Self::from_rows_with_cols(rows, cols)
    }

    /// Builds a matrix from row vectors with a known width, so that a
    /// zero-row matrix keeps its column count.
    pub fn from_rows_with_cols(rows: Vec<Vec<T>>, cols: usize) -> Result<Self, GateError> {
        let height = rows.len();
        let mut data = Vec::with_capacity(height * cols);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                let err = dimension_mismatch(
                    "ragged-rows",
                    format!("row {idx} has a different length than the matrix width"),
                    cols,
                    row.len(),
                );
                return Err(err);
            }
            data.extend(row);
        }
        Ok(Self {
            rows: height,
            cols,
            data,
        })
    }

    /// Builds a matrix whose columns are the given vectors, each of length `height`.
    pub fn from_columns(columns: &[Vec<T>], height: usize) -> Result<Self, GateError> {
        let mut out = Self::zeros(height, columns.len());
        for (col, values) in columns.iter().enumerate() {
            out.set_column(col, values)?;
        }
        Ok(out)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the matrix has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether every entry is zero (vacuously true for empty shapes).
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(Zero::is_zero)
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.cols + col]
    }

    /// Overwrites the entry at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrowed view of a row.
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Copy of a column.
    pub fn column(&self, col: usize) -> Vec<T> {
        (0..self.rows).map(|row| self.get(row, col).clone()).collect()
    }

    /// All columns, left to right.
    pub fn columns(&self) -> Vec<Vec<T>> {
        (0..self.cols).map(|col| self.column(col)).collect()
    }

    /// Replaces a column with the given values.
    pub fn set_column(&mut self, col: usize, values: &[T]) -> Result<(), GateError> {
        if values.len() != self.rows {
            return Err(dimension_mismatch(
                "column-length",
                "column length does not match the row count",
                self.rows,
                values.len(),
            ));
        }
        for (row, value) in values.iter().enumerate() {
            self.set(row, col, value.clone());
        }
        Ok(())
    }

    /// Rows as owned vectors.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.rows).map(|row| self.row(row).to_vec()).collect()
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.set(col, row, self.get(row, col).clone());
            }
        }
        out
    }

    /// Horizontal concatenation `[self | other]`; row counts must agree.
    pub fn row_join(&self, other: &Self) -> Result<Self, GateError> {
        if self.rows != other.rows {
            return Err(dimension_mismatch(
                "row-join",
                "horizontally joined blocks must share the row count",
                self.rows,
                other.rows,
            ));
        }
        let cols = self.cols + other.cols;
        let mut data = Vec::with_capacity(self.rows * cols);
        for row in 0..self.rows {
            data.extend_from_slice(self.row(row));
            data.extend_from_slice(other.row(row));
        }
        Ok(Self {
            rows: self.rows,
            cols,
            data,
        })
    }

    /// Vertical concatenation; column counts must agree.
    pub fn col_join(&self, other: &Self) -> Result<Self, GateError> {
        if self.cols != other.cols {
            return Err(dimension_mismatch(
                "col-join",
                "vertically joined blocks must share the column count",
                self.cols,
                other.cols,
            ));
        }
        let mut data = self.data.clone();
        data.extend_from_slice(&other.data);
        Ok(Self {
            rows: self.rows + other.rows,
            cols: self.cols,
            data,
        })
    }

    /// Applies `f` to every entry.
    pub fn map<U, F>(&self, f: F) -> Matrix<U>
    where
        F: FnMut(&T) -> U,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in 0..self.cols {
            self.data.swap(a * self.cols + col, b * self.cols + col);
        }
    }

    pub(crate) fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for row in 0..self.rows {
            self.data.swap(row * self.cols + a, row * self.cols + b);
        }
    }
}

impl<T: Clone + Zero + One> Matrix<T> {
    /// Square identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut out = Self::zeros(n, n);
        for idx in 0..n {
            out.set(idx, idx, T::one());
        }
        out
    }
}

impl<T> Matrix<T>
where
    T: Clone + Zero,
    for<'a> &'a T: Mul<&'a T, Output = T>,
{
    /// Exact matrix product `self * rhs`.
    pub fn mul(&self, rhs: &Self) -> Result<Self, GateError> {
        if self.cols != rhs.rows {
            return Err(dimension_mismatch(
                "matmul",
                "inner dimensions of the product differ",
                self.cols,
                rhs.rows,
            ));
        }
        let mut out = Self::zeros(self.rows, rhs.cols);
        for row in 0..self.rows {
            for col in 0..rhs.cols {
                let mut acc = T::zero();
                for k in 0..self.cols {
                    acc = acc + self.get(row, k) * rhs.get(k, col);
                }
                out.set(row, col, acc);
            }
        }
        Ok(out)
    }

    /// Exact matrix-vector product `self * v`.
    pub fn mul_vec(&self, v: &[T]) -> Result<Vec<T>, GateError> {
        if self.cols != v.len() {
            return Err(dimension_mismatch(
                "matvec",
                "vector length does not match the column count",
                self.cols,
                v.len(),
            ));
        }
        Ok((0..self.rows)
            .map(|row| {
                self.row(row)
                    .iter()
                    .zip(v)
                    .fold(T::zero(), |acc, (a, b)| acc + a * b)
            })
            .collect())
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&self, factor: &T) -> Self {
        self.map(|value| value * factor)
    }
}

impl IntMatrix {
    /// Builds an integer matrix from machine-integer rows.
    pub fn from_i64_rows(rows: &[&[i64]]) -> Result<Self, GateError> {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().copied().map(BigInt::from).collect())
                .collect(),
        )
    }

    /// Lifts every entry into the rationals.
    pub fn to_rational(&self) -> RatMatrix {
        self.map(|value| BigRational::from_integer(value.clone()))
    }

    /// Exact determinant by fraction-free (Bareiss) elimination.
    pub fn determinant(&self) -> Result<BigInt, GateError> {
        if self.rows != self.cols {
            return Err(dimension_mismatch(
                "determinant-shape",
                "determinant requires a square matrix",
                self.rows,
                self.cols,
            ));
        }
        let n = self.rows;
        if n == 0 {
            return Ok(BigInt::one());
        }
        let mut a = self.clone();
        let mut negate = false;
        let mut previous = BigInt::one();
        for k in 0..n - 1 {
            if a.get(k, k).is_zero() {
                match (k + 1..n).find(|&row| !a.get(row, k).is_zero()) {
                    Some(row) => {
                        a.swap_rows(k, row);
                        negate = !negate;
                    }
                    None => return Ok(BigInt::zero()),
                }
            }
            for i in k + 1..n {
                for j in k + 1..n {
                    let cross = a.get(i, j) * a.get(k, k) - a.get(i, k) * a.get(k, j);
                    a.set(i, j, exact_div(&cross, &previous)?);
                }
            }
            previous = a.get(k, k).clone();
        }
        let det = a.get(n - 1, n - 1).clone();
        Ok(if negate { -det } else { det })
    }

    /// Applies `rows[i], rows[j] <- (a*ri + b*rj, c*ri + d*rj)`.
    pub(crate) fn combine_rows(&mut self, i: usize, j: usize, coeffs: [&BigInt; 4]) {
        let [a, b, c, d] = coeffs;
        for col in 0..self.cols {
            let ri = self.get(i, col).clone();
            let rj = self.get(j, col).clone();
            self.set(i, col, a * &ri + b * &rj);
            self.set(j, col, c * &ri + d * &rj);
        }
    }

    /// Applies `cols[i], cols[j] <- (a*ci + b*cj, c*ci + d*cj)`.
    pub(crate) fn combine_cols(&mut self, i: usize, j: usize, coeffs: [&BigInt; 4]) {
        let [a, b, c, d] = coeffs;
        for row in 0..self.rows {
            let ci = self.get(row, i).clone();
            let cj = self.get(row, j).clone();
            self.set(row, i, a * &ci + b * &cj);
            self.set(row, j, c * &ci + d * &cj);
        }
    }

    /// `rows[target] += factor * rows[source]`.
    pub(crate) fn add_row_multiple(&mut self, target: usize, source: usize, factor: &BigInt) {
        for col in 0..self.cols {
            let value = self.get(target, col) + factor * self.get(source, col);
            self.set(target, col, value);
        }
    }

    /// Negates a row in place.
    pub(crate) fn negate_row(&mut self, row: usize) {
        for col in 0..self.cols {
            let value = -self.get(row, col);
            self.set(row, col, value);
        }
    }
}

/// Rejects matrices whose shape exceeds `limits`.
pub fn ensure_within<T>(matrix: &Matrix<T>, limits: &Limits) -> Result<(), GateError> {
    limits.check(matrix.rows, matrix.cols)
}

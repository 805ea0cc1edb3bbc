//! Integer kernels via exact rational elimination.

use gate_core::errors::GateError;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::canonical::{canonicalize, dedup_primitive, PrimitiveVector};
use crate::matrix::{IntMatrix, RatMatrix};

/// Reduced row-echelon form over the rationals and the pivot column of each
/// non-zero row.
pub fn rational_rref(m: &RatMatrix) -> (RatMatrix, Vec<usize>) {
    let (rows, cols) = m.shape();
    let mut r = m.clone();
    let mut pivots = Vec::new();
    let mut lead = 0;
    for col in 0..cols {
        if lead == rows {
            break;
        }
        let Some(found) = (lead..rows).find(|&row| !r.get(row, col).is_zero()) else {
            continue;
        };
        r.swap_rows(lead, found);

        let inverse = r.get(lead, col).recip();
        if !inverse.is_one() {
            for j in col..cols {
                let value = r.get(lead, j) * &inverse;
                r.set(lead, j, value);
            }
        }
        for row in 0..rows {
            if row == lead || r.get(row, col).is_zero() {
                continue;
            }
            let factor = r.get(row, col).clone();
            for j in col..cols {
                let value = r.get(row, j) - &factor * r.get(lead, j);
                r.set(row, j, value);
            }
        }
        pivots.push(col);
        lead += 1;
    }
    (r, pivots)
}

/// Rank over the rationals.
pub fn rational_rank(m: &RatMatrix) -> usize {
    rational_rref(m).1.len()
}

/// Rational basis of `{x : m x = 0}`, one vector per free column.
///
/// The basis vector for free column `f` has a one at `f`, zeros at the other
/// free columns, and `-rref[i][f]` at the pivot column of row `i`.
pub fn right_kernel_rational(m: &RatMatrix) -> Vec<Vec<BigRational>> {
    let cols = m.cols();
    let (rref, pivots) = rational_rref(m);
    let mut is_pivot = vec![false; cols];
    for &col in &pivots {
        is_pivot[col] = true;
    }

    (0..cols)
        .filter(|&col| !is_pivot[col])
        .map(|free| {
            let mut v = vec![BigRational::zero(); cols];
            v[free] = BigRational::one();
            for (row, &pivot) in pivots.iter().enumerate() {
                v[pivot] = -rref.get(row, free);
            }
            v
        })
        .collect()
}

/// Canonical primitive basis of the right kernel of an integer matrix.
///
/// The basis has `cols - rank` vectors; a zero-column matrix or one of full
/// column rank has an empty kernel.
pub fn right_kernel(m: &IntMatrix) -> Result<Vec<PrimitiveVector>, GateError> {
    right_kernel_of_rational(&m.to_rational())
}

/// Canonical primitive basis of the right kernel of a rational matrix.
pub fn right_kernel_of_rational(m: &RatMatrix) -> Result<Vec<PrimitiveVector>, GateError> {
    let basis = right_kernel_rational(m)
        .iter()
        .map(|v| canonicalize(v))
        .collect::<Result<Vec<_>, _>>()?;
    let basis = dedup_primitive(basis);
    tracing::debug!(
        rows = m.rows(),
        cols = m.cols(),
        dim = basis.len(),
        "right kernel"
    );
    Ok(basis)
}

/// Left kernel `{y : y^T m = 0}`, computed as the right kernel of `m^T`.
pub fn left_kernel(m: &IntMatrix) -> Result<Vec<PrimitiveVector>, GateError> {
    right_kernel(&m.transpose())
}

/// Stacks basis vectors as the columns of a `dim x len` matrix.
pub fn kernel_matrix(basis: &[PrimitiveVector], dim: usize) -> Result<IntMatrix, GateError> {
    let columns: Vec<Vec<BigInt>> = basis.iter().map(|v| v.entries().to_vec()).collect();
    IntMatrix::from_columns(&columns, dim)
}

//! Hermite and Smith normal forms over the integers.
//!
//! Both forms are computed with unimodular elementary operations only. Two
//! rows (or columns) whose pivot entries are `a` and `b` are replaced by the
//! Bezout combination carrying `gcd(a, b)` and the combination that zeroes
//! `b`; the 2x2 transform `[[x, y], [-b/g, a/g]]` has determinant one.

use gate_core::errors::GateError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::arith::exact_div;
use crate::bezout::extended_gcd;
use crate::matrix::IntMatrix;

/// Row-Hermite form `h = transform * m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HermiteForm {
    /// Reduced matrix; non-zero rows first, pivots positive, entries above a
    /// pivot reduced into `[0, pivot)`.
    pub h: IntMatrix,
    /// Unimodular row transform.
    pub transform: IntMatrix,
    /// Number of non-zero rows.
    pub rank: usize,
    /// Pivot column of each non-zero row.
    pub pivots: Vec<usize>,
}

impl HermiteForm {
    /// The non-zero rows of `h`, which form a basis of the row lattice.
    pub fn basis(&self) -> Vec<Vec<BigInt>> {
        (0..self.rank).map(|row| self.h.row(row).to_vec()).collect()
    }
}

/// Smith normal form `diagonal = left * m * right`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmithForm {
    /// Non-zero diagonal entries `d1 | d2 | ... | dr`, all positive.
    #[serde(with = "crate::serde_num::vec")]
    pub invariants: Vec<BigInt>,
    /// Integer rank, the number of invariant factors.
    pub rank: usize,
    /// Diagonal matrix with the shape of the input.
    pub diagonal: IntMatrix,
    /// Unimodular row transform `U`.
    pub left: IntMatrix,
    /// Unimodular column transform `V`.
    pub right: IntMatrix,
}

impl SmithForm {
    /// Whether every invariant factor divides the next one.
    pub fn divisibility_chain_holds(&self) -> bool {
        self.invariants
            .windows(2)
            .all(|pair| pair[1].is_multiple_of(&pair[0]))
    }
}

/// Unimodular 2x2 transform sending `(a, b)` to `(g, 0)`.
///
/// When `a` already divides `b` the pivot is kept and `b` is eliminated
/// directly; the extended-Euclid transform would swap the pair instead when
/// `|a| = |b|`.
fn bezout_transform(a: &BigInt, b: &BigInt) -> Result<[BigInt; 4], GateError> {
    if !a.is_zero() && b.is_multiple_of(a) {
        let q = exact_div(b, a)?;
        return Ok([BigInt::one(), BigInt::zero(), -q, BigInt::one()]);
    }
    let (g, x, y) = extended_gcd(a, b);
    let c = -exact_div(b, &g)?;
    let d = exact_div(a, &g)?;
    Ok([x, y, c, d])
}

/// Computes the row-Hermite normal form of `m`.
///
/// Shapes with no rows or no columns are returned unchanged with an identity
/// transform.
pub fn hermite_normal_form(m: &IntMatrix) -> Result<HermiteForm, GateError> {
    let (rows, cols) = m.shape();
    let mut h = m.clone();
    let mut transform = IntMatrix::identity(rows);
    let mut pivots = Vec::new();
    if rows == 0 || cols == 0 {
        return Ok(HermiteForm {
            h,
            transform,
            rank: 0,
            pivots,
        });
    }

    let mut pivot_row = 0;
    for col in 0..cols {
        if pivot_row == rows {
            break;
        }
        for row in pivot_row + 1..rows {
            if h.get(row, col).is_zero() {
                continue;
            }
            let [x, y, c, d] = bezout_transform(h.get(pivot_row, col), h.get(row, col))?;
            h.combine_rows(pivot_row, row, [&x, &y, &c, &d]);
            transform.combine_rows(pivot_row, row, [&x, &y, &c, &d]);
        }
        if h.get(pivot_row, col).is_zero() {
            continue;
        }
        if h.get(pivot_row, col).is_negative() {
            h.negate_row(pivot_row);
            transform.negate_row(pivot_row);
        }
        let pivot = h.get(pivot_row, col).clone();
        for row in 0..pivot_row {
            let q = h.get(row, col).div_floor(&pivot);
            if q.is_zero() {
                continue;
            }
            let factor = -q;
            h.add_row_multiple(row, pivot_row, &factor);
            transform.add_row_multiple(row, pivot_row, &factor);
        }
        pivots.push(col);
        pivot_row += 1;
    }

    tracing::debug!(rows, cols, rank = pivot_row, "hermite normal form");
    Ok(HermiteForm {
        h,
        transform,
        rank: pivot_row,
        pivots,
    })
}

fn find_pivot(d: &IntMatrix, t: usize) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for row in t..d.rows() {
        for col in t..d.cols() {
            let value = d.get(row, col);
            if value.is_zero() {
                continue;
            }
            let better = match best {
                Some((r, c)) => value.abs() < d.get(r, c).abs(),
                None => true,
            };
            if better {
                best = Some((row, col));
            }
        }
    }
    best
}

fn find_non_multiple(d: &IntMatrix, t: usize) -> Option<usize> {
    let pivot = d.get(t, t);
    (t + 1..d.rows()).find(|&row| {
        (t + 1..d.cols()).any(|col| !d.get(row, col).is_multiple_of(pivot))
    })
}

/// Computes the Smith normal form of `m` together with its transforms.
pub fn smith_normal_form(m: &IntMatrix) -> Result<SmithForm, GateError> {
    let (rows, cols) = m.shape();
    let mut d = m.clone();
    let mut left = IntMatrix::identity(rows);
    let mut right = IntMatrix::identity(cols);

    let mut t = 0;
    while t < rows.min(cols) {
        let Some((pr, pc)) = find_pivot(&d, t) else {
            break;
        };
        d.swap_rows(t, pr);
        left.swap_rows(t, pr);
        d.swap_cols(t, pc);
        right.swap_cols(t, pc);

        loop {
            for row in t + 1..rows {
                if d.get(row, t).is_zero() {
                    continue;
                }
                let [x, y, c, e] = bezout_transform(d.get(t, t), d.get(row, t))?;
                d.combine_rows(t, row, [&x, &y, &c, &e]);
                left.combine_rows(t, row, [&x, &y, &c, &e]);
            }
            for col in t + 1..cols {
                if d.get(t, col).is_zero() {
                    continue;
                }
                let [x, y, c, e] = bezout_transform(d.get(t, t), d.get(t, col))?;
                d.combine_cols(t, col, [&x, &y, &c, &e]);
                right.combine_cols(t, col, [&x, &y, &c, &e]);
            }
            let column_clear = (t + 1..rows).all(|row| d.get(row, t).is_zero());
            if !column_clear {
                continue;
            }
            // Pivot is isolated; pull in any row that breaks divisibility.
            match find_non_multiple(&d, t) {
                Some(row) => {
                    let one = BigInt::one();
                    d.add_row_multiple(t, row, &one);
                    left.add_row_multiple(t, row, &one);
                }
                None => break,
            }
        }

        if d.get(t, t).is_negative() {
            d.negate_row(t);
            left.negate_row(t);
        }
        t += 1;
    }

    let invariants: Vec<BigInt> = (0..t).map(|idx| d.get(idx, idx).clone()).collect();
    tracing::debug!(rows, cols, rank = t, "smith normal form");
    Ok(SmithForm {
        invariants,
        rank: t,
        diagonal: d,
        left,
        right,
    })
}

/// Integer rank of `m`, read off its Hermite form.
pub fn integer_rank(m: &IntMatrix) -> Result<usize, GateError> {
    Ok(hermite_normal_form(m)?.rank)
}

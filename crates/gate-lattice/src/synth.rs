//! Charge-lattice synthesis from the cokernel of `B = C | L`.
//!
//! `C` and `L` are integer blocks with `b2` rows each (either may be absent).
//! Integer vectors `k` with `B^T k = 0` label the unbroken charge directions;
//! a chosen `k` is made exactly orthogonal to both blocks with a Bezout
//! partner and mapped onto field charges through the invariant charge basis.

use std::collections::BTreeMap;

use gate_core::errors::{dimension_mismatch, ErrorInfo, GateError};
use gate_core::Limits;
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::arith::to_rational;
use crate::bezout::bezout_vector;
use crate::canonical::{canonicalize_int, try_canonicalize, PrimitiveVector};
use crate::charges::ChargeModel;
use crate::kernel::left_kernel;
use crate::matrix::{ensure_within, IntMatrix};
use crate::orthogonal::{annihilates, orthogonalize_against};

/// Row-list form of the two blocks as they appear in model files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeSpec {
    /// `C` block rows.
    #[serde(rename = "CdotGG", default, with = "crate::serde_num::rows")]
    pub c: Vec<Vec<BigInt>>,
    /// `L` block rows.
    #[serde(rename = "L", default, with = "crate::serde_num::rows")]
    pub l: Vec<Vec<BigInt>>,
}

/// A model file: field content plus the lattice blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UvConfig {
    /// Field content and invariance operators.
    #[serde(flatten)]
    pub model: ChargeModel,
    /// Lattice blocks.
    #[serde(flatten)]
    pub lattice: LatticeSpec,
}

/// The two lattice blocks with a shared row count `b2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLattice {
    /// `C` block, `b2 x nc` (`nc` may be zero).
    pub c: IntMatrix,
    /// `L` block, `b2 x nl` (`nl` may be zero).
    pub l: IntMatrix,
}

impl ChargeLattice {
    /// Builds the lattice from row lists, padding an absent block to
    /// `b2 x 0`.
    pub fn from_blocks(c: Vec<Vec<BigInt>>, l: Vec<Vec<BigInt>>) -> Result<Self, GateError> {
        let b2 = c.len().max(l.len());
        if b2 == 0 {
            return Err(GateError::DimensionMismatch(
                ErrorInfo::new("empty-lattice", "both C and L are absent")
                    .with_hint("provide at least one of `CdotGG` or `L`"),
            ));
        }
        let c = block(c, b2, "C")?;
        let l = block(l, b2, "L")?;
        Ok(Self { c, l })
    }

    /// Builds the lattice from its file form.
    pub fn from_spec(spec: &LatticeSpec) -> Result<Self, GateError> {
        Self::from_blocks(spec.c.clone(), spec.l.clone())
    }

    /// Shared row count.
    pub fn b2(&self) -> usize {
        self.c.rows()
    }

    /// The joined matrix `B = C | L`; fails when neither block has a column.
    pub fn b(&self) -> Result<IntMatrix, GateError> {
        if self.c.cols() == 0 && self.l.cols() == 0 {
            return Err(GateError::DimensionMismatch(
                ErrorInfo::new("empty-lattice", "C and L have no columns")
                    .with_context("b2", self.b2().to_string()),
            ));
        }
        self.c.row_join(&self.l)
    }

    /// Primitive generators of `ker(B^T)`.
    pub fn kernel_generators(&self) -> Result<Vec<PrimitiveVector>, GateError> {
        left_kernel(&self.b()?)
    }

    /// Rejects lattices whose joined matrix exceeds `limits`.
    pub fn ensure_within(&self, limits: &Limits) -> Result<(), GateError> {
        limits.check(self.b2(), self.c.cols() + self.l.cols())
    }
}

fn block(rows: Vec<Vec<BigInt>>, b2: usize, name: &str) -> Result<IntMatrix, GateError> {
    if rows.is_empty() {
        return Ok(IntMatrix::zeros(b2, 0));
    }
    if rows.len() != b2 {
        return Err(GateError::DimensionMismatch(
            ErrorInfo::new("block-rows", format!("block {name} must have b2 rows"))
                .with_context("block", name)
                .with_context("expected", b2.to_string())
                .with_context("found", rows.len().to_string()),
        ));
    }
    IntMatrix::from_rows(rows)
}

/// One `ker(B^T)` generator and the field charges it induces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeGenerator {
    /// Primitive kernel generator.
    pub k: PrimitiveVector,
    /// Charges `Q k` by field name.
    #[serde(with = "crate::serde_num::map")]
    pub charges: BTreeMap<String, BigInt>,
}

/// Field charges of every kernel generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChargeReport {
    /// Field order of the model.
    pub field_order: Vec<String>,
    /// Shared row count of the lattice blocks.
    pub b2: usize,
    /// One entry per generator of `ker(B^T)`.
    pub generators: Vec<ChargeGenerator>,
}

fn charges_of(q: &IntMatrix, k: &[BigInt]) -> Result<Vec<BigInt>, GateError> {
    if q.cols() != k.len() {
        return Err(GateError::DimensionMismatch(
            ErrorInfo::new(
                "charge-basis-width",
                "the invariant charge basis must have one column per lattice row",
            )
            .with_context("basis_cols", q.cols().to_string())
            .with_context("b2", k.len().to_string()),
        ));
    }
    q.mul_vec(k)
}

/// Maps every generator of `ker(B^T)` to field charges through the
/// invariant charge basis of `model`.
pub fn field_charges(
    model: &ChargeModel,
    lattice: &ChargeLattice,
) -> Result<FieldChargeReport, GateError> {
    let q = model.charge_basis()?;
    let generators = lattice
        .kernel_generators()?
        .into_iter()
        .map(|k| {
            let values = charges_of(&q, k.entries())?;
            let charges = model.field_order.iter().cloned().zip(values).collect();
            Ok(ChargeGenerator { k, charges })
        })
        .collect::<Result<Vec<_>, GateError>>()?;
    tracing::debug!(generators = generators.len(), "field charges");
    Ok(FieldChargeReport {
        field_order: model.field_order.clone(),
        b2: lattice.b2(),
        generators,
    })
}

/// Result of synthesizing a lattice that keeps a chosen direction `k`
/// unbroken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisReport {
    /// Shared row count.
    pub b2: usize,
    /// Primitive combination of the kernel generators.
    pub k: PrimitiveVector,
    /// Bezout partner with `k . w = 1`.
    #[serde(with = "crate::serde_num::vec")]
    pub w: Vec<BigInt>,
    /// Re-orthogonalized lattice.
    pub lattice: ChargeLattice,
    /// Whether `B'^T k = 0`.
    pub k_in_kernel: bool,
    /// Primitive field charges of the dark direction.
    pub q_dm: PrimitiveVector,
    /// Whether `A q_dm = 0` (vacuously true without operators).
    pub yukawa_invariant: bool,
}

fn join_ints(values: &[BigInt]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Combines the kernel generators with `coeffs`, orthogonalizes both blocks
/// against the resulting direction and derives its field charges.
pub fn synthesize(
    model: &ChargeModel,
    lattice: &ChargeLattice,
    coeffs: &[BigInt],
) -> Result<SynthesisReport, GateError> {
    let generators = lattice.kernel_generators()?;
    if coeffs.len() != generators.len() {
        return Err(dimension_mismatch(
            "coefficient-count",
            "one coefficient per generator of ker(B^T) is required",
            generators.len(),
            coeffs.len(),
        ));
    }
    let b2 = lattice.b2();
    let mut combined = vec![BigInt::zero(); b2];
    for (coeff, generator) in coeffs.iter().zip(&generators) {
        for (acc, value) in combined.iter_mut().zip(generator.entries()) {
            *acc += coeff * value;
        }
    }
    let combined: Vec<_> = combined.iter().map(to_rational).collect();
    let Some(k) = try_canonicalize(&combined) else {
        return Err(GateError::ZeroVectorCanonicalization(
            ErrorInfo::new("zero-combination", "the coefficients cancel every generator")
                .with_context("coeffs", join_ints(coeffs))
                .with_hint("pick coefficients that give a non-zero direction in ker(B^T)"),
        ));
    };
    let w = bezout_vector(k.entries())?;

    let c = orthogonalize_against(&lattice.c, k.entries(), &w)?;
    let l = orthogonalize_against(&lattice.l, k.entries(), &w)?;
    let lattice = ChargeLattice { c, l };
    let b = lattice.b()?;
    let k_in_kernel = annihilates(k.entries(), &b);

    let q = model.charge_basis()?;
    let q_dm = canonicalize_int(&charges_of(&q, k.entries())?)?;
    let a = model.invariance_matrix()?;
    let yukawa_invariant = a.mul_vec(q_dm.entries())?.iter().all(Zero::is_zero);

    tracing::debug!(b2, k_in_kernel, yukawa_invariant, "synthesized lattice");
    Ok(SynthesisReport {
        b2,
        k,
        w,
        lattice,
        k_in_kernel,
        q_dm,
        yukawa_invariant,
    })
}

/// Checks the lattice against `limits` before synthesizing.
pub fn synthesize_within(
    model: &ChargeModel,
    lattice: &ChargeLattice,
    coeffs: &[BigInt],
    limits: &Limits,
) -> Result<SynthesisReport, GateError> {
    lattice.ensure_within(limits)?;
    ensure_within(&model.invariance_matrix()?, limits)?;
    synthesize(model, lattice, coeffs)
}

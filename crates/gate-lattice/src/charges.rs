//! Field content and Yukawa-invariance constraints on charge assignments.

use std::collections::BTreeMap;

use gate_core::errors::{ErrorInfo, GateError};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::kernel::{kernel_matrix, right_kernel};
use crate::matrix::IntMatrix;

fn default_operators() -> BTreeMap<String, Vec<String>> {
    [
        ("QuH", ["Q", "uR", "H"]),
        ("QdH", ["Q", "dR", "H"]),
        ("LeH", ["L", "eR", "H"]),
    ]
    .into_iter()
    .map(|(name, fields)| {
        (
            name.to_owned(),
            fields.iter().map(|field| (*field).to_owned()).collect(),
        )
    })
    .collect()
}

/// Field content of a model and the operators its charges must leave
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeModel {
    /// Field names; fixes the coordinate order of charge vectors.
    pub field_order: Vec<String>,
    /// Active Yukawa operators, looked up in `operators`.
    #[serde(default)]
    pub yukawa_active: Vec<String>,
    /// Fields with a Majorana mass term, which forces `2 q = 0`.
    #[serde(default)]
    pub majorana: Vec<String>,
    /// Operator table: operator name to the fields it contains (with
    /// repetition).
    #[serde(default = "default_operators")]
    pub operators: BTreeMap<String, Vec<String>>,
}

impl Default for ChargeModel {
    fn default() -> Self {
        Self {
            field_order: Vec::new(),
            yukawa_active: Vec::new(),
            majorana: Vec::new(),
            operators: default_operators(),
        }
    }
}

impl ChargeModel {
    /// Creates a model over `fields` with the standard operator table.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_order: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Activates a Yukawa operator.
    pub fn with_yukawa(mut self, operator: impl Into<String>) -> Self {
        self.yukawa_active.push(operator.into());
        self
    }

    /// Adds a Majorana mass for `field`.
    pub fn with_majorana(mut self, field: impl Into<String>) -> Self {
        self.majorana.push(field.into());
        self
    }

    fn field_index(&self, field: &str) -> Result<usize, GateError> {
        self.field_order
            .iter()
            .position(|name| name == field)
            .ok_or_else(|| {
                GateError::DimensionMismatch(
                    ErrorInfo::new("unknown-field", format!("field `{field}` is not in field_order"))
                        .with_context("field", field)
                        .with_context("field_order", self.field_order.join(",")),
                )
            })
    }

    /// Invariance matrix `A`: one row per active operator (field
    /// multiplicities) and one row per Majorana field (a single 2).
    ///
    /// A charge vector `q` leaves every term invariant iff `A q = 0`.
    pub fn invariance_matrix(&self) -> Result<IntMatrix, GateError> {
        let width = self.field_order.len();
        let mut rows = Vec::new();
        for operator in &self.yukawa_active {
            let fields = self.operators.get(operator).ok_or_else(|| {
                GateError::DimensionMismatch(
                    ErrorInfo::new(
                        "unknown-operator",
                        format!("operator `{operator}` is not in the operator table"),
                    )
                    .with_context("operator", operator.as_str()),
                )
            })?;
            let mut row = vec![0_i64; width];
            for field in fields {
                row[self.field_index(field)?] += 1;
            }
            rows.push(row);
        }
        for field in &self.majorana {
            let mut row = vec![0_i64; width];
            row[self.field_index(field)?] = 2;
            rows.push(row);
        }
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(BigInt::from).collect())
            .collect();
        IntMatrix::from_rows_with_cols(rows, width)
    }

    /// Basis of invariant charge assignments, as the columns of a
    /// `fields x n` matrix. With no operators every assignment is invariant
    /// and the basis is the identity.
    pub fn charge_basis(&self) -> Result<IntMatrix, GateError> {
        let a = self.invariance_matrix()?;
        if a.rows() == 0 {
            return Ok(IntMatrix::identity(a.cols()));
        }
        let basis = right_kernel(&a)?;
        kernel_matrix(&basis, a.cols())
    }
}

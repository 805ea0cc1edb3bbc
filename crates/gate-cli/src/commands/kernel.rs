use std::error::Error;

use clap::{Args, ValueEnum};
use gate_core::{Limits, Verdict};
use gate_lattice::{
    annihilates, ensure_within, integer_rank, left_kernel, rational_rank, right_kernel, GateCheck,
    IntMatrix, PrimitiveVector,
};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use super::print_status;
use crate::{emit, Input, IoArgs};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    /// Vectors `x` with `M x = 0`.
    Right,
    /// Vectors `y` with `y^T M = 0`.
    Left,
}

#[derive(Args, Debug)]
pub struct KernelArgs {
    #[command(flatten)]
    pub io: IoArgs,
    /// Which kernel to extract.
    #[arg(long, value_enum, default_value_t = Side::Right)]
    pub side: Side,
}

#[derive(Debug, Deserialize)]
struct MatrixInput {
    #[serde(with = "gate_lattice::serde_num::rows")]
    rows: Vec<Vec<BigInt>>,
    #[serde(default)]
    cols: Option<usize>,
    #[serde(default)]
    limits: Limits,
}

#[derive(Debug, Serialize)]
struct KernelReport {
    side: Side,
    rank: usize,
    dimension: usize,
    basis: Vec<PrimitiveVector>,
    checks: Vec<GateCheck>,
    verdict: Verdict,
}

pub fn run(args: &KernelArgs) -> Result<(), Box<dyn Error>> {
    let input = Input::read(&args.io.input)?;
    let spec: MatrixInput = input.parse()?;
    let matrix = match spec.cols {
        Some(cols) => IntMatrix::from_rows_with_cols(spec.rows, cols)?,
        None => IntMatrix::from_rows(spec.rows)?,
    };
    ensure_within(&matrix, &spec.limits.sanitised())?;

    // The left kernel of M is the right kernel of M^T.
    let oriented = match args.side {
        Side::Right => matrix.clone(),
        Side::Left => matrix.transpose(),
    };
    let basis = match args.side {
        Side::Right => right_kernel(&matrix)?,
        Side::Left => left_kernel(&matrix)?,
    };
    let rank = integer_rank(&matrix)?;
    let dimension = basis.len();

    let annihilated = basis
        .iter()
        .all(|vector| annihilates_right(&oriented, vector));
    let expected = oriented.cols() - rank;
    let mut checks = vec![GateCheck {
        name: "KERNEL_ANNIHILATES".to_owned(),
        verdict: Verdict::from_pass(annihilated),
        detail: if annihilated { "ok" } else { "M x != 0" }.to_owned(),
    }];
    checks.push(GateCheck {
        name: "KERNEL_DIMENSION".to_owned(),
        verdict: Verdict::from_pass(dimension == expected),
        detail: if dimension == expected {
            "ok".to_owned()
        } else {
            format!("dimension {dimension}, expected {expected}")
        },
    });
    // Rank over Q must agree with the rank read off the Hermite form.
    let rational = rational_rank(&matrix.to_rational());
    checks.push(GateCheck {
        name: "KERNEL_RANK".to_owned(),
        verdict: Verdict::from_pass(rational == rank),
        detail: if rational == rank {
            "ok".to_owned()
        } else {
            format!("rank over Q {rational}, integer rank {rank}")
        },
    });
    let verdict = Verdict::from_pass(checks.iter().all(GateCheck::passed));
    tracing::info!(side = ?args.side, rank, dimension, %verdict, "kernel extracted");

    let mut lines: Vec<String> = checks.iter().map(GateCheck::status_line).collect();
    lines.push(format!("KERNEL:{verdict}"));
    let report = KernelReport {
        side: args.side,
        rank,
        dimension,
        basis,
        checks,
        verdict,
    };
    emit(&args.io, &input, "kernel", &report)?;
    print_status(&args.io, &lines);
    Ok(())
}

fn annihilates_right(matrix: &IntMatrix, vector: &PrimitiveVector) -> bool {
    // `annihilates(k, B)` tests `B^T k = 0`, so hand it the transpose.
    annihilates(vector.entries(), &matrix.transpose())
}

use std::error::Error;

use clap::Args;
use gate_core::{Limits, Verdict};
use gate_lattice::{
    ensure_within, hermite_normal_form, smith_normal_form, unimodular_gate, GateCheck,
    HermiteForm, IntMatrix, SmithForm,
};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use super::print_status;
use crate::{emit, Input, IoArgs};

#[derive(Args, Debug)]
pub struct NormalFormArgs {
    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Debug, Deserialize)]
struct MatrixInput {
    #[serde(with = "gate_lattice::serde_num::rows")]
    rows: Vec<Vec<BigInt>>,
    /// Column count, needed only for matrices without rows.
    #[serde(default)]
    cols: Option<usize>,
    #[serde(default)]
    limits: Limits,
}

impl MatrixInput {
    fn matrix(self) -> Result<IntMatrix, Box<dyn Error>> {
        let matrix = match self.cols {
            Some(cols) => IntMatrix::from_rows_with_cols(self.rows, cols)?,
            None => IntMatrix::from_rows(self.rows)?,
        };
        ensure_within(&matrix, &self.limits.sanitised())?;
        Ok(matrix)
    }
}

#[derive(Debug, Serialize)]
struct NormalFormReport {
    input: IntMatrix,
    hermite: HermiteForm,
    smith: SmithForm,
    checks: Vec<GateCheck>,
    verdict: Verdict,
}

pub fn run(args: &NormalFormArgs) -> Result<(), Box<dyn Error>> {
    let input = Input::read(&args.io.input)?;
    let matrix = input.parse::<MatrixInput>()?.matrix()?;
    let hermite = hermite_normal_form(&matrix)?;
    let smith = smith_normal_form(&matrix)?;

    let mut checks = vec![
        unimodular_gate("U_DET", &smith.left)?,
        unimodular_gate("V_DET", &smith.right)?,
        unimodular_gate("HNF_DET", &hermite.transform)?,
    ];
    let reproduced = smith.left.mul(&matrix)?.mul(&smith.right)? == smith.diagonal;
    checks.push(GateCheck {
        name: "SNF_IDENTITY".to_owned(),
        verdict: Verdict::from_pass(reproduced),
        detail: if reproduced { "ok" } else { "U*M*V != D" }.to_owned(),
    });
    let chain = smith.divisibility_chain_holds();
    checks.push(GateCheck {
        name: "SNF_CHAIN".to_owned(),
        verdict: Verdict::from_pass(chain),
        detail: if chain { "ok" } else { "invariants do not divide" }.to_owned(),
    });
    let verdict = Verdict::from_pass(checks.iter().all(GateCheck::passed));
    tracing::info!(rank = smith.rank, %verdict, "normal forms computed");

    let mut lines: Vec<String> = checks.iter().map(GateCheck::status_line).collect();
    lines.push(format!("NORMAL_FORM:{verdict}"));
    let report = NormalFormReport {
        input: matrix,
        hermite,
        smith,
        checks,
        verdict,
    };
    emit(&args.io, &input, "normal-form", &report)?;
    print_status(&args.io, &lines);
    Ok(())
}

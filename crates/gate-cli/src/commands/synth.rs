use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use gate_core::{serde_error, Limits, Verdict};
use gate_lattice::{synthesize_within, ChargeLattice, LatticeSpec, UvConfig};
use num_bigint::BigInt;

use super::print_status;
use crate::{emit, Input, IoArgs};

#[derive(Args, Debug)]
pub struct SynthArgs {
    #[command(flatten)]
    pub io: IoArgs,
    /// One integer coefficient per generator of ker(B^T).
    #[arg(long, num_args = 1.., value_delimiter = ',', allow_negative_numbers = true, required = true)]
    pub coeffs: Vec<i64>,
    /// Writes the model with the re-orthogonalized blocks as YAML.
    #[arg(long)]
    pub model_out: Option<PathBuf>,
}

pub fn run(args: &SynthArgs) -> Result<(), Box<dyn Error>> {
    let input = Input::read(&args.io.input)?;
    let config: UvConfig = input.parse()?;
    let lattice = ChargeLattice::from_spec(&config.lattice)?;
    let coeffs: Vec<BigInt> = args.coeffs.iter().copied().map(BigInt::from).collect();
    let report = synthesize_within(&config.model, &lattice, &coeffs, &Limits::default())?;

    let verdict = Verdict::from_pass(report.k_in_kernel && report.yukawa_invariant);
    tracing::info!(
        k_in_kernel = report.k_in_kernel,
        yukawa_invariant = report.yukawa_invariant,
        %verdict,
        "lattice synthesized"
    );

    if let Some(path) = &args.model_out {
        let updated = UvConfig {
            model: config.model.clone(),
            lattice: LatticeSpec {
                c: report.lattice.c.to_rows(),
                l: report.lattice.l.to_rows(),
            },
        };
        let yaml = serde_yaml::to_string(&updated).map_err(|err| serde_error("yaml-write", err))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml)?;
        tracing::info!(path = %path.display(), "updated model written");
    }

    let lines = [
        format!("K_IN_KERNEL:{}", Verdict::from_pass(report.k_in_kernel)),
        format!("YUKAWA_INVARIANT:{}", Verdict::from_pass(report.yukawa_invariant)),
        format!("SYNTH:{verdict}"),
    ];
    emit(&args.io, &input, "synth", &report)?;
    print_status(&args.io, &lines);
    Ok(())
}

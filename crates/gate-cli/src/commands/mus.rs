use std::error::Error;

use clap::Args;
use gate_mus::{mus_report, SystemSpec};

use super::print_status;
use crate::{emit, Input, IoArgs};

#[derive(Args, Debug)]
pub struct MusArgs {
    #[command(flatten)]
    pub io: IoArgs,
}

pub fn run(args: &MusArgs) -> Result<(), Box<dyn Error>> {
    let input = Input::read(&args.io.input)?;
    let spec: SystemSpec = input.parse()?;
    let system = spec.build()?;
    let report = mus_report(&spec.name, &system, &spec.core_ids())?;
    tracing::info!(
        system = %report.name,
        sat = report.sat,
        verdict = %report.verdict,
        "constraint system checked"
    );
    emit(&args.io, &input, "mus", &report)?;
    print_status(&args.io, &report.status_lines());
    Ok(())
}

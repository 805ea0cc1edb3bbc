use std::error::Error;

use clap::Args;
use gate_core::Limits;
use gate_lattice::{ensure_within, field_charges, ChargeLattice, UvConfig};

use super::print_status;
use crate::{emit, Input, IoArgs};

#[derive(Args, Debug)]
pub struct ChargesArgs {
    #[command(flatten)]
    pub io: IoArgs,
}

pub fn run(args: &ChargesArgs) -> Result<(), Box<dyn Error>> {
    let input = Input::read(&args.io.input)?;
    let config: UvConfig = input.parse()?;
    let lattice = ChargeLattice::from_spec(&config.lattice)?;
    let limits = Limits::default();
    lattice.ensure_within(&limits)?;
    ensure_within(&config.model.invariance_matrix()?, &limits)?;

    let report = field_charges(&config.model, &lattice)?;
    tracing::info!(
        b2 = report.b2,
        generators = report.generators.len(),
        "field charges computed"
    );
    let line = format!("FIELD_CHARGES:PASS:{} generator(s)", report.generators.len());
    emit(&args.io, &input, "field-charges", &report)?;
    print_status(&args.io, &[line]);
    Ok(())
}

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand};
use gate_core::{
    hash_bytes, serde_error, to_canonical_json_bytes, to_canonical_json_pretty, CertProvenance,
    GateError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{charges, kernel, mus, normal_form, synth};

#[derive(Parser, Debug)]
#[command(name = "gate", about = "Exact lattice gate certificates")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hermite and Smith normal forms of an integer matrix.
    NormalForm(normal_form::NormalFormArgs),
    /// Primitive integer kernel basis of a matrix.
    Kernel(kernel::KernelArgs),
    /// Field charges of every generator of ker(B^T).
    Charges(charges::ChargesArgs),
    /// Synthesize a lattice that keeps a chosen direction unbroken.
    Synth(synth::SynthArgs),
    /// Satisfiability and minimal unsatisfiable core of a constraint system.
    Mus(mus::MusArgs),
}

/// Input and output options shared by every subcommand.
#[derive(ClapArgs, Debug, Clone)]
pub struct IoArgs {
    /// YAML or JSON input file.
    #[arg(long = "in")]
    pub input: PathBuf,
    /// Certificate output path; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Pretty-print the certificate.
    #[arg(long)]
    pub pretty: bool,
}

/// A report stamped with the hash of the input it was computed from.
#[derive(Debug, Serialize)]
pub struct Certificate<'a, T: Serialize> {
    /// Input hash, schema and tool versions.
    pub provenance: CertProvenance,
    /// Gate name.
    pub gate: &'a str,
    /// Computed payload.
    pub report: &'a T,
}

/// Raw bytes of an input file together with its provenance.
pub struct Input {
    /// File contents.
    pub bytes: Vec<u8>,
    /// Provenance for certificates derived from the file.
    pub provenance: CertProvenance,
}

impl Input {
    /// Reads `path` and hashes its contents.
    pub fn read(path: &Path) -> Result<Self, Box<dyn Error>> {
        let bytes = fs::read(path)?;
        let provenance = CertProvenance::new(hash_bytes(&bytes))
            .with_label(path.display().to_string())
            .with_tool("gate-cli", env!("CARGO_PKG_VERSION"));
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read input");
        Ok(Self { bytes, provenance })
    }

    /// Parses the contents as YAML, which also accepts JSON.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, GateError> {
        serde_yaml::from_slice(&self.bytes).map_err(|err| serde_error("yaml-read", err))
    }
}

/// Writes a certificate to `io.out` (or stdout) as canonical JSON.
pub fn emit<T: Serialize>(
    io: &IoArgs,
    input: &Input,
    gate: &str,
    report: &T,
) -> Result<(), Box<dyn Error>> {
    let certificate = Certificate {
        provenance: input.provenance.clone(),
        gate,
        report,
    };
    let text = if io.pretty {
        to_canonical_json_pretty(&certificate)?
    } else {
        String::from_utf8(to_canonical_json_bytes(&certificate)?)?
    };
    match &io.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)?;
            tracing::info!(path = %path.display(), gate, "certificate written");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::NormalForm(args) => normal_form::run(&args),
        Command::Kernel(args) => kernel::run(&args),
        Command::Charges(args) => charges::run(&args),
        Command::Synth(args) => synth::run(&args),
        Command::Mus(args) => mus::run(&args),
    }
}

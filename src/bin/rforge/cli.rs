use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser)]
#[command(
    name = "rforge",
    about = "Heavy-atom RMSD of chemically identical structures",
    long_about = "Computes the heavy-atom RMSD between reference and test structures, \
                  minimizing over every symmetry-equivalent atom correspondence.\n\n\
                  By default the i-th reference is compared with the i-th test structure.",
    version,
    author,
    before_help = crate::display::banner_for_help()
)]
pub struct Cli {
    /// Reference structure(s) file (.sdf, .mol, .mol2, optionally .gz; - for stdin)
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Test structure(s) file (.sdf, .mol, .mol2, optionally .gz; - for stdin)
    #[arg(value_name = "TEST")]
    pub test: PathBuf,

    /// Use only the first structure in the reference file
    #[arg(short, long = "first-only", visible_alias = "firstonly")]
    pub first_only: bool,

    /// Superpose each correspondence before measuring (minimum RMSD)
    #[arg(short, long)]
    pub minimize: bool,

    #[command(flatten)]
    pub io: IoOptions,
}

#[derive(clap::Args)]
#[command(next_help_heading = "Input / Output")]
pub struct IoOptions {
    /// Reference file format (inferred from extension if not specified)
    #[arg(long = "reffmt", value_name = "FORMAT")]
    pub reference_format: Option<InputFormat>,

    /// Test file format (inferred from extension if not specified)
    #[arg(long = "testfmt", value_name = "FORMAT")]
    pub test_format: Option<InputFormat>,

    /// Write RMSD lines to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress banner and progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// MDL SD file / molfile (V2000)
    #[value(aliases = ["mol", "sd"])]
    Sdf,
    /// Tripos MOL2
    Mol2,
}

impl From<InputFormat> for rms_forge::io::Format {
    fn from(value: InputFormat) -> Self {
        match value {
            InputFormat::Sdf => Self::Sdf,
            InputFormat::Mol2 => Self::Mol2,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

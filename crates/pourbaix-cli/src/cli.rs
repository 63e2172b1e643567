use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Michael Ashton, Kiran Mathew",
    version,
    about = "pourbaix2d - Electrochemical stability (Pourbaix) analysis of two-dimensional material candidates.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log more on the terminal (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors on the terminal
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write a DEBUG-level log of every run to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Worker threads for `screen`; defaults to one per logical core.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the Pourbaix diagram of one compound and report its energy above hull.
    Analyze(AnalyzeArgs),
    /// Screen a CSV list of candidates and write their instabilities to CSV.
    Screen(ScreenArgs),
    /// Manage the local reference data tables (ion energies, corrections, end members, colors).
    Data(DataArgs),
}

/// Options shared by every command that builds diagrams.
#[derive(Args, Debug, Clone, Default)]
pub struct DiagramArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Metastability tolerance in meV/atom credited to the compound.
    #[arg(short, long, value_name = "FLOAT")]
    pub metastability: Option<f64>,

    /// Concentration (mol/kg) of every dissolved ion.
    #[arg(long, value_name = "FLOAT")]
    pub ion_concentration: Option<f64>,

    /// Directory holding the reference tables, overriding the config file and the data directory.
    #[arg(long, value_name = "PATH")]
    pub reference_dir: Option<PathBuf>,

    /// Override one configuration key, e.g. `-S diagram.ph-range=2:12`. Repeatable.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Chemical formula of the compound (e.g., MoS2).
    #[arg(value_name = "COMPOSITION")]
    pub composition: String,

    /// Total energy of the compound in eV per formula unit as written.
    #[arg(value_name = "ENERGY", allow_hyphen_values = true)]
    pub energy: f64,

    #[command(flatten)]
    pub diagram: DiagramArgs,

    /// Directory for the written artifacts.
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Also write a TOML summary of the diagram.
    #[arg(long)]
    pub summary: bool,

    /// Skip writing the PDF plot.
    #[arg(long)]
    pub no_plot: bool,
}

/// Arguments for the `screen` subcommand.
#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// CSV file with a `composition,energy[,metastability]` header.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// CSV file to write the results to.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub diagram: DiagramArgs,

    /// Write a PDF plot for every candidate.
    #[arg(long)]
    pub plots: bool,

    /// Directory for the plots written with --plots.
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

/// Reference table management.
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Write the bundled reference tables into the data directory.
    Init {
        /// Overwrite tables that already exist.
        #[arg(long)]
        force: bool,
    },
    /// Print the directory the reference tables are read from.
    Path,
    /// Read and write reference tables in a different directory.
    SetPath {
        /// Directory that will hold the reference tables.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Forget the custom directory and use the platform default again.
    ResetPath,
}

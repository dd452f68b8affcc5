use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Packs river-discharge priors and overwrites them in the SoS.
#[derive(Parser)]
#[command(
    name = "sos-priors",
    version,
    about = "Pack priors into exchange files and merge them into the SoS"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Pack a priors JSON document into a NetCDF exchange file.
    Pack(PackArgs),
    /// Overwrite SoS priors from an exchange file and verify the writes.
    Merge(MergeArgs),
}

/// Arguments for the `pack` subcommand.
#[derive(clap::Args)]
pub struct PackArgs {
    /// Path to the priors JSON document.
    #[arg(short, long)]
    pub priors: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "sos-priors.toml")]
    pub config: PathBuf,

    /// Override `[pack].author`.
    #[arg(long)]
    pub author: Option<String>,

    /// Override `[pack].contact`.
    #[arg(long)]
    pub contact: Option<String>,

    /// Override `[pack].sos_file`, the SoS file name the priors target.
    #[arg(long)]
    pub sos_file: Option<String>,

    /// Override `[pack].output_dir`.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the `merge` subcommand.
#[derive(clap::Args)]
pub struct MergeArgs {
    /// Path to the exchange file produced by `pack`.
    #[arg(short, long)]
    pub priors: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "sos-priors.toml")]
    pub config: PathBuf,

    /// Override `[merge].sos_dir`, the directory holding one folder per run type.
    #[arg(long)]
    pub sos_dir: Option<PathBuf>,

    /// Override `[merge].rtol` for read-back verification.
    #[arg(long)]
    pub rtol: Option<f64>,

    /// Override `[merge].atol` for read-back verification.
    #[arg(long)]
    pub atol: Option<f64>,
}

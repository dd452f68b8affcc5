//! Pack command: priors JSON -> NetCDF exchange file.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use sos_io::{load_priors, write_exchange};

use crate::cli::PackArgs;
use crate::config;
use crate::convert;

/// Run the packing pipeline.
pub fn run(args: PackArgs) -> Result<()> {
    let _cmd = info_span!("pack").entered();
    // 1. Load config, CLI overrides [pack]
    let mut pack_toml = config::load(&args.config)?.pack;
    if let Some(author) = args.author {
        pack_toml.author = Some(author);
    }
    if let Some(contact) = args.contact {
        pack_toml.contact = Some(contact);
    }
    if let Some(sos_file) = args.sos_file {
        pack_toml.sos_file = Some(sos_file);
    }
    if let Some(dir) = args.output_dir {
        pack_toml.output_dir = dir;
    }
    let pack_cfg = convert::build_pack_config(&pack_toml)?;

    // 2. Read priors
    info!(path = %args.priors.display(), "reading priors");
    let priors = load_priors(&args.priors)
        .with_context(|| format!("failed to read priors: {}", args.priors.display()))?;
    let n_groups: usize = priors.values().map(|p| p.len()).sum();
    info!(n_sources = priors.len(), n_groups, "priors loaded");

    // 3. Write exchange file
    let path = write_exchange(&priors, &pack_cfg).context("failed to write exchange file")?;
    info!(path = %path.display(), "exchange file written");
    println!("{}", path.display());

    Ok(())
}

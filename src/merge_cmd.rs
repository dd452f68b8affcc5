//! Merge command: overwrite SoS priors from an exchange file.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use sos_io::read_exchange;
use sos_merge::merge_exchange;

use crate::cli::MergeArgs;
use crate::config;
use crate::convert;

/// Run the merge pipeline.
pub fn run(args: MergeArgs) -> Result<()> {
    let _cmd = info_span!("merge").entered();
    // 1. Load config, CLI overrides [merge]
    let mut merge_toml = config::load(&args.config)?.merge;
    if let Some(dir) = args.sos_dir {
        merge_toml.sos_dir = Some(dir);
    }
    if let Some(rtol) = args.rtol {
        merge_toml.rtol = rtol;
    }
    if let Some(atol) = args.atol {
        merge_toml.atol = atol;
    }
    let merge_cfg = convert::build_merge_config(&merge_toml)?;

    // 2. Read exchange file
    info!(path = %args.priors.display(), "reading exchange file");
    let exchange = read_exchange(&args.priors)
        .with_context(|| format!("failed to read exchange file: {}", args.priors.display()))?;
    info!(
        sos_file = %exchange.metadata().sos_file,
        n_records = exchange.records().len(),
        "exchange file loaded"
    );

    // 3. Merge, one status line per group
    let report = merge_exchange(&exchange, &merge_cfg, |status| println!("{status}"))
        .context("merge aborted")?;

    if !report.is_success() {
        bail!(
            "{} of {} priors failed verification",
            report.n_failed(),
            report.statuses().len()
        );
    }
    info!(n_overwritten = report.n_overwritten(), "all priors verified");
    Ok(())
}

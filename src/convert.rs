//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use sos_io::PackConfig;
use sos_merge::{MergeConfig, Tolerance};

use crate::config::{MergeToml, PackToml};

/// Builds a [`PackConfig`] from the TOML pack configuration.
///
/// `author`, `contact` and `sos_file` have no defaults and must be set either
/// in `[pack]` or on the command line.
pub fn build_pack_config(pack: &PackToml) -> Result<PackConfig> {
    let (Some(author), Some(contact), Some(sos_file)) =
        (&pack.author, &pack.contact, &pack.sos_file)
    else {
        let missing: Vec<&str> = [
            ("author", pack.author.is_none()),
            ("contact", pack.contact.is_none()),
            ("sos_file", pack.sos_file.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        bail!(
            "missing pack settings: {}; set them in [pack] or pass them as flags",
            missing.join(", ")
        );
    };
    Ok(PackConfig::new(author, contact, sos_file, &pack.output_dir))
}

/// Builds a [`MergeConfig`] from the TOML merge configuration.
pub fn build_merge_config(merge: &MergeToml) -> Result<MergeConfig> {
    let Some(sos_dir) = &merge.sos_dir else {
        bail!("no SoS directory: set [merge].sos_dir in config or use --sos-dir");
    };
    Ok(MergeConfig::new(sos_dir).with_tolerance(Tolerance::new(merge.rtol, merge.atol)))
}

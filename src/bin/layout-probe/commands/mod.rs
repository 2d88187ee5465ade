//! Command implementations

pub mod generate;
pub mod list;
pub mod toolchain;

use anyhow::Result;

use layout_probe::util::config::{load_default_config, ProbeConfig};

use crate::cli::ProbeArgs;

/// Merge global config, project config, `--config` and command-line flags.
pub fn load_config(args: &ProbeArgs) -> Result<ProbeConfig> {
    let cwd = std::env::current_dir()?;
    let mut config = load_default_config(&cwd)?;

    if let Some(ref path) = args.config {
        config.merge(ProbeConfig::load(path)?);
    }

    config.merge(args.to_config());
    tracing::debug!("effective config: {:?}", config);

    Ok(config)
}

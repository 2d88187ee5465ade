//! The generator: measure every probed type and write the constants.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::probe::{measure, ProbeOptions};
use crate::builder::toolchain::{detect_toolchain, Toolchain};
use crate::core::{ProbeSet, SizeConstant};
use crate::ops::emit::OutputFormat;
use crate::util::config::ProbeConfig;
use crate::util::fs::write_atomic;

/// Options for a generator run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Merged configuration
    pub config: ProbeConfig,
    /// Output format
    pub format: OutputFormat,
    /// Destination file; stdout when unset
    pub output: Option<PathBuf>,
}

/// The fixed probe list followed by any configured extra types.
pub fn probe_set(config: &ProbeConfig) -> Result<ProbeSet> {
    let set = ProbeSet::chemfiles()
        .with_extra(config.extra_probes())
        .context("invalid probe list")?;
    Ok(set)
}

/// Detect the toolchain described by `config`.
pub fn toolchain(config: &ProbeConfig) -> Result<Box<dyn Toolchain>> {
    detect_toolchain(&config.toolchain, config.language())
}

/// Measure every probed type.
pub fn measure_sizes(config: &ProbeConfig) -> Result<Vec<SizeConstant>> {
    let set = probe_set(config)?;
    let toolchain = toolchain(config)?;
    let opts = ProbeOptions::from_config(config);

    let constants = measure(&set, toolchain.as_ref(), &opts)?;
    Ok(constants)
}

/// Measure and render; the returned document is complete or not produced at all.
pub fn generate(opts: &GenerateOptions) -> Result<String> {
    let constants = measure_sizes(&opts.config)?;
    let text = opts.format.render(&constants)?;

    tracing::info!(
        "Measured {} types ({} format)",
        constants.len(),
        opts.format
    );

    Ok(text)
}

/// Write the generated document to `output`, or to stdout in a single write.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_atomic(path, text)?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(text.as_bytes())
                .context("failed to write to stdout")?;
            lock.flush().context("failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Run the generator end to end.
pub fn run(opts: &GenerateOptions) -> Result<()> {
    let text = generate(opts)?;
    write_output(&text, opts.output.as_deref())
}

//! Default command: measure and emit the size constants.

use anyhow::Result;

use layout_probe::ops::{self, GenerateOptions};
use layout_probe::util::config::ProbeConfig;

use crate::cli::GenerateArgs;

pub fn execute(config: ProbeConfig, args: GenerateArgs) -> Result<()> {
    let opts = GenerateOptions {
        config,
        format: args.format,
        output: args.output,
    };

    ops::run(&opts)
}

//! `layout-probe list` command

use anyhow::{Context, Result};

use layout_probe::ops;
use layout_probe::util::config::ProbeConfig;

use crate::cli::ListArgs;

pub fn execute(config: ProbeConfig, args: ListArgs) -> Result<()> {
    let entries = ops::list(&config)?;

    let text = if args.json {
        let mut json =
            serde_json::to_string_pretty(&entries).context("failed to serialize probe list")?;
        json.push('\n');
        json
    } else {
        ops::format_table(&entries)
    };

    ops::write_output(&text, None)
}

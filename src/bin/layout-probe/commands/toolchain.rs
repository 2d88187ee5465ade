//! `layout-probe toolchain` command

use anyhow::Result;

use layout_probe::ops::generate::toolchain;
use layout_probe::util::config::ProbeConfig;

pub fn execute(config: ProbeConfig) -> Result<()> {
    let language = config.language();
    let detected = toolchain(&config)?;

    println!("platform: {}", detected.platform());
    println!("compiler: {}", detected.compiler_path(language).display());
    println!("language: {}", language);

    let runner = if config.toolchain.runner.is_empty() {
        detected.platform().default_runner().map(str::to_string)
    } else {
        Some(config.toolchain.runner.join(" "))
    };
    if let Some(runner) = runner {
        println!("runner:   {}", runner);
    }

    Ok(())
}

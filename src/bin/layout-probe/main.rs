//! layout-probe CLI - emits native type sizes for a binding

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use layout_probe::util::diagnostic;
use layout_probe::ProbeError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    // Set up logging; stdout is reserved for the generated constants
    let filter = if cli.verbose {
        EnvFilter::new("layout_probe=debug")
    } else if cli.quiet {
        EnvFilter::new("layout_probe=error")
    } else {
        EnvFilter::new("layout_probe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = commands::load_config(&cli.probe)?;

    match cli.command {
        None => commands::generate::execute(config, cli.generate),
        Some(Commands::List(args)) => commands::list::execute(config, args),
        Some(Commands::Toolchain) => commands::toolchain::execute(config),
    }
}

fn report(err: &anyhow::Error, color: bool) {
    let Some(probe_err) = err.downcast_ref::<ProbeError>() else {
        eprintln!("error: {:#}", err);
        return;
    };

    match probe_err.to_source_diagnostic() {
        Some(source) => {
            eprintln!("{:?}", miette::Report::new(source));
            if let ProbeError::Unresolved { stderr, .. } = probe_err {
                eprint!("{}", stderr);
            }
        }
        None => diagnostic::emit(&probe_err.to_diagnostic(), color),
    }
}

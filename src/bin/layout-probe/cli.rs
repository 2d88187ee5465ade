//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use layout_probe::core::Language;
use layout_probe::util::config::{ExtraType, ProbeConfig};
use layout_probe::OutputFormat;

/// Measure native type sizes and emit them as binding constants.
///
/// With no arguments, compiles the layout probe against `chemfiles.h` and
/// prints one `export const SIZEOF_<TYPE> = <bytes>;` line per probed type.
#[derive(Parser)]
#[command(name = "layout-probe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub probe: ProbeArgs,

    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the probe table without compiling
    List(ListArgs),

    /// Show the compiler that would measure the sizes
    Toolchain,
}

/// Settings shared by every command; they override config files.
#[derive(Args, Debug, Default)]
pub struct ProbeArgs {
    /// Configuration file merged over the global and project config
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include directory for the library headers (repeatable)
    #[arg(short = 'I', long = "include-dir", global = true, value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Header to include instead of chemfiles.h (repeatable)
    #[arg(long = "header", global = true, value_name = "HEADER")]
    pub headers: Vec<String>,

    /// C compiler to measure with
    #[arg(long, global = true, value_name = "PATH")]
    pub cc: Option<PathBuf>,

    /// Extra compiler flag (repeatable)
    #[arg(long = "cflag", global = true, value_name = "FLAG", allow_hyphen_values = true)]
    pub cflags: Vec<String>,

    /// Command that runs the probe, e.g. "node" for emscripten
    #[arg(long, global = true, value_name = "CMD")]
    pub runner: Option<String>,

    /// Language of the probe unit (c or c++)
    #[arg(long, global = true)]
    pub language: Option<Language>,

    /// Type to probe after the fixed list (repeatable)
    #[arg(long = "type", global = true, value_name = "TYPE")]
    pub extra_types: Vec<String>,
}

impl ProbeArgs {
    /// The command-line settings as a config layer.
    pub fn to_config(&self) -> ProbeConfig {
        let mut config = ProbeConfig::default();
        config.toolchain.cc = self.cc.clone();
        config.toolchain.cflags = self.cflags.clone();
        config.toolchain.runner = self
            .runner
            .as_deref()
            .map(|r| r.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        config.toolchain.language = self.language;
        config.probe.headers = self.headers.clone();
        config.probe.include_dirs = self.include_dirs.clone();
        config.probe.extra_types = self
            .extra_types
            .iter()
            .map(|t| ExtraType::Spelling(t.clone()))
            .collect();
        config
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (ts, json, rust)
    #[arg(long, default_value = "ts")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_generates_typescript() {
        let cli = Cli::try_parse_from(["layout-probe"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.generate.output.is_none());
        assert_eq!(cli.generate.format, OutputFormat::TypeScript);
        assert_eq!(cli.probe.to_config(), ProbeConfig::default());
    }

    #[test]
    fn test_probe_args_to_config() {
        let cli = Cli::try_parse_from([
            "layout-probe",
            "-I",
            "/opt/chemfiles/include",
            "--cc",
            "emcc",
            "--cflag",
            "-O0",
            "--runner",
            "node --stack-size=4096",
            "--type",
            "chfl_status",
        ])
        .unwrap();

        let config = cli.probe.to_config();
        assert_eq!(config.probe.include_dirs, vec![PathBuf::from("/opt/chemfiles/include")]);
        assert_eq!(config.toolchain.cc, Some(PathBuf::from("emcc")));
        assert_eq!(config.toolchain.cflags, vec!["-O0"]);
        assert_eq!(config.toolchain.runner, vec!["node", "--stack-size=4096"]);
        assert_eq!(config.extra_probes()[0].spelling(), "chfl_status");
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::try_parse_from(["layout-probe", "list", "--type", "chfl_status", "--json"])
            .unwrap();
        assert!(matches!(cli.command, Some(Commands::List(ListArgs { json: true }))));
        assert_eq!(cli.probe.extra_types, vec!["chfl_status"]);
    }
}

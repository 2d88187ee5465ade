//! Building and running the layout probe.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::ProbeError;
use super::probe_source::ProbeSource;
use super::toolchain::{ProbeInput, Toolchain};
use crate::core::{Language, ProbeSet, SizeConstant};
use crate::util::config::ProbeConfig;
use crate::util::process::ProcessBuilder;

/// How the probe unit is compiled and run.
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    /// Headers included after the standard prelude
    pub headers: Vec<String>,
    /// Include directories passed to the compiler
    pub include_dirs: Vec<PathBuf>,
    /// Additional compiler flags
    pub cflags: Vec<String>,
    /// Dialect of the probe unit
    pub language: Language,
    /// Command prefix used to run the probe executable
    pub runner: Vec<String>,
    /// Executable suffix overriding the toolchain default
    pub exe_suffix: Option<String>,
}

impl ProbeOptions {
    pub fn from_config(config: &ProbeConfig) -> Self {
        ProbeOptions {
            headers: config.headers(),
            include_dirs: config.probe.include_dirs.clone(),
            cflags: config.toolchain.cflags.clone(),
            language: config.language(),
            runner: config.toolchain.runner.clone(),
            exe_suffix: config.toolchain.exe_suffix.clone(),
        }
    }
}

/// Measure the size of every type in `set` with the native compiler.
///
/// Returns one constant per probe, in probe order. Nothing is returned
/// unless every probe was measured.
pub fn measure(
    set: &ProbeSet,
    toolchain: &dyn Toolchain,
    opts: &ProbeOptions,
) -> Result<Vec<SizeConstant>, ProbeError> {
    let unit = ProbeSource::render(set, opts.language, &opts.headers);

    let dir = tempfile::Builder::new().prefix("layout-probe").tempdir()?;
    let source_path = dir.path().join(unit.file_name());
    std::fs::write(&source_path, unit.text())?;

    let suffix = opts
        .exe_suffix
        .clone()
        .unwrap_or_else(|| toolchain.exe_extension().to_string());
    let exe_path = dir.path().join(format!("layout_probe{}", suffix));

    let input = ProbeInput {
        source: source_path,
        output: exe_path.clone(),
        include_dirs: opts.include_dirs.clone(),
        cflags: opts.cflags.clone(),
        language: opts.language,
    };

    tracing::info!(
        "Compiling layout probe for {} types with {} ({})",
        set.len(),
        toolchain.compiler_path(opts.language).display(),
        toolchain.platform()
    );
    compile(toolchain, &input, &unit, set)?;

    let process = runner_command(toolchain, opts, &exe_path).cwd(dir.path());
    let stdout = run(&process)?;

    let sizes = parse_sizes(&stdout, set.len())?;
    let constants: Vec<SizeConstant> = set
        .iter()
        .zip(sizes)
        .map(|(probe, size)| {
            tracing::debug!("sizeof({}) = {}", probe.spelling(), size);
            SizeConstant::measured(probe, size)
        })
        .collect();

    Ok(constants)
}

fn compile(
    toolchain: &dyn Toolchain,
    input: &ProbeInput,
    unit: &ProbeSource,
    set: &ProbeSet,
) -> Result<(), ProbeError> {
    let process = toolchain.probe_command(input).to_process();
    let command = process.display_command();

    let output = process.exec().map_err(|e| ProbeError::Spawn {
        command: command.clone(),
        message: format!("{:#}", e),
    })?;

    if output.status.success() {
        return Ok(());
    }

    // Compiler diagnostics may arrive on either stream (cl.exe uses stdout)
    let mut stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    stderr.push_str(&String::from_utf8_lossy(&output.stdout));

    let failing = unresolved_probes(&stderr, unit);
    if failing.is_empty() {
        return Err(ProbeError::Compile { command, stderr });
    }

    let types = failing
        .iter()
        .filter_map(|&i| set.get(i))
        .map(|p| p.spelling().to_string())
        .collect();
    let lines = failing
        .iter()
        .filter_map(|&i| unit.line_of_probe(i))
        .collect();

    Err(ProbeError::Unresolved {
        types,
        lines,
        unit: unit.clone(),
        stderr,
    })
}

/// The command that runs the probe executable.
fn runner_command(
    toolchain: &dyn Toolchain,
    opts: &ProbeOptions,
    exe: &std::path::Path,
) -> ProcessBuilder {
    let runner: Vec<String> = if !opts.runner.is_empty() {
        opts.runner.clone()
    } else {
        toolchain
            .platform()
            .default_runner()
            .map(|r| vec![r.to_string()])
            .unwrap_or_default()
    };

    match runner.split_first() {
        Some((program, args)) => ProcessBuilder::new(program).args(args).arg(exe),
        None => ProcessBuilder::new(exe),
    }
}

fn run(process: &ProcessBuilder) -> Result<String, ProbeError> {
    let output = process.exec().map_err(|e| ProbeError::Spawn {
        command: process.display_command(),
        message: format!("{:#}", e),
    })?;

    if !output.status.success() {
        return Err(ProbeError::Run {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse the probe's output: one decimal size per line.
pub fn parse_sizes(stdout: &str, expected: usize) -> Result<Vec<u64>, ProbeError> {
    let lines: Vec<&str> = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() != expected {
        return Err(ProbeError::MalformedOutput {
            expected,
            found: lines.len(),
        });
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            text.parse::<u64>().map_err(|_| ProbeError::InvalidSize {
                line: i + 1,
                text: text.to_string(),
            })
        })
        .collect()
}

fn error_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // gcc/clang: `layout_probe.c:12:5: error: ...`
        // msvc:      `layout_probe.c(12): error C2065: ...`
        Regex::new(
            r"layout_probe\.(?:c|cpp)(?::(\d+)(?::\d+)?:|\((\d+)(?:,\d+)?\)\s*:)\s*(?:fatal\s+)?error",
        )
        .expect("error line pattern is valid")
    })
}

/// Indices of the probes the compiler reported errors on, in probe order.
pub fn unresolved_probes(compiler_output: &str, unit: &ProbeSource) -> Vec<usize> {
    let mut failing: Vec<usize> = error_line_regex()
        .captures_iter(compiler_output)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .filter_map(|line| unit.probe_at_line(line))
        .collect();

    failing.sort_unstable();
    failing.dedup();
    failing
}

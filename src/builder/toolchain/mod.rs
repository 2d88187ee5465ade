//! Toolchain abstraction for the native compiler that measures sizes.
//!
//! The probe is a single translation unit compiled and linked in one step,
//! so a toolchain only needs to know how to turn one source file into an
//! executable.
//!
//! Toolchain detection priority:
//! 1. Configured compiler (`--cc` or `[toolchain] cc`)
//! 2. Environment variables (CC, CXX)
//! 3. MSVC from a developer prompt (Windows)
//! 4. Auto-detection (searching PATH for common compilers)

use std::path::{Path, PathBuf};

use crate::core::Language;
use crate::util::process::ProcessBuilder;

mod detect;
mod gcc;
mod msvc;

pub use detect::detect_toolchain;
pub use gcc::GccToolchain;
pub use msvc::MsvcToolchain;

/// A command to execute, with program and arguments.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc", "cl.exe")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Turn the spec into a process ready to execute.
    pub fn to_process(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.program).args(&self.args)
    }
}

/// Input for building the probe executable.
#[derive(Debug, Clone)]
pub struct ProbeInput {
    /// Generated probe source
    pub source: PathBuf,
    /// Executable to produce
    pub output: PathBuf,
    /// Include directories
    pub include_dirs: Vec<PathBuf>,
    /// Additional compiler flags
    pub cflags: Vec<String>,
    /// Dialect of the source
    pub language: Language,
}

/// The platform/family of a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainPlatform {
    /// GCC (GNU Compiler Collection)
    Gcc,
    /// Clang/LLVM
    Clang,
    /// Apple Clang (macOS)
    AppleClang,
    /// Emscripten (emcc), producing JavaScript run under node
    Emscripten,
    /// Microsoft Visual C++
    Msvc,
}

impl ToolchainPlatform {
    /// Get the platform name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainPlatform::Gcc => "gcc",
            ToolchainPlatform::Clang => "clang",
            ToolchainPlatform::AppleClang => "apple-clang",
            ToolchainPlatform::Emscripten => "emscripten",
            ToolchainPlatform::Msvc => "msvc",
        }
    }

    /// Runner needed to execute a probe built by this toolchain, if any.
    pub fn default_runner(&self) -> Option<&'static str> {
        match self {
            ToolchainPlatform::Emscripten => Some("node"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ToolchainPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for toolchain implementations.
///
/// Each toolchain knows how to generate commands for its specific compiler.
pub trait Toolchain: Send + Sync {
    /// Get the toolchain platform.
    fn platform(&self) -> ToolchainPlatform;

    /// Get the compiler path used for the given language.
    fn compiler_path(&self, lang: Language) -> &Path;

    /// Generate a command that compiles and links the probe in one step.
    fn probe_command(&self, input: &ProbeInput) -> CommandSpec;

    /// Get the executable extension.
    fn exe_extension(&self) -> &str;
}

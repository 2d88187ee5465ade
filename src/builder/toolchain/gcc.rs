//! GCC/Clang toolchain implementation (also used for emcc).

use std::path::{Path, PathBuf};

use crate::core::Language;

use super::{CommandSpec, ProbeInput, Toolchain, ToolchainPlatform};

/// GCC-style toolchain (Unix-like systems and emscripten).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Path to the C compiler
    pub cc: PathBuf,
    /// Path to the C++ compiler
    pub cxx: PathBuf,
    /// Compiler family (gcc, clang, apple-clang, emscripten)
    pub family: ToolchainPlatform,
}

impl GccToolchain {
    /// Create a new GCC-style toolchain.
    pub fn new(cc: PathBuf, cxx: PathBuf, family: ToolchainPlatform) -> Self {
        GccToolchain { cc, cxx, family }
    }

    /// Infer C++ compiler path from C compiler path.
    ///
    /// Handles common patterns:
    /// - gcc, x86_64-linux-gnu-gcc -> g++, x86_64-linux-gnu-g++
    /// - clang -> clang++
    /// - emcc -> em++
    /// - cc, /usr/bin/cc -> c++, /usr/bin/c++
    pub fn infer_cxx(cc: &Path) -> PathBuf {
        let cc_str = cc.to_string_lossy();

        if cc_str.ends_with("gcc") {
            return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 2]));
        }

        if cc_str.ends_with("clang") {
            return PathBuf::from(format!("{}++", cc_str));
        }

        if cc_str.ends_with("emcc") {
            return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 2]));
        }

        // Only match "cc" when it's a complete basename (not "mycc")
        let is_standalone_cc = cc_str == "cc"
            || cc_str.ends_with("/cc")
            || cc_str.ends_with("\\cc")
            || cc_str.ends_with("-cc");

        if is_standalone_cc {
            return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 1]));
        }

        PathBuf::from(format!("{}++", cc_str))
    }
}

impl Toolchain for GccToolchain {
    fn platform(&self) -> ToolchainPlatform {
        self.family
    }

    fn compiler_path(&self, lang: Language) -> &Path {
        match lang {
            Language::C => &self.cc,
            Language::Cxx => &self.cxx,
        }
    }

    fn probe_command(&self, input: &ProbeInput) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.compiler_path(input.language));

        for dir in &input.include_dirs {
            cmd = cmd.arg(format!("-I{}", dir.display()));
        }

        cmd = cmd.args(input.cflags.iter().cloned());

        cmd = cmd.arg(input.source.display().to_string());
        cmd = cmd.arg("-o");
        cmd = cmd.arg(input.output.display().to_string());

        cmd
    }

    fn exe_extension(&self) -> &str {
        if self.family == ToolchainPlatform::Emscripten {
            ".js"
        } else if cfg!(windows) {
            ".exe"
        } else {
            ""
        }
    }
}

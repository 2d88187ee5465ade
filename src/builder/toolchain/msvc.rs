//! MSVC toolchain implementation.

use std::path::{Path, PathBuf};

use crate::core::Language;

use super::{CommandSpec, ProbeInput, Toolchain, ToolchainPlatform};

/// MSVC toolchain (Windows).
#[derive(Debug, Clone)]
pub struct MsvcToolchain {
    /// Path to cl.exe (compiler and link driver)
    pub cl: PathBuf,
}

impl MsvcToolchain {
    /// Create a new MSVC toolchain.
    pub fn new(cl: PathBuf) -> Self {
        MsvcToolchain { cl }
    }
}

impl Toolchain for MsvcToolchain {
    fn platform(&self) -> ToolchainPlatform {
        ToolchainPlatform::Msvc
    }

    fn compiler_path(&self, _lang: Language) -> &Path {
        // MSVC uses the same cl.exe for both C and C++
        &self.cl
    }

    fn probe_command(&self, input: &ProbeInput) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cl);

        cmd = cmd.arg("/nologo");

        // Force the language regardless of the file extension
        cmd = cmd.arg(match input.language {
            Language::C => "/TC",
            Language::Cxx => "/TP",
        });

        for dir in &input.include_dirs {
            cmd = cmd.arg(format!("/I{}", dir.display()));
        }

        cmd = cmd.args(input.cflags.iter().cloned());

        // Keep the intermediate object next to the executable
        let object = input.output.with_extension("obj");
        cmd = cmd.arg(format!("/Fo{}", object.display()));
        cmd = cmd.arg(format!("/Fe{}", input.output.display()));

        cmd = cmd.arg(input.source.display().to_string());

        cmd
    }

    fn exe_extension(&self) -> &str {
        ".exe"
    }
}

//! Toolchain detection functions.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::Language;
use crate::util::config::ToolchainSettings;

use super::{GccToolchain, Toolchain, ToolchainPlatform};

/// Detect the compiler used to build the probe.
///
/// Tries to find a compiler with the following priority:
/// 1. The configured compiler (`--cc` or `[toolchain] cc`)
/// 2. Environment variables (CC for C, CXX for C++)
/// 3. On Windows with MSVC: cl.exe from a developer command prompt
/// 4. On Unix-like systems: cc/gcc/clang (c++/g++/clang++ for C++)
pub fn detect_toolchain(
    settings: &ToolchainSettings,
    lang: Language,
) -> Result<Box<dyn Toolchain>> {
    if let Some(ref cc) = settings.cc {
        return from_configured(cc, lang);
    }

    if let Some(toolchain) = try_detect_from_env(lang)? {
        return Ok(toolchain);
    }

    if let Some(toolchain) = try_detect_msvc()? {
        return Ok(toolchain);
    }

    if let Some(toolchain) = try_detect_gcc(lang)? {
        return Ok(toolchain);
    }

    bail!(
        "no C compiler found\n\
         \n\
         The layout probe is measured by the native compiler (gcc, clang, emcc, or cl).\n\
         Set the CC environment variable, pass `--cc <path>`, or install a compiler."
    )
}

/// Resolve a compiler given by name or path.
fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.exists() {
        return Some(program.to_path_buf());
    }
    which::which(program).ok()
}

/// Build a toolchain from an explicitly configured compiler.
fn from_configured(cc: &Path, lang: Language) -> Result<Box<dyn Toolchain>> {
    let Some(resolved) = resolve_program(cc) else {
        bail!("configured compiler not found: {}", cc.display());
    };

    if is_msvc(&resolved) {
        tracing::info!("Using configured compiler: {}", resolved.display());
        return Ok(Box::new(super::MsvcToolchain::new(resolved)));
    }

    // The configured compiler is used as is for the probe's language
    let family = detect_compiler_family(&resolved)?;
    let (c, cxx) = match lang {
        Language::C => (resolved.clone(), GccToolchain::infer_cxx(&resolved)),
        Language::Cxx => (resolved.clone(), resolved.clone()),
    };

    tracing::info!(
        "Using configured compiler: {} ({})",
        resolved.display(),
        family
    );

    Ok(Box::new(GccToolchain::new(c, cxx, family)))
}

/// Try the CC / CXX environment variables.
fn try_detect_from_env(lang: Language) -> Result<Option<Box<dyn Toolchain>>> {
    let var = match lang {
        Language::C => "CC",
        Language::Cxx => "CXX",
    };

    let Ok(value) = std::env::var(var) else {
        return Ok(None);
    };
    if value.trim().is_empty() {
        return Ok(None);
    }

    tracing::debug!("{} is set to `{}`", var, value);

    match from_configured(Path::new(value.trim()), lang) {
        Ok(toolchain) => Ok(Some(toolchain)),
        Err(e) => {
            tracing::warn!("Ignoring {}: {:#}", var, e);
            Ok(None)
        }
    }
}

/// Try to detect MSVC toolchain.
#[cfg(target_os = "windows")]
fn try_detect_msvc() -> Result<Option<Box<dyn Toolchain>>> {
    use which::which;

    // Only usable from a Developer Command Prompt, where INCLUDE and LIB are set
    if let Ok(cl) = which("cl") {
        if std::env::var("INCLUDE").is_ok() && std::env::var("LIB").is_ok() {
            return Ok(Some(Box::new(super::MsvcToolchain::new(cl))));
        }
        tracing::debug!("cl.exe found but the MSVC environment is not configured");
    }

    Ok(None)
}

#[cfg(not(target_os = "windows"))]
fn try_detect_msvc() -> Result<Option<Box<dyn Toolchain>>> {
    Ok(None)
}

/// Try to detect GCC/Clang toolchain.
fn try_detect_gcc(lang: Language) -> Result<Option<Box<dyn Toolchain>>> {
    use which::which;

    let cc = which("cc").or_else(|_| which("gcc")).or_else(|_| which("clang"));

    let cxx = which("c++")
        .or_else(|_| which("g++"))
        .or_else(|_| which("clang++"));

    let (cc, cxx) = match (cc, cxx, lang) {
        (Ok(cc), Ok(cxx), _) => (cc, cxx),
        (Ok(cc), Err(_), Language::C) => {
            let cxx = GccToolchain::infer_cxx(&cc);
            (cc, cxx)
        }
        (_, Ok(cxx), Language::Cxx) => (cxx.clone(), cxx),
        _ => return Ok(None),
    };

    let family = detect_compiler_family(&cc)?;

    Ok(Some(Box::new(GccToolchain::new(cc, cxx, family))))
}

/// Whether a compiler path names MSVC's cl.exe.
fn is_msvc(cc: &Path) -> bool {
    cc.file_stem()
        .and_then(|n| n.to_str())
        .map(|n| n.eq_ignore_ascii_case("cl"))
        .unwrap_or(false)
}

/// Detect whether the compiler is GCC, Clang, Apple Clang, or emcc.
fn detect_compiler_family(cc: &Path) -> Result<ToolchainPlatform> {
    let name = cc
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    if let Some(family) = family_from_name(&name) {
        if family == ToolchainPlatform::Clang {
            return detect_clang_variant(cc);
        }
        return Ok(family);
    }

    // Try to detect from --version output
    let output = std::process::Command::new(cc).arg("--version").output();

    if let Ok(output) = output {
        let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
        if stdout.contains("emscripten") {
            return Ok(ToolchainPlatform::Emscripten);
        } else if stdout.contains("clang") {
            return detect_clang_variant(cc);
        } else if stdout.contains("gcc") {
            return Ok(ToolchainPlatform::Gcc);
        }
    }

    Ok(ToolchainPlatform::Gcc)
}

/// Classify a compiler by its file name alone.
fn family_from_name(name: &str) -> Option<ToolchainPlatform> {
    if name.starts_with("emcc") || name.starts_with("em++") {
        Some(ToolchainPlatform::Emscripten)
    } else if name.contains("clang") {
        Some(ToolchainPlatform::Clang)
    } else if name.contains("gcc") || name.contains("g++") {
        Some(ToolchainPlatform::Gcc)
    } else {
        None
    }
}

/// Detect if Clang is Apple Clang or regular Clang.
fn detect_clang_variant(cc: &Path) -> Result<ToolchainPlatform> {
    let output = std::process::Command::new(cc).arg("--version").output();

    if let Ok(output) = output {
        let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
        if stdout.contains("apple") {
            return Ok(ToolchainPlatform::AppleClang);
        }
    }

    Ok(ToolchainPlatform::Clang)
}

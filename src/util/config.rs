//! Configuration file support.
//!
//! Two configuration file locations are merged:
//! - Global: `~/.layout-probe/config.toml` - User-wide defaults
//! - Project: `.layout-probe/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. An explicit
//! `--config` file and command-line flags are merged on top by the caller.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::probe_set::CHEMFILES_HEADER;
use crate::core::{Language, ProbedType, TypeKind};

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".layout-probe";

/// Layout probe configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Compiler settings
    pub toolchain: ToolchainSettings,

    /// What to include and which types to add to the fixed list
    pub probe: ProbeSettings,
}

/// Compiler settings for building the probe.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Path to the C (or C++) compiler, e.g. /usr/bin/clang or emcc
    pub cc: Option<PathBuf>,

    /// Additional compiler flags
    pub cflags: Vec<String>,

    /// Command used to run the probe executable, e.g. ["node"] for emscripten
    pub runner: Vec<String>,

    /// Suffix of the probe executable, overriding the toolchain default (".js" for emcc)
    pub exe_suffix: Option<String>,

    /// Dialect of the probe unit
    pub language: Option<Language>,
}

/// Probe contents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Headers included by the probe, in order (defaults to `chemfiles.h`)
    pub headers: Vec<String>,

    /// Include directories passed to the compiler
    pub include_dirs: Vec<PathBuf>,

    /// Types appended after the fixed list
    pub extra_types: Vec<ExtraType>,
}

/// A user-declared type probed after the fixed list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExtraType {
    /// Just the spelling; treated as a library struct.
    Spelling(String),
    /// Spelling and kind.
    Detailed {
        #[serde(rename = "type")]
        spelling: String,
        #[serde(default = "default_extra_kind")]
        kind: TypeKind,
    },
}

fn default_extra_kind() -> TypeKind {
    TypeKind::LibraryStruct
}

impl ExtraType {
    pub fn to_probe(&self) -> ProbedType {
        match self {
            ExtraType::Spelling(spelling) => ProbedType::owned(spelling, default_extra_kind()),
            ExtraType::Detailed { spelling, kind } => ProbedType::owned(spelling, *kind),
        }
    }
}

impl ProbeConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration if the file exists.
    ///
    /// A missing file yields `None`; a file that exists but cannot be read or
    /// parsed is an error.
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Lists are replaced, not concatenated, except `extra_types`, which
    /// accumulate so a project can extend a global list.
    pub fn merge(&mut self, other: ProbeConfig) {
        if other.toolchain.cc.is_some() {
            self.toolchain.cc = other.toolchain.cc;
        }
        if !other.toolchain.cflags.is_empty() {
            self.toolchain.cflags = other.toolchain.cflags;
        }
        if !other.toolchain.runner.is_empty() {
            self.toolchain.runner = other.toolchain.runner;
        }
        if other.toolchain.exe_suffix.is_some() {
            self.toolchain.exe_suffix = other.toolchain.exe_suffix;
        }
        if other.toolchain.language.is_some() {
            self.toolchain.language = other.toolchain.language;
        }

        if !other.probe.headers.is_empty() {
            self.probe.headers = other.probe.headers;
        }
        if !other.probe.include_dirs.is_empty() {
            self.probe.include_dirs = other.probe.include_dirs;
        }
        for extra in other.probe.extra_types {
            let name = extra.to_probe().constant_name();
            let existing = self
                .probe
                .extra_types
                .iter()
                .position(|e| e.to_probe().constant_name() == name);
            match existing {
                // The later layer decides the spelling and kind
                Some(index) => self.probe.extra_types[index] = extra,
                None => self.probe.extra_types.push(extra),
            }
        }
    }

    /// Headers to include, falling back to the chemfiles header.
    pub fn headers(&self) -> Vec<String> {
        if self.probe.headers.is_empty() {
            vec![CHEMFILES_HEADER.to_string()]
        } else {
            self.probe.headers.clone()
        }
    }

    pub fn language(&self) -> Language {
        self.toolchain.language.unwrap_or_default()
    }

    pub fn extra_probes(&self) -> Vec<ProbedType> {
        self.probe.extra_types.iter().map(ExtraType::to_probe).collect()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.layout-probe/config.toml)
/// 2. Global config (~/.layout-probe/config.toml)
/// 3. Defaults
///
/// Missing files are skipped. A file that exists but does not parse fails
/// the whole load.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<ProbeConfig> {
    let mut config = ProbeConfig::default();

    if let Some(global) = global_path {
        if let Some(layer) = ProbeConfig::load_if_exists(global)? {
            config.merge(layer);
        }
    }

    // Running from the home directory makes both layers the same file
    if global_path.is_some_and(|global| same_file(global, project_path)) {
        tracing::debug!("project config is the global config, loading it once");
        return Ok(config);
    }

    if let Some(layer) = ProbeConfig::load_if_exists(project_path)? {
        config.merge(layer);
    }

    Ok(config)
}

/// Load the global and project configuration for `cwd`.
pub fn load_default_config(cwd: &Path) -> Result<ProbeConfig> {
    let global = global_config_path();
    load_config(global.as_deref(), &project_config_path(cwd))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Get the global config directory (~/.layout-probe).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the global config path (~/.layout-probe/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.layout-probe/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = ProbeConfig::default();
        assert!(config.toolchain.cc.is_none());
        assert!(config.toolchain.runner.is_empty());
        assert_eq!(config.headers(), vec!["chemfiles.h"]);
        assert_eq!(config.language(), Language::C);
        assert!(config.extra_probes().is_empty());
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[toolchain]
cc = "emcc"
cflags = ["-O0"]
runner = ["node"]
exe_suffix = ".js"
language = "c++"

[probe]
headers = ["chemfiles.h"]
include_dirs = ["/opt/chemfiles/include"]
extra_types = [
    "chfl_format_metadata",
    { type = "chfl_warning_callback", kind = "pointer" },
]
"#,
        )
        .unwrap();

        let config = ProbeConfig::load(&config_path).unwrap();
        assert_eq!(config.toolchain.cc, Some(PathBuf::from("emcc")));
        assert_eq!(config.toolchain.cflags, vec!["-O0"]);
        assert_eq!(config.toolchain.runner, vec!["node"]);
        assert_eq!(config.toolchain.exe_suffix.as_deref(), Some(".js"));
        assert_eq!(config.language(), Language::Cxx);
        assert_eq!(
            config.probe.include_dirs,
            vec![PathBuf::from("/opt/chemfiles/include")]
        );

        let extra = config.extra_probes();
        assert_eq!(extra.len(), 2);
        assert_eq!(extra[0].spelling(), "chfl_format_metadata");
        assert_eq!(extra[0].kind(), TypeKind::LibraryStruct);
        assert_eq!(extra[1].kind(), TypeKind::Pointer);
    }

    #[test]
    fn test_config_rejects_unknown_language() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[toolchain]\nlanguage = \"fortran\"\n").unwrap();

        assert!(ProbeConfig::load(&config_path).is_err());
        assert!(ProbeConfig::load_if_exists(&config_path).is_err());
    }

    #[test]
    fn test_load_if_exists_missing_file() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("config.toml");
        assert_eq!(ProbeConfig::load_if_exists(&missing).unwrap(), None);
    }

    #[test]
    fn test_config_merge() {
        let mut base = ProbeConfig::default();
        base.toolchain.cc = Some(PathBuf::from("/usr/bin/gcc"));
        base.toolchain.cflags = vec!["-Wall".to_string()];
        base.probe.extra_types = vec![ExtraType::Spelling("chfl_a".to_string())];

        let mut override_cfg = ProbeConfig::default();
        override_cfg.toolchain.cflags = vec!["-m32".to_string()];
        override_cfg.probe.extra_types = vec![
            ExtraType::Spelling("chfl_a".to_string()),
            ExtraType::Spelling("chfl_b".to_string()),
        ];

        base.merge(override_cfg);

        // cc should remain unchanged
        assert_eq!(base.toolchain.cc, Some(PathBuf::from("/usr/bin/gcc")));
        // cflags should be replaced (not merged)
        assert_eq!(base.toolchain.cflags, vec!["-m32"]);
        // extra types accumulate without duplicates
        let spellings: Vec<String> = base
            .extra_probes()
            .iter()
            .map(|p| p.spelling().to_string())
            .collect();
        assert_eq!(spellings, vec!["chfl_a", "chfl_b"]);
    }

    #[test]
    fn test_config_merge_same_type_from_two_layers() {
        let mut base = ProbeConfig::default();
        base.probe.extra_types = vec![ExtraType::Detailed {
            spelling: "chfl_status".to_string(),
            kind: TypeKind::LibraryEnum,
        }];

        let mut flags = ProbeConfig::default();
        flags.probe.extra_types = vec![ExtraType::Spelling(" chfl_status".to_string())];

        base.merge(flags);

        let extra = base.extra_probes();
        assert_eq!(extra.len(), 1);
        assert_eq!(extra[0].spelling(), "chfl_status");
        assert_eq!(extra[0].kind(), TypeKind::LibraryStruct);
        assert!(crate::core::ProbeSet::chemfiles().with_extra(extra).is_ok());
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[toolchain]
cc = "/usr/bin/gcc"
runner = ["qemu-aarch64"]
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[toolchain]
cc = "/usr/bin/clang"
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path).unwrap();

        assert_eq!(config.toolchain.cc, Some(PathBuf::from("/usr/bin/clang")));
        assert_eq!(config.toolchain.runner, vec!["qemu-aarch64"]);
    }

    #[test]
    fn test_load_config_fails_on_malformed_project_file() {
        let tmp = TempDir::new().unwrap();
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &project_path,
            r#"
[toolchain]
language = "c11"

[probe]
extra_types = ["chfl_status"]
"#,
        )
        .unwrap();

        let err = load_config(None, &project_path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));
    }

    #[test]
    fn test_load_config_skips_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(
            Some(&tmp.path().join("global.toml")),
            &tmp.path().join("project.toml"),
        )
        .unwrap();
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn test_load_config_same_file_loaded_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[probe]\nextra_types = [\"chfl_status\"]\n").unwrap();

        let config = load_config(Some(&path), &path).unwrap();
        assert_eq!(config.probe.extra_types.len(), 1);
        assert!(same_file(&path, &tmp.path().join(".").join("config.toml")));
    }

    #[test]
    fn test_project_config_path() {
        let path = project_config_path(Path::new("/work"));
        assert_eq!(path, PathBuf::from("/work/.layout-probe/config.toml"));
    }
}

//! Dialect of the generated probe unit.

use serde::{Deserialize, Serialize};

/// Source language used to compile the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C language (default)
    #[default]
    C,
    /// C++ language
    #[serde(alias = "cpp", alias = "cxx", alias = "c++")]
    Cxx,
}

impl Language {
    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }

    /// File extension of the generated probe source.
    pub fn source_extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "cpp",
        }
    }

    /// Standard headers every probe unit needs for the builtin types and `printf`.
    pub fn prelude_headers(&self) -> &'static [&'static str] {
        match self {
            Language::C => &["stdbool.h", "stdint.h", "stdio.h"],
            Language::Cxx => &["cstdint", "cstdio"],
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c" => Ok(Language::C),
            "c++" | "cpp" | "cxx" => Ok(Language::Cxx),
            _ => Err(format!("invalid language '{}'; expected 'c' or 'c++'", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

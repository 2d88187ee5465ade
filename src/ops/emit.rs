//! Formatting measured sizes for the consuming binding.
//!
//! Only this module knows what the binding's source language looks like.
//! Retargeting to another consumer means adding an [`OutputFormat`].

use std::fmt::Write;

use anyhow::{Context, Result};

use crate::core::SizeConstant;

/// Render one size constant as a TypeScript/JavaScript declaration.
///
/// The name is upper-cased as a whole; callers pass it already prefixed.
/// The returned line ends with a newline.
pub fn emit(name: &str, size: u64) -> String {
    format!("export const {} = {};\n", name.to_ascii_uppercase(), size)
}

/// Output format of the generated constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `export const SIZEOF_X = n;` lines (the binding's format)
    #[default]
    TypeScript,
    /// An ordered JSON array of `{ "name", "size" }` objects
    Json,
    /// `pub const SIZEOF_X: usize = n;` lines
    Rust,
}

impl OutputFormat {
    /// Render all constants, in order, as one document.
    pub fn render(&self, constants: &[SizeConstant]) -> Result<String> {
        match self {
            OutputFormat::TypeScript => Ok(constants
                .iter()
                .map(|c| emit(c.name(), c.size()))
                .collect()),
            OutputFormat::Json => {
                let mut text = serde_json::to_string_pretty(constants)
                    .context("failed to serialize size constants")?;
                text.push('\n');
                Ok(text)
            }
            OutputFormat::Rust => {
                let mut text = String::new();
                for c in constants {
                    // Writing to a String cannot fail
                    let _ = writeln!(
                        text,
                        "pub const {}: usize = {};",
                        c.name().to_ascii_uppercase(),
                        c.size()
                    );
                }
                Ok(text)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::TypeScript => "ts",
            OutputFormat::Json => "json",
            OutputFormat::Rust => "rust",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ts" | "typescript" | "js" | "javascript" => Ok(OutputFormat::TypeScript),
            "json" => Ok(OutputFormat::Json),
            "rust" | "rs" => Ok(OutputFormat::Rust),
            _ => Err(format!(
                "invalid format '{}'; expected 'ts', 'json', or 'rust'",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

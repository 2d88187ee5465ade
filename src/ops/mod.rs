//! High-level operations behind the CLI commands.

pub mod emit;
pub mod generate;
pub mod list;

pub use emit::{emit, OutputFormat};
pub use generate::{generate, measure_sizes, probe_set, run, write_output, GenerateOptions};
pub use list::{format_table, list, ProbeEntry};

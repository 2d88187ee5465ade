//! Listing the probe table without compiling anything.

use anyhow::Result;
use serde::Serialize;

use crate::core::TypeKind;
use crate::ops::generate::probe_set;
use crate::util::config::ProbeConfig;

/// One row of the probe table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeEntry {
    pub name: String,
    pub spelling: String,
    pub kind: TypeKind,
}

/// Every probe that a generator run with `config` would measure, in order.
pub fn list(config: &ProbeConfig) -> Result<Vec<ProbeEntry>> {
    let set = probe_set(config)?;
    Ok(set
        .iter()
        .map(|p| ProbeEntry {
            name: p.constant_name(),
            spelling: p.spelling().to_string(),
            kind: p.kind(),
        })
        .collect())
}

/// Render the table as aligned text columns.
pub fn format_table(entries: &[ProbeEntry]) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let kind_width = entries
        .iter()
        .map(|e| e.kind.as_str().len())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|e| {
            format!(
                "{:<width$}  {:<kind_width$}  {}\n",
                e.name,
                e.kind.as_str(),
                e.spelling,
                width = width,
                kind_width = kind_width
            )
        })
        .collect()
}

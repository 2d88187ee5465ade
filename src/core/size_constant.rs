//! Measured sizes.

use serde::Serialize;

use super::probed_type::ProbedType;

/// The result of probing one type: a constant name and the byte size the
/// native compiler reported for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeConstant {
    name: String,
    size: u64,
}

impl SizeConstant {
    /// Pair a probe with the size measured for it.
    pub fn measured(probe: &ProbedType, size: u64) -> Self {
        SizeConstant {
            name: probe.constant_name(),
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

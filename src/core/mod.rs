//! Core data model: probed types, probe sets and measured sizes.

pub mod language;
pub mod probe_set;
pub mod probed_type;
pub mod size_constant;

pub use language::Language;
pub use probe_set::{ProbeSet, ProbeSetError, CHEMFILES_HEADER, CHEMFILES_PROBES};
pub use probed_type::{constant_name, sanitize, ProbedType, TypeKind};
pub use size_constant::SizeConstant;

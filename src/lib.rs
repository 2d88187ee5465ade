//! layout-probe - native type sizes for a foreign-function binding
//!
//! A binding that marshals data into a C library has to allocate buffers of
//! exactly the size the library's compiler uses for each type. This crate
//! measures those sizes with the native compiler, against the library's real
//! headers, and emits them as named constants the binding can load.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for layout probe unit tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    probe_set::CHEMFILES_PROBES, ProbeSet, ProbedType, SizeConstant, TypeKind,
};

pub use builder::ProbeError;
pub use ops::{emit, OutputFormat};
pub use util::config::ProbeConfig;

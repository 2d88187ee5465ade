//! Test utilities for layout probe unit tests.
//!
//! This module is only available when compiling with `--cfg test`. Tests
//! that need a real compiler call [`has_c_compiler`] first and return early
//! when none is installed.

pub mod fixtures;

pub use fixtures::*;

use crate::builder::toolchain::{detect_toolchain, Toolchain};
use crate::core::Language;
use crate::util::config::ToolchainSettings;

/// Whether toolchain detection finds a C compiler on this machine.
pub fn has_c_compiler() -> bool {
    detect_toolchain(&ToolchainSettings::default(), Language::C).is_ok()
}

/// The toolchain auto-detection picks on this machine.
pub fn host_toolchain() -> Box<dyn Toolchain> {
    match detect_toolchain(&ToolchainSettings::default(), Language::C) {
        Ok(toolchain) => toolchain,
        Err(e) => panic!("no host toolchain: {:#}", e),
    }
}

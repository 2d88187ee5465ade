//! Building and running the native layout probe.

pub mod errors;
pub mod probe;
pub mod probe_source;
pub mod toolchain;

pub use errors::ProbeError;
pub use probe::{measure, ProbeOptions};
pub use probe_source::ProbeSource;
pub use toolchain::{detect_toolchain, Toolchain, ToolchainPlatform};

//! User-facing diagnostic messages.
//!
//! Every probe failure states what went wrong, which probe types were
//! involved and what to try next.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the library header cannot be found.
    pub const MISSING_HEADER: &str =
        "help: Pass the library's include directory with `-I <dir>` or `[probe] include_dirs`";

    /// Suggestion when a probed type no longer exists.
    pub const RENAMED_TYPE: &str =
        "help: Update the probe list to match the library's public headers";

    /// Suggestion when no compiler is found.
    pub const NO_COMPILER: &str =
        "help: Set the CC environment variable, pass `--cc <path>`, or install a C compiler";

    /// Suggestion when the probe executable cannot run on this machine.
    pub const CROSS_RUNNER: &str =
        "help: Cross-compiled probes need a runner, e.g. `--runner node` for emscripten";

    /// Suggestion for more output.
    pub const VERBOSE: &str = "help: Run with `--verbose` to see the compiler command";
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let label = if color { "\x1b[1;31merror\x1b[0m" } else { "error" };
        output.push_str(&format!("{}: {}\n", label, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        for suggestion in &self.suggestions {
            output.push_str(&format!("{}\n", suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Probe types the native compiler could not resolve, shown against the
/// generated probe source.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("cannot measure {}", .types.join(", "))]
#[diagnostic(
    code(layout_probe::unresolved_type),
    help("Each type must be declared and complete in the included headers. Check the include path, or update the probe list if the library renamed the type.")
)]
pub struct UnresolvedTypeError {
    pub types: Vec<String>,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("not a complete type here")]
    pub span: Option<SourceSpan>,
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("failed to compile the layout probe")
            .with_context("chemfiles.h: No such file or directory")
            .with_suggestion(suggestions::MISSING_HEADER);

        let output = diag.format(false);
        assert!(output.starts_with("error: failed to compile the layout probe\n"));
        assert!(output.contains("  = chemfiles.h: No such file"));
        assert!(output.contains("help: Pass the library's include directory"));
    }

    #[test]
    fn test_colored_label() {
        let diag = Diagnostic::error("the layout probe exited with 1");
        assert!(diag.format(true).starts_with("\x1b[1;31merror\x1b[0m: the layout probe"));
        assert_eq!(diag.to_string(), "error: the layout probe exited with 1\n");
    }

    #[test]
    fn test_unresolved_type_message() {
        let err = UnresolvedTypeError {
            types: vec!["chfl_cellshape".to_string(), "chfl_bond_order".to_string()],
            src: NamedSource::new("probe.c", String::from("x")),
            span: Some((0, 1).into()),
        };
        assert_eq!(err.to_string(), "cannot measure chfl_cellshape, chfl_bond_order");
    }
}

//! Probe failures.

use miette::NamedSource;
use thiserror::Error;

use super::probe_source::ProbeSource;
use crate::util::diagnostic::{suggestions, Diagnostic, UnresolvedTypeError};

/// Error while building or running the layout probe.
///
/// None of these leave partial output behind: sizes are only emitted once
/// every probe has been measured.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to prepare the layout probe")]
    Io(#[from] std::io::Error),

    #[error("failed to run `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("cannot measure {}", .types.join(", "))]
    Unresolved {
        types: Vec<String>,
        lines: Vec<usize>,
        unit: ProbeSource,
        stderr: String,
    },

    #[error("failed to compile the layout probe")]
    Compile { command: String, stderr: String },

    #[error("the layout probe exited with {status}")]
    Run { status: String, stderr: String },

    #[error("the layout probe printed {found} sizes, expected {expected}")]
    MalformedOutput { expected: usize, found: usize },

    #[error("the layout probe printed an invalid size on line {line}: `{text}`")]
    InvalidSize { line: usize, text: String },
}

impl ProbeError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ProbeError::Unresolved { types, stderr, .. } => {
                let mut diag = diag;
                for ty in types {
                    diag = diag.with_context(format!("`{}` is not a complete type", ty));
                }
                with_stderr(diag, stderr).with_suggestion(suggestions::RENAMED_TYPE)
            }
            ProbeError::Compile { command, stderr } => {
                let diag = with_stderr(diag.with_context(format!("command: {}", command)), stderr);
                if is_missing_header(stderr) {
                    diag.with_suggestion(suggestions::MISSING_HEADER)
                } else {
                    diag.with_suggestion(suggestions::VERBOSE)
                }
            }
            ProbeError::Spawn { .. } => diag.with_suggestion(suggestions::NO_COMPILER),
            ProbeError::Run { stderr, .. } => {
                with_stderr(diag, stderr).with_suggestion(suggestions::CROSS_RUNNER)
            }
            ProbeError::Io(_)
            | ProbeError::MalformedOutput { .. }
            | ProbeError::InvalidSize { .. } => diag,
        }
    }

    /// The probe source annotated with the first failing probe, for
    /// unresolved types.
    pub fn to_source_diagnostic(&self) -> Option<UnresolvedTypeError> {
        let ProbeError::Unresolved {
            types, lines, unit, ..
        } = self
        else {
            return None;
        };

        let span = lines
            .first()
            .and_then(|&line| unit.line_span(line))
            .map(|(offset, len)| (offset, len).into());

        Some(UnresolvedTypeError {
            types: types.clone(),
            src: NamedSource::new(unit.file_name(), unit.text().to_string()),
            span,
        })
    }
}

fn with_stderr(mut diag: Diagnostic, stderr: &str) -> Diagnostic {
    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        diag = diag.with_context(line.trim_end().to_string());
    }
    diag
}

/// Whether compiler output reports a header that could not be found.
pub fn is_missing_header(stderr: &str) -> bool {
    stderr.contains("No such file or directory")
        || stderr.contains("file not found")
        || stderr.contains("Cannot open include file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Language, ProbeSet};

    #[test]
    fn test_missing_header_detection() {
        assert!(is_missing_header(
            "layout_probe.c:5:10: fatal error: chemfiles.h: No such file or directory"
        ));
        assert!(is_missing_header(
            "layout_probe.c:5:10: fatal error: 'chemfiles.h' file not found"
        ));
        assert!(is_missing_header(
            "layout_probe.c(5): fatal error C1083: Cannot open include file: 'chemfiles.h'"
        ));
        assert!(!is_missing_header("error: 'chfl_cellshape' undeclared"));
    }

    #[test]
    fn test_compile_diagnostic_suggests_include_dir() {
        let err = ProbeError::Compile {
            command: "cc layout_probe.c -o layout_probe".to_string(),
            stderr: "fatal error: chemfiles.h: No such file or directory\n".to_string(),
        };
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("failed to compile the layout probe"));
        assert!(output.contains("command: cc layout_probe.c"));
        assert!(output.contains(suggestions::MISSING_HEADER));
    }

    #[test]
    fn test_unresolved_source_diagnostic() {
        let unit = ProbeSource::render(
            &ProbeSet::chemfiles(),
            Language::C,
            &["chemfiles.h".to_string()],
        );
        let line = unit.line_of_probe(6).unwrap();
        let err = ProbeError::Unresolved {
            types: vec!["chfl_cellshape".to_string()],
            lines: vec![line],
            unit,
            stderr: String::new(),
        };

        assert_eq!(err.to_string(), "cannot measure chfl_cellshape");
        let source = err.to_source_diagnostic().unwrap();
        assert!(source.span.is_some());
        assert_eq!(source.types, vec!["chfl_cellshape"]);

        let other = ProbeError::MalformedOutput {
            expected: 8,
            found: 7,
        };
        assert!(other.to_source_diagnostic().is_none());
    }
}

//! Generation of the probe translation unit.
//!
//! The unit applies the compiler's own `sizeof` to every probed type and
//! prints one decimal number per line, in probe order. Each probe sits on a
//! line of its own so compiler errors can be traced back to the type.

use crate::core::{Language, ProbeSet};

/// A rendered probe unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSource {
    text: String,
    language: Language,
    /// 1-based source line of each probe, in probe order.
    probe_lines: Vec<usize>,
}

impl ProbeSource {
    /// Render the probe for `set`, including `headers` after the standard prelude.
    pub fn render(set: &ProbeSet, language: Language, headers: &[String]) -> Self {
        let mut lines: Vec<String> = Vec::new();
        let mut probe_lines = Vec::with_capacity(set.len());

        lines.push("/* Generated by layout-probe. Prints sizeof of each probed type. */".to_string());
        for header in language.prelude_headers() {
            lines.push(include_line(header));
        }
        lines.push(String::new());
        for header in headers {
            lines.push(include_line(header));
        }
        lines.push(String::new());

        lines.push(match language {
            Language::C => "int main(void) {".to_string(),
            Language::Cxx => "int main() {".to_string(),
        });
        for probe in set {
            lines.push(format!(
                "    printf(\"%llu\\n\", (unsigned long long) sizeof({}));",
                probe.spelling()
            ));
            probe_lines.push(lines.len());
        }
        lines.push("    return 0;".to_string());
        lines.push("}".to_string());

        let mut text = lines.join("\n");
        text.push('\n');

        ProbeSource {
            text,
            language,
            probe_lines,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File name the source should be written to.
    pub fn file_name(&self) -> String {
        format!("layout_probe.{}", self.language.source_extension())
    }

    /// Index of the probe written on the given 1-based line.
    pub fn probe_at_line(&self, line: usize) -> Option<usize> {
        self.probe_lines.iter().position(|&l| l == line)
    }

    /// 1-based line holding the probe at `index`.
    pub fn line_of_probe(&self, index: usize) -> Option<usize> {
        self.probe_lines.get(index).copied()
    }

    /// Byte offset and length of a 1-based line, without its newline.
    pub fn line_span(&self, line: usize) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (number, text) in self.text.split('\n').enumerate() {
            if number + 1 == line {
                return Some((offset, text.len()));
            }
            offset += text.len() + 1;
        }
        None
    }
}

/// `#include` directive for a header given as `name.h`, `<name.h>` or `"name.h"`.
fn include_line(header: &str) -> String {
    let header = header.trim();
    if header.starts_with('<') || header.starts_with('"') {
        format!("#include {}", header)
    } else {
        format!("#include <{}>", header)
    }
}

//! Types whose native size is measured.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every emitted size constant.
pub const CONSTANT_PREFIX: &str = "SIZEOF_";

/// What kind of type a probe measures.
///
/// The kind does not change how the size is obtained; it documents where the
/// type comes from so the probe list reads as a contract with the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    /// A type built into the language or its standard headers.
    #[default]
    Builtin,
    /// A native pointer.
    Pointer,
    /// An enumeration declared by the bound library.
    LibraryEnum,
    /// A struct, array typedef or other aggregate declared by the bound library.
    LibraryStruct,
}

impl TypeKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Builtin => "builtin",
            TypeKind::Pointer => "pointer",
            TypeKind::LibraryEnum => "library-enum",
            TypeKind::LibraryStruct => "library-struct",
        }
    }

    /// Whether the type is declared by the bound library rather than the language.
    pub fn is_library(&self) -> bool {
        matches!(self, TypeKind::LibraryEnum | TypeKind::LibraryStruct)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type spelled exactly as it appears in C source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbedType {
    spelling: Cow<'static, str>,
    kind: TypeKind,
}

impl ProbedType {
    /// Declare a probe for a type known at compile time of this crate.
    pub const fn new(spelling: &'static str, kind: TypeKind) -> Self {
        ProbedType {
            spelling: Cow::Borrowed(spelling),
            kind,
        }
    }

    /// Declare a probe for a type coming from configuration.
    pub fn owned(spelling: impl Into<String>, kind: TypeKind) -> Self {
        ProbedType {
            spelling: Cow::Owned(spelling.into().trim().to_string()),
            kind,
        }
    }

    /// The C spelling of the type, used verbatim inside `sizeof(...)`.
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The name of the constant this probe produces.
    pub fn constant_name(&self) -> String {
        constant_name(&self.spelling)
    }
}

impl fmt::Display for ProbedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling)
    }
}

/// Turn a C type spelling into an identifier fragment.
///
/// A `*` becomes its own `p` word, and every run of characters that cannot
/// appear in an identifier collapses into a single `_`.
pub fn sanitize(spelling: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in spelling.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            current.push(c);
            continue;
        }

        if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        if c == '*' {
            words.push("p".to_string());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("_")
}

/// Derive the constant name for a type spelling.
///
/// `constant_name(T) == uppercase("SIZEOF_" + sanitize(T))`.
pub fn constant_name(spelling: &str) -> String {
    format!("{}{}", CONSTANT_PREFIX, sanitize(spelling)).to_ascii_uppercase()
}

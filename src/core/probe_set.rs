//! The ordered list of probed types.
//!
//! The list is maintained by hand and must follow the public surface of the
//! bound library. There is no way to discover ABI-relevant types from the
//! headers, so adding a type to the binding means adding it here (or to the
//! `extra_types` of a config file). Order is part of the output contract;
//! new entries go at the end.

use std::collections::HashMap;

use thiserror::Error;

use super::probed_type::{ProbedType, TypeKind};

/// Types probed for the chemfiles binding, in output order.
pub const CHEMFILES_PROBES: &[ProbedType] = &[
    ProbedType::new("void*", TypeKind::Pointer),
    ProbedType::new("double", TypeKind::Builtin),
    ProbedType::new("bool", TypeKind::Builtin),
    ProbedType::new("uint64_t", TypeKind::Builtin),
    ProbedType::new("chfl_property_kind", TypeKind::LibraryEnum),
    ProbedType::new("chfl_vector3d", TypeKind::LibraryStruct),
    ProbedType::new("chfl_cellshape", TypeKind::LibraryEnum),
    ProbedType::new("chfl_bond_order", TypeKind::LibraryEnum),
];

/// Header declaring the chemfiles types.
pub const CHEMFILES_HEADER: &str = "chemfiles.h";

/// Error building a probe set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeSetError {
    #[error("no types to probe")]
    Empty,

    #[error("probe #{index} has an empty type spelling")]
    EmptySpelling { index: usize },

    #[error("`{second}` and `{first}` both produce the constant `{name}`")]
    DuplicateConstant {
        name: String,
        first: String,
        second: String,
    },
}

/// A validated, ordered list of probes whose constant names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSet {
    probes: Vec<ProbedType>,
}

impl ProbeSet {
    /// Build a probe set, keeping the given order.
    pub fn new(probes: impl IntoIterator<Item = ProbedType>) -> Result<Self, ProbeSetError> {
        let probes: Vec<ProbedType> = probes.into_iter().collect();
        if probes.is_empty() {
            return Err(ProbeSetError::Empty);
        }

        let mut seen: HashMap<String, &ProbedType> = HashMap::new();
        for (index, probe) in probes.iter().enumerate() {
            if probe.spelling().is_empty() {
                return Err(ProbeSetError::EmptySpelling { index });
            }

            let name = probe.constant_name();
            if let Some(first) = seen.get(&name) {
                return Err(ProbeSetError::DuplicateConstant {
                    name,
                    first: first.spelling().to_string(),
                    second: probe.spelling().to_string(),
                });
            }
            seen.insert(name, probe);
        }

        Ok(ProbeSet { probes })
    }

    /// The probe set the chemfiles binding expects.
    pub fn chemfiles() -> Self {
        ProbeSet {
            probes: CHEMFILES_PROBES.to_vec(),
        }
    }

    /// Append probes after the existing ones.
    pub fn with_extra(
        self,
        extra: impl IntoIterator<Item = ProbedType>,
    ) -> Result<Self, ProbeSetError> {
        ProbeSet::new(self.probes.into_iter().chain(extra))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbedType> {
        self.probes.iter()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProbedType> {
        self.probes.get(index)
    }
}

impl<'a> IntoIterator for &'a ProbeSet {
    type Item = &'a ProbedType;
    type IntoIter = std::slice::Iter<'a, ProbedType>;

    fn into_iter(self) -> Self::IntoIter {
        self.probes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chemfiles_names_are_unique() {
        let set = ProbeSet::new(CHEMFILES_PROBES.iter().cloned()).unwrap();
        assert_eq!(set, ProbeSet::chemfiles());
    }

    #[test]
    fn test_chemfiles_order() {
        let names: Vec<String> = ProbeSet::chemfiles()
            .iter()
            .map(|p| p.constant_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "SIZEOF_VOID_P",
                "SIZEOF_DOUBLE",
                "SIZEOF_BOOL",
                "SIZEOF_UINT64_T",
                "SIZEOF_CHFL_PROPERTY_KIND",
                "SIZEOF_CHFL_VECTOR3D",
                "SIZEOF_CHFL_CELLSHAPE",
                "SIZEOF_CHFL_BOND_ORDER",
            ]
        );
    }

    #[test]
    fn test_builtins_precede_library_types() {
        let set = ProbeSet::chemfiles();
        let first_library = set.iter().position(|p| p.kind().is_library()).unwrap();
        assert!(set.iter().skip(first_library).all(|p| p.kind().is_library()));
    }

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(ProbeSet::new(Vec::new()), Err(ProbeSetError::Empty));
    }

    #[test]
    fn test_empty_spelling_rejected() {
        let err = ProbeSet::new(vec![
            ProbedType::new("double", TypeKind::Builtin),
            ProbedType::owned("   ", TypeKind::Builtin),
        ])
        .unwrap_err();
        assert_eq!(err, ProbeSetError::EmptySpelling { index: 1 });
    }

    #[test]
    fn test_colliding_names_rejected() {
        let err = ProbeSet::chemfiles()
            .with_extra(vec![ProbedType::owned("void *", TypeKind::Pointer)])
            .unwrap_err();
        assert_eq!(
            err,
            ProbeSetError::DuplicateConstant {
                name: "SIZEOF_VOID_P".to_string(),
                first: "void*".to_string(),
                second: "void *".to_string(),
            }
        );
    }

    #[test]
    fn test_extra_types_are_appended() {
        let set = ProbeSet::chemfiles()
            .with_extra(vec![ProbedType::owned("chfl_format_metadata", TypeKind::LibraryStruct)])
            .unwrap();
        assert_eq!(set.len(), CHEMFILES_PROBES.len() + 1);
        assert!(set.iter().zip(CHEMFILES_PROBES).all(|(a, b)| a == b));
        assert_eq!(
            set.get(CHEMFILES_PROBES.len()).unwrap().spelling(),
            "chfl_format_metadata"
        );
    }
}

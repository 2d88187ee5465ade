//! Header fixtures standing in for an installed chemfiles.

use std::path::PathBuf;

use tempfile::TempDir;

/// The chemfiles declarations the default probe list measures.
pub fn chemfiles_header() -> String {
    r#"#ifndef CHEMFILES_H
#define CHEMFILES_H

typedef enum {
    CHFL_PROPERTY_BOOL = 0,
    CHFL_PROPERTY_DOUBLE = 1,
    CHFL_PROPERTY_STRING = 2,
    CHFL_PROPERTY_VECTOR3D = 3,
} chfl_property_kind;

typedef double chfl_vector3d[3];

typedef enum {
    CHFL_CELL_ORTHORHOMBIC = 0,
    CHFL_CELL_TRICLINIC = 1,
    CHFL_CELL_INFINITE = 2,
} chfl_cellshape;

typedef enum {
    CHFL_BOND_UNKNOWN = 0,
    CHFL_BOND_SINGLE = 1,
    CHFL_BOND_DOUBLE = 2,
    CHFL_BOND_TRIPLE = 3,
    CHFL_BOND_QUADRUPLE = 4,
    CHFL_BOND_QINTUPLET = 5,
    CHFL_BOND_AMIDE = 254,
    CHFL_BOND_AROMATIC = 255,
} chfl_bond_order;

#endif
"#
    .to_string()
}

/// A temporary include directory holding a `chemfiles.h`.
pub struct HeaderFixture {
    dir: TempDir,
}

impl HeaderFixture {
    /// Write `contents` as `chemfiles.h` in a fresh include directory.
    pub fn new(contents: impl AsRef<str>) -> Self {
        let dir = TempDir::new().expect("create fixture directory");
        std::fs::write(dir.path().join("chemfiles.h"), contents.as_ref())
            .expect("write fixture header");
        HeaderFixture { dir }
    }

    /// Add another header next to `chemfiles.h`.
    pub fn with_header(self, name: &str, contents: &str) -> Self {
        std::fs::write(self.dir.path().join(name), contents).expect("write fixture header");
        self
    }

    pub fn include_dir(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

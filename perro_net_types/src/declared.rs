use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a declared source type, as reported by the metadata provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Primitive,
    Struct,
    Enum,
    Class,
    Interface,
    #[default]
    Unknown,
}

impl TypeKind {
    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Interface)
    }
}

/// Declared type of a member or parameter: the type token exactly as written
/// plus the kind the metadata provider resolved for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclaredType {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
}

impl DeclaredType {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Unknown)
    }

    /// Type name without a `System.` / `Godot.` namespace qualifier.
    pub fn short_name(&self) -> &str {
        let name = self.name.trim();
        name.strip_prefix("System.")
            .or_else(|| name.strip_prefix("Godot."))
            .unwrap_or(name)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

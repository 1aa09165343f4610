//! Class manifests: the serialized form of the behavior classes, their
//! annotated members and attribute arguments. Members are listed in
//! declaration order; that order is preserved into index assignment.

use std::fmt;

use indexmap::IndexMap;
use perro_net_types::TypeKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub classes: Vec<ClassManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassManifest {
    /// Fully qualified name, e.g. `Game.Player`.
    pub name: String,
    #[serde(default = "default_class_kind")]
    pub kind: TypeKind,
    #[serde(default)]
    pub base: Option<String>,
    /// Script resource the class is declared in (`res://scripts/player.cs`).
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyManifest>,
    #[serde(default)]
    pub functions: Vec<FunctionManifest>,
    /// Declared fields with their default initializer text (attribute classes).
    #[serde(default)]
    pub fields: Vec<FieldManifest>,
}

fn default_class_kind() -> TypeKind {
    TypeKind::Class
}

impl ClassManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            base: None,
            script: None,
            interfaces: Vec::new(),
            properties: Vec::new(),
            functions: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Short name without namespace (`Game.Player` → `Player`).
    pub fn short_name(&self) -> &str {
        short_type_name(&self.name)
    }

    /// True when one of the declared interfaces is `interface` (generic
    /// arguments and namespaces are ignored).
    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces
            .iter()
            .any(|i| short_type_name(strip_generics(i)) == short_type_name(interface))
    }

    pub fn field(&self, name: &str) -> Option<&FieldManifest> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub attributes: Vec<AttributeManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionManifest {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterManifest>,
    #[serde(default)]
    pub attributes: Vec<AttributeManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    /// Default initializer exactly as written in source (`1 << 2`, `InterestLayers.All`).
    #[serde(default)]
    pub default: Option<String>,
}

/// One attribute instance attached to a member, with its explicitly supplied
/// named arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeManifest {
    pub name: String,
    #[serde(default)]
    pub args: IndexMap<String, AttributeValue>,
}

impl AttributeManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: IndexMap::new(),
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.args.insert(name.into(), value);
        self
    }

    /// Matches `NetworkProperty` against both `NetworkProperty` and `NetworkPropertyAttribute`.
    pub fn is(&self, attribute: &str) -> bool {
        let name = short_type_name(&self.name);
        name == attribute || name.strip_suffix("Attribute") == Some(attribute)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Str(v) => write!(f, "{v}"),
        }
    }
}

pub fn short_type_name(name: &str) -> &str {
    let name = strip_generics(name.trim());
    name.rsplit('.').next().unwrap_or(name)
}

fn strip_generics(name: &str) -> &str {
    name.split('<').next().unwrap_or(name)
}

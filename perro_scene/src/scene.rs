use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Property key naming a node's behavior class.
pub const SCRIPT_KEY: &str = "script";
/// Node path of a descriptor's root node.
pub const ROOT_PATH: &str = ".";

/// A parsed scene descriptor. Nodes keep the order they were declared in the
/// file; that order is what the network compiler walks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneDescriptor {
    /// Key of the root node.
    pub root: String,
    pub nodes: Vec<SceneNode>,
}

impl SceneDescriptor {
    pub fn root_node(&self) -> Option<&SceneNode> {
        self.node(&self.root)
    }

    pub fn node(&self, key: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.key == key)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneNode {
    pub key: String,
    pub name: String,
    /// Path of the parent node relative to the descriptor root (`.` when the
    /// parent is the root). `None` only for the root itself.
    pub parent: Option<String>,
    /// Node-level fields other than `name`, `parent` and `instance`.
    pub properties: IndexMap<String, SceneValue>,
    /// Descriptor this node instances, if any.
    pub instance: Option<String>,
    pub data: Option<SceneNodeData>,
}

impl SceneNode {
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn script(&self) -> Option<&str> {
        self.properties.get(SCRIPT_KEY).and_then(SceneValue::as_str)
    }

    /// Path of this node relative to the descriptor root.
    pub fn path(&self) -> String {
        node_path(self.parent.as_deref(), &self.name)
    }
}

/// `.` for the root, bare `name` under the root, `parent/name` otherwise.
pub fn node_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        None => ROOT_PATH.to_string(),
        Some(ROOT_PATH) => name.to_string(),
        Some(parent) => format!("{parent}/{name}"),
    }
}

/// Typed block of a node (`[Node3D] ... [/Node3D]`), with an optional nested base block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneNodeData {
    pub ty: String,
    pub fields: IndexMap<String, SceneValue>,
    pub base: Option<Box<SceneNodeData>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SceneValue {
    Bool(bool),
    F32(f32),

    Vec2 { x: f32, y: f32 },
    Vec3 { x: f32, y: f32, z: f32 },
    Vec4 { x: f32, y: f32, z: f32, w: f32 },

    Str(String),
    Key(String),
}

impl SceneValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SceneValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SceneValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneValue::Bool(v) => write!(f, "{v}"),
            SceneValue::F32(v) => write!(f, "{v}"),
            SceneValue::Vec2 { x, y } => write!(f, "({x}, {y})"),
            SceneValue::Vec3 { x, y, z } => write!(f, "({x}, {y}, {z})"),
            SceneValue::Vec4 { x, y, z, w } => write!(f, "({x}, {y}, {z}, {w})"),
            SceneValue::Str(v) => write!(f, "{v:?}"),
            SceneValue::Key(v) => write!(f, "{v}"),
        }
    }
}

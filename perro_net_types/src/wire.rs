// perro_net_types/src/wire.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// On-wire value category of a replicated property or function argument.
///
/// Discriminants are part of the registry contract read by the runtime and
/// must never be reordered.
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum WireType {
    // --- Nullary ---
    #[default]
    Nil = 0,

    // --- Primitives ---
    Bool,
    Int,
    Float,
    String,

    // --- Math / geometry ---
    Vector2,
    Vector2I,
    Rect2,
    Rect2I,
    Vector3,
    Vector3I,
    Transform2D,
    Vector4,
    Vector4I,
    Plane,
    Quaternion,
    Aabb,
    Basis,
    Transform3D,
    Projection,
    Color,

    // --- Engine handles ---
    StringName,
    NodePath,
    Rid,
    Object,
    Callable,
    Signal,

    // --- Containers ---
    Dictionary,
    Array,

    // --- Packed arrays ---
    PackedByteArray,
    PackedInt32Array,
    PackedInt64Array,
    PackedFloat32Array,
    PackedFloat64Array,
    PackedStringArray,
    PackedVector2Array,
    PackedVector3Array,
    PackedColorArray,
    PackedVector4Array,
}

impl WireType {
    pub const ALL: [WireType; 39] = [
        WireType::Nil,
        WireType::Bool,
        WireType::Int,
        WireType::Float,
        WireType::String,
        WireType::Vector2,
        WireType::Vector2I,
        WireType::Rect2,
        WireType::Rect2I,
        WireType::Vector3,
        WireType::Vector3I,
        WireType::Transform2D,
        WireType::Vector4,
        WireType::Vector4I,
        WireType::Plane,
        WireType::Quaternion,
        WireType::Aabb,
        WireType::Basis,
        WireType::Transform3D,
        WireType::Projection,
        WireType::Color,
        WireType::StringName,
        WireType::NodePath,
        WireType::Rid,
        WireType::Object,
        WireType::Callable,
        WireType::Signal,
        WireType::Dictionary,
        WireType::Array,
        WireType::PackedByteArray,
        WireType::PackedInt32Array,
        WireType::PackedInt64Array,
        WireType::PackedFloat32Array,
        WireType::PackedFloat64Array,
        WireType::PackedStringArray,
        WireType::PackedVector2Array,
        WireType::PackedVector3Array,
        WireType::PackedColorArray,
        WireType::PackedVector4Array,
    ];

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            WireType::Nil => "Nil",
            WireType::Bool => "Bool",
            WireType::Int => "Int",
            WireType::Float => "Float",
            WireType::String => "String",
            WireType::Vector2 => "Vector2",
            WireType::Vector2I => "Vector2I",
            WireType::Rect2 => "Rect2",
            WireType::Rect2I => "Rect2I",
            WireType::Vector3 => "Vector3",
            WireType::Vector3I => "Vector3I",
            WireType::Transform2D => "Transform2D",
            WireType::Vector4 => "Vector4",
            WireType::Vector4I => "Vector4I",
            WireType::Plane => "Plane",
            WireType::Quaternion => "Quaternion",
            WireType::Aabb => "Aabb",
            WireType::Basis => "Basis",
            WireType::Transform3D => "Transform3D",
            WireType::Projection => "Projection",
            WireType::Color => "Color",
            WireType::StringName => "StringName",
            WireType::NodePath => "NodePath",
            WireType::Rid => "Rid",
            WireType::Object => "Object",
            WireType::Callable => "Callable",
            WireType::Signal => "Signal",
            WireType::Dictionary => "Dictionary",
            WireType::Array => "Array",
            WireType::PackedByteArray => "PackedByteArray",
            WireType::PackedInt32Array => "PackedInt32Array",
            WireType::PackedInt64Array => "PackedInt64Array",
            WireType::PackedFloat32Array => "PackedFloat32Array",
            WireType::PackedFloat64Array => "PackedFloat64Array",
            WireType::PackedStringArray => "PackedStringArray",
            WireType::PackedVector2Array => "PackedVector2Array",
            WireType::PackedVector3Array => "PackedVector3Array",
            WireType::PackedColorArray => "PackedColorArray",
            WireType::PackedVector4Array => "PackedVector4Array",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WireType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WireType::ALL
            .iter()
            .copied()
            .find(|ty| ty.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown wire type `{s}`"))
    }
}

/// Refinement of a [`WireType`] that lets the runtime pick a narrower or
/// special-cased encoding.
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum WireSubtype {
    #[default]
    None = 0,
    Guid,
    /// Integer declared as a single byte.
    Byte,
    /// Integer declared as 32 bits (or an enumeration).
    Int,
    NetworkId,
    /// Back-reference to another network-addressable node.
    NetworkNode,
    /// Lazily resolved, peer-scoped value wrapper.
    AsyncPeerValue,
}

impl WireSubtype {
    pub const ALL: [WireSubtype; 7] = [
        WireSubtype::None,
        WireSubtype::Guid,
        WireSubtype::Byte,
        WireSubtype::Int,
        WireSubtype::NetworkId,
        WireSubtype::NetworkNode,
        WireSubtype::AsyncPeerValue,
    ];

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            WireSubtype::None => "None",
            WireSubtype::Guid => "Guid",
            WireSubtype::Byte => "Byte",
            WireSubtype::Int => "Int",
            WireSubtype::NetworkId => "NetworkId",
            WireSubtype::NetworkNode => "NetworkNode",
            WireSubtype::AsyncPeerValue => "AsyncPeerValue",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        WireSubtype::ALL.get(value as usize).copied()
    }
}

impl fmt::Display for WireSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WireSubtype {
    type Err = String;

    /// Accepts a subtype name (`"Byte"`, `"VariantSubtype.Byte"`) or its numeric discriminant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return WireSubtype::from_u8(n).ok_or_else(|| format!("unknown wire subtype `{s}`"));
        }
        let name = s.rsplit('.').next().unwrap_or(s);
        WireSubtype::ALL
            .iter()
            .copied()
            .find(|sub| sub.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("unknown wire subtype `{s}`"))
    }
}

/// A `(WireType, WireSubtype)` pair, the compile-time wire identity of one value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireTypeInfo {
    #[serde(rename = "type")]
    pub ty: WireType,
    pub subtype: WireSubtype,
}

impl WireTypeInfo {
    #[inline]
    pub const fn new(ty: WireType, subtype: WireSubtype) -> Self {
        Self { ty, subtype }
    }

    #[inline]
    pub const fn plain(ty: WireType) -> Self {
        Self::new(ty, WireSubtype::None)
    }

    #[inline]
    pub const fn nil() -> Self {
        Self::plain(WireType::Nil)
    }
}

impl fmt::Display for WireTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subtype {
            WireSubtype::None => write!(f, "{}", self.ty),
            sub => write!(f, "{}:{}", self.ty, sub),
        }
    }
}

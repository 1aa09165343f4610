//! Declared type → wire type classification.
//!
//! Priority order: scalar primitives, allow-listed value types, enumerations,
//! the two framework types matched by identity, reference types, then `Nil`.
//! The classifier is total: unrecognized input yields `Nil` with
//! `recognized = false` so callers can record a diagnostic.

use serde::{Deserialize, Serialize};

use crate::{DeclaredType, TypeKind, WireSubtype, WireType, WireTypeInfo};

/// Exact type identities the classifier special-cases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub async_peer_value_type: String,
    pub network_node_type: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            async_peer_value_type: "LazyPeerState".to_string(),
            network_node_type: "NetworkNode3D".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub wire: WireTypeInfo,
    pub recognized: bool,
}

const SCALARS: &[(&str, WireType, WireSubtype)] = &[
    ("long", WireType::Int, WireSubtype::None),
    ("Int64", WireType::Int, WireSubtype::None),
    ("i64", WireType::Int, WireSubtype::None),
    ("int", WireType::Int, WireSubtype::Int),
    ("Int32", WireType::Int, WireSubtype::Int),
    ("i32", WireType::Int, WireSubtype::Int),
    ("byte", WireType::Int, WireSubtype::Byte),
    ("Byte", WireType::Int, WireSubtype::Byte),
    ("u8", WireType::Int, WireSubtype::Byte),
    ("float", WireType::Float, WireSubtype::None),
    ("Single", WireType::Float, WireSubtype::None),
    ("f32", WireType::Float, WireSubtype::None),
    ("bool", WireType::Bool, WireSubtype::None),
    ("Boolean", WireType::Bool, WireSubtype::None),
    ("string", WireType::String, WireSubtype::None),
    ("String", WireType::String, WireSubtype::None),
    ("byte[]", WireType::PackedByteArray, WireSubtype::None),
    ("Byte[]", WireType::PackedByteArray, WireSubtype::None),
    ("Vec<u8>", WireType::PackedByteArray, WireSubtype::None),
];

const VALUE_TYPES: &[WireType] = &[
    WireType::Vector2,
    WireType::Vector2I,
    WireType::Vector3,
    WireType::Vector3I,
    WireType::Vector4,
    WireType::Vector4I,
    WireType::Quaternion,
    WireType::Color,
    WireType::Rect2,
    WireType::Rect2I,
    WireType::Plane,
    WireType::Aabb,
    WireType::Basis,
    WireType::Transform2D,
    WireType::Transform3D,
    WireType::Projection,
    WireType::StringName,
    WireType::NodePath,
    WireType::Rid,
    WireType::Dictionary,
    WireType::Array,
];

/// Classifies `declared`. An explicit `subtype_override` replaces the inferred
/// subtype but never the inferred wire type.
pub fn classify(
    declared: &DeclaredType,
    subtype_override: Option<WireSubtype>,
    config: &ClassifierConfig,
) -> Classification {
    let mut classification = infer(declared, config);
    if let Some(subtype) = subtype_override {
        classification.wire.subtype = subtype;
    }
    classification
}

fn infer(declared: &DeclaredType, config: &ClassifierConfig) -> Classification {
    let short = declared.short_name();

    if let Some(&(_, ty, subtype)) = SCALARS.iter().find(|(token, _, _)| *token == short) {
        return recognized(WireTypeInfo::new(ty, subtype));
    }

    if let Some(&ty) = VALUE_TYPES.iter().find(|ty| ty.name() == short) {
        return recognized(WireTypeInfo::plain(ty));
    }

    // matched by name whatever the declared kind
    let name = declared.name.trim();
    if name == config.async_peer_value_type {
        return recognized(WireTypeInfo::new(WireType::Object, WireSubtype::AsyncPeerValue));
    }
    if name == config.network_node_type {
        return recognized(WireTypeInfo::new(WireType::Object, WireSubtype::NetworkNode));
    }

    match declared.kind {
        TypeKind::Enum => recognized(WireTypeInfo::new(WireType::Int, WireSubtype::Int)),
        kind if kind.is_reference() => recognized(WireTypeInfo::plain(WireType::Object)),
        _ => {
            log::debug!("type `{}` ({:?}) has no wire mapping", declared.name, declared.kind);
            Classification {
                wire: WireTypeInfo::nil(),
                recognized: false,
            }
        }
    }
}

#[inline]
fn recognized(wire: WireTypeInfo) -> Classification {
    Classification {
        wire,
        recognized: true,
    }
}

//! Per-descriptor compilation results.
//!
//! Maps are keyed `node path → member name` and keep insertion order, which
//! is traversal order: nodes as declared in the descriptor, members most
//! derived class first, each class in declaration order.

use indexmap::IndexMap;
use perro_net_ids::{FunctionIndex, PropertyIndex, SceneId, StaticNodeId};
use perro_net_meta::InterestMask;
use perro_net_types::WireTypeInfo;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedProperty {
    pub node_path: String,
    pub name: String,
    pub wire: WireTypeInfo,
    pub index: PropertyIndex,
    pub interest_mask: InterestMask,
    /// Qualified name of the class in the property type's ancestry that
    /// implements the network serialization interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_serializer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bson_serializer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedFunction {
    pub node_path: String,
    pub name: String,
    pub index: FunctionIndex,
    /// Wire types of the declared parameters, minus the leading peer
    /// parameter when `with_peer` is set.
    pub arguments: Vec<WireTypeInfo>,
    pub with_peer: bool,
}

pub type NodeMembers<T> = IndexMap<String, IndexMap<String, T>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectedData {
    pub properties: NodeMembers<CollectedProperty>,
    pub functions: NodeMembers<CollectedFunction>,
    pub static_network_nodes: Vec<(StaticNodeId, String)>,
    pub is_network_scene: bool,
    pub scene_id: Option<SceneId>,
}

impl CollectedData {
    pub(crate) fn insert_property(&mut self, property: CollectedProperty) {
        self.properties
            .entry(property.node_path.clone())
            .or_default()
            .insert(property.name.clone(), property);
    }

    pub(crate) fn insert_function(&mut self, function: CollectedFunction) {
        self.functions
            .entry(function.node_path.clone())
            .or_default()
            .insert(function.name.clone(), function);
    }

    pub fn has_static_node(&self, node_path: &str) -> bool {
        self.static_network_nodes.iter().any(|(_, p)| p == node_path)
    }

    pub fn property(&self, node_path: &str, name: &str) -> Option<&CollectedProperty> {
        self.properties.get(node_path)?.get(name)
    }

    pub fn function(&self, node_path: &str, name: &str) -> Option<&CollectedFunction> {
        self.functions.get(node_path)?.get(name)
    }

    pub fn property_count(&self) -> usize {
        self.properties.values().map(IndexMap::len).sum()
    }

    pub fn function_count(&self) -> usize {
        self.functions.values().map(IndexMap::len).sum()
    }

    /// True when nothing would be recorded for this descriptor.
    pub fn is_empty(&self) -> bool {
        self.static_network_nodes.is_empty()
            && self.properties.is_empty()
            && self.functions.is_empty()
    }
}

use perro_net_ids::{FunctionIndex, PropertyIndex, StaticNodeId};
use perro_scene::ROOT_PATH;

use crate::NetSchemaError;

/// Sequential id counters of one scene's flattened numbering space.
#[derive(Debug, Clone)]
pub struct IndexAllocator {
    scene: String,
    properties: usize,
    functions: usize,
    static_nodes: usize,
}

impl IndexAllocator {
    pub fn new(scene: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
            properties: 0,
            functions: 0,
            static_nodes: 0,
        }
    }

    pub fn next_property(
        &mut self,
        node_path: &str,
        member: &str,
    ) -> Result<PropertyIndex, NetSchemaError> {
        let index = PropertyIndex::from_count(self.properties).ok_or_else(|| {
            NetSchemaError::PropertyCapacity {
                scene: self.scene.clone(),
                node_path: node_path.to_string(),
                member: member.to_string(),
                limit: PropertyIndex::LIMIT,
            }
        })?;
        self.properties += 1;
        Ok(index)
    }

    pub fn next_function(
        &mut self,
        node_path: &str,
        member: &str,
    ) -> Result<FunctionIndex, NetSchemaError> {
        let index = FunctionIndex::from_count(self.functions).ok_or_else(|| {
            NetSchemaError::FunctionCapacity {
                scene: self.scene.clone(),
                node_path: node_path.to_string(),
                member: member.to_string(),
                limit: FunctionIndex::LIMIT,
            }
        })?;
        self.functions += 1;
        Ok(index)
    }

    pub fn next_static_node(&mut self, node_path: &str) -> Result<StaticNodeId, NetSchemaError> {
        let id = StaticNodeId::from_count(self.static_nodes).ok_or_else(|| {
            NetSchemaError::StaticNodeCapacity {
                scene: self.scene.clone(),
                node_path: node_path.to_string(),
                limit: StaticNodeId::LIMIT,
            }
        })?;
        self.static_nodes += 1;
        Ok(id)
    }

    pub fn property_count(&self) -> usize {
        self.properties
    }

    pub fn function_count(&self) -> usize {
        self.functions
    }

    pub fn static_node_count(&self) -> usize {
        self.static_nodes
    }
}

/// Path of `child` (relative to an instanced descriptor's root) as seen from
/// the descriptor that instances it at `parent`.
pub fn join_node_path(parent: &str, child: &str) -> String {
    if child == ROOT_PATH {
        parent.to_string()
    } else if parent == ROOT_PATH {
        child.to_string()
    } else {
        format!("{parent}/{child}")
    }
}

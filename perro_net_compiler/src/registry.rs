//! The network schema registry: every network scene of a run with its static
//! nodes, properties and functions. Scenes appear in the order they were first
//! registered.

use indexmap::IndexMap;
use perro_net_ids::{SceneId, StaticNodeId};
use serde::Serialize;

use crate::{CollectedData, CollectedFunction, CollectedProperty, NetSchemaError, NodeMembers};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Registry {
    scenes: IndexMap<SceneId, String>,
    static_network_nodes: IndexMap<String, Vec<(StaticNodeId, String)>>,
    properties: IndexMap<String, NodeMembers<CollectedProperty>>,
    functions: IndexMap<String, NodeMembers<CollectedFunction>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `path`, assigning the next one if the scene is new.
    pub fn register_scene(&mut self, path: &str) -> Result<SceneId, NetSchemaError> {
        if let Some(id) = self.scene_id(path) {
            return Ok(id);
        }
        let id = SceneId::from_count(self.scenes.len()).ok_or_else(|| {
            NetSchemaError::SceneCapacity {
                path: path.to_string(),
                limit: SceneId::LIMIT,
            }
        })?;
        self.scenes.insert(id, path.to_string());
        log::info!("registered network scene {id} `{path}`");
        Ok(id)
    }

    /// Copies the non-empty parts of a compiled network scene.
    pub fn record_scene(&mut self, path: &str, data: &CollectedData) {
        if !data.static_network_nodes.is_empty() {
            self.static_network_nodes
                .insert(path.to_string(), data.static_network_nodes.clone());
        }
        if !data.properties.is_empty() {
            self.properties
                .insert(path.to_string(), data.properties.clone());
        }
        if !data.functions.is_empty() {
            self.functions.insert(path.to_string(), data.functions.clone());
        }
    }

    pub fn clear(&mut self) {
        self.scenes.clear();
        self.static_network_nodes.clear();
        self.properties.clear();
        self.functions.clear();
    }

    pub fn scene_id(&self, path: &str) -> Option<SceneId> {
        self.scenes
            .iter()
            .find_map(|(id, p)| (p == path).then_some(*id))
    }

    pub fn scenes(&self) -> impl Iterator<Item = (SceneId, &str)> {
        self.scenes.iter().map(|(id, path)| (*id, path.as_str()))
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn static_network_nodes(&self, path: &str) -> &[(StaticNodeId, String)] {
        self.static_network_nodes
            .get(path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn properties(&self, path: &str) -> Option<&NodeMembers<CollectedProperty>> {
        self.properties.get(path)
    }

    pub fn functions(&self, path: &str) -> Option<&NodeMembers<CollectedFunction>> {
        self.functions.get(path)
    }

    pub fn property(&self, path: &str, node_path: &str, name: &str) -> Option<&CollectedProperty> {
        self.properties.get(path)?.get(node_path)?.get(name)
    }

    pub fn function(&self, path: &str, node_path: &str, name: &str) -> Option<&CollectedFunction> {
        self.functions.get(path)?.get(node_path)?.get(name)
    }
}

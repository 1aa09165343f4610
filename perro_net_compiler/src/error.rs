use perro_scene::SceneParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetSchemaError {
    #[error("scene descriptor `{path}` not found{}", referrer_suffix(.referrer))]
    MissingDescriptor {
        path: String,
        /// `scene:node` that instanced the missing descriptor.
        referrer: Option<String>,
    },

    #[error("failed to parse scene `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: SceneParseError,
    },

    #[error("cannot register network scene `{path}`: limit of {limit} scenes reached")]
    SceneCapacity { path: String, limit: usize },

    #[error("scene `{scene}` exceeds {limit} network properties at `{node_path}`.{member}")]
    PropertyCapacity {
        scene: String,
        node_path: String,
        member: String,
        limit: usize,
    },

    #[error("scene `{scene}` exceeds {limit} network functions at `{node_path}`.{member}")]
    FunctionCapacity {
        scene: String,
        node_path: String,
        member: String,
        limit: usize,
    },

    #[error("scene `{scene}` exceeds {limit} static network nodes at `{node_path}`")]
    StaticNodeCapacity {
        scene: String,
        node_path: String,
        limit: usize,
    },

    #[error("scene `{scene}` has more than one network node at `{node_path}`")]
    DuplicateNodePath { scene: String, node_path: String },

    #[error("circular scene instancing at `{path}`: {}", .chain.join(" -> "))]
    CircularInstancing { path: String, chain: Vec<String> },
}

fn referrer_suffix(referrer: &Option<String>) -> String {
    match referrer {
        Some(r) => format!(" (instanced from {r})"),
        None => String::new(),
    }
}

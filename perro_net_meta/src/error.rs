use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("failed to read class manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid class manifest {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("class `{0}` is declared more than once")]
    DuplicateClass(String),

    #[error("script `{script}` is claimed by both `{first}` and `{second}`")]
    DuplicateScript {
        script: String,
        first: String,
        second: String,
    },
}

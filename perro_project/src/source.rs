use std::{
    fs,
    path::{Path, PathBuf},
};

use perro_scene::DescriptorSource;

use crate::resolve_res_path;

/// Loads `res://` descriptors from a project's `res/` directory.
#[derive(Debug, Clone)]
pub struct FsDescriptorSource {
    project_root: PathBuf,
}

impl FsDescriptorSource {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl DescriptorSource for FsDescriptorSource {
    fn load(&self, path: &str) -> Option<String> {
        let Some(file) = resolve_res_path(path, &self.project_root) else {
            log::warn!("descriptor path `{path}` is not a res:// path");
            return None;
        };
        match fs::read_to_string(&file) {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("failed to read {}: {err}", file.display());
                None
            }
        }
    }
}

pub mod source;
pub mod walkdir;

pub use source::*;
pub use walkdir::*;

use std::{
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

use perro_net_compiler::CompilerConfig;
use perro_net_meta::{ClassRegistry, MetaError};
use toml::Value;

pub const PROJECT_TOML: &str = "project.toml";
pub const RES_DIR: &str = "res";
pub const RES_SCHEME: &str = "res://";
pub const SCENE_EXTENSION: &str = "scn";
pub const MANIFEST_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    pub network: NetworkConfig,
}

/// The `[network]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Root descriptors to compile; discovered from `res/` when `None`.
    pub scenes: Option<Vec<String>>,
    /// Directory of class manifest files.
    pub classes: String,
    pub base_type: String,
    pub identity_property: String,
    pub async_peer_value_type: String,
    pub network_serializer_interface: String,
    pub bson_serializer_interface: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let compiler = CompilerConfig::default();
        Self {
            scenes: None,
            classes: "res://classes".to_string(),
            base_type: compiler.network_base_type,
            identity_property: compiler.identity_property,
            async_peer_value_type: compiler.classifier.async_peer_value_type,
            network_serializer_interface: compiler.network_serializer_interface,
            bson_serializer_interface: compiler.bson_serializer_interface,
        }
    }
}

impl NetworkConfig {
    pub fn compiler_config(&self) -> CompilerConfig {
        let mut config = CompilerConfig::default().with_base_type(&self.base_type);
        config.identity_property = self.identity_property.clone();
        config.classifier.async_peer_value_type = self.async_peer_value_type.clone();
        config.network_serializer_interface = self.network_serializer_interface.clone();
        config.bson_serializer_interface = self.bson_serializer_interface.clone();
        config
    }
}

#[derive(Debug)]
pub enum ProjectError {
    Io(std::io::Error),
    ParseToml(toml::de::Error),
    MissingField(&'static str),
    InvalidField(&'static str, String),
    Manifest(MetaError),
    NotAProject(PathBuf),
}

impl Display for ProjectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::ParseToml(err) => write!(f, "{err}"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::InvalidField(field, reason) => write!(f, "invalid field `{field}`: {reason}"),
            Self::Manifest(err) => write!(f, "{err}"),
            Self::NotAProject(path) => {
                write!(f, "no {PROJECT_TOML} found in {}", path.display())
            }
        }
    }
}

impl std::error::Error for ProjectError {}

impl From<std::io::Error> for ProjectError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for ProjectError {
    fn from(value: toml::de::Error) -> Self {
        Self::ParseToml(value)
    }
}

impl From<MetaError> for ProjectError {
    fn from(value: MetaError) -> Self {
        Self::Manifest(value)
    }
}

/// A loaded project: its root directory and parsed `project.toml`.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    pub fn load(root: &Path) -> Result<Self, ProjectError> {
        if !root.join(PROJECT_TOML).is_file() {
            return Err(ProjectError::NotAProject(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
            config: load_project_toml(root)?,
        })
    }

    /// Configured root scenes, or every descriptor under `res/` when none are listed.
    pub fn network_scenes(&self) -> Result<Vec<String>, ProjectError> {
        match &self.config.network.scenes {
            Some(scenes) => Ok(scenes.clone()),
            None => discover_scenes(&self.root),
        }
    }

    pub fn load_classes(&self) -> Result<ClassRegistry, ProjectError> {
        load_class_registry(&self.root, &self.config.network.classes)
    }

    pub fn descriptor_source(&self) -> FsDescriptorSource {
        FsDescriptorSource::new(&self.root)
    }

    pub fn compiler_config(&self) -> CompilerConfig {
        self.config.network.compiler_config()
    }
}

pub fn resolve_local_path(input: &str, local_root: &Path) -> PathBuf {
    if let Some(stripped) = input.strip_prefix("local://") {
        let rel = stripped.trim_start_matches('/');
        if rel.is_empty() {
            return local_root.to_path_buf();
        }
        return local_root.join(rel);
    }

    if input.starts_with('/') {
        let rel = input.trim_start_matches('/');
        if rel.is_empty() {
            return local_root.to_path_buf();
        }
        return local_root.join(rel);
    }

    PathBuf::from(input)
}

/// Maps `res://a/b.scn` to `<project_root>/res/a/b.scn`. `None` for paths
/// without the `res://` scheme.
pub fn resolve_res_path(path: &str, project_root: &Path) -> Option<PathBuf> {
    let rel = path.strip_prefix(RES_SCHEME)?.trim_start_matches('/');
    let mut out = project_root.join(RES_DIR);
    for part in rel.split(['/', '\\']).filter(|p| !p.is_empty()) {
        out.push(part);
    }
    Some(out)
}

/// Every `.scn` file under `res/` as a sorted `res://` path.
pub fn discover_scenes(project_root: &Path) -> Result<Vec<String>, ProjectError> {
    let res_dir = project_root.join(RES_DIR);
    if !res_dir.is_dir() {
        return Ok(Vec::new());
    }
    let scenes: Vec<String> = collect_files_with_extension(&res_dir, &res_dir, SCENE_EXTENSION)?
        .into_iter()
        .map(|rel| format!("{RES_SCHEME}{rel}"))
        .collect();
    log::debug!("discovered {} scene(s) under {}", scenes.len(), res_dir.display());
    Ok(scenes)
}

/// Loads every `.json` manifest under the `res://` directory `classes`, in
/// sorted path order.
pub fn load_class_registry(project_root: &Path, classes: &str) -> Result<ClassRegistry, ProjectError> {
    let dir = resolve_res_path(classes, project_root).ok_or_else(|| {
        ProjectError::InvalidField("network.classes", "must start with `res://`".to_string())
    })?;
    let mut registry = ClassRegistry::new();
    if !dir.is_dir() {
        log::warn!("class manifest directory {} does not exist", dir.display());
        return Ok(registry);
    }
    for rel in collect_files_with_extension(&dir, &dir, MANIFEST_EXTENSION)? {
        registry.load_file(&dir.join(rel))?;
    }
    log::debug!("loaded {} class(es) from {}", registry.len(), dir.display());
    Ok(registry)
}

pub fn default_project_toml(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"

[network]
classes = "res://classes"
base_type = "NetworkNode3D"
identity_property = "NetworkId"
"#
    )
}

pub fn load_project_toml(root: &Path) -> Result<ProjectConfig, ProjectError> {
    let project_toml = fs::read_to_string(root.join(PROJECT_TOML))?;
    parse_project_toml(&project_toml)
}

pub fn parse_project_toml(contents: &str) -> Result<ProjectConfig, ProjectError> {
    let value: Value = contents.parse::<Value>()?;
    let project_table = value
        .get("project")
        .and_then(Value::as_table)
        .ok_or(ProjectError::MissingField("project"))?;

    let name = project_table
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ProjectError::MissingField("project.name"))?
        .to_string();

    let mut network = NetworkConfig::default();
    let Some(network_value) = value.get("network") else {
        return Ok(ProjectConfig { name, network });
    };
    let network_table = network_value.as_table().ok_or(ProjectError::InvalidField(
        "network",
        "must be a table".to_string(),
    ))?;

    if let Some(raw) = network_table.get("scenes") {
        let list = raw.as_array().ok_or(ProjectError::InvalidField(
            "network.scenes",
            "must be an array of strings".to_string(),
        ))?;
        let mut scenes = Vec::with_capacity(list.len());
        for item in list {
            let scene = item.as_str().ok_or(ProjectError::InvalidField(
                "network.scenes",
                "must be an array of strings".to_string(),
            ))?;
            validate_res_path("network.scenes", scene)?;
            scenes.push(scene.to_string());
        }
        network.scenes = Some(scenes);
    }

    read_string(network_table, "classes", "network.classes", &mut network.classes)?;
    validate_res_path("network.classes", &network.classes)?;

    read_string(network_table, "base_type", "network.base_type", &mut network.base_type)?;
    read_string(
        network_table,
        "identity_property",
        "network.identity_property",
        &mut network.identity_property,
    )?;
    read_string(
        network_table,
        "async_peer_value_type",
        "network.async_peer_value_type",
        &mut network.async_peer_value_type,
    )?;
    read_string(
        network_table,
        "network_serializer_interface",
        "network.network_serializer_interface",
        &mut network.network_serializer_interface,
    )?;
    read_string(
        network_table,
        "bson_serializer_interface",
        "network.bson_serializer_interface",
        &mut network.bson_serializer_interface,
    )?;

    Ok(ProjectConfig { name, network })
}

/// Overwrites `out` with the string at `key`, if present. Empty strings are rejected.
fn read_string(
    table: &toml::Table,
    key: &str,
    field: &'static str,
    out: &mut String,
) -> Result<(), ProjectError> {
    let Some(raw) = table.get(key) else {
        return Ok(());
    };
    let value = raw
        .as_str()
        .ok_or(ProjectError::InvalidField(field, "must be a string".to_string()))?
        .trim();
    if value.is_empty() {
        return Err(ProjectError::InvalidField(field, "must not be empty".to_string()));
    }
    *out = value.to_string();
    Ok(())
}

fn validate_res_path(field: &'static str, path: &str) -> Result<(), ProjectError> {
    if path.starts_with(RES_SCHEME) {
        return Ok(());
    }
    Err(ProjectError::InvalidField(
        field,
        "must start with `res://`".to_string(),
    ))
}

use std::{fs, path::Path};

use indexmap::IndexMap;

use crate::{ClassManifest, ManifestFile, MetaError, MetadataProvider};

/// Manifest-backed [`MetadataProvider`].
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: IndexMap<String, ClassManifest>,
    /// normalized script path → class name
    scripts: IndexMap<String, String>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(origin: &str, json: &str) -> Result<Self, MetaError> {
        let mut registry = Self::new();
        registry.load_json(origin, json)?;
        Ok(registry)
    }

    /// Adds every class of a manifest file. `origin` only labels errors.
    pub fn load_json(&mut self, origin: &str, json: &str) -> Result<(), MetaError> {
        let file: ManifestFile = serde_json::from_str(json).map_err(|source| MetaError::Json {
            origin: origin.to_string(),
            source,
        })?;
        for class in file.classes {
            self.insert(class)?;
        }
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), MetaError> {
        let json = fs::read_to_string(path).map_err(|source| MetaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_json(&path.display().to_string(), &json)
    }

    pub fn insert(&mut self, class: ClassManifest) -> Result<(), MetaError> {
        if self.classes.contains_key(&class.name) {
            return Err(MetaError::DuplicateClass(class.name));
        }
        if let Some(script) = class.script.as_deref() {
            let key = normalize_script_path(script);
            if let Some(first) = self.scripts.get(&key) {
                return Err(MetaError::DuplicateScript {
                    script: script.to_string(),
                    first: first.clone(),
                    second: class.name.clone(),
                });
            }
            self.scripts.insert(key, class.name.clone());
        }
        log::debug!("registered class `{}`", class.name);
        self.classes.insert(class.name.clone(), class);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassManifest> {
        self.classes.values()
    }
}

impl MetadataProvider for ClassRegistry {
    fn class(&self, name: &str) -> Option<&ClassManifest> {
        if let Some(class) = self.classes.get(name) {
            return Some(class);
        }
        // unqualified lookup only when it is unambiguous
        let mut matches = self.classes.values().filter(|c| c.short_name() == name);
        match (matches.next(), matches.next()) {
            (Some(class), None) if !name.contains('.') => Some(class),
            _ => None,
        }
    }

    fn resolve_script(&self, script: &str) -> Option<&ClassManifest> {
        let key = normalize_script_path(script);
        if let Some(name) = self.scripts.get(&key) {
            return self.classes.get(name);
        }
        // bare file names (`player.cs`) match a unique script path suffix
        let mut matches = self
            .scripts
            .iter()
            .filter(|(path, _)| path.ends_with(&format!("/{key}")));
        match (matches.next(), matches.next()) {
            (Some((_, name)), None) => self.classes.get(name),
            _ => None,
        }
    }
}

/// `res://scripts\player.cs` → `scripts/player.cs`
pub fn normalize_script_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let path = path.strip_prefix("res://").unwrap_or(&path);
    path.trim_start_matches('/').to_string()
}

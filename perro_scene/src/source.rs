use indexmap::IndexMap;

/// Supplies raw descriptor text by resource path (e.g. `res://player.scn`).
pub trait DescriptorSource {
    fn load(&self, path: &str) -> Option<String>;
}

/// In-memory descriptor set, keyed by resource path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: IndexMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), text.into());
        self
    }

    pub fn with(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl DescriptorSource for MemorySource {
    fn load(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}

impl<T: DescriptorSource + ?Sized> DescriptorSource for &T {
    fn load(&self, path: &str) -> Option<String> {
        (**self).load(path)
    }
}

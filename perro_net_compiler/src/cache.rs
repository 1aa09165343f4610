use std::rc::Rc;

use indexmap::IndexMap;

use crate::CollectedData;

#[derive(Debug, Clone)]
pub enum CacheEntry {
    /// Compilation started and has not returned yet; re-entry means a cycle.
    InProgress,
    Complete(Rc<CollectedData>),
}

/// Per-run memo of compiled descriptors, keyed by descriptor path.
#[derive(Debug, Default)]
pub struct CompilationCache {
    entries: IndexMap<String, CacheEntry>,
    parses: usize,
}

impl CompilationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&CacheEntry> {
        self.entries.get(path)
    }

    pub fn completed(&self, path: &str) -> Option<Rc<CollectedData>> {
        match self.entries.get(path)? {
            CacheEntry::Complete(data) => Some(Rc::clone(data)),
            CacheEntry::InProgress => None,
        }
    }

    pub fn begin(&mut self, path: &str) {
        self.entries.insert(path.to_string(), CacheEntry::InProgress);
    }

    pub fn finish(&mut self, path: &str, data: CollectedData) -> Rc<CollectedData> {
        let data = Rc::new(data);
        self.entries
            .insert(path.to_string(), CacheEntry::Complete(Rc::clone(&data)));
        data
    }

    /// Drops an in-progress marker after a failed compilation.
    pub fn abandon(&mut self, path: &str) {
        if matches!(self.entries.get(path), Some(CacheEntry::InProgress)) {
            self.entries.shift_remove(path);
        }
    }

    pub fn record_parse(&mut self) {
        self.parses += 1;
    }

    /// Descriptors parsed since the last `clear`.
    pub fn parse_count(&self) -> usize {
        self.parses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.parses = 0;
    }
}

//! Named-block registry: alias → block id.

use std::collections::BTreeMap;

use outliner_types::{BlockId, BlockName};

#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: BTreeMap<BlockName, BlockId>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<BlockId> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Register `name` for `id`. Returns the previously registered id, if any.
    pub fn register(&mut self, name: BlockName, id: BlockId) -> Option<BlockId> {
        self.names.insert(name, id)
    }

    /// Drop `name` if it is registered to `id`.
    pub fn unregister(&mut self, name: &str, id: &BlockId) {
        if self.names.get(name) == Some(id) {
            self.names.remove(name);
        }
    }

    /// Names starting with `prefix` (case-insensitive), sorted.
    pub fn filter_by_name(&self, prefix: &str) -> Vec<BlockName> {
        let prefix = prefix.to_lowercase();
        self.names
            .keys()
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &BlockName> {
        self.names.keys()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

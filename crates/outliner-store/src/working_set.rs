//! Working-set expansion for batch mutations and undo capture.
//!
//! A structural edit on a block can touch its whole subtree and rewrite its
//! parent's `items`, so the set of blocks to snapshot is: the seeds, all
//! their descendants, and the immediate parent of each. Indent and merge also
//! write to the previous sibling and unindent to the grandparent, so those
//! join the boundary too.

use indexmap::IndexSet;

use outliner_types::BlockId;

use crate::BlocksStore;

/// Result of [`BlocksStore::expand_to_parent_and_children`].
///
/// `primary` is closed under descendants. `boundary` holds the parents,
/// previous siblings and grandparents of primary ids that are not primary
/// themselves. Re-expanding only walks `primary`, so expansion is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    primary: IndexSet<BlockId>,
    boundary: IndexSet<BlockId>,
}

impl WorkingSet {
    /// A working set of exactly these ids, without expansion.
    pub fn verbatim<'a>(ids: impl IntoIterator<Item = &'a BlockId>) -> Self {
        Self {
            primary: ids.into_iter().copied().collect(),
            boundary: IndexSet::new(),
        }
    }

    pub fn primary(&self) -> impl Iterator<Item = &BlockId> {
        self.primary.iter()
    }

    pub fn boundary(&self) -> impl Iterator<Item = &BlockId> {
        self.boundary.iter()
    }

    /// Every id, primary first.
    pub fn ids(&self) -> impl Iterator<Item = &BlockId> {
        self.primary.iter().chain(self.boundary.iter())
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.primary.contains(id) || self.boundary.contains(id)
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.boundary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.boundary.is_empty()
    }

    pub fn to_vec(&self) -> Vec<BlockId> {
        self.ids().copied().collect()
    }
}

impl BlocksStore {
    /// Seeds ∪ transitive descendants ∪ each one's immediate parent, plus the
    /// previous sibling and grandparent of each.
    ///
    /// Ids absent from the store are kept as seeds (they may be about to be
    /// created) but contribute nothing else.
    pub fn expand_to_parent_and_children<'a>(&self, ids: impl IntoIterator<Item = &'a BlockId>) -> WorkingSet {
        let mut primary = IndexSet::new();
        for id in ids {
            primary.insert(*id);
            primary.extend(self.descendants(id));
        }

        let boundary = primary
            .iter()
            .flat_map(|id| self.neighbors(id))
            .filter(|nid| !primary.contains(nid))
            .collect();

        let set = WorkingSet { primary, boundary };
        tracing::trace!(size = set.len(), "expanded working set");
        set
    }

    /// Parent, previous sibling and grandparent of `id`, where they exist.
    fn neighbors(&self, id: &BlockId) -> Vec<BlockId> {
        let Some(parent) = self.parent_of(id) else {
            return Vec::new();
        };
        let siblings = self.children(&parent);
        let previous = siblings
            .iter()
            .position(|c| c == id)
            .filter(|index| *index > 0)
            .map(|index| siblings[index - 1]);

        [Some(parent), previous, self.parent_of(&parent)].into_iter().flatten().collect()
    }

    /// Re-expand an existing working set from its primary part.
    pub fn expand_working_set(&self, set: &WorkingSet) -> WorkingSet {
        self.expand_to_parent_and_children(set.primary())
    }
}

//! Reverse index: child → referrers.
//!
//! Derived from the primary index and never authoritative. Structural parent
//! truth lives in `Block::parent`; this map only answers backlink queries and
//! can always be rebuilt from the blocks themselves.

use std::collections::{BTreeSet, HashMap, HashSet};

use outliner_types::{Block, BlockId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseIndex {
    referrers: HashMap<BlockId, BTreeSet<BlockId>>,
}

impl ReverseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute from scratch.
    pub fn rebuild<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Self {
        let mut index = Self::new();
        for block in blocks {
            for target in block.references() {
                index.add(*target, block.id);
            }
        }
        index
    }

    /// Ids that reference `id` through their items or links.
    pub fn lookup(&self, id: &BlockId) -> Vec<BlockId> {
        self.referrers
            .get(id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, target: &BlockId, referrer: &BlockId) -> bool {
        self.referrers
            .get(target)
            .is_some_and(|set| set.contains(referrer))
    }

    pub fn add(&mut self, target: BlockId, referrer: BlockId) {
        self.referrers.entry(target).or_default().insert(referrer);
    }

    pub fn remove(&mut self, target: &BlockId, referrer: &BlockId) {
        if let Some(set) = self.referrers.get_mut(target) {
            set.remove(referrer);
            if set.is_empty() {
                self.referrers.remove(target);
            }
        }
    }

    /// Reconcile the entries for `after.id` given its previous value.
    pub(crate) fn update(&mut self, before: Option<&Block>, after: &Block) {
        let old: BTreeSet<BlockId> = before
            .map(|b| b.references().copied().collect())
            .unwrap_or_default();
        let new: BTreeSet<BlockId> = after.references().copied().collect();

        for dropped in old.difference(&new) {
            self.remove(dropped, &after.id);
        }
        for added in new.difference(&old) {
            self.add(*added, after.id);
        }
    }

    /// Drop `block` as a referrer everywhere, and drop its own entry.
    pub(crate) fn delete(&mut self, block: &Block) {
        for target in block.references() {
            self.remove(target, &block.id);
        }
        self.referrers.remove(&block.id);
    }

    /// Re-add every reference from `blocks` that points at one of `targets`.
    ///
    /// `delete` drops a block's own entry, so a block reinserted later needs
    /// the referrers that outlived it restored.
    pub(crate) fn restore_referrers<'a>(
        &mut self,
        targets: &HashSet<BlockId>,
        blocks: impl IntoIterator<Item = &'a Block>,
    ) {
        for block in blocks {
            for target in block.references().filter(|t| targets.contains(*t)) {
                self.add(*target, block.id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.referrers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.referrers.is_empty()
    }
}

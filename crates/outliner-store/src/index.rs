//! Primary id → block table.
//!
//! Owns the [`ReverseIndex`] so every `put`/`delete` updates both in one
//! call; there is no way to reach the block table without going through the
//! methods that keep the two in step.

use std::collections::{HashMap, HashSet};

use outliner_types::{Block, BlockId};

use crate::reverse::ReverseIndex;

/// How `put` treats an incoming block whose id is already stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PutMode {
    /// The incoming block replaces the stored one wholesale.
    #[default]
    Replace,
    /// Present fields of the incoming block overwrite the stored ones.
    ///
    /// `parent`/`name` count as present when `Some`, `items`/`links` when
    /// non-empty. `created` keeps the stored value.
    Merge,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PutOpts {
    pub mode: PutMode,
}

impl PutOpts {
    pub fn merge() -> Self {
        Self { mode: PutMode::Merge }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlocksIndex {
    blocks: HashMap<BlockId, Block>,
    reverse: ReverseIndex,
}

impl BlocksIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn reverse(&self) -> &ReverseIndex {
        &self.reverse
    }

    /// Upsert blocks. Does not validate tree invariants: undo replay restores
    /// parents before their children exist.
    pub fn put(&mut self, blocks: impl IntoIterator<Item = Block>, opts: PutOpts) {
        let mut fresh = HashSet::new();
        for incoming in blocks {
            let previous = self.blocks.remove(&incoming.id);
            if previous.is_none() {
                fresh.insert(incoming.id);
            }
            let stored = match (opts.mode, &previous) {
                (PutMode::Merge, Some(existing)) => merge_block(existing, incoming),
                _ => incoming,
            };
            tracing::trace!(id = ?stored.id, updated = stored.updated, "put block");
            self.reverse.update(previous.as_ref(), &stored);
            self.blocks.insert(stored.id, stored);
        }
        if !fresh.is_empty() {
            self.reverse.restore_referrers(&fresh, self.blocks.values());
        }
    }

    /// Remove exactly the given ids. Non-cascading; missing ids are ignored.
    pub fn delete<'a>(&mut self, ids: impl IntoIterator<Item = &'a BlockId>) {
        for id in ids {
            if let Some(block) = self.blocks.remove(id) {
                tracing::trace!(?id, "delete block");
                self.reverse.delete(&block);
            }
        }
    }

    /// Apply `f` to a stored block and reconcile the reverse index.
    pub(crate) fn update<R>(&mut self, id: &BlockId, f: impl FnOnce(&mut Block) -> R) -> Option<R> {
        let previous = self.blocks.get(id)?.clone();
        let block = self.blocks.get_mut(id)?;
        let out = f(block);
        if previous.items != block.items || previous.links != block.links {
            self.reverse.update(Some(&previous), block);
        }
        Some(out)
    }
}

fn merge_block(existing: &Block, incoming: Block) -> Block {
    Block {
        id: incoming.id,
        parent: incoming.parent.or(existing.parent),
        items: if incoming.items.is_empty() {
            existing.items.clone()
        } else {
            incoming.items
        },
        links: if incoming.links.is_empty() {
            existing.links.clone()
        } else {
            incoming.links
        },
        kind: incoming.kind,
        content: incoming.content,
        name: incoming.name.or_else(|| existing.name.clone()),
        created: existing.created,
        updated: incoming.updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_lookup() {
        let mut index = BlocksIndex::new();
        let root = BlockId::new();
        let child = BlockId::new();

        index.put(
            [
                Block::paragraph(root, None, "root").with_items([child]),
                Block::paragraph(child, Some(root), "child"),
            ],
            PutOpts::default(),
        );

        assert_eq!(index.len(), 2);
        assert!(index.contains(&child));
        assert_eq!(index.get(&child).unwrap().content, "child");
        assert_eq!(index.reverse().lookup(&child), vec![root]);
    }

    #[test]
    fn test_replace_drops_old_references() {
        let mut index = BlocksIndex::new();
        let root = BlockId::new();
        let a = BlockId::new();
        let b = BlockId::new();

        index.put([Block::paragraph(root, None, "").with_items([a])], PutOpts::default());
        index.put([Block::paragraph(root, None, "").with_items([b])], PutOpts::default());

        assert!(index.reverse().lookup(&a).is_empty());
        assert_eq!(index.reverse().lookup(&b), vec![root]);
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut index = BlocksIndex::new();
        let root = BlockId::new();
        let id = BlockId::new();
        let child = BlockId::new();

        let original = Block::paragraph(id, Some(root), "before")
            .with_items([child])
            .with_timestamps(3, 3);
        index.put([original], PutOpts::default());

        let partial = Block::paragraph(id, None, "after").with_timestamps(9, 9);
        index.put([partial], PutOpts::merge());

        let stored = index.get(&id).unwrap();
        assert_eq!(stored.content, "after");
        assert_eq!(stored.parent, Some(root));
        assert_eq!(stored.items, vec![child]);
        assert_eq!(stored.created, 3);
        assert_eq!(stored.updated, 9);
        assert_eq!(index.reverse().lookup(&child), vec![id]);
    }

    #[test]
    fn test_delete_is_not_cascading() {
        let mut index = BlocksIndex::new();
        let root = BlockId::new();
        let child = BlockId::new();
        index.put(
            [
                Block::paragraph(root, None, "").with_items([child]),
                Block::paragraph(child, Some(root), ""),
            ],
            PutOpts::default(),
        );

        index.delete([&root]);
        assert!(!index.contains(&root));
        assert!(index.contains(&child));
        assert!(index.reverse().lookup(&child).is_empty());
    }

    #[test]
    fn test_reinsert_restores_backlinks() {
        let mut index = BlocksIndex::new();
        let named = Block::named("Rust", None);
        let rust = named.id;
        let mut para = Block::paragraph(BlockId::new(), None, "");
        para.links.push(rust);
        index.put([named.clone(), para.clone()], PutOpts::default());

        index.delete([&rust]);
        assert!(index.reverse().lookup(&rust).is_empty());

        index.put([named], PutOpts::default());
        assert_eq!(index.reverse().lookup(&rust), vec![para.id]);
        assert_eq!(index.reverse(), &ReverseIndex::rebuild(index.iter()));
    }

    #[test]
    fn test_update_reconciles_reverse() {
        let mut index = BlocksIndex::new();
        let root = BlockId::new();
        let child = BlockId::new();
        index.put([Block::paragraph(root, None, "")], PutOpts::default());

        index.update(&root, |b| b.items.push(child)).unwrap();
        assert_eq!(index.reverse().lookup(&child), vec![root]);

        assert!(index.update(&child, |_| ()).is_none());
    }
}

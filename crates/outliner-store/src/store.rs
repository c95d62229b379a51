//! The per-document store.
//!
//! [`BlocksStore`] is the explicit context every operation runs against: the
//! block index (with its reverse index), the name registry, the root, the
//! logical clock, and presentational view state. There is no global store.
//!
//! # Logical clock
//!
//! Every caller-visible mutation ticks the clock and stamps the touched
//! blocks' `updated` field. Undo capture relies on this: a block whose
//! `updated` did not change is treated as untouched.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use outliner_types::{Block, BlockId, BlockKind, BlockName, DocumentId};

use crate::config::StoreConfig;
use crate::index::{BlocksIndex, PutMode, PutOpts};
use crate::names::NameRegistry;
use crate::view::ActiveBlock;
use crate::{Result, StoreError};

pub struct BlocksStore {
    document_id: DocumentId,
    config: StoreConfig,

    index: BlocksIndex,
    names: NameRegistry,
    root: Option<BlockId>,

    /// Monotonic logical clock. Advanced on local mutations and raised to
    /// the highest `updated` seen on `put`.
    clock: u64,

    // View state. Not part of any block, never captured by undo.
    pub(crate) collapsed: HashSet<BlockId>,
    pub(crate) selected: HashSet<BlockId>,
    pub(crate) active: Option<ActiveBlock>,
}

impl BlocksStore {
    pub fn new(document_id: DocumentId) -> Self {
        Self::with_config(document_id, StoreConfig::default())
    }

    pub fn with_config(document_id: DocumentId, config: StoreConfig) -> Self {
        Self {
            document_id,
            config,
            index: BlocksIndex::new(),
            names: NameRegistry::new(),
            root: None,
            clock: 0,
            collapsed: HashSet::new(),
            selected: HashSet::new(),
            active: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn index(&self) -> &BlocksIndex {
        &self.index
    }

    pub fn root(&self) -> Option<BlockId> {
        self.root
    }

    pub fn set_root(&mut self, root: Option<BlockId>) {
        self.root = root;
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn block_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get_block(&self, id: &BlockId) -> Option<&Block> {
        self.index.get(id)
    }

    pub fn contains_block(&self, id: &BlockId) -> bool {
        self.index.contains(id)
    }

    /// Blocks for the given ids, skipping missing ones.
    pub fn lookup<'a>(&self, ids: impl IntoIterator<Item = &'a BlockId>) -> Vec<&Block> {
        ids.into_iter().filter_map(|id| self.index.get(id)).collect()
    }

    /// Ids whose items or links reference `id`.
    pub fn lookup_reverse(&self, id: &BlockId) -> Vec<BlockId> {
        self.index.reverse().lookup(id)
    }

    pub(crate) fn require(&self, id: &BlockId) -> Result<&Block> {
        self.index.get(id).ok_or(StoreError::BlockNotFound(*id))
    }

    pub fn parent_of(&self, id: &BlockId) -> Option<BlockId> {
        self.index.get(id).and_then(|b| b.parent)
    }

    pub fn children(&self, id: &BlockId) -> &[BlockId] {
        self.index.get(id).map(|b| b.items.as_slice()).unwrap_or(&[])
    }

    /// Resolve a block by id string or registered name.
    pub fn get_block_by_target(&self, target: &str) -> Option<&Block> {
        if let Ok(id) = BlockId::parse(target) {
            if let Some(block) = self.index.get(&id) {
                return Some(block);
            }
        }
        self.names.get(target).and_then(|id| self.index.get(&id))
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    /// All registered names, sorted.
    pub fn named_nodes(&self) -> Vec<String> {
        self.names.names().map(|n| n.to_string()).collect()
    }

    /// Blocks from the top of the tree down to `id`'s parent.
    ///
    /// Circuit-breaks at `max_depth`.
    pub fn path_to_block(&self, id: &BlockId) -> Vec<&Block> {
        let mut path = Vec::new();
        let mut current = self.parent_of(id);

        while let Some(pid) = current {
            if path.len() >= self.config.max_depth {
                tracing::warn!(?id, max_depth = self.config.max_depth, "path_to_block hit max depth, truncating");
                break;
            }
            let Some(block) = self.index.get(&pid) else {
                break;
            };
            path.push(block);
            current = block.parent;
        }

        path.reverse();
        path
    }

    /// All transitive descendants of `id` in pre-order (excluding `id`).
    pub fn descendants(&self, id: &BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(*id);
        let mut stack: Vec<BlockId> = self.children(id).iter().rev().copied().collect();

        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                tracing::warn!(?next, "cycle in items, skipping");
                continue;
            }
            out.push(next);
            stack.extend(self.children(&next).iter().rev().copied());
        }

        out
    }

    /// Top-level entry points for traversal: the root, or every parentless
    /// block when no root is set.
    pub(crate) fn traversal_roots(&self) -> Vec<BlockId> {
        if let Some(root) = self.root.filter(|r| self.index.contains(r)) {
            return vec![root];
        }
        let mut roots: Vec<BlockId> = self.index.iter().filter(|b| b.is_root()).map(|b| b.id).collect();
        roots.sort();
        roots
    }

    /// Every block reachable from the root, in pre-order.
    pub fn document_order(&self) -> Vec<BlockId> {
        self.preorder(|_| true)
    }

    /// Pre-order traversal that only descends into blocks accepted by
    /// `descend`.
    pub(crate) fn preorder(&self, descend: impl Fn(&BlockId) -> bool) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<(usize, BlockId)> =
            self.traversal_roots().into_iter().rev().map(|id| (0, id)).collect();

        while let Some((depth, id)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if depth > self.config.max_depth {
                tracing::warn!(?id, max_depth = self.config.max_depth, "preorder hit max depth, skipping subtree");
                continue;
            }
            let Some(block) = self.index.get(&id) else {
                continue;
            };
            out.push(id);
            if descend(&id) {
                stack.extend(block.items.iter().rev().map(|child| (depth + 1, *child)));
            }
        }

        out
    }

    // =========================================================================
    // Clock
    // =========================================================================

    pub(crate) fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Apply `f` to a stored block and stamp it with a fresh `updated`.
    pub(crate) fn modify<R>(&mut self, id: &BlockId, f: impl FnOnce(&mut Block) -> R) -> Result<R> {
        if !self.index.contains(id) {
            return Err(StoreError::BlockNotFound(*id));
        }
        let ts = self.tick();
        self.index
            .update(id, |block| {
                let out = f(block);
                block.updated = ts;
                out
            })
            .ok_or(StoreError::BlockNotFound(*id))
    }

    /// Insert a freshly created block, stamping both timestamps.
    pub(crate) fn insert_new(&mut self, mut block: Block) {
        let ts = self.tick();
        block.created = ts;
        block.updated = ts;
        if let Some(name) = &block.name {
            self.names.register(name.clone(), block.id);
        }
        self.index.put([block], PutOpts::default());
    }

    /// Delete blocks that have already been unlinked from their parents.
    pub(crate) fn remove_unlinked(&mut self, ids: &[BlockId]) {
        for id in ids {
            if let Some(name) = self.index.get(id).and_then(|b| b.name.clone()) {
                self.names.unregister(&name, id);
            }
            self.selected.remove(id);
            self.collapsed.remove(id);
            if self.active.as_ref().is_some_and(|a| a.id == *id) {
                self.active = None;
            }
        }
        self.index.delete(ids);
    }

    // =========================================================================
    // Raw index access
    // =========================================================================

    /// Upsert blocks as given. Timestamps are taken from the incoming values;
    /// the clock is raised past them so later local edits sort after.
    ///
    /// Fails with `NameTaken`, writing nothing, when a block carries a name
    /// another block keeps.
    pub fn put(&mut self, blocks: impl IntoIterator<Item = Block>, opts: PutOpts) -> Result<()> {
        let blocks: Vec<Block> = blocks.into_iter().collect();
        let changes: Vec<(BlockId, Option<&BlockName>)> =
            blocks.iter().map(|b| (b.id, self.incoming_name(b, opts))).collect();
        self.check_names(&changes)?;
        self.write_blocks(blocks, opts);
        Ok(())
    }

    /// The name `block` will carry once put.
    fn incoming_name<'a>(&'a self, block: &'a Block, opts: PutOpts) -> Option<&'a BlockName> {
        if opts.mode == PutMode::Merge && block.name.is_none() {
            return self.index.get(&block.id).and_then(|b| b.name.as_ref());
        }
        block.name.as_ref()
    }

    /// Check that a batch of name changes leaves every name with one owner.
    ///
    /// `changes` pairs each written id with the name it will carry, `None`
    /// for blocks losing their name or being deleted.
    pub(crate) fn check_names(&self, changes: &[(BlockId, Option<&BlockName>)]) -> Result<()> {
        let next: HashMap<BlockId, Option<&BlockName>> = changes.iter().copied().collect();
        let mut claimed: HashMap<&BlockName, BlockId> = HashMap::new();

        for &(id, name) in changes {
            let Some(name) = name else {
                continue;
            };
            if claimed.insert(name, id).is_some_and(|other| other != id) {
                return Err(StoreError::NameTaken(name.clone()));
            }
            let kept_elsewhere = self
                .names
                .get(name)
                .filter(|owner| *owner != id)
                .is_some_and(|owner| next.get(&owner).is_none_or(|after| *after == Some(name)));
            if kept_elsewhere {
                return Err(StoreError::NameTaken(name.clone()));
            }
        }
        Ok(())
    }

    /// Upsert without name checks. Callers validate the whole batch first.
    pub(crate) fn write_blocks(&mut self, blocks: impl IntoIterator<Item = Block>, opts: PutOpts) {
        for block in blocks {
            self.clock = self.clock.max(block.updated);
            let keeps_name = opts.mode == PutMode::Merge && block.name.is_none();
            if let Some(old_name) = self.index.get(&block.id).and_then(|b| b.name.clone()) {
                if !keeps_name && block.name.as_ref() != Some(&old_name) {
                    self.names.unregister(&old_name, &block.id);
                }
            }
            if let Some(name) = &block.name {
                self.names.register(name.clone(), block.id);
            }
            self.index.put([block], opts);
        }
    }

    /// Remove exactly the given ids (non-cascading, parents untouched).
    pub fn delete<'a>(&mut self, ids: impl IntoIterator<Item = &'a BlockId>) {
        let ids: Vec<BlockId> = ids.into_iter().copied().collect();
        tracing::debug!(count = ids.len(), "delete blocks");
        self.remove_unlinked(&ids);
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Create a root paragraph and make it the document root.
    pub fn create_root(&mut self, content: impl Into<String>) -> BlockId {
        let id = BlockId::new();
        self.insert_new(Block::paragraph(id, None, content));
        self.root = Some(id);
        id
    }

    /// Replace a block's content.
    pub fn set_content(&mut self, id: &BlockId, content: impl Into<String>) -> Result<()> {
        let content = content.into();
        self.modify(id, |block| block.content = content)
    }

    /// Change a block's kind. Named blocks keep their kind.
    pub fn set_kind(&mut self, id: &BlockId, kind: BlockKind) -> Result<()> {
        if self.require(id)?.kind == BlockKind::Named {
            return Ok(());
        }
        self.modify(id, |block| block.kind = kind)
    }

    /// Edit content at a char offset: delete `delete` chars, then insert.
    pub fn edit_text(&mut self, id: &BlockId, pos: usize, insert: &str, delete: usize) -> Result<()> {
        let len = self.require(id)?.content_len();
        if pos > len {
            return Err(StoreError::PositionOutOfBounds { pos, len });
        }
        let end = pos
            .checked_add(delete)
            .filter(|end| *end <= len)
            .ok_or(StoreError::PositionOutOfBounds { pos: pos.saturating_add(delete), len })?;

        self.modify(id, |block| {
            let start = byte_offset(&block.content, pos);
            let end = byte_offset(&block.content, end);
            block.content.replace_range(start..end, insert);
        })
    }

    /// Add a non-structural link from `from` to `to`.
    pub fn add_link(&mut self, from: &BlockId, to: &BlockId) -> Result<()> {
        self.require(to)?;
        if self.require(from)?.links.contains(to) {
            return Ok(());
        }
        self.modify(from, |block| block.links.push(*to))
    }

    // =========================================================================
    // Snapshot / Restore
    // =========================================================================

    /// Snapshot every block: document order first, then unreachable blocks.
    pub fn snapshot(&self) -> StoreSnapshot {
        let ordered = self.document_order();
        let reachable: HashSet<BlockId> = ordered.iter().copied().collect();
        let mut orphans: Vec<&Block> = self.index.iter().filter(|b| !reachable.contains(&b.id)).collect();
        orphans.sort_by_key(|b| b.id);

        let blocks = self
            .lookup(&ordered)
            .into_iter()
            .chain(orphans)
            .cloned()
            .collect();

        StoreSnapshot {
            document_id: self.document_id,
            root: self.root,
            blocks,
        }
    }

    pub fn from_snapshot(snapshot: StoreSnapshot, config: StoreConfig) -> Result<Self> {
        let mut store = Self::with_config(snapshot.document_id, config);
        store.put(snapshot.blocks, PutOpts::default())?;
        store.root = snapshot.root;
        Ok(store)
    }
}

/// Byte offset of the `pos`-th char (or the end of the string).
pub(crate) fn byte_offset(s: &str, pos: usize) -> usize {
    s.char_indices().nth(pos).map(|(i, _)| i).unwrap_or(s.len())
}

/// Serializable snapshot of a whole store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub document_id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<BlockId>,
    pub blocks: Vec<Block>,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

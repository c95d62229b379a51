//! Structural tree operations: create, indent, unindent, merge, delete.
//!
//! Each operation validates everything it needs before its first write, then
//! rewrites the affected blocks through `BlocksStore::modify` so every touched
//! block gets a fresh `updated` stamp.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use outliner_types::{Block, BlockId, BlockName, TreePosition};

use crate::config::AutoUnindentPolicy;
use crate::view::ActiveBlock;
use crate::{BlocksStore, Result, StoreError};

/// Old and new location of a block repositioned by indent/unindent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub id: BlockId,
    pub from: TreePosition,
    pub to: TreePosition,
}

/// A block created by [`BlocksStore::create_new_block`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBlock {
    pub id: BlockId,
    pub parent: BlockId,
    pub position: usize,
}

/// Where a merge would put the merged block's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MergeTarget {
    PreviousSibling,
    Parent,
}

/// How `source` may merge, as reported by [`BlocksStore::can_merge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMerge {
    pub target: BlockId,
    pub source: BlockId,
    pub kind: MergeTarget,
}

impl BlocksStore {
    /// Append a new paragraph as the last child of `parent`.
    pub fn append_block(&mut self, parent: &BlockId, content: impl Into<String>) -> Result<BlockId> {
        self.require(parent)?;
        let id = BlockId::new();
        self.insert_new(Block::paragraph(id, Some(*parent), content));
        self.modify(parent, |p| p.items.push(id))?;
        Ok(id)
    }

    fn sibling_position(&self, id: &BlockId) -> Result<Option<(BlockId, usize)>> {
        let Some(parent_id) = self.require(id)?.parent else {
            return Ok(None);
        };
        let index = self
            .require(&parent_id)?
            .position_of(id)
            .ok_or(StoreError::InconsistentState(*id))?;
        Ok(Some((parent_id, index)))
    }

    /// Make `id` the last child of its previous sibling.
    ///
    /// Returns a move for every block whose position changed: `id` first,
    /// then the later siblings that shifted up in the old parent.
    pub fn indent(&mut self, id: &BlockId) -> Result<Vec<MoveResult>> {
        let (parent_id, index) = self
            .sibling_position(id)?
            .filter(|(_, index)| *index > 0)
            .ok_or(StoreError::NoPreviousSibling(*id))?;
        let new_parent = self.require(&parent_id)?.items[index - 1];
        let new_index = self.require(&new_parent)?.items.len();
        let depth = self.path_to_block(&new_parent).len() + 1;
        if depth + self.subtree_height(id) >= self.config().max_depth {
            return Err(StoreError::MaxDepthExceeded(*id));
        }

        let mut moves = vec![MoveResult {
            id: *id,
            from: TreePosition { parent: Some(parent_id), index },
            to: TreePosition { parent: Some(new_parent), index: new_index },
        }];
        moves.extend(shifted(parent_id, &self.require(&parent_id)?.items[index + 1..], index + 1, false));

        self.modify(&parent_id, |p| {
            p.items.remove(index);
        })?;
        self.modify(&new_parent, |p| p.items.push(*id))?;
        self.modify(id, |b| b.parent = Some(new_parent))?;

        // the new parent has to be open for the moved block to stay visible
        self.collapsed.remove(&new_parent);

        tracing::debug!(?id, ?new_parent, moved = moves.len(), "indent");
        Ok(moves)
    }

    /// Move `id` out of its parent to become the parent's next sibling.
    ///
    /// Returns a move for every block whose position changed: `id` first,
    /// then its later siblings in the old parent, then the blocks after the
    /// insertion point in the grandparent.
    pub fn unindent(&mut self, id: &BlockId) -> Result<Vec<MoveResult>> {
        let (parent_id, index) = self.sibling_position(id)?.ok_or(StoreError::NoParent(*id))?;
        let (grandparent_id, parent_index) = self.sibling_position(&parent_id)?.ok_or(StoreError::NoParent(*id))?;
        let new_index = parent_index + 1;

        let mut moves = vec![MoveResult {
            id: *id,
            from: TreePosition { parent: Some(parent_id), index },
            to: TreePosition { parent: Some(grandparent_id), index: new_index },
        }];
        moves.extend(shifted(parent_id, &self.require(&parent_id)?.items[index + 1..], index + 1, false));
        moves.extend(shifted(
            grandparent_id,
            &self.require(&grandparent_id)?.items[new_index..],
            new_index,
            true,
        ));

        self.modify(&parent_id, |p| {
            p.items.remove(index);
        })?;
        self.modify(&grandparent_id, |g| g.items.insert(new_index, *id))?;
        self.modify(id, |b| b.parent = Some(grandparent_id))?;

        tracing::debug!(?id, ?grandparent_id, moved = moves.len(), "unindent");
        Ok(moves)
    }

    /// Levels below `id` in its own subtree (0 for a leaf).
    fn subtree_height(&self, id: &BlockId) -> usize {
        let mut height = 0;
        let mut stack: Vec<(usize, BlockId)> = self.children(id).iter().map(|c| (1, *c)).collect();
        while let Some((depth, next)) = stack.pop() {
            // cycles are cut off by the depth limit
            if depth > self.config().max_depth {
                break;
            }
            height = height.max(depth);
            stack.extend(self.children(&next).iter().map(|c| (depth + 1, *c)));
        }
        height
    }

    /// Whether `id` should be promoted automatically under the configured
    /// policy. Advisory only.
    pub fn required_auto_unindent(&self, id: &BlockId) -> bool {
        let Some(block) = self.get_block(id) else {
            return false;
        };
        let Some(parent) = block.parent.and_then(|pid| self.get_block(&pid)) else {
            return false;
        };
        if parent.parent.is_none() {
            return false;
        }

        let sole_child = parent.items.as_slice() == [*id];
        match self.config().auto_unindent {
            AutoUnindentPolicy::Never => false,
            AutoUnindentPolicy::SoleChild => sole_child,
            AutoUnindentPolicy::EmptySoleChild => sole_child && block.content.is_empty(),
        }
    }

    /// Report whether and where `id` could merge, without merging.
    pub fn can_merge(&self, id: &BlockId) -> Option<BlockMerge> {
        let block = self.get_block(id)?;
        if !block.kind.is_mergeable() {
            return None;
        }
        let parent_id = block.parent?;
        let parent = self.get_block(&parent_id)?;
        let index = parent.position_of(id)?;

        if index > 0 {
            let prev = parent.items[index - 1];
            return self
                .get_block(&prev)
                .filter(|b| b.kind.is_mergeable())
                .map(|_| BlockMerge { target: prev, source: *id, kind: MergeTarget::PreviousSibling });
        }

        parent
            .kind
            .is_mergeable()
            .then_some(BlockMerge { target: parent_id, source: *id, kind: MergeTarget::Parent })
    }

    /// Fold `source` into `target`: content appended, children adopted,
    /// `source` deleted. The caret lands at the join point.
    pub fn merge_blocks(&mut self, target: &BlockId, source: &BlockId) -> Result<()> {
        let merge = self
            .can_merge(source)
            .filter(|m| m.target == *target)
            .ok_or(StoreError::InvalidMerge { target: *target, block: *source })?;
        let src = self.require(source)?.clone();
        let join_offset = self.require(target)?.content_len();

        match merge.kind {
            MergeTarget::PreviousSibling => {
                if let Some(parent_id) = src.parent {
                    self.modify(&parent_id, |p| p.items.retain(|c| c != source))?;
                }
                self.modify(target, |t| {
                    t.items.extend(src.items.iter().copied());
                    t.content.push_str(&src.content);
                    merge_links(t, &src);
                })?;
            }
            MergeTarget::Parent => {
                self.modify(target, |t| {
                    match t.position_of(source) {
                        Some(index) => {
                            t.items.splice(index..=index, src.items.iter().copied());
                        }
                        None => t.items.extend(src.items.iter().copied()),
                    }
                    t.content.push_str(&src.content);
                    merge_links(t, &src);
                })?;
            }
        }

        for child in &src.items {
            self.modify(child, |c| c.parent = Some(*target))?;
        }
        self.remove_unlinked(&[*source]);
        self.active = Some(ActiveBlock { id: *target, offset: Some(join_offset) });

        tracing::debug!(?target, ?source, kind = %merge.kind, "merged blocks");
        Ok(())
    }

    /// Insert a new block right after `id`, optionally splitting `id`'s
    /// content at char offset `split`.
    ///
    /// The left part stays on `id`, the right part moves to the new block.
    /// On the root (no parent) the new block becomes its first child. Named
    /// blocks never split; their content is their name.
    pub fn create_new_block(&mut self, id: &BlockId, split: Option<usize>) -> Result<CreatedBlock> {
        let block = self.require(id)?;
        let len = block.content_len();
        let kind = block.kind;
        if let Some(pos) = split.filter(|&pos| pos > len) {
            return Err(StoreError::PositionOutOfBounds { pos, len });
        }
        let split = split.filter(|_| kind.is_mergeable());

        let (parent, position) = match self.sibling_position(id)? {
            Some((parent_id, index)) => (parent_id, index + 1),
            None => (*id, 0),
        };

        let right = match split {
            Some(pos) => {
                let content = &self.require(id)?.content;
                content[crate::store::byte_offset(content, pos)..].to_string()
            }
            None => String::new(),
        };

        let new_id = BlockId::new();
        let new_kind = if kind.is_mergeable() { kind } else { Default::default() };
        if let Some(pos) = split {
            self.modify(id, |b| {
                let at = crate::store::byte_offset(&b.content, pos);
                b.content.truncate(at);
            })?;
        }
        self.insert_new(Block::paragraph(new_id, Some(parent), right).with_kind(new_kind));
        self.modify(&parent, |p| p.items.insert(position, new_id))?;
        self.active = Some(ActiveBlock { id: new_id, offset: Some(0) });

        let created = CreatedBlock { id: new_id, parent, position };
        tracing::debug!(?created, split = ?split, "created block");
        Ok(created)
    }

    /// Return the block registered for `name`, creating it if needed.
    ///
    /// A new named block is appended to the root's items (or left as a new
    /// top-level page when there is no root) and linked from `reference`.
    pub fn create_new_named_block(&mut self, name: &str, reference: &BlockId) -> Result<BlockId> {
        if let Some(existing) = self.names().get(name) {
            return Ok(existing);
        }
        self.require(reference)?;

        let id = BlockId::from_name(name);
        if self.contains_block(&id) {
            return Err(StoreError::NameTaken(BlockName::from(name)));
        }

        let parent = self.root().filter(|r| self.contains_block(r));
        self.insert_new(Block::named(name, parent));
        if let Some(root) = parent {
            self.modify(&root, |r| r.items.push(id))?;
        }
        self.add_link(reference, &id)?;

        tracing::debug!(%name, ?id, "created named block");
        Ok(id)
    }

    /// Registered names starting with `prefix`, for link autocomplete.
    pub fn filter_by_name(&self, prefix: &str) -> Vec<BlockName> {
        self.names().filter_by_name(prefix)
    }

    /// Delete `id` and all its descendants, unlinking it from its parent.
    pub fn delete_subtree(&mut self, id: &BlockId) -> Result<Vec<BlockId>> {
        let position = self.sibling_position(id)?;
        let mut ids = vec![*id];
        ids.extend(self.descendants(id));

        if let Some((parent_id, _)) = position {
            self.modify(&parent_id, |p| p.items.retain(|c| c != id))?;
        }
        self.remove_unlinked(&ids);

        tracing::debug!(?id, count = ids.len(), "deleted subtree");
        Ok(ids)
    }
}

/// Moves for `siblings`, which start at index `start` under `parent` and
/// shift one index later when `later` is set, one earlier otherwise.
fn shifted(parent: BlockId, siblings: &[BlockId], start: usize, later: bool) -> Vec<MoveResult> {
    siblings
        .iter()
        .enumerate()
        .map(|(offset, id)| {
            let index = start + offset;
            let to = if later { index + 1 } else { index - 1 };
            MoveResult {
                id: *id,
                from: TreePosition { parent: Some(parent), index },
                to: TreePosition { parent: Some(parent), index: to },
            }
        })
        .collect()
}

fn merge_links(target: &mut Block, source: &Block) {
    for link in &source.links {
        if !target.links.contains(link) && *link != target.id {
            target.links.push(*link);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreConfig;
    use crate::test_support::{sample_tree, scenario_a};
    use outliner_types::{BlockKind, DocumentId};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indent_then_unindent_scenario() {
        let (mut store, [a, b, c]) = scenario_a();

        let moved = store.indent(&c).unwrap();
        assert_eq!(store.children(&b), &[c]);
        assert_eq!(store.children(&a), &[b]);
        assert_eq!(store.parent_of(&c), Some(b));
        assert_eq!(
            moved,
            vec![MoveResult {
                id: c,
                from: TreePosition { parent: Some(a), index: 1 },
                to: TreePosition { parent: Some(b), index: 0 },
            }]
        );

        let back = store.unindent(&c).unwrap();
        assert_eq!(store.children(&a), &[b, c]);
        assert!(store.children(&b).is_empty());
        assert_eq!(store.parent_of(&c), Some(a));
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].to, moved[0].from);
    }

    #[test]
    fn test_indent_appends_after_existing_children() {
        let (mut store, t) = sample_tree();
        let moved = store.indent(&t.b).unwrap();
        assert_eq!(store.children(&t.a), &[t.a1, t.a2, t.b]);
        assert_eq!(moved[0].to.index, 2);
        assert_eq!(store.children(&t.root), &[t.a, t.c]);
    }

    #[test]
    fn test_indent_reports_shifted_siblings() {
        let (mut store, t) = sample_tree();
        let moved = store.indent(&t.b).unwrap();
        assert_eq!(moved.len(), 2);
        assert_eq!(
            moved[1],
            MoveResult {
                id: t.c,
                from: TreePosition { parent: Some(t.root), index: 2 },
                to: TreePosition { parent: Some(t.root), index: 1 },
            }
        );
    }

    #[test]
    fn test_indent_first_child_fails() {
        let (mut store, t) = sample_tree();
        let clock = store.clock();
        assert_eq!(store.indent(&t.a), Err(StoreError::NoPreviousSibling(t.a)));
        assert_eq!(store.indent(&t.root), Err(StoreError::NoPreviousSibling(t.root)));
        assert_eq!(store.clock(), clock);
    }

    #[test]
    fn test_indent_respects_max_depth() {
        let config = StoreConfig { max_depth: 3, ..Default::default() };
        let mut store = BlocksStore::with_config(DocumentId::new(), config);
        let root = store.create_root("root");
        let a = store.append_block(&root, "a").unwrap();
        let b = store.append_block(&root, "b").unwrap();
        let c = store.append_block(&root, "c").unwrap();

        store.indent(&b).unwrap();
        store.indent(&c).unwrap();
        assert_eq!(store.children(&a), &[b, c]);
        assert_eq!(store.indent(&c), Err(StoreError::MaxDepthExceeded(c)));
        assert_eq!(store.path_to_block(&c).len(), 2);
    }

    #[test]
    fn test_indent_counts_subtree_depth() {
        let config = StoreConfig { max_depth: 3, ..Default::default() };
        let mut store = BlocksStore::with_config(DocumentId::new(), config);
        let root = store.create_root("root");
        let a = store.append_block(&root, "a").unwrap();
        let b = store.append_block(&root, "b").unwrap();
        let b1 = store.append_block(&b, "b1").unwrap();
        let clock = store.clock();

        // b itself would fit, its child would not
        assert_eq!(store.indent(&b), Err(StoreError::MaxDepthExceeded(b)));
        assert_eq!(store.clock(), clock);
        assert_eq!(store.children(&root), &[a, b]);

        store.delete_subtree(&b1).unwrap();
        store.indent(&b).unwrap();
        assert_eq!(store.children(&a), &[b]);
    }

    #[test]
    fn test_unindent_child_of_root_fails() {
        let (mut store, t) = sample_tree();
        assert_eq!(store.unindent(&t.b), Err(StoreError::NoParent(t.b)));
        assert_eq!(store.unindent(&t.root), Err(StoreError::NoParent(t.root)));
    }

    #[test]
    fn test_unindent_middle_child() {
        let (mut store, t) = sample_tree();
        let moved = store.unindent(&t.a1).unwrap();
        assert_eq!(store.children(&t.root), &[t.a, t.a1, t.b, t.c]);
        assert_eq!(store.children(&t.a), &[t.a2]);

        let ids: Vec<BlockId> = moved.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![t.a1, t.a2, t.b, t.c]);
        assert_eq!(moved[1].to, TreePosition { parent: Some(t.a), index: 0 });
        assert_eq!(moved[3].to, TreePosition { parent: Some(t.root), index: 3 });
    }

    #[test]
    fn test_indent_expands_new_parent() {
        let (mut store, t) = sample_tree();
        store.collapse(&t.a);
        store.indent(&t.b).unwrap();
        assert!(store.is_expanded(&t.a));
    }

    #[test]
    fn test_indent_bumps_every_touched_block() {
        let (mut store, t) = sample_tree();
        let before: Vec<u64> = [t.root, t.a, t.b].iter().map(|id| store.get_block(id).unwrap().updated).collect();
        store.indent(&t.b).unwrap();
        for (id, old) in [t.root, t.a, t.b].iter().zip(before) {
            assert!(store.get_block(id).unwrap().updated > old);
        }
    }

    #[test]
    fn test_required_auto_unindent() {
        let (mut store, t) = sample_tree();
        let only = store.append_block(&t.b, "").unwrap();
        assert!(store.required_auto_unindent(&only));

        store.set_content(&only, "text").unwrap();
        assert!(!store.required_auto_unindent(&only));

        // not a sole child
        assert!(!store.required_auto_unindent(&t.a1));
        // children of the root have nowhere to go
        assert!(!store.required_auto_unindent(&t.c));
    }

    #[test]
    fn test_required_auto_unindent_policies() {
        let config = StoreConfig { auto_unindent: AutoUnindentPolicy::SoleChild, ..Default::default() };
        let mut store = BlocksStore::with_config(DocumentId::new(), config);
        let root = store.create_root("root");
        let parent = store.append_block(&root, "parent").unwrap();
        let only = store.append_block(&parent, "text").unwrap();
        assert!(store.required_auto_unindent(&only));

        let config = StoreConfig { auto_unindent: AutoUnindentPolicy::Never, ..Default::default() };
        let mut store = BlocksStore::with_config(DocumentId::new(), config);
        let root = store.create_root("root");
        let parent = store.append_block(&root, "parent").unwrap();
        let only = store.append_block(&parent, "").unwrap();
        assert!(!store.required_auto_unindent(&only));
    }

    #[test]
    fn test_can_merge_into_previous_sibling() {
        let (store, t) = sample_tree();
        assert_eq!(
            store.can_merge(&t.b),
            Some(BlockMerge { target: t.a, source: t.b, kind: MergeTarget::PreviousSibling })
        );
    }

    #[test]
    fn test_can_merge_first_child_into_parent() {
        let (store, t) = sample_tree();
        assert_eq!(
            store.can_merge(&t.a1),
            Some(BlockMerge { target: t.a, source: t.a1, kind: MergeTarget::Parent })
        );
        assert_eq!(store.can_merge(&t.root), None);
    }

    #[test]
    fn test_can_merge_refuses_named() {
        let (mut store, t) = sample_tree();
        let named = store.create_new_named_block("Rust", &t.a).unwrap();
        // named block as source
        assert_eq!(store.can_merge(&named), None);

        // named block as previous sibling target
        let after = store.append_block(&t.root, "after").unwrap();
        assert_eq!(store.children(&t.root).last(), Some(&after));
        assert_eq!(store.can_merge(&after), None);
    }

    #[test]
    fn test_merge_into_previous_sibling() {
        let (mut store, t) = sample_tree();
        let b1 = store.append_block(&t.b, "b1").unwrap();

        store.merge_blocks(&t.a, &t.b).unwrap();

        let a = store.get_block(&t.a).unwrap();
        assert_eq!(a.content, "ab");
        assert_eq!(a.items, vec![t.a1, t.a2, b1]);
        assert_eq!(store.parent_of(&b1), Some(t.a));
        assert!(!store.contains_block(&t.b));
        assert_eq!(store.children(&t.root), &[t.a, t.c]);
        assert_eq!(store.lookup_reverse(&b1), vec![t.a]);
        assert_eq!(store.active().map(|a| a.offset), Some(Some(1)));
    }

    #[test]
    fn test_merge_into_parent_keeps_child_order() {
        let (mut store, t) = sample_tree();
        let x = store.append_block(&t.a1, "x").unwrap();

        store.merge_blocks(&t.a, &t.a1).unwrap();

        let a = store.get_block(&t.a).unwrap();
        assert_eq!(a.content, "aa1");
        assert_eq!(a.items, vec![x, t.a2]);
        assert_eq!(store.parent_of(&x), Some(t.a));
    }

    #[test]
    fn test_merge_invalid() {
        let (mut store, t) = sample_tree();
        assert_eq!(
            store.merge_blocks(&t.c, &t.a),
            Err(StoreError::InvalidMerge { target: t.c, block: t.a })
        );
        // wrong target for an otherwise mergeable block
        assert_eq!(
            store.merge_blocks(&t.root, &t.b),
            Err(StoreError::InvalidMerge { target: t.root, block: t.b })
        );
        assert!(store.contains_block(&t.b));
    }

    #[test]
    fn test_create_new_block_after() {
        let (mut store, t) = sample_tree();
        let created = store.create_new_block(&t.a, None).unwrap();

        assert_eq!(created.parent, t.root);
        assert_eq!(created.position, 1);
        assert_eq!(store.children(&t.root), &[t.a, created.id, t.b, t.c]);
        assert_eq!(store.get_block(&created.id).unwrap().content, "");
        assert_eq!(store.active().map(|a| a.id), Some(created.id));
    }

    #[test]
    fn test_create_new_block_with_split() {
        let (mut store, t) = sample_tree();
        store.set_content(&t.b, "hello world").unwrap();

        let created = store.create_new_block(&t.b, Some(5)).unwrap();

        assert_eq!(store.get_block(&t.b).unwrap().content, "hello");
        assert_eq!(store.get_block(&created.id).unwrap().content, " world");
        assert_eq!(store.children(&t.root), &[t.a, t.b, created.id, t.c]);
    }

    #[test]
    fn test_create_new_block_split_out_of_bounds() {
        let (mut store, t) = sample_tree();
        let count = store.block_count();
        assert_eq!(
            store.create_new_block(&t.b, Some(10)),
            Err(StoreError::PositionOutOfBounds { pos: 10, len: 1 })
        );
        assert_eq!(store.block_count(), count);
    }

    #[test]
    fn test_create_new_block_keeps_list_kind() {
        let (mut store, t) = sample_tree();
        store.set_kind(&t.c, BlockKind::ListItem).unwrap();
        let created = store.create_new_block(&t.c, None).unwrap();
        assert_eq!(store.get_block(&created.id).unwrap().kind, BlockKind::ListItem);
    }

    #[test]
    fn test_create_new_block_on_root_inserts_first_child() {
        let (mut store, t) = sample_tree();
        let created = store.create_new_block(&t.root, None).unwrap();
        assert_eq!(created.parent, t.root);
        assert_eq!(created.position, 0);
        assert_eq!(store.children(&t.root)[0], created.id);
    }

    #[test]
    fn test_create_new_named_block_is_idempotent() {
        let (mut store, t) = sample_tree();
        let first = store.create_new_named_block("Rust", &t.a).unwrap();
        let count = store.block_count();
        let second = store.create_new_named_block("Rust", &t.b).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.block_count(), count);
        assert_eq!(store.get_block(&first).unwrap().parent, Some(t.root));
        let mut referrers = vec![t.root, t.a];
        referrers.sort();
        assert_eq!(store.lookup_reverse(&first), referrers);
        assert!(store.get_block(&t.a).unwrap().links.contains(&first));
    }

    #[test]
    fn test_create_new_named_block_missing_reference() {
        let (mut store, _) = sample_tree();
        let ghost = BlockId::new();
        assert_eq!(store.create_new_named_block("Rust", &ghost), Err(StoreError::BlockNotFound(ghost)));
        assert!(store.filter_by_name("").is_empty());
    }

    #[test]
    fn test_filter_by_name() {
        let (mut store, t) = sample_tree();
        for name in ["Rust", "Ruby", "Python"] {
            store.create_new_named_block(name, &t.a).unwrap();
        }
        let names: Vec<String> = store.filter_by_name("ru").iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["Ruby", "Rust"]);
        assert_eq!(store.named_nodes(), vec!["Python", "Ruby", "Rust"]);
    }

    #[test]
    fn test_delete_subtree() {
        let (mut store, t) = sample_tree();
        let removed = store.delete_subtree(&t.a).unwrap();

        assert_eq!(removed, vec![t.a, t.a1, t.a2]);
        assert_eq!(store.children(&t.root), &[t.b, t.c]);
        assert_eq!(store.block_count(), 3);
        assert!(store.lookup_reverse(&t.a1).is_empty());
    }
}

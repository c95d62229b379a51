//! Presentational view state: expansion, selection, active block, caret
//! navigation.
//!
//! None of this lives on [`Block`](outliner_types::Block) and none of it is
//! captured by undo.

use serde::{Deserialize, Serialize};

use outliner_types::BlockId;

use crate::{BlocksStore, Result, StoreError};

/// The block holding focus, with an optional caret offset in chars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBlock {
    pub id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// A caret: block id plus char offset into its content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaretPosition {
    pub id: BlockId,
    pub offset: usize,
}

impl CaretPosition {
    pub fn new(id: BlockId, offset: usize) -> Self {
        Self { id, offset }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavOpts {
    /// Extend the selection instead of replacing it.
    pub shift: bool,
    /// Wrap at document start/end. `None` uses `StoreConfig::nav_wrap`.
    pub wrap: Option<bool>,
}

impl NavOpts {
    pub fn shift() -> Self {
        Self { shift: true, wrap: None }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Prev,
    Next,
}

impl BlocksStore {
    // =========================================================================
    // Expansion
    // =========================================================================

    /// Blocks are expanded unless explicitly collapsed.
    pub fn is_expanded(&self, id: &BlockId) -> bool {
        !self.collapsed.contains(id)
    }

    pub fn expand(&mut self, id: &BlockId) {
        self.collapsed.remove(id);
    }

    pub fn collapse(&mut self, id: &BlockId) {
        self.collapsed.insert(*id);
    }

    /// Flip expansion. Returns the new state.
    pub fn toggle_expand(&mut self, id: &BlockId) -> bool {
        if self.collapsed.remove(id) {
            true
        } else {
            self.collapsed.insert(*id);
            false
        }
    }

    /// Pre-order over blocks a reader can see: collapsed subtrees are skipped,
    /// the root always shows its children.
    pub fn visible_order(&self) -> Vec<BlockId> {
        let root = self.root();
        self.preorder(|id| Some(*id) == root || self.is_expanded(id))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn is_selected(&self, id: &BlockId) -> bool {
        self.selected.contains(id)
    }

    pub fn has_selected(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Selected ids in document order.
    pub fn selected_ids(&self) -> Vec<BlockId> {
        self.document_order()
            .into_iter()
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    /// Select every block between `from` and `to` inclusive, in document
    /// order, replacing the current selection.
    pub fn set_selection_range(&mut self, from: &BlockId, to: &BlockId) -> Result<()> {
        let order = self.document_order();
        let find = |id: &BlockId| order.iter().position(|o| o == id).ok_or(StoreError::BlockNotFound(*id));
        let (start, end) = (find(from)?, find(to)?);
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        self.selected.clear();
        self.selected.extend(order[start..=end].iter().copied());
        Ok(())
    }

    pub fn clear_selected(&mut self, reason: &str) {
        if !self.selected.is_empty() {
            tracing::debug!(reason, count = self.selected.len(), "clearing selection");
        }
        self.selected.clear();
    }

    // =========================================================================
    // Active block
    // =========================================================================

    pub fn active(&self) -> Option<ActiveBlock> {
        self.active
    }

    pub fn set_active(&mut self, id: Option<BlockId>) {
        self.active = id.map(|id| ActiveBlock { id, offset: None });
    }

    /// Focus `id` with the caret at char offset `offset`.
    pub fn set_active_with_position(&mut self, id: &BlockId, offset: usize) -> Result<()> {
        let len = self.require(id)?.content_len();
        if offset > len {
            return Err(StoreError::PositionOutOfBounds { pos: offset, len });
        }
        self.active = Some(ActiveBlock { id: *id, offset: Some(offset) });
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move to the end of the previous visible block.
    pub fn nav_prev(&mut self, pos: CaretPosition, opts: NavOpts) -> Option<CaretPosition> {
        self.nav(pos, opts, Direction::Prev)
    }

    /// Move to the start of the next visible block.
    pub fn nav_next(&mut self, pos: CaretPosition, opts: NavOpts) -> Option<CaretPosition> {
        self.nav(pos, opts, Direction::Next)
    }

    fn nav(&mut self, pos: CaretPosition, opts: NavOpts, direction: Direction) -> Option<CaretPosition> {
        let order = self.visible_order();
        let index = order.iter().position(|id| *id == pos.id)?;
        let wrap = opts.wrap.unwrap_or(self.config().nav_wrap);

        let target = match direction {
            Direction::Prev if index > 0 => order[index - 1],
            Direction::Prev if wrap => *order.last()?,
            Direction::Next if index + 1 < order.len() => order[index + 1],
            Direction::Next if wrap => *order.first()?,
            _ => return None,
        };
        if target == pos.id {
            return None;
        }

        let offset = match direction {
            Direction::Prev => self.get_block(&target)?.content_len(),
            Direction::Next => 0,
        };

        if opts.shift {
            self.selected.insert(pos.id);
            self.selected.insert(target);
        } else {
            self.clear_selected("navigation");
        }
        self.active = Some(ActiveBlock { id: target, offset: Some(offset) });

        Some(CaretPosition::new(target, offset))
    }
}

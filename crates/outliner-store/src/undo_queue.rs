//! Caller-owned undo/redo stacks over [`BlockMutation`] lists.
//!
//! ```text
//! UndoQueue                         BlocksStore
//! ┌──────────────┐  execute(ids)   ┌───────────────────────┐
//! │ undo_stack   │────────────────►│ prepare_undo(ids)     │
//! │ redo_stack   │                 │ op(store)             │
//! │              │◄────────────────│ capture_undo()        │
//! │ undo()       │  apply + invert │ apply_undo_mutations()│
//! │ redo()       │────────────────►│                       │
//! └──────────────┘                 └───────────────────────┘
//! ```
//!
//! Undoing an entry applies its mutations and captures the inverse (over the
//! same ids, unexpanded) onto the redo stack, and the reverse for redo.

use std::collections::VecDeque;

use tracing::trace;

use outliner_types::BlockId;

use crate::config::StoreConfig;
use crate::undo::{BlockMutation, UndoCaptureOpts};
use crate::{BlocksStore, Result};

#[derive(Debug, Clone)]
pub struct UndoQueue {
    undo_stack: VecDeque<Vec<BlockMutation>>,
    redo_stack: Vec<Vec<BlockMutation>>,
    limit: usize,
}

impl Default for UndoQueue {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

impl UndoQueue {
    /// A queue keeping at most `limit` undo entries (oldest dropped first).
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.undo_limit)
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Run `op` inside a prepare/capture over `ids` and record the result.
    ///
    /// `ids` must cover every block `op` touches once expanded. For the tree
    /// operations the operated block alone is enough. Nothing is recorded
    /// when `op` fails or changes nothing in the working set.
    pub fn execute<R>(
        &mut self,
        store: &mut BlocksStore,
        ids: &[BlockId],
        op: impl FnOnce(&mut BlocksStore) -> Result<R>,
    ) -> Result<R> {
        let mut capture = store.prepare_undo(ids, UndoCaptureOpts::default());
        let out = op(store)?;
        let mutations = store.capture_undo(&mut capture)?;
        self.push(mutations);
        Ok(out)
    }

    /// Record an externally captured mutation list. Clears redo.
    pub fn push(&mut self, mutations: Vec<BlockMutation>) {
        if mutations.is_empty() {
            return;
        }
        trace!(mutations = mutations.len(), undo_stack = self.undo_stack.len() + 1, "undo entry pushed");
        self.push_undo(mutations);
        if !self.redo_stack.is_empty() {
            trace!(cleared = self.redo_stack.len(), "redo stack cleared");
        }
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, mutations: Vec<BlockMutation>) {
        self.undo_stack.push_back(mutations);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Undo the most recent entry. `Ok(false)` when there is nothing to undo.
    ///
    /// On error the entry stays on the undo stack.
    pub fn undo(&mut self, store: &mut BlocksStore) -> Result<bool> {
        let Some(mutations) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        match invert(store, &mutations) {
            Ok(inverse) => {
                trace!(mutations = mutations.len(), redo_stack = self.redo_stack.len() + 1, "undo applied");
                self.redo_stack.push(inverse);
                Ok(true)
            }
            Err(err) => {
                self.undo_stack.push_back(mutations);
                Err(err)
            }
        }
    }

    /// Redo the most recently undone entry. `Ok(false)` when there is nothing
    /// to redo.
    pub fn redo(&mut self, store: &mut BlocksStore) -> Result<bool> {
        let Some(mutations) = self.redo_stack.pop() else {
            return Ok(false);
        };
        match invert(store, &mutations) {
            Ok(inverse) => {
                trace!(mutations = mutations.len(), undo_stack = self.undo_stack.len() + 1, "redo applied");
                self.push_undo(inverse);
                Ok(true)
            }
            Err(err) => {
                self.redo_stack.push(mutations);
                Err(err)
            }
        }
    }
}

/// Apply `mutations` and capture what it takes to reverse them.
fn invert(store: &mut BlocksStore, mutations: &[BlockMutation]) -> Result<Vec<BlockMutation>> {
    let ids: Vec<BlockId> = mutations.iter().map(BlockMutation::id).collect();
    let mut capture = store.prepare_undo(&ids, UndoCaptureOpts::no_expand());
    store.apply_undo_mutations(mutations)?;
    store.capture_undo(&mut capture)
}

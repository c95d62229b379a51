//! Undo capture: snapshot a working set before a mutation, diff it after,
//! and replay the diff to reverse the mutation.
//!
//! ```text
//! let mut capture = store.create_undo_capture(&[id], UndoCaptureOpts::default());
//! capture.prepare(&store);
//! store.indent(&id)?;
//! let mutations = capture.capture(&store)?;
//! // later
//! store.apply_undo_mutations(&mutations)?;
//! ```
//!
//! Whether a block changed is decided by its `updated` stamp alone, so every
//! content-mutating operation must bump it.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use outliner_types::{Block, BlockId};

use crate::index::PutOpts;
use crate::working_set::WorkingSet;
use crate::{BlocksStore, Result, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MutationKind {
    Updated,
    Added,
    Removed,
}

/// One reversible change to a single block.
///
/// `Updated` and `Removed` carry the value from before the mutation (what
/// must be restored). `Added` carries the value the mutation created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "block", rename_all = "snake_case")]
pub enum BlockMutation {
    Updated(Block),
    Added(Block),
    Removed(Block),
}

impl BlockMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Updated(_) => MutationKind::Updated,
            Self::Added(_) => MutationKind::Added,
            Self::Removed(_) => MutationKind::Removed,
        }
    }

    pub fn block(&self) -> &Block {
        match self {
            Self::Updated(b) | Self::Added(b) | Self::Removed(b) => b,
        }
    }

    pub fn id(&self) -> BlockId {
        self.block().id
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UndoCaptureOpts {
    /// Use the given ids verbatim instead of expanding them.
    pub no_expand: bool,
}

impl UndoCaptureOpts {
    pub fn no_expand() -> Self {
        Self { no_expand: true }
    }
}

#[derive(Debug, Clone)]
enum CaptureState {
    Idle,
    Prepared { before: Vec<Block>, clock: u64 },
    Captured,
}

/// A single prepare/capture cycle over a fixed working set.
#[derive(Debug, Clone)]
pub struct UndoCapture {
    working_set: WorkingSet,
    state: CaptureState,
}

impl UndoCapture {
    pub fn new(store: &BlocksStore, ids: &[BlockId], opts: UndoCaptureOpts) -> Self {
        let working_set = if opts.no_expand {
            WorkingSet::verbatim(ids)
        } else {
            store.expand_to_parent_and_children(ids)
        };
        Self { working_set, state: CaptureState::Idle }
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self.state, CaptureState::Prepared { .. })
    }

    /// Snapshot every working-set block currently in the store.
    pub fn prepare(&mut self, store: &BlocksStore) {
        if !matches!(self.state, CaptureState::Idle) {
            tracing::warn!(size = self.working_set.len(), "undo capture prepared twice, re-snapshotting");
        }
        let before = store.lookup(self.working_set.ids()).into_iter().cloned().collect();
        self.state = CaptureState::Prepared { before, clock: store.clock() };
    }

    /// Diff the working set against the prepared snapshot.
    ///
    /// Every block created since `prepare` is included, so it shows up as
    /// `Added` even when nothing in the working set lists it as a child.
    pub fn capture(&mut self, store: &BlocksStore) -> Result<Vec<BlockMutation>> {
        let (before, clock) = match std::mem::replace(&mut self.state, CaptureState::Captured) {
            CaptureState::Prepared { before, clock } => (before, clock),
            other => {
                self.state = other;
                return Err(StoreError::NotPrepared);
            }
        };

        let after_ids = self.after_ids(store, clock);
        let after: Vec<Block> = store.lookup(&after_ids).into_iter().cloned().collect();
        let mutations = compute_undo_mutations(&before, &after);

        tracing::debug!(
            before = before.len(),
            after = after.len(),
            mutations = mutations.len(),
            "captured undo mutations"
        );
        Ok(mutations)
    }

    fn after_ids(&self, store: &BlocksStore, prepared_at: u64) -> IndexSet<BlockId> {
        let mut created: Vec<&Block> = store.index().iter().filter(|b| b.created > prepared_at).collect();
        created.sort_by_key(|b| (b.created, b.id));

        let mut ids: IndexSet<BlockId> = self.working_set.ids().copied().collect();
        ids.extend(created.into_iter().map(|b| b.id));
        ids
    }
}

/// `updated ++ added ++ removed`, each in input order.
pub fn compute_undo_mutations(before: &[Block], after: &[Block]) -> Vec<BlockMutation> {
    let before_index: HashMap<BlockId, &Block> = before.iter().map(|b| (b.id, b)).collect();
    let after_index: HashMap<BlockId, &Block> = after.iter().map(|b| (b.id, b)).collect();

    let updated = before.iter().filter(|b| {
        after_index
            .get(&b.id)
            .is_some_and(|a| a.updated != b.updated)
    });
    let added = after.iter().filter(|a| !before_index.contains_key(&a.id));
    let removed = before.iter().filter(|b| !after_index.contains_key(&b.id));

    updated
        .cloned()
        .map(BlockMutation::Updated)
        .chain(added.cloned().map(BlockMutation::Added))
        .chain(removed.cloned().map(BlockMutation::Removed))
        .collect()
}

/// Which parts of a block an `Updated` record touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MutationType {
    Items,
    Content,
    ItemsAndContent,
}

/// Classify a change by deep comparison of items and content.
///
/// A change to neither counts as `Content`.
pub fn compute_mutation_type(before: &Block, after: &Block) -> MutationType {
    let items = before.items != after.items;
    let content = before.content != after.content;
    match (items, content) {
        (true, true) => MutationType::ItemsAndContent,
        (true, false) => MutationType::Items,
        _ => MutationType::Content,
    }
}

impl BlocksStore {
    /// An unprepared capture over `ids` (expanded unless `opts.no_expand`).
    pub fn create_undo_capture(&self, ids: &[BlockId], opts: UndoCaptureOpts) -> UndoCapture {
        UndoCapture::new(self, ids, opts)
    }

    /// A capture that has already snapshotted the current state.
    pub fn prepare_undo(&self, ids: &[BlockId], opts: UndoCaptureOpts) -> UndoCapture {
        let mut capture = UndoCapture::new(self, ids, opts);
        capture.prepare(self);
        capture
    }

    pub fn capture_undo(&self, capture: &mut UndoCapture) -> Result<Vec<BlockMutation>> {
        capture.capture(self)
    }

    /// Replay captured mutations in order.
    ///
    /// Every record is checked against the current store before anything is
    /// written: `Updated` and `Added` blocks must be live, `Removed` blocks
    /// must not be, and no restored name may be kept by a block outside the
    /// batch. A failure means the store diverged from the captured state and
    /// should be reloaded.
    pub fn apply_undo_mutations(&mut self, mutations: &[BlockMutation]) -> Result<()> {
        let mut seen = HashSet::new();
        for mutation in mutations {
            let id = mutation.id();
            if !seen.insert(id) {
                return Err(StoreError::InconsistentState(id));
            }
            match mutation {
                BlockMutation::Updated(_) | BlockMutation::Added(_) if !self.contains_block(&id) => {
                    return Err(StoreError::InconsistentState(id));
                }
                BlockMutation::Removed(_) if self.contains_block(&id) => {
                    return Err(StoreError::BlockAlreadyExists(id));
                }
                _ => {}
            }
        }
        let names: Vec<_> = mutations
            .iter()
            .map(|m| match m {
                BlockMutation::Updated(b) | BlockMutation::Removed(b) => (b.id, b.name.as_ref()),
                BlockMutation::Added(b) => (b.id, None),
            })
            .collect();
        self.check_names(&names)?;

        for mutation in mutations {
            match mutation {
                BlockMutation::Updated(block) | BlockMutation::Removed(block) => {
                    self.write_blocks([block.clone()], PutOpts::default());
                }
                BlockMutation::Added(block) => self.delete([&block.id]),
            }
        }

        tracing::debug!(count = mutations.len(), "applied undo mutations");
        Ok(())
    }
}

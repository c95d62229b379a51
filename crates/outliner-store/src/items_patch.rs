//! Anchor-based diffs over child id lists.
//!
//! Insertions are anchored on a sibling id rather than a numeric index, so a
//! patch computed against one version of a list still lands sensibly on a
//! list that another writer has since changed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use outliner_types::BlockId;

use crate::{BlocksStore, Result, StoreError};

/// Which side of its anchor an inserted id goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PatchPosition {
    Before,
    After,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemsPatch {
    Remove {
        id: BlockId,
    },
    Insert {
        #[serde(rename = "ref")]
        reference: BlockId,
        id: BlockId,
        pos: PatchPosition,
    },
    Unshift {
        id: BlockId,
    },
}

impl ItemsPatch {
    pub fn id(&self) -> BlockId {
        match self {
            Self::Remove { id } | Self::Insert { id, .. } | Self::Unshift { id } => *id,
        }
    }
}

/// Ids of `a` not in `b`, in `a`'s order.
fn difference(a: &[BlockId], b: &[BlockId]) -> Vec<BlockId> {
    let b: HashSet<&BlockId> = b.iter().collect();
    let mut seen = HashSet::new();
    a.iter().filter(|id| !b.contains(id) && seen.insert(**id)).copied().collect()
}

/// Diff two child lists of the same parent: removals first, then one
/// anchored insertion per added id in `after` order.
pub fn compute_items_patch(before: &[BlockId], after: &[BlockId]) -> Result<Vec<ItemsPatch>> {
    let removed = difference(before, after);
    let added = difference(after, before);

    let mut patch: Vec<ItemsPatch> = removed.into_iter().map(|id| ItemsPatch::Remove { id }).collect();

    for id in added {
        if after.len() == 1 {
            patch.push(ItemsPatch::Unshift { id });
            continue;
        }
        let index = after.iter().position(|a| *a == id).ok_or(StoreError::InvalidPatch(id))?;
        let insert = if index > 0 {
            ItemsPatch::Insert { reference: after[index - 1], id, pos: PatchPosition::After }
        } else if let Some(next) = after.get(index + 1) {
            ItemsPatch::Insert { reference: *next, id, pos: PatchPosition::Before }
        } else {
            return Err(StoreError::InvalidPatch(id));
        };
        patch.push(insert);
    }

    Ok(patch)
}

/// Apply a patch to a live child list.
///
/// Inserts whose anchor is gone fall back to the end (`After`) or the front
/// (`Before`). Ids already present are never duplicated.
pub fn apply_items_patch(items: &mut Vec<BlockId>, patch: &[ItemsPatch]) {
    for op in patch {
        match op {
            ItemsPatch::Remove { id } => items.retain(|i| i != id),
            ItemsPatch::Unshift { id } => {
                if !items.contains(id) {
                    items.insert(0, *id);
                }
            }
            ItemsPatch::Insert { reference, id, pos } => {
                if items.contains(id) {
                    continue;
                }
                let anchor = items.iter().position(|i| i == reference);
                let at = match (anchor, pos) {
                    (Some(i), PatchPosition::After) => i + 1,
                    (Some(i), PatchPosition::Before) => i,
                    (None, PatchPosition::After) => items.len(),
                    (None, PatchPosition::Before) => 0,
                };
                items.insert(at, *id);
            }
        }
    }
}

impl BlocksStore {
    /// Replay the change `before → after` onto `id`'s current items.
    ///
    /// Only the child list is touched; callers moving blocks between parents
    /// are responsible for their `parent` fields.
    pub fn reconcile_items(&mut self, id: &BlockId, before: &[BlockId], after: &[BlockId]) -> Result<Vec<ItemsPatch>> {
        self.require(id)?;
        let patch = compute_items_patch(before, after)?;
        if patch.is_empty() {
            return Ok(patch);
        }
        self.modify(id, |block| apply_items_patch(&mut block.items, &patch))?;
        tracing::debug!(?id, ops = patch.len(), "reconciled items");
        Ok(patch)
    }
}

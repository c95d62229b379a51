//! In-memory outline tree store.
//!
//! A document is an arena of [`Block`]s addressed by [`BlockId`]. Parent and
//! child relations are id references (`parent`, `items`), never pointers, so
//! every block is a plain value that can be snapshotted for undo or handed to
//! a host for persistence.
//!
//! # Components
//!
//! - [`BlocksIndex`]: id → block table. Owns the [`ReverseIndex`] and updates
//!   it in the same call as every `put`/`delete`.
//! - [`BlocksStore`]: the per-document context. Tree mutations (indent,
//!   unindent, merge, split, named blocks), view state, navigation.
//! - [`UndoCapture`]: prepare/capture over a [`WorkingSet`], producing
//!   [`BlockMutation`] lists that [`BlocksStore::apply_undo_mutations`]
//!   replays to reverse a change.
//! - [`compute_items_patch`]: anchor-based child list diffs for reconciling
//!   against concurrently edited lists.
//! - [`UndoQueue`]: caller-owned undo/redo stacks.
//!
//! # Concurrency
//!
//! Everything is synchronous and single-writer. A host sharing a store across
//! threads holds an exclusive lock for a whole prepare → mutate → capture
//! sequence.

mod config;
mod error;
mod index;
mod items_patch;
mod names;
mod reverse;
mod store;
mod tree;
mod undo;
mod undo_queue;
mod view;
mod working_set;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{AutoUnindentPolicy, StoreConfig};
pub use error::{ConfigError, StoreError};
pub use index::{BlocksIndex, PutMode, PutOpts};
pub use items_patch::{ItemsPatch, PatchPosition, apply_items_patch, compute_items_patch};
pub use names::NameRegistry;
pub use reverse::ReverseIndex;
pub use store::{BlocksStore, StoreSnapshot};
pub use tree::{BlockMerge, CreatedBlock, MergeTarget, MoveResult};
pub use undo::{
    BlockMutation, MutationKind, MutationType, UndoCapture, UndoCaptureOpts, compute_mutation_type,
    compute_undo_mutations,
};
pub use undo_queue::UndoQueue;
pub use view::{ActiveBlock, CaretPosition, NavOpts};
pub use working_set::WorkingSet;

pub use outliner_types::{Block, BlockId, BlockKind, BlockName, DocumentId, TreePosition};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

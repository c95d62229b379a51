//! Error types for store operations.
//!
//! Every variant is a precondition or invariant violation. Operations check
//! their preconditions before the first write, so an `Err` never leaves a
//! half-applied mutation behind.

use thiserror::Error;

use outliner_types::{BlockId, BlockName};

/// Errors that can occur during store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `capture()` invoked without a prior `prepare()`.
    #[error("undo capture is not prepared")]
    NotPrepared,

    /// Block not found in the index.
    #[error("block not found: {0:?}")]
    BlockNotFound(BlockId),

    /// Undo reinsertion collides with a live block.
    #[error("block already exists: {0:?}")]
    BlockAlreadyExists(BlockId),

    /// Merge requested where no merge is possible.
    #[error("cannot merge {block:?} into {target:?}")]
    InvalidMerge { target: BlockId, block: BlockId },

    /// An items diff could not anchor an insertion.
    #[error("cannot anchor insertion of {0:?}")]
    InvalidPatch(BlockId),

    /// Indent attempted on a first child.
    #[error("block {0:?} has no previous sibling")]
    NoPreviousSibling(BlockId),

    /// Unindent attempted on a child of the root.
    #[error("block {0:?} has no parent to move out of")]
    NoParent(BlockId),

    /// Undo replay found the store diverged from the captured state.
    ///
    /// The store should be treated as corrupted and reloaded.
    #[error("inconsistent store state at block {0:?}")]
    InconsistentState(BlockId),

    /// Edit position out of bounds.
    #[error("edit position {pos} out of bounds for block with length {len}")]
    PositionOutOfBounds { pos: usize, len: usize },

    /// Name already registered to a different block.
    #[error("name already taken: {0}")]
    NameTaken(BlockName),

    /// Traversal exceeded the configured depth (cycle or corruption).
    #[error("traversal exceeded max depth at block {0:?}")]
    MaxDepthExceeded(BlockId),
}

/// Errors loading a [`StoreConfig`](crate::StoreConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

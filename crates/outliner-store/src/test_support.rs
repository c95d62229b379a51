//! Shared fixtures for unit tests.

use outliner_types::{BlockId, DocumentId};

use crate::BlocksStore;

/// Ids of the blocks built by [`sample_tree`].
pub(crate) struct SampleTree {
    pub root: BlockId,
    pub a: BlockId,
    pub a1: BlockId,
    pub a2: BlockId,
    pub b: BlockId,
    pub c: BlockId,
}

/// ```text
/// root
/// ├── a
/// │   ├── a1
/// │   └── a2
/// ├── b
/// └── c
/// ```
///
/// Each block's content is its own label.
pub(crate) fn sample_tree() -> (BlocksStore, SampleTree) {
    let mut store = BlocksStore::new(DocumentId::new());
    let root = store.create_root("root");
    let a = store.append_block(&root, "a").unwrap();
    let a1 = store.append_block(&a, "a1").unwrap();
    let a2 = store.append_block(&a, "a2").unwrap();
    let b = store.append_block(&root, "b").unwrap();
    let c = store.append_block(&root, "c").unwrap();
    (store, SampleTree { root, a, a1, a2, b, c })
}

/// A root `a` with children `b` and `c`.
pub(crate) fn scenario_a() -> (BlocksStore, [BlockId; 3]) {
    let mut store = BlocksStore::new(DocumentId::new());
    let a = store.create_root("A");
    let b = store.append_block(&a, "B").unwrap();
    let c = store.append_block(&a, "C").unwrap();
    (store, [a, b, c])
}

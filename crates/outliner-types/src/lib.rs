//! Identity and block value types for the outliner.
//!
//! A pure leaf crate: typed ids and the [`Block`] record that the store
//! keeps in its arena, snapshots for undo, and hands to hosts.
//!
//! | Type            | Purpose                                      |
//! |-----------------|----------------------------------------------|
//! | [`BlockId`]     | Stable opaque block address (UUIDv7 / v5)    |
//! | [`DocumentId`]  | Which document a store holds                 |
//! | [`Block`]       | Node value: parent, items, content, stamps   |
//! | [`BlockKind`]   | Paragraph, list item, or named node          |
//! | [`BlockName`]   | Alias of a named block                       |

pub mod block;
pub mod ids;

pub use block::{Block, BlockKind, BlockName, TreePosition};
pub use ids::{BlockId, DocumentId};

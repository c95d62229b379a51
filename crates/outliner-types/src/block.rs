//! Block values: the atomic node of the outline tree.
//!
//! A [`Block`] is a plain value: ids instead of references, so cloning one is
//! a complete snapshot and the store can keep blocks in a flat id-keyed arena.
//!
//! ## Structure
//!
//! - `parent` is the single structural parent (`None` only for the root).
//! - `items` is the ordered child list; it defines both tree shape and render
//!   order.
//! - `links` are non-structural references (inline links to named blocks).
//!
//! ## Timestamps
//!
//! `created` and `updated` are logical clock values assigned by the store.
//! Undo capture compares `updated` only, so every mutation of a block must
//! bump it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::BlockId;

/// Human-readable alias of a named block.
pub type BlockName = smartstring::alias::String;

/// What a block *is*.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum BlockKind {
    /// Free-form rich text.
    #[default]
    Paragraph,
    /// Bulleted list entry.
    #[serde(rename = "list_item")]
    #[strum(serialize = "list_item", serialize = "listitem")]
    ListItem,
    /// Named node (a page or link target). Content is the name itself.
    Named,
}

impl BlockKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::ListItem => "list_item",
            BlockKind::Named => "named",
        }
    }

    /// Whether content of this kind can be concatenated by a merge.
    pub fn is_mergeable(&self) -> bool {
        matches!(self, BlockKind::Paragraph | BlockKind::ListItem)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a block sits: its parent and its index within the parent's items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreePosition {
    pub parent: Option<BlockId>,
    pub index: usize,
}

/// A node of the outline tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Immutable identity.
    pub id: BlockId,
    /// Structural parent (None for the document root).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<BlockId>,
    /// Ordered child ids. Unique within the list.
    #[serde(default)]
    pub items: Vec<BlockId>,
    /// Non-structural references to other blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<BlockId>,
    /// Content type.
    pub kind: BlockKind,
    /// Rich-text payload (markdown).
    pub content: String,
    /// Unique alias for link-style addressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<BlockName>,
    /// Logical timestamp of first insertion.
    pub created: u64,
    /// Logical timestamp of the last caller-visible mutation.
    pub updated: u64,
}

impl Block {
    /// Create a paragraph block.
    pub fn paragraph(id: BlockId, parent: Option<BlockId>, content: impl Into<String>) -> Self {
        Self {
            id,
            parent,
            items: Vec::new(),
            links: Vec::new(),
            kind: BlockKind::Paragraph,
            content: content.into(),
            name: None,
            created: 0,
            updated: 0,
        }
    }

    /// Create a named block. Its id is derived from the name.
    pub fn named(name: &str, parent: Option<BlockId>) -> Self {
        Self {
            id: BlockId::from_name(name),
            parent,
            items: Vec::new(),
            links: Vec::new(),
            kind: BlockKind::Named,
            content: name.to_string(),
            name: Some(BlockName::from(name)),
            created: 0,
            updated: 0,
        }
    }

    /// Replace the child list.
    pub fn with_items(mut self, items: impl IntoIterator<Item = BlockId>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// Replace the kind.
    pub fn with_kind(mut self, kind: BlockKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set both logical timestamps.
    pub fn with_timestamps(mut self, created: u64, updated: u64) -> Self {
        self.created = created;
        self.updated = updated;
        self
    }

    /// Check if this is a root block (no parent).
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if this block has children.
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    /// Index of `child` within `items`.
    pub fn position_of(&self, child: &BlockId) -> Option<usize> {
        self.items.iter().position(|id| id == child)
    }

    /// Content length in chars (edit offsets are char offsets).
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }

    /// All ids this block references: children first, then links.
    pub fn references(&self) -> impl Iterator<Item = &BlockId> {
        self.items.iter().chain(self.links.iter())
    }
}

//! Typed identifiers for documents and blocks.
//!
//! Both ID types wrap UUIDv7 (time-ordered, globally unique). They display as
//! standard UUID text for logging. The `short()` form (last 8 hex chars, the
//! random tail of a v7) is for human-facing output only, never a lookup key.
//!
//! Named blocks get deterministic ids via [`BlockId::from_name`] (UUIDv5), so
//! the same name resolves to the same block across documents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block identifier (UUIDv7, or UUIDv5 for named blocks).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(uuid::Uuid);

/// A document identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(uuid::Uuid);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Create a new time-ordered ID (UUIDv7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// Last 8 hex characters. Display only, not for lookup.
            ///
            /// The leading hex of a v7 is its millisecond timestamp, so ids
            /// minted together would all share a prefix.
            pub fn short(&self) -> String {
                let hex = self.0.as_simple().to_string();
                hex[hex.len() - 8..].to_string()
            }

            /// Full 32-character hex string (no hyphens).
            pub fn to_hex(&self) -> String {
                self.0.as_simple().to_string()
            }

            /// The raw 16 bytes.
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            /// Reconstruct from 16 bytes.
            pub fn from_bytes(b: [u8; 16]) -> Self {
                Self(uuid::Uuid::from_bytes(b))
            }

            /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                uuid::Uuid::parse_str(s).map(Self)
            }

            /// The nil id, for sentinel values.
            pub fn nil() -> Self {
                Self(uuid::Uuid::nil())
            }

            /// Check if this is the nil ID.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<uuid::Uuid> for $T {
            fn from(u: uuid::Uuid) -> Self {
                Self(u)
            }
        }

        impl From<$T> for uuid::Uuid {
            fn from(id: $T) -> uuid::Uuid {
                id.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Full UUID with hyphens for log readability
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_typed_id!(BlockId, "BlockId");
impl_typed_id!(DocumentId, "DocumentId");

// ── Named block ids ─────────────────────────────────────────────────────────

/// Fixed namespace for deriving deterministic named-block ids via UUIDv5.
const OUTLINER_NAME_NS: uuid::Uuid = uuid::uuid!("3f0c9a57-6d1e-4b8a-9e42-7a5d0c1b8e93");

impl BlockId {
    /// Derive a stable id for a named block.
    ///
    /// Same name always produces the same id. Names are case-sensitive.
    pub fn from_name(name: &str) -> Self {
        Self(uuid::Uuid::new_v5(&OUTLINER_NAME_NS, name.as_bytes()))
    }
}

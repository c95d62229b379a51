//! Store configuration.
//!
//! Loaded from RON. Every field has a default, so an empty `()` document is a
//! valid config:
//!
//! ```ron
//! (
//!     auto_unindent: empty_sole_child,
//!     nav_wrap: false,
//!     undo_limit: 100,
//!     max_depth: 512,
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ConfigError;

/// When `required_auto_unindent` should report that a block must be promoted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AutoUnindentPolicy {
    /// Never promote automatically.
    Never,
    /// Promote a sole child regardless of content.
    SoleChild,
    /// Promote a sole child whose content is empty.
    #[default]
    EmptySoleChild,
}

/// Tunables for a [`BlocksStore`](crate::BlocksStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub auto_unindent: AutoUnindentPolicy,
    /// Wrap around at document start/end when `NavOpts::wrap` is unset.
    pub nav_wrap: bool,
    /// Maximum entries kept by an [`UndoQueue`](crate::UndoQueue).
    pub undo_limit: usize,
    /// Circuit breaker for tree traversal.
    pub max_depth: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            auto_unindent: AutoUnindentPolicy::default(),
            nav_wrap: false,
            undo_limit: 100,
            max_depth: 512,
        }
    }
}

impl StoreConfig {
    /// Parse a config from RON text.
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(content)?)
    }

    /// Read and parse a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded store config");
        Ok(config)
    }
}

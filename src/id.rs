//! Identifier types for tiles, layers, and objects.
//!
//! These are the small, serialization-facing integer identifiers. They are
//! distinct from the process-unique UUIDs carried by [`Metadata`]: UUIDs
//! address entities in memory, while these ids survive in saved map files.
//!
//! [`Metadata`]: crate::meta::Metadata

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tile identifier stored in tile matrices.
///
/// `TileId::EMPTY` (zero) is the sentinel meaning "no tile present";
/// matrices are never required to store entries for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub i32);

impl TileId {
    /// The sentinel value for an empty cell.
    pub const EMPTY: TileId = TileId(0);

    /// Check whether this is the empty sentinel.
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl Default for TileId {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persistent layer identifier, assigned sequentially by the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(pub i32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persistent object identifier, assigned sequentially by the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub i32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

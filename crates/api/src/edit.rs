//! Edits a host can apply to an open map.
//!
//! Edits describe user intent against node ids. They are serializable so a
//! host can script or record them.

use glam::Vec2;
use node::NodeId;
use serde::{Deserialize, Serialize};

/// A structural change to the open document.
///
/// Positions are in canvas space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Edit {
    /// Attach a new node under `parent`.
    AddChild {
        parent: NodeId,
        name: String,
        position: Vec2,
    },

    /// Rename a node. Renaming the root changes the storage key.
    Rename { id: NodeId, name: String },

    /// Place a node at a new position.
    Move { id: NodeId, position: Vec2 },

    /// Remove a node and its subtree. Removing the root asks for the whole
    /// document to be deleted instead.
    Remove { id: NodeId },
}

/// What an [Edit] did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditOutcome {
    /// The edit was applied and saved.
    Applied {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<NodeId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<NodeId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<NodeId>,
    },

    /// The root was targeted for removal. Nothing changed; the host should
    /// confirm with the user and then delete the document under `key`.
    DeletionRequested { key: String },
}

impl EditOutcome {
    pub fn created(ids: Vec<NodeId>) -> Self {
        Self::Applied {
            created: ids,
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn modified(ids: Vec<NodeId>) -> Self {
        Self::Applied {
            created: vec![],
            modified: ids,
            deleted: vec![],
        }
    }

    pub fn deleted(ids: Vec<NodeId>) -> Self {
        Self::Applied {
            created: vec![],
            modified: vec![],
            deleted: ids,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

use crate::{MapError, Preview, Result};
use canvas::CanvasFrame;
use node::MindMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a document needs authentication to open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    #[default]
    Regular,
    Locked,
}

impl LockState {
    pub fn is_locked(self) -> bool {
        self == LockState::Locked
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

/// One mind map: its tree, canvas, lock state and preview.
///
/// The storage key is the root node's name.
#[derive(Clone, Debug)]
pub struct Document {
    pub map: MindMap,
    pub frame: CanvasFrame,
    pub state: LockState,
    pub preview: Preview,
}

impl Document {
    /// A fresh document with its root centered on a default canvas.
    pub fn new(root_name: impl Into<String>) -> Result<Self> {
        let root_name = root_name.into();
        validate_name(&root_name)?;

        let frame = CanvasFrame::default();
        Ok(Self {
            map: MindMap::new(root_name, Some(frame.center())),
            frame,
            state: LockState::Regular,
            preview: Preview::placeholder(),
        })
    }

    /// The root node's name, which doubles as the storage key.
    pub fn key(&self) -> &str {
        self.map.root().name()
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }
}

/// Checks that a root name can be used as a storage key.
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        "name shouldn't be empty"
    } else if name.contains(['/', '\\']) {
        "name can't contain path separators"
    } else if name.starts_with('.') {
        "name can't start with a dot"
    } else {
        return Ok(());
    };

    Err(MapError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

use node::{NodeId, TreeError};
use std::path::PathBuf;

/// Errors surfaced by document operations.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The blob is malformed or misses a structural field.
    #[error("corrupt document: {0}")]
    CorruptDocument(String),

    /// The preview is absent or doesn't decode as an image. Callers recover
    /// by substituting a placeholder.
    #[error("missing preview: {0}")]
    MissingAsset(String),

    #[error("failed to {action} {}", path.display())]
    IoFailure {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("import failed: {0}")]
    ImportFailed(String),

    #[error("authentication denied")]
    AuthenticationDenied,

    #[error("a map named {0:?} already exists")]
    NameTaken(String),

    #[error("invalid map name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("position ({x}, {y}) is outside the canvas limits")]
    InvalidPosition { x: f32, y: f32 },

    #[error("node {0} is being dragged")]
    DragInProgress(NodeId),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl MapError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the storage entry doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IoFailure { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

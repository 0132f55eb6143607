use std::env;
use std::path::PathBuf;

/// Environment variable that overrides the storage directory.
pub const HOME_ENV: &str = "MINDMAP_HOME";

pub const MAP_EXTENSION: &str = "mmd";
pub const PREVIEW_EXTENSION: &str = "png";

/// Where maps live and how their files are named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// The flat directory holding every map and preview.
    pub root: PathBuf,
    pub map_extension: String,
    pub preview_extension: String,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            map_extension: MAP_EXTENSION.to_string(),
            preview_extension: PREVIEW_EXTENSION.to_string(),
        }
    }

    /// Resolves the storage directory from the environment.
    ///
    /// Order: `$MINDMAP_HOME`, then `MindMap` in the user's documents
    /// directory, then `~/.mindmap/maps`.
    pub fn from_env() -> Self {
        Self::new(Self::default_root())
    }

    fn default_root() -> PathBuf {
        if let Some(dir) = env::var_os(HOME_ENV).filter(|dir| !dir.is_empty()) {
            return PathBuf::from(dir);
        }

        dirs::document_dir()
            .map(|dir| dir.join("MindMap"))
            .or_else(|| dirs::home_dir().map(|home| home.join(".mindmap").join("maps")))
            .unwrap_or_else(|| PathBuf::from(".mindmap").join("maps"))
    }
}

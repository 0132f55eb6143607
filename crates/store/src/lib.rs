//! File storage for mind maps.
//!
//! Maps live in one flat directory, keyed by their root node's name.

mod config;
mod file_store;
mod summary;

pub use config::{StoreConfig, HOME_ENV, MAP_EXTENSION, PREVIEW_EXTENSION};
pub use file_store::FileStore;
pub use interchange::{MapError, Result};
pub use summary::DocumentSummary;

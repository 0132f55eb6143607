//! On-disk representation of mind map documents.
//!
//! A [Document] bundles the node tree, its canvas frame, lock state and a
//! raster preview. [encode] and [decode] turn it into the single JSON blob
//! stored per map.

mod codec;
mod document;
mod error;
pub mod preview;

pub use codec::{decode, encode, read_header, DocumentHeader};
pub use document::{validate_name, Document, LockState};
pub use error::{MapError, Result};
pub use preview::Preview;

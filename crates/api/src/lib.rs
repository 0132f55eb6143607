//! Editing interface for mind maps.
//!
//! A [Session] owns one open document and writes it back to a
//! [FileStore] after every change. Host applications plug in the pieces
//! the core can't provide itself: an [Authenticator] for locked maps, a
//! [DeletionConfirmer] for deleting whole maps, and a [PreviewRenderer]
//! for the thumbnail stored next to each map.
//!
//! # Example
//! ```ignore
//! use api::{BlankRenderer, Edit, Session};
//!
//! let mut session = Session::create(store, BlankRenderer::default(), "Trip Plan")?;
//! let root = session.document().map.root_id();
//! session.mutate(Edit::AddChild {
//!     parent: root,
//!     name: "Flights".into(),
//!     position: Vec2::new(100.0, 100.0),
//! })?;
//! ```

mod edit;
mod host;
mod lifecycle;
mod session;

pub use edit::{Edit, EditOutcome};
pub use host::{
    AuthOutcome, Authenticator, BlankRenderer, CanvasSnapshot, DeletionConfirmer, PreviewRenderer,
};
pub use lifecycle::{delete_document, set_lock_stored};
pub use session::Session;

pub use canvas::{CanvasFrame, Edge};
pub use interchange::{Document, LockState, MapError, Preview, Result};
pub use node::{CanvasPoint, MindMap, Node, NodeId};
pub use store::{DocumentSummary, FileStore, StoreConfig};

use crate::{
    AuthOutcome, Authenticator, BlankRenderer, CanvasSnapshot, Edit, EditOutcome, PreviewRenderer,
};
use canvas::Edge;
use interchange::{validate_name, Document, LockState, MapError, Preview, Result};
use log::{debug, info};
use node::{CanvasPoint, NodeId};
use store::FileStore;

/// An open document and the store it saves to.
///
/// Every applied edit is written back right away, except moves made during
/// a drag, which are saved once when the drag ends. A failed edit or save
/// leaves the in-memory document as it was before the call.
pub struct Session<R = BlankRenderer> {
    store: FileStore,
    doc: Document,
    renderer: R,
    dragging: Option<NodeId>,
}

impl<R: PreviewRenderer> Session<R> {
    /// Creates and saves a new map named `root_name`.
    ///
    /// Refuses names that are invalid or already stored.
    pub fn create(store: FileStore, renderer: R, root_name: &str) -> Result<Self> {
        validate_name(root_name)?;
        if store.exists(root_name) {
            return Err(MapError::NameTaken(root_name.to_string()));
        }

        let mut session = Self {
            doc: Document::new(root_name)?,
            store,
            renderer,
            dragging: None,
        };
        session.save()?;
        info!("created map {root_name:?}");
        Ok(session)
    }

    /// Loads the map stored under `key`.
    ///
    /// Locked maps are only handed out after `auth` grants access.
    pub async fn open(
        store: FileStore,
        renderer: R,
        key: &str,
        auth: &impl Authenticator,
    ) -> Result<Self> {
        let doc = store.load_document(key)?;
        if doc.is_locked() && !auth.authenticate().await.is_granted() {
            info!("refused to open locked map {key:?}");
            return Err(MapError::AuthenticationDenied);
        }

        debug!("opened map {key:?}");
        Ok(Self {
            store,
            doc,
            renderer,
            dragging: None,
        })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Storage key of the open map.
    pub fn key(&self) -> &str {
        self.doc.key()
    }

    /// Whether the host is showing a locked map and should guard it, e.g.
    /// by blurring the view while the app is in the background.
    pub fn is_locked_view(&self) -> bool {
        self.doc.is_locked()
    }

    /// Applies an edit and saves the result.
    ///
    /// Refused with [MapError::DragInProgress] until the current drag ends.
    pub fn mutate(&mut self, edit: Edit) -> Result<EditOutcome> {
        self.ensure_idle()?;
        debug!("applying {edit:?}");
        let snapshot = self.doc.clone();
        let previous_key = self.key().to_string();

        let result = self.apply(edit).and_then(|outcome| {
            if outcome.is_applied() {
                self.save_as(&previous_key)?;
            }
            Ok(outcome)
        });

        if result.is_err() {
            self.doc = snapshot;
        }
        result
    }

    /// Starts dragging `id`. Moves until [Session::end_drag] are not saved.
    ///
    /// Only one node is dragged at a time.
    pub fn begin_drag(&mut self, id: NodeId) -> Result<()> {
        if !self.doc.map.contains(id) {
            return Err(node::TreeError::NodeNotFound(id).into());
        }
        match self.dragging {
            Some(other) if other != id => Err(MapError::DragInProgress(other)),
            _ => {
                self.dragging = Some(id);
                Ok(())
            }
        }
    }

    /// Moves the dragged node and grows the canvas near its edges.
    ///
    /// Starts a drag of `id` if none is in progress. Returns the edges that
    /// grew.
    pub fn drag(&mut self, id: NodeId, position: CanvasPoint) -> Result<Vec<Edge>> {
        ensure_placeable(position)?;
        self.begin_drag(id)?;
        self.doc.map.set_position(id, position)?;

        let on_surface = self.doc.frame.to_surface(position);
        Ok(self.doc.frame.drag_to(on_surface))
    }

    /// Finishes a drag and saves once.
    pub fn end_drag(&mut self) -> Result<()> {
        match self.dragging.take() {
            Some(id) => {
                debug!("drag of {id} ended");
                self.save()
            }
            None => Ok(()),
        }
    }

    /// Fits the canvas around every node, refreshes the preview and writes
    /// the map.
    pub fn save(&mut self) -> Result<()> {
        let key = self.key().to_string();
        self.save_as(&key)
    }

    /// Locks or unlocks the map, given the outcome of an authentication
    /// check.
    pub fn set_lock(&mut self, desired: LockState, outcome: AuthOutcome) -> Result<()> {
        self.ensure_idle()?;
        if !outcome.is_granted() {
            info!("lock change on {:?} denied", self.key());
            return Err(MapError::AuthenticationDenied);
        }
        if self.doc.state == desired {
            return Ok(());
        }

        let previous = self.doc.state;
        self.doc.state = desired;
        if let Err(e) = self.save() {
            self.doc.state = previous;
            return Err(e);
        }

        info!("map {:?} is now {desired}", self.key());
        Ok(())
    }

    /// Authenticates through `auth`, then calls [Session::set_lock].
    pub async fn request_lock(
        &mut self,
        desired: LockState,
        auth: &impl Authenticator,
    ) -> Result<()> {
        let outcome = auth.authenticate().await;
        self.set_lock(desired, outcome)
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.dragging {
            Some(id) => Err(MapError::DragInProgress(id)),
            None => Ok(()),
        }
    }

    fn apply(&mut self, edit: Edit) -> Result<EditOutcome> {
        let map = &mut self.doc.map;
        match edit {
            Edit::AddChild {
                parent,
                name,
                position,
            } => {
                let position = CanvasPoint(position);
                ensure_placeable(position)?;
                let id = map.add_child(parent, name, Some(position))?;
                Ok(EditOutcome::created(vec![id]))
            }

            Edit::Rename { id, name } => {
                if id == map.root_id() {
                    validate_name(&name)?;
                }
                map.rename(id, name)?;
                Ok(EditOutcome::modified(vec![id]))
            }

            Edit::Move { id, position } => {
                let position = CanvasPoint(position);
                ensure_placeable(position)?;
                map.set_position(id, position)?;
                let on_surface = self.doc.frame.to_surface(position);
                self.doc.frame.drag_to(on_surface);
                Ok(EditOutcome::modified(vec![id]))
            }

            Edit::Remove { id } if id == map.root_id() => Ok(EditOutcome::DeletionRequested {
                key: map.root().name().to_string(),
            }),

            Edit::Remove { id } => Ok(EditOutcome::deleted(map.remove(id)?)),
        }
    }

    fn save_as(&mut self, previous_key: &str) -> Result<()> {
        let grown = self.doc.frame.fit(&self.doc.map);
        if !grown.is_empty() {
            debug!("canvas grew on {} edge(s) to fit every node", grown.len());
        }

        let bytes = self.renderer.render(CanvasSnapshot {
            map: &self.doc.map,
            frame: &self.doc.frame,
        });
        self.doc.preview = Preview::or_placeholder(bytes);

        self.store.save_renamed(&self.doc, previous_key)
    }
}

fn ensure_placeable(position: CanvasPoint) -> Result<()> {
    if position.is_placeable() {
        Ok(())
    } else {
        Err(MapError::InvalidPosition {
            x: position.x(),
            y: position.y(),
        })
    }
}

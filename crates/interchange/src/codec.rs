//! JSON encoding of documents.
//!
//! ```json
//! {
//!   "rootNode": {
//!     "name": "Trip Plan",
//!     "centerPosition": { "x": 1000.0, "y": 1000.0 },
//!     "children": [
//!       { "name": "Flights", "centerPosition": { "x": 100.0, "y": 100.0 }, "children": [] }
//!     ]
//!   },
//!   "contentViewSize": { "width": 2000.0, "height": 2000.0 },
//!   "state": "regular",
//!   "image": "<base64 PNG>"
//! }
//! ```
//!
//! Node ids are not written; decoding assigns fresh ones. Positions are
//! written in surface space, so any pending leading-edge shift lands on disk
//! and a decoded frame starts with a zero origin.

use crate::{Document, LockState, MapError, Preview, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use canvas::CanvasFrame;
use log::warn;
use node::{CanvasPoint, CanvasSize, MindMap, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapFile {
    root_node: WireNode,
    content_view_size: WireSize,
    state: LockState,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNode {
    name: String,
    center_position: Option<WirePoint>,
    /// Always written, even when empty.
    children: Vec<WireNode>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct WirePoint {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct WireSize {
    width: f32,
    height: f32,
}

/// Root name and lock state of a stored map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    pub name: String,
    pub state: LockState,
}

/// The fields [read_header] looks at. Everything else is skipped unparsed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderFile {
    root_node: HeaderNode,
    state: LockState,
}

#[derive(Deserialize)]
struct HeaderNode {
    name: String,
}

/// Serializes a document into a single blob.
pub fn encode(doc: &Document) -> Result<Vec<u8>> {
    let file = MapFile {
        root_node: wire_node(doc, doc.map.root_id()),
        content_view_size: WireSize {
            width: doc.frame.size().width(),
            height: doc.frame.size().height(),
        },
        state: doc.state,
        image: Some(STANDARD.encode(doc.preview.bytes())),
    };

    serde_json::to_vec(&file)
        .map_err(|e| MapError::CorruptDocument(format!("failed to encode: {e}")))
}

/// Parses a blob produced by [encode].
///
/// Structural problems fail with [MapError::CorruptDocument]. A missing or
/// unreadable preview is replaced by the placeholder.
pub fn decode(bytes: &[u8]) -> Result<Document> {
    let file: MapFile =
        serde_json::from_slice(bytes).map_err(|e| MapError::CorruptDocument(e.to_string()))?;

    let WireSize { width, height } = file.content_view_size;
    if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
        return Err(MapError::CorruptDocument(format!(
            "invalid canvas size {width}x{height}"
        )));
    }
    let frame = CanvasFrame::new(CanvasSize::new(width, height));

    let WireNode {
        name,
        center_position,
        children,
    } = file.root_node;
    let mut map = MindMap::new(name, Some(place(center_position, &frame)?));
    let root = map.root_id();
    attach_children(&mut map, root, children, &frame)?;

    Ok(Document {
        map,
        frame,
        state: file.state,
        preview: decode_preview(file.image),
    })
}

/// Reads only the root name and lock state of a blob, for listings.
///
/// The tree and preview are not validated; use [decode] for that.
pub fn read_header(bytes: &[u8]) -> Result<DocumentHeader> {
    let HeaderFile { root_node, state } =
        serde_json::from_slice(bytes).map_err(|e| MapError::CorruptDocument(e.to_string()))?;
    Ok(DocumentHeader {
        name: root_node.name,
        state,
    })
}

fn wire_node(doc: &Document, id: NodeId) -> WireNode {
    let node = doc.map.get(id);
    let center_position = node
        .and_then(|n| n.position())
        .filter(CanvasPoint::is_finite)
        .map(|p| {
            let p = doc.frame.to_surface(p);
            WirePoint { x: p.x(), y: p.y() }
        });

    WireNode {
        name: node.map(|n| n.name().to_string()).unwrap_or_default(),
        center_position,
        children: doc
            .map
            .children(id)
            .map(|child| wire_node(doc, child.id()))
            .collect(),
    }
}

fn attach_children(
    map: &mut MindMap,
    parent: NodeId,
    children: Vec<WireNode>,
    frame: &CanvasFrame,
) -> Result<()> {
    for child in children {
        let position = place(child.center_position, frame)?;
        let id = map
            .add_child(parent, child.name, Some(position))
            .map_err(|e| MapError::CorruptDocument(e.to_string()))?;
        attach_children(map, id, child.children, frame)?;
    }
    Ok(())
}

/// Stored position verbatim, or the canvas center when there is none.
fn place(position: Option<WirePoint>, frame: &CanvasFrame) -> Result<CanvasPoint> {
    let Some(WirePoint { x, y }) = position else {
        return Ok(frame.center());
    };

    let point = CanvasPoint::new(x, y);
    if !point.is_finite() {
        return Err(MapError::CorruptDocument(format!(
            "node position ({x}, {y}) is out of range"
        )));
    }
    Ok(point)
}

fn decode_preview(image: Option<String>) -> Preview {
    let Some(encoded) = image else {
        warn!("document has no preview; using placeholder");
        return Preview::placeholder();
    };

    match STANDARD.decode(encoded) {
        Ok(bytes) => Preview::or_placeholder(bytes),
        Err(e) => {
            warn!("preview isn't valid base64 ({e}); using placeholder");
            Preview::placeholder()
        }
    }
}

//! Collaborators the host application supplies.

use canvas::CanvasFrame;
use image::{Rgba, RgbaImage};
use interchange::preview::{encode_png, BACKGROUND};
use log::warn;
use node::{branch_color, MindMap};
use std::future::{ready, Future};

/// Result of asking the user to authenticate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Granted,
    /// Failed or cancelled.
    Denied,
}

impl AuthOutcome {
    pub fn is_granted(self) -> bool {
        self == AuthOutcome::Granted
    }
}

/// Checks the user's identity before a locked map is opened or a lock is
/// toggled.
pub trait Authenticator {
    fn authenticate(&self) -> impl Future<Output = AuthOutcome>;
}

/// A fixed answer, for hosts that already know it.
impl Authenticator for AuthOutcome {
    fn authenticate(&self) -> impl Future<Output = AuthOutcome> {
        ready(*self)
    }
}

/// Asks the user to confirm deleting a whole map.
pub trait DeletionConfirmer {
    fn confirm_deletion(&self, key: &str) -> impl Future<Output = bool>;
}

impl DeletionConfirmer for bool {
    fn confirm_deletion(&self, _key: &str) -> impl Future<Output = bool> {
        ready(*self)
    }
}

/// The visual state handed to a [PreviewRenderer].
#[derive(Clone, Copy, Debug)]
pub struct CanvasSnapshot<'a> {
    pub map: &'a MindMap,
    pub frame: &'a CanvasFrame,
}

/// Renders the current canvas into encoded image bytes.
///
/// Bytes that don't decode are replaced by a placeholder preview.
pub trait PreviewRenderer {
    fn render(&self, snapshot: CanvasSnapshot<'_>) -> Vec<u8>;
}

/// Renders nodes as colored dots on the canvas background.
#[derive(Clone, Copy, Debug)]
pub struct BlankRenderer {
    /// Longest side of the rendered image, in pixels.
    pub max_side: u32,
}

impl Default for BlankRenderer {
    fn default() -> Self {
        Self { max_side: 256 }
    }
}

impl BlankRenderer {
    const DOT_RADIUS: i64 = 2;

    fn scale(&self, frame: &CanvasFrame) -> f32 {
        let long_side = frame.size().width().max(frame.size().height());
        if long_side <= 0.0 {
            return 1.0;
        }
        (self.max_side as f32 / long_side).min(1.0)
    }
}

impl PreviewRenderer for BlankRenderer {
    fn render(&self, snapshot: CanvasSnapshot<'_>) -> Vec<u8> {
        let CanvasSnapshot { map, frame } = snapshot;
        let scale = self.scale(frame);
        let width = ((frame.size().width() * scale).round() as u32).max(1);
        let height = ((frame.size().height() * scale).round() as u32).max(1);

        let mut image = RgbaImage::from_pixel(width, height, BACKGROUND);
        for node in map.iter() {
            let Some(position) = node.position().filter(|p| p.is_finite()) else {
                continue;
            };
            let color = to_rgba(branch_color(map.depth(node.id()).unwrap_or(0)));
            let center = frame.to_surface(position);
            let cx = (center.x() * scale).round() as i64;
            let cy = (center.y() * scale).round() as i64;

            for dy in -Self::DOT_RADIUS..=Self::DOT_RADIUS {
                for dx in -Self::DOT_RADIUS..=Self::DOT_RADIUS {
                    let (x, y) = (cx + dx, cy + dy);
                    if (0..width as i64).contains(&x) && (0..height as i64).contains(&y) {
                        image.put_pixel(x as u32, y as u32, color);
                    }
                }
            }
        }

        encode_png(&image).unwrap_or_else(|e| {
            warn!("{e}");
            Vec::new()
        })
    }
}

fn to_rgba(color: [f32; 4]) -> Rgba<u8> {
    Rgba(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}

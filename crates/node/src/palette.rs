//! Connector colors for branches.

/// Deepest level that still gets a depth-tinted connector.
pub const MAX_TINTED_DEPTH: usize = 4;

/// Connector color for branches deeper than [MAX_TINTED_DEPTH].
pub const ACCENT_VIOLET: [f32; 4] = [73.0 / 256.0, 41.0 / 256.0, 187.0 / 256.0, 1.0];

/// RGBA color of the connector leading into a node at `depth`.
///
/// Shallow branches fade from white toward violet one step per level.
pub fn branch_color(depth: usize) -> [f32; 4] {
    if depth > MAX_TINTED_DEPTH {
        return ACCENT_VIOLET;
    }

    let d = depth as f32;
    [
        (255.0 - d * 36.0) / 255.0,
        (255.0 - d * 42.0) / 255.0,
        (255.0 - d * 13.0) / 255.0,
        1.0,
    ]
}

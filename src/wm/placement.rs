//! Placement Module
//!
//! Where new windows go when they did not ask for a position, and what
//! "maximized" means for a client.

use tracing::debug;

use crate::shared::Geometry;
use crate::wm::decorations::{FrameExtents, ResizeEdges};
use crate::wm::hints::SizeHints;

/// Cascading placement: each new frame goes one step down and right of the
/// previous one on the same screen, wrapping back to the corner when it would
/// no longer fit.
#[derive(Debug, Clone)]
pub struct Cascade {
    step: i32,
    /// Next offset per screen index
    offsets: Vec<i32>,
}

impl Cascade {
    pub fn new(step: i32) -> Self {
        Self {
            step: step.max(1),
            offsets: Vec::new(),
        }
    }

    /// Frame origin for a frame of the given size on `screen`.
    pub fn place(&mut self, screen_index: usize, screen: Geometry, width: u32, height: u32) -> (i32, i32) {
        if self.offsets.len() <= screen_index {
            self.offsets.resize(screen_index + 1, 0);
        }
        let mut offset = self.offsets[screen_index];
        let fits = |offset: i32| {
            screen.x + offset + width as i32 <= screen.right() && screen.y + offset + height as i32 <= screen.bottom()
        };
        if offset > 0 && !fits(offset) {
            offset = 0;
        }
        self.offsets[screen_index] = offset + self.step;
        let position = (screen.x + offset, screen.y + offset);
        debug!("Cascade placement on screen {} at {:?}", screen_index, position);
        position
    }
}

/// Frame origin centring a frame over its owner's frame, kept on `screen`.
pub fn center_over(owner: Geometry, width: u32, height: u32, screen: Geometry) -> (i32, i32) {
    let (cx, cy) = owner.center();
    let x = cx - width as i32 / 2;
    let y = cy - height as i32 / 2;
    let x = x.min(screen.right() - width as i32).max(screen.x);
    let y = y.min(screen.bottom() - height as i32).max(screen.y);
    (x, y)
}

/// Client geometry filling `screen` with the frame, within the size hints.
pub fn maximized_geometry(screen: Geometry, extents: &FrameExtents, hints: &SizeHints) -> Geometry {
    let width = screen.width as i32 - (extents.west + extents.east) as i32;
    let height = screen.height as i32 - (extents.north + extents.south) as i32;
    let (width, height) = hints.constrain(width.max(1), height.max(1), ResizeEdges::empty());
    Geometry::new(
        screen.x + extents.west as i32,
        screen.y + extents.north as i32,
        width,
        height,
    )
}

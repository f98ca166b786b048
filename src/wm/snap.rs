//! Snapping
//!
//! Pulls a frame being moved or resized onto nearby edges. The border pass
//! aligns against other windows, the screen pass against monitor edges. All
//! rectangles here are frame rectangles in root coordinates.

use crate::shared::Geometry;
use crate::wm::decorations::ResizeEdges;

/// Snap behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapConfig {
    pub to_edges: bool,
    pub to_windows: bool,
    /// Inclusive threshold in pixels
    pub distance: i32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            to_edges: true,
            to_windows: true,
            distance: 10,
        }
    }
}

/// Edge coordinates; right and bottom are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl From<Geometry> for Rect {
    fn from(g: Geometry) -> Self {
        Self {
            left: g.x,
            top: g.y,
            right: g.right(),
            bottom: g.bottom(),
        }
    }
}

impl Rect {
    fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.top < other.bottom && self.bottom > other.top
    }

    fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left < other.right && self.right > other.left
    }

    fn to_geometry(self) -> Geometry {
        Geometry::from_edges(self.left, self.top, self.right.max(self.left + 1), self.bottom.max(self.top + 1))
    }
}

/// Windows whose edges our edges may snap to, named by our edge
#[derive(Debug, Default)]
struct Candidates {
    /// Our left edge against their right edge
    west: Option<Rect>,
    /// Our right edge against their left edge
    east: Option<Rect>,
    /// Our top edge against their bottom edge
    north: Option<Rect>,
    /// Our bottom edge against their top edge
    south: Option<Rect>,
}

/// A window whose right edge we snap our left edge to stays a valid target
/// only while `above` does not cover the stretch of that edge we share.
fn west_still_valid(us: &Rect, above: &Rect, west: &Rect) -> bool {
    let (top, bottom) = (us.top.max(west.top), us.bottom.min(west.bottom));
    let covers_edge = above.left < west.right && above.right >= west.right;
    !(covers_edge && above.top <= top && above.bottom >= bottom)
}

fn east_still_valid(us: &Rect, above: &Rect, east: &Rect) -> bool {
    let (top, bottom) = (us.top.max(east.top), us.bottom.min(east.bottom));
    let covers_edge = above.left <= east.left && above.right > east.left;
    !(covers_edge && above.top <= top && above.bottom >= bottom)
}

fn north_still_valid(us: &Rect, above: &Rect, north: &Rect) -> bool {
    let (left, right) = (us.left.max(north.left), us.right.min(north.right));
    let covers_edge = above.top < north.bottom && above.bottom >= north.bottom;
    !(covers_edge && above.left <= left && above.right >= right)
}

fn south_still_valid(us: &Rect, above: &Rect, south: &Rect) -> bool {
    let (left, right) = (us.left.max(south.left), us.right.min(south.right));
    let covers_edge = above.top <= south.top && above.bottom > south.top;
    !(covers_edge && above.left <= left && above.right >= right)
}

/// Scan `others` bottom to top and collect the edges in range.
fn collect_candidates(us: &Rect, others: &[Geometry], distance: i32) -> Candidates {
    let mut found = Candidates::default();
    for other in others.iter().copied().map(Rect::from) {
        // The newly examined window is above every candidate so far
        if found.west.is_some_and(|c| !west_still_valid(us, &other, &c)) {
            found.west = None;
        }
        if found.east.is_some_and(|c| !east_still_valid(us, &other, &c)) {
            found.east = None;
        }
        if found.north.is_some_and(|c| !north_still_valid(us, &other, &c)) {
            found.north = None;
        }
        if found.south.is_some_and(|c| !south_still_valid(us, &other, &c)) {
            found.south = None;
        }

        if us.overlaps_vertically(&other) {
            if (us.left - other.right).abs() <= distance {
                found.west = Some(other);
            }
            if (us.right - other.left).abs() <= distance {
                found.east = Some(other);
            }
        }
        if us.overlaps_horizontally(&other) {
            if (us.top - other.bottom).abs() <= distance {
                found.north = Some(other);
            }
            if (us.bottom - other.top).abs() <= distance {
                found.south = Some(other);
            }
        }
    }
    found
}

/// Per-edge targets from the screen pass
#[derive(Debug, Default)]
struct ScreenTargets {
    left: Option<i32>,
    right: Option<i32>,
    top: Option<i32>,
    bottom: Option<i32>,
}

fn screen_targets(us: &Rect, screens: &[Geometry], distance: i32) -> ScreenTargets {
    let mut targets = ScreenTargets::default();
    for screen in screens.iter().copied().map(Rect::from) {
        if !(us.overlaps_horizontally(&screen) && us.overlaps_vertically(&screen)) {
            continue;
        }
        if (us.left - screen.left).abs() <= distance {
            targets.left = Some(screen.left);
        }
        if (us.right - screen.right).abs() <= distance {
            targets.right = Some(screen.right);
        }
        if (us.top - screen.top).abs() <= distance {
            targets.top = Some(screen.top);
        }
        if (us.bottom - screen.bottom).abs() <= distance {
            targets.bottom = Some(screen.bottom);
        }
    }
    targets
}

/// Snap a frame being moved. Only the position changes.
///
/// `others` are the visible frames in scan order (bottom of the stack first),
/// without the moving window.
pub fn snap_move(frame: Geometry, others: &[Geometry], screens: &[Geometry], config: &SnapConfig) -> Geometry {
    let (w, h) = (frame.width as i32, frame.height as i32);
    let mut us = Rect::from(frame);

    if config.to_windows {
        let found = collect_candidates(&us, others, config.distance);
        if let Some(east) = found.east {
            us.left = east.left - w;
        }
        if let Some(west) = found.west {
            us.left = west.right;
        }
        if let Some(south) = found.south {
            us.top = south.top - h;
        }
        if let Some(north) = found.north {
            us.top = north.bottom;
        }
        us.right = us.left + w;
        us.bottom = us.top + h;
    }

    if config.to_edges {
        let targets = screen_targets(&us, screens, config.distance);
        if let Some(left) = targets.left {
            us.left = left;
        }
        if let Some(right) = targets.right {
            us.left = right - w;
        }
        if let Some(top) = targets.top {
            us.top = top;
        }
        if let Some(bottom) = targets.bottom {
            us.top = bottom - h;
        }
        us.right = us.left + w;
        us.bottom = us.top + h;
    }

    us.to_geometry()
}

/// Snap the dragged edges of a frame being resized. Other edges stay put.
pub fn snap_resize(
    frame: Geometry,
    edges: ResizeEdges,
    others: &[Geometry],
    screens: &[Geometry],
    config: &SnapConfig,
) -> Geometry {
    let mut us = Rect::from(frame);

    if config.to_windows {
        let found = collect_candidates(&us, others, config.distance);
        if edges.contains(ResizeEdges::EAST) {
            if let Some(east) = found.east {
                us.right = east.left;
            }
        }
        if edges.contains(ResizeEdges::WEST) {
            if let Some(west) = found.west {
                us.left = west.right;
            }
        }
        if edges.contains(ResizeEdges::SOUTH) {
            if let Some(south) = found.south {
                us.bottom = south.top;
            }
        }
        if edges.contains(ResizeEdges::NORTH) {
            if let Some(north) = found.north {
                us.top = north.bottom;
            }
        }
    }

    if config.to_edges {
        let targets = screen_targets(&us, screens, config.distance);
        if edges.contains(ResizeEdges::WEST) {
            if let Some(left) = targets.left {
                us.left = left;
            }
        }
        if edges.contains(ResizeEdges::EAST) {
            if let Some(right) = targets.right {
                us.right = right;
            }
        }
        if edges.contains(ResizeEdges::NORTH) {
            if let Some(top) = targets.top {
                us.top = top;
            }
        }
        if edges.contains(ResizeEdges::SOUTH) {
            if let Some(bottom) = targets.bottom {
                us.bottom = bottom;
            }
        }
    }

    us.to_geometry()
}

//! Window decorations: frame extents and border hit-testing
//!
//! Drawing is left to the theme hook; this module only knows where the
//! decoration parts are, so a pointer position on a frame can be mapped to
//! what a press there should do.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::shared::Geometry;
use crate::wm::client::Client;
use crate::wm::client_flags::{BorderFlags, StatusFlags};

bitflags! {
    /// Frame edges taking part in a resize
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResizeEdges: u8 {
        const NORTH = 1 << 0;
        const SOUTH = 1 << 1;
        const EAST  = 1 << 2;
        const WEST  = 1 << 3;
    }
}

/// Semantic zone of a frame under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    None,
    Title,
    Menu,
    Minimize,
    Maximize,
    Close,
    Resize(ResizeEdges),
    /// Border of a client that cannot be resized; dragging moves it
    Outline,
}

/// Title bar button kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    Menu,
    Minimize,
    Maximize,
    Close,
}

impl ButtonKind {
    fn zone(self) -> Zone {
        match self {
            Self::Menu => Zone::Menu,
            Self::Minimize => Zone::Minimize,
            Self::Maximize => Zone::Maximize,
            Self::Close => Zone::Close,
        }
    }

    fn available(self, border: BorderFlags) -> bool {
        match self {
            Self::Menu => true,
            Self::Minimize => border.contains(BorderFlags::MINIMIZE),
            Self::Maximize => border.contains(BorderFlags::MAXIMIZE),
            Self::Close => border.contains(BorderFlags::CLOSE),
        }
    }
}

/// Title bar button positions, outermost first on each side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonLayout {
    pub left: Vec<ButtonKind>,
    pub right: Vec<ButtonKind>,
}

impl Default for ButtonLayout {
    fn default() -> Self {
        Self {
            left: vec![ButtonKind::Menu],
            right: vec![ButtonKind::Close, ButtonKind::Maximize, ButtonKind::Minimize],
        }
    }
}

/// Decoration size on each side of the client window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameExtents {
    pub north: u32,
    pub south: u32,
    pub east: u32,
    pub west: u32,
}

/// Decoration sizes from the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetrics {
    pub title_height: u32,
    pub border_width: u32,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self {
            title_height: 20,
            border_width: 4,
        }
    }
}

impl FrameMetrics {
    pub fn extents(&self, border: BorderFlags) -> FrameExtents {
        let outline = if border.contains(BorderFlags::OUTLINE) {
            self.border_width
        } else {
            0
        };
        let title = if border.contains(BorderFlags::TITLE) {
            self.title_height
        } else {
            0
        };
        FrameExtents {
            north: outline + title,
            south: outline,
            east: outline,
            west: outline,
        }
    }

    /// Frame rectangle in root coordinates for a client-area geometry
    pub fn frame_geometry(&self, geometry: &Geometry, border: BorderFlags, shaded: bool) -> Geometry {
        let ext = self.extents(border);
        let height = if shaded {
            ext.north + ext.south
        } else {
            geometry.height + ext.north + ext.south
        };
        Geometry {
            x: geometry.x - ext.west as i32,
            y: geometry.y - ext.north as i32,
            width: geometry.width + ext.west + ext.east,
            height,
        }
    }

    pub fn client_frame(&self, client: &Client) -> Geometry {
        self.frame_geometry(
            &client.geometry,
            client.border,
            client.status.contains(StatusFlags::SHADED),
        )
    }
}

/// Classify a frame-relative pointer position.
///
/// The outer border band wins over the title bar, and inside the band the
/// corners win over the edges.
pub fn classify(client: &Client, metrics: &FrameMetrics, layout: &ButtonLayout, x: i32, y: i32) -> Zone {
    let frame = metrics.client_frame(client);
    let (fw, fh) = (frame.width as i32, frame.height as i32);
    if x < 0 || y < 0 || x >= fw || y >= fh {
        return Zone::None;
    }

    let border = client.border;
    let ext = metrics.extents(border);
    let bw = if border.contains(BorderFlags::OUTLINE) {
        metrics.border_width as i32
    } else {
        0
    };

    let on_band = bw > 0 && (x < bw || x >= fw - bw || y < bw || y >= fh - bw);
    if on_band {
        if !border.contains(BorderFlags::RESIZE) {
            return move_zone(border);
        }
        let corner = metrics.title_height.max(metrics.border_width) as i32;
        let near_w = x < corner;
        let near_e = x >= fw - corner;
        let near_n = y < corner;
        let near_s = y >= fh - corner;

        let mut edges = ResizeEdges::empty();
        if (near_n || near_s) && (near_w || near_e) {
            edges |= if near_n { ResizeEdges::NORTH } else { ResizeEdges::SOUTH };
            edges |= if near_w { ResizeEdges::WEST } else { ResizeEdges::EAST };
        } else {
            if x < bw {
                edges |= ResizeEdges::WEST;
            } else if x >= fw - bw {
                edges |= ResizeEdges::EAST;
            }
            if y < bw {
                edges |= ResizeEdges::NORTH;
            } else if y >= fh - bw {
                edges |= ResizeEdges::SOUTH;
            }
        }

        if client.status.contains(StatusFlags::SHADED) {
            edges.remove(ResizeEdges::NORTH | ResizeEdges::SOUTH);
        }
        if edges.is_empty() {
            return move_zone(border);
        }
        return Zone::Resize(edges);
    }

    let in_title = border.contains(BorderFlags::TITLE)
        && y >= bw
        && y < ext.north as i32
        && x >= ext.west as i32
        && x < fw - ext.east as i32;
    if !in_title {
        return Zone::None;
    }

    let size = metrics.title_height as i32;
    let mut left = ext.west as i32;
    for kind in layout.left.iter().filter(|k| k.available(border)) {
        if x >= left && x < left + size {
            return kind.zone();
        }
        left += size;
    }
    let mut right = fw - ext.east as i32;
    for kind in layout.right.iter().filter(|k| k.available(border)) {
        if x >= right - size && x < right {
            return kind.zone();
        }
        right -= size;
    }
    Zone::Title
}

fn move_zone(border: BorderFlags) -> Zone {
    if border.contains(BorderFlags::MOVE) {
        Zone::Outline
    } else {
        Zone::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(border: BorderFlags) -> Client {
        let mut c = Client::new(1, Geometry::new(100, 100, 200, 100));
        c.border = border;
        c.status = StatusFlags::MAPPED;
        c
    }

    // title 20, border 4: frame is 208 x 128
    fn metrics() -> FrameMetrics {
        FrameMetrics::default()
    }

    #[test]
    fn test_extents_and_frame() {
        let m = metrics();
        let ext = m.extents(BorderFlags::all());
        assert_eq!(ext, FrameExtents { north: 24, south: 4, east: 4, west: 4 });
        assert_eq!(m.extents(BorderFlags::TITLE).north, 20);
        assert_eq!(m.extents(BorderFlags::empty()), FrameExtents::default());

        let c = client(BorderFlags::all());
        assert_eq!(m.client_frame(&c), Geometry::new(96, 76, 208, 128));
    }

    #[test]
    fn test_corners_before_edges() {
        let c = client(BorderFlags::all());
        let m = metrics();
        let l = ButtonLayout::default();
        assert_eq!(classify(&c, &m, &l, 1, 1), Zone::Resize(ResizeEdges::NORTH | ResizeEdges::WEST));
        // on the west band but within the corner span vertically
        assert_eq!(classify(&c, &m, &l, 1, 15), Zone::Resize(ResizeEdges::NORTH | ResizeEdges::WEST));
        assert_eq!(classify(&c, &m, &l, 207, 127), Zone::Resize(ResizeEdges::SOUTH | ResizeEdges::EAST));
        assert_eq!(classify(&c, &m, &l, 1, 60), Zone::Resize(ResizeEdges::WEST));
        assert_eq!(classify(&c, &m, &l, 100, 127), Zone::Resize(ResizeEdges::SOUTH));
        assert_eq!(classify(&c, &m, &l, 100, 1), Zone::Resize(ResizeEdges::NORTH));
    }

    #[test]
    fn test_title_buttons() {
        let c = client(BorderFlags::all());
        let m = metrics();
        let l = ButtonLayout::default();
        // title band is y in [4, 24), x in [4, 204)
        assert_eq!(classify(&c, &m, &l, 10, 10), Zone::Menu);
        assert_eq!(classify(&c, &m, &l, 200, 10), Zone::Close);
        assert_eq!(classify(&c, &m, &l, 170, 10), Zone::Maximize);
        assert_eq!(classify(&c, &m, &l, 150, 10), Zone::Minimize);
        assert_eq!(classify(&c, &m, &l, 100, 10), Zone::Title);
        assert_eq!(classify(&c, &m, &l, 100, 60), Zone::None);
        assert_eq!(classify(&c, &m, &l, 300, 10), Zone::None);
    }

    #[test]
    fn test_missing_buttons_do_not_take_space() {
        let c = client(BorderFlags::all() - BorderFlags::MAXIMIZE - BorderFlags::MINIMIZE);
        let m = metrics();
        let l = ButtonLayout::default();
        assert_eq!(classify(&c, &m, &l, 200, 10), Zone::Close);
        assert_eq!(classify(&c, &m, &l, 170, 10), Zone::Title);
    }

    #[test]
    fn test_shaded_suppresses_north_south() {
        let mut c = client(BorderFlags::all());
        c.status |= StatusFlags::SHADED;
        let m = metrics();
        let l = ButtonLayout::default();
        // shaded frame is 208 x 28
        assert_eq!(classify(&c, &m, &l, 1, 1), Zone::Resize(ResizeEdges::WEST));
        assert_eq!(classify(&c, &m, &l, 207, 27), Zone::Resize(ResizeEdges::EAST));
        assert_eq!(classify(&c, &m, &l, 100, 1), Zone::Outline);
        assert_eq!(classify(&c, &m, &l, 100, 60), Zone::None);
    }

    #[test]
    fn test_fixed_border_moves() {
        let c = client(BorderFlags::all() - BorderFlags::RESIZE);
        let m = metrics();
        let l = ButtonLayout::default();
        assert_eq!(classify(&c, &m, &l, 1, 1), Zone::Outline);
        let c = client(BorderFlags::OUTLINE);
        assert_eq!(classify(&c, &m, &l, 1, 1), Zone::None);
    }
}

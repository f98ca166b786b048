//! Hints Module
//!
//! WM_NORMAL_HINTS parsing and the size constraints derived from it: minimum
//! and maximum size, resize increments from a base size, the aspect band, and
//! window gravity.

use crate::wm::decorations::{FrameExtents, ResizeEdges};

/// WM_SIZE_HINTS flag bits (ICCCM 4.1.2.3)
pub mod flags {
    pub const US_POSITION: u32 = 1 << 0;
    pub const P_POSITION: u32 = 1 << 2;
    pub const P_MIN_SIZE: u32 = 1 << 4;
    pub const P_MAX_SIZE: u32 = 1 << 5;
    pub const P_RESIZE_INC: u32 = 1 << 6;
    pub const P_ASPECT: u32 = 1 << 7;
    pub const P_BASE_SIZE: u32 = 1 << 8;
    pub const P_WIN_GRAVITY: u32 = 1 << 9;
}

/// Largest size the protocol can express
const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Aspect ratio as width / height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aspect {
    pub num: u32,
    pub den: u32,
}

impl Aspect {
    /// Zero terms carry no ratio and are dropped.
    pub fn new(num: u32, den: u32) -> Option<Self> {
        (num > 0 && den > 0).then_some(Self { num, den })
    }
}

/// Window gravity (X11 numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    #[default]
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
    Static,
}

impl Gravity {
    pub fn from_raw(value: u32) -> Self {
        match value {
            2 => Self::North,
            3 => Self::NorthEast,
            4 => Self::West,
            5 => Self::Center,
            6 => Self::East,
            7 => Self::SouthWest,
            8 => Self::South,
            9 => Self::SouthEast,
            10 => Self::Static,
            _ => Self::NorthWest,
        }
    }

    /// Offset from the position a client requested to where its window sits
    /// inside a frame with the given extents.
    pub fn offset(self, extents: &FrameExtents) -> (i32, i32) {
        let (n, s, e, w) = (
            extents.north as i32,
            extents.south as i32,
            extents.east as i32,
            extents.west as i32,
        );
        let centre_x = (w - e) / 2;
        let centre_y = (n - s) / 2;
        match self {
            Self::NorthWest => (w, n),
            Self::North => (centre_x, n),
            Self::NorthEast => (-e, n),
            Self::West => (w, centre_y),
            Self::Center => (centre_x, centre_y),
            Self::East => (-e, centre_y),
            Self::SouthWest => (w, -s),
            Self::South => (centre_x, -s),
            Self::SouthEast => (-e, -s),
            Self::Static => (0, 0),
        }
    }
}

/// Size hints, normalized so every field holds a usable value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeHints {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub base_width: u32,
    pub base_height: u32,
    pub width_inc: u32,
    pub height_inc: u32,
    pub min_aspect: Option<Aspect>,
    pub max_aspect: Option<Aspect>,
    pub gravity: Gravity,
    /// Client (or user) asked for an explicit position
    pub positioned: bool,
}

impl Default for SizeHints {
    fn default() -> Self {
        Self {
            min_width: 1,
            min_height: 1,
            max_width: MAX_DIMENSION,
            max_height: MAX_DIMENSION,
            base_width: 1,
            base_height: 1,
            width_inc: 1,
            height_inc: 1,
            min_aspect: None,
            max_aspect: None,
            gravity: Gravity::NorthWest,
            positioned: false,
        }
    }
}

impl SizeHints {
    /// Parse a WM_NORMAL_HINTS property (18 CARD32 values). Short or missing
    /// properties yield the defaults; malformed fields fall back individually.
    pub fn from_wm_normal_hints(values: &[u32]) -> Self {
        let mut hints = Self::default();
        if values.len() < 18 {
            return hints;
        }
        let flag = values[0];

        hints.positioned = flag & (flags::US_POSITION | flags::P_POSITION) != 0;

        let has_min = flag & flags::P_MIN_SIZE != 0;
        let has_base = flag & flags::P_BASE_SIZE != 0;
        // ICCCM: base and min substitute for each other when only one is given
        match (has_min, has_base) {
            (true, true) => {
                hints.min_width = values[5];
                hints.min_height = values[6];
                hints.base_width = values[15];
                hints.base_height = values[16];
            }
            (true, false) => {
                hints.min_width = values[5];
                hints.min_height = values[6];
                hints.base_width = values[5];
                hints.base_height = values[6];
            }
            (false, true) => {
                hints.min_width = values[15];
                hints.min_height = values[16];
                hints.base_width = values[15];
                hints.base_height = values[16];
            }
            (false, false) => {}
        }

        if flag & flags::P_MAX_SIZE != 0 {
            hints.max_width = values[7];
            hints.max_height = values[8];
        }
        if flag & flags::P_RESIZE_INC != 0 {
            hints.width_inc = values[9];
            hints.height_inc = values[10];
        }
        if flag & flags::P_ASPECT != 0 {
            hints.min_aspect = Aspect::new(values[11], values[12]);
            hints.max_aspect = Aspect::new(values[13], values[14]);
        }
        if flag & flags::P_WIN_GRAVITY != 0 {
            hints.gravity = Gravity::from_raw(values[17]);
        }

        hints.normalized()
    }

    /// Replace nonsensical values with usable ones.
    pub fn normalized(mut self) -> Self {
        self.min_width = self.min_width.clamp(1, MAX_DIMENSION);
        self.min_height = self.min_height.clamp(1, MAX_DIMENSION);
        self.max_width = self.max_width.clamp(1, MAX_DIMENSION).max(self.min_width);
        self.max_height = self.max_height.clamp(1, MAX_DIMENSION).max(self.min_height);
        self.base_width = self.base_width.min(MAX_DIMENSION);
        self.base_height = self.base_height.min(MAX_DIMENSION);
        self.width_inc = self.width_inc.clamp(1, MAX_DIMENSION);
        self.height_inc = self.height_inc.clamp(1, MAX_DIMENSION);
        if let (Some(min), Some(max)) = (self.min_aspect, self.max_aspect) {
            // An inverted band has no solution; drop it.
            if (min.num as u64) * (max.den as u64) > (max.num as u64) * (min.den as u64) {
                self.min_aspect = None;
                self.max_aspect = None;
            }
        }
        self
    }

    /// Constrain a candidate client size.
    ///
    /// `edges` names the edges being dragged. With both axes (or none) the
    /// aspect band is enforced by shrinking the violating axis; with a single
    /// axis the other axis is derived from the dragged one.
    pub fn constrain(&self, width: i32, height: i32, edges: ResizeEdges) -> (u32, u32) {
        let mut w = quantize(width as i64, self.base_width as i64, self.width_inc as i64);
        let mut h = quantize(height as i64, self.base_height as i64, self.height_inc as i64);
        w = w.clamp(self.min_width as i64, self.max_width as i64);
        h = h.clamp(self.min_height as i64, self.max_height as i64);

        let horizontal = edges.intersects(ResizeEdges::EAST | ResizeEdges::WEST);
        let vertical = edges.intersects(ResizeEdges::NORTH | ResizeEdges::SOUTH);

        if horizontal == vertical {
            if let Some(min) = self.min_aspect {
                if w * (min.den as i64) < h * (min.num as i64) {
                    h = w * min.den as i64 / min.num as i64;
                }
            }
            if let Some(max) = self.max_aspect {
                if w * (max.den as i64) > h * (max.num as i64) {
                    w = h * max.num as i64 / max.den as i64;
                }
            }
        } else if horizontal {
            if let Some(min) = self.min_aspect {
                if w * (min.den as i64) < h * (min.num as i64) {
                    h = w * min.den as i64 / min.num as i64;
                }
            }
            if let Some(max) = self.max_aspect {
                if w * (max.den as i64) > h * (max.num as i64) {
                    h = div_ceil(w * max.den as i64, max.num as i64);
                }
            }
        } else {
            if let Some(min) = self.min_aspect {
                if w * (min.den as i64) < h * (min.num as i64) {
                    w = div_ceil(h * min.num as i64, min.den as i64);
                }
            }
            if let Some(max) = self.max_aspect {
                if w * (max.den as i64) > h * (max.num as i64) {
                    w = h * max.num as i64 / max.den as i64;
                }
            }
        }

        (
            w.clamp(1, MAX_DIMENSION as i64) as u32,
            h.clamp(1, MAX_DIMENSION as i64) as u32,
        )
    }

    /// Can the client be resized at all?
    pub fn is_fixed_size(&self) -> bool {
        self.min_width == self.max_width && self.min_height == self.max_height
    }
}

/// Snap `value` down onto the `base + k * inc` grid.
fn quantize(value: i64, base: i64, inc: i64) -> i64 {
    if inc <= 1 {
        return value;
    }
    base + (value - base).div_euclid(inc) * inc
}

fn div_ceil(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}

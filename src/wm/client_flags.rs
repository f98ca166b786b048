//! Client Flags
//!
//! Bitfield flags for client state, decorations and supported protocols, plus
//! the stacking layer type.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Status flags - per-client window manager state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatusFlags: u32 {
        const MAPPED    = 1 << 0;
        const ACTIVE    = 1 << 1;
        const MAXIMIZED = 1 << 2;
        const HIDDEN    = 1 << 3;
        const STICKY    = 1 << 4;
        const MINIMIZED = 1 << 5;
        const SHADED    = 1 << 6;
        const SHAPED    = 1 << 7;
        const NO_LIST   = 1 << 8;
        const WITHDRAWN = 1 << 9;
    }
}

impl StatusFlags {
    /// Client has a frame on screen (possibly only its title bar)
    pub fn is_shown(&self) -> bool {
        self.intersects(Self::MAPPED | Self::SHADED)
            && !self.intersects(Self::HIDDEN | Self::MINIMIZED | Self::WITHDRAWN)
    }
}

bitflags! {
    /// Border flags - decorations and allowed actions
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BorderFlags: u32 {
        const OUTLINE  = 1 << 0;
        const TITLE    = 1 << 1;
        const MINIMIZE = 1 << 2;
        const MAXIMIZE = 1 << 3;
        const CLOSE    = 1 << 4;
        const RESIZE   = 1 << 5;
        const MOVE     = 1 << 6;
    }
}

impl Default for BorderFlags {
    fn default() -> Self {
        Self::all()
    }
}

bitflags! {
    /// WM_PROTOCOLS supported by the client
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Protocols: u32 {
        const DELETE     = 1 << 0;
        const TAKE_FOCUS = 1 << 1;
    }
}

/// Number of stacking layers
pub const LAYER_COUNT: usize = 13;

/// Window layer (0 = bottom .. 12 = top)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Layer(u8);

impl Layer {
    pub const DESKTOP: Layer = Layer(0);
    pub const BELOW: Layer = Layer(2);
    pub const NORMAL: Layer = Layer(4);
    pub const ABOVE: Layer = Layer(8);
    pub const TOP: Layer = Layer(12);

    pub fn new(value: u8) -> Option<Self> {
        ((value as usize) < LAYER_COUNT).then_some(Self(value))
    }

    /// Layer from an untrusted value; out-of-range values fall back to NORMAL.
    pub fn or_normal(value: i64) -> Self {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .unwrap_or(Self::NORMAL)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Layers from top to bottom
    pub fn top_down() -> impl Iterator<Item = Layer> {
        (0..LAYER_COUNT as u8).rev().map(Layer)
    }

    /// Layers from bottom to top
    pub fn bottom_up() -> impl Iterator<Item = Layer> {
        (0..LAYER_COUNT as u8).map(Layer)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<u8> for Layer {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Layer::new(value).ok_or_else(|| format!("layer {} out of range 0..{}", value, LAYER_COUNT))
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> u8 {
        layer.0
    }
}

/// Window type (EWMH _NET_WM_WINDOW_TYPE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    #[default]
    Normal,
    Desktop,
    Dock,
    Dialog,
    Toolbar,
    Menu,
    Utility,
    Splash,
    Notification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_bounds() {
        assert_eq!(Layer::new(12), Some(Layer::TOP));
        assert_eq!(Layer::new(13), None);
        assert_eq!(Layer::or_normal(-1), Layer::NORMAL);
        assert_eq!(Layer::or_normal(99), Layer::NORMAL);
        assert_eq!(Layer::or_normal(2), Layer::BELOW);
        assert_eq!(Layer::top_down().next(), Some(Layer::TOP));
        assert_eq!(Layer::bottom_up().count(), LAYER_COUNT);
    }

    #[test]
    fn test_shown() {
        assert!(StatusFlags::MAPPED.is_shown());
        assert!(StatusFlags::SHADED.is_shown());
        assert!(!(StatusFlags::MAPPED | StatusFlags::HIDDEN).is_shown());
        assert!(!StatusFlags::MINIMIZED.is_shown());
        assert!(!(StatusFlags::SHADED | StatusFlags::MINIMIZED).is_shown());
    }
}

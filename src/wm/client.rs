use crate::shared::Geometry;
use crate::wm::client_flags::{BorderFlags, Layer, Protocols, StatusFlags, WindowType};
use crate::wm::hints::SizeHints;
use crate::wm::moveresize::Operation;

/// Window Manager client state
/// Represents a window being managed by the WM
#[derive(Debug, Clone)]
pub struct Client {
    /// X11 window ID
    pub window: u32,

    /// Frame (decoration) window ID, 0 until the frame exists
    pub frame: u32,

    /// Client-area geometry; x/y is the client window origin in root coordinates
    pub geometry: Geometry,

    /// Geometry saved when maximizing
    pub restore_geometry: Option<Geometry>,

    pub hints: SizeHints,
    pub status: StatusFlags,
    pub border: BorderFlags,
    pub layer: Layer,
    pub desktop: u32,

    /// Window this one is transient for
    pub owner: Option<u32>,

    pub protocols: Protocols,
    pub window_type: WindowType,
    pub colormap: Option<u32>,
    pub title: String,
    pub class: String,

    /// Interactive operation in progress, if any
    pub operation: Option<Operation>,

    /// UnmapNotify events caused by our own requests, still to arrive
    pub pending_unmaps: u32,
}

impl Client {
    pub fn new(window: u32, geometry: Geometry) -> Self {
        Self {
            window,
            frame: 0,
            geometry,
            restore_geometry: None,
            hints: SizeHints::default(),
            status: StatusFlags::empty(),
            border: BorderFlags::default(),
            layer: Layer::NORMAL,
            desktop: 0,
            owner: None,
            protocols: Protocols::empty(),
            window_type: WindowType::Normal,
            colormap: None,
            title: String::new(),
            class: String::new(),
            operation: None,
            pending_unmaps: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.contains(StatusFlags::ACTIVE)
    }

    pub fn is_sticky(&self) -> bool {
        self.status.contains(StatusFlags::STICKY)
    }

    /// Can hold input focus: has a visible frame on the current desktop
    pub fn can_focus(&self) -> bool {
        self.status.is_shown()
    }

    /// Client window itself is viewable (frame shown and not rolled up)
    pub fn is_viewable(&self) -> bool {
        self.status.contains(StatusFlags::MAPPED)
            && !self
                .status
                .intersects(StatusFlags::HIDDEN | StatusFlags::SHADED | StatusFlags::MINIMIZED)
    }

    /// Is an interactive move/resize running for this client?
    pub fn is_busy(&self) -> bool {
        self.operation.is_some()
    }
}

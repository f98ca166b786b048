//! Backend Module
//!
//! The window manager core never talks to the display server directly. Every
//! request it issues goes through [`Backend`], and everything it learns about a
//! window comes back as a [`WindowInfo`]. Decoration drawing and task bar
//! updates are delegated to [`Hooks`].

use std::fmt::Display;
use tracing::{debug, warn};

use crate::shared::Geometry;
use crate::wm::client::Client;
use crate::wm::client_flags::{BorderFlags, Layer, Protocols, StatusFlags, WindowType};
use crate::wm::decorations::{FrameExtents, FrameMetrics, ResizeEdges};
use crate::wm::events::ConfigureRequest;
use crate::wm::hints::SizeHints;
use crate::wm::keyboard::KeyBinding;

/// ICCCM WM_STATE values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmState {
    Withdrawn = 0,
    Normal = 1,
    Iconic = 3,
}

/// Initial state a client asks for (WM_HINTS / WM_STATE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialState {
    #[default]
    Normal,
    Iconic,
    Withdrawn,
}

/// EWMH states a client can request at map time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetStates {
    pub sticky: bool,
    pub shaded: bool,
    pub hidden: bool,
    pub maximized: bool,
    pub above: bool,
    pub below: bool,
    pub skip_taskbar: bool,
}

/// Everything the core reads from a window before managing it
#[derive(Debug, Clone)]
pub struct WindowInfo {
    /// Window position and size in root coordinates
    pub geometry: Geometry,
    pub override_redirect: bool,
    pub input_only: bool,
    /// Currently mapped
    pub viewable: bool,
    pub size_hints: SizeHints,
    pub protocols: Protocols,
    pub transient_for: Option<u32>,
    /// Raw _NET_WM_DESKTOP
    pub desktop: Option<u32>,
    pub net_states: NetStates,
    pub initial_state: InitialState,
    pub window_type: WindowType,
    /// Decorations the client asked to drop (_MOTIF_WM_HINTS)
    pub removed_border: BorderFlags,
    pub colormap: Option<u32>,
    pub title: String,
    pub class: String,
}

impl Default for WindowInfo {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            override_redirect: false,
            input_only: false,
            viewable: false,
            size_hints: SizeHints::default(),
            protocols: Protocols::empty(),
            transient_for: None,
            desktop: None,
            net_states: NetStates::default(),
            initial_state: InitialState::Normal,
            window_type: WindowType::Normal,
            removed_border: BorderFlags::empty(),
            colormap: None,
            title: String::new(),
            class: String::new(),
        }
    }
}

/// Pointer shape while a grab is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabCursor {
    Move,
    Resize(ResizeEdges),
}

/// Protocol requests issued by the window manager core.
///
/// Request failures are the backend's to log; the core relies on destroy and
/// unmap notifications to clean up after windows that vanish.
pub trait Backend {
    fn inspect_window(&mut self, window: u32) -> Option<WindowInfo>;

    /// Create a frame at `frame` (root coordinates) and reparent the client
    /// into it at `client` (frame-relative).
    fn create_frame(&mut self, window: u32, frame: Geometry, client: Geometry, foreign: bool) -> Option<u32>;
    fn destroy_frame(&mut self, frame: u32);
    fn reparent_to_root(&mut self, window: u32, x: i32, y: i32);

    fn map_window(&mut self, window: u32);
    fn unmap_window(&mut self, window: u32);
    fn configure_frame(&mut self, frame: u32, geometry: Geometry);
    /// Client window geometry relative to its frame
    fn configure_client(&mut self, window: u32, geometry: Geometry);
    fn configure_unmanaged(&mut self, window: u32, request: &ConfigureRequest);
    /// Synthetic ConfigureNotify carrying root coordinates
    fn send_configure_notify(&mut self, window: u32, geometry: Geometry);

    /// Stack frames top to bottom
    fn restack(&mut self, frames: &[u32]);

    /// `None` focuses the root window
    fn set_input_focus(&mut self, window: Option<u32>);
    fn send_take_focus(&mut self, window: u32);
    fn send_delete_window(&mut self, window: u32);
    fn kill_client(&mut self, window: u32);
    /// `None` installs the default colormap
    fn install_colormap(&mut self, colormap: Option<u32>);

    fn grab_pointer(&mut self, cursor: GrabCursor) -> bool;
    fn ungrab_pointer(&mut self);
    fn grab_keyboard(&mut self) -> bool;
    fn ungrab_keyboard(&mut self);
    fn grab_keys(&mut self, bindings: &[KeyBinding]);

    fn draw_outline(&mut self, geometry: Geometry);
    fn erase_outline(&mut self, geometry: Geometry);

    fn set_wm_state(&mut self, window: u32, state: WmState);
    fn set_net_wm_state(&mut self, window: u32, status: StatusFlags, layer: Layer);
    fn set_frame_extents(&mut self, window: u32, extents: FrameExtents);
    /// `None` publishes the window as sticky
    fn set_window_desktop(&mut self, window: u32, desktop: Option<u32>);
    fn set_active_window(&mut self, window: Option<u32>);
    fn set_client_list(&mut self, windows: &[u32]);
    fn set_client_list_stacking(&mut self, windows: &[u32]);
    fn set_current_desktop(&mut self, desktop: u32);
    fn set_desktop_count(&mut self, count: u32);

    fn flush(&mut self);
    /// Release the backend's own resources after every client is gone
    fn shutdown(&mut self);
}

/// Collaborators outside the core: theme rendering, tray widgets and menus
pub trait Hooks {
    fn draw_border(&mut self, _client: &Client, _metrics: &FrameMetrics) {}
    fn refresh_taskbar(&mut self) {}
    fn refresh_pager(&mut self) {}
    fn show_window_menu(&mut self, _window: u32, _x: i32, _y: i32) {}
    /// Housekeeping tick from the main loop
    fn timeout(&mut self) {}
}

/// Hooks that do nothing
#[derive(Debug, Default)]
pub struct NoHooks;

impl Hooks for NoHooks {}

/// Log a failed request and carry on.
///
/// BadWindow and friends are routine when clients vanish between our request
/// and the server processing it, so those only go to debug.
pub fn log_protocol_error<E: Display>(request: &str, window: u32, error: E) {
    let text = error.to_string();
    if text.contains("Window") || text.contains("Drawable") || text.contains("Match") {
        debug!("{} on window {} failed: {}", request, window, text);
    } else {
        warn!("{} on window {} failed: {}", request, window, text);
    }
}

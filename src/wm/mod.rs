//! Window Manager Module
//!
//! The core: client lifecycle, stacking, focus, desktops and interactive
//! move/resize. All state lives in one [`WindowManager`]; the display server
//! is only reached through the [`Backend`] trait.

pub mod backend;
pub mod client;
pub mod client_flags;
pub mod cycle;
pub mod decorations;
pub mod events;
pub mod ewmh;
pub mod focus;
pub mod groups;
pub mod hints;
pub mod keyboard;
pub mod lifecycle;
pub mod moveresize;
pub mod placement;
pub mod registry;
pub mod screen;
pub mod settings;
pub mod snap;
pub mod stacking;
pub mod transients;
pub mod translate;
pub mod workspace;
pub mod x11;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;
use tracing::{debug, info};

use crate::shared::Geometry;
use crate::wm::backend::{Backend, Hooks, WmState};
use crate::wm::client::Client;
use crate::wm::client_flags::StatusFlags;
use crate::wm::cycle::StackWalk;
use crate::wm::focus::FocusController;
use crate::wm::groups::GroupPolicy;
use crate::wm::keyboard::KeyBindings;
use crate::wm::placement::Cascade;
use crate::wm::registry::ClientRegistry;
use crate::wm::screen::ScreenModel;
use crate::wm::settings::Settings;
use crate::wm::stacking::TrayWindow;
use crate::wm::workspace::DesktopManager;

/// Errors that stop the window manager from starting
#[derive(Debug, Error)]
pub enum WmError {
    #[error("another window manager is already running (selection owner 0x{0:x}); use --replace")]
    AnotherWmRunning(u32),

    #[error("previous window manager did not exit within {0} seconds")]
    ReplaceTimeout(u64),

    #[error("failed to connect to the X server: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),

    #[error("X11 connection error: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    #[error("X11 request failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),

    #[error("X11 request failed: {0}")]
    ReplyOrId(#[from] x11rb::errors::ReplyOrIdError),
}

pub struct WindowManager {
    backend: Box<dyn Backend>,
    hooks: Box<dyn Hooks>,
    groups: Box<dyn GroupPolicy>,
    settings: Settings,
    screens: ScreenModel,
    registry: ClientRegistry,
    desktops: DesktopManager,
    focus: FocusController,
    walk: Option<StackWalk>,
    trays: Vec<TrayWindow>,
    placement: Cascade,
    keys: KeyBindings,
    /// Client holding the pointer grab for a move/resize
    interaction: Option<u32>,
}

impl WindowManager {
    pub fn new(
        mut backend: Box<dyn Backend>,
        hooks: Box<dyn Hooks>,
        groups: Box<dyn GroupPolicy>,
        settings: Settings,
        screens: ScreenModel,
        keys: KeyBindings,
    ) -> Self {
        info!(
            "Initializing window manager ({} desktops, {} screens)",
            settings.desktop_count,
            screens.monitors().len()
        );

        let desktops = DesktopManager::new(settings.desktop_count);
        backend.set_desktop_count(desktops.count());
        backend.set_current_desktop(desktops.current());
        backend.set_active_window(None);
        backend.set_client_list(&[]);
        backend.set_client_list_stacking(&[]);
        backend.grab_keys(keys.all());
        backend.flush();

        let focus = FocusController::new(settings.focus_model);
        Self {
            backend,
            hooks,
            groups,
            placement: Cascade::new(settings.cascade_offset),
            settings,
            screens,
            registry: ClientRegistry::new(),
            desktops,
            focus,
            walk: None,
            trays: Vec::new(),
            keys,
            interaction: None,
        }
    }

    pub fn client(&self, window: u32) -> Option<&Client> {
        self.registry.get(window)
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn active(&self) -> Option<u32> {
        self.focus.active()
    }

    #[cfg(test)]
    pub fn interaction(&self) -> Option<u32> {
        self.interaction
    }

    pub fn flush(&mut self) {
        self.backend.flush();
    }

    pub fn update_screens(&mut self, root: Geometry, monitors: Vec<Geometry>) {
        self.screens.set_root(root);
        self.screens.update(monitors);
    }

    /// Ask the theme collaborator to repaint a frame.
    fn redraw(&mut self, window: u32) {
        if let Some(client) = self.registry.get(window) {
            self.hooks.draw_border(client, &self.settings.metrics);
        }
    }

    /// Frame rectangle of a client in root coordinates
    fn frame_of(&self, client: &Client) -> Geometry {
        self.settings.metrics.client_frame(client)
    }

    /// Publish WM_STATE, _NET_WM_STATE and _NET_WM_DESKTOP for a client.
    fn publish_state(&mut self, window: u32) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        let wm_state = if client.status.contains(StatusFlags::WITHDRAWN) {
            WmState::Withdrawn
        } else if client.status.contains(StatusFlags::MINIMIZED) {
            WmState::Iconic
        } else {
            WmState::Normal
        };
        let desktop = (!client.is_sticky()).then_some(client.desktop);
        let (status, layer) = (client.status, client.layer);
        self.backend.set_wm_state(window, wm_state);
        self.backend.set_net_wm_state(window, status, layer);
        self.backend.set_window_desktop(window, desktop);
    }

    /// Publish _NET_CLIENT_LIST in mapping order.
    fn publish_client_list(&mut self) {
        let windows: Vec<u32> = self.registry.managed_order().to_vec();
        self.backend.set_client_list(&windows);
    }

    /// Push a client's geometry to its frame and window.
    ///
    /// The client is told its new root position with a synthetic
    /// ConfigureNotify, since a reparented window only sees frame-relative
    /// coordinates.
    fn apply_geometry(&mut self, window: u32) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        let frame = self.frame_of(client);
        let extents = self.settings.metrics.extents(client.border);
        let inner = Geometry::new(
            extents.west as i32,
            extents.north as i32,
            client.geometry.width,
            client.geometry.height,
        );
        let (frame_window, geometry) = (client.frame, client.geometry);
        debug!("Configuring window {} to {:?}", window, geometry);
        self.backend.configure_frame(frame_window, frame);
        self.backend.configure_client(window, inner);
        self.backend.send_configure_notify(window, geometry);
    }
}

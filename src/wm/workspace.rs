//! Workspace Module
//!
//! Virtual desktops. A client is visible when it is sticky or sits on the
//! current desktop; everything else carries HIDDEN and has its frame unmapped.

use tracing::{debug, info, warn};

use crate::wm::WindowManager;
use crate::wm::client::Client;
use crate::wm::client_flags::StatusFlags;

/// _NET_WM_DESKTOP value for "all desktops"
pub const ALL_DESKTOPS: u32 = 0xFFFF_FFFF;

#[derive(Debug, Clone)]
pub struct DesktopManager {
    current: u32,
    count: u32,
}

impl DesktopManager {
    pub fn new(count: u32) -> Self {
        Self {
            current: 0,
            count: count.max(1),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_valid(&self, desktop: u32) -> bool {
        desktop < self.count
    }

    /// Desktop for a raw _NET_WM_DESKTOP value: `None` means sticky,
    /// out-of-range values land on the current desktop.
    pub fn resolve(&self, raw: Option<u32>) -> Option<u32> {
        match raw {
            Some(ALL_DESKTOPS) => None,
            Some(desktop) if self.is_valid(desktop) => Some(desktop),
            Some(desktop) => {
                warn!("Desktop {} out of range, using {}", desktop, self.current);
                Some(self.current)
            }
            None => Some(self.current),
        }
    }

    /// Should this client be on screen right now?
    pub fn shows(&self, client: &Client) -> bool {
        client.is_sticky() || client.desktop == self.current
    }
}

impl WindowManager {
    /// Switch to another desktop. Clients keep their MAPPED/MINIMIZED state;
    /// only HIDDEN and the frame mapping change.
    pub fn change_desktop(&mut self, desktop: u32) {
        if !self.desktops.is_valid(desktop) {
            warn!("Ignoring switch to desktop {} (have {})", desktop, self.desktops.count());
            return;
        }
        if desktop == self.desktops.current {
            return;
        }
        info!("Switching to desktop {}", desktop);
        self.desktops.current = desktop;

        // Show the new desktop before hiding the old one to avoid exposing the root
        let windows = self.registry.top_down();
        for &window in &windows {
            if self.registry.get(window).is_some_and(|c| self.desktops.shows(c)) {
                self.update_visibility(window);
            }
        }
        for &window in &windows {
            if self.registry.get(window).is_some_and(|c| !self.desktops.shows(c)) {
                self.update_visibility(window);
            }
        }

        self.backend.set_current_desktop(desktop);

        let active_hidden = self
            .focus
            .active()
            .and_then(|w| self.registry.get(w))
            .is_some_and(|c| !c.can_focus());
        if active_hidden {
            self.focus_top();
        }

        self.hooks.refresh_pager();
        self.hooks.refresh_taskbar();
        self.restack();
    }

    /// Bring HIDDEN and the frame mapping in line with the current desktop.
    /// Returns true when the visibility changed.
    pub(crate) fn update_visibility(&mut self, window: u32) -> bool {
        let Some(client) = self.registry.get_mut(window) else {
            return false;
        };
        let visible = client.is_sticky() || client.desktop == self.desktops.current;
        let hidden = client.status.contains(StatusFlags::HIDDEN);
        if visible != hidden {
            return false;
        }
        let has_frame = client.status.intersects(StatusFlags::MAPPED | StatusFlags::SHADED)
            && !client.status.intersects(StatusFlags::MINIMIZED | StatusFlags::WITHDRAWN);
        client.status.set(StatusFlags::HIDDEN, !visible);
        let frame = client.frame;
        debug!("Window {} is now {}", window, if visible { "shown" } else { "hidden" });
        if has_frame {
            if visible {
                self.backend.map_window(frame);
            } else {
                self.backend.unmap_window(frame);
            }
        }
        true
    }
}

//! Focus Module
//!
//! Tracks the active client and moves input focus. The ACTIVE status flag
//! and `FocusController::active` always name the same client.

use tracing::debug;

use crate::wm::WindowManager;
use crate::wm::client_flags::{Layer, Protocols, StatusFlags};
use crate::wm::settings::FocusModel;

#[derive(Debug, Clone)]
pub struct FocusController {
    model: FocusModel,
    active: Option<u32>,
}

impl FocusController {
    pub fn new(model: FocusModel) -> Self {
        Self { model, active: None }
    }

    pub fn model(&self) -> FocusModel {
        self.model
    }

    pub fn active(&self) -> Option<u32> {
        self.active
    }

    pub fn is_active(&self, window: u32) -> bool {
        self.active == Some(window)
    }
}

impl WindowManager {
    /// Make a client the active one and give it input focus.
    pub fn focus_client(&mut self, window: u32) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        if !client.can_focus() {
            debug!("Window {} cannot take focus", window);
            return;
        }

        if self.focus.is_active(window) {
            self.direct_input_focus(window);
            return;
        }

        debug!("Focusing window {}", window);
        if let Some(previous) = self.focus.active.take() {
            if let Some(old) = self.registry.get_mut(previous) {
                old.status.remove(StatusFlags::ACTIVE);
            }
            self.redraw(previous);
        }

        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        client.status.insert(StatusFlags::ACTIVE);
        let take_focus = client.protocols.contains(Protocols::TAKE_FOCUS);
        let colormap = client.colormap;
        self.focus.active = Some(window);

        if take_focus {
            self.backend.send_take_focus(window);
        }
        self.backend.install_colormap(colormap);
        self.redraw(window);
        self.backend.set_active_window(Some(window));
        self.hooks.refresh_taskbar();
        self.direct_input_focus(window);
    }

    /// Input focus goes to the client window when it can receive it, otherwise
    /// to the root so keyboard bindings keep working.
    fn direct_input_focus(&mut self, window: u32) {
        let viewable = self.registry.get(window).is_some_and(|c| c.is_viewable());
        self.backend.set_input_focus(viewable.then_some(window));
    }

    /// Drop the active relation entirely.
    pub(crate) fn clear_active(&mut self) {
        if let Some(previous) = self.focus.active.take() {
            debug!("Clearing focus from window {}", previous);
            if let Some(old) = self.registry.get_mut(previous) {
                old.status.remove(StatusFlags::ACTIVE);
            }
            self.redraw(previous);
        }
        self.backend.set_input_focus(None);
        self.backend.set_active_window(None);
        self.backend.install_colormap(None);
        self.hooks.refresh_taskbar();
    }

    /// Pass focus to the next client below `from` in stacking order: first the
    /// rest of its layer, then the lower layers from the top down.
    pub fn focus_next_stacked(&mut self, from: u32) {
        let Some(layer) = self.registry.get(from).map(|c| c.layer) else {
            self.clear_active();
            return;
        };

        let own = self.registry.layer(layer);
        let start = own.iter().position(|&w| w == from).map_or(0, |p| p + 1);
        let mut candidates: Vec<u32> = own[start..].to_vec();
        for lower in Layer::top_down().filter(|l| *l < layer) {
            candidates.extend_from_slice(self.registry.layer(lower));
        }

        let next = candidates
            .into_iter()
            .find(|&w| w != from && self.registry.get(w).is_some_and(|c| c.can_focus()));
        match next {
            Some(window) => self.focus_client(window),
            None => self.clear_active(),
        }
    }

    /// Focus the topmost client that can take focus, if any.
    pub(crate) fn focus_top(&mut self) {
        let top = self
            .registry
            .top_down()
            .into_iter()
            .find(|&w| self.registry.get(w).is_some_and(|c| c.can_focus()));
        match top {
            Some(window) => self.focus_client(window),
            None => self.clear_active(),
        }
    }

    /// Move focus away from a client that is about to stop being eligible.
    pub(crate) fn release_focus(&mut self, window: u32) {
        if self.focus.is_active(window) {
            self.focus_next_stacked(window);
            if self.focus.is_active(window) {
                self.clear_active();
            }
        }
    }
}

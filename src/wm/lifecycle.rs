//! Client Lifecycle
//!
//! Managing and releasing windows, and every state transition in between:
//! minimize, restore, shade, maximize, desktop and sticky changes, withdraw.
//! Transitions that follow the owner recurse over transients.

use tracing::{debug, info, warn};

use crate::shared::Geometry;
use crate::wm::WindowManager;
use crate::wm::backend::InitialState;
use crate::wm::client::Client;
use crate::wm::client_flags::{BorderFlags, Layer, Protocols, StatusFlags, WindowType};
use crate::wm::decorations::ResizeEdges;
use crate::wm::events::{ConfigureRequest, StackMode};
use crate::wm::groups::GroupMatch;
use crate::wm::placement::{center_over, maximized_geometry};
use crate::wm::transients::{direct_transients, transient_closure};

/// Decorations and placement a window type implies
fn type_defaults(client: &mut Client) {
    match client.window_type {
        WindowType::Desktop => {
            client.border = BorderFlags::empty();
            client.layer = Layer::DESKTOP;
            client.status |= StatusFlags::STICKY | StatusFlags::NO_LIST;
        }
        WindowType::Dock => {
            client.border = BorderFlags::empty();
            client.layer = Layer::ABOVE;
            client.status |= StatusFlags::STICKY | StatusFlags::NO_LIST;
        }
        WindowType::Splash | WindowType::Notification => {
            client.border = BorderFlags::empty();
            client.layer = Layer::ABOVE;
            client.status |= StatusFlags::NO_LIST;
        }
        WindowType::Toolbar | WindowType::Menu | WindowType::Utility => {
            client.border.remove(BorderFlags::MINIMIZE | BorderFlags::MAXIMIZE);
        }
        WindowType::Normal | WindowType::Dialog => {}
    }
}

impl WindowManager {
    /// Start managing a window. Returns `None` for windows that are already
    /// managed or must not be managed.
    ///
    /// `already_mapped` is set for windows found at startup, `foreign` for
    /// windows whose events we have not selected yet.
    pub fn add_client(&mut self, window: u32, already_mapped: bool, foreign: bool) -> Option<u32> {
        if self.registry.resolve(window).is_some() {
            return None;
        }
        let Some(info) = self.backend.inspect_window(window) else {
            debug!("Window {} vanished before it could be managed", window);
            return None;
        };
        if info.override_redirect || info.input_only {
            return None;
        }

        let mut client = Client::new(window, info.geometry);
        client.hints = info.size_hints.normalized();
        client.protocols = info.protocols;
        client.window_type = info.window_type;
        client.colormap = info.colormap;
        client.title = info.title;
        client.class = info.class;
        client.owner = info.transient_for.filter(|&owner| owner != window);
        type_defaults(&mut client);
        client.border.remove(info.removed_border);

        match self.desktops.resolve(info.desktop) {
            Some(desktop) => client.desktop = desktop,
            None => {
                client.desktop = self.desktops.current();
                client.status.insert(StatusFlags::STICKY);
            }
        }
        let states = info.net_states;
        if states.sticky {
            client.status.insert(StatusFlags::STICKY);
        }
        if states.skip_taskbar {
            client.status.insert(StatusFlags::NO_LIST);
        }
        if states.above {
            client.layer = Layer::ABOVE;
        } else if states.below {
            client.layer = Layer::BELOW;
        }

        let options = self.groups.options_for(&GroupMatch {
            class: &client.class,
            title: &client.title,
            window_type: client.window_type,
        });
        if let Some(layer) = options.layer {
            client.layer = layer;
        }
        if let Some(desktop) = options.desktop {
            if self.desktops.is_valid(desktop) {
                client.desktop = desktop;
            } else {
                warn!("Group desktop {} out of range for window {}", desktop, window);
            }
        }
        if options.sticky {
            client.status.insert(StatusFlags::STICKY);
        }
        if options.no_list {
            client.status.insert(StatusFlags::NO_LIST);
        }
        if options.no_border {
            client.border.remove(BorderFlags::OUTLINE | BorderFlags::TITLE);
        }
        if options.no_title {
            client.border.remove(BorderFlags::TITLE);
        }

        let owner_frame = client.owner.and_then(|owner| self.registry.get(owner)).map(|owner| {
            client.desktop = owner.desktop;
            if owner.is_sticky() {
                client.status.insert(StatusFlags::STICKY);
            }
            if options.layer.is_none() {
                client.layer = owner.layer;
            }
            self.frame_of(owner)
        });

        if client.hints.is_fixed_size() {
            client.border.remove(BorderFlags::RESIZE | BorderFlags::MAXIMIZE);
        }
        let (width, height) = client.hints.constrain(
            client.geometry.width as i32,
            client.geometry.height as i32,
            ResizeEdges::empty(),
        );
        client.geometry.width = width;
        client.geometry.height = height;

        // Position: honour the request through gravity, otherwise place
        let extents = self.settings.metrics.extents(client.border);
        if already_mapped || client.hints.positioned {
            let (dx, dy) = client.hints.gravity.offset(&extents);
            client.geometry.x += dx;
            client.geometry.y += dy;
        } else {
            let frame = self.frame_of(&client);
            let (x, y) = match owner_frame {
                Some(owner) => {
                    let screen = self.screens.screen_for(&owner);
                    center_over(owner, frame.width, frame.height, screen)
                }
                None => {
                    let index = self.placement_screen();
                    let screen = self.screens.monitors().get(index).copied().unwrap_or(self.screens.root());
                    self.placement.place(index, screen, frame.width, frame.height)
                }
            };
            client.geometry.x = x + extents.west as i32;
            client.geometry.y = y + extents.north as i32;
        }

        let frame_geometry = self.frame_of(&client);
        let inner = Geometry::new(
            extents.west as i32,
            extents.north as i32,
            client.geometry.width,
            client.geometry.height,
        );
        let Some(frame) = self.backend.create_frame(window, frame_geometry, inner, foreign) else {
            warn!("Could not create a frame for window {}", window);
            return None;
        };
        client.frame = frame;
        if already_mapped {
            // reparenting a mapped window unmaps it
            client.pending_unmaps += 1;
        }
        client.status.insert(StatusFlags::MAPPED);
        let visible = self.desktops.shows(&client);
        client.status.set(StatusFlags::HIDDEN, !visible);

        info!(
            "Managing window {} ('{}', class '{}') in frame {} at {:?}",
            window, client.title, client.class, frame, client.geometry
        );
        if !self.registry.insert(client) {
            self.backend.destroy_frame(frame);
            return None;
        }

        self.backend.set_frame_extents(window, extents);
        self.backend.map_window(window);
        if visible {
            self.backend.map_window(frame);
        }
        self.publish_state(window);
        self.publish_client_list();
        self.redraw(window);
        self.hooks.refresh_taskbar();
        self.hooks.refresh_pager();

        match info.initial_state {
            InitialState::Withdrawn => self.withdraw(window),
            InitialState::Iconic => self.minimize(window),
            InitialState::Normal if states.hidden => self.minimize(window),
            InitialState::Normal => {}
        }
        if states.shaded {
            self.shade(window);
        }
        if states.maximized || options.maximized {
            self.maximize(window);
        }

        if self.settings.focus_new && self.registry.get(window).is_some_and(|c| c.can_focus()) {
            self.focus_client(window);
        }
        self.restack();
        Some(window)
    }

    /// Screen new windows are placed on: the one holding the active client.
    fn placement_screen(&self) -> usize {
        self.focus
            .active()
            .and_then(|w| self.registry.get(w))
            .map(|c| {
                let (x, y) = self.frame_of(c).center();
                self.screens.index_at(x, y)
            })
            .unwrap_or(0)
    }

    /// Stop managing a window that is gone.
    pub fn remove_client(&mut self, window: u32) {
        if !self.registry.contains(window) {
            return;
        }
        self.cancel_interaction(window);
        self.release_focus(window);

        let Some(client) = self.registry.remove(window) else {
            return;
        };
        info!("Unmanaging window {}", window);
        self.backend.destroy_frame(client.frame);
        self.publish_client_list();
        self.hooks.refresh_taskbar();
        self.hooks.refresh_pager();
        self.restack();
    }

    /// Hand every window back to the root so it outlives us, then release
    /// the backend.
    pub fn shutdown(mut self) {
        info!("Shutting down, releasing {} windows", self.registry.len());
        if let Some(window) = self.interaction {
            self.cancel_interaction(window);
        }
        self.walk = None;

        let windows: Vec<u32> = self.registry.managed_order().to_vec();
        for window in windows {
            let Some(client) = self.registry.remove(window) else {
                continue;
            };
            let extents = self.settings.metrics.extents(client.border);
            let (dx, dy) = client.hints.gravity.offset(&extents);
            self.backend
                .reparent_to_root(window, client.geometry.x - dx, client.geometry.y - dy);
            if !client.status.contains(StatusFlags::WITHDRAWN) {
                self.backend.map_window(window);
            }
            self.backend.destroy_frame(client.frame);
        }

        self.backend.set_input_focus(None);
        self.backend.set_active_window(None);
        self.backend.set_client_list(&[]);
        self.backend.set_client_list_stacking(&[]);
        self.backend.shutdown();
        self.backend.flush();
    }

    /// Iconify a client and, recursively, its visible transients.
    pub fn minimize(&mut self, window: u32) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        if client.status.intersects(StatusFlags::WITHDRAWN | StatusFlags::MINIMIZED) {
            return;
        }
        info!("Minimizing window {}", window);
        self.cancel_interaction(window);
        self.minimize_tree(window);

        if let Some(active) = self.focus.active() {
            if self
                .registry
                .get(active)
                .is_some_and(|c| c.status.contains(StatusFlags::MINIMIZED))
            {
                self.release_focus(active);
            }
        }
        self.hooks.refresh_taskbar();
        self.hooks.refresh_pager();
        self.restack();
    }

    fn minimize_tree(&mut self, window: u32) {
        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        let was_shown = client.status.is_shown();
        // set first so owner loops stop here
        client.status.insert(StatusFlags::MINIMIZED);
        client.status.remove(StatusFlags::MAPPED);
        let frame = client.frame;
        if was_shown {
            self.backend.unmap_window(frame);
        }
        self.publish_state(window);
        self.redraw(window);

        for transient in direct_transients(&self.registry, window) {
            let eligible = self.registry.get(transient).is_some_and(|t| {
                t.status.intersects(StatusFlags::MAPPED | StatusFlags::SHADED)
                    && !t.status.contains(StatusFlags::MINIMIZED)
            });
            if eligible {
                self.cancel_interaction(transient);
                self.minimize_tree(transient);
            }
        }
    }

    /// Bring a minimized or withdrawn client (and its minimized transients)
    /// back. With `raise` it is also focused and raised.
    pub fn restore(&mut self, window: u32, raise: bool) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        let (sticky, desktop) = (client.is_sticky(), client.desktop);
        debug!("Restoring window {}", window);
        self.restore_tree(window);

        if !sticky && desktop != self.desktops.current() {
            self.change_desktop(desktop);
        }
        if raise {
            self.focus_client(window);
            self.raise(window);
        } else {
            self.restack();
        }
        self.hooks.refresh_taskbar();
        self.hooks.refresh_pager();
    }

    fn restore_tree(&mut self, window: u32) {
        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        let was_shown = client.status.is_shown();
        let was_withdrawn = client.status.contains(StatusFlags::WITHDRAWN);
        client.status.remove(StatusFlags::MINIMIZED | StatusFlags::WITHDRAWN);
        client.status.insert(StatusFlags::MAPPED);
        let shown = client.status.is_shown();
        let shaded = client.status.contains(StatusFlags::SHADED);
        let frame = client.frame;

        if was_withdrawn && !shaded {
            self.backend.map_window(window);
        }
        if shown && !was_shown {
            self.backend.map_window(frame);
        }
        self.publish_state(window);
        self.redraw(window);

        for transient in direct_transients(&self.registry, window) {
            let eligible = self.registry.get(transient).is_some_and(|t| {
                t.status.contains(StatusFlags::MINIMIZED)
                    && !t.status.intersects(StatusFlags::MAPPED | StatusFlags::SHADED)
            });
            if eligible {
                self.restore_tree(transient);
            }
        }
    }

    /// Roll a client up into its title bar.
    pub fn shade(&mut self, window: u32) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        if !client.border.contains(BorderFlags::TITLE)
            || client
                .status
                .intersects(StatusFlags::SHADED | StatusFlags::MINIMIZED | StatusFlags::WITHDRAWN)
        {
            return;
        }
        debug!("Shading window {}", window);
        self.cancel_interaction(window);
        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        client.status.insert(StatusFlags::SHADED);
        let unmap = client.status.contains(StatusFlags::MAPPED);
        if unmap {
            client.pending_unmaps += 1;
        }
        let frame = client.frame;
        if unmap {
            self.backend.unmap_window(window);
        }
        self.configure_frame_only(window, frame);
        self.after_shade_change(window);
    }

    pub fn unshade(&mut self, window: u32) {
        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        if !client.status.contains(StatusFlags::SHADED) {
            return;
        }
        debug!("Unshading window {}", window);
        client.status.remove(StatusFlags::SHADED);
        let map = client.status.contains(StatusFlags::MAPPED);
        let frame = client.frame;
        if map {
            self.backend.map_window(window);
        }
        self.configure_frame_only(window, frame);
        self.after_shade_change(window);
    }

    fn configure_frame_only(&mut self, window: u32, frame: u32) {
        if let Some(client) = self.registry.get(window) {
            let geometry = self.frame_of(client);
            self.backend.configure_frame(frame, geometry);
        }
    }

    fn after_shade_change(&mut self, window: u32) {
        self.publish_state(window);
        self.redraw(window);
        if self.focus.is_active(window) {
            // shaded clients keep ACTIVE but input goes to the root
            let viewable = self.registry.get(window).is_some_and(|c| c.is_viewable());
            self.backend.set_input_focus(viewable.then_some(window));
        }
    }

    /// Toggle maximization.
    pub fn maximize(&mut self, window: u32) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        if !client.border.contains(BorderFlags::MAXIMIZE)
            || client.status.intersects(StatusFlags::MINIMIZED | StatusFlags::WITHDRAWN)
        {
            return;
        }
        self.cancel_interaction(window);
        self.unshade(window);

        let Some(client) = self.registry.get(window) else {
            return;
        };
        let screen = self.screens.screen_for(&self.frame_of(client));
        let extents = self.settings.metrics.extents(client.border);
        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        if client.status.contains(StatusFlags::MAXIMIZED) {
            info!("Unmaximizing window {}", window);
            client.status.remove(StatusFlags::MAXIMIZED);
            if let Some(geometry) = client.restore_geometry.take() {
                client.geometry = geometry;
            }
        } else {
            info!("Maximizing window {}", window);
            client.restore_geometry = Some(client.geometry);
            client.geometry = maximized_geometry(screen, &extents, &client.hints);
            client.status.insert(StatusFlags::MAXIMIZED);
        }
        self.apply_geometry(window);
        self.publish_state(window);
        self.redraw(window);
    }

    /// Make a client (and its transients) visible on every desktop, or pin it
    /// back to its own desktop.
    pub fn set_sticky(&mut self, window: u32, sticky: bool) {
        if self.registry.get(window).is_none_or(|c| c.is_sticky() == sticky) {
            return;
        }
        debug!("Setting sticky={} on window {}", sticky, window);
        let current = self.desktops.current();
        for member in transient_closure(&self.registry, window) {
            if let Some(client) = self.registry.get_mut(member) {
                client.status.set(StatusFlags::STICKY, sticky);
                if sticky {
                    client.desktop = current;
                }
            }
            self.publish_state(member);
            self.update_visibility(member);
        }
        self.after_desktop_move();
    }

    /// Move a client (and its transients) to another desktop.
    pub fn set_desktop(&mut self, window: u32, desktop: u32) {
        if !self.desktops.is_valid(desktop) {
            warn!("Desktop {} out of range for window {}", desktop, window);
            return;
        }
        let Some(client) = self.registry.get(window) else {
            return;
        };
        if client.is_sticky() || client.desktop == desktop {
            return;
        }
        debug!("Moving window {} to desktop {}", window, desktop);
        for member in transient_closure(&self.registry, window) {
            if let Some(client) = self.registry.get_mut(member) {
                if client.is_sticky() {
                    continue;
                }
                client.desktop = desktop;
            }
            self.publish_state(member);
            self.update_visibility(member);
        }
        self.after_desktop_move();
    }

    fn after_desktop_move(&mut self) {
        if let Some(active) = self.focus.active() {
            if self.registry.get(active).is_some_and(|c| !c.can_focus()) {
                self.release_focus(active);
            }
        }
        self.hooks.refresh_pager();
        self.hooks.refresh_taskbar();
        self.restack();
    }

    /// The client unmapped itself: keep it managed but off screen until it
    /// maps again.
    pub fn withdraw(&mut self, window: u32) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        if client.status.contains(StatusFlags::WITHDRAWN) {
            return;
        }
        info!("Window {} withdrawn", window);
        self.cancel_interaction(window);
        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        let was_shown = client.status.is_shown();
        client
            .status
            .remove(StatusFlags::MAPPED | StatusFlags::MINIMIZED | StatusFlags::SHADED);
        client.status.insert(StatusFlags::WITHDRAWN);
        let frame = client.frame;
        if was_shown {
            self.backend.unmap_window(frame);
        }
        self.publish_state(window);
        self.release_focus(window);
        self.hooks.refresh_taskbar();
        self.restack();
    }

    /// Ask a client to close, or kill it when it cannot be asked.
    pub fn close(&mut self, window: u32) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        if client.protocols.contains(Protocols::DELETE) {
            debug!("Sending WM_DELETE_WINDOW to {}", window);
            self.backend.send_delete_window(window);
        } else {
            info!("Killing window {}", window);
            self.backend.kill_client(window);
        }
    }

    /// Apply a geometry/stacking request from a client.
    pub fn configure_request(&mut self, window: u32, request: &ConfigureRequest) {
        if !self.registry.contains(window) {
            self.backend.configure_unmanaged(window, request);
            return;
        }
        self.cancel_interaction(window);

        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        if !client.status.contains(StatusFlags::MAXIMIZED) {
            let extents = self.settings.metrics.extents(client.border);
            let (dx, dy) = client.hints.gravity.offset(&extents);
            let mut geometry = client.geometry;
            if let Some(width) = request.width {
                geometry.width = width;
            }
            if let Some(height) = request.height {
                geometry.height = height;
            }
            let (width, height) =
                client
                    .hints
                    .constrain(geometry.width as i32, geometry.height as i32, ResizeEdges::empty());
            geometry.width = width;
            geometry.height = height;
            if let Some(x) = request.x {
                geometry.x = x + dx;
            }
            if let Some(y) = request.y {
                geometry.y = y + dy;
            }
            debug!("Window {} requests {:?}", window, geometry);
            client.geometry = geometry;
        }
        // ICCCM wants a ConfigureNotify even when nothing changed
        self.apply_geometry(window);

        match request.stack_mode {
            Some(StackMode::Above) => self.raise(window),
            Some(StackMode::Below) => self.lower(window),
            None => {}
        }
    }

    /// Re-read size hints, protocols and names after a property change.
    pub fn refresh_hints(&mut self, window: u32) {
        if !self.registry.contains(window) {
            return;
        }
        let Some(info) = self.backend.inspect_window(window) else {
            return;
        };
        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        client.hints = info.size_hints.normalized();
        client.protocols = info.protocols;
        client.title = info.title;
        client.class = info.class;

        let (width, height) = client.hints.constrain(
            client.geometry.width as i32,
            client.geometry.height as i32,
            ResizeEdges::empty(),
        );
        let resized = (width, height) != (client.geometry.width, client.geometry.height);
        if resized && client.operation.is_none() {
            client.geometry.width = width;
            client.geometry.height = height;
            self.apply_geometry(window);
        }
        self.redraw(window);
        self.hooks.refresh_taskbar();
    }

    /// A client installed a new colormap.
    pub fn set_colormap(&mut self, window: u32, colormap: Option<u32>) {
        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        client.colormap = colormap;
        if self.focus.is_active(window) {
            self.backend.install_colormap(colormap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::backend::NetStates;
    use crate::wm::groups::{GroupRule, RuleGroups};
    use crate::wm::hints::{Gravity, SizeHints};
    use crate::wm::testing::{Request, TestWm};

    #[test]
    fn test_add_rejects_duplicates_and_unmanageable() {
        let mut t = TestWm::new();
        assert_eq!(t.manage(1, Geometry::new(0, 0, 100, 100)), Some(1));
        assert_eq!(t.wm.add_client(1, false, false), None);
        let frame = t.frame(1);
        assert_eq!(t.wm.add_client(frame, false, false), None);
        t.info(2, Geometry::new(0, 0, 10, 10)).override_redirect = true;
        assert_eq!(t.wm.add_client(2, false, false), None);
        // unknown to the backend
        assert_eq!(t.wm.add_client(3, false, false), None);
        assert_eq!(t.wm.registry().len(), 1);
    }

    #[test]
    fn test_add_publishes_and_focuses() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(10, 10, 100, 100));
        let frame = t.frame(1);
        let reqs = t.requests();
        assert!(reqs.contains(&Request::Map(1)));
        assert!(reqs.contains(&Request::Map(frame)));
        assert!(reqs.contains(&Request::ClientList(vec![1])));
        assert!(reqs.contains(&Request::WindowDesktop(1, Some(0))));
        assert!(matches!(reqs.last(), Some(Request::ClientListStacking(_))));
        assert_eq!(t.wm.active(), Some(1));
        assert_eq!(t.status(1), StatusFlags::MAPPED | StatusFlags::ACTIVE);
    }

    #[test]
    fn test_gravity_and_cascade_placement() {
        let mut t = TestWm::new();
        {
            let mut info = t.info(1, Geometry::new(100, 100, 200, 100));
            info.size_hints = SizeHints {
                positioned: true,
                ..SizeHints::default()
            };
        }
        t.wm.add_client(1, false, false);
        // north-west gravity: the frame corner lands on the requested spot
        assert_eq!(t.geometry(1), Geometry::new(104, 124, 200, 100));

        t.info(2, Geometry::new(500, 500, 200, 100));
        t.wm.add_client(2, false, false);
        assert_eq!(t.geometry(2), Geometry::new(4, 24, 200, 100));
        t.info(3, Geometry::new(500, 500, 200, 100));
        t.wm.add_client(3, false, false);
        assert_eq!(t.geometry(3), Geometry::new(28, 48, 200, 100));
    }

    #[test]
    fn test_transient_inherits_owner_desktop_and_layer() {
        let mut t = TestWm::new();
        t.info(1, Geometry::new(0, 0, 400, 300)).desktop = Some(2);
        t.wm.add_client(1, false, false);
        t.wm.set_layer(1, Layer::ABOVE);
        {
            let mut info = t.info(2, Geometry::new(0, 0, 100, 100));
            info.transient_for = Some(1);
            info.desktop = Some(3);
        }
        t.wm.add_client(2, false, false);
        let transient = t.wm.client(2).cloned();
        assert_eq!(transient.as_ref().map(|c| c.desktop), Some(2));
        assert_eq!(transient.as_ref().map(|c| c.layer), Some(Layer::ABOVE));
        assert_eq!(transient.as_ref().and_then(|c| c.owner), Some(1));

        // transient for itself: no owner
        t.info(3, Geometry::new(0, 0, 100, 100)).transient_for = Some(3);
        t.wm.add_client(3, false, false);
        assert_eq!(t.wm.client(3).and_then(|c| c.owner), None);
    }

    #[test]
    fn test_group_options_apply() {
        let mut t = TestWm::with_groups(RuleGroups::new(vec![GroupRule {
            class: Some("panel".into()),
            layer: Some(Layer::TOP),
            no_list: true,
            no_title: true,
            ..GroupRule::default()
        }]));
        t.info(1, Geometry::new(0, 0, 100, 100)).class = "panel".into();
        t.wm.add_client(1, false, false);
        let client = t.wm.client(1).cloned();
        assert_eq!(client.as_ref().map(|c| c.layer), Some(Layer::TOP));
        assert!(client.as_ref().is_some_and(|c| c.status.contains(StatusFlags::NO_LIST)));
        assert!(client.as_ref().is_some_and(|c| !c.border.contains(BorderFlags::TITLE)));
    }

    #[test]
    fn test_initial_states_go_through_transitions() {
        let mut t = TestWm::new();
        t.info(1, Geometry::new(0, 0, 100, 100)).initial_state = InitialState::Iconic;
        t.wm.add_client(1, false, false);
        assert!(t.status(1).contains(StatusFlags::MINIMIZED));
        assert!(t.requests().contains(&Request::WmState(1, 3)));
        assert_eq!(t.wm.active(), None);

        t.info(2, Geometry::new(0, 0, 100, 100)).net_states = NetStates {
            shaded: true,
            maximized: true,
            ..NetStates::default()
        };
        t.wm.add_client(2, false, false);
        // maximizing unshades first
        let status = t.status(2);
        assert!(status.contains(StatusFlags::MAXIMIZED));
        assert!(!status.contains(StatusFlags::SHADED));

        t.info(3, Geometry::new(0, 0, 100, 100)).initial_state = InitialState::Withdrawn;
        t.wm.add_client(3, false, false);
        assert!(t.status(3).contains(StatusFlags::WITHDRAWN));
    }

    #[test]
    fn test_minimize_and_restore_follow_transients() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 400, 300));
        t.info(2, Geometry::new(0, 0, 100, 100)).transient_for = Some(1);
        t.wm.add_client(2, false, false);
        t.manage(3, Geometry::new(0, 0, 100, 100));
        t.wm.minimize(3);
        t.manage(4, Geometry::new(0, 0, 100, 100));

        t.wm.minimize(1);
        assert!(t.status(1).contains(StatusFlags::MINIMIZED));
        assert!(t.status(2).contains(StatusFlags::MINIMIZED));
        assert!(!t.status(2).contains(StatusFlags::MAPPED));
        assert!(!t.status(4).contains(StatusFlags::MINIMIZED));

        t.wm.restore(1, false);
        let minimized: Vec<u32> = [1, 2, 3, 4]
            .into_iter()
            .filter(|&w| t.status(w).contains(StatusFlags::MINIMIZED))
            .collect();
        assert_eq!(minimized, vec![3]);
        assert!(t.status(1).contains(StatusFlags::MAPPED));
        assert!(t.status(2).contains(StatusFlags::MAPPED));
    }

    #[test]
    fn test_minimize_moves_focus_and_guards_cycles() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.manage(2, Geometry::new(0, 0, 100, 100));
        // owner loop between 2 and 3
        t.info(3, Geometry::new(0, 0, 100, 100)).transient_for = Some(2);
        t.wm.add_client(3, false, false);
        if let Some(c) = t.wm.registry.get_mut(2) {
            c.owner = Some(3);
        }
        assert_eq!(t.wm.active(), Some(3));
        t.wm.minimize(2);
        assert!(t.status(2).contains(StatusFlags::MINIMIZED));
        assert!(t.status(3).contains(StatusFlags::MINIMIZED));
        assert_eq!(t.wm.active(), Some(1));
        assert!(!t.status(3).contains(StatusFlags::ACTIVE));
        t.wm.restore(3, true);
        assert!(!t.status(2).contains(StatusFlags::MINIMIZED));
        assert_eq!(t.wm.active(), Some(3));
    }

    #[test]
    fn test_restore_switches_desktop() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.wm.set_desktop(1, 2);
        assert!(t.status(1).contains(StatusFlags::HIDDEN));
        assert_eq!(t.wm.active(), None);
        t.wm.restore(1, true);
        assert_eq!(t.wm.desktops.current(), 2);
        assert_eq!(t.wm.active(), Some(1));
    }

    #[test]
    fn test_remove_active_transfers_focus() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.manage(2, Geometry::new(0, 0, 100, 100));
        t.wm.remove_client(2);
        assert_eq!(t.wm.active(), Some(1));
        assert!(t.wm.registry().check_integrity());
        t.wm.remove_client(1);
        assert_eq!(t.wm.active(), None);
        assert!(t.requests().contains(&Request::ActiveWindow(None)));
        assert!(t.wm.registry().is_empty());
    }

    #[test]
    fn test_shade_and_unshade() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(100, 100, 200, 100));
        let frame = t.frame(1);
        t.clear();
        t.wm.shade(1);
        assert!(t.status(1).contains(StatusFlags::SHADED | StatusFlags::MAPPED));
        let reqs = t.requests();
        assert!(reqs.contains(&Request::Unmap(1)));
        assert!(reqs.contains(&Request::ConfigureFrame(frame, Geometry::new(96, 76, 208, 28))));
        assert!(reqs.contains(&Request::InputFocus(None)));
        assert_eq!(t.wm.client(1).map(|c| c.pending_unmaps), Some(1));

        t.clear();
        t.wm.unshade(1);
        assert!(!t.status(1).contains(StatusFlags::SHADED));
        let reqs = t.requests();
        assert!(reqs.contains(&Request::Map(1)));
        assert!(reqs.contains(&Request::ConfigureFrame(frame, Geometry::new(96, 76, 208, 128))));

        if let Some(c) = t.wm.registry.get_mut(1) {
            c.border.remove(BorderFlags::TITLE);
        }
        t.wm.shade(1);
        assert!(!t.status(1).contains(StatusFlags::SHADED));
    }

    #[test]
    fn test_maximize_toggles_and_needs_permission() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(100, 100, 200, 100));
        t.wm.maximize(1);
        assert_eq!(t.geometry(1), Geometry::new(4, 24, 992, 772));
        t.wm.maximize(1);
        assert_eq!(t.geometry(1), Geometry::new(100, 100, 200, 100));

        if let Some(c) = t.wm.registry.get_mut(1) {
            c.border.remove(BorderFlags::MAXIMIZE);
        }
        t.wm.maximize(1);
        assert!(!t.status(1).contains(StatusFlags::MAXIMIZED));
    }

    #[test]
    fn test_withdraw_then_map_request_restores() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        let frame = t.frame(1);
        t.clear();
        t.wm.withdraw(1);
        assert!(t.wm.client(1).is_some());
        assert_eq!(t.status(1), StatusFlags::WITHDRAWN);
        assert!(t.requests().contains(&Request::Unmap(frame)));
        assert!(t.requests().contains(&Request::WmState(1, 0)));
        assert_eq!(t.wm.active(), None);

        t.clear();
        t.wm.restore(1, true);
        assert!(t.status(1).contains(StatusFlags::MAPPED));
        assert!(t.requests().contains(&Request::Map(1)));
        assert!(t.requests().contains(&Request::Map(frame)));
        assert_eq!(t.wm.active(), Some(1));
    }

    #[test]
    fn test_sticky_and_desktop_follow_transients() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.info(2, Geometry::new(0, 0, 100, 100)).transient_for = Some(1);
        t.wm.add_client(2, false, false);
        t.wm.set_desktop(1, 3);
        assert_eq!(t.wm.client(2).map(|c| c.desktop), Some(3));
        assert!(t.status(2).contains(StatusFlags::HIDDEN));
        t.wm.set_desktop(1, 9);
        assert_eq!(t.wm.client(1).map(|c| c.desktop), Some(3));

        t.wm.set_sticky(1, true);
        assert!(t.status(2).contains(StatusFlags::STICKY));
        assert!(!t.status(2).contains(StatusFlags::HIDDEN));
        assert!(t.requests().contains(&Request::WindowDesktop(2, None)));
        // sticky clients ignore desktop changes
        t.wm.set_desktop(1, 1);
        assert!(t.wm.client(1).is_some_and(|c| c.is_sticky()));
    }

    #[test]
    fn test_close_prefers_delete_protocol() {
        let mut t = TestWm::new();
        t.info(1, Geometry::new(0, 0, 100, 100)).protocols = Protocols::DELETE;
        t.wm.add_client(1, false, false);
        t.manage(2, Geometry::new(0, 0, 100, 100));
        t.clear();
        t.wm.close(1);
        t.wm.close(2);
        assert_eq!(t.requests(), vec![Request::Delete(1), Request::Kill(2)]);
    }

    #[test]
    fn test_configure_request_constrained_with_gravity() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(100, 100, 200, 100));
        if let Some(c) = t.wm.registry.get_mut(1) {
            c.hints = SizeHints {
                max_width: 300,
                gravity: Gravity::NorthWest,
                ..SizeHints::default()
            };
        }
        t.clear();
        let request = ConfigureRequest {
            x: Some(50),
            y: Some(60),
            width: Some(1000),
            height: None,
            stack_mode: Some(StackMode::Above),
        };
        t.wm.configure_request(1, &request);
        assert_eq!(t.geometry(1), Geometry::new(54, 84, 300, 100));
        assert!(t.requests().contains(&Request::SyntheticConfigure(1, Geometry::new(54, 84, 300, 100))));
        assert!(t.requests().iter().any(|r| matches!(r, Request::Restack(_))));

        t.clear();
        t.wm.configure_request(42, &request);
        assert_eq!(t.requests(), vec![Request::ConfigureUnmanaged(42)]);
    }

    #[test]
    fn test_refresh_hints_reconstrains() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(100, 100, 200, 100));
        {
            let mut info = t.info(1, Geometry::new(100, 100, 200, 100));
            info.size_hints = SizeHints {
                max_width: 150,
                ..SizeHints::default()
            };
            info.title = "renamed".into();
        }
        t.wm.refresh_hints(1);
        assert_eq!(t.geometry(1).width, 150);
        assert_eq!(t.wm.client(1).map(|c| c.title.as_str()), Some("renamed"));
    }

    #[test]
    fn test_shutdown_reparents_with_gravity() {
        let mut t = TestWm::new();
        {
            let mut info = t.info(1, Geometry::new(100, 100, 200, 100));
            info.size_hints.positioned = true;
        }
        t.wm.add_client(1, false, false);
        t.manage(2, Geometry::new(0, 0, 100, 100));
        t.wm.withdraw(2);
        let (f1, f2) = (t.frame(1), t.frame(2));
        t.clear();
        let log = t.backend();
        t.wm.shutdown();
        let reqs = log.borrow().requests.clone();
        assert!(reqs.contains(&Request::ReparentToRoot(1, 100, 100)));
        assert!(reqs.contains(&Request::Map(1)));
        assert!(!reqs.contains(&Request::Map(2)));
        assert!(reqs.contains(&Request::DestroyFrame(f1)));
        assert!(reqs.contains(&Request::DestroyFrame(f2)));
        assert_eq!(reqs.last(), Some(&Request::Flush));
    }
}

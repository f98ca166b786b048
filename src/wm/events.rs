//! Events Module
//!
//! Protocol-independent events and their routing into core operations. The
//! X11 backend translates server events into [`WmEvent`]s; everything else
//! here is plain window manager logic.

use tracing::{debug, trace};

use crate::shared::Geometry;
use crate::wm::WindowManager;
use crate::wm::client_flags::{Layer, StatusFlags};
use crate::wm::decorations::{ResizeEdges, Zone, classify};
use crate::wm::keyboard::{Action, Key, Modifiers};
use crate::wm::moveresize::{InteractionEvent, Start};
use crate::wm::settings::FocusModel;
use crate::wm::workspace::ALL_DESKTOPS;

/// Pointer buttons
pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_MIDDLE: u8 = 2;
pub const BUTTON_RIGHT: u8 = 3;
pub const BUTTON_WHEEL_UP: u8 = 4;
pub const BUTTON_WHEEL_DOWN: u8 = 5;

/// Stacking part of a ConfigureRequest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackMode {
    Above,
    Below,
}

/// Fields a client asked to change; `None` means unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigureRequest {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub stack_mode: Option<StackMode>,
}

/// _NET_WM_STATE change action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    Remove,
    Add,
    Toggle,
}

impl StateAction {
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Remove),
            1 => Some(Self::Add),
            2 => Some(Self::Toggle),
            _ => None,
        }
    }

    fn apply(self, current: bool) -> bool {
        match self {
            Self::Remove => false,
            Self::Add => true,
            Self::Toggle => !current,
        }
    }
}

/// Individual _NET_WM_STATE atoms the core understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetState {
    Sticky,
    Shaded,
    Hidden,
    /// Either maximized axis; both are treated as one state
    Maximized,
    Above,
    Below,
    SkipTaskbar,
}

/// _NET_WM_MOVERESIZE direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResizeDirection {
    Resize(ResizeEdges),
    Move,
    ResizeKeyboard,
    MoveKeyboard,
    Cancel,
}

impl MoveResizeDirection {
    pub fn from_raw(value: u32) -> Option<Self> {
        let edges = match value {
            0 => ResizeEdges::NORTH | ResizeEdges::WEST,
            1 => ResizeEdges::NORTH,
            2 => ResizeEdges::NORTH | ResizeEdges::EAST,
            3 => ResizeEdges::EAST,
            4 => ResizeEdges::SOUTH | ResizeEdges::EAST,
            5 => ResizeEdges::SOUTH,
            6 => ResizeEdges::SOUTH | ResizeEdges::WEST,
            7 => ResizeEdges::WEST,
            8 => return Some(Self::Move),
            9 => return Some(Self::ResizeKeyboard),
            10 => return Some(Self::MoveKeyboard),
            11 => return Some(Self::Cancel),
            _ => return None,
        };
        Some(Self::Resize(edges))
    }
}

/// Requests clients send through ClientMessage events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRequest {
    /// _NET_ACTIVE_WINDOW
    Activate,
    /// _NET_CLOSE_WINDOW
    Close,
    /// _NET_WM_DESKTOP, raw value (0xFFFFFFFF for all desktops)
    SetDesktop(u32),
    /// _NET_WM_STATE
    ChangeState { action: StateAction, states: Vec<NetState> },
    /// _NET_WM_MOVERESIZE
    MoveResize { root_x: i32, root_y: i32, direction: MoveResizeDirection },
    /// _NET_CURRENT_DESKTOP on the root window
    CurrentDesktop(u32),
    /// WM_CHANGE_STATE to IconicState
    Iconify,
    /// _WIN_LAYER, raw value
    SetLayer(i64),
}

/// Everything the core reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum WmEvent {
    MapRequest { window: u32 },
    UnmapNotify { window: u32, synthetic: bool },
    DestroyNotify { window: u32 },
    ConfigureRequest { window: u32, request: ConfigureRequest },
    /// Size hints, protocols or names of a window changed
    PropertyNotify { window: u32 },
    ClientMessage { window: u32, request: ClientRequest },
    ButtonPress { window: u32, root_x: i32, root_y: i32, button: u8, modifiers: Modifiers },
    ButtonRelease { root_x: i32, root_y: i32, button: u8 },
    MotionNotify { root_x: i32, root_y: i32 },
    EnterNotify { window: u32 },
    KeyPress { key: Key, keycode: u8, modifiers: Modifiers },
    /// `modifiers_after` is the modifier state once the key is up
    KeyRelease { modifiers_after: Modifiers },
    ColormapNotify { window: u32, colormap: Option<u32> },
    ScreenChange { root: Geometry, monitors: Vec<Geometry> },
    /// Housekeeping tick from the main loop
    Timeout,
}

impl WindowManager {
    /// Route one event to the operation it triggers.
    pub fn handle_event(&mut self, event: WmEvent) {
        match event {
            WmEvent::MapRequest { window } => {
                debug!("MapRequest: window {}", window);
                if self.registry.contains(window) {
                    self.restore(window, true);
                } else {
                    self.add_client(window, false, true);
                }
            }
            WmEvent::UnmapNotify { window, synthetic } => {
                debug!("UnmapNotify: window {} (synthetic: {})", window, synthetic);
                self.handle_unmap(window, synthetic);
            }
            WmEvent::DestroyNotify { window } => {
                debug!("DestroyNotify: window {}", window);
                if self.registry.contains(window) {
                    self.remove_client(window);
                } else {
                    self.unregister_tray(window);
                }
            }
            WmEvent::ConfigureRequest { window, request } => {
                debug!("ConfigureRequest: window {} {:?}", window, request);
                self.configure_request(window, &request);
            }
            WmEvent::PropertyNotify { window } => {
                trace!("PropertyNotify: window {}", window);
                self.refresh_hints(window);
            }
            WmEvent::ClientMessage { window, request } => {
                debug!("ClientMessage: window {} {:?}", window, request);
                self.handle_client_request(window, request);
            }
            WmEvent::ButtonPress {
                window,
                root_x,
                root_y,
                button,
                modifiers,
            } => {
                debug!("ButtonPress: window {}, button {}", window, button);
                self.handle_button_press(window, root_x, root_y, button, modifiers);
            }
            WmEvent::ButtonRelease { root_x, root_y, .. } => {
                if self.interaction.is_some() {
                    self.drive_interaction(InteractionEvent::Release { x: root_x, y: root_y });
                }
            }
            WmEvent::MotionNotify { root_x, root_y } => {
                if self.interaction.is_some() {
                    self.drive_interaction(InteractionEvent::Motion { x: root_x, y: root_y });
                }
            }
            WmEvent::EnterNotify { window } => {
                if self.focus.model() == FocusModel::Sloppy && self.interaction.is_none() && self.walk.is_none() {
                    if let Some(window) = self.registry.resolve(window) {
                        self.focus_client(window);
                    }
                }
            }
            WmEvent::KeyPress { key, keycode, modifiers } => {
                debug!("KeyPress: keycode {}, modifiers {:?}", keycode, modifiers);
                if self.interaction.is_some() {
                    self.drive_interaction(InteractionEvent::Key(key));
                } else if let Some(action) = self.keys.lookup(modifiers, keycode) {
                    self.run_action(action, modifiers);
                }
            }
            WmEvent::KeyRelease { modifiers_after } => {
                self.walk_modifiers_released(modifiers_after);
            }
            WmEvent::ColormapNotify { window, colormap } => {
                self.set_colormap(window, colormap);
            }
            WmEvent::ScreenChange { root, monitors } => {
                debug!("Screen layout changed: {} monitors", monitors.len());
                self.update_screens(root, monitors);
            }
            WmEvent::Timeout => {
                self.hooks.timeout();
            }
        }
    }

    fn handle_unmap(&mut self, window: u32, synthetic: bool) {
        let Some(client) = self.registry.get_mut(window) else {
            return;
        };
        if !synthetic && client.pending_unmaps > 0 {
            client.pending_unmaps -= 1;
            trace!("Expected unmap of window {}", window);
            return;
        }
        self.withdraw(window);
    }

    fn handle_button_press(&mut self, window: u32, root_x: i32, root_y: i32, button: u8, modifiers: Modifiers) {
        if self.interaction.is_some() {
            return;
        }
        let Some(target) = self.registry.resolve(window) else {
            return;
        };
        let Some(client) = self.registry.get(target) else {
            return;
        };
        let frame = self.frame_of(client);
        let on_frame = window == client.frame;

        self.focus_client(target);
        if self.settings.raise_on_click || self.focus.model() == FocusModel::Click {
            self.raise(target);
        }

        if modifiers.significant().contains(Modifiers::MOD1) {
            let start = Start::Pointer { x: root_x, y: root_y };
            match button {
                BUTTON_LEFT => {
                    self.move_interactive(target, start);
                }
                BUTTON_RIGHT => {
                    let edges = nearest_corner(frame, root_x, root_y);
                    self.resize_interactive(target, start, edges);
                }
                _ => {}
            }
            return;
        }
        if !on_frame {
            return;
        }

        let Some(client) = self.registry.get(target) else {
            return;
        };
        let zone = classify(
            client,
            &self.settings.metrics,
            &self.settings.buttons,
            root_x - frame.x,
            root_y - frame.y,
        );
        debug!("Press in {:?} of window {}", zone, target);
        let start = Start::Pointer { x: root_x, y: root_y };
        match (zone, button) {
            (Zone::Title | Zone::Outline, BUTTON_LEFT) => {
                self.move_interactive(target, start);
            }
            (Zone::Title, BUTTON_WHEEL_UP) => self.shade(target),
            (Zone::Title, BUTTON_WHEEL_DOWN) => self.unshade(target),
            (Zone::Title | Zone::Outline, BUTTON_RIGHT) | (Zone::Menu, _) => {
                self.hooks.show_window_menu(target, root_x, root_y);
            }
            (Zone::Resize(edges), BUTTON_LEFT | BUTTON_MIDDLE) => {
                self.resize_interactive(target, start, edges);
            }
            (Zone::Minimize, BUTTON_LEFT) => self.minimize(target),
            (Zone::Maximize, BUTTON_LEFT) => self.maximize(target),
            (Zone::Close, BUTTON_LEFT) => self.close(target),
            _ => {}
        }
    }

    /// Run a key binding action against the active client.
    fn run_action(&mut self, action: Action, modifiers: Modifiers) {
        debug!("Key action {:?}", action);
        match action {
            Action::NextWindow => return self.step_walk(true, modifiers.significant()),
            Action::PrevWindow => return self.step_walk(false, modifiers.significant()),
            Action::Desktop(desktop) => return self.change_desktop(desktop),
            _ => {}
        }
        let Some(window) = self.focus.active() else {
            return;
        };
        let Some(status) = self.registry.get(window).map(|c| c.status) else {
            return;
        };
        match action {
            Action::Close => self.close(window),
            Action::Minimize => self.minimize(window),
            Action::Maximize => self.maximize(window),
            Action::Shade if status.contains(StatusFlags::SHADED) => self.unshade(window),
            Action::Shade => self.shade(window),
            Action::Stick => self.set_sticky(window, !status.contains(StatusFlags::STICKY)),
            Action::Raise => self.raise(window),
            Action::Lower => self.lower(window),
            Action::Move => {
                self.move_interactive(window, Start::Keyboard);
            }
            Action::Resize => {
                self.resize_interactive(window, Start::Keyboard, ResizeEdges::empty());
            }
            Action::SendToDesktop(desktop) => self.set_desktop(window, desktop),
            Action::Layer(layer) => self.set_layer(window, Layer::or_normal(layer as i64)),
            Action::NextWindow | Action::PrevWindow | Action::Desktop(_) => {}
        }
    }

    fn handle_client_request(&mut self, window: u32, request: ClientRequest) {
        if let ClientRequest::CurrentDesktop(desktop) = request {
            self.change_desktop(desktop);
            return;
        }
        let Some(status) = self.registry.get(window).map(|c| c.status) else {
            return;
        };
        match request {
            ClientRequest::Activate => {
                if !status.contains(StatusFlags::WITHDRAWN) {
                    self.restore(window, true);
                }
            }
            ClientRequest::Close => self.close(window),
            ClientRequest::SetDesktop(ALL_DESKTOPS) => self.set_sticky(window, true),
            ClientRequest::SetDesktop(desktop) => {
                if status.contains(StatusFlags::STICKY) {
                    self.set_sticky(window, false);
                }
                self.set_desktop(window, desktop);
            }
            ClientRequest::ChangeState { action, states } => {
                for state in states {
                    self.change_net_state(window, action, state);
                }
            }
            ClientRequest::MoveResize {
                root_x,
                root_y,
                direction,
            } => {
                let start = Start::Pointer { x: root_x, y: root_y };
                match direction {
                    MoveResizeDirection::Move => {
                        self.move_interactive(window, start);
                    }
                    MoveResizeDirection::Resize(edges) => {
                        self.resize_interactive(window, start, edges);
                    }
                    MoveResizeDirection::MoveKeyboard => {
                        self.move_interactive(window, Start::Keyboard);
                    }
                    MoveResizeDirection::ResizeKeyboard => {
                        self.resize_interactive(window, Start::Keyboard, ResizeEdges::empty());
                    }
                    MoveResizeDirection::Cancel => {
                        self.cancel_interaction(window);
                    }
                }
            }
            ClientRequest::Iconify => self.minimize(window),
            ClientRequest::SetLayer(raw) => self.set_layer(window, Layer::or_normal(raw)),
            ClientRequest::CurrentDesktop(_) => {}
        }
    }

    fn change_net_state(&mut self, window: u32, action: StateAction, state: NetState) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        let status = client.status;
        let layer = client.layer;
        match state {
            NetState::Sticky => {
                let want = action.apply(status.contains(StatusFlags::STICKY));
                self.set_sticky(window, want);
            }
            NetState::Shaded => {
                if action.apply(status.contains(StatusFlags::SHADED)) {
                    self.shade(window);
                } else {
                    self.unshade(window);
                }
            }
            NetState::Hidden => {
                let minimized = status.contains(StatusFlags::MINIMIZED);
                match (minimized, action.apply(minimized)) {
                    (false, true) => self.minimize(window),
                    (true, false) => self.restore(window, false),
                    _ => {}
                }
            }
            NetState::Maximized => {
                let maximized = status.contains(StatusFlags::MAXIMIZED);
                if action.apply(maximized) != maximized {
                    self.maximize(window);
                }
            }
            NetState::Above => {
                let above = layer == Layer::ABOVE;
                match (above, action.apply(above)) {
                    (false, true) => self.set_layer(window, Layer::ABOVE),
                    (true, false) => self.set_layer(window, Layer::NORMAL),
                    _ => {}
                }
            }
            NetState::Below => {
                let below = layer == Layer::BELOW;
                match (below, action.apply(below)) {
                    (false, true) => self.set_layer(window, Layer::BELOW),
                    (true, false) => self.set_layer(window, Layer::NORMAL),
                    _ => {}
                }
            }
            NetState::SkipTaskbar => {
                let skip = action.apply(status.contains(StatusFlags::NO_LIST));
                if let Some(client) = self.registry.get_mut(window) {
                    client.status.set(StatusFlags::NO_LIST, skip);
                }
                self.publish_state(window);
                self.hooks.refresh_taskbar();
            }
        }
    }
}

/// Edges of the frame corner closest to a root position
fn nearest_corner(frame: Geometry, x: i32, y: i32) -> ResizeEdges {
    let (cx, cy) = frame.center();
    let horizontal = if x < cx { ResizeEdges::WEST } else { ResizeEdges::EAST };
    let vertical = if y < cy { ResizeEdges::NORTH } else { ResizeEdges::SOUTH };
    horizontal | vertical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::keyboard::{KeyBindingConfig, ModifierName};
    use crate::wm::settings::Settings;
    use crate::wm::testing::{Request, TestWm};

    // frame of window 1 is (96, 76, 208, 128)
    fn one_client() -> TestWm {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(100, 100, 200, 100));
        t.clear();
        t
    }

    fn press(t: &mut TestWm, window: u32, root_x: i32, root_y: i32, button: u8, modifiers: Modifiers) {
        t.wm.handle_event(WmEvent::ButtonPress {
            window,
            root_x,
            root_y,
            button,
            modifiers,
        });
    }

    #[test]
    fn test_own_unmaps_are_absorbed() {
        let mut t = TestWm::new();
        t.info(1, Geometry::new(100, 100, 200, 100));
        t.wm.add_client(1, true, false);
        t.wm.handle_event(WmEvent::UnmapNotify { window: 1, synthetic: false });
        assert!(!t.status(1).contains(StatusFlags::WITHDRAWN));

        t.wm.handle_event(WmEvent::UnmapNotify { window: 1, synthetic: false });
        assert!(t.status(1).contains(StatusFlags::WITHDRAWN));

        // an unmap of the frame itself is not the client's business
        t.manage(2, Geometry::new(0, 0, 100, 100));
        let frame = t.frame(2);
        t.wm.handle_event(WmEvent::UnmapNotify { window: frame, synthetic: false });
        assert!(!t.status(2).contains(StatusFlags::WITHDRAWN));
    }

    #[test]
    fn test_synthetic_unmap_withdraws() {
        let mut t = one_client();
        t.wm.shade(1);
        t.wm.handle_event(WmEvent::UnmapNotify { window: 1, synthetic: true });
        assert!(t.status(1).contains(StatusFlags::WITHDRAWN));
    }

    #[test]
    fn test_map_request_manages_or_restores() {
        let mut t = TestWm::new();
        t.info(5, Geometry::new(0, 0, 100, 100));
        t.wm.handle_event(WmEvent::MapRequest { window: 5 });
        assert!(t.wm.client(5).is_some());
        t.wm.withdraw(5);
        t.wm.handle_event(WmEvent::MapRequest { window: 5 });
        assert!(t.status(5).contains(StatusFlags::MAPPED));
        assert_eq!(t.wm.registry().len(), 1);
    }

    #[test]
    fn test_destroy_of_tray_unregisters_it() {
        let mut t = one_client();
        t.wm.register_tray(900, Layer::TOP, Geometry::new(0, 0, 1000, 30));
        t.wm.handle_event(WmEvent::DestroyNotify { window: 900 });
        assert!(!t.wm.stacking_order().contains(&900));
        assert!(t.wm.client(1).is_some());
    }

    #[test]
    fn test_title_press_starts_move() {
        let mut t = one_client();
        let frame = t.frame(1);
        press(&mut t, frame, 196, 86, BUTTON_LEFT, Modifiers::empty());
        assert_eq!(t.wm.interaction(), Some(1));
        t.wm.handle_event(WmEvent::MotionNotify { root_x: 216, root_y: 96 });
        t.wm.handle_event(WmEvent::ButtonRelease {
            root_x: 216,
            root_y: 96,
            button: BUTTON_LEFT,
        });
        assert_eq!(t.wm.interaction(), None);
        assert_eq!(t.geometry(1), Geometry::new(120, 110, 200, 100));
    }

    #[test]
    fn test_buttons_and_corners() {
        let mut t = one_client();
        t.info(1, Geometry::new(100, 100, 200, 100)).protocols =
            crate::wm::client_flags::Protocols::DELETE;
        t.wm.refresh_hints(1);
        t.clear();
        let frame = t.frame(1);
        // close button: rightmost 20 pixels of the title band
        press(&mut t, frame, 286, 86, BUTTON_LEFT, Modifiers::empty());
        assert!(t.requests().contains(&Request::Delete(1)));

        // bottom-right corner resizes
        press(&mut t, frame, 301, 201, BUTTON_LEFT, Modifiers::empty());
        let op = t.wm.client(1).and_then(|c| c.operation);
        assert!(matches!(
            op,
            Some(crate::wm::moveresize::Operation::Resize(s)) if s.edges == ResizeEdges::SOUTH | ResizeEdges::EAST
        ));
    }

    #[test]
    fn test_alt_drag_anywhere() {
        let mut t = one_client();
        press(&mut t, 1, 120, 120, BUTTON_RIGHT, Modifiers::MOD1 | Modifiers::MOD2);
        let op = t.wm.client(1).and_then(|c| c.operation);
        assert!(matches!(
            op,
            Some(crate::wm::moveresize::Operation::Resize(s)) if s.edges == ResizeEdges::NORTH | ResizeEdges::WEST
        ));
        t.wm.handle_event(WmEvent::KeyPress {
            key: Key::Escape,
            keycode: 9,
            modifiers: Modifiers::MOD1,
        });
        assert_eq!(t.wm.interaction(), None);

        // a plain press in the client area only focuses
        press(&mut t, 1, 120, 120, BUTTON_LEFT, Modifiers::empty());
        assert_eq!(t.wm.interaction(), None);
    }

    #[test]
    fn test_enter_focuses_only_in_sloppy_mode() {
        let mut t = one_client();
        t.manage(2, Geometry::new(400, 400, 100, 100));
        let frame = t.frame(1);
        t.wm.handle_event(WmEvent::EnterNotify { window: frame });
        assert_eq!(t.wm.active(), Some(1));

        let mut t = TestWm::with_settings(Settings {
            focus_model: FocusModel::Click,
            ..Settings::default()
        });
        t.manage(1, Geometry::new(100, 100, 200, 100));
        t.manage(2, Geometry::new(400, 400, 100, 100));
        t.wm.handle_event(WmEvent::EnterNotify { window: 1 });
        assert_eq!(t.wm.active(), Some(2));
        press(&mut t, 1, 150, 150, BUTTON_LEFT, Modifiers::empty());
        assert_eq!(t.wm.active(), Some(1));
        assert_eq!(t.wm.registry().top_down(), vec![1, 2]);
    }

    #[test]
    fn test_key_bindings_walk_and_actions() {
        let alt = vec![ModifierName::Alt];
        let mut t = TestWm::with_keys(&[
            KeyBindingConfig {
                modifiers: alt.clone(),
                keycode: 23,
                action: Action::NextWindow,
            },
            KeyBindingConfig {
                modifiers: alt.clone(),
                keycode: 10,
                action: Action::SendToDesktop(1),
            },
            KeyBindingConfig {
                modifiers: alt,
                keycode: 11,
                action: Action::Desktop(1),
            },
        ]);
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.manage(2, Geometry::new(0, 0, 100, 100));
        let tab = WmEvent::KeyPress {
            key: Key::Other,
            keycode: 23,
            modifiers: Modifiers::MOD1,
        };
        t.wm.handle_event(tab);
        assert_eq!(t.wm.active(), Some(1));
        t.wm.handle_event(WmEvent::KeyRelease {
            modifiers_after: Modifiers::empty(),
        });
        assert_eq!(t.wm.registry().top_down(), vec![1, 2]);

        t.wm.handle_event(WmEvent::KeyPress {
            key: Key::Other,
            keycode: 10,
            modifiers: Modifiers::MOD1,
        });
        assert_eq!(t.wm.client(1).map(|c| c.desktop), Some(1));
        assert_eq!(t.wm.active(), Some(2));
        t.wm.handle_event(WmEvent::KeyPress {
            key: Key::Other,
            keycode: 11,
            modifiers: Modifiers::MOD1 | Modifiers::LOCK,
        });
        assert_eq!(t.wm.desktops.current(), 1);
    }

    #[test]
    fn test_net_wm_state_requests() {
        let mut t = one_client();
        let change = |action, states| WmEvent::ClientMessage {
            window: 1,
            request: ClientRequest::ChangeState { action, states },
        };
        t.wm.handle_event(change(StateAction::Add, vec![NetState::Maximized, NetState::Above]));
        assert!(t.status(1).contains(StatusFlags::MAXIMIZED));
        assert_eq!(t.wm.client(1).map(|c| c.layer), Some(Layer::ABOVE));

        t.wm.handle_event(change(StateAction::Toggle, vec![NetState::Maximized, NetState::Above]));
        assert!(!t.status(1).contains(StatusFlags::MAXIMIZED));
        assert_eq!(t.wm.client(1).map(|c| c.layer), Some(Layer::NORMAL));

        t.wm.handle_event(change(StateAction::Add, vec![NetState::Hidden, NetState::SkipTaskbar]));
        assert!(t.status(1).contains(StatusFlags::MINIMIZED | StatusFlags::NO_LIST));
        t.wm.handle_event(WmEvent::ClientMessage {
            window: 1,
            request: ClientRequest::Activate,
        });
        assert!(!t.status(1).contains(StatusFlags::MINIMIZED));
        assert_eq!(t.wm.active(), Some(1));
    }

    #[test]
    fn test_desktop_and_layer_requests() {
        let mut t = one_client();
        t.wm.handle_event(WmEvent::ClientMessage {
            window: 1,
            request: ClientRequest::SetDesktop(ALL_DESKTOPS),
        });
        assert!(t.status(1).contains(StatusFlags::STICKY));
        t.wm.handle_event(WmEvent::ClientMessage {
            window: 1,
            request: ClientRequest::SetDesktop(2),
        });
        assert!(!t.status(1).contains(StatusFlags::STICKY));
        assert_eq!(t.wm.client(1).map(|c| c.desktop), Some(2));

        t.wm.handle_event(WmEvent::ClientMessage {
            window: 0,
            request: ClientRequest::CurrentDesktop(2),
        });
        assert_eq!(t.wm.desktops.current(), 2);

        t.wm.handle_event(WmEvent::ClientMessage {
            window: 1,
            request: ClientRequest::SetLayer(99),
        });
        assert_eq!(t.wm.client(1).map(|c| c.layer), Some(Layer::NORMAL));
        t.wm.handle_event(WmEvent::ClientMessage {
            window: 1,
            request: ClientRequest::SetLayer(12),
        });
        assert_eq!(t.wm.client(1).map(|c| c.layer), Some(Layer::TOP));
        assert!(t.wm.registry().check_integrity());
    }

    #[test]
    fn test_keyboard_move_request() {
        let mut t = one_client();
        t.wm.handle_event(WmEvent::ClientMessage {
            window: 1,
            request: ClientRequest::MoveResize {
                root_x: 0,
                root_y: 0,
                direction: MoveResizeDirection::MoveKeyboard,
            },
        });
        assert_eq!(t.wm.interaction(), Some(1));
        t.wm.handle_event(WmEvent::KeyPress {
            key: Key::Left,
            keycode: 113,
            modifiers: Modifiers::empty(),
        });
        t.wm.handle_event(WmEvent::KeyPress {
            key: Key::Return,
            keycode: 36,
            modifiers: Modifiers::empty(),
        });
        assert_eq!(t.geometry(1), Geometry::new(90, 100, 200, 100));
        assert_eq!(MoveResizeDirection::from_raw(4), Some(MoveResizeDirection::Resize(ResizeEdges::SOUTH | ResizeEdges::EAST)));
        assert_eq!(MoveResizeDirection::from_raw(12), None);
    }
}

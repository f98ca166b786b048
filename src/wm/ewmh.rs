//! EWMH and ICCCM properties
//!
//! Interned atoms, the property readers used when a window is first
//! inspected, the writers behind the backend's `set_*` requests, and the
//! decoding of client messages into [`ClientRequest`]s.

use anyhow::Result;
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::wrapper::ConnectionExt as _;

use crate::wm::backend::{InitialState, NetStates};
use crate::wm::client_flags::{BorderFlags, Layer, Protocols, StatusFlags, WindowType};
use crate::wm::events::{ClientRequest, MoveResizeDirection, NetState, StateAction};

/// Holds all interned atoms
#[derive(Debug, Clone)]
pub struct Atoms {
    pub net_supported: Atom,
    pub net_supporting_wm_check: Atom,
    pub net_client_list: Atom,
    pub net_client_list_stacking: Atom,
    pub net_number_of_desktops: Atom,
    pub net_current_desktop: Atom,
    pub net_active_window: Atom,
    pub net_close_window: Atom,
    pub net_wm_moveresize: Atom,
    pub net_wm_name: Atom,
    pub net_wm_desktop: Atom,
    pub net_frame_extents: Atom,
    pub net_wm_window_type: Atom,
    pub net_wm_window_type_desktop: Atom,
    pub net_wm_window_type_dock: Atom,
    pub net_wm_window_type_normal: Atom,
    pub net_wm_window_type_dialog: Atom,
    pub net_wm_window_type_utility: Atom,
    pub net_wm_window_type_toolbar: Atom,
    pub net_wm_window_type_splash: Atom,
    pub net_wm_window_type_menu: Atom,
    pub net_wm_window_type_notification: Atom,
    pub net_wm_state: Atom,
    pub net_wm_state_sticky: Atom,
    pub net_wm_state_shaded: Atom,
    pub net_wm_state_hidden: Atom,
    pub net_wm_state_maximized_vert: Atom,
    pub net_wm_state_maximized_horz: Atom,
    pub net_wm_state_above: Atom,
    pub net_wm_state_below: Atom,
    pub net_wm_state_skip_taskbar: Atom,
    pub win_layer: Atom,
    pub wm_protocols: Atom,
    pub wm_delete_window: Atom,
    pub wm_take_focus: Atom,
    pub wm_state: Atom,
    pub wm_change_state: Atom,
    pub utf8_string: Atom,
    pub motif_wm_hints: Atom,
}

impl Atoms {
    /// Intern all required atoms
    pub fn new<C: Connection>(conn: &C) -> Result<Self> {
        Self::from_lookup(|name| Ok(conn.intern_atom(false, name.as_bytes())?.reply()?.atom))
    }

    /// Build the table from any name-to-atom lookup
    pub fn from_lookup<F>(mut intern: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<Atom>,
    {
        Ok(Self {
            net_supported: intern("_NET_SUPPORTED")?,
            net_supporting_wm_check: intern("_NET_SUPPORTING_WM_CHECK")?,
            net_client_list: intern("_NET_CLIENT_LIST")?,
            net_client_list_stacking: intern("_NET_CLIENT_LIST_STACKING")?,
            net_number_of_desktops: intern("_NET_NUMBER_OF_DESKTOPS")?,
            net_current_desktop: intern("_NET_CURRENT_DESKTOP")?,
            net_active_window: intern("_NET_ACTIVE_WINDOW")?,
            net_close_window: intern("_NET_CLOSE_WINDOW")?,
            net_wm_moveresize: intern("_NET_WM_MOVERESIZE")?,
            net_wm_name: intern("_NET_WM_NAME")?,
            net_wm_desktop: intern("_NET_WM_DESKTOP")?,
            net_frame_extents: intern("_NET_FRAME_EXTENTS")?,
            net_wm_window_type: intern("_NET_WM_WINDOW_TYPE")?,
            net_wm_window_type_desktop: intern("_NET_WM_WINDOW_TYPE_DESKTOP")?,
            net_wm_window_type_dock: intern("_NET_WM_WINDOW_TYPE_DOCK")?,
            net_wm_window_type_normal: intern("_NET_WM_WINDOW_TYPE_NORMAL")?,
            net_wm_window_type_dialog: intern("_NET_WM_WINDOW_TYPE_DIALOG")?,
            net_wm_window_type_utility: intern("_NET_WM_WINDOW_TYPE_UTILITY")?,
            net_wm_window_type_toolbar: intern("_NET_WM_WINDOW_TYPE_TOOLBAR")?,
            net_wm_window_type_splash: intern("_NET_WM_WINDOW_TYPE_SPLASH")?,
            net_wm_window_type_menu: intern("_NET_WM_WINDOW_TYPE_MENU")?,
            net_wm_window_type_notification: intern("_NET_WM_WINDOW_TYPE_NOTIFICATION")?,
            net_wm_state: intern("_NET_WM_STATE")?,
            net_wm_state_sticky: intern("_NET_WM_STATE_STICKY")?,
            net_wm_state_shaded: intern("_NET_WM_STATE_SHADED")?,
            net_wm_state_hidden: intern("_NET_WM_STATE_HIDDEN")?,
            net_wm_state_maximized_vert: intern("_NET_WM_STATE_MAXIMIZED_VERT")?,
            net_wm_state_maximized_horz: intern("_NET_WM_STATE_MAXIMIZED_HORZ")?,
            net_wm_state_above: intern("_NET_WM_STATE_ABOVE")?,
            net_wm_state_below: intern("_NET_WM_STATE_BELOW")?,
            net_wm_state_skip_taskbar: intern("_NET_WM_STATE_SKIP_TASKBAR")?,
            win_layer: intern("_WIN_LAYER")?,
            wm_protocols: intern("WM_PROTOCOLS")?,
            wm_delete_window: intern("WM_DELETE_WINDOW")?,
            wm_take_focus: intern("WM_TAKE_FOCUS")?,
            wm_state: intern("WM_STATE")?,
            wm_change_state: intern("WM_CHANGE_STATE")?,
            utf8_string: intern("UTF8_STRING")?,
            motif_wm_hints: intern("_MOTIF_WM_HINTS")?,
        })
    }

    /// Set up _NET_SUPPORTED on root window
    pub fn setup_supported<C: Connection>(&self, conn: &C, root: Window) -> Result<()> {
        let supported = [
            self.net_supported,
            self.net_supporting_wm_check,
            self.net_client_list,
            self.net_client_list_stacking,
            self.net_number_of_desktops,
            self.net_current_desktop,
            self.net_active_window,
            self.net_close_window,
            self.net_wm_moveresize,
            self.net_wm_name,
            self.net_wm_desktop,
            self.net_frame_extents,
            self.net_wm_window_type,
            self.net_wm_window_type_desktop,
            self.net_wm_window_type_dock,
            self.net_wm_window_type_normal,
            self.net_wm_window_type_dialog,
            self.net_wm_window_type_utility,
            self.net_wm_window_type_toolbar,
            self.net_wm_window_type_splash,
            self.net_wm_window_type_menu,
            self.net_wm_window_type_notification,
            self.net_wm_state,
            self.net_wm_state_sticky,
            self.net_wm_state_shaded,
            self.net_wm_state_hidden,
            self.net_wm_state_maximized_vert,
            self.net_wm_state_maximized_horz,
            self.net_wm_state_above,
            self.net_wm_state_below,
            self.net_wm_state_skip_taskbar,
        ];

        conn.change_property32(PropMode::REPLACE, root, self.net_supported, AtomEnum::ATOM, &supported)?;
        Ok(())
    }

    /// Point _NET_SUPPORTING_WM_CHECK at `check` on both the root and itself
    pub fn setup_supporting_check<C: Connection>(&self, conn: &C, root: Window, check: Window) -> Result<()> {
        for window in [root, check] {
            conn.change_property32(
                PropMode::REPLACE,
                window,
                self.net_supporting_wm_check,
                AtomEnum::WINDOW,
                &[check],
            )?;
        }
        conn.change_property8(
            PropMode::REPLACE,
            check,
            self.net_wm_name,
            self.utf8_string,
            env!("CARGO_PKG_NAME").as_bytes(),
        )?;
        Ok(())
    }

    /// Remove the root properties a successor would otherwise inherit
    pub fn clear_root<C: Connection>(&self, conn: &C, root: Window) -> Result<()> {
        for atom in [
            self.net_supported,
            self.net_supporting_wm_check,
            self.net_client_list,
            self.net_client_list_stacking,
            self.net_active_window,
        ] {
            conn.delete_property(root, atom)?;
        }
        Ok(())
    }

    /// Update _NET_ACTIVE_WINDOW
    pub fn update_active_window<C: Connection>(&self, conn: &C, root: Window, window: Option<u32>) -> Result<()> {
        conn.change_property32(
            PropMode::REPLACE,
            root,
            self.net_active_window,
            AtomEnum::WINDOW,
            &[window.unwrap_or(0)],
        )?;
        Ok(())
    }

    /// Update a window list on the root (_NET_CLIENT_LIST or _NET_CLIENT_LIST_STACKING)
    pub fn update_window_list<C: Connection>(&self, conn: &C, root: Window, property: Atom, windows: &[u32]) -> Result<()> {
        conn.change_property32(PropMode::REPLACE, root, property, AtomEnum::WINDOW, windows)?;
        Ok(())
    }

    /// Set a single CARDINAL on a window
    pub fn update_cardinal<C: Connection>(&self, conn: &C, window: Window, property: Atom, value: u32) -> Result<()> {
        conn.change_property32(PropMode::REPLACE, window, property, AtomEnum::CARDINAL, &[value])?;
        Ok(())
    }

    /// Update _NET_FRAME_EXTENTS for a window
    pub fn update_frame_extents<C: Connection>(
        &self,
        conn: &C,
        window: Window,
        left: u32,
        right: u32,
        top: u32,
        bottom: u32,
    ) -> Result<()> {
        conn.change_property32(
            PropMode::REPLACE,
            window,
            self.net_frame_extents,
            AtomEnum::CARDINAL,
            &[left, right, top, bottom],
        )?;
        Ok(())
    }

    /// ICCCM WM_STATE: state plus icon window (none)
    pub fn update_wm_state<C: Connection>(&self, conn: &C, window: Window, state: u32) -> Result<()> {
        conn.change_property32(PropMode::REPLACE, window, self.wm_state, self.wm_state, &[state, 0])?;
        Ok(())
    }

    /// Replace _NET_WM_STATE with the atoms describing `status` and `layer`
    pub fn update_net_wm_state<C: Connection>(
        &self,
        conn: &C,
        window: Window,
        status: StatusFlags,
        layer: Layer,
    ) -> Result<()> {
        let states = self.net_state_atoms(status, layer);
        conn.change_property32(PropMode::REPLACE, window, self.net_wm_state, AtomEnum::ATOM, &states)?;
        Ok(())
    }

    pub fn net_state_atoms(&self, status: StatusFlags, layer: Layer) -> Vec<Atom> {
        let mut states = Vec::new();
        if status.contains(StatusFlags::STICKY) {
            states.push(self.net_wm_state_sticky);
        }
        if status.contains(StatusFlags::SHADED) {
            states.push(self.net_wm_state_shaded);
        }
        if status.contains(StatusFlags::MINIMIZED) {
            states.push(self.net_wm_state_hidden);
        }
        if status.contains(StatusFlags::MAXIMIZED) {
            states.push(self.net_wm_state_maximized_vert);
            states.push(self.net_wm_state_maximized_horz);
        }
        if status.contains(StatusFlags::NO_LIST) {
            states.push(self.net_wm_state_skip_taskbar);
        }
        if layer > Layer::NORMAL {
            states.push(self.net_wm_state_above);
        } else if layer < Layer::NORMAL {
            states.push(self.net_wm_state_below);
        }
        states
    }

    pub fn net_state(&self, atom: Atom) -> Option<NetState> {
        match atom {
            a if a == self.net_wm_state_sticky => Some(NetState::Sticky),
            a if a == self.net_wm_state_shaded => Some(NetState::Shaded),
            a if a == self.net_wm_state_hidden => Some(NetState::Hidden),
            a if a == self.net_wm_state_maximized_vert || a == self.net_wm_state_maximized_horz => {
                Some(NetState::Maximized)
            }
            a if a == self.net_wm_state_above => Some(NetState::Above),
            a if a == self.net_wm_state_below => Some(NetState::Below),
            a if a == self.net_wm_state_skip_taskbar => Some(NetState::SkipTaskbar),
            _ => None,
        }
    }

    /// Fold a _NET_WM_STATE atom list into the states the core understands
    pub fn net_states(&self, atoms: &[Atom]) -> NetStates {
        let mut states = NetStates::default();
        for state in atoms.iter().filter_map(|&a| self.net_state(a)) {
            match state {
                NetState::Sticky => states.sticky = true,
                NetState::Shaded => states.shaded = true,
                NetState::Hidden => states.hidden = true,
                NetState::Maximized => states.maximized = true,
                NetState::Above => states.above = true,
                NetState::Below => states.below = true,
                NetState::SkipTaskbar => states.skip_taskbar = true,
            }
        }
        states
    }

    /// First recognised entry of a _NET_WM_WINDOW_TYPE list
    pub fn window_type(&self, atoms: &[Atom]) -> WindowType {
        atoms
            .iter()
            .find_map(|&atom| match atom {
                a if a == self.net_wm_window_type_normal => Some(WindowType::Normal),
                a if a == self.net_wm_window_type_desktop => Some(WindowType::Desktop),
                a if a == self.net_wm_window_type_dock => Some(WindowType::Dock),
                a if a == self.net_wm_window_type_dialog => Some(WindowType::Dialog),
                a if a == self.net_wm_window_type_toolbar => Some(WindowType::Toolbar),
                a if a == self.net_wm_window_type_menu => Some(WindowType::Menu),
                a if a == self.net_wm_window_type_utility => Some(WindowType::Utility),
                a if a == self.net_wm_window_type_splash => Some(WindowType::Splash),
                a if a == self.net_wm_window_type_notification => Some(WindowType::Notification),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn protocols(&self, atoms: &[Atom]) -> Protocols {
        let mut protocols = Protocols::empty();
        if atoms.contains(&self.wm_delete_window) {
            protocols |= Protocols::DELETE;
        }
        if atoms.contains(&self.wm_take_focus) {
            protocols |= Protocols::TAKE_FOCUS;
        }
        protocols
    }

    /// Translate a ClientMessage addressed to `window` into a core request
    pub fn decode_client_message(&self, window: Window, root: Window, message_type: Atom, data: [u32; 5]) -> Option<ClientRequest> {
        let request = match message_type {
            t if t == self.net_active_window => ClientRequest::Activate,
            t if t == self.net_close_window => ClientRequest::Close,
            t if t == self.net_wm_desktop => ClientRequest::SetDesktop(data[0]),
            t if t == self.net_current_desktop && window == root => ClientRequest::CurrentDesktop(data[0]),
            t if t == self.net_wm_state => {
                let action = StateAction::from_raw(data[0])?;
                let mut states: Vec<NetState> = Vec::with_capacity(2);
                for state in [data[1], data[2]].into_iter().filter_map(|a| self.net_state(a)) {
                    if !states.contains(&state) {
                        states.push(state);
                    }
                }
                ClientRequest::ChangeState { action, states }
            }
            t if t == self.net_wm_moveresize => ClientRequest::MoveResize {
                root_x: data[0] as i32,
                root_y: data[1] as i32,
                direction: MoveResizeDirection::from_raw(data[2])?,
            },
            t if t == self.wm_change_state && data[0] == 3 => ClientRequest::Iconify,
            t if t == self.win_layer => ClientRequest::SetLayer(i64::from(data[0] as i32)),
            _ => {
                debug!("Ignoring client message type {} for window {}", message_type, window);
                return None;
            }
        };
        Some(request)
    }

    /// Read a 32-bit property as a list of values
    pub fn get_property32<C: Connection>(
        &self,
        conn: &C,
        window: Window,
        property: Atom,
        property_type: impl Into<Atom>,
        length: u32,
    ) -> Result<Vec<u32>> {
        let reply = conn
            .get_property(false, window, property, property_type, 0, length)?
            .reply()?;
        Ok(reply.value32().map(|v| v.collect()).unwrap_or_default())
    }

    pub fn get_window_type<C: Connection>(&self, conn: &C, window: Window) -> Result<WindowType> {
        let atoms = self.get_property32(conn, window, self.net_wm_window_type, AtomEnum::ATOM, 1024)?;
        Ok(self.window_type(&atoms))
    }

    pub fn get_net_states<C: Connection>(&self, conn: &C, window: Window) -> Result<NetStates> {
        let atoms = self.get_property32(conn, window, self.net_wm_state, AtomEnum::ATOM, 1024)?;
        Ok(self.net_states(&atoms))
    }

    pub fn get_protocols<C: Connection>(&self, conn: &C, window: Window) -> Result<Protocols> {
        let atoms = self.get_property32(conn, window, self.wm_protocols, AtomEnum::ATOM, 1024)?;
        Ok(self.protocols(&atoms))
    }

    /// _NET_WM_DESKTOP as published by the client
    pub fn get_desktop<C: Connection>(&self, conn: &C, window: Window) -> Result<Option<u32>> {
        let values = self.get_property32(conn, window, self.net_wm_desktop, AtomEnum::CARDINAL, 1)?;
        Ok(values.first().copied())
    }

    pub fn get_transient_for<C: Connection>(&self, conn: &C, window: Window) -> Result<Option<u32>> {
        let values = self.get_property32(conn, window, AtomEnum::WM_TRANSIENT_FOR.into(), AtomEnum::WINDOW, 1)?;
        Ok(values.first().copied().filter(|&owner| owner != 0 && owner != window))
    }

    pub fn get_normal_hints<C: Connection>(&self, conn: &C, window: Window) -> Result<Vec<u32>> {
        self.get_property32(conn, window, AtomEnum::WM_NORMAL_HINTS.into(), AtomEnum::WM_SIZE_HINTS, 18)
    }

    /// Initial state from WM_HINTS, overridden by an existing WM_STATE left
    /// behind by a previous window manager
    pub fn get_initial_state<C: Connection>(&self, conn: &C, window: Window) -> Result<InitialState> {
        let wm_state = self.get_property32(conn, window, self.wm_state, self.wm_state, 2)?;
        if let Some(&state) = wm_state.first() {
            return Ok(initial_state_from_raw(state));
        }
        let hints = self.get_property32(conn, window, AtomEnum::WM_HINTS.into(), AtomEnum::WM_HINTS, 9)?;
        Ok(initial_state_from_wm_hints(&hints))
    }

    /// Window title, preferring _NET_WM_NAME
    pub fn get_title<C: Connection>(&self, conn: &C, window: Window) -> Result<String> {
        let reply = conn
            .get_property(false, window, self.net_wm_name, self.utf8_string, 0, 256)?
            .reply()?;
        if !reply.value.is_empty() {
            return Ok(String::from_utf8_lossy(&reply.value).into_owned());
        }
        let reply = conn
            .get_property(false, window, AtomEnum::WM_NAME, AtomEnum::ANY, 0, 256)?
            .reply()?;
        Ok(String::from_utf8_lossy(&reply.value).into_owned())
    }

    /// Class part of WM_CLASS (the second string)
    pub fn get_class<C: Connection>(&self, conn: &C, window: Window) -> Result<String> {
        let reply = conn
            .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 256)?
            .reply()?;
        Ok(class_from_wm_class(&reply.value))
    }

    /// Get _MOTIF_WM_HINTS for a window
    pub fn get_motif_hints<C: Connection>(&self, conn: &C, window: Window) -> Result<Option<MotifWmHints>> {
        let values = self.get_property32(conn, window, self.motif_wm_hints, self.motif_wm_hints, 5)?;
        if values.len() < 3 {
            return Ok(None);
        }
        Ok(Some(MotifWmHints {
            flags: values[0],
            functions: values[1],
            decorations: values[2],
        }))
    }
}

fn initial_state_from_raw(state: u32) -> InitialState {
    match state {
        0 => InitialState::Withdrawn,
        3 => InitialState::Iconic,
        _ => InitialState::Normal,
    }
}

/// WM_HINTS: flags, input, initial_state, ...; StateHint is bit 1
fn initial_state_from_wm_hints(hints: &[u32]) -> InitialState {
    const STATE_HINT: u32 = 1 << 1;
    match hints {
        [flags, _, state, ..] if flags & STATE_HINT != 0 => initial_state_from_raw(*state),
        _ => InitialState::Normal,
    }
}

/// WM_CLASS holds "instance\0class\0"
fn class_from_wm_class(value: &[u8]) -> String {
    let mut parts = value.split(|&b| b == 0);
    let instance = parts.next().unwrap_or_default();
    let class = parts.next().filter(|c| !c.is_empty()).unwrap_or(instance);
    String::from_utf8_lossy(class).into_owned()
}

/// MOTIF WM Hints structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotifWmHints {
    pub flags: u32,
    pub functions: u32,
    pub decorations: u32,
}

impl MotifWmHints {
    pub const HINTS_FUNCTIONS: u32 = 1 << 0;
    pub const HINTS_DECORATIONS: u32 = 1 << 1;

    pub const FUNC_ALL: u32 = 1 << 0;
    pub const FUNC_RESIZE: u32 = 1 << 1;
    pub const FUNC_MOVE: u32 = 1 << 2;
    pub const FUNC_MINIMIZE: u32 = 1 << 3;
    pub const FUNC_MAXIMIZE: u32 = 1 << 4;
    pub const FUNC_CLOSE: u32 = 1 << 5;

    pub const DECOR_ALL: u32 = 1 << 0;
    pub const DECOR_BORDER: u32 = 1 << 1;
    pub const DECOR_RESIZEH: u32 = 1 << 2;
    pub const DECOR_TITLE: u32 = 1 << 3;
    pub const DECOR_MENU: u32 = 1 << 4;
    pub const DECOR_MINIMIZE: u32 = 1 << 5;
    pub const DECOR_MAXIMIZE: u32 = 1 << 6;

    /// Border capabilities the client asked to drop.
    ///
    /// With the ALL bit set, the remaining bits list what is removed instead
    /// of what is kept.
    pub fn removed_border(&self) -> BorderFlags {
        let mut removed = BorderFlags::empty();

        if self.flags & Self::HINTS_FUNCTIONS != 0 {
            let all = self.functions & Self::FUNC_ALL != 0;
            for (bit, flag) in [
                (Self::FUNC_RESIZE, BorderFlags::RESIZE),
                (Self::FUNC_MOVE, BorderFlags::MOVE),
                (Self::FUNC_MINIMIZE, BorderFlags::MINIMIZE),
                (Self::FUNC_MAXIMIZE, BorderFlags::MAXIMIZE),
                (Self::FUNC_CLOSE, BorderFlags::CLOSE),
            ] {
                if (self.functions & bit != 0) == all {
                    removed |= flag;
                }
            }
        }

        if self.flags & Self::HINTS_DECORATIONS != 0 {
            let all = self.decorations & Self::DECOR_ALL != 0;
            for (bit, flag) in [
                (Self::DECOR_BORDER, BorderFlags::OUTLINE),
                (Self::DECOR_RESIZEH, BorderFlags::RESIZE),
                (Self::DECOR_TITLE, BorderFlags::TITLE),
                (Self::DECOR_MINIMIZE, BorderFlags::MINIMIZE),
                (Self::DECOR_MAXIMIZE, BorderFlags::MAXIMIZE),
            ] {
                if (self.decorations & bit != 0) == all {
                    removed |= flag;
                }
            }
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms() -> Atoms {
        let mut next = 100;
        Atoms::from_lookup(|_| {
            next += 1;
            Ok(next)
        })
        .unwrap()
    }

    #[test]
    fn test_state_atoms_follow_status_and_layer() {
        let atoms = atoms();
        let states = atoms.net_state_atoms(StatusFlags::MAPPED | StatusFlags::MAXIMIZED, Layer::ABOVE);
        assert_eq!(
            states,
            vec![
                atoms.net_wm_state_maximized_vert,
                atoms.net_wm_state_maximized_horz,
                atoms.net_wm_state_above
            ]
        );
        let states = atoms.net_state_atoms(StatusFlags::MINIMIZED | StatusFlags::NO_LIST, Layer::BELOW);
        assert_eq!(
            states,
            vec![atoms.net_wm_state_hidden, atoms.net_wm_state_skip_taskbar, atoms.net_wm_state_below]
        );
        assert!(atoms.net_state_atoms(StatusFlags::MAPPED, Layer::NORMAL).is_empty());

        let read = atoms.net_states(&atoms.net_state_atoms(StatusFlags::STICKY | StatusFlags::SHADED, Layer::NORMAL));
        assert!(read.sticky && read.shaded && !read.hidden);
    }

    #[test]
    fn test_window_type_takes_first_known() {
        let atoms = atoms();
        assert_eq!(atoms.window_type(&[]), WindowType::Normal);
        assert_eq!(
            atoms.window_type(&[9999, atoms.net_wm_window_type_dock, atoms.net_wm_window_type_normal]),
            WindowType::Dock
        );
    }

    #[test]
    fn test_decode_state_message() {
        let atoms = atoms();
        let request = atoms.decode_client_message(
            5,
            1,
            atoms.net_wm_state,
            [2, atoms.net_wm_state_maximized_vert, atoms.net_wm_state_maximized_horz, 1, 0],
        );
        assert_eq!(
            request,
            Some(ClientRequest::ChangeState {
                action: StateAction::Toggle,
                states: vec![NetState::Maximized],
            })
        );
        assert_eq!(atoms.decode_client_message(5, 1, atoms.net_wm_state, [7, 0, 0, 0, 0]), None);
    }

    #[test]
    fn test_decode_other_messages() {
        let atoms = atoms();
        let root = 1;
        assert_eq!(
            atoms.decode_client_message(5, root, atoms.net_wm_moveresize, [30, 40, 8, 1, 0]),
            Some(ClientRequest::MoveResize {
                root_x: 30,
                root_y: 40,
                direction: MoveResizeDirection::Move
            })
        );
        assert_eq!(
            atoms.decode_client_message(root, root, atoms.net_current_desktop, [2, 0, 0, 0, 0]),
            Some(ClientRequest::CurrentDesktop(2))
        );
        // only meaningful on the root window
        assert_eq!(atoms.decode_client_message(5, root, atoms.net_current_desktop, [2, 0, 0, 0, 0]), None);
        assert_eq!(
            atoms.decode_client_message(5, root, atoms.wm_change_state, [3, 0, 0, 0, 0]),
            Some(ClientRequest::Iconify)
        );
        assert_eq!(atoms.decode_client_message(5, root, atoms.wm_change_state, [1, 0, 0, 0, 0]), None);
        assert_eq!(
            atoms.decode_client_message(5, root, atoms.win_layer, [u32::MAX, 0, 0, 0, 0]),
            Some(ClientRequest::SetLayer(-1))
        );
    }

    #[test]
    fn test_protocols() {
        let atoms = atoms();
        assert_eq!(
            atoms.protocols(&[atoms.wm_take_focus, atoms.wm_delete_window]),
            Protocols::DELETE | Protocols::TAKE_FOCUS
        );
        assert_eq!(atoms.protocols(&[]), Protocols::empty());
    }

    #[test]
    fn test_initial_state_from_hints() {
        assert_eq!(initial_state_from_wm_hints(&[]), InitialState::Normal);
        assert_eq!(initial_state_from_wm_hints(&[0b10, 1, 3, 0, 0, 0, 0, 0, 0]), InitialState::Iconic);
        // state field ignored without the StateHint flag
        assert_eq!(initial_state_from_wm_hints(&[0b01, 1, 3, 0, 0, 0, 0, 0, 0]), InitialState::Normal);
        assert_eq!(initial_state_from_raw(0), InitialState::Withdrawn);
    }

    #[test]
    fn test_class_from_wm_class() {
        assert_eq!(class_from_wm_class(b"xterm\0XTerm\0"), "XTerm");
        assert_eq!(class_from_wm_class(b"solo"), "solo");
        assert_eq!(class_from_wm_class(b""), "");
    }

    #[test]
    fn test_motif_removed_border() {
        let no_title = MotifWmHints {
            flags: MotifWmHints::HINTS_DECORATIONS,
            functions: 0,
            decorations: MotifWmHints::DECOR_BORDER,
        };
        let removed = no_title.removed_border();
        assert!(removed.contains(BorderFlags::TITLE));
        assert!(!removed.contains(BorderFlags::OUTLINE));

        // ALL inverts the meaning of the other bits
        let no_close = MotifWmHints {
            flags: MotifWmHints::HINTS_FUNCTIONS,
            functions: MotifWmHints::FUNC_ALL | MotifWmHints::FUNC_CLOSE,
            decorations: 0,
        };
        assert_eq!(no_close.removed_border(), BorderFlags::CLOSE);

        let ignored = MotifWmHints { flags: 0, functions: 0, decorations: 0 };
        assert_eq!(ignored.removed_border(), BorderFlags::empty());
    }
}

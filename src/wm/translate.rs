//! X11 event translation
//!
//! Turns x11rb events into [`WmEvent`]s for the core, answering the few
//! questions that need the server on the way (key symbols, monitors,
//! replaying pointer grabs on client windows).

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, trace, warn};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::wm::backend::log_protocol_error;
use crate::wm::events::{self, WmEvent};
use crate::wm::ewmh::Atoms;
use crate::wm::keyboard::{Key, Modifiers};
use crate::wm::x11::{modifiers_from, query_screens};

/// Keysyms with a meaning during move/resize
mod keysym {
    pub const RETURN: u32 = 0xff0d;
    pub const ESCAPE: u32 = 0xff1b;
    pub const LEFT: u32 = 0xff51;
    pub const UP: u32 = 0xff52;
    pub const RIGHT: u32 = 0xff53;
    pub const DOWN: u32 = 0xff54;
    pub const KP_ENTER: u32 = 0xff8d;
    pub const KP_LEFT: u32 = 0xff96;
    pub const KP_UP: u32 = 0xff97;
    pub const KP_RIGHT: u32 = 0xff98;
    pub const KP_DOWN: u32 = 0xff99;
}

fn key_for_keysym(sym: u32) -> Option<Key> {
    match sym {
        keysym::LEFT | keysym::KP_LEFT => Some(Key::Left),
        keysym::RIGHT | keysym::KP_RIGHT => Some(Key::Right),
        keysym::UP | keysym::KP_UP => Some(Key::Up),
        keysym::DOWN | keysym::KP_DOWN => Some(Key::Down),
        keysym::RETURN | keysym::KP_ENTER => Some(Key::Return),
        keysym::ESCAPE => Some(Key::Escape),
        _ => None,
    }
}

/// Keycode lookups derived from the server's keyboard and modifier mappings
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    keys: HashMap<u8, Key>,
    modifiers: HashMap<u8, Modifiers>,
}

impl KeyMap {
    /// `keysyms` holds `keysyms_per_keycode` entries per keycode starting at
    /// `min_keycode`; `modifier_keycodes` holds `keycodes_per_modifier`
    /// entries for each of the eight modifiers in bit order.
    pub fn from_mappings(
        min_keycode: u8,
        keysyms_per_keycode: u8,
        keysyms: &[u32],
        keycodes_per_modifier: u8,
        modifier_keycodes: &[u8],
    ) -> Self {
        let mut keys = HashMap::new();
        if keysyms_per_keycode > 0 {
            for (offset, syms) in keysyms.chunks(usize::from(keysyms_per_keycode)).enumerate() {
                let Ok(keycode) = u8::try_from(usize::from(min_keycode) + offset) else {
                    break;
                };
                if let Some(key) = syms.iter().find_map(|&sym| key_for_keysym(sym)) {
                    keys.insert(keycode, key);
                }
            }
        }

        let mut modifiers = HashMap::new();
        if keycodes_per_modifier > 0 {
            for (index, codes) in modifier_keycodes.chunks(usize::from(keycodes_per_modifier)).take(8).enumerate() {
                let mask = Modifiers::from_bits_truncate(1 << index);
                for &code in codes.iter().filter(|&&c| c != 0) {
                    *modifiers.entry(code).or_insert(Modifiers::empty()) |= mask;
                }
            }
        }

        Self { keys, modifiers }
    }

    pub fn query(conn: &RustConnection) -> Result<Self> {
        let setup = conn.setup();
        let count = setup.max_keycode - setup.min_keycode + 1;
        let keyboard = conn.get_keyboard_mapping(setup.min_keycode, count)?.reply()?;
        let modifier_map = conn.get_modifier_mapping()?.reply()?;
        Ok(Self::from_mappings(
            setup.min_keycode,
            keyboard.keysyms_per_keycode,
            &keyboard.keysyms,
            modifier_map.keycodes_per_modifier(),
            &modifier_map.keycodes,
        ))
    }

    pub fn key(&self, keycode: u8) -> Key {
        self.keys.get(&keycode).copied().unwrap_or(Key::Other)
    }

    /// Modifier bits a keycode sets while held
    pub fn modifier(&self, keycode: u8) -> Modifiers {
        self.modifiers.get(&keycode).copied().unwrap_or(Modifiers::empty())
    }
}

/// Changed fields of a ConfigureRequest
pub fn configure_request_from(event: &ConfigureRequestEvent) -> events::ConfigureRequest {
    let mask = event.value_mask;
    let has = |field: ConfigWindow| u16::from(mask) & u16::from(field) != 0;
    events::ConfigureRequest {
        x: has(ConfigWindow::X).then_some(i32::from(event.x)),
        y: has(ConfigWindow::Y).then_some(i32::from(event.y)),
        width: has(ConfigWindow::WIDTH).then_some(u32::from(event.width)),
        height: has(ConfigWindow::HEIGHT).then_some(u32::from(event.height)),
        stack_mode: if has(ConfigWindow::STACK_MODE) {
            match event.stack_mode {
                StackMode::ABOVE | StackMode::TOP_IF => Some(events::StackMode::Above),
                StackMode::BELOW | StackMode::BOTTOM_IF => Some(events::StackMode::Below),
                _ => None,
            }
        } else {
            None
        },
    }
}

/// Properties whose change means the core should re-read the window
fn tracks_property(atoms: &Atoms, atom: Atom) -> bool {
    atom == u32::from(AtomEnum::WM_NORMAL_HINTS)
        || atom == u32::from(AtomEnum::WM_NAME)
        || atom == u32::from(AtomEnum::WM_CLASS)
        || atom == atoms.net_wm_name
        || atom == atoms.wm_protocols
}

pub struct EventTranslator {
    conn: Arc<RustConnection>,
    screen_num: usize,
    root: Window,
    atoms: Atoms,
    keymap: KeyMap,
}

impl EventTranslator {
    pub fn new(conn: Arc<RustConnection>, screen_num: usize, atoms: Atoms) -> Result<Self> {
        let root = conn.setup().roots[screen_num].root;
        let keymap = KeyMap::query(&conn)?;
        Ok(Self {
            conn,
            screen_num,
            root,
            atoms,
            keymap,
        })
    }

    /// Translate one server event; `None` for events the core does not need.
    pub fn translate(&mut self, event: Event) -> Option<WmEvent> {
        match event {
            Event::MapRequest(e) => Some(WmEvent::MapRequest { window: e.window }),
            Event::UnmapNotify(e) => Some(WmEvent::UnmapNotify {
                window: e.window,
                synthetic: e.response_type & 0x80 != 0,
            }),
            Event::DestroyNotify(e) => Some(WmEvent::DestroyNotify { window: e.window }),
            Event::ConfigureRequest(e) => Some(WmEvent::ConfigureRequest {
                window: e.window,
                request: configure_request_from(&e),
            }),
            Event::PropertyNotify(e) if tracks_property(&self.atoms, e.atom) => {
                Some(WmEvent::PropertyNotify { window: e.window })
            }
            Event::ClientMessage(e) => self
                .atoms
                .decode_client_message(e.window, self.root, e.type_, e.data.as_data32())
                .map(|request| WmEvent::ClientMessage { window: e.window, request }),
            Event::ButtonPress(e) => {
                let modifiers = modifiers_from(e.state);
                // release the pointer frozen by the passive grab on client
                // windows; Alt-clicks stay with us
                let mode = if modifiers.contains(Modifiers::MOD1) {
                    Allow::ASYNC_POINTER
                } else {
                    Allow::REPLAY_POINTER
                };
                if let Err(err) = self.conn.allow_events(mode, e.time) {
                    log_protocol_error("AllowEvents", e.event, err);
                }
                Some(WmEvent::ButtonPress {
                    window: e.event,
                    root_x: i32::from(e.root_x),
                    root_y: i32::from(e.root_y),
                    button: e.detail,
                    modifiers,
                })
            }
            Event::ButtonRelease(e) => Some(WmEvent::ButtonRelease {
                root_x: i32::from(e.root_x),
                root_y: i32::from(e.root_y),
                button: e.detail,
            }),
            Event::MotionNotify(e) => Some(WmEvent::MotionNotify {
                root_x: i32::from(e.root_x),
                root_y: i32::from(e.root_y),
            }),
            Event::EnterNotify(e) if e.mode == NotifyMode::NORMAL => Some(WmEvent::EnterNotify { window: e.event }),
            Event::KeyPress(e) => Some(WmEvent::KeyPress {
                key: self.keymap.key(e.detail),
                keycode: e.detail,
                modifiers: modifiers_from(e.state),
            }),
            Event::KeyRelease(e) => Some(WmEvent::KeyRelease {
                modifiers_after: modifiers_from(e.state) - self.keymap.modifier(e.detail),
            }),
            Event::ColormapNotify(e) if e.new => Some(WmEvent::ColormapNotify {
                window: e.window,
                colormap: (e.colormap != x11rb::NONE).then_some(e.colormap),
            }),
            Event::RandrScreenChangeNotify(_) => match query_screens(&self.conn, self.screen_num) {
                Ok((root, monitors)) => Some(WmEvent::ScreenChange { root, monitors }),
                Err(e) => {
                    warn!("Failed to query screens after a change: {}", e);
                    None
                }
            },
            Event::MappingNotify(e) => {
                if e.request != Mapping::POINTER {
                    match KeyMap::query(&self.conn) {
                        Ok(keymap) => {
                            debug!("Keyboard mapping changed, reloaded");
                            self.keymap = keymap;
                        }
                        Err(err) => warn!("Failed to reload keyboard mapping: {}", err),
                    }
                }
                None
            }
            Event::Error(e) => {
                log_protocol_error(e.request_name.unwrap_or("Request"), e.bad_value, format!("{:?}", e.error_kind));
                None
            }
            other => {
                trace!("Ignoring event {:?}", other);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value_mask: ConfigWindow, stack_mode: StackMode) -> ConfigureRequestEvent {
        ConfigureRequestEvent {
            response_type: CONFIGURE_REQUEST_EVENT,
            stack_mode,
            sequence: 0,
            parent: 1,
            window: 2,
            sibling: 0,
            x: -5,
            y: 7,
            width: 300,
            height: 200,
            border_width: 0,
            value_mask,
        }
    }

    #[test]
    fn test_configure_request_fields_follow_mask() {
        let r = configure_request_from(&request(ConfigWindow::X | ConfigWindow::HEIGHT, StackMode::ABOVE));
        assert_eq!(r.x, Some(-5));
        assert_eq!(r.y, None);
        assert_eq!(r.width, None);
        assert_eq!(r.height, Some(200));
        assert_eq!(r.stack_mode, None);

        let r = configure_request_from(&request(ConfigWindow::STACK_MODE, StackMode::BOTTOM_IF));
        assert_eq!(r.stack_mode, Some(events::StackMode::Below));
        let r = configure_request_from(&request(ConfigWindow::STACK_MODE, StackMode::OPPOSITE));
        assert_eq!(r.stack_mode, None);
    }

    #[test]
    fn test_keymap_from_mappings() {
        // keycodes 8..=11, two keysyms each
        let keysyms = [0x61, 0x41, keysym::LEFT, keysym::KP_LEFT, 0, keysym::ESCAPE, 0xffe9, 0];
        // two keycodes per modifier: shift, lock, control, mod1, then empty
        let modifier_keycodes = [50, 62, 66, 0, 37, 105, 11, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let map = KeyMap::from_mappings(8, 2, &keysyms, 2, &modifier_keycodes);
        assert_eq!(map.key(8), Key::Other);
        assert_eq!(map.key(9), Key::Left);
        assert_eq!(map.key(10), Key::Escape);
        assert_eq!(map.key(200), Key::Other);
        assert_eq!(map.modifier(11), Modifiers::MOD1);
        assert_eq!(map.modifier(62), Modifiers::SHIFT);
        assert_eq!(map.modifier(37), Modifiers::CONTROL);
        assert_eq!(map.modifier(0), Modifiers::empty());
    }
}

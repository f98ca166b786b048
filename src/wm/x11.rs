//! X11 Backend
//!
//! [`Backend`] over an x11rb connection. Requests are sent unchecked; their
//! errors come back through the event stream and are logged there.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::randr::{self, ConnectionExt as _};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::shared::Geometry;
use crate::wm::WmError;
use crate::wm::backend::{Backend, GrabCursor, WindowInfo, WmState, log_protocol_error};
use crate::wm::client_flags::{Layer, StatusFlags};
use crate::wm::decorations::{FrameExtents, ResizeEdges};
use crate::wm::events::{self, ConfigureRequest};
use crate::wm::ewmh::Atoms;
use crate::wm::hints::SizeHints;
use crate::wm::keyboard::{KeyBinding, Modifiers};
use crate::wm::screen::ScreenModel;
use crate::wm::translate::EventTranslator;
use crate::wm::workspace::ALL_DESKTOPS;

/// How long `--replace` waits for the previous manager to let go
const REPLACE_TIMEOUT: Duration = Duration::from_secs(15);

/// Lock-style modifiers every key grab is repeated for
const IGNORED_MODIFIERS: [u16; 4] = [
    0,
    Modifiers::LOCK.bits(),
    Modifiers::MOD2.bits(),
    Modifiers::LOCK.bits() | Modifiers::MOD2.bits(),
];

/// Events selected on every frame
fn frame_events() -> EventMask {
    EventMask::SUBSTRUCTURE_REDIRECT
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::BUTTON_PRESS
        | EventMask::BUTTON_RELEASE
        | EventMask::ENTER_WINDOW
        | EventMask::EXPOSURE
}

/// Events selected on client windows we did not create. Structure
/// notifications already arrive through the frame.
fn client_events() -> EventMask {
    EventMask::PROPERTY_CHANGE | EventMask::COLOR_MAP_CHANGE
}

fn pointer_grab_events() -> EventMask {
    EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION
}

/// Glyphs from the standard cursor font
mod glyph {
    pub const BOTTOM_LEFT_CORNER: u16 = 12;
    pub const BOTTOM_RIGHT_CORNER: u16 = 14;
    pub const BOTTOM_SIDE: u16 = 16;
    pub const FLEUR: u16 = 52;
    pub const LEFT_PTR: u16 = 68;
    pub const LEFT_SIDE: u16 = 70;
    pub const RIGHT_SIDE: u16 = 96;
    pub const TOP_LEFT_CORNER: u16 = 134;
    pub const TOP_RIGHT_CORNER: u16 = 136;
    pub const TOP_SIDE: u16 = 138;
}

/// Cursor font glyph for a pointer grab
pub fn cursor_glyph(cursor: GrabCursor) -> u16 {
    match cursor {
        GrabCursor::Move => glyph::FLEUR,
        GrabCursor::Resize(edges) => {
            let north = edges.contains(ResizeEdges::NORTH);
            let south = edges.contains(ResizeEdges::SOUTH);
            let west = edges.contains(ResizeEdges::WEST);
            let east = edges.contains(ResizeEdges::EAST);
            match (north, south, west, east) {
                (true, _, true, _) => glyph::TOP_LEFT_CORNER,
                (true, _, _, true) => glyph::TOP_RIGHT_CORNER,
                (_, true, true, _) => glyph::BOTTOM_LEFT_CORNER,
                (_, true, _, true) => glyph::BOTTOM_RIGHT_CORNER,
                (true, ..) => glyph::TOP_SIDE,
                (_, true, ..) => glyph::BOTTOM_SIDE,
                (_, _, true, _) => glyph::LEFT_SIDE,
                (.., true) => glyph::RIGHT_SIDE,
                _ => glyph::FLEUR,
            }
        }
    }
}

/// Open the display and take over window management on its default screen.
fn become_wm(replace: bool) -> Result<(RustConnection, usize, Window), WmError> {
    let (conn, screen_num) = x11rb::connect(None)?;
    let root = conn.setup().roots[screen_num].root;
    let root_depth = conn.setup().roots[screen_num].root_depth;

    // ICCCM: the manager of screen N owns WM_S{N}
    let selection_name = format!("WM_S{}", screen_num);
    let selection = conn.intern_atom(false, selection_name.as_bytes())?.reply()?.atom;
    let previous = conn.get_selection_owner(selection)?.reply()?.owner;
    if previous != x11rb::NONE {
        if !replace {
            return Err(WmError::AnotherWmRunning(previous));
        }
        info!("Existing WM detected (window 0x{:x}), attempting replace...", previous);
        conn.change_window_attributes(
            previous,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::STRUCTURE_NOTIFY),
        )?;
    }

    let owner = conn.generate_id()?;
    conn.create_window(
        root_depth,
        owner,
        root,
        -100,
        -100,
        1,
        1,
        0,
        WindowClass::INPUT_OUTPUT,
        x11rb::COPY_FROM_PARENT,
        &CreateWindowAux::new().override_redirect(1),
    )?;
    conn.set_selection_owner(owner, selection, x11rb::CURRENT_TIME)?.check()?;
    if conn.get_selection_owner(selection)?.reply()?.owner != owner {
        return Err(WmError::AnotherWmRunning(previous));
    }

    if previous != x11rb::NONE {
        info!("Waiting for previous WM to exit...");
        let start = Instant::now();
        // the old owner window disappears once its manager has let go
        while conn.get_window_attributes(previous)?.reply().is_ok() {
            if start.elapsed() >= REPLACE_TIMEOUT {
                return Err(WmError::ReplaceTimeout(REPLACE_TIMEOUT.as_secs()));
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        info!("Previous WM exited");
    }

    let root_events = EventMask::SUBSTRUCTURE_REDIRECT
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::BUTTON_PRESS
        | EventMask::PROPERTY_CHANGE
        | EventMask::COLOR_MAP_CHANGE;
    if conn
        .change_window_attributes(root, &ChangeWindowAttributesAux::new().event_mask(root_events))?
        .check()
        .is_err()
    {
        let owner = conn.get_selection_owner(selection)?.reply()?.owner;
        return Err(WmError::AnotherWmRunning(owner));
    }

    Ok((conn, screen_num, owner))
}

/// Cursors and the outline GC created once at startup
#[derive(Debug)]
struct Resources {
    cursor_font: Font,
    root_cursor: Cursor,
    outline_gc: Gcontext,
}

pub struct X11Backend {
    conn: Arc<RustConnection>,
    screen_num: usize,
    root: Window,
    /// Owns WM_S{n} and carries _NET_SUPPORTING_WM_CHECK
    owner: Window,
    atoms: Atoms,
    resources: Resources,
}

impl X11Backend {
    pub fn connect(replace: bool) -> Result<Self> {
        let (conn, screen_num, owner) = become_wm(replace)?;
        let conn = Arc::new(conn);
        let root = conn.setup().roots[screen_num].root;
        info!("Connected to X11 display (screen {}, root 0x{:x})", screen_num, root);

        let atoms = Atoms::new(conn.as_ref()).context("Failed to intern atoms")?;
        atoms.setup_supported(conn.as_ref(), root)?;
        atoms.setup_supporting_check(conn.as_ref(), root, owner)?;

        let resources = Self::create_resources(&conn, screen_num)?;
        conn.change_window_attributes(root, &ChangeWindowAttributesAux::new().cursor(resources.root_cursor))?;

        match conn.randr_query_version(1, 5)?.reply() {
            Ok(version) => {
                debug!("RandR {}.{}", version.major_version, version.minor_version);
                conn.randr_select_input(root, randr::NotifyMask::SCREEN_CHANGE)?;
            }
            Err(e) => warn!("RandR unavailable, using the root window as the only screen: {}", e),
        }
        conn.flush()?;

        Ok(Self {
            conn,
            screen_num,
            root,
            owner,
            atoms,
            resources,
        })
    }

    fn create_resources(conn: &RustConnection, screen_num: usize) -> Result<Resources> {
        let screen = &conn.setup().roots[screen_num];
        let cursor_font = conn.generate_id()?;
        conn.open_font(cursor_font, b"cursor")?;
        let root_cursor = Self::create_cursor(conn, cursor_font, glyph::LEFT_PTR)?;

        let outline_gc = conn.generate_id()?;
        conn.create_gc(
            outline_gc,
            screen.root,
            &CreateGCAux::new()
                .function(GX::XOR)
                .foreground(screen.white_pixel ^ screen.black_pixel)
                .line_width(2)
                .subwindow_mode(SubwindowMode::INCLUDE_INFERIORS),
        )?;

        Ok(Resources {
            cursor_font,
            root_cursor,
            outline_gc,
        })
    }

    fn create_cursor(conn: &RustConnection, font: Font, glyph: u16) -> Result<Cursor> {
        let cursor = conn.generate_id()?;
        conn.create_glyph_cursor(cursor, font, font, glyph, glyph + 1, 0, 0, 0, 0xffff, 0xffff, 0xffff)?;
        Ok(cursor)
    }

    pub fn connection(&self) -> Arc<RustConnection> {
        self.conn.clone()
    }

    /// Translator sharing this connection and atom table
    pub fn event_translator(&self) -> Result<EventTranslator> {
        EventTranslator::new(self.conn.clone(), self.screen_num, self.atoms.clone())
    }

    /// Root geometry plus one rectangle per active monitor
    pub fn screen_model(&self) -> Result<ScreenModel> {
        let (root, monitors) = query_screens(self.conn.as_ref(), self.screen_num)?;
        Ok(ScreenModel::new(root, monitors))
    }

    /// Top-level windows present before we started, bottom to top
    pub fn existing_windows(&self) -> Result<Vec<Window>> {
        let tree = self.conn.query_tree(self.root)?.reply()?;
        let mut windows = Vec::new();
        for window in tree.children.into_iter().filter(|&w| w != self.owner) {
            let Ok(attrs) = self.conn.get_window_attributes(window)?.reply() else {
                continue;
            };
            if attrs.override_redirect || attrs.map_state != MapState::VIEWABLE {
                continue;
            }
            windows.push(window);
        }
        debug!("Found {} existing windows", windows.len());
        Ok(windows)
    }

    fn inspect(&self, window: Window) -> Result<Option<WindowInfo>> {
        let conn = self.conn.as_ref();
        let Ok(attrs) = conn.get_window_attributes(window)?.reply() else {
            return Ok(None);
        };
        let Ok(geometry) = conn.get_geometry(window)?.reply() else {
            return Ok(None);
        };
        let atoms = &self.atoms;
        let normal_hints = atoms.get_normal_hints(conn, window).unwrap_or_default();
        let removed_border = atoms
            .get_motif_hints(conn, window)
            .ok()
            .flatten()
            .map(|hints| hints.removed_border())
            .unwrap_or_default();

        Ok(Some(WindowInfo {
            geometry: Geometry::new(
                i32::from(geometry.x),
                i32::from(geometry.y),
                u32::from(geometry.width),
                u32::from(geometry.height),
            ),
            override_redirect: attrs.override_redirect,
            input_only: attrs.class == WindowClass::INPUT_ONLY,
            viewable: attrs.map_state == MapState::VIEWABLE,
            size_hints: SizeHints::from_wm_normal_hints(&normal_hints),
            protocols: atoms.get_protocols(conn, window).unwrap_or_default(),
            transient_for: atoms.get_transient_for(conn, window).ok().flatten(),
            desktop: atoms.get_desktop(conn, window).ok().flatten(),
            net_states: atoms.get_net_states(conn, window).unwrap_or_default(),
            initial_state: atoms.get_initial_state(conn, window).unwrap_or_default(),
            window_type: atoms.get_window_type(conn, window).unwrap_or_default(),
            removed_border,
            colormap: (attrs.colormap != x11rb::NONE).then_some(attrs.colormap),
            title: atoms.get_title(conn, window).unwrap_or_default(),
            class: atoms.get_class(conn, window).unwrap_or_default(),
        }))
    }

    fn build_frame(&self, window: Window, frame: Geometry, client: Geometry, foreign: bool) -> Result<Window> {
        let conn = self.conn.as_ref();
        let screen = &conn.setup().roots[self.screen_num];
        let id = conn.generate_id()?;
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            id,
            self.root,
            clamp_i16(frame.x),
            clamp_i16(frame.y),
            clamp_u16(frame.width),
            clamp_u16(frame.height),
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .background_pixel(screen.black_pixel)
                .event_mask(frame_events()),
        )?;
        if foreign {
            conn.change_window_attributes(window, &ChangeWindowAttributesAux::new().event_mask(client_events()))?;
        }
        conn.change_save_set(SetMode::INSERT, window)?;
        conn.configure_window(window, &ConfigureWindowAux::new().border_width(0))?;
        conn.reparent_window(window, id, clamp_i16(client.x), clamp_i16(client.y))?;
        // clicks in the client focus it and are then replayed
        conn.grab_button(
            false,
            window,
            EventMask::BUTTON_PRESS,
            GrabMode::SYNC,
            GrabMode::ASYNC,
            x11rb::NONE,
            x11rb::NONE,
            ButtonIndex::ANY,
            ModMask::ANY,
        )?;
        Ok(id)
    }

    fn send_protocol(&self, window: Window, protocol: Atom) {
        let event = ClientMessageEvent::new(32, window, self.atoms.wm_protocols, [protocol, x11rb::CURRENT_TIME, 0, 0, 0]);
        check(
            "SendEvent(WM_PROTOCOLS)",
            window,
            self.conn.send_event(false, window, EventMask::NO_EVENT, event),
        );
    }

    fn outline(&self, geometry: Geometry) {
        let rectangle = Rectangle {
            x: clamp_i16(geometry.x),
            y: clamp_i16(geometry.y),
            width: clamp_u16(geometry.width.saturating_sub(1)),
            height: clamp_u16(geometry.height.saturating_sub(1)),
        };
        check(
            "PolyRectangle",
            self.root,
            self.conn.poly_rectangle(self.root, self.resources.outline_gc, &[rectangle]),
        );
    }

    fn root_cardinal(&self, property: Atom, value: u32) {
        check(
            "ChangeProperty",
            self.root,
            self.atoms.update_cardinal(self.conn.as_ref(), self.root, property, value),
        );
    }
}

impl Backend for X11Backend {
    fn inspect_window(&mut self, window: u32) -> Option<WindowInfo> {
        match self.inspect(window) {
            Ok(info) => info,
            Err(e) => {
                log_protocol_error("InspectWindow", window, e);
                None
            }
        }
    }

    fn create_frame(&mut self, window: u32, frame: Geometry, client: Geometry, foreign: bool) -> Option<u32> {
        match self.build_frame(window, frame, client, foreign) {
            Ok(id) => {
                debug!("Framed window {} in 0x{:x}", window, id);
                Some(id)
            }
            Err(e) => {
                log_protocol_error("CreateFrame", window, e);
                None
            }
        }
    }

    fn destroy_frame(&mut self, frame: u32) {
        check("DestroyWindow", frame, self.conn.destroy_window(frame));
    }

    fn reparent_to_root(&mut self, window: u32, x: i32, y: i32) {
        check(
            "ReparentWindow",
            window,
            self.conn.reparent_window(window, self.root, clamp_i16(x), clamp_i16(y)),
        );
        check("ChangeSaveSet", window, self.conn.change_save_set(SetMode::DELETE, window));
    }

    fn map_window(&mut self, window: u32) {
        check("MapWindow", window, self.conn.map_window(window));
    }

    fn unmap_window(&mut self, window: u32) {
        check("UnmapWindow", window, self.conn.unmap_window(window));
    }

    fn configure_frame(&mut self, frame: u32, geometry: Geometry) {
        check("ConfigureWindow", frame, self.conn.configure_window(frame, &geometry_aux(geometry)));
    }

    fn configure_client(&mut self, window: u32, geometry: Geometry) {
        check("ConfigureWindow", window, self.conn.configure_window(window, &geometry_aux(geometry)));
    }

    fn configure_unmanaged(&mut self, window: u32, request: &ConfigureRequest) {
        let mut aux = ConfigureWindowAux::new();
        aux.x = request.x;
        aux.y = request.y;
        aux.width = request.width;
        aux.height = request.height;
        aux.stack_mode = request.stack_mode.map(|mode| match mode {
            events::StackMode::Above => StackMode::ABOVE,
            events::StackMode::Below => StackMode::BELOW,
        });
        check("ConfigureWindow", window, self.conn.configure_window(window, &aux));
    }

    fn send_configure_notify(&mut self, window: u32, geometry: Geometry) {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: window,
            window,
            above_sibling: x11rb::NONE,
            x: clamp_i16(geometry.x),
            y: clamp_i16(geometry.y),
            width: clamp_u16(geometry.width),
            height: clamp_u16(geometry.height),
            border_width: 0,
            override_redirect: false,
        };
        check(
            "SendEvent(ConfigureNotify)",
            window,
            self.conn.send_event(false, window, EventMask::STRUCTURE_NOTIFY, event),
        );
    }

    fn restack(&mut self, frames: &[u32]) {
        let Some((&top, rest)) = frames.split_first() else {
            return;
        };
        check(
            "ConfigureWindow",
            top,
            self.conn.configure_window(top, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE)),
        );
        let mut above = top;
        for &frame in rest {
            let aux = ConfigureWindowAux::new().sibling(above).stack_mode(StackMode::BELOW);
            check("ConfigureWindow", frame, self.conn.configure_window(frame, &aux));
            above = frame;
        }
    }

    fn set_input_focus(&mut self, window: Option<u32>) {
        let target = window.unwrap_or(self.root);
        check(
            "SetInputFocus",
            target,
            self.conn.set_input_focus(InputFocus::POINTER_ROOT, target, x11rb::CURRENT_TIME),
        );
    }

    fn send_take_focus(&mut self, window: u32) {
        self.send_protocol(window, self.atoms.wm_take_focus);
    }

    fn send_delete_window(&mut self, window: u32) {
        self.send_protocol(window, self.atoms.wm_delete_window);
    }

    fn kill_client(&mut self, window: u32) {
        check("KillClient", window, self.conn.kill_client(window));
    }

    fn install_colormap(&mut self, colormap: Option<u32>) {
        let colormap = colormap.unwrap_or(self.conn.setup().roots[self.screen_num].default_colormap);
        check("InstallColormap", colormap, self.conn.install_colormap(colormap));
    }

    fn grab_pointer(&mut self, cursor: GrabCursor) -> bool {
        let shape = match Self::create_cursor(&self.conn, self.resources.cursor_font, cursor_glyph(cursor)) {
            Ok(shape) => shape,
            Err(e) => {
                log_protocol_error("CreateGlyphCursor", self.root, e);
                x11rb::NONE
            }
        };
        let status = self
            .conn
            .grab_pointer(
                false,
                self.root,
                pointer_grab_events(),
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                shape,
                x11rb::CURRENT_TIME,
            )
            .map_err(anyhow::Error::from)
            .and_then(|cookie| Ok(cookie.reply()?.status));
        if shape != x11rb::NONE {
            check("FreeCursor", shape, self.conn.free_cursor(shape));
        }
        match status {
            Ok(status) if status == GrabStatus::SUCCESS => true,
            Ok(status) => {
                debug!("Pointer grab refused: {:?}", status);
                false
            }
            Err(e) => {
                log_protocol_error("GrabPointer", self.root, e);
                false
            }
        }
    }

    fn ungrab_pointer(&mut self) {
        check("UngrabPointer", self.root, self.conn.ungrab_pointer(x11rb::CURRENT_TIME));
    }

    fn grab_keyboard(&mut self) -> bool {
        let status = self
            .conn
            .grab_keyboard(false, self.root, x11rb::CURRENT_TIME, GrabMode::ASYNC, GrabMode::ASYNC)
            .map_err(anyhow::Error::from)
            .and_then(|cookie| Ok(cookie.reply()?.status));
        match status {
            Ok(status) if status == GrabStatus::SUCCESS => true,
            Ok(status) => {
                debug!("Keyboard grab refused: {:?}", status);
                false
            }
            Err(e) => {
                log_protocol_error("GrabKeyboard", self.root, e);
                false
            }
        }
    }

    fn ungrab_keyboard(&mut self) {
        check("UngrabKeyboard", self.root, self.conn.ungrab_keyboard(x11rb::CURRENT_TIME));
    }

    fn grab_keys(&mut self, bindings: &[KeyBinding]) {
        check("UngrabKey", self.root, self.conn.ungrab_key(Grab::ANY, self.root, ModMask::ANY));
        for binding in bindings {
            for ignored in IGNORED_MODIFIERS {
                let modifiers = ModMask::from(binding.modifiers.bits() | ignored);
                check(
                    "GrabKey",
                    self.root,
                    self.conn.grab_key(true, self.root, modifiers, binding.keycode, GrabMode::ASYNC, GrabMode::ASYNC),
                );
            }
        }
    }

    fn draw_outline(&mut self, geometry: Geometry) {
        self.outline(geometry);
    }

    fn erase_outline(&mut self, geometry: Geometry) {
        // XOR drawing: the same rectangle again restores the screen
        self.outline(geometry);
    }

    fn set_wm_state(&mut self, window: u32, state: WmState) {
        check(
            "ChangeProperty(WM_STATE)",
            window,
            self.atoms.update_wm_state(self.conn.as_ref(), window, state as u32),
        );
    }

    fn set_net_wm_state(&mut self, window: u32, status: StatusFlags, layer: Layer) {
        check(
            "ChangeProperty(_NET_WM_STATE)",
            window,
            self.atoms.update_net_wm_state(self.conn.as_ref(), window, status, layer),
        );
    }

    fn set_frame_extents(&mut self, window: u32, extents: FrameExtents) {
        check(
            "ChangeProperty(_NET_FRAME_EXTENTS)",
            window,
            self.atoms.update_frame_extents(
                self.conn.as_ref(),
                window,
                extents.west,
                extents.east,
                extents.north,
                extents.south,
            ),
        );
    }

    fn set_window_desktop(&mut self, window: u32, desktop: Option<u32>) {
        check(
            "ChangeProperty(_NET_WM_DESKTOP)",
            window,
            self.atoms.update_cardinal(
                self.conn.as_ref(),
                window,
                self.atoms.net_wm_desktop,
                desktop.unwrap_or(ALL_DESKTOPS),
            ),
        );
    }

    fn set_active_window(&mut self, window: Option<u32>) {
        check(
            "ChangeProperty(_NET_ACTIVE_WINDOW)",
            self.root,
            self.atoms.update_active_window(self.conn.as_ref(), self.root, window),
        );
    }

    fn set_client_list(&mut self, windows: &[u32]) {
        check(
            "ChangeProperty(_NET_CLIENT_LIST)",
            self.root,
            self.atoms
                .update_window_list(self.conn.as_ref(), self.root, self.atoms.net_client_list, windows),
        );
    }

    fn set_client_list_stacking(&mut self, windows: &[u32]) {
        check(
            "ChangeProperty(_NET_CLIENT_LIST_STACKING)",
            self.root,
            self.atoms
                .update_window_list(self.conn.as_ref(), self.root, self.atoms.net_client_list_stacking, windows),
        );
    }

    fn set_current_desktop(&mut self, desktop: u32) {
        self.root_cardinal(self.atoms.net_current_desktop, desktop);
    }

    fn set_desktop_count(&mut self, count: u32) {
        self.root_cardinal(self.atoms.net_number_of_desktops, count);
    }

    fn flush(&mut self) {
        if let Err(e) = self.conn.flush() {
            warn!("Failed to flush X11 connection: {}", e);
        }
    }

    fn shutdown(&mut self) {
        info!("Releasing X11 resources");
        check("UngrabKey", self.root, self.conn.ungrab_key(Grab::ANY, self.root, ModMask::ANY));
        check("ClearRoot", self.root, self.atoms.clear_root(self.conn.as_ref(), self.root));
        check("FreeGC", self.root, self.conn.free_gc(self.resources.outline_gc));
        check("FreeCursor", self.root, self.conn.free_cursor(self.resources.root_cursor));
        check("CloseFont", self.root, self.conn.close_font(self.resources.cursor_font));
        check("DestroyWindow", self.owner, self.conn.destroy_window(self.owner));
        self.set_input_focus(None);
        self.flush();
    }
}

/// Root geometry and the monitor rectangles RandR reports for it
pub fn query_screens(conn: &RustConnection, screen_num: usize) -> Result<(Geometry, Vec<Geometry>)> {
    let screen = &conn.setup().roots[screen_num];
    let root = Geometry::new(0, 0, u32::from(screen.width_in_pixels), u32::from(screen.height_in_pixels));
    let monitors = match conn.randr_get_monitors(screen.root, true)?.reply() {
        Ok(reply) => reply
            .monitors
            .iter()
            .map(|m| Geometry::new(i32::from(m.x), i32::from(m.y), u32::from(m.width), u32::from(m.height)))
            .collect(),
        Err(e) => {
            debug!("RandR monitors unavailable: {}", e);
            Vec::new()
        }
    };
    Ok((root, monitors))
}

fn geometry_aux(geometry: Geometry) -> ConfigureWindowAux {
    ConfigureWindowAux::new()
        .x(geometry.x)
        .y(geometry.y)
        .width(geometry.width.max(1))
        .height(geometry.height.max(1))
}

/// Log a failed request instead of propagating it
fn check<T, E: std::fmt::Display>(request: &str, window: u32, result: std::result::Result<T, E>) {
    if let Err(e) = result {
        log_protocol_error(request, window, e);
    }
}

pub fn clamp_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

pub fn clamp_u16(value: u32) -> u16 {
    value.clamp(1, u32::from(u16::MAX)) as u16
}

/// X modifier state without the pointer button bits
pub fn modifiers_from(state: KeyButMask) -> Modifiers {
    Modifiers::from_bits_truncate(u16::from(state))
}

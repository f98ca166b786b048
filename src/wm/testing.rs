//! In-memory backend for unit tests: records every request the core issues
//! and answers window inspections from a table the test fills in.

use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use crate::shared::Geometry;
use crate::wm::WindowManager;
use crate::wm::backend::{Backend, GrabCursor, NoHooks, WindowInfo, WmState};
use crate::wm::client_flags::{Layer, StatusFlags};
use crate::wm::decorations::FrameExtents;
use crate::wm::events::ConfigureRequest;
use crate::wm::groups::RuleGroups;
use crate::wm::hints::{Gravity, SizeHints};
use crate::wm::keyboard::{KeyBinding, KeyBindingConfig, KeyBindings};
use crate::wm::screen::ScreenModel;
use crate::wm::settings::Settings;

/// Frames are numbered from here, one per client
const FRAME_BASE: u32 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    CreateFrame(u32, Geometry),
    DestroyFrame(u32),
    ReparentToRoot(u32, i32, i32),
    Map(u32),
    Unmap(u32),
    ConfigureFrame(u32, Geometry),
    ConfigureClient(u32, Geometry),
    ConfigureUnmanaged(u32),
    SyntheticConfigure(u32, Geometry),
    Restack(Vec<u32>),
    InputFocus(Option<u32>),
    TakeFocus(u32),
    Delete(u32),
    Kill(u32),
    Colormap(Option<u32>),
    GrabPointer(GrabCursor),
    UngrabPointer,
    GrabKeyboard,
    UngrabKeyboard,
    GrabKeys(Vec<KeyBinding>),
    DrawOutline(Geometry),
    EraseOutline(Geometry),
    WmState(u32, u32),
    NetWmState(u32, StatusFlags, Layer),
    FrameExtents(u32, FrameExtents),
    WindowDesktop(u32, Option<u32>),
    ActiveWindow(Option<u32>),
    ClientList(Vec<u32>),
    ClientListStacking(Vec<u32>),
    CurrentDesktop(u32),
    DesktopCount(u32),
    Flush,
    Shutdown,
}

impl Request {
    /// Does this request act on the client window itself (not its frame)?
    pub fn targets_client(&self, window: u32) -> bool {
        match self {
            Self::Map(w)
            | Self::Unmap(w)
            | Self::ConfigureClient(w, _)
            | Self::SyntheticConfigure(w, _)
            | Self::TakeFocus(w)
            | Self::Delete(w)
            | Self::Kill(w)
            | Self::WmState(w, _)
            | Self::NetWmState(w, _, _)
            | Self::FrameExtents(w, _)
            | Self::WindowDesktop(w, _)
            | Self::ReparentToRoot(w, _, _) => *w == window,
            Self::InputFocus(w) | Self::ActiveWindow(w) => *w == Some(window),
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct BackendState {
    pub windows: HashMap<u32, WindowInfo>,
    pub requests: Vec<Request>,
    /// Make every grab fail
    pub refuse_grabs: bool,
}

pub struct RecordingBackend {
    state: Rc<RefCell<BackendState>>,
}

impl RecordingBackend {
    fn push(&self, request: Request) {
        self.state.borrow_mut().requests.push(request);
    }
}

impl Backend for RecordingBackend {
    fn inspect_window(&mut self, window: u32) -> Option<WindowInfo> {
        self.state.borrow().windows.get(&window).cloned()
    }

    fn create_frame(&mut self, window: u32, frame: Geometry, _client: Geometry, _foreign: bool) -> Option<u32> {
        self.push(Request::CreateFrame(window, frame));
        Some(FRAME_BASE + window)
    }

    fn destroy_frame(&mut self, frame: u32) {
        self.push(Request::DestroyFrame(frame));
    }

    fn reparent_to_root(&mut self, window: u32, x: i32, y: i32) {
        self.push(Request::ReparentToRoot(window, x, y));
    }

    fn map_window(&mut self, window: u32) {
        self.push(Request::Map(window));
    }

    fn unmap_window(&mut self, window: u32) {
        self.push(Request::Unmap(window));
    }

    fn configure_frame(&mut self, frame: u32, geometry: Geometry) {
        self.push(Request::ConfigureFrame(frame, geometry));
    }

    fn configure_client(&mut self, window: u32, geometry: Geometry) {
        self.push(Request::ConfigureClient(window, geometry));
    }

    fn configure_unmanaged(&mut self, window: u32, _request: &ConfigureRequest) {
        self.push(Request::ConfigureUnmanaged(window));
    }

    fn send_configure_notify(&mut self, window: u32, geometry: Geometry) {
        self.push(Request::SyntheticConfigure(window, geometry));
    }

    fn restack(&mut self, frames: &[u32]) {
        self.push(Request::Restack(frames.to_vec()));
    }

    fn set_input_focus(&mut self, window: Option<u32>) {
        self.push(Request::InputFocus(window));
    }

    fn send_take_focus(&mut self, window: u32) {
        self.push(Request::TakeFocus(window));
    }

    fn send_delete_window(&mut self, window: u32) {
        self.push(Request::Delete(window));
    }

    fn kill_client(&mut self, window: u32) {
        self.push(Request::Kill(window));
    }

    fn install_colormap(&mut self, colormap: Option<u32>) {
        self.push(Request::Colormap(colormap));
    }

    fn grab_pointer(&mut self, cursor: GrabCursor) -> bool {
        self.push(Request::GrabPointer(cursor));
        !self.state.borrow().refuse_grabs
    }

    fn ungrab_pointer(&mut self) {
        self.push(Request::UngrabPointer);
    }

    fn grab_keyboard(&mut self) -> bool {
        self.push(Request::GrabKeyboard);
        !self.state.borrow().refuse_grabs
    }

    fn ungrab_keyboard(&mut self) {
        self.push(Request::UngrabKeyboard);
    }

    fn grab_keys(&mut self, bindings: &[KeyBinding]) {
        self.push(Request::GrabKeys(bindings.to_vec()));
    }

    fn draw_outline(&mut self, geometry: Geometry) {
        self.push(Request::DrawOutline(geometry));
    }

    fn erase_outline(&mut self, geometry: Geometry) {
        self.push(Request::EraseOutline(geometry));
    }

    fn set_wm_state(&mut self, window: u32, state: WmState) {
        self.push(Request::WmState(window, state as u32));
    }

    fn set_net_wm_state(&mut self, window: u32, status: StatusFlags, layer: Layer) {
        self.push(Request::NetWmState(window, status, layer));
    }

    fn set_frame_extents(&mut self, window: u32, extents: FrameExtents) {
        self.push(Request::FrameExtents(window, extents));
    }

    fn set_window_desktop(&mut self, window: u32, desktop: Option<u32>) {
        self.push(Request::WindowDesktop(window, desktop));
    }

    fn set_active_window(&mut self, window: Option<u32>) {
        self.push(Request::ActiveWindow(window));
    }

    fn set_client_list(&mut self, windows: &[u32]) {
        self.push(Request::ClientList(windows.to_vec()));
    }

    fn set_client_list_stacking(&mut self, windows: &[u32]) {
        self.push(Request::ClientListStacking(windows.to_vec()));
    }

    fn set_current_desktop(&mut self, desktop: u32) {
        self.push(Request::CurrentDesktop(desktop));
    }

    fn set_desktop_count(&mut self, count: u32) {
        self.push(Request::DesktopCount(count));
    }

    fn flush(&mut self) {
        self.push(Request::Flush);
    }

    fn shutdown(&mut self) {
        self.push(Request::Shutdown);
    }
}

/// A window manager on a 1000x800 screen with default settings, wired to a
/// recording backend
pub struct TestWm {
    pub wm: WindowManager,
    state: Rc<RefCell<BackendState>>,
}

impl TestWm {
    pub fn new() -> Self {
        Self::build(Settings::default(), RuleGroups::default(), &[])
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::build(settings, RuleGroups::default(), &[])
    }

    pub fn with_groups(groups: RuleGroups) -> Self {
        Self::build(Settings::default(), groups, &[])
    }

    pub fn with_keys(keys: &[KeyBindingConfig]) -> Self {
        Self::build(Settings::default(), RuleGroups::default(), keys)
    }

    fn build(settings: Settings, groups: RuleGroups, keys: &[KeyBindingConfig]) -> Self {
        let state = Rc::new(RefCell::new(BackendState::default()));
        let backend = RecordingBackend { state: state.clone() };
        let screen = Geometry::new(0, 0, 1000, 800);
        let wm = WindowManager::new(
            Box::new(backend),
            Box::new(NoHooks),
            Box::new(groups),
            settings,
            ScreenModel::new(screen, vec![screen]),
            KeyBindings::new(keys),
        );
        let mut t = Self { wm, state };
        t.clear();
        t
    }

    /// Register a window with the backend, replacing any earlier entry.
    pub fn info(&mut self, window: u32, geometry: Geometry) -> RefMut<'_, WindowInfo> {
        RefMut::map(self.state.borrow_mut(), |s| {
            let info = s.windows.entry(window).or_default();
            *info = WindowInfo {
                geometry,
                viewable: true,
                ..WindowInfo::default()
            };
            info
        })
    }

    /// Manage a window at exactly `geometry`.
    pub fn manage(&mut self, window: u32, geometry: Geometry) -> Option<u32> {
        self.info(window, geometry).size_hints = SizeHints {
            positioned: true,
            gravity: Gravity::Static,
            ..SizeHints::default()
        };
        self.wm.add_client(window, false, false)
    }

    pub fn frame(&self, window: u32) -> u32 {
        self.wm.client(window).map(|c| c.frame).unwrap()
    }

    pub fn status(&self, window: u32) -> StatusFlags {
        self.wm.client(window).map(|c| c.status).unwrap()
    }

    pub fn geometry(&self, window: u32) -> Geometry {
        self.wm.client(window).map(|c| c.geometry).unwrap()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }

    pub fn clear(&mut self) {
        self.state.borrow_mut().requests.clear();
    }

    pub fn backend(&self) -> Rc<RefCell<BackendState>> {
        self.state.clone()
    }
}

//! MoveResize Module
//!
//! Interactive move and resize. An operation lives in its client
//! (`Client::operation`) and is advanced one event at a time by
//! [`WindowManager::drive_interaction`]; there is no nested event loop. Any
//! handler that invalidates the client calls
//! [`WindowManager::cancel_interaction`] first.

use tracing::{debug, info};

use crate::shared::Geometry;
use crate::wm::WindowManager;
use crate::wm::backend::GrabCursor;
use crate::wm::client_flags::{BorderFlags, StatusFlags};
use crate::wm::decorations::ResizeEdges;
use crate::wm::keyboard::Key;
use crate::wm::settings::DragMode;
use crate::wm::snap::{snap_move, snap_resize};

/// Pixels per arrow key press
const KEY_STEP: i32 = 10;

/// How an operation was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    /// Pointer drag from this root position
    Pointer { x: i32, y: i32 },
    /// Arrow keys, confirmed with Return
    Keyboard,
}

impl Start {
    fn anchor(self) -> Option<(i32, i32)> {
        match self {
            Self::Pointer { x, y } => Some((x, y)),
            Self::Keyboard => None,
        }
    }
}

/// Input routed to a running operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    Motion { x: i32, y: i32 },
    Release { x: i32, y: i32 },
    Key(Key),
}

/// Result of one step of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveState {
    /// Client geometry when the move started
    pub origin: Geometry,
    pub current: Geometry,
    /// Pointer position at start; `None` in keyboard mode
    pub anchor: Option<(i32, i32)>,
    /// Outline currently drawn on screen
    pub outline: Option<Geometry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeState {
    pub origin: Geometry,
    pub current: Geometry,
    pub anchor: Option<(i32, i32)>,
    pub outline: Option<Geometry>,
    /// Edges following the pointer
    pub edges: ResizeEdges,
}

/// Interactive operation in progress on a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Move(MoveState),
    Resize(ResizeState),
}

impl Operation {
    pub fn origin(&self) -> Geometry {
        match self {
            Self::Move(s) => s.origin,
            Self::Resize(s) => s.origin,
        }
    }

    pub fn current(&self) -> Geometry {
        match self {
            Self::Move(s) => s.current,
            Self::Resize(s) => s.current,
        }
    }

    pub fn outline(&self) -> Option<Geometry> {
        match self {
            Self::Move(s) => s.outline,
            Self::Resize(s) => s.outline,
        }
    }

    fn outline_mut(&mut self) -> &mut Option<Geometry> {
        match self {
            Self::Move(s) => &mut s.outline,
            Self::Resize(s) => &mut s.outline,
        }
    }

    pub fn is_keyboard(&self) -> bool {
        match self {
            Self::Move(s) => s.anchor.is_none(),
            Self::Resize(s) => s.anchor.is_none(),
        }
    }
}

impl WindowManager {
    /// Start moving a client. Returns false when the move cannot start.
    pub fn move_interactive(&mut self, window: u32, start: Start) -> bool {
        if !self.can_start_interaction(window, BorderFlags::MOVE) {
            return false;
        }
        if !self.grab_for_interaction(GrabCursor::Move) {
            return false;
        }
        let Some(client) = self.registry.get_mut(window) else {
            return false;
        };
        let dropped_maximized = client.status.contains(StatusFlags::MAXIMIZED);
        if dropped_maximized {
            // keep the maximized geometry as the starting point
            client.status.remove(StatusFlags::MAXIMIZED);
            client.restore_geometry = None;
        }
        let origin = client.geometry;
        client.operation = Some(Operation::Move(MoveState {
            origin,
            current: origin,
            anchor: start.anchor(),
            outline: None,
        }));
        self.interaction = Some(window);
        if dropped_maximized {
            self.publish_state(window);
        }
        info!("Moving window {} ({:?})", window, start);
        self.show_progress(window);
        true
    }

    /// Start resizing a client by the given edges (bottom-right when empty).
    pub fn resize_interactive(&mut self, window: u32, start: Start, edges: ResizeEdges) -> bool {
        if !self.can_start_interaction(window, BorderFlags::RESIZE) {
            return false;
        }
        let Some(client) = self.registry.get(window) else {
            return false;
        };
        if client.hints.is_fixed_size() {
            debug!("Window {} has a fixed size", window);
            return false;
        }
        let mut edges = if edges.is_empty() {
            ResizeEdges::SOUTH | ResizeEdges::EAST
        } else {
            edges
        };
        if client.status.contains(StatusFlags::SHADED) {
            edges.remove(ResizeEdges::NORTH | ResizeEdges::SOUTH);
            if edges.is_empty() {
                return false;
            }
        }
        if !self.grab_for_interaction(GrabCursor::Resize(edges)) {
            return false;
        }

        let Some(client) = self.registry.get_mut(window) else {
            return false;
        };
        let dropped_maximized = client.status.contains(StatusFlags::MAXIMIZED);
        if dropped_maximized {
            client.status.remove(StatusFlags::MAXIMIZED);
            client.restore_geometry = None;
        }
        let origin = client.geometry;
        client.operation = Some(Operation::Resize(ResizeState {
            origin,
            current: origin,
            anchor: start.anchor(),
            outline: None,
            edges,
        }));
        self.interaction = Some(window);
        if dropped_maximized {
            self.publish_state(window);
        }
        info!("Resizing window {} by {:?} ({:?})", window, edges, start);
        self.show_progress(window);
        true
    }

    fn can_start_interaction(&self, window: u32, needed: BorderFlags) -> bool {
        let Some(client) = self.registry.get(window) else {
            return false;
        };
        if client.is_busy() {
            debug!("Window {} already has an operation", window);
            return false;
        }
        if let Some(other) = self.interaction {
            debug!("Window {} holds the pointer grab", other);
            return false;
        }
        if !client.border.contains(needed) {
            debug!("Window {} does not allow {:?}", window, needed);
            return false;
        }
        client.status.is_shown()
    }

    fn grab_for_interaction(&mut self, cursor: GrabCursor) -> bool {
        if !self.backend.grab_pointer(cursor) {
            debug!("Pointer grab failed");
            return false;
        }
        if !self.backend.grab_keyboard() {
            debug!("Keyboard grab failed");
            self.backend.ungrab_pointer();
            return false;
        }
        true
    }

    fn release_grabs(&mut self) {
        self.backend.ungrab_pointer();
        self.backend.ungrab_keyboard();
    }

    /// Advance the running operation by one event.
    pub fn drive_interaction(&mut self, event: InteractionEvent) -> Step {
        let Some(window) = self.interaction else {
            return Step::Done;
        };
        let Some(op) = self.registry.get(window).and_then(|c| c.operation) else {
            self.interaction = None;
            self.release_grabs();
            return Step::Done;
        };

        match event {
            InteractionEvent::Key(Key::Escape) => {
                self.finish_interaction(window, true);
                Step::Done
            }
            InteractionEvent::Key(Key::Return) => {
                self.finish_interaction(window, false);
                Step::Done
            }
            InteractionEvent::Release { .. } if !op.is_keyboard() => {
                self.finish_interaction(window, false);
                Step::Done
            }
            InteractionEvent::Motion { x, y } if !op.is_keyboard() => {
                let current = match op {
                    Operation::Move(state) => self.track_move(window, &state, x, y),
                    Operation::Resize(state) => self.track_resize(window, &state, x, y),
                };
                self.set_current(window, current);
                Step::Continue
            }
            InteractionEvent::Key(key) if op.is_keyboard() => {
                let current = match op {
                    Operation::Move(state) => nudge_move(state.current, key),
                    Operation::Resize(state) => self.nudge_resize(window, &state, key),
                };
                self.set_current(window, current);
                Step::Continue
            }
            _ => Step::Continue,
        }
    }

    fn set_current(&mut self, window: u32, current: Option<Geometry>) {
        let Some(current) = current else {
            return;
        };
        if let Some(op) = self.registry.get_mut(window).and_then(|c| c.operation.as_mut()) {
            match op {
                Operation::Move(s) => s.current = current,
                Operation::Resize(s) => s.current = current,
            }
        }
        self.show_progress(window);
    }

    fn track_move(&self, window: u32, state: &MoveState, x: i32, y: i32) -> Option<Geometry> {
        let client = self.registry.get(window)?;
        let (ax, ay) = state.anchor?;
        let mut candidate = state.origin;
        candidate.x += x - ax;
        candidate.y += y - ay;

        let shaded = client.status.contains(StatusFlags::SHADED);
        let frame = self.settings.metrics.frame_geometry(&candidate, client.border, shaded);
        let snapped = snap_move(
            frame,
            &self.snap_targets(window),
            self.screens.monitors(),
            &self.settings.snap,
        );
        candidate.x += snapped.x - frame.x;
        candidate.y += snapped.y - frame.y;
        Some(candidate)
    }

    fn track_resize(&self, window: u32, state: &ResizeState, x: i32, y: i32) -> Option<Geometry> {
        let client = self.registry.get(window)?;
        let (ax, ay) = state.anchor?;
        let (dx, dy) = (x - ax, y - ay);
        let edges = state.edges;
        let shaded = client.status.contains(StatusFlags::SHADED);
        let metrics = &self.settings.metrics;

        let start = metrics.frame_geometry(&state.origin, client.border, shaded);
        let (mut left, mut top, mut right, mut bottom) = (start.x, start.y, start.right(), start.bottom());
        if edges.contains(ResizeEdges::WEST) {
            left = (left + dx).min(right - 1);
        }
        if edges.contains(ResizeEdges::EAST) {
            right = (right + dx).max(left + 1);
        }
        if edges.contains(ResizeEdges::NORTH) {
            top = (top + dy).min(bottom - 1);
        }
        if edges.contains(ResizeEdges::SOUTH) {
            bottom = (bottom + dy).max(top + 1);
        }
        let frame = snap_resize(
            Geometry::from_edges(left, top, right, bottom),
            edges,
            &self.snap_targets(window),
            self.screens.monitors(),
            &self.settings.snap,
        );

        let ext = metrics.extents(client.border);
        let want_width = frame.width as i32 - (ext.west + ext.east) as i32;
        let want_height = if shaded {
            state.origin.height as i32
        } else {
            frame.height as i32 - (ext.north + ext.south) as i32
        };
        Some(self.constrained(window, state, want_width, want_height))
    }

    fn nudge_resize(&self, window: u32, state: &ResizeState, key: Key) -> Option<Geometry> {
        let client = self.registry.get(window)?;
        let step_x = (client.hints.width_inc as i32).max(KEY_STEP);
        let step_y = (client.hints.height_inc as i32).max(KEY_STEP);
        let shaded = client.status.contains(StatusFlags::SHADED);
        let (mut width, mut height) = (state.current.width as i32, state.current.height as i32);
        match key {
            Key::Right => width += step_x,
            Key::Left => width -= step_x,
            Key::Down if !shaded => height += step_y,
            Key::Up if !shaded => height -= step_y,
            _ => return None,
        }
        Some(self.constrained(window, state, width.max(1), height.max(1)))
    }

    /// Apply size hints and keep the edges opposite the dragged ones fixed.
    fn constrained(&self, window: u32, state: &ResizeState, width: i32, height: i32) -> Geometry {
        let Some(client) = self.registry.get(window) else {
            return state.current;
        };
        let (mut w, mut h) = client.hints.constrain(width, height, state.edges);
        if client.status.contains(StatusFlags::SHADED) {
            h = state.origin.height;
        }
        w = w.max(1);
        h = h.max(1);
        let origin = state.origin;
        let x = if state.edges.contains(ResizeEdges::WEST) {
            origin.right() - w as i32
        } else {
            origin.x
        };
        let y = if state.edges.contains(ResizeEdges::NORTH) {
            origin.bottom() - h as i32
        } else {
            origin.y
        };
        Geometry::new(x, y, w, h)
    }

    /// Reflect the operation's current geometry on screen.
    fn show_progress(&mut self, window: u32) {
        let Some(client) = self.registry.get(window) else {
            return;
        };
        let Some(op) = client.operation else {
            return;
        };
        let mode = match op {
            Operation::Move(_) => self.settings.move_mode,
            Operation::Resize(_) => self.settings.resize_mode,
        };
        let current = op.current();

        match mode {
            DragMode::Outline => {
                let frame = self.settings.metrics.frame_geometry(
                    &current,
                    client.border,
                    client.status.contains(StatusFlags::SHADED),
                );
                if op.outline() == Some(frame) {
                    return;
                }
                if let Some(old) = op.outline() {
                    self.backend.erase_outline(old);
                }
                self.backend.draw_outline(frame);
                if let Some(op) = self.registry.get_mut(window).and_then(|c| c.operation.as_mut()) {
                    *op.outline_mut() = Some(frame);
                }
            }
            DragMode::Opaque => {
                if client.geometry == current {
                    return;
                }
                if let Some(client) = self.registry.get_mut(window) {
                    client.geometry = current;
                }
                self.apply_geometry(window);
            }
        }
    }

    /// Complete the running operation: apply the final geometry (or the start
    /// geometry when cancelled by the user) and release the grabs.
    fn finish_interaction(&mut self, window: u32, restore: bool) {
        let Some(op) = self.registry.get_mut(window).and_then(|c| c.operation.take()) else {
            return;
        };
        if let Some(outline) = op.outline() {
            self.backend.erase_outline(outline);
        }
        let geometry = if restore { op.origin() } else { op.current() };
        debug!("Window {} operation done at {:?}", window, geometry);
        if let Some(client) = self.registry.get_mut(window) {
            client.geometry = geometry;
        }
        self.apply_geometry(window);
        self.release_grabs();
        self.interaction = None;
        self.restack();
        self.redraw(window);
    }

    /// Abort the operation of a client that is going away or changing under
    /// us. Never touches the client window; safe to call more than once.
    pub fn cancel_interaction(&mut self, window: u32) -> bool {
        let Some(op) = self.registry.get_mut(window).and_then(|c| c.operation.take()) else {
            return false;
        };
        debug!("Cancelling operation on window {}", window);
        if self.interaction == Some(window) {
            self.interaction = None;
        }
        if let Some(outline) = op.outline() {
            self.backend.erase_outline(outline);
        }
        self.release_grabs();
        true
    }
}

fn nudge_move(current: Geometry, key: Key) -> Option<Geometry> {
    let mut next = current;
    match key {
        Key::Left => next.x -= KEY_STEP,
        Key::Right => next.x += KEY_STEP,
        Key::Up => next.y -= KEY_STEP,
        Key::Down => next.y += KEY_STEP,
        _ => return None,
    }
    Some(next)
}

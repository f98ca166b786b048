//! Cycle Module
//!
//! Keyboard window walk (Alt+Tab). The walk works on a snapshot of window IDs
//! taken when it starts; clients that disappear in the meantime are skipped
//! when the cursor reaches them.

use tracing::debug;

use crate::wm::WindowManager;
use crate::wm::client_flags::StatusFlags;
use crate::wm::keyboard::Modifiers;

#[derive(Debug, Clone)]
pub struct StackWalk {
    order: Vec<u32>,
    cursor: Option<usize>,
    /// Releasing every one of these ends the walk
    modifiers: Modifiers,
}

impl StackWalk {
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn next_index(&self, forward: bool) -> usize {
        let len = self.order.len();
        match (self.cursor, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        }
    }
}

impl WindowManager {
    /// Snapshot the walkable clients, top of the stack first.
    pub fn start_walk(&mut self, modifiers: Modifiers) {
        let order: Vec<u32> = self
            .registry
            .top_down()
            .into_iter()
            .filter(|&w| {
                self.registry
                    .get(w)
                    .is_some_and(|c| c.can_focus() && !c.status.contains(StatusFlags::NO_LIST))
            })
            .collect();
        let cursor = self
            .focus
            .active()
            .and_then(|active| order.iter().position(|&w| w == active));
        debug!("Starting window walk over {} clients", order.len());
        self.walk = Some(StackWalk {
            order,
            cursor,
            modifiers,
        });
    }

    /// Focus the next (or previous) client of the walk, starting one if
    /// needed. The stacking order is left alone until the walk stops.
    pub fn step_walk(&mut self, forward: bool, modifiers: Modifiers) {
        if self.walk.is_none() {
            self.start_walk(modifiers);
        }
        let Some(mut walk) = self.walk.take() else {
            return;
        };

        let len = walk.order.len();
        for _ in 0..len {
            let index = walk.next_index(forward);
            walk.cursor = Some(index);
            let window = walk.order[index];
            if self.registry.get(window).is_some_and(|c| c.can_focus()) {
                self.focus_client(window);
                break;
            }
            debug!("Walk skipping window {}", window);
        }
        self.walk = Some(walk);
    }

    /// End the walk and raise whatever ended up focused.
    pub fn stop_walk(&mut self) {
        if self.walk.take().is_none() {
            return;
        }
        debug!("Stopping window walk");
        if let Some(active) = self.focus.active() {
            self.raise(active);
        }
    }

    /// Called for every key release; stops the walk once its modifiers are up.
    pub(crate) fn walk_modifiers_released(&mut self, remaining: Modifiers) {
        let Some(walk) = &self.walk else {
            return;
        };
        if !remaining.intersects(walk.modifiers) {
            self.stop_walk();
        }
    }
}

//! Stacking Module
//!
//! Z-order. Each layer keeps its clients head-first in the registry; this
//! module reorders those lists and turns them into the single restack request
//! sent to the server.

use tracing::debug;

use crate::shared::Geometry;
use crate::wm::WindowManager;
use crate::wm::client_flags::Layer;
use crate::wm::transients::{direct_transients, transient_closure};

/// A collaborator window (panel, dock) stacked in a layer and used as a
/// snap target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayWindow {
    pub window: u32,
    pub layer: Layer,
    pub geometry: Geometry,
}

impl WindowManager {
    /// Put a client on top of its layer, with its direct transients on top of
    /// theirs.
    pub fn raise(&mut self, window: u32) {
        if !self.registry.contains(window) {
            return;
        }
        debug!("Raising window {}", window);
        self.registry.move_to_head(window);
        let transients = direct_transients(&self.registry, window);
        self.registry.move_block_to_head(&transients);
        self.restack();
    }

    /// Put a client at the bottom of its layer.
    pub fn lower(&mut self, window: u32) {
        if !self.registry.contains(window) {
            return;
        }
        debug!("Lowering window {}", window);
        self.registry.move_to_tail(window);
        self.restack();
    }

    /// Move a client, together with everything transient for it, to another
    /// layer. The group lands on top of the new layer, transients above owner.
    pub fn set_layer(&mut self, window: u32, layer: Layer) {
        if !self.registry.contains(window) {
            return;
        }
        let block = transient_closure(&self.registry, window);
        debug!("Moving windows {:?} to layer {:?}", block, layer);
        self.registry.relink(&block, layer);
        for member in block {
            self.publish_state(member);
        }
        self.restack();
    }

    /// Send the full stacking order to the server and publish
    /// _NET_CLIENT_LIST_STACKING.
    pub fn restack(&mut self) {
        debug_assert!(self.registry.check_integrity());
        let order = self.stacking_order();
        self.backend.restack(&order);

        let stacking = self.registry.bottom_up();
        self.backend.set_client_list_stacking(&stacking);
    }

    /// Frames top to bottom: per layer, shown clients in list order, then the
    /// trays of that layer.
    pub(crate) fn stacking_order(&self) -> Vec<u32> {
        let mut order = Vec::with_capacity(self.registry.len() + self.trays.len());
        for layer in Layer::top_down() {
            for &window in self.registry.layer(layer) {
                if let Some(client) = self.registry.get(window) {
                    if client.status.is_shown() {
                        order.push(client.frame);
                    }
                }
            }
            order.extend(self.trays.iter().filter(|t| t.layer == layer).map(|t| t.window));
        }
        order
    }

    pub fn register_tray(&mut self, window: u32, layer: Layer, geometry: Geometry) {
        if let Some(tray) = self.trays.iter_mut().find(|t| t.window == window) {
            tray.layer = layer;
            tray.geometry = geometry;
        } else {
            debug!("Registering tray window {} in layer {:?}", window, layer);
            self.trays.push(TrayWindow { window, layer, geometry });
        }
        self.restack();
    }

    pub fn unregister_tray(&mut self, window: u32) {
        let before = self.trays.len();
        self.trays.retain(|t| t.window != window);
        if self.trays.len() != before {
            debug!("Unregistered tray window {}", window);
            self.restack();
        }
    }

    /// Frames a moving client may snap to, in scan order: bottom layer to
    /// top, per layer trays first and then clients from the bottom of the
    /// list up.
    pub(crate) fn snap_targets(&self, exclude: u32) -> Vec<Geometry> {
        let mut targets = Vec::new();
        for layer in Layer::bottom_up() {
            targets.extend(self.trays.iter().filter(|t| t.layer == layer).map(|t| t.geometry));
            for &window in self.registry.layer(layer).iter().rev() {
                if window == exclude {
                    continue;
                }
                if let Some(client) = self.registry.get(window) {
                    if client.status.is_shown() {
                        targets.push(self.frame_of(client));
                    }
                }
            }
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::testing::{Request, TestWm};

    #[test]
    fn test_raise_brings_transients_along() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.info(2, Geometry::new(0, 0, 50, 50)).transient_for = Some(1);
        t.wm.add_client(2, false, false);
        t.info(3, Geometry::new(0, 0, 50, 50)).transient_for = Some(1);
        t.wm.add_client(3, false, false);
        t.manage(4, Geometry::new(0, 0, 100, 100));
        t.wm.set_layer(4, Layer::ABOVE);
        t.manage(5, Geometry::new(0, 0, 100, 100));
        // normal: [5, 3, 2, 1]
        assert_eq!(t.wm.registry().layer(Layer::NORMAL), &[5, 3, 2, 1]);

        t.wm.raise(1);
        assert_eq!(t.wm.registry().layer(Layer::NORMAL), &[3, 2, 1, 5]);
        assert_eq!(t.wm.registry().layer(Layer::ABOVE), &[4]);
        assert!(t.wm.registry().check_integrity());
    }

    #[test]
    fn test_raise_moves_transient_in_other_layer() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.info(2, Geometry::new(0, 0, 50, 50)).transient_for = Some(1);
        t.wm.add_client(2, false, false);
        t.manage(3, Geometry::new(0, 0, 100, 100));
        t.manage(4, Geometry::new(0, 0, 100, 100));
        t.wm.set_layer(3, Layer::TOP);
        t.wm.set_layer(4, Layer::TOP);
        // move only the transient up: it keeps its owner link
        t.wm.registry.relink(&[2], Layer::TOP);
        assert_eq!(t.wm.registry().layer(Layer::TOP), &[2, 4, 3]);
        t.wm.raise(4);
        t.wm.raise(1);
        assert_eq!(t.wm.registry().layer(Layer::TOP), &[2, 4, 3]);
        t.wm.raise(3);
        t.wm.raise(1);
        assert_eq!(t.wm.registry().layer(Layer::TOP), &[2, 3, 4]);
    }

    #[test]
    fn test_restack_order_with_trays() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.manage(2, Geometry::new(0, 0, 100, 100));
        t.manage(3, Geometry::new(0, 0, 100, 100));
        t.wm.set_layer(3, Layer::TOP);
        t.wm.minimize(1);
        t.wm.register_tray(900, Layer::TOP, Geometry::new(0, 0, 1000, 30));
        t.wm.register_tray(901, Layer::NORMAL, Geometry::new(0, 770, 1000, 30));

        t.clear();
        t.wm.restack();
        let (f2, f3) = (t.frame(2), t.frame(3));
        assert_eq!(
            t.requests(),
            vec![
                Request::Restack(vec![f3, 900, f2, 901]),
                Request::ClientListStacking(vec![1, 2, 3]),
            ]
        );
    }

    #[test]
    fn test_set_layer_moves_closure_as_block() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.info(2, Geometry::new(0, 0, 50, 50)).transient_for = Some(1);
        t.wm.add_client(2, false, false);
        t.info(3, Geometry::new(0, 0, 50, 50)).transient_for = Some(2);
        t.wm.add_client(3, false, false);
        t.manage(4, Geometry::new(0, 0, 100, 100));
        t.wm.set_layer(4, Layer::ABOVE);

        t.clear();
        t.wm.set_layer(1, Layer::ABOVE);
        assert_eq!(t.wm.registry().layer(Layer::ABOVE), &[3, 2, 1, 4]);
        assert!(t.wm.registry().layer(Layer::NORMAL).is_empty());
        assert!(t.wm.registry().check_integrity());
        let restacks = t.requests().iter().filter(|r| matches!(r, Request::Restack(_))).count();
        assert_eq!(restacks, 1);
    }

    #[test]
    fn test_lower_and_unregister() {
        let mut t = TestWm::new();
        t.manage(1, Geometry::new(0, 0, 100, 100));
        t.manage(2, Geometry::new(0, 0, 100, 100));
        t.wm.lower(2);
        assert_eq!(t.wm.registry().layer(Layer::NORMAL), &[1, 2]);
        t.wm.register_tray(900, Layer::NORMAL, Geometry::new(0, 0, 10, 10));
        t.wm.unregister_tray(900);
        t.clear();
        t.wm.unregister_tray(900);
        assert!(t.requests().is_empty());
        assert!(t.wm.stacking_order().iter().all(|&w| w != 900));
    }
}

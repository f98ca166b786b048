//! Client Registry
//!
//! Owns every managed client, keyed by its window ID, and the per-layer
//! stacking sequences. Each layer is an ordered list of window IDs with the
//! topmost client first. A window ID that no longer resolves is an explicit
//! lookup miss rather than a dangling reference.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::wm::client::Client;
use crate::wm::client_flags::{Layer, LAYER_COUNT};

#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<u32, Client>,
    /// Frame window -> client window
    frames: HashMap<u32, u32>,
    /// Per-layer order, head = top
    layers: [Vec<u32>; LAYER_COUNT],
    /// Clients in the order they were first managed
    managed: Vec<u32>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a client at the head of its layer. Returns false (and drops the
    /// client) if the window is already managed.
    pub fn insert(&mut self, client: Client) -> bool {
        let window = client.window;
        if self.clients.contains_key(&window) {
            warn!("Window {} is already managed", window);
            return false;
        }
        self.layers[client.layer.index()].insert(0, window);
        if client.frame != 0 {
            self.frames.insert(client.frame, window);
        }
        self.managed.push(window);
        self.clients.insert(window, client);
        debug!("Registered window {}", window);
        true
    }

    /// Unlink and return a client.
    pub fn remove(&mut self, window: u32) -> Option<Client> {
        let client = self.clients.remove(&window)?;
        self.layers[client.layer.index()].retain(|&w| w != window);
        self.frames.remove(&client.frame);
        self.managed.retain(|&w| w != window);
        debug!("Unregistered window {}", window);
        Some(client)
    }

    pub fn get(&self, window: u32) -> Option<&Client> {
        self.clients.get(&window)
    }

    pub fn get_mut(&mut self, window: u32) -> Option<&mut Client> {
        self.clients.get_mut(&window)
    }

    pub fn contains(&self, window: u32) -> bool {
        self.clients.contains_key(&window)
    }

    /// Resolve a client window or a frame window to the client window ID.
    pub fn resolve(&self, window: u32) -> Option<u32> {
        if self.clients.contains_key(&window) {
            Some(window)
        } else {
            self.frames.get(&window).copied()
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Clients of a layer, top first
    pub fn layer(&self, layer: Layer) -> &[u32] {
        &self.layers[layer.index()]
    }

    /// Managed windows in mapping order
    pub fn managed_order(&self) -> &[u32] {
        &self.managed
    }

    /// All window IDs, top layer to bottom, in list order
    pub fn top_down(&self) -> Vec<u32> {
        Layer::top_down()
            .flat_map(|layer| self.layers[layer.index()].iter().copied())
            .collect()
    }

    /// All window IDs, bottom layer to top, tail of each list first
    pub fn bottom_up(&self) -> Vec<u32> {
        Layer::bottom_up()
            .flat_map(|layer| self.layers[layer.index()].iter().rev().copied())
            .collect()
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Move a client to the head of its layer.
    pub fn move_to_head(&mut self, window: u32) {
        let Some(layer) = self.clients.get(&window).map(|c| c.layer) else {
            return;
        };
        let list = &mut self.layers[layer.index()];
        list.retain(|&w| w != window);
        list.insert(0, window);
    }

    /// Move a client to the tail of its layer.
    pub fn move_to_tail(&mut self, window: u32) {
        let Some(layer) = self.clients.get(&window).map(|c| c.layer) else {
            return;
        };
        let list = &mut self.layers[layer.index()];
        list.retain(|&w| w != window);
        list.push(window);
    }

    /// Move a group of clients, as one block in the given order, to the head
    /// of their own layers. Order within each layer follows `windows`.
    pub fn move_block_to_head(&mut self, windows: &[u32]) {
        for layer in Layer::bottom_up() {
            let members: Vec<u32> = windows
                .iter()
                .copied()
                .filter(|w| self.clients.get(w).is_some_and(|c| c.layer == layer))
                .collect();
            if members.is_empty() {
                continue;
            }
            let list = &mut self.layers[layer.index()];
            list.retain(|w| !members.contains(w));
            list.splice(0..0, members);
        }
    }

    /// Relink clients into `layer`, placing them as one block at its head in
    /// the given order.
    pub fn relink(&mut self, windows: &[u32], layer: Layer) {
        for &window in windows {
            let Some(client) = self.clients.get_mut(&window) else {
                continue;
            };
            let old = client.layer;
            client.layer = layer;
            self.layers[old.index()].retain(|&w| w != window);
        }
        let members: Vec<u32> = windows
            .iter()
            .copied()
            .filter(|w| self.clients.contains_key(w))
            .collect();
        self.layers[layer.index()].splice(0..0, members);
    }

    /// Check the layer bookkeeping: every client appears exactly once, in the
    /// list of its own layer.
    pub fn check_integrity(&self) -> bool {
        let mut seen = 0;
        for layer in Layer::bottom_up() {
            for window in &self.layers[layer.index()] {
                match self.clients.get(window) {
                    Some(client) if client.layer == layer => seen += 1,
                    _ => return false,
                }
            }
        }
        let mut unique: Vec<u32> = self.layers.iter().flatten().copied().collect();
        unique.sort_unstable();
        unique.dedup();
        seen == self.clients.len() && unique.len() == seen
    }
}

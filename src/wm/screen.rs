//! Screen Module
//!
//! Physical monitor rectangles, as reported by RandR (or the root window when
//! RandR has nothing to say).

use tracing::{debug, info};

use crate::shared::Geometry;

#[derive(Debug, Clone)]
pub struct ScreenModel {
    /// Bounding box of all monitors
    root: Geometry,
    monitors: Vec<Geometry>,
}

impl ScreenModel {
    pub fn new(root: Geometry, monitors: Vec<Geometry>) -> Self {
        let mut model = Self {
            root,
            monitors: Vec::new(),
        };
        model.update(monitors);
        model
    }

    /// Replace the monitor list. Empty or zero-sized monitors are ignored and
    /// the root rectangle stands in when nothing usable remains.
    pub fn update(&mut self, monitors: Vec<Geometry>) {
        let mut usable: Vec<Geometry> = monitors
            .into_iter()
            .filter(|m| m.width > 0 && m.height > 0)
            .collect();
        usable.dedup();
        if usable.is_empty() {
            debug!("No monitors reported, using the root window");
            usable.push(self.root);
        }
        info!("Screens: {:?}", usable);
        self.monitors = usable;
    }

    pub fn set_root(&mut self, root: Geometry) {
        self.root = root;
    }

    pub fn root(&self) -> Geometry {
        self.root
    }

    pub fn monitors(&self) -> &[Geometry] {
        &self.monitors
    }

    /// Index of the monitor containing a point, or the nearest one
    pub fn index_at(&self, x: i32, y: i32) -> usize {
        if let Some(index) = self.monitors.iter().position(|m| m.contains_point(x, y)) {
            return index;
        }
        self.monitors
            .iter()
            .enumerate()
            .min_by_key(|(_, m)| {
                let (cx, cy) = m.center();
                let (dx, dy) = ((cx - x) as i64, (cy - y) as i64);
                dx * dx + dy * dy
            })
            .map(|(index, _)| index)
            .unwrap_or(0)
    }

    pub fn screen_at(&self, x: i32, y: i32) -> Geometry {
        self.monitors
            .get(self.index_at(x, y))
            .copied()
            .unwrap_or(self.root)
    }

    /// Monitor holding the centre of a rectangle
    pub fn screen_for(&self, rect: &Geometry) -> Geometry {
        let (x, y) = rect.center();
        self.screen_at(x, y)
    }
}

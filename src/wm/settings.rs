//! Settings Module
//!
//! Runtime behaviour settings, built once from the config file.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::wm::decorations::{ButtonLayout, FrameMetrics};
use crate::wm::snap::SnapConfig;

/// How pointer movement moves focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusModel {
    /// Focus follows the pointer and stays when it leaves
    #[default]
    Sloppy,
    /// Focus changes only on a button press
    Click,
}

/// How a window follows the pointer during move/resize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    /// Draw a rubber-band outline and apply the geometry on release
    #[default]
    Outline,
    /// Reconfigure the window live
    Opaque,
}

/// Window manager settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub metrics: FrameMetrics,
    pub buttons: ButtonLayout,
    pub focus_model: FocusModel,
    pub focus_new: bool,
    pub raise_on_click: bool,
    pub desktop_count: u32,
    pub move_mode: DragMode,
    pub resize_mode: DragMode,
    pub snap: SnapConfig,
    pub cascade_offset: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            metrics: FrameMetrics::default(),
            buttons: ButtonLayout::default(),
            focus_model: FocusModel::Sloppy,
            focus_new: true,
            raise_on_click: true,
            desktop_count: 4,
            move_mode: DragMode::Outline,
            resize_mode: DragMode::Outline,
            snap: SnapConfig::default(),
            cascade_offset: 24,
        }
    }
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        let deco = &config.decorations;
        let behavior = &config.behavior;

        let desktop_count = if behavior.desktop_count == 0 {
            warn!("desktop_count must be at least 1, using 1");
            1
        } else {
            behavior.desktop_count
        };

        let settings = Self {
            metrics: FrameMetrics {
                title_height: deco.title_height,
                border_width: deco.border_width,
            },
            buttons: ButtonLayout {
                left: deco.buttons_left.clone(),
                right: deco.buttons_right.clone(),
            },
            focus_model: behavior.focus_model,
            focus_new: behavior.focus_new,
            raise_on_click: behavior.raise_on_click,
            desktop_count,
            move_mode: behavior.move_mode,
            resize_mode: behavior.resize_mode,
            snap: SnapConfig {
                to_edges: behavior.snap_to_edges,
                to_windows: behavior.snap_to_windows,
                distance: behavior.snap_distance.max(0),
            },
            cascade_offset: behavior.cascade_offset.max(1),
        };
        info!(
            "Settings: focus={:?}, desktops={}, move={:?}, resize={:?}, snap={:?}",
            settings.focus_model, settings.desktop_count, settings.move_mode, settings.resize_mode, settings.snap
        );
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        assert_eq!(Settings::from_config(&Config::default()), Settings::default());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let mut config = Config::default();
        config.behavior.desktop_count = 0;
        config.behavior.snap_distance = -3;
        let settings = Settings::from_config(&config);
        assert_eq!(settings.desktop_count, 1);
        assert_eq!(settings.snap.distance, 0);
    }
}

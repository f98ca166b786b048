//! Configuration system for stackwm
//!
//! Loads configuration from TOML file at `~/.config/stackwm/config.toml`
//! Auto-generates default config file on first run if missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::wm::decorations::ButtonKind;
use crate::wm::groups::GroupRule;
use crate::wm::keyboard::{Action, KeyBindingConfig, ModifierName};
use crate::wm::settings::{DragMode, FocusModel};

/// Problems found while loading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("group rule {index} has no class, name or window_type pattern")]
    EmptyGroupPattern { index: usize },

    #[error("key binding {index} uses keycode {keycode}, X keycodes start at 8")]
    BadKeycode { index: usize, keycode: u8 },
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decorations: DecorationConfig,
    pub behavior: BehaviorConfig,
    pub groups: Vec<GroupRule>,
    pub keybindings: Vec<KeyBindingConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decorations: DecorationConfig::default(),
            behavior: BehaviorConfig::default(),
            groups: Vec::new(),
            keybindings: default_keybindings(),
        }
    }
}

impl Config {
    /// Load configuration from `path` (or the default location), creating the
    /// default file when it does not exist yet.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            if let Err(e) = Self::save_default(&config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        let mut config = Self::load_from(&config_path)?;
        for problem in config.sanitize() {
            warn!("Ignoring config entry: {}", problem);
        }
        info!("Configuration loaded from {:?}", config_path);
        debug!("Config: {:?}", config);
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Drop entries that can never apply, returning what was dropped.
    pub fn sanitize(&mut self) -> Vec<ConfigError> {
        let mut problems = Vec::new();

        let mut index = 0;
        self.groups.retain(|rule| {
            let keep = rule.class.is_some() || rule.name.is_some() || rule.window_type.is_some();
            if !keep {
                problems.push(ConfigError::EmptyGroupPattern { index });
            }
            index += 1;
            keep
        });

        let mut index = 0;
        self.keybindings.retain(|binding| {
            let keep = binding.keycode >= 8;
            if !keep {
                problems.push(ConfigError::BadKeycode {
                    index,
                    keycode: binding.keycode,
                });
            }
            index += 1;
            keep
        });

        problems
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("stackwm");

        Ok(config_dir.join("config.toml"))
    }

    /// The default configuration as TOML
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default config")
    }

    /// Save default configuration to file
    fn save_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(path, Self::default_toml()?).context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }
}

/// Frame geometry and title bar buttons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    /// Title bar height in pixels
    pub title_height: u32,
    /// Border width in pixels
    pub border_width: u32,
    /// Buttons on the left of the title, outermost first
    pub buttons_left: Vec<ButtonKind>,
    /// Buttons on the right of the title, outermost first
    pub buttons_right: Vec<ButtonKind>,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            title_height: 20,
            border_width: 4,
            buttons_left: vec![ButtonKind::Menu],
            buttons_right: vec![ButtonKind::Close, ButtonKind::Maximize, ButtonKind::Minimize],
        }
    }
}

/// Window behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// "sloppy" or "click"
    pub focus_model: FocusModel,
    /// Focus windows when they are first mapped
    pub focus_new: bool,
    /// Raise a window when it is clicked
    pub raise_on_click: bool,
    pub desktop_count: u32,
    /// "outline" or "opaque"
    pub move_mode: DragMode,
    pub resize_mode: DragMode,
    pub snap_to_edges: bool,
    pub snap_to_windows: bool,
    /// Snap threshold in pixels
    pub snap_distance: i32,
    /// Step between cascaded windows in pixels
    pub cascade_offset: i32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            focus_model: FocusModel::Sloppy,
            focus_new: true,
            raise_on_click: true,
            desktop_count: 4,
            move_mode: DragMode::Outline,
            resize_mode: DragMode::Outline,
            snap_to_edges: true,
            snap_to_windows: true,
            snap_distance: 10,
            cascade_offset: 24,
        }
    }
}

/// Bindings used when the config file has none (evdev keycodes)
pub fn default_keybindings() -> Vec<KeyBindingConfig> {
    let bind = |modifiers: &[ModifierName], keycode: u8, action: Action| KeyBindingConfig {
        modifiers: modifiers.to_vec(),
        keycode,
        action,
    };
    let alt = ModifierName::Alt;
    let mut bindings = vec![
        bind(&[alt], 23, Action::NextWindow),
        bind(&[alt, ModifierName::Shift], 23, Action::PrevWindow),
        bind(&[alt], 70, Action::Close),
        bind(&[alt], 73, Action::Move),
        bind(&[alt], 74, Action::Resize),
        bind(&[alt], 75, Action::Minimize),
        bind(&[alt], 76, Action::Maximize),
    ];
    for desktop in 0..4u8 {
        bindings.push(bind(&[ModifierName::Super], 10 + desktop, Action::Desktop(u32::from(desktop))));
        bindings.push(bind(
            &[ModifierName::Super, ModifierName::Shift],
            10 + desktop,
            Action::SendToDesktop(u32::from(desktop)),
        ));
    }
    bindings
}

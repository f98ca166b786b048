//! Keyboard Module
//!
//! Key bindings and the keys the core understands during interactive
//! operations.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

bitflags! {
    /// Modifier mask (X11 key/button state bits)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const SHIFT   = 1 << 0;
        const LOCK    = 1 << 1;
        const CONTROL = 1 << 2;
        const MOD1    = 1 << 3;
        const MOD2    = 1 << 4;
        const MOD3    = 1 << 5;
        const MOD4    = 1 << 6;
        const MOD5    = 1 << 7;
    }
}

impl Modifiers {
    /// Lock and NumLock (Mod2) never take part in binding lookups
    pub fn significant(self) -> Self {
        self - (Self::LOCK | Self::MOD2)
    }
}

/// Modifier names used in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierName {
    Shift,
    Control,
    Alt,
    Super,
    Mod3,
    Mod5,
}

impl ModifierName {
    fn mask(self) -> Modifiers {
        match self {
            Self::Shift => Modifiers::SHIFT,
            Self::Control => Modifiers::CONTROL,
            Self::Alt => Modifiers::MOD1,
            Self::Super => Modifiers::MOD4,
            Self::Mod3 => Modifiers::MOD3,
            Self::Mod5 => Modifiers::MOD5,
        }
    }
}

/// Keys with a meaning during move/resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Return,
    Escape,
    Other,
}

/// Bindable window manager actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Close,
    Minimize,
    Maximize,
    Shade,
    Stick,
    Raise,
    Lower,
    Move,
    Resize,
    NextWindow,
    PrevWindow,
    Desktop(u32),
    SendToDesktop(u32),
    Layer(u8),
}

/// One configured key binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindingConfig {
    pub modifiers: Vec<ModifierName>,
    pub keycode: u8,
    pub action: Action,
}

/// Resolved key binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub modifiers: Modifiers,
    pub keycode: u8,
    pub action: Action,
}

impl From<&KeyBindingConfig> for KeyBinding {
    fn from(config: &KeyBindingConfig) -> Self {
        let modifiers = config
            .modifiers
            .iter()
            .fold(Modifiers::empty(), |acc, m| acc | m.mask());
        Self {
            modifiers,
            keycode: config.keycode,
            action: config.action,
        }
    }
}

/// Lookup table for configured bindings
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    bindings: Vec<KeyBinding>,
}

impl KeyBindings {
    pub fn new(configs: &[KeyBindingConfig]) -> Self {
        let mut bindings: Vec<KeyBinding> = Vec::with_capacity(configs.len());
        for binding in configs.iter().map(KeyBinding::from) {
            if bindings
                .iter()
                .any(|b| b.modifiers == binding.modifiers && b.keycode == binding.keycode)
            {
                warn!("Duplicate key binding for keycode {}, ignoring", binding.keycode);
                continue;
            }
            debug!(
                "Key binding: modifiers={:?}, keycode={}, action={:?}",
                binding.modifiers, binding.keycode, binding.action
            );
            bindings.push(binding);
        }
        Self { bindings }
    }

    pub fn all(&self) -> &[KeyBinding] {
        &self.bindings
    }

    pub fn lookup(&self, modifiers: Modifiers, keycode: u8) -> Option<Action> {
        let modifiers = modifiers.significant();
        self.bindings
            .iter()
            .find(|b| b.keycode == keycode && b.modifiers == modifiers)
            .map(|b| b.action)
    }
}

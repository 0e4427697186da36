//! Customizable keybindings for the viewer.
//!
//! Keys are only consulted while a viewer is open; the viewer drops keyboard
//! input once its listeners are deregistered on close.

use serde::{Deserialize, Serialize};
use vitrine_gesture::Key;

use crate::model::ViewerIntent;

/// Keybinding configuration for the viewer.
///
/// Every action accepts several keys so layouts where `+` needs a modifier
/// can still zoom with `=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Keys that close the viewer
    pub close: Vec<Key>,
    /// Keys that show the previous image
    pub previous: Vec<Key>,
    /// Keys that show the next image
    pub next: Vec<Key>,
    /// Keys that zoom in one step
    pub zoom_in: Vec<Key>,
    /// Keys that zoom out one step
    pub zoom_out: Vec<Key>,
    /// Keys that reset zoom, pan and rotation
    pub reset: Vec<Key>,
    /// Keys that rotate by 90 degrees
    pub rotate: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            close: vec![Key::Escape],
            previous: vec![Key::Left],
            next: vec![Key::Right],
            zoom_in: vec![Key::Char('+'), Key::Char('=')],
            zoom_out: vec![Key::Char('-')],
            reset: vec![Key::Char('0')],
            rotate: vec![Key::Char('r')],
        }
    }
}

impl KeyBindings {
    fn slots(&self) -> [(ViewerIntent, &Vec<Key>); 7] {
        [
            (ViewerIntent::Close, &self.close),
            (ViewerIntent::Previous, &self.previous),
            (ViewerIntent::Next, &self.next),
            (ViewerIntent::ZoomIn, &self.zoom_in),
            (ViewerIntent::ZoomOut, &self.zoom_out),
            (ViewerIntent::Reset, &self.reset),
            (ViewerIntent::Rotate, &self.rotate),
        ]
    }

    fn slot_mut(&mut self, intent: ViewerIntent) -> Option<&mut Vec<Key>> {
        match intent {
            ViewerIntent::Close => Some(&mut self.close),
            ViewerIntent::Previous => Some(&mut self.previous),
            ViewerIntent::Next => Some(&mut self.next),
            ViewerIntent::ZoomIn => Some(&mut self.zoom_in),
            ViewerIntent::ZoomOut => Some(&mut self.zoom_out),
            ViewerIntent::Reset => Some(&mut self.reset),
            ViewerIntent::Rotate => Some(&mut self.rotate),
            ViewerIntent::GoTo(_) | ViewerIntent::Retry => None,
        }
    }

    /// Get the intent that corresponds to a key press, if any.
    pub fn intent_for_key(&self, key: Key) -> Option<ViewerIntent> {
        self.slots()
            .into_iter()
            .find(|(_, keys)| keys.contains(&key))
            .map(|(intent, _)| intent)
    }

    /// Get the keys bound to an intent.
    pub fn keys_for(&self, intent: ViewerIntent) -> &[Key] {
        self.slots()
            .into_iter()
            .find(|(i, _)| *i == intent)
            .map(|(_, keys)| keys.as_slice())
            .unwrap_or(&[])
    }

    /// Replace the keys bound to an intent.
    ///
    /// Returns `false` for intents that cannot be bound to keys.
    pub fn set_keys(&mut self, intent: ViewerIntent, keys: Vec<Key>) -> bool {
        match self.slot_mut(intent) {
            Some(slot) => {
                *slot = keys;
                true
            }
            None => false,
        }
    }

    /// Human-readable list of the keys bound to `intent`, e.g. `"+, ="`.
    pub fn describe(&self, intent: ViewerIntent) -> String {
        self.keys_for(intent)
            .iter()
            .map(Key::label)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Check if a key is already used by any binding other than `exclude`.
    /// Returns a description of what it's used for, if anything.
    pub fn key_conflict(&self, key: Key, exclude: Option<ViewerIntent>) -> Option<String> {
        self.slots()
            .into_iter()
            .filter(|(intent, _)| Some(*intent) != exclude)
            .find(|(_, keys)| keys.contains(&key))
            .map(|(intent, _)| intent.name().to_string())
    }
}

//! Input model: tools, keys, the event stream consumed by the editor, and the
//! touch gesture classifier.
//!
//! The host forwards DOM events as [`InputEvent`]s in the order it receives
//! them. Touch sequences are not acted on directly: [`TouchTracker`] follows a
//! sequence from first contact to release and classifies it, and only a tap is
//! turned into a primary pointer-down at the spot where the touch began. Pans
//! and multi-finger gestures belong to the camera, which is not ours.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::TouchConfig;
use crate::scene::PrimitiveKind;
use crate::transform::TransformMode;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "tool", content = "kind")]
pub enum Tool {
    /// Pick objects to select them (default).
    #[default]
    Select,
    /// Place a new primitive of this kind where the pointer lands.
    Place(PrimitiveKind),
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or a tap).
    Primary,
    Middle,
    Secondary,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Returns `true` if any command-style modifier is held.
    #[must_use]
    pub fn any_command(self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// A keyboard key as reported by the browser (`"Delete"`, `"Escape"`, `"w"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Editor command bound to this key, if any.
    #[must_use]
    pub fn command(&self) -> Option<KeyCommand> {
        match self.0.as_str() {
            "Delete" | "Backspace" => Some(KeyCommand::DeleteSelected),
            "Escape" => Some(KeyCommand::ClearSelection),
            "w" | "W" => Some(KeyCommand::SetMode(TransformMode::Position)),
            "e" | "E" => Some(KeyCommand::SetMode(TransformMode::Rotation)),
            "r" | "R" => Some(KeyCommand::SetMode(TransformMode::Scale)),
            "q" | "Q" => Some(KeyCommand::CycleMode),
            "t" | "T" => Some(KeyCommand::ToggleTransform),
            _ => None,
        }
    }
}

/// Keyboard shortcut commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    DeleteSelected,
    ClearSelection,
    SetMode(TransformMode),
    CycleMode,
    ToggleTransform,
}

/// Events the host feeds into the editor, strictly in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer pressed at a canvas-relative point (CSS pixels).
    PointerDown { x: f64, y: f64, button: Button },
    /// Pointer moved over the canvas.
    PointerMove { x: f64, y: f64 },
    /// Pointer left the canvas.
    PointerLeave,
    /// A touch sequence gained a contact. `touches` counts active contacts.
    TouchStart { x: f64, y: f64, touches: u32, time_ms: f64 },
    /// The primary contact moved.
    TouchMove { x: f64, y: f64, touches: u32 },
    /// The last contact lifted.
    TouchEnd { x: f64, y: f64, time_ms: f64 },
    /// A key was pressed.
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// The active gizmo finished a drag.
    GizmoDragEnd,
    /// A toolbar tool was chosen.
    ToolSelected { tool: Tool },
    /// The transform toggle was pressed.
    TransformToggled,
    /// A specific transform mode was chosen.
    TransformModeSelected { mode: TransformMode },
}

/// Classification of a finished touch sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Short and still; carries the point where the touch began.
    Tap(DVec2),
    /// Moved or held too long; camera input.
    Pan,
    /// More than one contact at some point; camera input.
    MultiTouch,
}

/// State of the touch sequence currently being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TouchState {
    /// No contact.
    #[default]
    Idle,
    /// A sequence is in progress.
    Tracking {
        /// Where the first contact landed.
        start: DVec2,
        /// Timestamp of the first contact.
        start_ms: f64,
        /// Largest per-axis drift from `start` seen so far.
        max_drift: DVec2,
        /// Whether a second contact ever joined.
        multi: bool,
    },
}

/// Follows a touch sequence and classifies it on release.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    state: TouchState,
}

impl TouchTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A contact landed. The first contact starts a sequence; later ones only
    /// mark it as multi-touch.
    pub fn start(&mut self, point: DVec2, touches: u32, time_ms: f64) {
        match &mut self.state {
            TouchState::Idle => {
                self.state = TouchState::Tracking {
                    start: point,
                    start_ms: time_ms,
                    max_drift: DVec2::ZERO,
                    multi: touches > 1,
                };
            }
            TouchState::Tracking { multi, .. } => *multi = true,
        }
    }

    /// The primary contact moved.
    pub fn moved(&mut self, point: DVec2, touches: u32) {
        if let TouchState::Tracking { start, max_drift, multi, .. } = &mut self.state {
            *max_drift = max_drift.max((point - *start).abs());
            if touches > 1 {
                *multi = true;
            }
        }
    }

    /// The last contact lifted; classify and reset. Returns `None` if no
    /// sequence was being tracked.
    pub fn end(&mut self, point: DVec2, time_ms: f64, config: &TouchConfig) -> Option<Gesture> {
        let TouchState::Tracking { start, start_ms, max_drift, multi } = std::mem::take(&mut self.state) else {
            return None;
        };
        if multi {
            return Some(Gesture::MultiTouch);
        }

        let drift = max_drift.max((point - start).abs());
        let quick = time_ms - start_ms < config.tap_max_duration_ms;
        let still = drift.x < config.tap_max_distance_px && drift.y < config.tap_max_distance_px;
        Some(if quick && still { Gesture::Tap(start) } else { Gesture::Pan })
    }

    #[must_use]
    pub fn state(&self) -> TouchState {
        self.state
    }
}

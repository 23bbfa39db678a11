//! Rendering collaborator contract.
//!
//! The editor core never draws. Everything visual (creating meshes,
//! outlining them, showing gizmos, hit-testing pixels) goes through a
//! [`RenderBackend`] supplied by the host. The core only ever holds the opaque
//! [`RenderHandle`]s the backend hands out.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::scene::{PrimitiveKind, PrimitiveParams, Transform};
use crate::transform::TransformMode;

/// Opaque reference to a renderable owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderHandle(pub u64);

/// Largest integer a JS number holds exactly (2^53 - 1).
const MAX_JS_HANDLE: f64 = 9_007_199_254_740_991.0;

impl RenderHandle {
    /// Handle from a JS number. Negative, fractional and non-finite values
    /// are rejected, as is anything a JS number cannot hold exactly.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_JS_HANDLE {
            Some(Self(value as u64))
        } else {
            None
        }
    }

    // Handles are small counters on the JS side; they fit an f64 exactly.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(self) -> f64 {
        self.0 as f64
    }
}

/// Highlight applied to a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    Selected,
    Hovered,
}

/// Frontmost renderable under a screen point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub handle: RenderHandle,
    pub point: DVec3,
    pub normal: DVec3,
}

/// World-space ray cast from the camera through a screen point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    #[must_use]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }
}

/// Gizmo presentation for an attach request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoOptions {
    /// Screen-relative gizmo size.
    pub scale: f64,
    /// Snap increment for the active mode (world units, radians, or factor).
    pub snap: f64,
}

/// Errors reported by a backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// The requested primitive kind is unknown to the engine.
    #[error("unsupported primitive type: {0}")]
    UnsupportedType(String),
    /// The engine failed for a reason of its own.
    #[error("render engine error: {0}")]
    Engine(String),
}

impl BackendError {
    /// Stable code reported to the UI layer.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedType(_) => "E_UNSUPPORTED_TYPE",
            Self::Engine(_) => "E_ENGINE",
        }
    }

    /// Classify a failure thrown by a host engine while building `kind`.
    /// An error named `UnsupportedType` means the engine does not know the
    /// kind; anything else is an engine fault carrying `message`.
    #[must_use]
    pub fn from_host(kind: PrimitiveKind, name: Option<&str>, message: String) -> Self {
        match name {
            Some("UnsupportedType") => Self::UnsupportedType(kind.to_string()),
            _ => Self::Engine(message),
        }
    }
}

/// Operations the editor core consumes from the rendering engine.
///
/// All calls are synchronous and made from the single UI thread.
pub trait RenderBackend {
    /// Build a renderable for `kind` from `params`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedType` if the engine cannot build `kind`.
    fn create_renderable(&mut self, kind: PrimitiveKind, params: &PrimitiveParams) -> Result<RenderHandle, BackendError>;

    /// Release a renderable. Disposing an unknown or already disposed handle
    /// does nothing.
    fn dispose(&mut self, handle: RenderHandle);

    /// Hit-test renderables at a screen point (CSS pixels).
    fn pick(&mut self, x: f64, y: f64) -> Option<PickHit>;

    /// Camera ray through a screen point.
    fn cast_ray(&mut self, x: f64, y: f64) -> Ray;

    /// Outline `handle` with `style`.
    fn apply_highlight(&mut self, handle: RenderHandle, style: HighlightStyle);

    /// Remove any outline from `handle`.
    fn remove_highlight(&mut self, handle: RenderHandle);

    /// Show the gizmo for `mode` on `handle`, replacing any other gizmo.
    fn attach_gizmo(&mut self, handle: RenderHandle, mode: TransformMode, options: GizmoOptions);

    /// Hide every gizmo.
    fn detach_gizmo(&mut self);

    /// Current transform of a renderable, or `None` if it is unknown.
    fn transform_of(&self, handle: RenderHandle) -> Option<Transform>;

    /// Move, rotate and scale a renderable.
    fn set_transform(&mut self, handle: RenderHandle, transform: Transform);
}

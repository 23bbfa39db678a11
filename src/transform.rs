//! Transform gizmo coordination.
//!
//! The coordinator decides which gizmo (if any) the engine shows and on which
//! renderable, and it is the only path by which a gizmo drag becomes part of
//! the scene object record: when a drag ends the engine-side transform is read
//! back off the attached handle and written into the registry.
//!
//! ```text
//!   Disabled ──set_enabled(true)──▶ Detached ──attach(h)──▶ Attached(h)
//!      ▲                              ▲  │                     │
//!      └────────set_enabled(false)────┴──┴─────attach(None)────┘
//! ```

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::{GizmoOptions, RenderBackend, RenderHandle};
use crate::config::GizmoConfig;
use crate::registry::ObjectRegistry;
use crate::scene::SceneObject;

/// Which transform the active gizmo manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    #[default]
    Position,
    Rotation,
    Scale,
}

impl TransformMode {
    /// Cycle order.
    pub const ALL: [TransformMode; 3] = [Self::Position, Self::Rotation, Self::Scale];

    /// The mode after this one, wrapping from scale back to position.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Position => Self::Rotation,
            Self::Rotation => Self::Scale,
            Self::Scale => Self::Position,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gizmo attachment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoState {
    /// Transform mode is off; no gizmo is shown.
    Disabled,
    /// Transform mode is on but nothing is attached.
    Detached,
    /// The active mode's gizmo is shown on this handle.
    Attached(RenderHandle),
}

/// Binds the transform gizmo to the selected renderable.
#[derive(Debug)]
pub struct TransformCoordinator {
    state: GizmoState,
    mode: TransformMode,
    /// Handle to attach to while enabled; kept across disable/enable.
    target: Option<RenderHandle>,
    gizmo: GizmoConfig,
}

impl TransformCoordinator {
    #[must_use]
    pub fn new(gizmo: GizmoConfig) -> Self {
        Self { state: GizmoState::Disabled, mode: TransformMode::default(), target: None, gizmo }
    }

    /// Turn transform mode on or off. Enabling with a remembered target
    /// attaches to it; disabling hides every gizmo.
    pub fn set_enabled(&mut self, enabled: bool, registry: &ObjectRegistry, backend: &mut dyn RenderBackend) {
        if enabled {
            if self.state == GizmoState::Disabled {
                self.state = GizmoState::Detached;
            }
            self.refresh(registry, backend);
        } else if self.state != GizmoState::Disabled {
            backend.detach_gizmo();
            self.state = GizmoState::Disabled;
            log::debug!("transform: disabled");
        }
    }

    /// Set the handle the gizmo follows. `None`, or a handle the registry does
    /// not know, detaches.
    pub fn attach(&mut self, handle: Option<RenderHandle>, registry: &ObjectRegistry, backend: &mut dyn RenderBackend) {
        self.target = handle.filter(|handle| registry.contains_handle(*handle));
        self.refresh(registry, backend);
    }

    /// Switch the active gizmo. An attached gizmo is re-shown in the new mode.
    pub fn set_mode(&mut self, mode: TransformMode, backend: &mut dyn RenderBackend) {
        self.mode = mode;
        if let GizmoState::Attached(handle) = self.state {
            backend.detach_gizmo();
            backend.attach_gizmo(handle, mode, self.options());
        }
        log::debug!("transform: mode {mode}");
    }

    /// Advance to the next mode and return it.
    pub fn cycle_mode(&mut self, backend: &mut dyn RenderBackend) -> TransformMode {
        self.set_mode(self.mode.next(), backend);
        self.mode
    }

    /// Persist the attached renderable's transform into its scene object.
    ///
    /// Returns the updated object, or `None` if nothing is attached or the
    /// handle no longer resolves.
    pub fn on_drag_end(&self, registry: &mut ObjectRegistry, backend: &dyn RenderBackend) -> Option<SceneObject> {
        let GizmoState::Attached(handle) = self.state else {
            return None;
        };
        let transform = backend.transform_of(handle)?;
        let id = match registry.find_by_handle(handle) {
            Ok(object) => object.id.clone(),
            Err(err) => {
                log::warn!("transform: drag ended on unregistered handle: {err}");
                return None;
            }
        };
        match registry.update_transform(&id, transform) {
            Ok(object) => {
                log::debug!("transform: {id} committed");
                Some(object.clone())
            }
            Err(err) => {
                log::warn!("transform: {err}");
                None
            }
        }
    }

    /// Drop `handle` if it is the target, detaching the gizmo. Called before
    /// the renderable is disposed.
    pub fn release(&mut self, handle: RenderHandle, backend: &mut dyn RenderBackend) {
        if self.target == Some(handle) {
            self.target = None;
        }
        if self.state == GizmoState::Attached(handle) {
            backend.detach_gizmo();
            self.state = GizmoState::Detached;
        }
    }

    #[must_use]
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> GizmoState {
        self.state
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state != GizmoState::Disabled
    }

    /// The handle the gizmo is shown on, if any.
    #[must_use]
    pub fn attached(&self) -> Option<RenderHandle> {
        match self.state {
            GizmoState::Attached(handle) => Some(handle),
            GizmoState::Disabled | GizmoState::Detached => None,
        }
    }

    fn options(&self) -> GizmoOptions {
        let snap = match self.mode {
            TransformMode::Position => self.gizmo.position_snap,
            TransformMode::Rotation => self.gizmo.rotation_snap,
            TransformMode::Scale => self.gizmo.scale_snap,
        };
        GizmoOptions { scale: self.gizmo.scale, snap }
    }

    fn refresh(&mut self, registry: &ObjectRegistry, backend: &mut dyn RenderBackend) {
        if self.state == GizmoState::Disabled {
            return;
        }
        if let Some(handle) = self.target.filter(|handle| registry.contains_handle(*handle)) {
            backend.detach_gizmo();
            backend.attach_gizmo(handle, self.mode, self.options());
            self.state = GizmoState::Attached(handle);
        } else {
            if let GizmoState::Attached(_) = self.state {
                backend.detach_gizmo();
            }
            self.state = GizmoState::Detached;
        }
    }
}

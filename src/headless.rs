//! In-memory render backend.
//!
//! `HeadlessBackend` keeps just enough engine state to answer the editor's
//! questions (which renderables exist, their transforms, which outline and
//! gizmo are showing) and records every call it receives. It backs the test
//! suites and lets hosts drive the editor without a GPU. Pick targets and
//! camera rays are scripted per screen point.

use std::collections::{HashMap, HashSet};

use glam::DVec3;

use crate::backend::{BackendError, GizmoOptions, HighlightStyle, PickHit, Ray, RenderBackend, RenderHandle};
use crate::scene::{PrimitiveKind, PrimitiveParams, Transform};
use crate::transform::TransformMode;

/// A call received by [`HeadlessBackend`], in order of arrival.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Create { kind: PrimitiveKind, handle: RenderHandle },
    Dispose(RenderHandle),
    ApplyHighlight(RenderHandle, HighlightStyle),
    RemoveHighlight(RenderHandle),
    AttachGizmo { handle: RenderHandle, mode: TransformMode, options: GizmoOptions },
    DetachGizmo,
    SetTransform(RenderHandle, Transform),
}

/// A live renderable.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub kind: PrimitiveKind,
    pub params: PrimitiveParams,
    pub transform: Transform,
}

/// Screen point key; exact coordinates, as scripted.
type ScreenKey = (u64, u64);

fn screen_key(x: f64, y: f64) -> ScreenKey {
    (x.to_bits(), y.to_bits())
}

/// Recording backend with scripted picking.
#[derive(Debug)]
pub struct HeadlessBackend {
    next_handle: u64,
    live: HashMap<RenderHandle, Renderable>,
    highlights: HashMap<RenderHandle, HighlightStyle>,
    gizmo: Option<(RenderHandle, TransformMode)>,
    pick_targets: HashMap<ScreenKey, PickHit>,
    rays: HashMap<ScreenKey, Ray>,
    default_ray: Ray,
    unsupported: HashSet<PrimitiveKind>,
    calls: Vec<BackendCall>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self {
            next_handle: 1,
            live: HashMap::new(),
            highlights: HashMap::new(),
            gizmo: None,
            pick_targets: HashMap::new(),
            rays: HashMap::new(),
            default_ray: Ray::new(DVec3::new(0.0, 10.0, 0.0), DVec3::NEG_Y),
            unsupported: HashSet::new(),
            calls: Vec::new(),
        }
    }
}

impl HeadlessBackend {
    /// A backend whose default camera ray points straight down at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Scripting ---

    /// Report `handle` as the frontmost renderable at `(x, y)`.
    pub fn place_pick_target(&mut self, x: f64, y: f64, handle: RenderHandle, point: DVec3, normal: DVec3) {
        self.pick_targets.insert(screen_key(x, y), PickHit { handle, point, normal });
    }

    /// Use `ray` as the camera ray through `(x, y)`.
    pub fn aim_ray(&mut self, x: f64, y: f64, ray: Ray) {
        self.rays.insert(screen_key(x, y), ray);
    }

    /// Make `create_renderable` fail for `kind`.
    pub fn mark_unsupported(&mut self, kind: PrimitiveKind) {
        self.unsupported.insert(kind);
    }

    /// Simulate the user dragging the attached gizmo to `transform`.
    /// Returns the dragged handle, or `None` if no gizmo is attached.
    pub fn drag_gizmo(&mut self, transform: Transform) -> Option<RenderHandle> {
        let (handle, _) = self.gizmo?;
        let renderable = self.live.get_mut(&handle)?;
        renderable.transform = transform;
        Some(handle)
    }

    // --- Inspection ---

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Forget recorded calls (state is kept).
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `pred`.
    pub fn count_calls(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    /// The outline currently shown on `handle`.
    #[must_use]
    pub fn highlight_of(&self, handle: RenderHandle) -> Option<HighlightStyle> {
        self.highlights.get(&handle).copied()
    }

    /// Number of renderables currently outlined.
    #[must_use]
    pub fn highlight_count(&self) -> usize {
        self.highlights.len()
    }

    /// The visible gizmo, if any.
    #[must_use]
    pub fn gizmo(&self) -> Option<(RenderHandle, TransformMode)> {
        self.gizmo
    }

    /// Returns `true` if `handle` has been created and not disposed.
    #[must_use]
    pub fn is_live(&self, handle: RenderHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Number of live renderables.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn renderable(&self, handle: RenderHandle) -> Option<&Renderable> {
        self.live.get(&handle)
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_renderable(&mut self, kind: PrimitiveKind, params: &PrimitiveParams) -> Result<RenderHandle, BackendError> {
        if self.unsupported.contains(&kind) {
            return Err(BackendError::UnsupportedType(kind.to_string()));
        }
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle, Renderable { kind, params: *params, transform: Transform::default() });
        self.calls.push(BackendCall::Create { kind, handle });
        Ok(handle)
    }

    fn dispose(&mut self, handle: RenderHandle) {
        self.calls.push(BackendCall::Dispose(handle));
        self.live.remove(&handle);
        self.highlights.remove(&handle);
        if self.gizmo.is_some_and(|(attached, _)| attached == handle) {
            self.gizmo = None;
        }
        self.pick_targets.retain(|_, hit| hit.handle != handle);
    }

    fn pick(&mut self, x: f64, y: f64) -> Option<PickHit> {
        self.pick_targets
            .get(&screen_key(x, y))
            .copied()
            .filter(|hit| self.live.contains_key(&hit.handle))
    }

    fn cast_ray(&mut self, x: f64, y: f64) -> Ray {
        self.rays.get(&screen_key(x, y)).copied().unwrap_or(self.default_ray)
    }

    fn apply_highlight(&mut self, handle: RenderHandle, style: HighlightStyle) {
        self.calls.push(BackendCall::ApplyHighlight(handle, style));
        if self.live.contains_key(&handle) {
            self.highlights.insert(handle, style);
        }
    }

    fn remove_highlight(&mut self, handle: RenderHandle) {
        self.calls.push(BackendCall::RemoveHighlight(handle));
        self.highlights.remove(&handle);
    }

    fn attach_gizmo(&mut self, handle: RenderHandle, mode: TransformMode, options: GizmoOptions) {
        self.calls.push(BackendCall::AttachGizmo { handle, mode, options });
        self.gizmo = Some((handle, mode));
    }

    fn detach_gizmo(&mut self) {
        self.calls.push(BackendCall::DetachGizmo);
        self.gizmo = None;
    }

    fn transform_of(&self, handle: RenderHandle) -> Option<Transform> {
        self.live.get(&handle).map(|renderable| renderable.transform)
    }

    fn set_transform(&mut self, handle: RenderHandle, transform: Transform) {
        self.calls.push(BackendCall::SetTransform(handle, transform));
        if let Some(renderable) = self.live.get_mut(&handle) {
            renderable.transform = transform;
        }
    }
}

//! Editor dispatcher.
//!
//! [`EditorCore`] is the explicitly owned context of one editor instance: the
//! render backend, configuration, object registry, selection tracker and
//! transform coordinator all live here and nowhere else. Input arrives as
//! [`InputEvent`]s through [`EditorCore::handle`], which runs each event to
//! completion and returns the [`Action`]s the host should reflect in its UI.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use glam::{DVec2, DVec3};
use serde::Serialize;
use uuid::Uuid;

use crate::backend::{BackendError, RenderBackend, RenderHandle};
use crate::config::{ConfigError, EditorConfig};
use crate::input::{Button, Gesture, InputEvent, Key, KeyCommand, Modifiers, Tool, TouchTracker};
use crate::picking::{self, PickResult, PickSurface};
use crate::registry::{ObjectRegistry, RegistryError};
use crate::scene::{Material, ObjectId, PrimitiveKind, SceneObject};
use crate::selection::SelectionTracker;
use crate::transform::{TransformCoordinator, TransformMode};

/// Errors surfaced by editor operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A scene snapshot could not be encoded or decoded.
    #[error("scene snapshot failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl EditorError {
    /// Stable code reported to the UI layer.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Registry(err) => err.error_code(),
            Self::Backend(err) => err.error_code(),
            Self::Config(err) => err.error_code(),
            Self::Snapshot(_) => "E_SNAPSHOT",
        }
    }
}

/// Outcomes reported to the host after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    ObjectCreated { object: SceneObject },
    ObjectUpdated { object: SceneObject },
    ObjectDeleted { id: ObjectId },
    SelectionChanged { id: Option<ObjectId> },
    HoverChanged { id: Option<ObjectId> },
    ToolChanged { tool: Tool },
    TransformChanged { enabled: bool, mode: TransformMode },
    /// An operation failed; editor state is unchanged by it.
    Error { code: &'static str, message: String },
}

impl Action {
    fn error(err: &EditorError) -> Self {
        Self::Error { code: err.error_code(), message: err.to_string() }
    }
}

/// One editor instance and everything it owns.
pub struct EditorCore<B: RenderBackend> {
    backend: B,
    config: EditorConfig,
    registry: ObjectRegistry,
    selection: SelectionTracker,
    transform: TransformCoordinator,
    tool: Tool,
    touch: TouchTracker,
    /// Primitives placed so far; numbers generated names.
    placed: u64,
}

impl<B: RenderBackend> EditorCore<B> {
    #[must_use]
    pub fn new(backend: B, config: EditorConfig) -> Self {
        let transform = TransformCoordinator::new(config.gizmo);
        Self {
            backend,
            config,
            registry: ObjectRegistry::new(),
            selection: SelectionTracker::new(),
            transform,
            tool: Tool::default(),
            touch: TouchTracker::new(),
            placed: 0,
        }
    }

    // --- Event dispatch ---

    /// Run one input event to completion.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::PointerDown { x, y, button } => self.on_pointer_down(x, y, button),
            InputEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            InputEvent::PointerLeave => self.hover(None),
            InputEvent::TouchStart { x, y, touches, time_ms } => {
                self.touch.start(DVec2::new(x, y), touches, time_ms);
                Vec::new()
            }
            InputEvent::TouchMove { x, y, touches } => {
                self.touch.moved(DVec2::new(x, y), touches);
                Vec::new()
            }
            InputEvent::TouchEnd { x, y, time_ms } => self.on_touch_end(x, y, time_ms),
            InputEvent::KeyDown { key, modifiers } => self.on_key_down(&key, modifiers),
            InputEvent::GizmoDragEnd => self.on_gizmo_drag_end(),
            InputEvent::ToolSelected { tool } => self.set_tool(tool),
            InputEvent::TransformToggled => self.toggle_transform(),
            InputEvent::TransformModeSelected { mode } => self.set_transform_mode(mode),
        }
    }

    /// Primary press: select what is under the pointer, or place a primitive
    /// when the place tool is active and the pointer is over empty space.
    /// With the select tool, a press on the ground clears the selection and a
    /// press on an unregistered renderable leaves it alone.
    pub fn on_pointer_down(&mut self, x: f64, y: f64, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }

        let result = self.pick(x, y);
        if let Some(id) = result.object_id.as_deref() {
            return self.select(Some(id));
        }

        match self.tool {
            Tool::Select if result.surface == PickSurface::Renderable => Vec::new(),
            Tool::Select => self.select(None),
            Tool::Place(kind) => match self.place_primitive(kind, result.world_point) {
                Ok(object) => {
                    let mut actions = vec![Action::ObjectCreated { object: object.clone() }];
                    actions.extend(self.select(Some(&object.id)));
                    actions
                }
                Err(err) => {
                    log::warn!("place {kind}: {err}");
                    vec![Action::error(&err)]
                }
            },
        }
    }

    /// Pointer motion drives hover while the select tool is active.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Vec<Action> {
        if self.tool != Tool::Select {
            return Vec::new();
        }
        let result = self.pick(x, y);
        self.hover(result.object_id.as_deref())
    }

    fn on_touch_end(&mut self, x: f64, y: f64, time_ms: f64) -> Vec<Action> {
        match self.touch.end(DVec2::new(x, y), time_ms, &self.config.touch) {
            Some(Gesture::Tap(start)) => self.on_pointer_down(start.x, start.y, Button::Primary),
            Some(Gesture::Pan | Gesture::MultiTouch) | None => Vec::new(),
        }
    }

    /// Keyboard shortcuts. Keys combined with ctrl/alt/meta belong to the host.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.any_command() {
            return Vec::new();
        }
        match key.command() {
            Some(KeyCommand::DeleteSelected) => self.delete_selected(),
            Some(KeyCommand::ClearSelection) => self.clear_selection(),
            Some(KeyCommand::SetMode(mode)) => self.set_transform_mode(mode),
            Some(KeyCommand::CycleMode) => self.cycle_transform_mode(),
            Some(KeyCommand::ToggleTransform) => self.toggle_transform(),
            None => Vec::new(),
        }
    }

    fn on_gizmo_drag_end(&mut self) -> Vec<Action> {
        match self.transform.on_drag_end(&mut self.registry, &self.backend) {
            Some(object) => vec![Action::ObjectUpdated { object }],
            None => Vec::new(),
        }
    }

    // --- Selection ---

    /// Select `id`, or clear the selection with `None`. The gizmo follows.
    pub fn select(&mut self, id: Option<&str>) -> Vec<Action> {
        let before = self.selection.selected().map(str::to_owned);
        let handle = self.selection.select(id, &self.registry, &mut self.backend);
        self.transform.attach(handle, &self.registry, &mut self.backend);

        let after = self.selection.selected().map(str::to_owned);
        if before == after {
            Vec::new()
        } else {
            vec![Action::SelectionChanged { id: after }]
        }
    }

    /// Hover `id`, or clear hover with `None`.
    pub fn hover(&mut self, id: Option<&str>) -> Vec<Action> {
        if self.selection.hover(id, &self.registry, &mut self.backend) {
            vec![Action::HoverChanged { id: self.selection.hovered().map(str::to_owned) }]
        } else {
            Vec::new()
        }
    }

    /// Clear selection and hover.
    pub fn clear_selection(&mut self) -> Vec<Action> {
        let had_selection = self.selection.selected().is_some();
        let had_hover = self.selection.hovered().is_some();
        self.selection.clear(&mut self.backend);
        self.transform.attach(None, &self.registry, &mut self.backend);

        let mut actions = Vec::new();
        if had_selection {
            actions.push(Action::SelectionChanged { id: None });
        }
        if had_hover {
            actions.push(Action::HoverChanged { id: None });
        }
        actions
    }

    /// Delete the selected object. Nothing happens without a selection.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let (Some(id), Some(handle)) =
            (self.selection.selected().map(str::to_owned), self.selection.selected_handle())
        else {
            return Vec::new();
        };

        self.transform.release(handle, &mut self.backend);
        if !self.selection.delete_selected(&mut self.registry, &mut self.backend) {
            return vec![Action::SelectionChanged { id: None }];
        }
        log::info!("deleted {id}");
        vec![Action::ObjectDeleted { id }, Action::SelectionChanged { id: None }]
    }

    // --- Tools ---

    /// Switch the toolbar tool. Choosing any tool leaves transform mode.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.tool != tool {
            self.tool = tool;
            actions.push(Action::ToolChanged { tool });
        }
        if self.transform.is_enabled() {
            self.transform.set_enabled(false, &self.registry, &mut self.backend);
            actions.push(self.transform_changed());
        }
        if tool != Tool::Select {
            actions.extend(self.hover(None));
        }
        actions
    }

    /// Toggle transform mode. Entering it switches to the select tool and
    /// attaches the gizmo to the current selection.
    pub fn toggle_transform(&mut self) -> Vec<Action> {
        let enable = !self.transform.is_enabled();
        let mut actions = Vec::new();
        if enable && self.tool != Tool::Select {
            self.tool = Tool::Select;
            actions.push(Action::ToolChanged { tool: Tool::Select });
        }
        self.transform.set_enabled(enable, &self.registry, &mut self.backend);
        actions.push(self.transform_changed());
        actions
    }

    /// Jump to a transform mode.
    pub fn set_transform_mode(&mut self, mode: TransformMode) -> Vec<Action> {
        if self.transform.mode() == mode {
            return Vec::new();
        }
        self.transform.set_mode(mode, &mut self.backend);
        vec![self.transform_changed()]
    }

    /// Advance to the next transform mode.
    pub fn cycle_transform_mode(&mut self) -> Vec<Action> {
        self.transform.cycle_mode(&mut self.backend);
        vec![self.transform_changed()]
    }

    fn transform_changed(&self) -> Action {
        Action::TransformChanged { enabled: self.transform.is_enabled(), mode: self.transform.mode() }
    }

    // --- Objects ---

    /// Pick the screen point `(x, y)`.
    pub fn pick(&mut self, x: f64, y: f64) -> PickResult {
        picking::pick(x, y, &self.registry, &mut self.backend, self.config.ground_epsilon)
    }

    /// Create and register a primitive of `kind` at `point`, or at its resting
    /// height above the origin when no point is given.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedType` if the backend cannot build `kind`. The
    /// registry is unchanged on error.
    pub fn place_primitive(&mut self, kind: PrimitiveKind, point: Option<DVec3>) -> Result<SceneObject, EditorError> {
        let params = self.config.params_for(kind);
        let handle = self.backend.create_renderable(kind, &params)?;

        self.placed += 1;
        let id = format!("{kind}-{}", Uuid::new_v4().simple());
        let name = format!("{} {}", kind.label(), self.placed);
        let position = point.unwrap_or(DVec3::new(0.0, kind.resting_height(), 0.0));
        let mut object = SceneObject::new(id, kind, name, position);
        object.material = Material::with_color(self.config.color_for(kind));

        self.backend.set_transform(handle, object.transform());
        self.register(handle, object.clone())?;
        log::info!("placed {} at {position}", object.id);
        Ok(object)
    }

    /// Register an object whose renderable the host created itself.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` or `DuplicateHandle`; the registry is unchanged.
    pub fn add_object(&mut self, handle: RenderHandle, object: SceneObject) -> Result<(), EditorError> {
        self.registry.add(handle, object)?;
        Ok(())
    }

    /// Remove an object by any path, clearing selection, hover and gizmo
    /// references first. Returns `false` if `id` is not registered.
    pub fn remove_object(&mut self, id: &str) -> bool {
        let Some(handle) = self.registry.handle_of(id) else {
            return false;
        };
        self.selection.forget(id, &mut self.backend);
        self.transform.release(handle, &mut self.backend);
        let removed = self.registry.remove(id, &mut self.backend);
        if removed {
            log::info!("removed {id}");
        }
        removed
    }

    /// Objects in insertion order, for listing and persistence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SceneObject> {
        self.registry.list_all()
    }

    /// The snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns `Snapshot` if serialization fails.
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Recreate saved objects, keeping their ids, names, transforms and
    /// materials. Stops at the first failure; objects restored before it stay.
    /// Returns the number restored.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` for an id already in the scene and
    /// `UnsupportedType` for a kind the backend cannot build.
    pub fn restore(&mut self, objects: Vec<SceneObject>) -> Result<usize, EditorError> {
        let mut restored = 0;
        for object in objects {
            if self.registry.contains(&object.id) {
                return Err(RegistryError::DuplicateId(object.id).into());
            }
            let params = self.config.params_for(object.kind);
            let handle = self.backend.create_renderable(object.kind, &params)?;
            self.backend.set_transform(handle, object.transform());
            self.register(handle, object)?;
            restored += 1;
        }
        log::info!("restored {restored} objects");
        Ok(restored)
    }

    /// Restore from a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Snapshot` for malformed JSON, otherwise as [`Self::restore`].
    pub fn restore_json(&mut self, json: &str) -> Result<usize, EditorError> {
        let objects: Vec<SceneObject> = serde_json::from_str(json)?;
        self.restore(objects)
    }

    /// Tear down every object, highlight and gizmo. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.selection.clear(&mut self.backend);
        self.transform.attach(None, &self.registry, &mut self.backend);
        self.transform.set_enabled(false, &self.registry, &mut self.backend);
        self.registry.dispose(&mut self.backend);
    }

    /// Register a renderable this editor just created. On failure the
    /// renderable is disposed, unless the handle already belongs to another
    /// object (the backend reissued a handle the host registered itself).
    fn register(&mut self, handle: RenderHandle, object: SceneObject) -> Result<(), EditorError> {
        if let Err(err) = self.registry.add(handle, object) {
            if let RegistryError::DuplicateHandle { owner, .. } = &err {
                log::warn!("register: {handle:?} already drawn by {owner}; keeping it");
            } else {
                self.backend.dispose(handle);
            }
            return Err(err.into());
        }
        Ok(())
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.selection.selected()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.selection.hovered()
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn transform(&self) -> &TransformCoordinator {
        &self.transform
    }

    #[must_use]
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Look up an object by id.
    #[must_use]
    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.registry.object(id)
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

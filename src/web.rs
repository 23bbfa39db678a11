//! Browser bindings.
//!
//! Exposes [`Editor`] to JavaScript. The page passes in a `RenderHost` object
//! that adapts its 3D engine to the collaborator contract; events and actions
//! cross the boundary as JSON strings in the shapes of [`InputEvent`] and
//! [`Action`]. Vectors travel as flat number arrays.
//!
//! [`Action`]: crate::editor::Action

use glam::DVec3;
use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

use crate::backend::{BackendError, GizmoOptions, HighlightStyle, PickHit, Ray, RenderBackend, RenderHandle};
use crate::config::{EditorConfig, HighlightConfig};
use crate::editor::EditorCore;
use crate::input::InputEvent;
use crate::scene::{PrimitiveKind, PrimitiveParams, Transform};
use crate::transform::TransformMode;

#[wasm_bindgen]
extern "C" {
    /// Page-side adapter over the 3D engine.
    pub type RenderHost;

    /// New handle as a number. An engine that cannot build `kind` returns
    /// `null` or throws an `Error` whose `name` is `"UnsupportedType"`.
    #[wasm_bindgen(method, catch, js_name = createRenderable)]
    fn create_renderable(this: &RenderHost, kind: &str, params_json: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method)]
    fn dispose(this: &RenderHost, handle: f64);

    /// `[handle, px, py, pz, nx, ny, nz]`, or `null` when nothing is hit.
    #[wasm_bindgen(method)]
    fn pick(this: &RenderHost, x: f64, y: f64) -> JsValue;

    /// `[ox, oy, oz, dx, dy, dz]`.
    #[wasm_bindgen(method, js_name = castRay)]
    fn cast_ray(this: &RenderHost, x: f64, y: f64) -> JsValue;

    #[wasm_bindgen(method, js_name = applyHighlight)]
    fn apply_highlight(this: &RenderHost, handle: f64, color: &str);

    #[wasm_bindgen(method, js_name = removeHighlight)]
    fn remove_highlight(this: &RenderHost, handle: f64);

    #[wasm_bindgen(method, js_name = attachGizmo)]
    fn attach_gizmo(this: &RenderHost, handle: f64, mode: &str, scale: f64, snap: f64);

    #[wasm_bindgen(method, js_name = detachGizmo)]
    fn detach_gizmo(this: &RenderHost);

    /// `[px, py, pz, rx, ry, rz, sx, sy, sz]`, or `null` for an unknown handle.
    #[wasm_bindgen(method, js_name = transformOf)]
    fn transform_of(this: &RenderHost, handle: f64) -> JsValue;

    #[wasm_bindgen(method, js_name = setTransform)]
    fn set_transform(this: &RenderHost, handle: f64, values: &[f64]);
}

fn handle_to_js(handle: RenderHandle) -> f64 {
    handle.to_f64()
}

fn handle_from_js(value: f64) -> Option<RenderHandle> {
    let handle = RenderHandle::from_f64(value);
    if handle.is_none() {
        log::warn!("host returned invalid handle {value}");
    }
    handle
}

fn host_failure(kind: PrimitiveKind, err: &JsValue) -> BackendError {
    match err.dyn_ref::<js_sys::Error>() {
        Some(error) => {
            let name = String::from(error.name());
            BackendError::from_host(kind, Some(&name), String::from(error.message()))
        }
        None => BackendError::from_host(kind, None, err.as_string().unwrap_or_else(|| format!("{err:?}"))),
    }
}

fn numbers(value: &JsValue) -> Option<Vec<f64>> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    Some(Float64Array::new(value).to_vec())
}

fn vec3(values: &[f64]) -> DVec3 {
    DVec3::new(values[0], values[1], values[2])
}

/// [`RenderBackend`] that forwards to a JS [`RenderHost`].
pub struct JsBackend {
    host: RenderHost,
    highlight: HighlightConfig,
}

impl RenderBackend for JsBackend {
    fn create_renderable(&mut self, kind: PrimitiveKind, params: &PrimitiveParams) -> Result<RenderHandle, BackendError> {
        let params_json = serde_json::to_string(params).map_err(|err| BackendError::Engine(err.to_string()))?;
        let value = self
            .host
            .create_renderable(kind.as_str(), &params_json)
            .map_err(|err| host_failure(kind, &err))?;
        if value.is_null() || value.is_undefined() {
            return Err(BackendError::UnsupportedType(kind.to_string()));
        }
        let number = value
            .as_f64()
            .ok_or_else(|| BackendError::Engine(format!("createRenderable returned a non-number for {kind}")))?;
        handle_from_js(number).ok_or_else(|| BackendError::Engine(format!("createRenderable returned handle {number}")))
    }

    fn dispose(&mut self, handle: RenderHandle) {
        self.host.dispose(handle_to_js(handle));
    }

    fn pick(&mut self, x: f64, y: f64) -> Option<PickHit> {
        let values = numbers(&self.host.pick(x, y)).filter(|values| values.len() >= 7)?;
        Some(PickHit { handle: handle_from_js(values[0])?, point: vec3(&values[1..4]), normal: vec3(&values[4..7]) })
    }

    fn cast_ray(&mut self, x: f64, y: f64) -> Ray {
        if let Some(values) = numbers(&self.host.cast_ray(x, y)).filter(|values| values.len() >= 6) {
            Ray::new(vec3(&values[0..3]), vec3(&values[3..6]))
        } else {
            log::warn!("castRay returned no ray at ({x}, {y})");
            Ray::new(DVec3::ZERO, DVec3::NEG_Y)
        }
    }

    fn apply_highlight(&mut self, handle: RenderHandle, style: HighlightStyle) {
        let color = match style {
            HighlightStyle::Selected => &self.highlight.selected,
            HighlightStyle::Hovered => &self.highlight.hovered,
        };
        self.host.apply_highlight(handle_to_js(handle), color);
    }

    fn remove_highlight(&mut self, handle: RenderHandle) {
        self.host.remove_highlight(handle_to_js(handle));
    }

    fn attach_gizmo(&mut self, handle: RenderHandle, mode: TransformMode, options: GizmoOptions) {
        self.host.attach_gizmo(handle_to_js(handle), mode.as_str(), options.scale, options.snap);
    }

    fn detach_gizmo(&mut self) {
        self.host.detach_gizmo();
    }

    fn transform_of(&self, handle: RenderHandle) -> Option<Transform> {
        let values = numbers(&self.host.transform_of(handle_to_js(handle))).filter(|values| values.len() >= 9)?;
        Some(Transform { position: vec3(&values[0..3]), rotation: vec3(&values[3..6]), scale: vec3(&values[6..9]) })
    }

    fn set_transform(&mut self, handle: RenderHandle, transform: Transform) {
        let Transform { position: p, rotation: r, scale: s } = transform;
        let values = [p.x, p.y, p.z, r.x, r.y, r.z, s.x, s.y, s.z];
        self.host.set_transform(handle_to_js(handle), &values);
    }
}

/// Route `log` records to the browser console and report panics there.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("console logger already installed");
    }
}

/// The editor as seen from JavaScript.
#[wasm_bindgen]
pub struct Editor {
    core: EditorCore<JsBackend>,
}

#[wasm_bindgen]
impl Editor {
    /// Create an editor drawing through `host`, configured by optional JSON.
    ///
    /// # Errors
    ///
    /// Throws if the config is malformed or fails validation.
    #[wasm_bindgen(constructor)]
    pub fn new(host: RenderHost, config_json: Option<String>) -> Result<Editor, JsError> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json)?,
            None => EditorConfig::default(),
        };
        let backend = JsBackend { host, highlight: config.highlight.clone() };
        Ok(Self { core: EditorCore::new(backend, config) })
    }

    /// Dispatch one JSON-encoded input event; returns the JSON action list.
    ///
    /// # Errors
    ///
    /// Throws if the event is not a known input event.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&mut self, event_json: &str) -> Result<String, JsError> {
        let event: InputEvent = serde_json::from_str(event_json)?;
        let actions = self.core.handle(event);
        Ok(serde_json::to_string(&actions)?)
    }

    /// JSON pick result for a screen point.
    ///
    /// # Errors
    ///
    /// Throws if the result cannot be serialized.
    pub fn pick(&mut self, x: f64, y: f64) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.core.pick(x, y))?)
    }

    /// JSON array of every scene object.
    ///
    /// # Errors
    ///
    /// Throws if the scene cannot be serialized.
    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(self.core.to_json()?)
    }

    /// Recreate objects from a snapshot; returns how many were restored.
    ///
    /// # Errors
    ///
    /// Throws on malformed JSON or the first object that cannot be restored.
    /// Objects restored before it stay in the scene.
    pub fn restore(&mut self, json: &str) -> Result<usize, JsError> {
        Ok(self.core.restore_json(json)?)
    }

    /// Id of the selected object.
    #[must_use]
    pub fn selection(&self) -> Option<String> {
        self.core.selection().map(str::to_owned)
    }

    /// Active transform mode name.
    #[must_use]
    #[wasm_bindgen(js_name = transformMode)]
    pub fn transform_mode(&self) -> String {
        self.core.transform().mode().as_str().to_string()
    }

    /// Release every renderable, highlight and gizmo.
    pub fn dispose(&mut self) {
        self.core.dispose();
    }
}

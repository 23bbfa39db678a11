#![allow(clippy::float_cmp)]

use super::*;
use crate::backend::{HighlightStyle, Ray};
use crate::headless::{BackendCall, HeadlessBackend};
use crate::scene::{PrimitiveParams, Transform};
use crate::transform::GizmoState;

// =============================================================
// Helpers
// =============================================================

fn editor() -> EditorCore<HeadlessBackend> {
    EditorCore::new(HeadlessBackend::new(), EditorConfig::default())
}

fn place(editor: &mut EditorCore<HeadlessBackend>, kind: PrimitiveKind, at: DVec3) -> ObjectId {
    editor.place_primitive(kind, Some(at)).unwrap().id
}

/// Make `id` the frontmost renderable at `(x, y)`.
fn target(editor: &mut EditorCore<HeadlessBackend>, id: &str, x: f64, y: f64) -> RenderHandle {
    let handle = editor.registry().handle_of(id).unwrap();
    let point = editor.object(id).unwrap().position;
    editor.backend_mut().place_pick_target(x, y, handle, point, DVec3::Y);
    handle
}

fn click(editor: &mut EditorCore<HeadlessBackend>, x: f64, y: f64) -> Vec<Action> {
    editor.handle(InputEvent::PointerDown { x, y, button: Button::Primary })
}

fn key(editor: &mut EditorCore<HeadlessBackend>, name: &str) -> Vec<Action> {
    editor.handle(InputEvent::KeyDown { key: Key::new(name), modifiers: Modifiers::default() })
}

// =============================================================
// Placement
// =============================================================

#[test]
fn click_with_place_tool_creates_and_selects() {
    let mut ed = editor();
    assert_eq!(
        ed.handle(InputEvent::ToolSelected { tool: Tool::Place(PrimitiveKind::Cube) }),
        vec![Action::ToolChanged { tool: Tool::Place(PrimitiveKind::Cube) }]
    );

    let actions = click(&mut ed, 50.0, 50.0);

    assert_eq!(actions.len(), 2);
    let Action::ObjectCreated { object } = &actions[0] else {
        panic!("expected ObjectCreated, got {:?}", actions[0]);
    };
    assert!(object.id.starts_with("cube-"));
    assert_eq!(object.name, "Cube 1");
    assert_eq!(object.position, DVec3::ZERO);
    assert_eq!(actions[1], Action::SelectionChanged { id: Some(object.id.clone()) });
    assert_eq!(ed.selection(), Some(object.id.as_str()));
}

#[test]
fn placement_uses_ground_point_under_pointer() {
    let mut ed = editor();
    ed.set_tool(Tool::Place(PrimitiveKind::Sphere));
    ed.backend_mut()
        .aim_ray(10.0, 10.0, Ray::new(DVec3::new(1.0, 4.0, -2.0), DVec3::new(0.5, -1.0, 0.25)));

    click(&mut ed, 10.0, 10.0);

    let id = ed.selection().unwrap().to_owned();
    let handle = ed.registry().handle_of(&id).unwrap();
    assert_eq!(ed.object(&id).unwrap().position, DVec3::new(3.0, 0.0, -1.0));
    assert_eq!(ed.backend().renderable(handle).unwrap().transform.position, DVec3::new(3.0, 0.0, -1.0));
}

#[test]
fn placed_names_count_up() {
    let mut ed = editor();
    let first = place(&mut ed, PrimitiveKind::Torus, DVec3::ZERO);
    let second = place(&mut ed, PrimitiveKind::Cone, DVec3::X);
    assert_eq!(ed.object(&first).unwrap().name, "Torus 1");
    assert_eq!(ed.object(&second).unwrap().name, "Cone 2");
    assert_ne!(first, second);
}

#[test]
fn place_without_point_rests_above_origin() {
    let mut ed = editor();
    let cube = ed.place_primitive(PrimitiveKind::Cube, None).unwrap();
    let plane = ed.place_primitive(PrimitiveKind::Plane, None).unwrap();
    assert_eq!(cube.position, DVec3::new(0.0, 1.0, 0.0));
    assert_eq!(plane.position, DVec3::ZERO);
}

#[test]
fn placement_uses_configured_params_and_color() {
    let config = EditorConfig::from_json(
        r##"{ "primitives": { "cube": { "type": "cube", "size": 3.0 } }, "colors": { "cube": "#000000" } }"##,
    )
    .unwrap();
    let mut ed = EditorCore::new(HeadlessBackend::new(), config);

    let object = ed.place_primitive(PrimitiveKind::Cube, None).unwrap();

    let handle = ed.registry().handle_of(&object.id).unwrap();
    assert_eq!(ed.backend().renderable(handle).unwrap().params, PrimitiveParams::Cube { size: 3.0 });
    assert_eq!(object.material.color, "#000000");
}

#[test]
fn unsupported_kind_reports_error_and_leaves_scene_empty() {
    let mut ed = editor();
    ed.backend_mut().mark_unsupported(PrimitiveKind::Torus);
    ed.set_tool(Tool::Place(PrimitiveKind::Torus));

    let actions = click(&mut ed, 5.0, 5.0);

    assert!(matches!(&actions[..], [Action::Error { code: "E_UNSUPPORTED_TYPE", .. }]));
    assert!(ed.registry().is_empty());
    assert_eq!(ed.selection(), None);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn click_on_object_selects_and_highlights() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::new(0.0, 1.0, 0.0));
    let handle = target(&mut ed, &id, 100.0, 100.0);

    assert_eq!(click(&mut ed, 100.0, 100.0), vec![Action::SelectionChanged { id: Some(id.clone()) }]);
    assert_eq!(ed.backend().highlight_of(handle), Some(HighlightStyle::Selected));
}

#[test]
fn click_on_empty_space_clears_selection() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.select(Some(&id));

    assert_eq!(click(&mut ed, 300.0, 300.0), vec![Action::SelectionChanged { id: None }]);
    assert_eq!(ed.backend().highlight_count(), 0);
}

#[test]
fn click_on_unregistered_renderable_keeps_selection() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.select(Some(&id));
    let grid = ed
        .backend_mut()
        .create_renderable(PrimitiveKind::Plane, &PrimitiveParams::default_for(PrimitiveKind::Plane))
        .unwrap();
    ed.backend_mut().place_pick_target(40.0, 40.0, grid, DVec3::new(2.0, 0.0, 2.0), DVec3::Y);

    assert!(click(&mut ed, 40.0, 40.0).is_empty());
    assert_eq!(ed.selection(), Some(id.as_str()));
}

#[test]
fn place_tool_on_unregistered_renderable_places_on_its_surface() {
    let mut ed = editor();
    let grid = ed
        .backend_mut()
        .create_renderable(PrimitiveKind::Plane, &PrimitiveParams::default_for(PrimitiveKind::Plane))
        .unwrap();
    ed.backend_mut().place_pick_target(40.0, 40.0, grid, DVec3::new(2.0, 0.5, 2.0), DVec3::Y);
    ed.set_tool(Tool::Place(PrimitiveKind::Sphere));

    click(&mut ed, 40.0, 40.0);

    let id = ed.selection().unwrap().to_owned();
    assert_eq!(ed.object(&id).unwrap().position, DVec3::new(2.0, 0.5, 2.0));
}

#[test]
fn click_on_object_with_place_tool_selects_instead_of_placing() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    target(&mut ed, &id, 20.0, 20.0);
    ed.set_tool(Tool::Place(PrimitiveKind::Sphere));

    click(&mut ed, 20.0, 20.0);

    assert_eq!(ed.registry().len(), 1);
    assert_eq!(ed.selection(), Some(id.as_str()));
}

#[test]
fn secondary_button_is_ignored() {
    let mut ed = editor();
    ed.set_tool(Tool::Place(PrimitiveKind::Cube));
    let actions = ed.handle(InputEvent::PointerDown { x: 1.0, y: 1.0, button: Button::Secondary });
    assert!(actions.is_empty());
    assert!(ed.registry().is_empty());
}

#[test]
fn pointer_move_hovers_and_leave_clears() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    target(&mut ed, &id, 10.0, 10.0);

    let entered = ed.handle(InputEvent::PointerMove { x: 10.0, y: 10.0 });
    let again = ed.handle(InputEvent::PointerMove { x: 10.0, y: 10.0 });
    let left = ed.handle(InputEvent::PointerLeave);

    assert_eq!(entered, vec![Action::HoverChanged { id: Some(id) }]);
    assert!(again.is_empty());
    assert_eq!(left, vec![Action::HoverChanged { id: None }]);
}

#[test]
fn hovering_selected_object_does_nothing() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.select(Some(&id));
    let handle = target(&mut ed, &id, 10.0, 10.0);

    assert!(ed.handle(InputEvent::PointerMove { x: 10.0, y: 10.0 }).is_empty());
    assert_eq!(ed.hovered(), None);
    assert_eq!(ed.backend().highlight_of(handle), Some(HighlightStyle::Selected));
}

#[test]
fn place_tool_does_not_hover() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    target(&mut ed, &id, 10.0, 10.0);
    ed.set_tool(Tool::Place(PrimitiveKind::Cube));

    assert!(ed.handle(InputEvent::PointerMove { x: 10.0, y: 10.0 }).is_empty());
}

#[test]
fn choosing_place_tool_clears_hover() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.hover(Some(&id));

    let actions = ed.set_tool(Tool::Place(PrimitiveKind::Cone));

    assert!(actions.contains(&Action::HoverChanged { id: None }));
    assert_eq!(ed.backend().highlight_count(), 0);
}

#[test]
fn escape_clears_selection_and_hover() {
    let mut ed = editor();
    let a = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    let b = place(&mut ed, PrimitiveKind::Cube, DVec3::X);
    ed.select(Some(&a));
    ed.hover(Some(&b));

    let actions = key(&mut ed, "Escape");

    assert_eq!(actions, vec![Action::SelectionChanged { id: None }, Action::HoverChanged { id: None }]);
    assert_eq!(ed.backend().highlight_count(), 0);
}

// =============================================================
// Deletion
// =============================================================

#[test]
fn delete_key_removes_selected_object() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.select(Some(&id));
    let handle = ed.registry().handle_of(&id).unwrap();

    let actions = key(&mut ed, "Delete");

    assert_eq!(actions, vec![Action::ObjectDeleted { id }, Action::SelectionChanged { id: None }]);
    assert!(ed.registry().is_empty());
    assert!(!ed.backend().is_live(handle));
    assert_eq!(ed.backend().highlight_count(), 0);
}

#[test]
fn delete_without_selection_does_nothing() {
    let mut ed = editor();
    place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);

    assert!(key(&mut ed, "Backspace").is_empty());
    assert_eq!(ed.registry().len(), 1);
}

#[test]
fn delete_with_command_modifier_is_ignored() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.select(Some(&id));
    let modifiers = Modifiers { ctrl: true, ..Modifiers::default() };

    assert!(ed.handle(InputEvent::KeyDown { key: Key::new("Delete"), modifiers }).is_empty());
    assert_eq!(ed.registry().len(), 1);
}

#[test]
fn delete_detaches_gizmo_before_disposing() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.select(Some(&id));
    let handle = ed.registry().handle_of(&id).unwrap();
    key(&mut ed, "t");
    assert_eq!(ed.transform().attached(), Some(handle));
    ed.backend_mut().clear_calls();

    key(&mut ed, "Delete");

    let calls = ed.backend().calls();
    let detach = calls.iter().position(|c| *c == BackendCall::DetachGizmo).unwrap();
    let dispose = calls.iter().position(|c| *c == BackendCall::Dispose(handle)).unwrap();
    assert!(detach < dispose);
    assert_eq!(ed.transform().state(), GizmoState::Detached);
}

#[test]
fn remove_object_clears_selection() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.select(Some(&id));

    assert!(ed.remove_object(&id));

    assert_eq!(ed.selection(), None);
    assert_eq!(ed.backend().highlight_count(), 0);
    assert!(!ed.remove_object(&id));
}

// =============================================================
// Transform
// =============================================================

#[test]
fn toggle_transform_attaches_to_selection() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.select(Some(&id));
    let handle = ed.registry().handle_of(&id).unwrap();

    let actions = key(&mut ed, "t");

    assert_eq!(actions, vec![Action::TransformChanged { enabled: true, mode: TransformMode::Position }]);
    assert_eq!(ed.backend().gizmo(), Some((handle, TransformMode::Position)));
}

#[test]
fn toggle_transform_from_place_tool_switches_to_select() {
    let mut ed = editor();
    ed.set_tool(Tool::Place(PrimitiveKind::Cube));

    let actions = ed.handle(InputEvent::TransformToggled);

    assert_eq!(actions[0], Action::ToolChanged { tool: Tool::Select });
    assert_eq!(ed.tool(), Tool::Select);
    assert!(ed.transform().is_enabled());
}

#[test]
fn choosing_a_tool_leaves_transform_mode() {
    let mut ed = editor();
    place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.toggle_transform();

    let actions = ed.set_tool(Tool::Place(PrimitiveKind::Sphere));

    assert!(actions.contains(&Action::TransformChanged { enabled: false, mode: TransformMode::Position }));
    assert!(!ed.transform().is_enabled());
    assert_eq!(ed.backend().gizmo(), None);
}

#[test]
fn mode_keys_switch_gizmo() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    ed.select(Some(&id));
    let handle = ed.registry().handle_of(&id).unwrap();
    key(&mut ed, "t");

    assert_eq!(key(&mut ed, "e"), vec![Action::TransformChanged { enabled: true, mode: TransformMode::Rotation }]);
    assert!(key(&mut ed, "e").is_empty());
    assert_eq!(ed.backend().gizmo(), Some((handle, TransformMode::Rotation)));

    key(&mut ed, "q");
    assert_eq!(ed.transform().mode(), TransformMode::Scale);
}

#[test]
fn selecting_another_object_moves_gizmo() {
    let mut ed = editor();
    let a = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    let b = place(&mut ed, PrimitiveKind::Cube, DVec3::X);
    ed.toggle_transform();

    ed.select(Some(&a));

    assert_eq!(ed.transform().attached(), ed.registry().handle_of(&a));
    assert_ne!(ed.registry().handle_of(&a), ed.registry().handle_of(&b));
}

#[test]
fn gizmo_drag_end_updates_object() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::new(0.0, 1.0, 0.0));
    ed.select(Some(&id));
    ed.toggle_transform();
    ed.backend_mut().drag_gizmo(Transform::from_position(DVec3::new(2.0, 0.0, 3.0)));

    let actions = ed.handle(InputEvent::GizmoDragEnd);

    let [Action::ObjectUpdated { object }] = &actions[..] else {
        panic!("expected ObjectUpdated, got {actions:?}");
    };
    assert_eq!(object.id, id);
    assert_eq!(object.position, DVec3::new(2.0, 0.0, 3.0));
    assert_eq!(ed.object(&id).unwrap().position, DVec3::new(2.0, 0.0, 3.0));
}

#[test]
fn gizmo_drag_end_without_gizmo_does_nothing() {
    let mut ed = editor();
    place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    assert!(ed.handle(InputEvent::GizmoDragEnd).is_empty());
}

// =============================================================
// Touch
// =============================================================

#[test]
fn tap_selects_object_at_touch_start() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    target(&mut ed, &id, 30.0, 30.0);

    ed.handle(InputEvent::TouchStart { x: 30.0, y: 30.0, touches: 1, time_ms: 0.0 });
    let actions = ed.handle(InputEvent::TouchEnd { x: 32.0, y: 31.0, time_ms: 120.0 });

    assert_eq!(actions, vec![Action::SelectionChanged { id: Some(id) }]);
}

#[test]
fn pan_does_not_select_or_place() {
    let mut ed = editor();
    ed.set_tool(Tool::Place(PrimitiveKind::Cube));

    ed.handle(InputEvent::TouchStart { x: 30.0, y: 30.0, touches: 1, time_ms: 0.0 });
    ed.handle(InputEvent::TouchMove { x: 80.0, y: 30.0, touches: 1 });
    let actions = ed.handle(InputEvent::TouchEnd { x: 80.0, y: 30.0, time_ms: 120.0 });

    assert!(actions.is_empty());
    assert!(ed.registry().is_empty());
}

#[test]
fn pinch_does_not_place() {
    let mut ed = editor();
    ed.set_tool(Tool::Place(PrimitiveKind::Cube));

    ed.handle(InputEvent::TouchStart { x: 30.0, y: 30.0, touches: 1, time_ms: 0.0 });
    ed.handle(InputEvent::TouchStart { x: 90.0, y: 30.0, touches: 2, time_ms: 10.0 });
    let actions = ed.handle(InputEvent::TouchEnd { x: 30.0, y: 30.0, time_ms: 100.0 });

    assert!(actions.is_empty());
    assert!(ed.registry().is_empty());
}

// =============================================================
// Picking
// =============================================================

#[test]
fn pick_on_empty_scene_hits_ground_below_camera() {
    let mut ed = editor();
    ed.backend_mut()
        .aim_ray(64.0, 48.0, Ray::new(DVec3::new(0.0, 5.0, 0.0), DVec3::NEG_Y));

    let result = ed.pick(64.0, 48.0);

    assert_eq!(result.object_id, None);
    assert_eq!(result.world_point, Some(DVec3::ZERO));
}

// =============================================================
// Snapshot / restore
// =============================================================

#[test]
fn snapshot_restores_into_fresh_editor() {
    let mut ed = editor();
    let a = place(&mut ed, PrimitiveKind::Cube, DVec3::new(1.0, 0.0, 2.0));
    let b = place(&mut ed, PrimitiveKind::Torus, DVec3::new(-3.0, 0.0, 0.5));
    let json = ed.to_json().unwrap();

    let mut copy = editor();
    assert_eq!(copy.restore_json(&json).unwrap(), 2);

    assert_eq!(copy.snapshot(), ed.snapshot());
    let handle = copy.registry().handle_of(&b).unwrap();
    assert_eq!(copy.backend().renderable(handle).unwrap().transform.position, DVec3::new(-3.0, 0.0, 0.5));
    assert!(copy.object(&a).is_some());
    assert_eq!(copy.selection(), None);
}

#[test]
fn restore_duplicate_id_stops_and_keeps_earlier_objects() {
    let mut ed = editor();
    let existing = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    let fresh = SceneObject::new("sphere-restored", PrimitiveKind::Sphere, "Sphere", DVec3::X);
    let clash = SceneObject::new(existing.clone(), PrimitiveKind::Cube, "Cube", DVec3::Y);
    let live_before = ed.backend().live_count();

    let err = ed.restore(vec![fresh, clash]).unwrap_err();

    assert_eq!(err.error_code(), "E_DUPLICATE_ID");
    assert_eq!(ed.registry().len(), 2);
    assert_eq!(ed.backend().live_count(), live_before + 1);
    assert_eq!(ed.object(&existing).unwrap().position, DVec3::ZERO);
}

#[test]
fn restore_malformed_json_is_snapshot_error() {
    let mut ed = editor();
    let err = ed.restore_json("[{").unwrap_err();
    assert_eq!(err.error_code(), "E_SNAPSHOT");
}

#[test]
fn add_object_rejects_reused_handle() {
    let mut ed = editor();
    let id = place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    let handle = ed.registry().handle_of(&id).unwrap();

    let err = ed
        .add_object(handle, SceneObject::new("other", PrimitiveKind::Cube, "Other", DVec3::ZERO))
        .unwrap_err();

    assert_eq!(err.error_code(), "E_DUPLICATE_HANDLE");
    assert_eq!(ed.registry().len(), 1);
}

#[test]
fn placement_onto_host_owned_handle_keeps_its_renderable() {
    let mut ed = editor();
    ed.add_object(RenderHandle(1), SceneObject::new("host-a", PrimitiveKind::Cube, "Host", DVec3::ZERO))
        .unwrap();

    let err = ed.place_primitive(PrimitiveKind::Cube, None).unwrap_err();

    assert_eq!(err.error_code(), "E_DUPLICATE_HANDLE");
    assert!(ed.backend().is_live(RenderHandle(1)));
    assert!(!ed.backend().calls().contains(&BackendCall::Dispose(RenderHandle(1))));
    assert_eq!(ed.registry().handle_of("host-a"), Some(RenderHandle(1)));
    assert_eq!(ed.registry().len(), 1);
}

// =============================================================
// Dispose
// =============================================================

#[test]
fn dispose_releases_everything_and_is_idempotent() {
    let mut ed = editor();
    place(&mut ed, PrimitiveKind::Cube, DVec3::ZERO);
    place(&mut ed, PrimitiveKind::Sphere, DVec3::X);
    ed.toggle_transform();

    ed.dispose();
    ed.dispose();

    assert!(ed.registry().is_empty());
    assert_eq!(ed.backend().live_count(), 0);
    assert_eq!(ed.backend().highlight_count(), 0);
    assert_eq!(ed.backend().gizmo(), None);
    assert_eq!(ed.selection(), None);
    assert!(!ed.transform().is_enabled());
}

//! Shared numeric constants for the editor core.

// ── Picking ─────────────────────────────────────────────────────

/// Below this `|direction.y|` a camera ray is treated as parallel to the ground.
pub const GROUND_PARALLEL_EPSILON: f64 = 1e-4;

/// Vertical coordinate of the ground plane.
pub const GROUND_Y: f64 = 0.0;

// ── Touch ───────────────────────────────────────────────────────

/// A touch shorter than this (milliseconds) may count as a tap.
pub const TAP_MAX_DURATION_MS: f64 = 300.0;

/// A touch that drifts this far (CSS pixels, per axis) is not a tap.
pub const TAP_MAX_DISTANCE_PX: f64 = 10.0;

// ── Gizmos ──────────────────────────────────────────────────────

/// Screen-relative size of the transform gizmo.
pub const GIZMO_SCALE: f64 = 0.75;

/// Translation snap increment in world units.
pub const POSITION_SNAP: f64 = 0.25;

/// Rotation snap increment in radians (15°).
pub const ROTATION_SNAP: f64 = std::f64::consts::PI / 12.0;

/// Scale snap increment.
pub const SCALE_SNAP: f64 = 0.1;

// ── Highlights ──────────────────────────────────────────────────

/// Outline color for the selected object.
pub const SELECTED_COLOR: &str = "#00B3FF";

/// Outline color for the hovered object.
pub const HOVERED_COLOR: &str = "#FFFF00";

// ── Materials ───────────────────────────────────────────────────

/// Metallic factor given to newly placed primitives.
pub const DEFAULT_METALLIC: f64 = 0.1;

/// Roughness factor given to newly placed primitives.
pub const DEFAULT_ROUGHNESS: f64 = 0.7;

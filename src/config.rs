//! Editor configuration supplied by the host as JSON.
//!
//! Every field has a default, so `{}` is a valid configuration and hosts only
//! spell out what they change. `from_json` rejects values the editor cannot
//! work with (non-positive thresholds or snaps, malformed colors, primitive
//! parameters that cannot build a mesh).

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{
    GIZMO_SCALE, GROUND_PARALLEL_EPSILON, HOVERED_COLOR, POSITION_SNAP, ROTATION_SNAP, SCALE_SNAP, SELECTED_COLOR,
    TAP_MAX_DISTANCE_PX, TAP_MAX_DURATION_MS,
};
use crate::scene::{PrimitiveKind, PrimitiveParams};

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON could not be parsed into a configuration.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the editor cannot use.
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    /// Stable code reported to the UI layer.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_CONFIG_PARSE",
            Self::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }

    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid { field: field.into(), reason: reason.into() }
    }
}

/// Outline colors for the two highlight styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub selected: String,
    pub hovered: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { selected: SELECTED_COLOR.to_string(), hovered: HOVERED_COLOR.to_string() }
    }
}

/// Tap classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    pub tap_max_duration_ms: f64,
    pub tap_max_distance_px: f64,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self { tap_max_duration_ms: TAP_MAX_DURATION_MS, tap_max_distance_px: TAP_MAX_DISTANCE_PX }
    }
}

/// Gizmo size and per-mode snap increments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoConfig {
    pub scale: f64,
    pub position_snap: f64,
    /// Radians.
    pub rotation_snap: f64,
    pub scale_snap: f64,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self { scale: GIZMO_SCALE, position_snap: POSITION_SNAP, rotation_snap: ROTATION_SNAP, scale_snap: SCALE_SNAP }
    }
}

/// Complete editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub highlight: HighlightConfig,
    /// `|direction.y|` below which a camera ray counts as parallel to the ground.
    pub ground_epsilon: f64,
    pub touch: TouchConfig,
    pub gizmo: GizmoConfig,
    /// Per-kind overrides of the built-in primitive parameters.
    pub primitives: HashMap<PrimitiveKind, PrimitiveParams>,
    /// Per-kind overrides of the built-in primitive colors.
    pub colors: HashMap<PrimitiveKind, String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            highlight: HighlightConfig::default(),
            ground_epsilon: GROUND_PARALLEL_EPSILON,
            touch: TouchConfig::default(),
            gizmo: GizmoConfig::default(),
            primitives: HashMap::new(),
            colors: HashMap::new(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed JSON and `Invalid` for unusable values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field the editor depends on.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_color("highlight.selected", &self.highlight.selected)?;
        check_color("highlight.hovered", &self.highlight.hovered)?;
        check_positive("ground_epsilon", self.ground_epsilon)?;
        check_positive("touch.tap_max_duration_ms", self.touch.tap_max_duration_ms)?;
        check_positive("touch.tap_max_distance_px", self.touch.tap_max_distance_px)?;
        check_positive("gizmo.scale", self.gizmo.scale)?;
        check_positive("gizmo.position_snap", self.gizmo.position_snap)?;
        check_positive("gizmo.rotation_snap", self.gizmo.rotation_snap)?;
        check_positive("gizmo.scale_snap", self.gizmo.scale_snap)?;

        for (kind, params) in &self.primitives {
            let field = format!("primitives.{kind}");
            if params.kind() != *kind {
                return Err(ConfigError::invalid(field, format!("parameters describe a {}", params.kind())));
            }
            if !params.is_valid() {
                return Err(ConfigError::invalid(field, "dimensions must be positive, segments at least 3"));
            }
        }
        for (kind, color) in &self.colors {
            check_color(&format!("colors.{kind}"), color)?;
        }
        Ok(())
    }

    /// Parameters used to build a new `kind`.
    #[must_use]
    pub fn params_for(&self, kind: PrimitiveKind) -> PrimitiveParams {
        self.primitives
            .get(&kind)
            .copied()
            .unwrap_or_else(|| PrimitiveParams::default_for(kind))
    }

    /// Color given to a new `kind`.
    #[must_use]
    pub fn color_for(&self, kind: PrimitiveKind) -> &str {
        self.colors.get(&kind).map_or(kind.default_color(), String::as_str)
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("expected a positive number, got {value}")))
    }
}

fn check_color(field: &str, value: &str) -> Result<(), ConfigError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("expected #RRGGBB, got {value:?}")))
    }
}

//! Scene model: primitive kinds, their construction parameters, and the
//! scene object record kept for every placed primitive.
//!
//! `SceneObject` is the editor's authoritative description of an object. It is
//! what the host lists, persists, and restores; the renderable the engine
//! draws is reached only through the registry's handle mapping. Objects are
//! serialized with lowercase kind names under a `type` key so that saved
//! scenes stay readable by the JavaScript side.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::backend::BackendError;
use crate::consts::{DEFAULT_METALLIC, DEFAULT_ROUGHNESS};

/// Unique, immutable identifier of a scene object.
pub type ObjectId = String;

/// The kind of geometric primitive an object was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Plane,
    Torus,
}

impl PrimitiveKind {
    /// Every kind, in toolbar order.
    pub const ALL: [PrimitiveKind; 6] = [
        Self::Cube,
        Self::Sphere,
        Self::Cylinder,
        Self::Cone,
        Self::Plane,
        Self::Torus,
    ];

    /// Lowercase wire name (`"cube"`, `"torus"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Sphere => "sphere",
            Self::Cylinder => "cylinder",
            Self::Cone => "cone",
            Self::Plane => "plane",
            Self::Torus => "torus",
        }
    }

    /// Capitalized display label used for generated object names.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cube => "Cube",
            Self::Sphere => "Sphere",
            Self::Cylinder => "Cylinder",
            Self::Cone => "Cone",
            Self::Plane => "Plane",
            Self::Torus => "Torus",
        }
    }

    /// Default diffuse color as a `#RRGGBB` string.
    #[must_use]
    pub fn default_color(self) -> &'static str {
        match self {
            Self::Cube => "#4F46E5",
            Self::Sphere => "#EF4444",
            Self::Cylinder => "#10B981",
            Self::Cone => "#F59E0B",
            Self::Plane => "#6B7280",
            Self::Torus => "#8B5CF6",
        }
    }

    /// Height above the ground a new object rests at when no placement point
    /// is known. Planes lie flat on the ground.
    #[must_use]
    pub fn resting_height(self) -> f64 {
        match self {
            Self::Plane => 0.0,
            _ => 1.0,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BackendError::UnsupportedType(s.to_string()))
    }
}

/// Construction parameters for a renderable primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrimitiveParams {
    /// Axis-aligned box with equal edges.
    Cube { size: f64 },
    /// UV sphere.
    Sphere { radius: f64, segments: u32 },
    /// Capped cylinder standing on its base.
    Cylinder { radius: f64, height: f64, segments: u32 },
    /// Cylinder with a zero-radius top.
    Cone { radius: f64, height: f64, segments: u32 },
    /// Flat rectangle.
    Plane { width: f64, height: f64 },
    /// Ring torus; `thickness` is the tube diameter.
    Torus { radius: f64, thickness: f64, segments: u32 },
}

impl PrimitiveParams {
    /// Built-in parameters for `kind`.
    #[must_use]
    pub fn default_for(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Cube => Self::Cube { size: 1.0 },
            PrimitiveKind::Sphere => Self::Sphere { radius: 0.5, segments: 16 },
            PrimitiveKind::Cylinder => Self::Cylinder { radius: 0.5, height: 2.0, segments: 16 },
            PrimitiveKind::Cone => Self::Cone { radius: 0.5, height: 2.0, segments: 16 },
            PrimitiveKind::Plane => Self::Plane { width: 2.0, height: 2.0 },
            PrimitiveKind::Torus => Self::Torus { radius: 1.0, thickness: 0.3, segments: 16 },
        }
    }

    /// The kind these parameters build.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Cube { .. } => PrimitiveKind::Cube,
            Self::Sphere { .. } => PrimitiveKind::Sphere,
            Self::Cylinder { .. } => PrimitiveKind::Cylinder,
            Self::Cone { .. } => PrimitiveKind::Cone,
            Self::Plane { .. } => PrimitiveKind::Plane,
            Self::Torus { .. } => PrimitiveKind::Torus,
        }
    }

    /// Returns `true` if every dimension is finite and positive and every
    /// tessellation count can close a ring.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        match *self {
            Self::Cube { size } => positive(size),
            Self::Sphere { radius, segments } => positive(radius) && segments >= 3,
            Self::Cylinder { radius, height, segments } | Self::Cone { radius, height, segments } => {
                positive(radius) && positive(height) && segments >= 3
            }
            Self::Plane { width, height } => positive(width) && positive(height),
            Self::Torus { radius, thickness, segments } => {
                positive(radius) && positive(thickness) && segments >= 3
            }
        }
    }
}

/// Surface appearance of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse color as a `#RRGGBB` string.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f64>,
}

impl Material {
    /// A material with the editor's default metallic/roughness factors.
    #[must_use]
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            metallic: Some(DEFAULT_METALLIC),
            roughness: Some(DEFAULT_ROUGHNESS),
        }
    }
}

/// Position, Euler rotation (radians) and per-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Transform {
    /// Identity rotation and unit scale at `position`.
    #[must_use]
    pub fn from_position(position: DVec3) -> Self {
        Self { position, rotation: DVec3::ZERO, scale: DVec3::ONE }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_position(DVec3::ZERO)
    }
}

/// A placed primitive as listed, persisted and restored by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Unique identifier; never changes after creation.
    pub id: ObjectId,
    /// Primitive the renderable was built from.
    #[serde(rename = "type")]
    pub kind: PrimitiveKind,
    /// Display name shown in object lists.
    pub name: String,
    pub position: DVec3,
    /// Euler angles in radians.
    pub rotation: DVec3,
    pub scale: DVec3,
    pub material: Material,
}

impl SceneObject {
    /// A new object at `position` with identity rotation and unit scale.
    #[must_use]
    pub fn new(id: impl Into<ObjectId>, kind: PrimitiveKind, name: impl Into<String>, position: DVec3) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            position,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
            material: Material::with_color(kind.default_color()),
        }
    }

    /// The object's current transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform { position: self.position, rotation: self.rotation, scale: self.scale }
    }

    /// Overwrite position, rotation and scale.
    pub fn set_transform(&mut self, transform: Transform) {
        self.position = transform.position;
        self.rotation = transform.rotation;
        self.scale = transform.scale;
    }
}

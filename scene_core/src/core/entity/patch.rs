//! Tagged partial-update commands for component data
//!
//! Edits arriving from panels or the tool layer rarely carry a full
//! component; a patch names only the fields to change and leaves the rest
//! untouched. Each patch type is statically bound to the component it
//! targets, so a malformed update is a compile error rather than a runtime
//! surprise.

use super::components::{EditorComponent, MeshRenderer, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A partial update that merges into one component type
pub trait ComponentPatch {
    /// The component type this patch applies to
    type Target: EditorComponent;

    /// Merge the supplied fields into the target component
    fn apply(&self, target: &mut Self::Target);

    /// Whether the patch supplies no fields at all
    fn is_empty(&self) -> bool;
}

/// Partial update for [`Transform`]: any subset of position, rotation, scale
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TransformPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    /// Euler angles in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
}

impl TransformPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply a position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Supply a rotation, in Euler degrees
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Supply a scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }
}

impl ComponentPatch for TransformPatch {
    type Target = Transform;

    fn apply(&self, target: &mut Transform) {
        if let Some(position) = self.position {
            target.position = position;
        }
        if let Some(rotation) = self.rotation {
            target.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            target.scale = scale;
        }
    }

    fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none() && self.scale.is_none()
    }
}

/// A full transform is also a valid patch supplying every field
impl From<Transform> for TransformPatch {
    fn from(transform: Transform) -> Self {
        Self {
            position: Some(transform.position),
            rotation: Some(transform.rotation),
            scale: Some(transform.scale),
        }
    }
}

/// Partial update for [`MeshRenderer`]
///
/// `material_id` assigns a material; clearing an assignment is done by
/// replacing the component, not through a patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeshRendererPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast_shadows: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_shadows: Option<bool>,
}

impl MeshRendererPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply a material assignment
    pub fn with_material(mut self, material_id: impl Into<String>) -> Self {
        self.material_id = Some(material_id.into());
        self
    }
}

impl ComponentPatch for MeshRendererPatch {
    type Target = MeshRenderer;

    fn apply(&self, target: &mut MeshRenderer) {
        if let Some(material_id) = &self.material_id {
            target.material_id = Some(material_id.clone());
        }
        if let Some(cast_shadows) = self.cast_shadows {
            target.cast_shadows = cast_shadows;
        }
        if let Some(receive_shadows) = self.receive_shadows {
            target.receive_shadows = receive_shadows;
        }
    }

    fn is_empty(&self) -> bool {
        self.material_id.is_none()
            && self.cast_shadows.is_none()
            && self.receive_shadows.is_none()
    }
}

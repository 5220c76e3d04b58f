//! Core components for the entity system

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Trait for components the editor can address by name.
///
/// The name is the currency of the string-keyed [`ComponentRegistry`] and of
/// tool layers that reference component types in structured requests.
///
/// [`ComponentRegistry`]: crate::core::entity::registry::ComponentRegistry
pub trait EditorComponent: hecs::Component {
    /// Stable display name of this component type (e.g. "Transform")
    fn component_name() -> &'static str;
}

/// Transform component representing position, rotation, and scale in local space
///
/// Rotation is stored as Euler angles in degrees, which is what editor panels
/// and bulk tools read and write. Additive rotation deltas only make sense on
/// the Euler components; no angle-wrap normalization is applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position in local space
    pub position: Vec3,
    /// Rotation in local space as Euler angles, in degrees
    pub rotation: Vec3,
    /// Scale in local space
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the scale of the transform
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set the rotation of the transform, in Euler degrees
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Convert this transform to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

impl EditorComponent for Transform {
    fn component_name() -> &'static str {
        "Transform"
    }
}

/// Mesh renderer component describing how an entity is drawn
///
/// The rendering layer polls these each frame; this crate only stores and
/// edits them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeshRenderer {
    /// Identifier of the mesh asset to render
    pub mesh_id: String,
    /// Identifier of the material asset, if one is assigned
    pub material_id: Option<String>,
    /// Whether this mesh casts shadows
    pub cast_shadows: bool,
    /// Whether this mesh receives shadows
    pub receive_shadows: bool,
}

impl MeshRenderer {
    /// Create a renderer for the given mesh with default shadow settings
    pub fn new(mesh_id: impl Into<String>) -> Self {
        Self {
            mesh_id: mesh_id.into(),
            material_id: None,
            cast_shadows: true,
            receive_shadows: true,
        }
    }
}

impl EditorComponent for MeshRenderer {
    fn component_name() -> &'static str {
        "MeshRenderer"
    }
}

/// Rigid body component carrying the data the physics layer simulates from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RigidBody {
    /// How the physics layer should treat this body
    pub kind: RigidBodyKind,
    /// Mass in kilograms; ignored for static bodies
    pub mass: f32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            kind: RigidBodyKind::Dynamic,
            mass: 1.0,
        }
    }
}

/// Simulation mode of a [`RigidBody`]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RigidBodyKind {
    #[default]
    Dynamic,
    Kinematic,
    Static,
}

impl EditorComponent for RigidBody {
    fn component_name() -> &'static str {
        "RigidBody"
    }
}

/// Marker for the root entity of an instantiated prefab
///
/// A prefab root that carries no [`Transform`] of its own derives its
/// placement from its child subtree; see the `placement` module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrefabInstance {
    /// Identifier of the prefab asset this instance was created from
    pub prefab_id: String,
}

impl PrefabInstance {
    /// Create a marker for an instance of the given prefab asset
    pub fn new(prefab_id: impl Into<String>) -> Self {
        Self {
            prefab_id: prefab_id.into(),
        }
    }
}

impl EditorComponent for PrefabInstance {
    fn component_name() -> &'static str {
        "PrefabInstance"
    }
}

/// Parent component establishing a parent-child relationship
///
/// This is a weak back-reference; the ordered child lists are owned by the
/// [`World`](crate::core::entity::World), which keeps both sides in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

impl EditorComponent for Parent {
    fn component_name() -> &'static str {
        "Parent"
    }
}

/// Name component for user-friendly entity identification
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl EditorComponent for Name {
    fn component_name() -> &'static str {
        "Name"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default() {
        let transform = Transform::default();
        assert_eq!(transform.position, Vec3::ZERO);
        assert_eq!(transform.rotation, Vec3::ZERO);
        assert_eq!(transform.scale, Vec3::ONE);
    }

    #[test]
    fn test_transform_to_matrix() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        };
        let matrix = transform.to_matrix();
        assert_eq!(matrix.w_axis.truncate(), transform.position);
    }

    #[test]
    fn test_transform_rotation_degrees() {
        let transform = Transform::default().with_rotation(Vec3::new(0.0, 90.0, 0.0));
        let rotated = transform.to_matrix().transform_point3(Vec3::X);
        // 90 degrees around Y sends +X to -Z
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_name_component() {
        let name = Name::new("Test Entity");
        assert_eq!(name.0, "Test Entity");

        let json = serde_json::to_string(&name).unwrap();
        let deserialized: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(name, deserialized);
    }

    #[test]
    fn test_mesh_renderer_defaults() {
        let renderer = MeshRenderer::new("cube");
        assert_eq!(renderer.mesh_id, "cube");
        assert!(renderer.material_id.is_none());
        assert!(renderer.cast_shadows);
        assert!(renderer.receive_shadows);
    }
}

//! Entity data model: components, world, patches, registry, placement

pub mod components;
pub mod patch;
pub mod placement;
pub mod registry;
pub mod world;

pub use components::{
    EditorComponent, MeshRenderer, Name, Parent, PrefabInstance, RigidBody, RigidBodyKind,
    Transform,
};
pub use hecs::Entity;
pub use patch::{ComponentPatch, MeshRendererPatch, TransformPatch};
pub use placement::{
    effective_transform, is_prefab_root, target_entities, update_effective_transform,
    PlacementError,
};
pub use registry::ComponentRegistry;
pub use world::{HierarchyError, PatchError, World};

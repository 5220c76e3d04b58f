//! Entity-component data core for the scene editor
//!
//! This crate owns entity identity, the parent/child hierarchy, typed
//! component storage, and the effective-transform placement engine that
//! gives prefab instances a uniform read/write surface. Rendering, physics
//! simulation, scripting, and persistence are external collaborators.

pub mod core;

// Re-export commonly used types
pub mod prelude {
    // Entity system types
    pub use crate::core::entity::{
        effective_transform, is_prefab_root, target_entities, update_effective_transform,
        ComponentPatch, ComponentRegistry, EditorComponent, Entity, HierarchyError, MeshRenderer,
        MeshRendererPatch, Name, Parent, PatchError, PlacementError, PrefabInstance, RigidBody,
        RigidBodyKind, Transform, TransformPatch, World,
    };

    // Math types
    pub use glam::{Mat4, Quat, Vec3};
}

/// Initialize logging for the scene core
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

//! String-keyed component registry for dynamic component access
//!
//! Inspector panels and the tool layer address component types by name
//! ("Transform", "MeshRenderer", ...) rather than by Rust type. The registry
//! maps those names onto type-erased accessors over a [`World`], next to the
//! statically typed surface the rest of the crate uses.

use super::components::{
    EditorComponent, MeshRenderer, Name, PrefabInstance, RigidBody, Transform,
};
use super::world::World;
use hecs::Entity;
use serde::Serialize;
use std::any::TypeId;
use std::collections::HashMap;
use tracing::debug;

type HasFn = fn(&World, Entity) -> bool;
type ReadFn = fn(&World, Entity) -> Option<serde_json::Value>;
type AddDefaultFn = fn(&mut World, Entity) -> Result<(), hecs::NoSuchEntity>;

struct ComponentEntry {
    type_id: TypeId,
    has: HasFn,
    read: ReadFn,
    add_default: AddDefaultFn,
}

/// Registry of editor-addressable component types
#[derive(Default)]
pub struct ComponentRegistry {
    entries: HashMap<&'static str, ComponentEntry>,
}

impl ComponentRegistry {
    /// Create a new empty component registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in components
    ///
    /// `Parent` is deliberately absent: `hecs::Entity` does not serialize,
    /// and hierarchy edits go through the `World` API rather than patches.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register::<Transform>();
        registry.register::<MeshRenderer>();
        registry.register::<RigidBody>();
        registry.register::<PrefabInstance>();
        registry.register::<Name>();
        registry
    }

    /// Register a component type under its display name
    pub fn register<T>(&mut self)
    where
        T: EditorComponent + Clone + Default + Serialize,
    {
        let entry = ComponentEntry {
            type_id: TypeId::of::<T>(),
            has: has_component::<T>,
            read: read_component::<T>,
            add_default: add_default_component::<T>,
        };
        self.entries.insert(T::component_name(), entry);
        debug!(
            type_name = T::component_name(),
            "Registered component type"
        );
    }

    /// Check if a component type is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get the `TypeId` a component name resolves to
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.entries.get(name).map(|entry| entry.type_id)
    }

    /// Check whether an entity carries the named component
    ///
    /// Unknown names and unknown entities both answer `false`.
    pub fn has_component(&self, world: &World, entity: Entity, name: &str) -> bool {
        self.entries
            .get(name)
            .map(|entry| (entry.has)(world, entity))
            .unwrap_or(false)
    }

    /// Read the named component's data as JSON
    ///
    /// Returns `None` when the entity or component is absent; this is the
    /// read surface for inspectors, never an error path.
    pub fn component_value(
        &self,
        world: &World,
        entity: Entity,
        name: &str,
    ) -> Option<serde_json::Value> {
        self.entries
            .get(name)
            .and_then(|entry| (entry.read)(world, entity))
    }

    /// Add a default-valued instance of the named component to an entity
    ///
    /// Returns `false` for unknown names or entities.
    pub fn add_default(&self, world: &mut World, entity: Entity, name: &str) -> bool {
        self.entries
            .get(name)
            .map(|entry| (entry.add_default)(world, entity).is_ok())
            .unwrap_or(false)
    }

    /// Names of all registered component types, sorted for stable output
    pub fn component_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

fn has_component<T: EditorComponent>(world: &World, entity: Entity) -> bool {
    world.has::<T>(entity)
}

fn read_component<T: EditorComponent + Clone + Serialize>(
    world: &World,
    entity: Entity,
) -> Option<serde_json::Value> {
    world
        .get_cloned::<T>(entity)
        .and_then(|component| serde_json::to_value(component).ok())
}

fn add_default_component<T: EditorComponent + Default>(
    world: &mut World,
    entity: Entity,
) -> Result<(), hecs::NoSuchEntity> {
    world.insert(entity, T::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_builtins_registered() {
        let registry = ComponentRegistry::with_builtins();
        assert!(registry.is_registered("Transform"));
        assert!(registry.is_registered("MeshRenderer"));
        assert!(registry.is_registered("RigidBody"));
        assert!(registry.is_registered("PrefabInstance"));
        assert!(registry.is_registered("Name"));
        assert!(!registry.is_registered("Parent"));
    }

    #[test]
    fn test_component_names_sorted() {
        let registry = ComponentRegistry::with_builtins();
        let names = registry.component_names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(registry.type_id("Transform"), Some(TypeId::of::<Transform>()));
    }

    #[test]
    fn test_has_component_by_name() {
        let registry = ComponentRegistry::with_builtins();
        let mut world = World::new();
        let entity = world.spawn((Transform::default(),));

        assert!(registry.has_component(&world, entity, "Transform"));
        assert!(!registry.has_component(&world, entity, "MeshRenderer"));
        assert!(!registry.has_component(&world, entity, "NoSuchComponent"));
    }

    #[test]
    fn test_component_value_round_trip() {
        let registry = ComponentRegistry::with_builtins();
        let mut world = World::new();
        let entity = world.spawn((Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),));

        let value = registry
            .component_value(&world, entity, "Transform")
            .unwrap();
        assert_eq!(value["position"][0], 1.0);

        assert!(registry
            .component_value(&world, entity, "MeshRenderer")
            .is_none());
    }

    #[test]
    fn test_add_default_by_name() {
        let registry = ComponentRegistry::with_builtins();
        let mut world = World::new();
        let entity = world.spawn(());

        assert!(registry.add_default(&mut world, entity, "RigidBody"));
        assert!(world.has::<RigidBody>(entity));
        assert!(!registry.add_default(&mut world, entity, "NoSuchComponent"));
    }
}

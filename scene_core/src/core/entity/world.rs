//! World wrapper providing entity management and hierarchy bookkeeping

use super::components::{EditorComponent, Name, Parent};
use super::patch::ComponentPatch;
use hecs::Entity;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Error returned by hierarchy mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// Referenced entity does not exist
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
    /// Reparenting would create a cycle in the hierarchy
    #[error("parenting {child:?} under {parent:?} would create a cycle")]
    Cycle { child: Entity, parent: Entity },
}

/// Error returned by guarded component updates
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    /// Referenced entity does not exist
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
    /// The entity does not carry the component the patch targets
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },
}

/// Wrapper around hecs::World owning the parent/child hierarchy
///
/// One `World` is one scene; callers pass the handle explicitly instead of
/// going through any global state, so multiple scenes can coexist under test.
/// Child lists preserve insertion order, which matters to prefab placement:
/// the first child of a prefab root is its canonical placement reference.
pub struct World {
    inner: hecs::World,
    children: HashMap<Entity, Vec<Entity>>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
            children: HashMap::new(),
        }
    }

    /// Spawn a new entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn a new entity as the last child of `parent`
    pub fn spawn_child(
        &mut self,
        parent: Entity,
        components: impl hecs::DynamicBundle,
    ) -> Result<Entity, HierarchyError> {
        if !self.inner.contains(parent) {
            return Err(HierarchyError::NoSuchEntity(parent));
        }
        let child = self.inner.spawn(components);
        // Freshly spawned, cannot fail
        let _ = self.inner.insert_one(child, Parent(parent));
        self.children.entry(parent).or_default().push(child);
        Ok(child)
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Get the children of an entity, in insertion order
    ///
    /// Returns `None` for unknown ids and an empty slice for entities without
    /// children.
    pub fn children(&self, entity: Entity) -> Option<&[Entity]> {
        if !self.inner.contains(entity) {
            return None;
        }
        Some(
            self.children
                .get(&entity)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        )
    }

    /// Get the parent of an entity, if it has one
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.inner.get::<&Parent>(entity).ok().map(|p| p.0)
    }

    /// Attach `child` as the last child of `parent`
    ///
    /// Detaches the child from its previous parent first. Keeps the `Parent`
    /// back-reference and the parent's ordered child list in sync.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> Result<(), HierarchyError> {
        if !self.inner.contains(child) {
            return Err(HierarchyError::NoSuchEntity(child));
        }
        if !self.inner.contains(parent) {
            return Err(HierarchyError::NoSuchEntity(parent));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(HierarchyError::Cycle { child, parent });
        }

        self.clear_parent(child);
        let _ = self.inner.insert_one(child, Parent(parent));
        self.children.entry(parent).or_default().push(child);
        debug!(child = ?child, parent = ?parent, "Attached entity to parent");
        Ok(())
    }

    /// Detach an entity from its parent, making it a root entity
    pub fn clear_parent(&mut self, child: Entity) {
        if let Ok(Parent(old_parent)) = self.inner.remove_one::<Parent>(child) {
            if let Some(siblings) = self.children.get_mut(&old_parent) {
                siblings.retain(|e| *e != child);
            }
        }
    }

    /// Whether `ancestor` appears in the parent chain above `entity`
    fn is_ancestor(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut cursor = self.parent(entity);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Despawn an entity and purge all its component data
    ///
    /// The entity is detached from its parent's child list and its own
    /// children are orphaned (their `Parent` back-reference is cleared).
    /// Subtree deletion is a caller policy, not core behavior.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        if let Some(parent) = self.parent(entity) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|e| *e != entity);
            }
        }
        if let Some(orphans) = self.children.remove(&entity) {
            for orphan in orphans {
                let _ = self.inner.remove_one::<Parent>(orphan);
            }
        }
        self.inner.despawn(entity)?;
        debug!(entity = ?entity, "Despawned entity");
        Ok(())
    }

    /// Check whether an entity carries a component of type `T`
    pub fn has<T: hecs::Component>(&self, entity: Entity) -> bool {
        self.inner.get::<&T>(entity).is_ok()
    }

    /// Get a copy of a component's data, or `None` if entity or component is absent
    pub fn get_cloned<T: hecs::Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.inner.get::<&T>(entity).ok().map(|c| (*c).clone())
    }

    /// Insert a component into an entity
    pub fn insert(
        &mut self,
        entity: Entity,
        component: impl hecs::Component,
    ) -> Result<(), hecs::NoSuchEntity> {
        self.inner.insert_one(entity, component)
    }

    /// Remove a component from an entity, returning it if it was present
    pub fn remove<T: hecs::Component>(&mut self, entity: Entity) -> Option<T> {
        self.inner.remove_one::<T>(entity).ok()
    }

    /// Merge a partial update into an existing component
    ///
    /// Only the fields the patch supplies are touched. Guarded: a missing
    /// entity or component yields an error, never a panic, and leaves the
    /// world untouched.
    pub fn patch<P: ComponentPatch>(&mut self, entity: Entity, patch: &P) -> Result<(), PatchError> {
        if !self.inner.contains(entity) {
            return Err(PatchError::NoSuchEntity(entity));
        }
        match self.inner.query_one_mut::<&mut P::Target>(entity) {
            Ok(target) => {
                patch.apply(target);
                Ok(())
            }
            Err(_) => Err(PatchError::MissingComponent {
                entity,
                component: P::Target::component_name(),
            }),
        }
    }

    /// Find an entity by its `Name` component
    ///
    /// Returns an arbitrary match if several entities share the name.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.inner
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(entity, _)| entity)
    }

    /// Query entities with specific components
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<Q> {
        self.inner.query()
    }

    /// Query entities with specific components (mutable)
    pub fn query_mut<Q: hecs::Query>(&mut self) -> hecs::QueryMut<Q> {
        self.inner.query_mut()
    }

    /// Get access to the inner hecs::World for advanced operations
    pub fn inner(&self) -> &hecs::World {
        &self.inner
    }

    /// Get mutable access to the inner hecs::World for advanced operations
    pub fn inner_mut(&mut self) -> &mut hecs::World {
        &mut self.inner
    }
}

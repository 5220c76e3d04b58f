//! Effective-transform resolution and propagation
//!
//! Most entities place themselves with their own [`Transform`]. A prefab root
//! deliberately carries none: it marks an instantiated template whose parts
//! live as direct children, and its placement is *derived* — the first child
//! is the canonical reference for where the whole assembly sits. This module
//! gives every caller one uniform read/write surface over both cases, so
//! panels and bulk tools never special-case prefabs themselves.
//!
//! Writes to a prefab root propagate to the parts. In delta mode the change
//! is expressed relative to the reference child and re-applied to each part
//! (additive for position and rotation, multiplicative for scale), which
//! preserves the internal layout while the assembly moves as one object.

use super::components::{PrefabInstance, Transform};
use super::patch::{ComponentPatch, TransformPatch};
use super::world::{PatchError, World};
use glam::Vec3;
use hecs::Entity;
use thiserror::Error;
use tracing::{debug, warn};

/// Error returned by placement writes
///
/// Inside bulk operations these are recorded per entity and never escape;
/// direct single-target callers get the `Err`, since silently dropping a
/// write there would hide a caller bug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    /// Referenced entity does not exist
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
    /// The entity (or its reference child) has no Transform to work with
    #[error("entity {0:?} has no Transform component")]
    MissingTransform(Entity),
    /// A prefab root without children has no resolvable placement
    #[error("prefab root {0:?} has no children to derive a transform from")]
    EmptyPrefab(Entity),
}

impl From<PatchError> for PlacementError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::NoSuchEntity(entity) => PlacementError::NoSuchEntity(entity),
            PatchError::MissingComponent { entity, .. } => PlacementError::MissingTransform(entity),
        }
    }
}

/// How an entity's placement resolves, decided once per lookup
enum Placement {
    /// The entity owns its transform
    Owned(Transform),
    /// Prefab root: placement proxies through the child subtree
    Proxied {
        /// First child, the canonical placement reference
        reference: Entity,
        /// Direct children that own a transform (one level deep)
        parts: Vec<Entity>,
    },
}

/// True iff the entity carries a prefab marker but no transform of its own
pub fn is_prefab_root(world: &World, entity: Entity) -> bool {
    world.has::<PrefabInstance>(entity) && !world.has::<Transform>(entity)
}

fn resolve(world: &World, entity: Entity) -> Result<Placement, PlacementError> {
    let Some(children) = world.children(entity) else {
        return Err(PlacementError::NoSuchEntity(entity));
    };
    if let Some(transform) = world.get_cloned::<Transform>(entity) {
        return Ok(Placement::Owned(transform));
    }
    if !world.has::<PrefabInstance>(entity) {
        return Err(PlacementError::MissingTransform(entity));
    }
    let Some(&reference) = children.first() else {
        return Err(PlacementError::EmptyPrefab(entity));
    };
    let parts = children
        .iter()
        .copied()
        .filter(|child| world.has::<Transform>(*child))
        .collect();
    Ok(Placement::Proxied { reference, parts })
}

/// Resolve the effective transform of any entity
///
/// An entity owning a transform yields it directly. A prefab root yields the
/// transform of its first child. Missing data resolves to `None` with a
/// diagnostic, never a panic: a transform-less non-root, a prefab root with
/// zero children, or a reference child without a transform.
pub fn effective_transform(world: &World, entity: Entity) -> Option<Transform> {
    match resolve(world, entity) {
        Ok(Placement::Owned(transform)) => Some(transform),
        Ok(Placement::Proxied { reference, .. }) => {
            let transform = world.get_cloned::<Transform>(reference);
            if transform.is_none() {
                warn!(
                    entity = ?entity,
                    reference = ?reference,
                    "Prefab reference child has no Transform component"
                );
            }
            transform
        }
        Err(PlacementError::EmptyPrefab(_)) => {
            warn!(entity = ?entity, "Prefab root has no children to derive a transform from");
            None
        }
        Err(_) => None,
    }
}

/// The entities a placement write to `entity` actually lands on
///
/// A non-root entity is its own single target. For a prefab root the targets
/// are the direct children owning a transform — prefab assembly places all
/// meaningful parts one level deep, so grandchildren are not visited.
pub fn target_entities(world: &World, entity: Entity) -> Vec<Entity> {
    if !world.contains(entity) {
        return Vec::new();
    }
    if !is_prefab_root(world, entity) {
        return vec![entity];
    }
    match resolve(world, entity) {
        Ok(Placement::Proxied { parts, .. }) => parts,
        _ => Vec::new(),
    }
}

/// Write a partial transform to any entity, propagating through prefab roots
///
/// Non-root entities take the patch directly. For a prefab root:
///
/// - `propagate_delta = false` applies the identical absolute patch to every
///   part, for the rare case where all parts should literally share values.
/// - `propagate_delta = true` (the "move as a group" semantics) reads the
///   reference child, expresses the patch as per-axis deltas against it, and
///   applies those deltas to each part's own transform: position and rotation
///   add, scale multiplies. A zero reference-scale axis keeps a multiplier of
///   one rather than dividing by zero. Afterwards the root's effective
///   transform equals the requested values and every other part keeps its
///   offset from the reference.
///
/// Fields the patch does not supply are left untouched on every target.
pub fn update_effective_transform(
    world: &mut World,
    entity: Entity,
    patch: &TransformPatch,
    propagate_delta: bool,
) -> Result<(), PlacementError> {
    if patch.is_empty() {
        debug!(entity = ?entity, "Ignoring empty transform patch");
        return Ok(());
    }
    match resolve(world, entity)? {
        Placement::Owned(_) => {
            world.patch(entity, patch)?;
            Ok(())
        }
        Placement::Proxied { reference, parts } => {
            if propagate_delta {
                let reference_transform = world
                    .get_cloned::<Transform>(reference)
                    .ok_or(PlacementError::MissingTransform(reference))?;
                let delta = PlacementDelta::between(&reference_transform, patch);
                for part in parts {
                    // resolve() already filtered on Transform, but a part may
                    // have lost it since; skip rather than abort the group.
                    let Some(current) = world.get_cloned::<Transform>(part) else {
                        debug!(part = ?part, "Skipping prefab part without a Transform");
                        continue;
                    };
                    let _ = world.patch(part, &delta.applied_to(&current));
                }
            } else {
                for part in parts {
                    if let Err(err) = world.patch(part, patch) {
                        debug!(part = ?part, error = %err, "Skipping prefab part");
                    }
                }
            }
            Ok(())
        }
    }
}

/// Per-axis change relative to the reference child, one entry per supplied
/// patch field
struct PlacementDelta {
    position: Option<Vec3>,
    rotation: Option<Vec3>,
    scale_multiplier: Option<Vec3>,
}

impl PlacementDelta {
    fn between(reference: &Transform, patch: &TransformPatch) -> Self {
        Self {
            position: patch.position.map(|target| target - reference.position),
            // No angle-wrap normalization; callers supply compatible ranges
            rotation: patch.rotation.map(|target| target - reference.rotation),
            scale_multiplier: patch
                .scale
                .map(|target| scale_multiplier(target, reference.scale)),
        }
    }

    fn applied_to(&self, current: &Transform) -> TransformPatch {
        TransformPatch {
            position: self.position.map(|delta| current.position + delta),
            rotation: self.rotation.map(|delta| current.rotation + delta),
            scale: self
                .scale_multiplier
                .map(|multiplier| current.scale * multiplier),
        }
    }
}

fn scale_multiplier(target: Vec3, reference: Vec3) -> Vec3 {
    Vec3::new(
        axis_multiplier(target.x, reference.x),
        axis_multiplier(target.y, reference.y),
        axis_multiplier(target.z, reference.z),
    )
}

/// Zero reference axes keep a multiplier of one so no NaN or infinity can
/// propagate into part scales
fn axis_multiplier(target: f32, reference: f32) -> f32 {
    if reference == 0.0 {
        1.0
    } else {
        target / reference
    }
}

//! Bulk edit operations over explicit entity lists
//!
//! One logical request applies one edit across many entities — a selection,
//! a filter result, or a list handed over by the tool layer. The defining
//! guarantee is that no single failure aborts the rest: every requested
//! entity is attempted in order, and the outcome of each attempt lands in
//! the returned report. Callers that only see the final text (the AI tool
//! layer in particular) can always tell what happened to every id.

use glam::Vec3;
use hecs::Entity;
use scene_core::core::entity::{
    effective_transform, is_prefab_root, update_effective_transform, MeshRenderer,
    MeshRendererPatch, PlacementError, Transform, TransformPatch, World,
};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// One kind of edit applied uniformly across a request
#[derive(Debug, Clone, PartialEq)]
pub enum BulkEdit {
    /// Set the supplied transform fields
    SetTransform(TransformPatch),
    /// Shift position by a world-space offset
    OffsetPosition(Vec3),
    /// Assign a material to mesh renderers
    SetMaterial(String),
}

impl BulkEdit {
    fn describe(&self) -> &'static str {
        match self {
            BulkEdit::SetTransform(_) => "set transform",
            BulkEdit::OffsetPosition(_) => "offset position",
            BulkEdit::SetMaterial(_) => "set material",
        }
    }
}

/// Aggregated outcome of one bulk request
///
/// Contains exactly one line per requested entity, in request order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkReport {
    /// Entities the edit was applied to
    pub succeeded: usize,
    /// Entities skipped: unknown ids, missing components, degenerate prefabs
    pub skipped: usize,
    /// Entities where the underlying update itself failed
    pub failed: usize,
    /// Per-entity log, one line per requested entity
    pub lines: Vec<String>,
}

impl BulkReport {
    /// Total number of entities the request named
    pub fn requested(&self) -> usize {
        self.lines.len()
    }
}

impl fmt::Display for BulkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} succeeded, {} skipped, {} failed",
            self.succeeded, self.skipped, self.failed
        )?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Why an entity did not take the edit
enum EditFailure {
    NotFound,
    Skipped(String),
    Failed(String),
}

impl fmt::Display for EditFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditFailure::NotFound => write!(f, "not found"),
            EditFailure::Skipped(reason) => write!(f, "skipped: {reason}"),
            EditFailure::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Apply one edit to every listed entity, strictly in order
///
/// Never panics across the list and never aborts early; duplicate ids are
/// applied in order, last write wins. Per-entity atomic, not atomic across
/// the batch: entities already edited stay edited when a later one fails.
pub fn apply_bulk_edit(world: &mut World, entities: &[Entity], edit: &BulkEdit) -> BulkReport {
    let mut report = BulkReport {
        lines: Vec::with_capacity(entities.len()),
        ..Default::default()
    };

    for &entity in entities {
        match apply_one(world, entity, edit) {
            Ok(message) => {
                report.succeeded += 1;
                report.lines.push(format!("entity {}: {message}", entity.id()));
            }
            Err(failure) => {
                match failure {
                    EditFailure::Failed(_) => report.failed += 1,
                    _ => report.skipped += 1,
                }
                report.lines.push(format!("entity {}: {failure}", entity.id()));
            }
        }
    }

    info!(
        edit = edit.describe(),
        requested = report.requested(),
        succeeded = report.succeeded,
        skipped = report.skipped,
        failed = report.failed,
        "Applied bulk edit"
    );
    report
}

fn apply_one(world: &mut World, entity: Entity, edit: &BulkEdit) -> Result<String, EditFailure> {
    if !world.contains(entity) {
        return Err(EditFailure::NotFound);
    }
    if is_prefab_root(world, entity) {
        return apply_to_prefab_root(world, entity, edit);
    }

    match edit {
        BulkEdit::SetTransform(patch) => {
            if !world.has::<Transform>(entity) {
                return Err(EditFailure::Skipped("no Transform".into()));
            }
            world
                .patch(entity, patch)
                .map_err(|err| EditFailure::Failed(err.to_string()))?;
            Ok("transform updated".into())
        }
        BulkEdit::OffsetPosition(offset) => {
            let Some(transform) = world.get_cloned::<Transform>(entity) else {
                return Err(EditFailure::Skipped("no Transform".into()));
            };
            let patch = TransformPatch::new().with_position(transform.position + *offset);
            world
                .patch(entity, &patch)
                .map_err(|err| EditFailure::Failed(err.to_string()))?;
            Ok("position offset".into())
        }
        BulkEdit::SetMaterial(material_id) => {
            if !world.has::<MeshRenderer>(entity) {
                return Err(EditFailure::Skipped("no MeshRenderer".into()));
            }
            let patch = MeshRendererPatch::new().with_material(material_id.clone());
            world
                .patch(entity, &patch)
                .map_err(|err| EditFailure::Failed(err.to_string()))?;
            Ok(format!("material set to '{material_id}'"))
        }
    }
}

/// Prefab roots delegate to the placement engine: offsets always propagate
/// as deltas, absolute sets target the reference child's frame, and material
/// edits land on the direct children carrying the renderers.
fn apply_to_prefab_root(
    world: &mut World,
    root: Entity,
    edit: &BulkEdit,
) -> Result<String, EditFailure> {
    match edit {
        BulkEdit::SetTransform(patch) => {
            update_effective_transform(world, root, patch, true).map_err(placement_failure)?;
            Ok("prefab transform updated".into())
        }
        BulkEdit::OffsetPosition(offset) => {
            let Some(current) = effective_transform(world, root) else {
                return Err(EditFailure::Skipped(
                    "prefab root has no resolvable transform".into(),
                ));
            };
            let patch = TransformPatch::new().with_position(current.position + *offset);
            update_effective_transform(world, root, &patch, true).map_err(placement_failure)?;
            Ok("prefab position offset".into())
        }
        BulkEdit::SetMaterial(material_id) => {
            let parts: Vec<Entity> = world
                .children(root)
                .map(|children| children.to_vec())
                .unwrap_or_default();
            let patch = MeshRendererPatch::new().with_material(material_id.clone());
            let mut applied = 0;
            for part in parts {
                if world.has::<MeshRenderer>(part) && world.patch(part, &patch).is_ok() {
                    applied += 1;
                }
            }
            if applied == 0 {
                return Err(EditFailure::Skipped("no prefab part has a MeshRenderer".into()));
            }
            Ok(format!("material set to '{material_id}' on {applied} part(s)"))
        }
    }
}

fn placement_failure(err: PlacementError) -> EditFailure {
    match err {
        PlacementError::NoSuchEntity(_) => EditFailure::NotFound,
        PlacementError::MissingTransform(_) => EditFailure::Skipped("no Transform".into()),
        PlacementError::EmptyPrefab(_) => {
            EditFailure::Skipped("prefab root has no children".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_core::core::entity::{Name, PrefabInstance};

    fn assert_vec3_eq(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < 1e-5,
            "expected {expected:?}, got {actual:?}"
        );
    }

    /// The editor scenario used throughout: an ordinary cube plus a prefab
    /// whose two parts sit at (0,0,0) and (2,0,0).
    fn editor_scene(world: &mut World) -> (Entity, Entity, Entity, Entity) {
        let cube = world.spawn((
            Name::new("Cube"),
            Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
            MeshRenderer::new("cube"),
        ));
        let root = world.spawn((Name::new("Crates"), PrefabInstance::new("crate_stack")));
        let part_a = world
            .spawn_child(
                root,
                (
                    Transform::from_position(Vec3::new(0.0, 0.0, 0.0)),
                    MeshRenderer::new("crate"),
                ),
            )
            .unwrap();
        let part_b = world
            .spawn_child(
                root,
                (
                    Transform::from_position(Vec3::new(2.0, 0.0, 0.0)),
                    MeshRenderer::new("crate"),
                ),
            )
            .unwrap();
        (cube, root, part_a, part_b)
    }

    #[test]
    fn test_bulk_never_aborts_on_unknown_id() {
        let mut world = World::new();
        let ghost = world.spawn(());
        world.despawn(ghost).unwrap();

        let report = apply_bulk_edit(
            &mut world,
            &[ghost],
            &BulkEdit::SetTransform(TransformPatch::new().with_position(Vec3::X)),
        );

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.requested(), 1);
        assert!(report.lines[0].contains("not found"));
    }

    #[test]
    fn test_bulk_counts_and_line_per_entity() {
        let mut world = World::new();
        let (cube, root, _, _) = editor_scene(&mut world);
        let bare = world.spawn((Name::new("bare"),));
        let ghost = world.spawn(());
        world.despawn(ghost).unwrap();

        let entities = [cube, root, bare, ghost];
        let report = apply_bulk_edit(
            &mut world,
            &entities,
            &BulkEdit::OffsetPosition(Vec3::new(0.0, 1.0, 0.0)),
        );

        // Two failures out of four requests, one line each
        assert_eq!(report.requested(), 4);
        assert_eq!(report.lines.len(), 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.failed, 0);
        assert!(report.lines[2].contains("skipped: no Transform"));
        assert!(report.lines[3].contains("not found"));
    }

    #[test]
    fn test_offset_moves_prefab_as_group() {
        let mut world = World::new();
        let (cube, root, part_a, part_b) = editor_scene(&mut world);

        let report = apply_bulk_edit(
            &mut world,
            &[cube, root],
            &BulkEdit::OffsetPosition(Vec3::new(4.0, 0.0, 0.0)),
        );
        assert_eq!(report.succeeded, 2);

        assert_vec3_eq(
            world.get_cloned::<Transform>(cube).unwrap().position,
            Vec3::new(5.0, 0.0, 0.0),
        );
        assert_vec3_eq(
            world.get_cloned::<Transform>(part_a).unwrap().position,
            Vec3::new(4.0, 0.0, 0.0),
        );
        assert_vec3_eq(
            world.get_cloned::<Transform>(part_b).unwrap().position,
            Vec3::new(6.0, 0.0, 0.0),
        );
    }

    #[test]
    fn test_set_transform_on_prefab_targets_reference_frame() {
        let mut world = World::new();
        let (_, root, part_a, part_b) = editor_scene(&mut world);

        apply_bulk_edit(
            &mut world,
            &[root],
            &BulkEdit::SetTransform(TransformPatch::new().with_position(Vec3::new(5.0, 0.0, 0.0))),
        );

        // Reference child reaches the absolute target, sibling keeps offset
        assert_vec3_eq(
            world.get_cloned::<Transform>(part_a).unwrap().position,
            Vec3::new(5.0, 0.0, 0.0),
        );
        assert_vec3_eq(
            world.get_cloned::<Transform>(part_b).unwrap().position,
            Vec3::new(7.0, 0.0, 0.0),
        );
        assert_vec3_eq(
            effective_transform(&world, root).unwrap().position,
            Vec3::new(5.0, 0.0, 0.0),
        );
    }

    #[test]
    fn test_set_material_on_prefab_paints_parts() {
        let mut world = World::new();
        let (cube, root, part_a, part_b) = editor_scene(&mut world);

        let report = apply_bulk_edit(
            &mut world,
            &[cube, root],
            &BulkEdit::SetMaterial("mat-rusty".into()),
        );
        assert_eq!(report.succeeded, 2);
        assert!(report.lines[1].contains("2 part(s)"));

        for entity in [cube, part_a, part_b] {
            assert_eq!(
                world
                    .get_cloned::<MeshRenderer>(entity)
                    .unwrap()
                    .material_id
                    .as_deref(),
                Some("mat-rusty")
            );
        }
    }

    #[test]
    fn test_set_material_skips_without_renderer() {
        let mut world = World::new();
        let bare = world.spawn((Transform::default(),));
        let empty_root = world.spawn((PrefabInstance::new("empty"),));

        let report = apply_bulk_edit(
            &mut world,
            &[bare, empty_root],
            &BulkEdit::SetMaterial("mat".into()),
        );

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.skipped, 2);
        assert!(report.lines[0].contains("no MeshRenderer"));
        assert!(report.lines[1].contains("no prefab part has a MeshRenderer"));
    }

    #[test]
    fn test_empty_prefab_is_skipped_not_fatal() {
        let mut world = World::new();
        let empty_root = world.spawn((PrefabInstance::new("empty"),));
        let cube = world.spawn((Transform::default(),));

        let report = apply_bulk_edit(
            &mut world,
            &[empty_root, cube],
            &BulkEdit::SetTransform(TransformPatch::new().with_position(Vec3::X)),
        );

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.skipped, 1);
        assert!(report.lines[0].contains("skipped"));
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let mut world = World::new();
        let cube = world.spawn((Transform::default(),));

        let report = apply_bulk_edit(
            &mut world,
            &[cube, cube],
            &BulkEdit::OffsetPosition(Vec3::new(1.0, 0.0, 0.0)),
        );

        // Applied twice, strictly in list order
        assert_eq!(report.succeeded, 2);
        assert_vec3_eq(
            world.get_cloned::<Transform>(cube).unwrap().position,
            Vec3::new(2.0, 0.0, 0.0),
        );
    }

    #[test]
    fn test_report_display_lists_every_entity() {
        let mut world = World::new();
        let (cube, root, _, _) = editor_scene(&mut world);

        let report = apply_bulk_edit(
            &mut world,
            &[cube, root],
            &BulkEdit::OffsetPosition(Vec3::Y),
        );

        let text = report.to_string();
        assert!(text.starts_with("2 succeeded, 0 skipped, 0 failed"));
        assert_eq!(text.lines().count(), 1 + report.requested());
    }
}

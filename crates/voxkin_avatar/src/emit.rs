//! # Geometry Emitter
//!
//! Turns final cell lists into instanced voxel meshes. Each glyph cell
//! becomes `depth` voxels stacked along Z and centred on `z = 0`.
//!
//! Limbs are emitted as groups anchored at a pivot so an external animator
//! can swing them by rotating the group:
//!
//! ```text
//!   arm pivot  = centroid, nudged one cell toward the shoulder
//!   foot pivot = centroid, raised to at least baseline + 1.2 cells
//! ```

use voxkin_shared::{Bounds3, Transform, Vec2, Vec3};

use crate::classify::{ArmCell, Cell, Side};
use crate::config::AvatarConfig;
use crate::instancing::InstanceData;
use crate::scene::{GeometryHandle, InstancedMesh, LimbGroup, LimbKind, MaterialHandle};

/// Emits meshes sharing one geometry and one material.
#[derive(Debug, Clone)]
pub struct GeometryEmitter {
    cell_size: f32,
    depth_offsets: Vec<f32>,
    baseline_y: f32,
    foot_pivot_min_cells: f32,
    target_height_ratio: f32,
    geometry: GeometryHandle,
    material: MaterialHandle,
}

impl GeometryEmitter {
    /// Creates an emitter for one build.
    #[must_use]
    pub fn new(
        config: &AvatarConfig,
        baseline_y: f32,
        geometry: GeometryHandle,
        material: MaterialHandle,
    ) -> Self {
        let half = (config.depth.saturating_sub(1)) as f32 / 2.0;
        let depth_offsets = (0..config.depth)
            .map(|k| (k as f32 - half) * config.spacing)
            .collect();
        Self {
            cell_size: config.cell_size,
            depth_offsets,
            baseline_y,
            foot_pivot_min_cells: config.foot_pivot_min_cells,
            target_height_ratio: config.target_height_ratio,
            geometry,
            material,
        }
    }

    /// Z offsets of the depth layers.
    #[must_use]
    pub fn depth_offsets(&self) -> &[f32] {
        &self.depth_offsets
    }

    /// Body mesh in avatar-local coordinates.
    #[must_use]
    pub fn body_mesh(&self, cells: &[Cell]) -> InstancedMesh {
        self.mesh(cells.iter(), Vec2::ZERO)
    }

    /// Arm group, or `None` for an empty list.
    #[must_use]
    pub fn arm_group(&self, cells: &[ArmCell], side: Side) -> Option<LimbGroup> {
        let centroid = centroid(cells.iter().map(|a| &a.cell))?;
        let pivot = Vec2::new(centroid.x - side.sign() * self.cell_size, centroid.y);
        let cells: Vec<Cell> = cells.iter().map(|a| a.cell).collect();
        Some(self.group(LimbKind::Arm(side), cells, pivot))
    }

    /// Foot group, or `None` for an empty list.
    #[must_use]
    pub fn foot_group(&self, cells: &[Cell], side: Side) -> Option<LimbGroup> {
        let centroid = centroid(cells.iter())?;
        let min_y = self.baseline_y + self.cell_size * self.foot_pivot_min_cells;
        let pivot = Vec2::new(centroid.x, centroid.y.max(min_y));
        Some(self.group(LimbKind::Foot(side), cells.to_vec(), pivot))
    }

    /// Camera target: `target_height_ratio` up the bounding box, on the
    /// vertical axis. The origin when nothing was emitted.
    #[must_use]
    pub fn look_at<'a>(
        &self,
        body: &InstancedMesh,
        limbs: impl IntoIterator<Item = &'a LimbGroup>,
    ) -> Vec3 {
        let mut bounds = body.bounds(Vec3::ZERO);
        for limb in limbs {
            bounds.union(&limb.bounds());
        }
        look_at_point(&bounds, self.target_height_ratio)
    }

    fn group(&self, kind: LimbKind, cells: Vec<Cell>, pivot: Vec2) -> LimbGroup {
        tracing::debug!(
            ?kind,
            cells = cells.len(),
            pivot_x = pivot.x,
            pivot_y = pivot.y,
            "emitting limb group"
        );
        LimbGroup {
            kind,
            transform: Transform::from_translation(pivot.extend(0.0)),
            mesh: self.mesh(cells.iter(), pivot),
            cells,
        }
    }

    fn mesh<'a>(&self, cells: impl Iterator<Item = &'a Cell>, origin: Vec2) -> InstancedMesh {
        let mut instances = Vec::new();
        for cell in cells {
            let local = cell.position() - origin;
            for (layer, &z) in (0u32..).zip(&self.depth_offsets) {
                instances.push(InstanceData::voxel(local.extend(z), cell.row, cell.col, layer));
            }
        }
        InstancedMesh {
            geometry: self.geometry,
            material: self.material,
            edge: self.cell_size,
            instances,
        }
    }
}

/// Mean planar position, or `None` for no cells.
#[must_use]
pub fn centroid<'a>(cells: impl Iterator<Item = &'a Cell>) -> Option<Vec2> {
    let (sum, count) = cells.fold((Vec2::ZERO, 0usize), |(sum, n), cell| {
        (sum + cell.position(), n + 1)
    });
    (count > 0).then(|| sum / count as f32)
}

fn look_at_point(bounds: &Bounds3, ratio: f32) -> Vec3 {
    if bounds.is_empty() {
        return Vec3::ZERO;
    }
    Vec3::new(0.0, bounds.min.y + bounds.size().y * ratio, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter(config: &AvatarConfig, baseline_y: f32) -> GeometryEmitter {
        GeometryEmitter::new(config, baseline_y, GeometryHandle(0), MaterialHandle(1))
    }

    fn cell(x: f32, y: f32, row: usize, col: usize) -> Cell {
        Cell { x, y, row, col }
    }

    fn unit_config() -> AvatarConfig {
        AvatarConfig {
            cell_size: 1.0,
            depth: 3,
            spacing: 1.0,
            ..AvatarConfig::default()
        }
    }

    #[test]
    fn test_depth_offsets_are_centred() {
        let e = emitter(&unit_config(), 0.0);
        assert_eq!(e.depth_offsets(), &[-1.0, 0.0, 1.0]);

        let single = emitter(&AvatarConfig { depth: 1, ..unit_config() }, 0.0);
        assert_eq!(single.depth_offsets(), &[0.0]);
    }

    #[test]
    fn test_body_mesh_one_instance_per_layer() {
        let e = emitter(&unit_config(), 0.0);
        let mesh = e.body_mesh(&[cell(1.0, 2.0, 0, 3), cell(0.0, 0.0, 1, 2)]);

        assert_eq!(mesh.count(), 6);
        assert_eq!(mesh.instances[0].translation(), Vec3::new(1.0, 2.0, -1.0));
        assert_eq!(mesh.instances[2].layer(), 2);
        assert_eq!(mesh.instances[3].grid(), (1, 2));
        assert_eq!(mesh.geometry, GeometryHandle(0));
        assert_eq!(mesh.material, MaterialHandle(1));
    }

    #[test]
    fn test_arm_pivot_nudged_toward_shoulder() {
        let e = emitter(&unit_config(), 0.0);
        let cells = [
            ArmCell::new(cell(-4.0, 2.0, 0, 0), 0.0),
            ArmCell::new(cell(-4.0, 4.0, 1, 0), 0.0),
        ];

        let left = e.arm_group(&cells, Side::Left).expect("left arm");
        assert_eq!(left.pivot(), Vec3::new(-3.0, 3.0, 0.0));
        assert_eq!(left.kind, LimbKind::Arm(Side::Left));
        assert_eq!(left.mesh.instances[1].translation(), Vec3::new(-1.0, -1.0, 0.0));

        let right = e.arm_group(&cells, Side::Right).expect("right arm");
        assert_eq!(right.pivot(), Vec3::new(-5.0, 3.0, 0.0));
    }

    #[test]
    fn test_foot_pivot_clamped_above_baseline() {
        let e = emitter(&unit_config(), 10.0);
        let low = e.foot_group(&[cell(1.0, 0.0, 9, 4)], Side::Right).expect("foot");
        // baseline 10 + 1 cell * 1.2
        assert!((low.pivot().y - 11.2).abs() < 1e-6);

        let high = e.foot_group(&[cell(1.0, 20.0, 9, 4)], Side::Right).expect("foot");
        assert_eq!(high.pivot().y, 20.0);
    }

    #[test]
    fn test_empty_limbs_are_absent() {
        let e = emitter(&unit_config(), 0.0);
        assert!(e.arm_group(&[], Side::Left).is_none());
        assert!(e.foot_group(&[], Side::Right).is_none());
    }

    #[test]
    fn test_look_at_height_ratio() {
        let config = AvatarConfig {
            target_height_ratio: 0.5,
            ..unit_config()
        };
        let e = emitter(&config, 0.0);
        let body = e.body_mesh(&[cell(0.0, 0.0, 1, 0), cell(0.0, 3.0, 0, 0)]);
        // cubes span y in [-0.5, 3.5]
        assert_eq!(e.look_at(&body, []), Vec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn test_look_at_includes_limbs_at_their_pivot() {
        let config = AvatarConfig {
            target_height_ratio: 1.0,
            ..unit_config()
        };
        let e = emitter(&config, 0.0);
        let body = e.body_mesh(&[cell(0.0, 0.0, 1, 0)]);
        let arm = e
            .arm_group(&[ArmCell::new(cell(2.0, 5.0, 0, 2), 0.0)], Side::Right)
            .expect("arm");
        assert_eq!(e.look_at(&body, [&arm]).y, 5.5);
    }

    #[test]
    fn test_look_at_empty_is_origin() {
        let e = emitter(&unit_config(), 0.0);
        let body = e.body_mesh(&[]);
        assert_eq!(e.look_at(&body, []), Vec3::ZERO);
    }

    #[test]
    fn test_centroid() {
        let cells = [cell(0.0, 0.0, 0, 0), cell(2.0, 4.0, 0, 1)];
        assert_eq!(centroid(cells.iter()), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(centroid(std::iter::empty()), None);
    }
}
